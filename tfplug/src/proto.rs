//! Generated Terraform Plugin Protocol v6 types
//!
//! `build.rs` compiles `proto/tfplugin6.proto` with tonic-build. Each RPC
//! gets a snake_case module holding its `Request` and `Response`
//! (`read_resource::Request`, `apply_resource_change::Response`, ...). Several
//! messages share names with framework types (`DynamicValue`, `Diagnostic`,
//! `Schema`), so refer to these through the `proto::` prefix.

include!(concat!(env!("OUT_DIR"), "/tfplugin6.rs"));

pub use provider_server::{Provider as ProviderService, ProviderServer};
