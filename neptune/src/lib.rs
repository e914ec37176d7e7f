pub mod api;
pub mod config;
pub mod provider_data;
pub mod resources;
pub mod tags;
pub mod validation;
pub mod waiter;

pub use provider_data::NeptuneProviderData;

use async_trait::async_trait;
use config::ProviderConfig;
use resources::neptune::resource_cluster_endpoint::TYPE_NAME as CLUSTER_ENDPOINT_TYPE_NAME;
use resources::ClusterEndpointResource;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, Provider, ProviderMetadataRequest,
    ProviderMetadataResponse, ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
    ValidateProviderConfigRequest, ValidateProviderConfigResponse,
};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{
    AttributeBuilder, AttributeType, NestedBlockBuilder, NestingMode, Schema, SchemaBuilder,
};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, ServerCapabilities};

pub const PROVIDER_TYPE_NAME: &str = "aws";

#[derive(Default)]
pub struct NeptuneProvider;

impl NeptuneProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .attribute(
                AttributeBuilder::new("region", AttributeType::String)
                    .description("AWS region (or AWS_REGION / AWS_DEFAULT_REGION env var)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("profile", AttributeType::String)
                    .description("Shared config profile (or AWS_PROFILE env var)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("access_key", AttributeType::String)
                    .description("Static access key")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("secret_key", AttributeType::String)
                    .description("Static secret key")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("token", AttributeType::String)
                    .description("Session token for temporary credentials")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("endpoint", AttributeType::String)
                    .description("Custom Neptune API endpoint URL")
                    .optional()
                    .build(),
            )
            .block(
                NestedBlockBuilder::new("default_tags", NestingMode::List)
                    .description("Tags applied to every taggable resource")
                    .attribute(
                        AttributeBuilder::new("tags", AttributeType::map_of(AttributeType::String))
                            .optional()
                            .build(),
                    )
                    .max_items(1)
                    .build(),
            )
            .block(
                NestedBlockBuilder::new("ignore_tags", NestingMode::List)
                    .description("Tag keys the provider never manages")
                    .attribute(
                        AttributeBuilder::new("keys", AttributeType::set_of(AttributeType::String))
                            .optional()
                            .build(),
                    )
                    .attribute(
                        AttributeBuilder::new(
                            "key_prefixes",
                            AttributeType::set_of(AttributeType::String),
                        )
                        .optional()
                        .build(),
                    )
                    .max_items(1)
                    .build(),
            )
            .build()
    }
}

#[async_trait]
impl Provider for NeptuneProvider {
    fn type_name(&self) -> &str {
        PROVIDER_TYPE_NAME
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            server_capabilities: ServerCapabilities::default(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: Self::schema_static(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        let mut diagnostics = vec![];

        let access_key = request.config.get(&AttributePath::new("access_key"));
        let secret_key = request.config.get(&AttributePath::new("secret_key"));
        let is_set =
            |value: Option<&Dynamic>| matches!(value, Some(Dynamic::String(s)) if !s.is_empty());
        let is_unknown = |value: Option<&Dynamic>| matches!(value, Some(Dynamic::Unknown));

        // unknown values are checked again at configure time
        if !is_unknown(access_key)
            && !is_unknown(secret_key)
            && is_set(access_key) != is_set(secret_key)
        {
            let missing = if is_set(access_key) {
                "secret_key"
            } else {
                "access_key"
            };
            diagnostics.push(
                Diagnostic::error(
                    "access_key and secret_key must be set together",
                    format!("{} is missing", missing),
                )
                .with_attribute(AttributePath::new(missing)),
            );
        }

        ValidateProviderConfigResponse { diagnostics }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let config = match ProviderConfig::from_config(&request.config) {
            Ok(config) => config,
            Err(err) => {
                return ConfigureProviderResponse {
                    diagnostics: vec![Diagnostic::error(err.to_string(), String::new())],
                    provider_data: None,
                }
            }
        };

        let sdk_config = config.load_sdk_config().await;
        let client = api::Client::new(&sdk_config);
        tracing::info!(
            region = %config.region,
            partition = config.partition(),
            "configured Neptune client"
        );

        let data = NeptuneProviderData {
            default_tags: config.default_tags,
            ignore_tags: config.ignore_tags,
            ..NeptuneProviderData::new(Arc::new(client), config.region)
        };
        ConfigureProviderResponse {
            diagnostics: vec![],
            provider_data: Some(Arc::new(data)),
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut factories: HashMap<String, ResourceFactory> = HashMap::new();
        factories.insert(
            CLUSTER_ENDPOINT_TYPE_NAME.to_string(),
            Box::new(|| Box::new(ClusterEndpointResource::new()) as Box<dyn ResourceWithConfigure>),
        );
        factories
    }
}
