//! gRPC service implementation for the Provider trait
//!
//! This module implements the Terraform Plugin Protocol v6 on top of the
//! factory-based Provider trait. Resource instances are created per call and
//! configured with the provider data captured at ConfigureProvider time.

use crate::context::Context;
use crate::plan_modifier::{values_equal, PlanModifyRequest};
use crate::proto::{self, provider_server::Provider as ProtoProvider};
use crate::provider::{
    ConfigureProviderRequest, Provider, ProviderMetadataRequest, ProviderSchemaRequest,
    StopProviderRequest, ValidateProviderConfigRequest,
};
use crate::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest,
    ImportResourceStateRequest, ModifyPlanRequest, ReadResourceRequest, ResourceSchemaRequest,
    ResourceWithConfigure, UpdateResourceRequest, ValidateResourceConfigRequest,
};
use crate::schema::{Attribute, Block, NestedBlock, NestingMode, Schema, StringKind};
use crate::types::{
    AttributePath, AttributePathStep, ClientCapabilities, Diagnostic, DiagnosticSeverity, Dynamic,
    DynamicValue,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Request, Response, Status};

type ProviderData = Option<Arc<dyn Any + Send + Sync>>;

pub struct GrpcProviderServer<P: Provider> {
    provider: Arc<RwLock<P>>,
    provider_data: Arc<RwLock<ProviderData>>,
    stop_ctx: Context,
}

impl<P: Provider + 'static> GrpcProviderServer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(RwLock::new(provider)),
            provider_data: Arc::new(RwLock::new(None)),
            stop_ctx: Context::new(),
        }
    }

    fn ctx(&self) -> Context {
        self.stop_ctx.clone()
    }

    /// Builds a resource instance and hands it the provider data, if any
    async fn resource(
        &self,
        type_name: &str,
    ) -> Result<(Box<dyn ResourceWithConfigure>, Vec<Diagnostic>), Status> {
        let mut resource = {
            let provider = self.provider.read().await;
            let factories = provider.resources();
            let factory = factories
                .get(type_name)
                .ok_or_else(|| Status::not_found(format!("unknown resource type: {}", type_name)))?;
            factory()
        };

        let provider_data = self.provider_data.read().await.clone();
        let mut diagnostics = vec![];
        if provider_data.is_some() {
            let response = resource
                .configure(self.ctx(), ConfigureResourceRequest { provider_data })
                .await;
            diagnostics.extend(response.diagnostics);
        }

        Ok((resource, diagnostics))
    }

    async fn resource_schema(&self, resource: &dyn ResourceWithConfigure) -> Schema {
        resource.schema(self.ctx(), ResourceSchemaRequest).await.schema
    }
}

#[tonic::async_trait]
impl<P: Provider + 'static> ProtoProvider for GrpcProviderServer<P> {
    async fn get_metadata(
        &self,
        _request: Request<proto::get_metadata::Request>,
    ) -> Result<Response<proto::get_metadata::Response>, Status> {
        let provider = self.provider.read().await;
        let metadata = provider.metadata(self.ctx(), ProviderMetadataRequest).await;

        let mut resources: Vec<_> = provider.resources().into_keys().collect();
        resources.sort();

        Ok(Response::new(proto::get_metadata::Response {
            server_capabilities: Some(server_capabilities_to_proto(&metadata.server_capabilities)),
            diagnostics: vec![],
            data_sources: vec![],
            resources: resources
                .into_iter()
                .map(|type_name| proto::get_metadata::ResourceMetadata { type_name })
                .collect(),
        }))
    }

    async fn get_provider_schema(
        &self,
        _request: Request<proto::get_provider_schema::Request>,
    ) -> Result<Response<proto::get_provider_schema::Response>, Status> {
        let provider = self.provider.read().await;
        let provider_schema = provider.schema(self.ctx(), ProviderSchemaRequest).await;
        let metadata = provider.metadata(self.ctx(), ProviderMetadataRequest).await;
        let mut diagnostics = provider_schema.diagnostics;

        let mut resource_schemas = HashMap::new();
        for (type_name, factory) in provider.resources() {
            let resource = factory();
            let response = resource.schema(self.ctx(), ResourceSchemaRequest).await;
            diagnostics.extend(response.diagnostics);
            resource_schemas.insert(type_name, schema_to_proto(&response.schema));
        }

        Ok(Response::new(proto::get_provider_schema::Response {
            provider: Some(schema_to_proto(&provider_schema.schema)),
            resource_schemas,
            data_source_schemas: HashMap::new(),
            diagnostics: diagnostics_to_proto(&diagnostics),
            provider_meta: None,
            server_capabilities: Some(server_capabilities_to_proto(&metadata.server_capabilities)),
        }))
    }

    async fn validate_provider_config(
        &self,
        request: Request<proto::validate_provider_config::Request>,
    ) -> Result<Response<proto::validate_provider_config::Response>, Status> {
        let request = request.into_inner();
        let config = decode_dynamic_value(request.config.as_ref())?;

        let provider = self.provider.read().await;
        let schema = provider.schema(self.ctx(), ProviderSchemaRequest).await.schema;

        let mut diagnostics = vec![];
        run_validators(&schema.block, &config, &AttributePath::root(), &mut diagnostics);
        let response = provider
            .validate(self.ctx(), ValidateProviderConfigRequest { config })
            .await;
        diagnostics.extend(response.diagnostics);

        Ok(Response::new(proto::validate_provider_config::Response {
            diagnostics: diagnostics_to_proto(&diagnostics),
        }))
    }

    async fn validate_resource_config(
        &self,
        request: Request<proto::validate_resource_config::Request>,
    ) -> Result<Response<proto::validate_resource_config::Response>, Status> {
        let request = request.into_inner();
        let config = decode_dynamic_value(request.config.as_ref())?;
        let (resource, mut diagnostics) = self.resource(&request.type_name).await?;
        let schema = self.resource_schema(resource.as_ref()).await;

        run_validators(&schema.block, &config, &AttributePath::root(), &mut diagnostics);
        let response = resource
            .validate(
                self.ctx(),
                ValidateResourceConfigRequest {
                    type_name: request.type_name,
                    config,
                    client_capabilities: client_capabilities_from_proto(
                        request.client_capabilities,
                    ),
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);

        Ok(Response::new(proto::validate_resource_config::Response {
            diagnostics: diagnostics_to_proto(&diagnostics),
        }))
    }

    async fn validate_data_resource_config(
        &self,
        request: Request<proto::validate_data_resource_config::Request>,
    ) -> Result<Response<proto::validate_data_resource_config::Response>, Status> {
        let request = request.into_inner();
        let diagnostics = vec![Diagnostic::error(
            "Unknown data source",
            format!("This provider has no data source named {}", request.type_name),
        )];

        Ok(Response::new(proto::validate_data_resource_config::Response {
            diagnostics: diagnostics_to_proto(&diagnostics),
        }))
    }

    async fn upgrade_resource_state(
        &self,
        request: Request<proto::upgrade_resource_state::Request>,
    ) -> Result<Response<proto::upgrade_resource_state::Response>, Status> {
        let request = request.into_inner();
        let (resource, _) = self.resource(&request.type_name).await?;
        let schema = self.resource_schema(resource.as_ref()).await;

        let mut diagnostics = vec![];
        let raw = request.raw_state.unwrap_or_default();

        let upgraded = if request.version > schema.version {
            diagnostics.push(Diagnostic::error(
                "Unsupported state version",
                format!(
                    "State version {} is newer than the schema version {} of {}",
                    request.version, schema.version, request.type_name
                ),
            ));
            DynamicValue::null()
        } else if !raw.json.is_empty() {
            let mut state = DynamicValue::decode_json(&raw.json)?;
            // drop attributes the current schema no longer declares
            if let Dynamic::Map(values) = &mut state.value {
                values.retain(|name, _| {
                    schema.attribute(name).is_some()
                        || schema.block.block_types.iter().any(|b| &b.type_name == name)
                });
            }
            state
        } else if raw.flatmap.is_empty() {
            DynamicValue::null()
        } else {
            diagnostics.push(Diagnostic::error(
                "Unsupported state format",
                "Flatmap state from Terraform 0.11 and earlier cannot be upgraded",
            ));
            DynamicValue::null()
        };

        Ok(Response::new(proto::upgrade_resource_state::Response {
            upgraded_state: Some(encode_dynamic_value(&upgraded)?),
            diagnostics: diagnostics_to_proto(&diagnostics),
        }))
    }

    async fn configure_provider(
        &self,
        request: Request<proto::configure_provider::Request>,
    ) -> Result<Response<proto::configure_provider::Response>, Status> {
        let request = request.into_inner();
        let config = decode_dynamic_value(request.config.as_ref())?;
        tracing::debug!(terraform_version = %request.terraform_version, "configuring provider");

        let response = {
            let mut provider = self.provider.write().await;
            provider
                .configure(
                    self.ctx(),
                    ConfigureProviderRequest {
                        terraform_version: request.terraform_version,
                        config,
                        client_capabilities: client_capabilities_from_proto(
                            request.client_capabilities,
                        ),
                    },
                )
                .await
        };

        if response.provider_data.is_some() {
            *self.provider_data.write().await = response.provider_data;
        }

        Ok(Response::new(proto::configure_provider::Response {
            diagnostics: diagnostics_to_proto(&response.diagnostics),
        }))
    }

    async fn read_resource(
        &self,
        request: Request<proto::read_resource::Request>,
    ) -> Result<Response<proto::read_resource::Response>, Status> {
        let request = request.into_inner();
        let current_state = decode_dynamic_value(request.current_state.as_ref())?;
        let (resource, mut diagnostics) = self.resource(&request.type_name).await?;

        let response = resource
            .read(
                self.ctx(),
                ReadResourceRequest {
                    type_name: request.type_name,
                    current_state,
                    private: request.private,
                    client_capabilities: client_capabilities_from_proto(
                        request.client_capabilities,
                    ),
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);

        let new_state = response.new_state.unwrap_or_else(DynamicValue::null);

        Ok(Response::new(proto::read_resource::Response {
            new_state: Some(encode_dynamic_value(&new_state)?),
            diagnostics: diagnostics_to_proto(&diagnostics),
            private: response.private,
        }))
    }

    async fn plan_resource_change(
        &self,
        request: Request<proto::plan_resource_change::Request>,
    ) -> Result<Response<proto::plan_resource_change::Response>, Status> {
        let request = request.into_inner();
        let prior_state = decode_dynamic_value(request.prior_state.as_ref())?;
        let proposed = decode_dynamic_value(request.proposed_new_state.as_ref())?;
        let config = decode_dynamic_value(request.config.as_ref())?;

        // destroy plans pass straight through
        if proposed.is_null() {
            return Ok(Response::new(proto::plan_resource_change::Response {
                planned_state: Some(encode_dynamic_value(&proposed)?),
                requires_replace: vec![],
                planned_private: request.prior_private,
                diagnostics: vec![],
                legacy_type_system: false,
            }));
        }

        let (resource, mut diagnostics) = self.resource(&request.type_name).await?;
        let schema = self.resource_schema(resource.as_ref()).await;

        let creating = prior_state.is_null();
        let mut planned = proposed.clone();
        let mut requires_replace = vec![];

        if creating || !values_equal(&prior_state.value, &proposed.value) {
            for attr in schema.block.attributes.iter().filter(|a| a.computed) {
                let path = AttributePath::new(&attr.name);
                let configured = config.get(&path).is_some_and(|v| !v.is_null());
                if !configured {
                    planned.mark_unknown(&path).map_err(Status::from)?;
                }
            }
        }

        if !creating {
            for attr in schema
                .block
                .attributes
                .iter()
                .filter(|a| !a.plan_modifiers.is_empty())
            {
                let path = AttributePath::new(&attr.name);
                let mut plan_value = planned.get(&path).cloned().unwrap_or(Dynamic::Null);
                let state_value = prior_state.get(&path).cloned().unwrap_or(Dynamic::Null);
                let config_value = config.get(&path).cloned().unwrap_or(Dynamic::Null);

                for modifier in &attr.plan_modifiers {
                    let response = modifier.modify_plan(PlanModifyRequest {
                        state: state_value.clone(),
                        plan: plan_value,
                        config: config_value.clone(),
                        attribute_path: path.clone(),
                    });
                    plan_value = response.plan_value;
                    diagnostics.extend(response.diagnostics);
                    if response.requires_replace && !requires_replace.contains(&path) {
                        requires_replace.push(path.clone());
                    }
                }

                planned.set_value(&path, plan_value).map_err(Status::from)?;
            }
        }

        let mut planned_private = request.prior_private.clone();
        if let Some(modify_plan) = resource.as_modify_plan() {
            let response = modify_plan
                .modify_plan(
                    self.ctx(),
                    ModifyPlanRequest {
                        type_name: request.type_name.clone(),
                        config,
                        prior_state,
                        proposed_new_state: planned,
                        prior_private: request.prior_private,
                    },
                )
                .await;
            planned = response.planned_state;
            planned_private = response.planned_private;
            diagnostics.extend(response.diagnostics);
            for path in response.requires_replace {
                if !requires_replace.contains(&path) {
                    requires_replace.push(path);
                }
            }
        }

        tracing::debug!(
            type_name = %request.type_name,
            creating,
            replace = requires_replace.len(),
            "planned resource change"
        );

        Ok(Response::new(proto::plan_resource_change::Response {
            planned_state: Some(encode_dynamic_value(&planned)?),
            requires_replace: requires_replace.iter().map(attribute_path_to_proto).collect(),
            planned_private,
            diagnostics: diagnostics_to_proto(&diagnostics),
            legacy_type_system: false,
        }))
    }

    async fn apply_resource_change(
        &self,
        request: Request<proto::apply_resource_change::Request>,
    ) -> Result<Response<proto::apply_resource_change::Response>, Status> {
        let request = request.into_inner();
        let prior_state = decode_dynamic_value(request.prior_state.as_ref())?;
        let planned_state = decode_dynamic_value(request.planned_state.as_ref())?;
        let config = decode_dynamic_value(request.config.as_ref())?;
        let (resource, mut diagnostics) = self.resource(&request.type_name).await?;

        let (new_state, private) = if planned_state.is_null() {
            tracing::info!(type_name = %request.type_name, "deleting resource");
            let response = resource
                .delete(
                    self.ctx(),
                    DeleteResourceRequest {
                        type_name: request.type_name,
                        prior_state: prior_state.clone(),
                        planned_private: request.planned_private,
                    },
                )
                .await;
            let failed = crate::types::has_errors(&response.diagnostics);
            diagnostics.extend(response.diagnostics);
            // a failed delete keeps the resource in state
            let state = if failed { prior_state } else { DynamicValue::null() };
            (state, vec![])
        } else if prior_state.is_null() {
            tracing::info!(type_name = %request.type_name, "creating resource");
            let response = resource
                .create(
                    self.ctx(),
                    CreateResourceRequest {
                        type_name: request.type_name,
                        planned_state,
                        config,
                        planned_private: request.planned_private,
                    },
                )
                .await;
            diagnostics.extend(response.diagnostics);
            (response.new_state, response.private)
        } else {
            tracing::info!(type_name = %request.type_name, "updating resource");
            let response = resource
                .update(
                    self.ctx(),
                    UpdateResourceRequest {
                        type_name: request.type_name,
                        prior_state,
                        planned_state,
                        config,
                        planned_private: request.planned_private,
                    },
                )
                .await;
            diagnostics.extend(response.diagnostics);
            (response.new_state, response.private)
        };

        Ok(Response::new(proto::apply_resource_change::Response {
            new_state: Some(encode_dynamic_value(&new_state)?),
            private,
            diagnostics: diagnostics_to_proto(&diagnostics),
            legacy_type_system: false,
        }))
    }

    async fn import_resource_state(
        &self,
        request: Request<proto::import_resource_state::Request>,
    ) -> Result<Response<proto::import_resource_state::Response>, Status> {
        let request = request.into_inner();
        let (resource, mut diagnostics) = self.resource(&request.type_name).await?;

        let Some(importer) = resource.as_import_state() else {
            diagnostics.push(Diagnostic::error(
                "Resource Import Not Implemented",
                format!("{} does not support import", request.type_name),
            ));
            return Ok(Response::new(proto::import_resource_state::Response {
                imported_resources: vec![],
                diagnostics: diagnostics_to_proto(&diagnostics),
            }));
        };

        let response = importer
            .import_state(
                self.ctx(),
                ImportResourceStateRequest {
                    type_name: request.type_name,
                    id: request.id,
                    client_capabilities: client_capabilities_from_proto(
                        request.client_capabilities,
                    ),
                },
            )
            .await;
        diagnostics.extend(response.diagnostics);

        let imported_resources = response
            .imported_resources
            .into_iter()
            .map(|imported| {
                Ok(proto::import_resource_state::ImportedResource {
                    type_name: imported.type_name,
                    state: Some(encode_dynamic_value(&imported.state)?),
                    private: imported.private,
                })
            })
            .collect::<Result<Vec<_>, Status>>()?;

        Ok(Response::new(proto::import_resource_state::Response {
            imported_resources,
            diagnostics: diagnostics_to_proto(&diagnostics),
        }))
    }

    async fn read_data_source(
        &self,
        request: Request<proto::read_data_source::Request>,
    ) -> Result<Response<proto::read_data_source::Response>, Status> {
        let request = request.into_inner();
        let diagnostics = vec![Diagnostic::error(
            "Unknown data source",
            format!("This provider has no data source named {}", request.type_name),
        )];

        Ok(Response::new(proto::read_data_source::Response {
            state: None,
            diagnostics: diagnostics_to_proto(&diagnostics),
        }))
    }

    async fn stop_provider(
        &self,
        _request: Request<proto::stop_provider::Request>,
    ) -> Result<Response<proto::stop_provider::Response>, Status> {
        tracing::info!("stop requested, cancelling in-flight operations");
        self.stop_ctx.cancel();

        let provider = self.provider.read().await;
        let response = provider.stop(self.ctx(), StopProviderRequest).await;

        Ok(Response::new(proto::stop_provider::Response {
            error: response.error.unwrap_or_default(),
        }))
    }
}

/// Runs attribute validators on known, non-null configuration values
fn run_validators(
    block: &Block,
    config: &DynamicValue,
    base: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for attr in &block.attributes {
        let mut path = base.clone();
        path.steps
            .push(AttributePathStep::AttributeName(attr.name.clone()));
        let Some(value) = config.get(&path) else {
            continue;
        };
        if value.is_null() || value.is_unknown() {
            continue;
        }
        for validator in &attr.validators {
            validator.validate(value, &path, diagnostics);
        }
    }

    for nested in &block.block_types {
        let path = {
            let mut path = base.clone();
            path.steps
                .push(AttributePathStep::AttributeName(nested.type_name.clone()));
            path
        };
        if let Some(Dynamic::List(items)) = config.get(&path) {
            for idx in 0..items.len() {
                run_validators(
                    &nested.block,
                    config,
                    &path.clone().index(idx as i64),
                    diagnostics,
                );
            }
        }
    }
}

fn decode_dynamic_value(value: Option<&proto::DynamicValue>) -> Result<DynamicValue, Status> {
    let Some(value) = value else {
        return Ok(DynamicValue::null());
    };

    if !value.msgpack.is_empty() {
        Ok(DynamicValue::decode_msgpack(&value.msgpack)?)
    } else if !value.json.is_empty() {
        Ok(DynamicValue::decode_json(&value.json)?)
    } else {
        Ok(DynamicValue::null())
    }
}

fn encode_dynamic_value(value: &DynamicValue) -> Result<proto::DynamicValue, Status> {
    Ok(proto::DynamicValue {
        msgpack: value.encode_msgpack()?,
        json: vec![],
    })
}

fn client_capabilities_from_proto(
    capabilities: Option<proto::ClientCapabilities>,
) -> ClientCapabilities {
    capabilities
        .map(|c| ClientCapabilities {
            deferral_allowed: c.deferral_allowed,
            write_only_attributes_allowed: c.write_only_attributes_allowed,
        })
        .unwrap_or_default()
}

fn server_capabilities_to_proto(
    capabilities: &crate::types::ServerCapabilities,
) -> proto::ServerCapabilities {
    proto::ServerCapabilities {
        plan_destroy: capabilities.plan_destroy,
        get_provider_schema_optional: capabilities.get_provider_schema_optional,
        move_resource_state: capabilities.move_resource_state,
    }
}

fn schema_to_proto(schema: &Schema) -> proto::Schema {
    proto::Schema {
        version: schema.version,
        block: Some(block_to_proto(&schema.block)),
    }
}

fn block_to_proto(block: &Block) -> proto::schema::Block {
    proto::schema::Block {
        version: block.version,
        attributes: block.attributes.iter().map(attribute_to_proto).collect(),
        block_types: block.block_types.iter().map(nested_block_to_proto).collect(),
        description: block.description.clone(),
        description_kind: string_kind_to_proto(block.description_kind) as i32,
        deprecated: block.deprecated,
    }
}

fn attribute_to_proto(attr: &Attribute) -> proto::schema::Attribute {
    proto::schema::Attribute {
        name: attr.name.clone(),
        r#type: attr.r#type.to_type_bytes(),
        description: attr.description.clone(),
        required: attr.required,
        optional: attr.optional,
        computed: attr.computed,
        sensitive: attr.sensitive,
        description_kind: proto::StringKind::Plain as i32,
        deprecated: attr.deprecated,
        write_only: false,
    }
}

fn nested_block_to_proto(nested: &NestedBlock) -> proto::schema::NestedBlock {
    use proto::schema::nested_block::NestingMode as ProtoNesting;

    let nesting = match nested.nesting {
        NestingMode::Invalid => ProtoNesting::Invalid,
        NestingMode::Single => ProtoNesting::Single,
        NestingMode::List => ProtoNesting::List,
        NestingMode::Set => ProtoNesting::Set,
        NestingMode::Map => ProtoNesting::Map,
        NestingMode::Group => ProtoNesting::Group,
    };

    proto::schema::NestedBlock {
        type_name: nested.type_name.clone(),
        block: Some(block_to_proto(&nested.block)),
        nesting: nesting as i32,
        min_items: nested.min_items,
        max_items: nested.max_items,
    }
}

fn string_kind_to_proto(kind: StringKind) -> proto::StringKind {
    match kind {
        StringKind::Plain => proto::StringKind::Plain,
        StringKind::Markdown => proto::StringKind::Markdown,
    }
}

fn attribute_path_to_proto(path: &AttributePath) -> proto::AttributePath {
    use proto::attribute_path::step::Selector;

    proto::AttributePath {
        steps: path
            .steps
            .iter()
            .map(|step| proto::attribute_path::Step {
                selector: Some(match step {
                    AttributePathStep::AttributeName(name) => Selector::AttributeName(name.clone()),
                    AttributePathStep::ElementKeyString(key) => {
                        Selector::ElementKeyString(key.clone())
                    }
                    AttributePathStep::ElementKeyInt(idx) => Selector::ElementKeyInt(*idx),
                }),
            })
            .collect(),
    }
}

fn diagnostics_to_proto(diagnostics: &[Diagnostic]) -> Vec<proto::Diagnostic> {
    use proto::diagnostic::Severity;

    diagnostics
        .iter()
        .map(|diag| proto::Diagnostic {
            severity: match diag.severity {
                DiagnosticSeverity::Invalid => Severity::Invalid,
                DiagnosticSeverity::Error => Severity::Error,
                DiagnosticSeverity::Warning => Severity::Warning,
            } as i32,
            summary: diag.summary.clone(),
            detail: diag.detail.clone(),
            attribute: diag.attribute.as_ref().map(attribute_path_to_proto),
        })
        .collect()
}

#[cfg(test)]
#[path = "./grpc_test.rs"]
mod grpc_test;
