//! Neptune cluster endpoint resource implementation
//!
//! Manages a custom endpoint of a Neptune DB cluster. The resource ID is
//! `<cluster_identifier>:<cluster_endpoint_identifier>`.

use super::finder::{endpoint_by_id, EndpointId, FindError};
use super::waiter::{cluster_endpoint_available, cluster_endpoint_deleted};
use crate::api::{
    ClusterEndpoint, CreateClusterEndpointInput, ModifyClusterEndpointInput,
    DB_CLUSTER_ENDPOINT_NOT_FOUND,
};
use crate::tags::{update_tags, KeyValueTags};
use crate::validation::NeptuneIdentifierValidator;
use crate::NeptuneProviderData;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::{values_equal, RequiresReplaceIfChanged, UseStateForUnknown};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ModifyPlanRequest,
    ModifyPlanResponse, ReadResourceRequest, ReadResourceResponse, Resource,
    ResourceMetadataRequest, ResourceMetadataResponse, ResourceSchemaRequest,
    ResourceSchemaResponse, ResourceWithConfigure, ResourceWithImportState,
    ResourceWithModifyPlan, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::StringOneOfValidator;

pub const TYPE_NAME: &str = "aws_neptune_cluster_endpoint";

pub const ENDPOINT_TYPES: [&str; 3] = ["READER", "WRITER", "ANY"];

const ATTRIBUTES: [&str; 10] = [
    "id",
    "arn",
    "cluster_identifier",
    "cluster_endpoint_identifier",
    "endpoint",
    "endpoint_type",
    "static_members",
    "excluded_members",
    "tags",
    "tags_all",
];

fn attr(name: &str) -> AttributePath {
    AttributePath::new(name)
}

fn error(summary: String) -> Diagnostic {
    Diagnostic::error(summary, String::new())
}

#[derive(Default)]
pub struct ClusterEndpointResource {
    provider_data: Option<NeptuneProviderData>,
}

impl ClusterEndpointResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn provider_data(&self) -> Result<&NeptuneProviderData, Diagnostic> {
        self.provider_data.as_ref().ok_or_else(|| {
            Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            )
        })
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages a custom endpoint of a Neptune DB cluster")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("cluster_identifier:cluster_endpoint_identifier")
                    .computed()
                    .plan_modifier(UseStateForUnknown)
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("arn", AttributeType::String)
                    .description("ARN of the cluster endpoint")
                    .computed()
                    .plan_modifier(UseStateForUnknown)
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("cluster_identifier", AttributeType::String)
                    .description("Identifier of the DB cluster the endpoint belongs to")
                    .required()
                    .validator(NeptuneIdentifierValidator)
                    .plan_modifier(RequiresReplaceIfChanged)
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("cluster_endpoint_identifier", AttributeType::String)
                    .description("Identifier of the endpoint")
                    .required()
                    .validator(NeptuneIdentifierValidator)
                    .plan_modifier(RequiresReplaceIfChanged)
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("endpoint", AttributeType::String)
                    .description("DNS address of the endpoint")
                    .computed()
                    .plan_modifier(UseStateForUnknown)
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("endpoint_type", AttributeType::String)
                    .description("Type of the endpoint: READER, WRITER or ANY")
                    .required()
                    .validator(StringOneOfValidator::new(ENDPOINT_TYPES))
                    .plan_modifier(RequiresReplaceIfChanged)
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "static_members",
                    AttributeType::set_of(AttributeType::String),
                )
                .description("DB instance identifiers that are part of the endpoint")
                .optional()
                .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "excluded_members",
                    AttributeType::set_of(AttributeType::String),
                )
                .description("DB instance identifiers that are not part of the endpoint")
                .optional()
                .build(),
            )
            .attribute(
                AttributeBuilder::new("tags", AttributeType::map_of(AttributeType::String))
                    .description("Tags assigned to the endpoint")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tags_all", AttributeType::map_of(AttributeType::String))
                    .description("Tags assigned to the endpoint, including provider default_tags")
                    .computed()
                    .build(),
            )
            .build()
    }

    /// Describes the endpoint and builds its state on top of `base`
    ///
    /// Returns `Ok(None)` when the endpoint does not exist.
    async fn read_endpoint(
        &self,
        data: &NeptuneProviderData,
        id: &EndpointId,
        base: &DynamicValue,
    ) -> Result<Option<DynamicValue>, Diagnostic> {
        let endpoint = match endpoint_by_id(data.conn.as_ref(), id).await {
            Ok(endpoint) => endpoint,
            Err(FindError::NotFound) => return Ok(None),
            Err(err) => {
                return Err(error(format!(
                    "error describing Neptune Cluster Endpoint ({}): {}",
                    id, err
                )))
            }
        };

        let arn = endpoint.arn.clone().unwrap_or_default();
        let tags = if data.tags_supported() {
            let tags = data.conn.list_tags_for_resource(&arn).await.map_err(|err| {
                error(format!(
                    "error listing tags for Neptune Cluster Endpoint ({}): {}",
                    arn, err
                ))
            })?;
            let tags = KeyValueTags::from(tags)
                .ignore_aws()
                .ignore_config(&data.ignore_tags);
            Some((tags.clone().remove_default_config(&data.default_tags), tags))
        } else {
            None
        };

        endpoint_state(base, id, &endpoint, tags.as_ref())
            .map(Some)
            .map_err(|err| error(format!("error setting Neptune Cluster Endpoint state: {}", err)))
    }
}

/// Endpoint settings as found in a plan or state
struct EndpointConfig {
    cluster_identifier: String,
    endpoint_identifier: String,
    endpoint_type: String,
    static_members: Vec<String>,
    excluded_members: Vec<String>,
    tags: KeyValueTags,
}

impl EndpointConfig {
    fn from_state(state: &DynamicValue) -> tfplug::Result<Self> {
        Ok(Self {
            cluster_identifier: state.get_string(&attr("cluster_identifier"))?,
            endpoint_identifier: state.get_string(&attr("cluster_endpoint_identifier"))?,
            endpoint_type: state.get_string(&attr("endpoint_type"))?,
            static_members: state.get_string_set(&attr("static_members"))?,
            excluded_members: state.get_string_set(&attr("excluded_members"))?,
            tags: KeyValueTags::from(state.get_string_map(&attr("tags"))?),
        })
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

fn endpoint_state(
    base: &DynamicValue,
    id: &EndpointId,
    endpoint: &ClusterEndpoint,
    tags: Option<&(KeyValueTags, KeyValueTags)>,
) -> tfplug::Result<DynamicValue> {
    let mut state = match base.value {
        Dynamic::Map(_) => base.clone(),
        _ => DynamicValue::object(),
    };

    state.set_string(&attr("id"), id.to_string())?;
    state.set_string(
        &attr("cluster_identifier"),
        endpoint.cluster_identifier.clone(),
    )?;
    state.set_string(
        &attr("cluster_endpoint_identifier"),
        endpoint.endpoint_identifier.clone(),
    )?;
    set_optional_string(
        &mut state,
        "endpoint_type",
        endpoint.custom_endpoint_type.clone(),
    )?;
    set_optional_string(&mut state, "endpoint", endpoint.endpoint.clone())?;
    set_optional_string(&mut state, "arn", endpoint.arn.clone())?;
    set_string_set(
        &mut state,
        base,
        "static_members",
        endpoint.static_members.clone(),
    )?;
    set_string_set(
        &mut state,
        base,
        "excluded_members",
        endpoint.excluded_members.clone(),
    )?;

    match tags {
        Some((tags, tags_all)) => {
            set_string_map(&mut state, base, "tags", tags)?;
            set_string_map(&mut state, base, "tags_all", tags_all)?;
        }
        // unmanaged partition: tags pass through from base, tags_all stays null
        None => {
            let configured = match base.get(&attr("tags")) {
                Some(Dynamic::Map(tags)) => Dynamic::Map(tags.clone()),
                _ => Dynamic::Null,
            };
            state.set_value(&attr("tags"), configured)?;
            state.set_null(&attr("tags_all"))?;
        }
    }

    Ok(state)
}

fn set_optional_string(
    state: &mut DynamicValue,
    name: &str,
    value: Option<String>,
) -> tfplug::Result<()> {
    match value {
        Some(value) => state.set_string(&attr(name), value),
        None => state.set_null(&attr(name)),
    }
}

// Empty collections stay null unless `base` already held a collection there
fn set_string_set(
    state: &mut DynamicValue,
    base: &DynamicValue,
    name: &str,
    mut values: Vec<String>,
) -> tfplug::Result<()> {
    let path = attr(name);
    if values.is_empty() && !matches!(base.get(&path), Some(Dynamic::List(_))) {
        return state.set_null(&path);
    }
    values.sort();
    state.set_value(&path, Dynamic::string_list(values))
}

fn set_string_map(
    state: &mut DynamicValue,
    base: &DynamicValue,
    name: &str,
    tags: &KeyValueTags,
) -> tfplug::Result<()> {
    let path = attr(name);
    if tags.is_empty() && !matches!(base.get(&path), Some(Dynamic::Map(_))) {
        return state.set_null(&path);
    }
    state.set_value(&path, Dynamic::string_map(tags.to_map()))
}

/// Replaces unknown values so a partially applied state can be saved
fn without_unknowns(value: Dynamic) -> Dynamic {
    match value {
        Dynamic::Unknown => Dynamic::Null,
        Dynamic::List(items) => Dynamic::List(items.into_iter().map(without_unknowns).collect()),
        Dynamic::Map(entries) => Dynamic::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, without_unknowns(v)))
                .collect(),
        ),
        other => other,
    }
}

// sets arrive in no particular order
fn normalized(value: Option<&Dynamic>) -> Dynamic {
    match value {
        Some(Dynamic::List(items)) => {
            let mut items = items.clone();
            items.sort_by(|a, b| a.as_string().cmp(&b.as_string()));
            Dynamic::List(items)
        }
        Some(other) => other.clone(),
        None => Dynamic::Null,
    }
}

fn changed(prior: &DynamicValue, planned: &DynamicValue, name: &str) -> bool {
    let path = attr(name);
    !values_equal(
        &normalized(prior.get(&path)),
        &normalized(planned.get(&path)),
    )
}

#[async_trait]
impl Resource for ClusterEndpointResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: Self::schema_static(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        // identifier and endpoint type checks are schema validators
        ValidateResourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let failed = |diagnostic: Diagnostic| CreateResourceResponse {
            new_state: DynamicValue::null(),
            private: vec![],
            diagnostics: vec![diagnostic],
        };

        let data = match self.provider_data() {
            Ok(data) => data,
            Err(diagnostic) => return failed(diagnostic),
        };

        let config = match EndpointConfig::from_state(&request.planned_state) {
            Ok(config) => config,
            Err(err) => {
                return failed(error(format!(
                    "error creating Neptune Cluster Endpoint: {}",
                    err
                )))
            }
        };

        let tags = data.default_tags.merge_tags(&config.tags);
        let mut input = CreateClusterEndpointInput {
            cluster_identifier: config.cluster_identifier,
            endpoint_identifier: config.endpoint_identifier,
            endpoint_type: config.endpoint_type,
            static_members: non_empty(config.static_members),
            excluded_members: non_empty(config.excluded_members),
            tags: vec![],
        };
        if !tags.is_empty() && data.tags_supported() {
            input.tags = tags.ignore_aws().to_tags();
        }

        let output = match data.conn.create_db_cluster_endpoint(input).await {
            Ok(output) => output,
            Err(err) => {
                tracing::error!(error = %err, "failed to create Neptune cluster endpoint");
                return failed(error(format!(
                    "error creating Neptune Cluster Endpoint: {}",
                    err
                )));
            }
        };

        let id = EndpointId::new(output.cluster_identifier, output.endpoint_identifier);
        tracing::info!(id = %id, "created Neptune cluster endpoint");

        // what exists so far; saved if the rest of create fails
        let mut partial = DynamicValue::new(without_unknowns(request.planned_state.value.clone()));
        if let Err(err) = partial.set_string(&attr("id"), id.to_string()) {
            return failed(error(format!(
                "error setting Neptune Cluster Endpoint ({}) ID: {}",
                id, err
            )));
        }

        if let Err(err) = cluster_endpoint_available(&ctx, data.conn.as_ref(), &id, &data.waiter).await
        {
            return CreateResourceResponse {
                new_state: partial,
                private: vec![],
                diagnostics: vec![error(format!(
                    "error waiting for Neptune Cluster Endpoint ({:?}) to be Available: {}",
                    id.to_string(),
                    err
                ))],
            };
        }

        match self.read_endpoint(data, &id, &request.planned_state).await {
            Ok(Some(new_state)) => CreateResourceResponse {
                new_state,
                private: vec![],
                diagnostics: vec![],
            },
            Ok(None) => CreateResourceResponse {
                new_state: partial,
                private: vec![],
                diagnostics: vec![error(format!(
                    "error describing Neptune Cluster Endpoint ({}): {}",
                    id,
                    FindError::NotFound
                ))],
            },
            Err(diagnostic) => CreateResourceResponse {
                new_state: partial,
                private: vec![],
                diagnostics: vec![diagnostic],
            },
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let failed = |current_state: DynamicValue, diagnostic: Diagnostic| ReadResourceResponse {
            new_state: Some(current_state),
            diagnostics: vec![diagnostic],
            private: vec![],
        };

        let data = match self.provider_data() {
            Ok(data) => data,
            Err(diagnostic) => return failed(request.current_state, diagnostic),
        };

        let raw_id = match request.current_state.get_string(&attr("id")) {
            Ok(id) => id,
            Err(err) => {
                return failed(
                    request.current_state,
                    error(format!("error describing Neptune Cluster Endpoint: {}", err)),
                )
            }
        };
        let id = match EndpointId::parse(&raw_id) {
            Ok(id) => id,
            Err(err) => {
                return failed(
                    request.current_state,
                    error(format!(
                        "error describing Neptune Cluster Endpoint ({}): {}",
                        raw_id, err
                    )),
                )
            }
        };

        match self.read_endpoint(data, &id, &request.current_state).await {
            Ok(Some(new_state)) => ReadResourceResponse {
                new_state: Some(new_state),
                diagnostics: vec![],
                private: request.private,
            },
            Ok(None) => {
                tracing::debug!("Neptune Cluster Endpoint ({}) not found", id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics: vec![],
                    private: vec![],
                }
            }
            Err(diagnostic) => failed(request.current_state, diagnostic),
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let prior = &request.prior_state;
        let planned = &request.planned_state;
        let failed = |diagnostic: Diagnostic| UpdateResourceResponse {
            new_state: request.prior_state.clone(),
            private: vec![],
            diagnostics: vec![diagnostic],
        };

        let data = match self.provider_data() {
            Ok(data) => data,
            Err(diagnostic) => return failed(diagnostic),
        };

        let raw_id = prior.get_string(&attr("id")).unwrap_or_default();
        let id = match EndpointId::parse(&raw_id) {
            Ok(id) => id,
            Err(err) => {
                return failed(error(format!(
                    "error updating Neptune Cluster Endpoint ({:?}): {}",
                    raw_id, err
                )))
            }
        };
        let config = match EndpointConfig::from_state(planned) {
            Ok(config) => config,
            Err(err) => {
                return failed(error(format!(
                    "error updating Neptune Cluster Endpoint ({:?}): {}",
                    raw_id, err
                )))
            }
        };

        let endpoint_changed = ["endpoint_type", "static_members", "excluded_members"]
            .iter()
            .any(|name| changed(prior, planned, name));
        if endpoint_changed {
            let mut input = ModifyClusterEndpointInput {
                endpoint_identifier: config.endpoint_identifier.clone(),
                ..Default::default()
            };
            if changed(prior, planned, "endpoint_type") {
                input.endpoint_type = Some(config.endpoint_type.clone());
            }
            if changed(prior, planned, "static_members") {
                input.static_members = Some(config.static_members.clone());
            }
            if changed(prior, planned, "excluded_members") {
                input.excluded_members = Some(config.excluded_members.clone());
            }

            if let Err(err) = data.conn.modify_db_cluster_endpoint(input).await {
                tracing::error!(id = %id, error = %err, "failed to modify Neptune cluster endpoint");
                return failed(error(format!(
                    "error updating Neptune Cluster Endpoint ({:?}): {}",
                    raw_id, err
                )));
            }

            if let Err(err) =
                cluster_endpoint_available(&ctx, data.conn.as_ref(), &id, &data.waiter).await
            {
                return failed(error(format!(
                    "error waiting for Neptune Cluster Endpoint ({:?}) to be Available: {}",
                    raw_id, err
                )));
            }
        }

        if data.tags_supported() {
            let old = KeyValueTags::from(prior.get_string_map(&attr("tags_all")).unwrap_or_default());
            let new = data
                .default_tags
                .merge_tags(&config.tags)
                .ignore_config(&data.ignore_tags);

            if old != new {
                let arn = prior.get_string(&attr("arn")).unwrap_or_default();
                if let Err(err) = update_tags(data.conn.as_ref(), &arn, &old, &new).await {
                    return failed(error(format!(
                        "error updating Neptune Cluster Endpoint ({}) tags: {}",
                        arn, err
                    )));
                }
            }
        }

        match self.read_endpoint(data, &id, planned).await {
            Ok(Some(new_state)) => UpdateResourceResponse {
                new_state,
                private: vec![],
                diagnostics: vec![],
            },
            Ok(None) => failed(error(format!(
                "error describing Neptune Cluster Endpoint ({}): {}",
                id,
                FindError::NotFound
            ))),
            Err(diagnostic) => failed(diagnostic),
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let failed = |diagnostic: Diagnostic| DeleteResourceResponse {
            diagnostics: vec![diagnostic],
        };

        let data = match self.provider_data() {
            Ok(data) => data,
            Err(diagnostic) => return failed(diagnostic),
        };

        let endpoint_identifier = request
            .prior_state
            .get_string(&attr("cluster_endpoint_identifier"))
            .unwrap_or_default();

        if let Err(err) = data
            .conn
            .delete_db_cluster_endpoint(&endpoint_identifier)
            .await
        {
            if err.is_not_found() {
                tracing::debug!(
                    endpoint = %endpoint_identifier,
                    "Neptune cluster endpoint already gone"
                );
                return DeleteResourceResponse {
                    diagnostics: vec![],
                };
            }
            return failed(error(format!(
                "Neptune Cluster Endpoint cannot be deleted: {}",
                err
            )));
        }

        let raw_id = request
            .prior_state
            .get_string(&attr("id"))
            .unwrap_or_default();
        let id = match EndpointId::parse(&raw_id) {
            Ok(id) => id,
            Err(err) => {
                return failed(error(format!(
                    "error waiting for Neptune Cluster Endpoint ({:?}) to be Deleted: {}",
                    raw_id, err
                )))
            }
        };

        match cluster_endpoint_deleted(&ctx, data.conn.as_ref(), &id, &data.waiter).await {
            Ok(_) => DeleteResourceResponse {
                diagnostics: vec![],
            },
            Err(err)
                if err
                    .api_error()
                    .is_some_and(|e| e.is_code(DB_CLUSTER_ENDPOINT_NOT_FOUND)) =>
            {
                DeleteResourceResponse {
                    diagnostics: vec![],
                }
            }
            Err(err) => failed(error(format!(
                "error waiting for Neptune Cluster Endpoint ({:?}) to be Deleted: {}",
                raw_id, err
            ))),
        }
    }

    fn as_import_state(&self) -> Option<&dyn ResourceWithImportState> {
        Some(self)
    }

    fn as_modify_plan(&self) -> Option<&dyn ResourceWithModifyPlan> {
        Some(self)
    }
}

#[async_trait]
impl ResourceWithConfigure for ClusterEndpointResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];

        if let Some(data) = request.provider_data {
            if let Some(provider_data) = data.downcast_ref::<NeptuneProviderData>() {
                self.provider_data = Some(provider_data.clone());
            } else {
                diagnostics.push(Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract NeptuneProviderData from provider data",
                ));
            }
        } else {
            diagnostics.push(Diagnostic::error(
                "No provider data",
                "No provider data was provided to the resource",
            ));
        }

        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithImportState for ClusterEndpointResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(&ctx, attr("id"), &request, &mut response);

        // read fills in the rest
        for imported in &mut response.imported_resources {
            for name in ATTRIBUTES {
                if imported.state.get(&attr(name)).is_some() {
                    continue;
                }
                if let Err(err) = imported.state.set_null(&attr(name)) {
                    response.diagnostics.push(
                        Diagnostic::error(
                            format!("error importing Neptune Cluster Endpoint: {}", err),
                            String::new(),
                        )
                        .with_attribute(attr(name)),
                    );
                }
            }
        }

        response
    }
}

#[async_trait]
impl ResourceWithModifyPlan for ClusterEndpointResource {
    async fn modify_plan(&self, _ctx: Context, request: ModifyPlanRequest) -> ModifyPlanResponse {
        let mut planned = request.proposed_new_state;
        let mut diagnostics = vec![];

        if let Some(data) = &self.provider_data {
            let tags_all = attr("tags_all");
            let prior_tags_all = request.prior_state.get(&tags_all).unwrap_or(&Dynamic::Null);

            let value = if !data.tags_supported() {
                Dynamic::Null
            } else if planned
                .get(&attr("tags"))
                .is_some_and(|tags| !tags.is_fully_known())
            {
                Dynamic::Unknown
            } else {
                match planned.get_string_map(&attr("tags")) {
                    Ok(tags) => {
                        let all = data
                            .default_tags
                            .merge_tags(&KeyValueTags::from(tags))
                            .ignore_config(&data.ignore_tags);
                        if all.is_empty() && prior_tags_all.is_null() {
                            Dynamic::Null
                        } else {
                            Dynamic::string_map(all.to_map())
                        }
                    }
                    Err(err) => {
                        diagnostics.push(
                            Diagnostic::error("Invalid tags", err.to_string())
                                .with_attribute(attr("tags")),
                        );
                        Dynamic::Unknown
                    }
                }
            };

            if let Err(err) = planned.set_value(&tags_all, value) {
                diagnostics.push(Diagnostic::error("Failed to plan tags_all", err.to_string()));
            }
        }

        ModifyPlanResponse {
            planned_state: planned,
            requires_replace: vec![],
            planned_private: request.prior_private,
            diagnostics,
        }
    }
}

#[cfg(test)]
#[path = "./resource_cluster_endpoint_test.rs"]
mod resource_cluster_endpoint_test;
