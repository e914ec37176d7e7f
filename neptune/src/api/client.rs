//! AWS SDK backed implementation of [`NeptuneApi`]

use super::{
    ApiError, ClusterEndpoint, CreateClusterEndpointInput, ModifyClusterEndpointInput,
    NeptuneApi, Tag,
};
use async_trait::async_trait;
use aws_sdk_neptune::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_neptune::types::Tag as SdkTag;

#[derive(Clone, Debug)]
pub struct Client {
    inner: aws_sdk_neptune::Client,
}

impl Client {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            inner: aws_sdk_neptune::Client::new(config),
        }
    }

    pub fn from_conf(conf: aws_sdk_neptune::Config) -> Self {
        Self {
            inner: aws_sdk_neptune::Client::from_conf(conf),
        }
    }
}

fn sdk_error<E, R>(err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(e) => match e.err().code() {
            Some(code) => ApiError::service(code, e.err().message().unwrap_or_default()),
            None => ApiError::Response(DisplayErrorContext(&err).to_string()),
        },
        SdkError::ResponseError(_) => ApiError::Response(DisplayErrorContext(&err).to_string()),
        _ => ApiError::Request(DisplayErrorContext(&err).to_string()),
    }
}

// Create, modify, delete and describe all return the same set of accessors
macro_rules! cluster_endpoint {
    ($src:expr) => {{
        let src = $src;
        ClusterEndpoint {
            cluster_identifier: src.db_cluster_identifier().unwrap_or_default().to_string(),
            endpoint_identifier: src
                .db_cluster_endpoint_identifier()
                .unwrap_or_default()
                .to_string(),
            resource_identifier: src
                .db_cluster_endpoint_resource_identifier()
                .map(str::to_string),
            endpoint: src.endpoint().map(str::to_string),
            status: src.status().unwrap_or_default().to_string(),
            endpoint_type: src.endpoint_type().map(str::to_string),
            custom_endpoint_type: src.custom_endpoint_type().map(str::to_string),
            static_members: src.static_members().to_vec(),
            excluded_members: src.excluded_members().to_vec(),
            arn: src.db_cluster_endpoint_arn().map(str::to_string),
        }
    }};
}

fn sdk_tags(tags: Vec<Tag>) -> Vec<SdkTag> {
    tags.into_iter()
        .map(|tag| SdkTag::builder().key(tag.key).value(tag.value).build())
        .collect()
}

#[async_trait]
impl NeptuneApi for Client {
    async fn create_db_cluster_endpoint(
        &self,
        input: CreateClusterEndpointInput,
    ) -> Result<ClusterEndpoint, ApiError> {
        tracing::debug!(
            cluster = %input.cluster_identifier,
            endpoint = %input.endpoint_identifier,
            "creating Neptune cluster endpoint"
        );

        let tags = (!input.tags.is_empty()).then(|| sdk_tags(input.tags));
        let output = self
            .inner
            .create_db_cluster_endpoint()
            .db_cluster_identifier(input.cluster_identifier)
            .db_cluster_endpoint_identifier(input.endpoint_identifier)
            .endpoint_type(input.endpoint_type)
            .set_static_members(input.static_members)
            .set_excluded_members(input.excluded_members)
            .set_tags(tags)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(cluster_endpoint!(&output))
    }

    async fn modify_db_cluster_endpoint(
        &self,
        input: ModifyClusterEndpointInput,
    ) -> Result<ClusterEndpoint, ApiError> {
        tracing::debug!(endpoint = %input.endpoint_identifier, "modifying Neptune cluster endpoint");

        let output = self
            .inner
            .modify_db_cluster_endpoint()
            .db_cluster_endpoint_identifier(input.endpoint_identifier)
            .set_endpoint_type(input.endpoint_type)
            .set_static_members(input.static_members)
            .set_excluded_members(input.excluded_members)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(cluster_endpoint!(&output))
    }

    async fn delete_db_cluster_endpoint(
        &self,
        endpoint_identifier: &str,
    ) -> Result<ClusterEndpoint, ApiError> {
        tracing::debug!(endpoint = %endpoint_identifier, "deleting Neptune cluster endpoint");

        let output = self
            .inner
            .delete_db_cluster_endpoint()
            .db_cluster_endpoint_identifier(endpoint_identifier)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(cluster_endpoint!(&output))
    }

    async fn describe_db_cluster_endpoints(
        &self,
        cluster_identifier: &str,
        endpoint_identifier: &str,
    ) -> Result<Vec<ClusterEndpoint>, ApiError> {
        let output = self
            .inner
            .describe_db_cluster_endpoints()
            .db_cluster_identifier(cluster_identifier)
            .db_cluster_endpoint_identifier(endpoint_identifier)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(output
            .db_cluster_endpoints()
            .iter()
            .map(|endpoint| cluster_endpoint!(endpoint))
            .collect())
    }

    async fn list_tags_for_resource(&self, arn: &str) -> Result<Vec<Tag>, ApiError> {
        let output = self
            .inner
            .list_tags_for_resource()
            .resource_name(arn)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(output
            .tag_list()
            .iter()
            .filter_map(|tag| Some(Tag::new(tag.key()?, tag.value().unwrap_or_default())))
            .collect())
    }

    async fn add_tags_to_resource(&self, arn: &str, tags: Vec<Tag>) -> Result<(), ApiError> {
        tracing::debug!(arn, count = tags.len(), "adding tags");

        self.inner
            .add_tags_to_resource()
            .resource_name(arn)
            .set_tags(Some(sdk_tags(tags)))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    async fn remove_tags_from_resource(
        &self,
        arn: &str,
        keys: Vec<String>,
    ) -> Result<(), ApiError> {
        tracing::debug!(arn, ?keys, "removing tags");

        self.inner
            .remove_tags_from_resource()
            .resource_name(arn)
            .set_tag_keys(Some(keys))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }
}
