//! Neptune control-plane API
//!
//! Resources talk to Neptune through the [`NeptuneApi`] trait. [`Client`]
//! implements it on top of the AWS SDK; tests substitute an in-memory fake.

pub mod client;
pub mod error;

#[cfg(test)]
pub mod test_helpers;

use async_trait::async_trait;

pub use client::Client;
pub use error::{ApiError, DB_CLUSTER_ENDPOINT_NOT_FOUND, DB_CLUSTER_NOT_FOUND};

/// A custom endpoint of a Neptune DB cluster as reported by the service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterEndpoint {
    pub cluster_identifier: String,
    pub endpoint_identifier: String,
    pub resource_identifier: Option<String>,
    /// DNS name clients connect to
    pub endpoint: Option<String>,
    pub status: String,
    /// Always CUSTOM for user-created endpoints
    pub endpoint_type: Option<String>,
    /// READER, WRITER or ANY
    pub custom_endpoint_type: Option<String>,
    pub static_members: Vec<String>,
    pub excluded_members: Vec<String>,
    pub arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateClusterEndpointInput {
    pub cluster_identifier: String,
    pub endpoint_identifier: String,
    pub endpoint_type: String,
    pub static_members: Option<Vec<String>>,
    pub excluded_members: Option<Vec<String>>,
    pub tags: Vec<Tag>,
}

/// Fields left as None are not changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifyClusterEndpointInput {
    pub endpoint_identifier: String,
    pub endpoint_type: Option<String>,
    pub static_members: Option<Vec<String>>,
    pub excluded_members: Option<Vec<String>>,
}

#[async_trait]
pub trait NeptuneApi: Send + Sync {
    async fn create_db_cluster_endpoint(
        &self,
        input: CreateClusterEndpointInput,
    ) -> Result<ClusterEndpoint, ApiError>;

    async fn modify_db_cluster_endpoint(
        &self,
        input: ModifyClusterEndpointInput,
    ) -> Result<ClusterEndpoint, ApiError>;

    async fn delete_db_cluster_endpoint(
        &self,
        endpoint_identifier: &str,
    ) -> Result<ClusterEndpoint, ApiError>;

    async fn describe_db_cluster_endpoints(
        &self,
        cluster_identifier: &str,
        endpoint_identifier: &str,
    ) -> Result<Vec<ClusterEndpoint>, ApiError>;

    async fn list_tags_for_resource(&self, arn: &str) -> Result<Vec<Tag>, ApiError>;

    async fn add_tags_to_resource(&self, arn: &str, tags: Vec<Tag>) -> Result<(), ApiError>;

    async fn remove_tags_from_resource(&self, arn: &str, keys: Vec<String>)
        -> Result<(), ApiError>;
}
