//! Lookups of Neptune cluster endpoints by resource ID

use crate::api::{ApiError, ClusterEndpoint, NeptuneApi};
use std::fmt;
use thiserror::Error;

/// Resource ID of a cluster endpoint: `<cluster-identifier>:<endpoint-identifier>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointId {
    pub cluster_identifier: String,
    pub endpoint_identifier: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unexpected format of ID ({0}), expected cluster-identifier:endpoint-identifer")]
pub struct InvalidEndpointId(pub String);

impl EndpointId {
    pub fn new(cluster_identifier: impl Into<String>, endpoint_identifier: impl Into<String>) -> Self {
        Self {
            cluster_identifier: cluster_identifier.into(),
            endpoint_identifier: endpoint_identifier.into(),
        }
    }

    pub fn parse(id: &str) -> Result<Self, InvalidEndpointId> {
        match id.split(':').collect::<Vec<_>>().as_slice() {
            [cluster, endpoint] => Ok(Self::new(*cluster, *endpoint)),
            _ => Err(InvalidEndpointId(id.to_string())),
        }
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.cluster_identifier, self.endpoint_identifier)
    }
}

#[derive(Debug, Error)]
pub enum FindError {
    #[error("couldn't find resource")]
    NotFound,

    #[error(transparent)]
    Api(ApiError),
}

impl FindError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FindError::NotFound)
    }
}

/// Describes the endpoint; a not-found fault or an empty result is `NotFound`
pub async fn endpoint_by_id(
    conn: &dyn NeptuneApi,
    id: &EndpointId,
) -> Result<ClusterEndpoint, FindError> {
    let endpoints = conn
        .describe_db_cluster_endpoints(&id.cluster_identifier, &id.endpoint_identifier)
        .await
        .map_err(|err| {
            if err.is_not_found() {
                FindError::NotFound
            } else {
                FindError::Api(err)
            }
        })?;

    endpoints.into_iter().next().ok_or(FindError::NotFound)
}
