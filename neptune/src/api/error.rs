use thiserror::Error;

/// Error code returned when the cluster endpoint does not exist
pub const DB_CLUSTER_ENDPOINT_NOT_FOUND: &str = "DBClusterEndpointNotFoundFault";

/// Error code returned when the owning cluster does not exist
pub const DB_CLUSTER_NOT_FOUND: &str = "DBClusterNotFoundFault";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with an error code
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected response: {0}")]
    Response(String),
}

impl ApiError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_code(&self, code: &str) -> bool {
        self.code() == Some(code)
    }

    /// Either the endpoint or its cluster is gone
    pub fn is_not_found(&self) -> bool {
        self.is_code(DB_CLUSTER_ENDPOINT_NOT_FOUND) || self.is_code(DB_CLUSTER_NOT_FOUND)
    }
}
