//! Status waiters for Neptune cluster endpoints

use super::finder::{endpoint_by_id, EndpointId, FindError};
use crate::api::{ApiError, ClusterEndpoint, NeptuneApi};
use crate::waiter::{StateChangeConf, WaitError, DEFAULT_NOT_FOUND_CHECKS};
use std::time::Duration;
use tfplug::context::Context;

pub const STATUS_AVAILABLE: &str = "available";
pub const STATUS_CREATING: &str = "creating";
pub const STATUS_DELETING: &str = "deleting";
pub const STATUS_MODIFYING: &str = "modifying";

pub const AVAILABLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const DELETED_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Timing of the endpoint waiters
#[derive(Debug, Clone, PartialEq)]
pub struct WaiterConfig {
    pub available_timeout: Duration,
    pub deleted_timeout: Duration,
    pub delay: Duration,
    /// Fixed poll interval; exponential backoff when unset
    pub poll_interval: Option<Duration>,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            available_timeout: AVAILABLE_TIMEOUT,
            deleted_timeout: DELETED_TIMEOUT,
            delay: Duration::ZERO,
            poll_interval: None,
        }
    }
}

/// Current endpoint and its status; `None` with an empty status when missing
pub async fn cluster_endpoint_status(
    conn: &dyn NeptuneApi,
    id: &EndpointId,
) -> Result<(Option<ClusterEndpoint>, String), ApiError> {
    match endpoint_by_id(conn, id).await {
        Ok(endpoint) => {
            let status = endpoint.status.clone();
            Ok((Some(endpoint), status))
        }
        Err(FindError::NotFound) => Ok((None, String::new())),
        Err(FindError::Api(err)) => Err(err),
    }
}

pub async fn cluster_endpoint_available(
    ctx: &Context,
    conn: &dyn NeptuneApi,
    id: &EndpointId,
    config: &WaiterConfig,
) -> Result<Option<ClusterEndpoint>, WaitError> {
    let conf = StateChangeConf {
        pending: &[STATUS_CREATING, STATUS_MODIFYING],
        target: &[STATUS_AVAILABLE],
        timeout: config.available_timeout,
        delay: config.delay,
        poll_interval: config.poll_interval,
        min_timeout: Duration::ZERO,
        not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
    };

    conf.wait_for_state(ctx, || cluster_endpoint_status(conn, id))
        .await
}

pub async fn cluster_endpoint_deleted(
    ctx: &Context,
    conn: &dyn NeptuneApi,
    id: &EndpointId,
    config: &WaiterConfig,
) -> Result<Option<ClusterEndpoint>, WaitError> {
    let conf = StateChangeConf {
        pending: &[STATUS_DELETING],
        target: &[],
        timeout: config.deleted_timeout,
        delay: config.delay,
        poll_interval: config.poll_interval,
        min_timeout: Duration::ZERO,
        not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
    };

    conf.wait_for_state(ctx, || cluster_endpoint_status(conn, id))
        .await
}
