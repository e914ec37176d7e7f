//! Provider data structure passed to resources

use crate::api::NeptuneApi;
use crate::resources::neptune::waiter::WaiterConfig;
use crate::tags::{DefaultTagsConfig, IgnoreTagsConfig};
use std::sync::Arc;

/// Partition where resource tagging is supported
pub const AWS_PARTITION: &str = "aws";

#[derive(Clone)]
pub struct NeptuneProviderData {
    pub conn: Arc<dyn NeptuneApi>,
    pub region: String,
    pub partition: String,
    pub default_tags: DefaultTagsConfig,
    pub ignore_tags: IgnoreTagsConfig,
    pub waiter: WaiterConfig,
}

impl NeptuneProviderData {
    pub fn new(conn: Arc<dyn NeptuneApi>, region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            conn,
            partition: crate::config::partition_for_region(&region).to_string(),
            region,
            default_tags: DefaultTagsConfig::default(),
            ignore_tags: IgnoreTagsConfig::default(),
            waiter: WaiterConfig::default(),
        }
    }

    /// Tags are only supported in the commercial partition
    pub fn tags_supported(&self) -> bool {
        self.partition == AWS_PARTITION
    }
}
