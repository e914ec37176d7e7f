//! Neptune resources

pub mod finder;
pub mod resource_cluster_endpoint;
pub mod waiter;

pub use resource_cluster_endpoint::ClusterEndpointResource;
