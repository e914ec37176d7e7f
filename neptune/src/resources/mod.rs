//! Resource implementations

pub mod neptune;

pub use neptune::ClusterEndpointResource;
