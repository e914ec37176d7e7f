//! Test helpers for the Neptune API

#![allow(clippy::disallowed_methods)]

use super::{
    ApiError, ClusterEndpoint, CreateClusterEndpointInput, ModifyClusterEndpointInput,
    NeptuneApi, Tag, DB_CLUSTER_ENDPOINT_NOT_FOUND, DB_CLUSTER_NOT_FOUND,
};
use async_trait::async_trait;
use aws_sdk_neptune::config::retry::RetryConfig;
use aws_sdk_neptune::config::{BehaviorVersion, Credentials, Region};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

/// SDK client pointed at a mock server, without retries
pub fn create_test_client(url: &str) -> super::Client {
    let conf = aws_sdk_neptune::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(url)
        .retry_config(RetryConfig::disabled())
        .build();
    super::Client::from_conf(conf)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(CreateClusterEndpointInput),
    Modify(ModifyClusterEndpointInput),
    Delete(String),
    AddTags(String, Vec<Tag>),
    RemoveTags(String, Vec<String>),
}

#[derive(Default)]
struct State {
    clusters: BTreeSet<String>,
    endpoints: HashMap<String, ClusterEndpoint>,
    tags: HashMap<String, BTreeMap<String, String>>,
    calls: Vec<Call>,
    fail_next: HashMap<&'static str, ApiError>,
}

/// In-memory Neptune: transitional statuses settle on the next describe
#[derive(Default)]
pub struct FakeNeptune {
    state: Mutex<State>,
}

impl FakeNeptune {
    pub fn with_cluster(cluster_identifier: &str) -> Self {
        let fake = Self::default();
        fake.state
            .lock()
            .unwrap()
            .clusters
            .insert(cluster_identifier.to_string());
        fake
    }

    pub fn arn(endpoint_identifier: &str) -> String {
        format!("arn:aws:rds:us-east-1:123456789012:cluster-endpoint:{endpoint_identifier}")
    }

    /// Inserts an available endpoint directly
    pub fn insert_endpoint(&self, endpoint: ClusterEndpoint, tags: &[(&str, &str)]) {
        let mut state = self.state.lock().unwrap();
        let arn = endpoint.arn.clone().unwrap_or_default();
        state.clusters.insert(endpoint.cluster_identifier.clone());
        state.tags.insert(
            arn,
            tags.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        state
            .endpoints
            .insert(endpoint.endpoint_identifier.clone(), endpoint);
    }

    pub fn endpoint(&self, endpoint_identifier: &str) -> Option<ClusterEndpoint> {
        self.state
            .lock()
            .unwrap()
            .endpoints
            .get(endpoint_identifier)
            .cloned()
    }

    pub fn set_status(&self, endpoint_identifier: &str, status: &str) {
        if let Some(endpoint) = self
            .state
            .lock()
            .unwrap()
            .endpoints
            .get_mut(endpoint_identifier)
        {
            endpoint.status = status.to_string();
        }
    }

    pub fn remove_endpoint(&self, endpoint_identifier: &str) {
        self.state
            .lock()
            .unwrap()
            .endpoints
            .remove(endpoint_identifier);
    }

    pub fn tags(&self, arn: &str) -> BTreeMap<String, String> {
        self.state
            .lock()
            .unwrap()
            .tags
            .get(arn)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// The next call of `operation` returns `err`
    pub fn fail_next(&self, operation: &'static str, err: ApiError) {
        self.state.lock().unwrap().fail_next.insert(operation, err);
    }

    fn take_failure(state: &mut State, operation: &str) -> Result<(), ApiError> {
        match state.fail_next.remove(operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn endpoint_not_found(endpoint_identifier: &str) -> ApiError {
    ApiError::service(
        DB_CLUSTER_ENDPOINT_NOT_FOUND,
        format!("DBClusterEndpoint {endpoint_identifier} not found."),
    )
}

#[async_trait]
impl NeptuneApi for FakeNeptune {
    async fn create_db_cluster_endpoint(
        &self,
        input: CreateClusterEndpointInput,
    ) -> Result<ClusterEndpoint, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(input.clone()));
        Self::take_failure(&mut state, "create")?;

        if !state.clusters.contains(&input.cluster_identifier) {
            return Err(ApiError::service(
                DB_CLUSTER_NOT_FOUND,
                format!("DBCluster {} not found.", input.cluster_identifier),
            ));
        }

        let arn = Self::arn(&input.endpoint_identifier);
        let endpoint = ClusterEndpoint {
            cluster_identifier: input.cluster_identifier.clone(),
            endpoint_identifier: input.endpoint_identifier.clone(),
            resource_identifier: Some(format!("cluster-endpoint-{}", input.endpoint_identifier)),
            endpoint: Some(format!(
                "{}.cluster-custom-abc.us-east-1.neptune.amazonaws.com",
                input.endpoint_identifier
            )),
            status: "creating".to_string(),
            endpoint_type: Some("CUSTOM".to_string()),
            custom_endpoint_type: Some(input.endpoint_type),
            static_members: input.static_members.unwrap_or_default(),
            excluded_members: input.excluded_members.unwrap_or_default(),
            arn: Some(arn.clone()),
        };

        state.tags.insert(
            arn,
            input.tags.into_iter().map(|tag| (tag.key, tag.value)).collect(),
        );
        state
            .endpoints
            .insert(input.endpoint_identifier, endpoint.clone());
        Ok(endpoint)
    }

    async fn modify_db_cluster_endpoint(
        &self,
        input: ModifyClusterEndpointInput,
    ) -> Result<ClusterEndpoint, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Modify(input.clone()));
        Self::take_failure(&mut state, "modify")?;

        let endpoint = state
            .endpoints
            .get_mut(&input.endpoint_identifier)
            .ok_or_else(|| endpoint_not_found(&input.endpoint_identifier))?;
        if let Some(endpoint_type) = input.endpoint_type {
            endpoint.custom_endpoint_type = Some(endpoint_type);
        }
        if let Some(members) = input.static_members {
            endpoint.static_members = members;
        }
        if let Some(members) = input.excluded_members {
            endpoint.excluded_members = members;
        }
        endpoint.status = "modifying".to_string();
        Ok(endpoint.clone())
    }

    async fn delete_db_cluster_endpoint(
        &self,
        endpoint_identifier: &str,
    ) -> Result<ClusterEndpoint, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(endpoint_identifier.to_string()));
        Self::take_failure(&mut state, "delete")?;

        let endpoint = state
            .endpoints
            .get_mut(endpoint_identifier)
            .ok_or_else(|| endpoint_not_found(endpoint_identifier))?;
        endpoint.status = "deleting".to_string();
        Ok(endpoint.clone())
    }

    async fn describe_db_cluster_endpoints(
        &self,
        cluster_identifier: &str,
        endpoint_identifier: &str,
    ) -> Result<Vec<ClusterEndpoint>, ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::take_failure(&mut state, "describe")?;

        let Some(endpoint) = state.endpoints.get(endpoint_identifier).cloned() else {
            return Ok(vec![]);
        };
        if endpoint.cluster_identifier != cluster_identifier {
            return Ok(vec![]);
        }

        match endpoint.status.as_str() {
            "creating" | "modifying" => {
                if let Some(stored) = state.endpoints.get_mut(endpoint_identifier) {
                    stored.status = "available".to_string();
                }
            }
            "deleting" => {
                state.endpoints.remove(endpoint_identifier);
            }
            _ => {}
        }

        Ok(vec![endpoint])
    }

    async fn list_tags_for_resource(&self, arn: &str) -> Result<Vec<Tag>, ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::take_failure(&mut state, "list_tags")?;

        Ok(state
            .tags
            .get(arn)
            .map(|tags| tags.iter().map(|(k, v)| Tag::new(k, v)).collect())
            .unwrap_or_default())
    }

    async fn add_tags_to_resource(&self, arn: &str, tags: Vec<Tag>) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::AddTags(arn.to_string(), tags.clone()));
        Self::take_failure(&mut state, "add_tags")?;

        let entry = state.tags.entry(arn.to_string()).or_default();
        for tag in tags {
            entry.insert(tag.key, tag.value);
        }
        Ok(())
    }

    async fn remove_tags_from_resource(
        &self,
        arn: &str,
        keys: Vec<String>,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::RemoveTags(arn.to_string(), keys.clone()));
        Self::take_failure(&mut state, "remove_tags")?;

        let entry = state.tags.entry(arn.to_string()).or_default();
        for key in keys {
            entry.remove(&key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_settles_transitional_states_on_describe() {
        let fake = FakeNeptune::with_cluster("cluster-1");
        let created = fake
            .create_db_cluster_endpoint(CreateClusterEndpointInput {
                cluster_identifier: "cluster-1".to_string(),
                endpoint_identifier: "reader-1".to_string(),
                endpoint_type: "READER".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.status, "creating");

        let first = fake
            .describe_db_cluster_endpoints("cluster-1", "reader-1")
            .await
            .unwrap();
        assert_eq!(first[0].status, "creating");
        let second = fake
            .describe_db_cluster_endpoints("cluster-1", "reader-1")
            .await
            .unwrap();
        assert_eq!(second[0].status, "available");

        fake.delete_db_cluster_endpoint("reader-1").await.unwrap();
        fake.describe_db_cluster_endpoints("cluster-1", "reader-1")
            .await
            .unwrap();
        assert!(fake
            .describe_db_cluster_endpoints("cluster-1", "reader-1")
            .await
            .unwrap()
            .is_empty());
    }
}
