#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::super::*;
    use crate::api::test_helpers::{Call, FakeNeptune};
    use crate::api::{ApiError, ClusterEndpoint, ModifyClusterEndpointInput, DB_CLUSTER_NOT_FOUND};
    use crate::resources::neptune::waiter::WaiterConfig;
    use crate::tags::{DefaultTagsConfig, IgnoreTagsConfig};
    use crate::NeptuneProviderData;
    use std::collections::{BTreeMap, BTreeSet, HashMap};
    use std::sync::Arc;
    use std::time::Duration;
    use tfplug::context::Context;
    use tfplug::resource::{
        ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest,
        ImportResourceStateRequest, ModifyPlanRequest, ReadResourceRequest, Resource,
        ResourceMetadataRequest, ResourceSchemaRequest, ResourceWithConfigure,
        ResourceWithImportState, ResourceWithModifyPlan, UpdateResourceRequest,
    };
    use tfplug::types::{AttributePath, ClientCapabilities, Dynamic, DynamicValue};

    const ARN_SUFFIX: &str = "reader-1";

    fn s(value: &str) -> Dynamic {
        Dynamic::String(value.to_string())
    }

    fn state(entries: Vec<(&str, Dynamic)>) -> DynamicValue {
        DynamicValue::new(Dynamic::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        ))
    }

    fn get<'a>(value: &'a DynamicValue, name: &str) -> &'a Dynamic {
        value.get(&AttributePath::new(name)).unwrap()
    }

    fn string_map(value: &DynamicValue, name: &str) -> BTreeMap<String, String> {
        value
            .get_string_map(&AttributePath::new(name))
            .unwrap()
            .into_iter()
            .collect()
    }

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn provider_data(fake: &Arc<FakeNeptune>, region: &str) -> NeptuneProviderData {
        NeptuneProviderData {
            waiter: WaiterConfig {
                poll_interval: Some(Duration::from_millis(1)),
                ..Default::default()
            },
            ..NeptuneProviderData::new(fake.clone(), region)
        }
    }

    async fn configured(data: NeptuneProviderData) -> ClusterEndpointResource {
        let mut resource = ClusterEndpointResource::new();
        let response = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(Arc::new(data)),
                },
            )
            .await;
        assert!(response.diagnostics.is_empty());
        resource
    }

    fn available_endpoint(static_members: &[&str]) -> ClusterEndpoint {
        ClusterEndpoint {
            cluster_identifier: "cluster-1".to_string(),
            endpoint_identifier: "reader-1".to_string(),
            resource_identifier: Some("cluster-endpoint-reader-1".to_string()),
            endpoint: Some("reader-1.cluster-custom-abc.us-east-1.neptune.amazonaws.com".to_string()),
            status: "available".to_string(),
            endpoint_type: Some("CUSTOM".to_string()),
            custom_endpoint_type: Some("READER".to_string()),
            static_members: static_members.iter().map(|m| m.to_string()).collect(),
            excluded_members: vec![],
            arn: Some(FakeNeptune::arn(ARN_SUFFIX)),
        }
    }

    fn planned_create(cluster: &str, tags: Dynamic) -> DynamicValue {
        state(vec![
            ("id", Dynamic::Unknown),
            ("arn", Dynamic::Unknown),
            ("cluster_identifier", s(cluster)),
            ("cluster_endpoint_identifier", s("reader-1")),
            ("endpoint", Dynamic::Unknown),
            ("endpoint_type", s("READER")),
            (
                "static_members",
                Dynamic::string_list(["instance-2", "instance-1"]),
            ),
            ("excluded_members", Dynamic::Null),
            ("tags", tags),
            ("tags_all", Dynamic::Unknown),
        ])
    }

    fn prior_state(static_members: &[&str], tags: &[(&str, &str)]) -> DynamicValue {
        state(vec![
            ("id", s("cluster-1:reader-1")),
            ("arn", s(&FakeNeptune::arn(ARN_SUFFIX))),
            ("cluster_identifier", s("cluster-1")),
            ("cluster_endpoint_identifier", s("reader-1")),
            (
                "endpoint",
                s("reader-1.cluster-custom-abc.us-east-1.neptune.amazonaws.com"),
            ),
            ("endpoint_type", s("READER")),
            ("static_members", Dynamic::string_list(static_members.iter().copied())),
            ("excluded_members", Dynamic::Null),
            ("tags", Dynamic::string_map(tags.iter().copied())),
            ("tags_all", Dynamic::string_map(tags.iter().copied())),
        ])
    }

    fn create_request(planned_state: DynamicValue) -> CreateResourceRequest {
        CreateResourceRequest {
            type_name: TYPE_NAME.to_string(),
            config: planned_state.clone(),
            planned_state,
            planned_private: vec![],
        }
    }

    fn read_request(current_state: DynamicValue) -> ReadResourceRequest {
        ReadResourceRequest {
            type_name: TYPE_NAME.to_string(),
            current_state,
            private: vec![],
            client_capabilities: ClientCapabilities::default(),
        }
    }

    fn update_request(prior_state: DynamicValue, planned_state: DynamicValue) -> UpdateResourceRequest {
        UpdateResourceRequest {
            type_name: TYPE_NAME.to_string(),
            prior_state,
            config: planned_state.clone(),
            planned_state,
            planned_private: vec![],
        }
    }

    fn modify_plan_request(prior_state: DynamicValue, proposed: DynamicValue) -> ModifyPlanRequest {
        ModifyPlanRequest {
            type_name: TYPE_NAME.to_string(),
            config: proposed.clone(),
            prior_state,
            proposed_new_state: proposed,
            prior_private: vec![],
        }
    }

    #[tokio::test]
    async fn test_resource_metadata() {
        let resource = ClusterEndpointResource::new();
        let response = resource
            .metadata(Context::new(), ResourceMetadataRequest)
            .await;

        assert_eq!(response.type_name, "aws_neptune_cluster_endpoint");
    }

    #[tokio::test]
    async fn test_resource_schema() {
        let resource = ClusterEndpointResource::new();
        let response = resource.schema(Context::new(), ResourceSchemaRequest).await;

        assert!(response.diagnostics.is_empty());
        let schema = response.schema;
        for name in ["cluster_identifier", "cluster_endpoint_identifier", "endpoint_type"] {
            let attribute = schema.attribute(name).unwrap();
            assert!(attribute.required, "{name} should be required");
            assert_eq!(attribute.plan_modifiers.len(), 1);
        }
        for name in ["id", "arn", "endpoint", "tags_all"] {
            assert!(schema.attribute(name).unwrap().computed, "{name} should be computed");
        }
        for name in ["static_members", "excluded_members", "tags"] {
            assert!(schema.attribute(name).unwrap().optional, "{name} should be optional");
        }
        assert_eq!(schema.block.attributes.len(), ATTRIBUTES.len());
    }

    #[test]
    fn test_schema_validators() {
        let schema = ClusterEndpointResource::schema_static();
        let run = |name: &str, value: &str| {
            let mut diagnostics = vec![];
            for validator in &schema.attribute(name).unwrap().validators {
                validator.validate(&s(value), &AttributePath::new(name), &mut diagnostics);
            }
            diagnostics
        };

        assert!(run("cluster_identifier", "cluster-1").is_empty());
        assert_eq!(run("cluster_identifier", "Cluster--").len(), 4);
        assert_eq!(run("cluster_endpoint_identifier", "1reader").len(), 1);
        for endpoint_type in ENDPOINT_TYPES {
            assert!(run("endpoint_type", endpoint_type).is_empty());
        }
        assert_eq!(run("endpoint_type", "CUSTOM").len(), 1);
    }

    #[tokio::test]
    async fn test_configure_rejects_foreign_provider_data() {
        let mut resource = ClusterEndpointResource::new();
        let response = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(Arc::new("not provider data".to_string())),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Invalid provider data");
    }

    #[tokio::test]
    async fn test_create_without_provider_data() {
        let resource = ClusterEndpointResource::new();
        let response = resource
            .create(Context::new(), create_request(planned_create("cluster-1", Dynamic::Null)))
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Provider not configured");
        assert!(response.new_state.is_null());
    }

    #[tokio::test]
    async fn test_create_successful() {
        let fake = Arc::new(FakeNeptune::with_cluster("cluster-1"));
        let mut data = provider_data(&fake, "us-east-1");
        data.default_tags = DefaultTagsConfig {
            tags: [("env", "prod")].into_iter().collect(),
        };
        let resource = configured(data).await;

        let response = resource
            .create(
                Context::new(),
                create_request(planned_create(
                    "cluster-1",
                    Dynamic::string_map([("Name", "reader")]),
                )),
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let new_state = response.new_state;
        let arn = FakeNeptune::arn(ARN_SUFFIX);
        assert_eq!(get(&new_state, "id"), &s("cluster-1:reader-1"));
        assert_eq!(get(&new_state, "arn"), &s(&arn));
        assert_eq!(
            get(&new_state, "endpoint"),
            &s("reader-1.cluster-custom-abc.us-east-1.neptune.amazonaws.com")
        );
        assert_eq!(get(&new_state, "endpoint_type"), &s("READER"));
        assert_eq!(
            get(&new_state, "static_members"),
            &Dynamic::string_list(["instance-1", "instance-2"])
        );
        assert_eq!(get(&new_state, "excluded_members"), &Dynamic::Null);
        assert_eq!(string_map(&new_state, "tags"), map(&[("Name", "reader")]));
        assert_eq!(
            string_map(&new_state, "tags_all"),
            map(&[("Name", "reader"), ("env", "prod")])
        );

        assert_eq!(fake.tags(&arn), map(&[("Name", "reader"), ("env", "prod")]));
        assert_eq!(fake.endpoint("reader-1").unwrap().status, "available");
    }

    #[tokio::test]
    async fn test_create_without_tags_leaves_tags_null() {
        let fake = Arc::new(FakeNeptune::with_cluster("cluster-1"));
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .create(Context::new(), create_request(planned_create("cluster-1", Dynamic::Null)))
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(get(&response.new_state, "tags"), &Dynamic::Null);
        assert_eq!(get(&response.new_state, "tags_all"), &Dynamic::Null);
        match &fake.calls()[0] {
            Call::Create(input) => assert!(input.tags.is_empty()),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_missing_cluster() {
        let fake = Arc::new(FakeNeptune::default());
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .create(Context::new(), create_request(planned_create("cluster-2", Dynamic::Null)))
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "error creating Neptune Cluster Endpoint: DBClusterNotFoundFault: DBCluster cluster-2 not found."
        );
        assert!(response.new_state.is_null());
    }

    #[tokio::test]
    async fn test_create_wait_failure_keeps_created_endpoint() {
        let fake = Arc::new(FakeNeptune::with_cluster("cluster-1"));
        fake.fail_next("describe", ApiError::service("Throttling", "slow down"));
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .create(Context::new(), create_request(planned_create("cluster-1", Dynamic::Null)))
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "error waiting for Neptune Cluster Endpoint (\"cluster-1:reader-1\") to be Available: Throttling: slow down"
        );
        assert_eq!(get(&response.new_state, "id"), &s("cluster-1:reader-1"));
        assert_eq!(get(&response.new_state, "arn"), &Dynamic::Null);
        assert!(response.new_state.value.is_fully_known());
    }

    #[tokio::test]
    async fn test_read_without_provider_data() {
        let resource = ClusterEndpointResource::new();
        let current = prior_state(&[], &[]);
        let response = resource
            .read(Context::new(), read_request(current.clone()))
            .await;

        assert_eq!(response.diagnostics[0].summary, "Provider not configured");
        assert_eq!(response.new_state, Some(current));
    }

    #[tokio::test]
    async fn test_read_successful() {
        let fake = Arc::new(FakeNeptune::default());
        fake.insert_endpoint(
            available_endpoint(&["instance-1"]),
            &[
                ("Name", "reader"),
                ("env", "prod"),
                ("owner", "data-team"),
                ("aws:cloudformation:stack-name", "stack"),
            ],
        );
        let mut data = provider_data(&fake, "us-east-1");
        data.default_tags = DefaultTagsConfig {
            tags: [("env", "prod")].into_iter().collect(),
        };
        data.ignore_tags = IgnoreTagsConfig {
            keys: BTreeSet::from(["owner".to_string()]),
            key_prefixes: vec![],
        };
        let resource = configured(data).await;

        let response = resource
            .read(
                Context::new(),
                read_request(state(vec![("id", s("cluster-1:reader-1"))])),
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let new_state = response.new_state.unwrap();
        assert_eq!(get(&new_state, "cluster_identifier"), &s("cluster-1"));
        assert_eq!(get(&new_state, "cluster_endpoint_identifier"), &s("reader-1"));
        assert_eq!(get(&new_state, "endpoint_type"), &s("READER"));
        assert_eq!(
            get(&new_state, "static_members"),
            &Dynamic::string_list(["instance-1"])
        );
        assert_eq!(string_map(&new_state, "tags"), map(&[("Name", "reader")]));
        assert_eq!(
            string_map(&new_state, "tags_all"),
            map(&[("Name", "reader"), ("env", "prod")])
        );
    }

    #[tokio::test]
    async fn test_read_endpoint_not_found() {
        let fake = Arc::new(FakeNeptune::with_cluster("cluster-1"));
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .read(Context::new(), read_request(prior_state(&[], &[])))
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_read_cluster_not_found() {
        let fake = Arc::new(FakeNeptune::default());
        fake.fail_next("describe", ApiError::service(DB_CLUSTER_NOT_FOUND, "gone"));
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .read(Context::new(), read_request(prior_state(&[], &[])))
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn test_read_invalid_id() {
        let fake = Arc::new(FakeNeptune::default());
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .read(
                Context::new(),
                read_request(state(vec![("id", s("reader-1"))])),
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "error describing Neptune Cluster Endpoint (reader-1): unexpected format of ID (reader-1), expected cluster-identifier:endpoint-identifer"
        );
    }

    #[tokio::test]
    async fn test_read_outside_aws_partition_skips_tags() {
        let fake = Arc::new(FakeNeptune::default());
        fake.insert_endpoint(available_endpoint(&[]), &[("Name", "reader")]);
        fake.fail_next("list_tags", ApiError::service("AccessDenied", "no tagging here"));
        let resource = configured(provider_data(&fake, "cn-north-1")).await;

        let response = resource
            .read(Context::new(), read_request(prior_state(&[], &[("Name", "reader")])))
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let new_state = response.new_state.unwrap();
        assert_eq!(string_map(&new_state, "tags"), map(&[("Name", "reader")]));
        assert_eq!(get(&new_state, "tags_all"), &Dynamic::Null);
    }

    #[tokio::test]
    async fn test_create_outside_aws_partition_sends_no_tags() {
        let fake = Arc::new(FakeNeptune::with_cluster("cluster-1"));
        let mut data = provider_data(&fake, "cn-north-1");
        data.default_tags = DefaultTagsConfig {
            tags: [("env", "prod")].into_iter().collect(),
        };
        let resource = configured(data).await;

        let planned = planned_create("cluster-1", Dynamic::string_map([("Name", "reader")]));
        let response = resource
            .create(Context::new(), create_request(planned.clone()))
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(get(&response.new_state, "tags"), get(&planned, "tags"));
        assert_eq!(get(&response.new_state, "tags_all"), &Dynamic::Null);

        let calls = fake.calls();
        assert_eq!(calls.len(), 1, "{calls:?}");
        match &calls[0] {
            Call::Create(input) => assert!(input.tags.is_empty()),
            other => panic!("unexpected call {other:?}"),
        }
        assert!(fake.tags(&FakeNeptune::arn(ARN_SUFFIX)).is_empty());
    }

    #[tokio::test]
    async fn test_update_outside_aws_partition_skips_tags() {
        let fake = Arc::new(FakeNeptune::default());
        fake.insert_endpoint(available_endpoint(&[]), &[]);
        let resource = configured(provider_data(&fake, "us-gov-west-1")).await;

        let mut prior = prior_state(&[], &[("a", "1")]);
        prior
            .set_value(&AttributePath::new("tags_all"), Dynamic::Null)
            .unwrap();
        let mut planned = prior_state(&[], &[("b", "2")]);
        planned
            .set_value(&AttributePath::new("tags_all"), Dynamic::Null)
            .unwrap();

        let response = resource
            .update(Context::new(), update_request(prior, planned.clone()))
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert!(fake.calls().is_empty(), "{:?}", fake.calls());
        assert_eq!(get(&response.new_state, "tags"), get(&planned, "tags"));
        assert_eq!(get(&response.new_state, "tags_all"), &Dynamic::Null);
    }

    #[tokio::test]
    async fn test_update_members() {
        let fake = Arc::new(FakeNeptune::default());
        fake.insert_endpoint(available_endpoint(&["instance-1"]), &[]);
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let prior = prior_state(&["instance-1"], &[]);
        let mut planned = prior.clone();
        planned
            .set_value(
                &AttributePath::new("static_members"),
                Dynamic::string_list(["instance-3"]),
            )
            .unwrap();

        let response = resource
            .update(Context::new(), update_request(prior, planned))
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            fake.calls(),
            vec![Call::Modify(ModifyClusterEndpointInput {
                endpoint_identifier: "reader-1".to_string(),
                endpoint_type: None,
                static_members: Some(vec!["instance-3".to_string()]),
                excluded_members: None,
            })]
        );
        assert_eq!(
            get(&response.new_state, "static_members"),
            &Dynamic::string_list(["instance-3"])
        );
        assert_eq!(fake.endpoint("reader-1").unwrap().status, "available");
    }

    #[tokio::test]
    async fn test_update_reordered_members_is_a_no_op() {
        let fake = Arc::new(FakeNeptune::default());
        fake.insert_endpoint(available_endpoint(&["instance-1", "instance-2"]), &[]);
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let prior = prior_state(&["instance-1", "instance-2"], &[]);
        let planned = prior_state(&["instance-2", "instance-1"], &[]);

        let response = resource
            .update(Context::new(), update_request(prior, planned))
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_tags() {
        let fake = Arc::new(FakeNeptune::default());
        let arn = FakeNeptune::arn(ARN_SUFFIX);
        fake.insert_endpoint(available_endpoint(&[]), &[("a", "1"), ("b", "2")]);
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let prior = prior_state(&[], &[("a", "1"), ("b", "2")]);
        let planned = prior_state(&[], &[("b", "3"), ("c", "4")]);

        let response = resource
            .update(Context::new(), update_request(prior, planned))
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert!(matches!(&fake.calls()[0], Call::RemoveTags(a, keys) if a == &arn && keys == &vec!["a".to_string()]));
        assert_eq!(fake.tags(&arn), map(&[("b", "3"), ("c", "4")]));
        assert_eq!(
            string_map(&response.new_state, "tags_all"),
            map(&[("b", "3"), ("c", "4")])
        );
    }

    #[tokio::test]
    async fn test_update_modify_failure_keeps_prior_state() {
        let fake = Arc::new(FakeNeptune::default());
        fake.insert_endpoint(available_endpoint(&["instance-1"]), &[]);
        fake.fail_next(
            "modify",
            ApiError::service("InvalidDBClusterEndpointStateFault", "busy"),
        );
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let prior = prior_state(&["instance-1"], &[]);
        let planned = prior_state(&["instance-2"], &[]);

        let response = resource
            .update(Context::new(), update_request(prior.clone(), planned))
            .await;

        assert_eq!(
            response.diagnostics[0].summary,
            "error updating Neptune Cluster Endpoint (\"cluster-1:reader-1\"): InvalidDBClusterEndpointStateFault: busy"
        );
        assert_eq!(response.new_state, prior);
    }

    #[tokio::test]
    async fn test_delete_successful() {
        let fake = Arc::new(FakeNeptune::default());
        fake.insert_endpoint(available_endpoint(&[]), &[]);
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    prior_state: prior_state(&[], &[]),
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(fake.calls(), vec![Call::Delete("reader-1".to_string())]);
        assert!(fake.endpoint("reader-1").is_none());
    }

    #[tokio::test]
    async fn test_delete_already_gone() {
        let fake = Arc::new(FakeNeptune::default());
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    prior_state: prior_state(&[], &[]),
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let fake = Arc::new(FakeNeptune::default());
        fake.insert_endpoint(available_endpoint(&[]), &[]);
        fake.fail_next("delete", ApiError::service("AccessDenied", "no"));
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    prior_state: prior_state(&[], &[]),
                    planned_private: vec![],
                },
            )
            .await;

        assert_eq!(
            response.diagnostics[0].summary,
            "Neptune Cluster Endpoint cannot be deleted: AccessDenied: no"
        );
        assert!(fake.endpoint("reader-1").is_some());
    }

    #[tokio::test]
    async fn test_import_state() {
        let resource = ClusterEndpointResource::new();
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: TYPE_NAME.to_string(),
                    id: "cluster-1:reader-1".to_string(),
                    client_capabilities: ClientCapabilities::default(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.imported_resources.len(), 1);
        let imported = &response.imported_resources[0].state;
        assert_eq!(get(imported, "id"), &s("cluster-1:reader-1"));
        for name in ATTRIBUTES.iter().filter(|name| **name != "id") {
            assert_eq!(get(imported, name), &Dynamic::Null, "{name}");
        }
    }

    #[tokio::test]
    async fn test_modify_plan_tags_all() {
        let fake = Arc::new(FakeNeptune::default());
        let mut data = provider_data(&fake, "us-east-1");
        data.default_tags = DefaultTagsConfig {
            tags: [("env", "prod")].into_iter().collect(),
        };
        let resource = configured(data).await;

        let proposed = planned_create("cluster-1", Dynamic::string_map([("Name", "reader")]));
        let response = resource
            .modify_plan(Context::new(), modify_plan_request(DynamicValue::null(), proposed))
            .await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(
            string_map(&response.planned_state, "tags_all"),
            map(&[("Name", "reader"), ("env", "prod")])
        );
    }

    #[tokio::test]
    async fn test_modify_plan_unknown_tags() {
        let fake = Arc::new(FakeNeptune::default());
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let proposed = planned_create(
            "cluster-1",
            Dynamic::Map(HashMap::from([("Name".to_string(), Dynamic::Unknown)])),
        );
        let response = resource
            .modify_plan(Context::new(), modify_plan_request(DynamicValue::null(), proposed))
            .await;

        assert_eq!(get(&response.planned_state, "tags_all"), &Dynamic::Unknown);
    }

    #[tokio::test]
    async fn test_modify_plan_empty_tags_stay_null() {
        let fake = Arc::new(FakeNeptune::default());
        let resource = configured(provider_data(&fake, "us-east-1")).await;

        let mut prior = prior_state(&[], &[]);
        prior
            .set_null(&AttributePath::new("tags_all"))
            .unwrap();
        let mut proposed = prior.clone();
        proposed.set_null(&AttributePath::new("tags")).unwrap();

        let response = resource
            .modify_plan(Context::new(), modify_plan_request(prior, proposed))
            .await;
        assert_eq!(get(&response.planned_state, "tags_all"), &Dynamic::Null);

        // an empty map in state stays an empty map
        let prior = prior_state(&[], &[]);
        let response = resource
            .modify_plan(Context::new(), modify_plan_request(prior.clone(), prior))
            .await;
        assert_eq!(
            get(&response.planned_state, "tags_all"),
            &Dynamic::Map(HashMap::new())
        );
    }

    #[tokio::test]
    async fn test_modify_plan_outside_aws_partition() {
        let fake = Arc::new(FakeNeptune::default());
        let resource = configured(provider_data(&fake, "us-gov-west-1")).await;

        let proposed = planned_create("cluster-1", Dynamic::string_map([("Name", "reader")]));
        let response = resource
            .modify_plan(Context::new(), modify_plan_request(DynamicValue::null(), proposed))
            .await;

        assert_eq!(get(&response.planned_state, "tags_all"), &Dynamic::Null);
    }

    #[tokio::test]
    async fn test_modify_plan_without_provider_data() {
        let resource = ClusterEndpointResource::new();
        let proposed = planned_create("cluster-1", Dynamic::Null);

        let response = resource
            .modify_plan(
                Context::new(),
                modify_plan_request(DynamicValue::null(), proposed.clone()),
            )
            .await;

        assert_eq!(response.planned_state, proposed);
    }
}
