//! Elasticsearch index client integration tests.
//!
//! Tests that require a running Elasticsearch instance use testcontainers
//! to spin up a real ES instance in Docker.
//!
//! Run with: `cargo test -p esmap-index --features elasticsearch -- es_integration`

#![cfg(feature = "elasticsearch")]

use esmap_index::client::{ElasticsearchAuth, ElasticsearchConfig, ElasticsearchIndexClient};
use esmap_index::mapping::MappingDescriptor;
use esmap_index::{ClientError, IndexClient};

// ============================================================================
// Client Configuration Tests (no ES instance required)
// ============================================================================

#[test]
fn test_elasticsearch_config_serialization() {
    let config = ElasticsearchConfig {
        nodes: vec!["http://es1:9200".to_string()],
        index_prefix: "test".to_string(),
        auth: Some(ElasticsearchAuth::Bearer {
            token: "secret".to_string(),
        }),
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: ElasticsearchConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_client_creation_does_not_connect() {
    let client = ElasticsearchIndexClient::new(ElasticsearchConfig {
        nodes: vec!["http://unreachable.invalid:9200".to_string()],
        ..Default::default()
    });
    assert!(client.is_ok());
    assert_eq!(client.unwrap().name(), "elasticsearch");
}

#[tokio::test]
async fn test_unreachable_cluster_is_connection_error() {
    let client = ElasticsearchIndexClient::new(ElasticsearchConfig {
        nodes: vec!["http://127.0.0.1:1".to_string()],
        request_timeout_ms: 500,
        ..Default::default()
    })
    .unwrap();

    let err = client
        .exists(&MappingDescriptor::new("User", "users"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Connection { .. }));
}

// ============================================================================
// Integration Tests (requires Docker for testcontainers)
// ============================================================================

/// Integration tests that require a real Elasticsearch instance via testcontainers.
///
/// Skip if no Docker:
///   cargo test -p esmap-index --features elasticsearch -- --skip es_integration
#[cfg(test)]
mod es_integration {
    use serde_json::json;

    use esmap_index::client::{ElasticsearchConfig, ElasticsearchIndexClient};
    use esmap_index::mapping::{IndexSettings, MappingCatalog, MappingDescriptor, PropertyDescriptor};
    use esmap_index::reconcile::{
        IndexReconciler, Intent, NoOpReason, OutcomeStatus, ReconcileAction, SelectionCriterion,
    };
    use esmap_index::{ClientErrorKind, IndexClient};

    use testcontainers::ImageExt;
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::elastic_search::ElasticSearch;
    use tokio::sync::OnceCell;

    /// Shared Elasticsearch container reused across all tests in this module.
    struct SharedEs {
        host: String,
        port: u16,
        /// Kept alive for the duration of the test binary; dropped at process exit.
        _container: testcontainers::ContainerAsync<ElasticSearch>,
    }

    static SHARED_ES: OnceCell<SharedEs> = OnceCell::const_new();

    async fn shared_es() -> &'static SharedEs {
        SHARED_ES
            .get_or_init(|| async {
                let container = ElasticSearch::default()
                    .with_env_var("ES_JAVA_OPTS", "-Xms256m -Xmx256m")
                    .with_startup_timeout(std::time::Duration::from_secs(120))
                    .start()
                    .await
                    .expect("Failed to start Elasticsearch container");

                let port = container
                    .get_host_port_ipv4(9200)
                    .await
                    .expect("Failed to get host port");

                let host = container
                    .get_host()
                    .await
                    .expect("Failed to get host")
                    .to_string();

                SharedEs {
                    host,
                    port,
                    _container: container,
                }
            })
            .await
    }

    /// Creates a client connected to the shared container.
    ///
    /// Each call uses a unique index prefix so tests never see each other's indexes.
    async fn create_client() -> ElasticsearchIndexClient {
        let es = shared_es().await;
        let unique_prefix = format!("esmap_{}", uuid::Uuid::new_v4().simple());

        ElasticsearchIndexClient::new(ElasticsearchConfig {
            nodes: vec![format!("http://{}:{}", es.host, es.port)],
            index_prefix: unique_prefix,
            index_settings: IndexSettings {
                number_of_replicas: 0, // single-node, no replicas needed
                ..Default::default()
            },
            ..Default::default()
        })
        .expect("Failed to create ElasticsearchIndexClient")
    }

    fn catalog() -> MappingCatalog {
        MappingCatalog::from_descriptors(vec![
            MappingDescriptor::new("User", "users")
                .with_property(PropertyDescriptor::new("email", "keyword"))
                .with_property(PropertyDescriptor::new("name", "text")),
            MappingDescriptor::new("Order", "orders").with_property(PropertyDescriptor::nested(
                "lines",
                vec![
                    PropertyDescriptor::new("sku", "keyword"),
                    PropertyDescriptor::new("quantity", "integer"),
                ],
            )),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn es_integration_server_info() {
        let client = create_client().await;
        let info = client.server_info().await.unwrap();
        assert!(info.is_compatible(), "unexpected version {}", info.version);
    }

    #[tokio::test]
    async fn es_integration_create_exists_delete() {
        let client = create_client().await;
        let users = MappingDescriptor::new("User", "users")
            .with_property(PropertyDescriptor::new("email", "keyword"));

        assert!(!client.exists(&users).await.unwrap());

        let body = client.build_mapping_body(&users).unwrap();
        client.create(&users, &body).await.unwrap();
        assert!(client.exists(&users).await.unwrap());

        let err = client.create(&users, &body).await.unwrap_err();
        assert_eq!(err.kind(), ClientErrorKind::AlreadyExists);

        client.delete(&users).await.unwrap();
        assert!(!client.exists(&users).await.unwrap());

        let err = client.delete(&users).await.unwrap_err();
        assert_eq!(err.kind(), ClientErrorKind::IndexNotFound);
    }

    #[tokio::test]
    async fn es_integration_rejected_mapping() {
        let client = create_client().await;
        let users = MappingDescriptor::new("User", "users");

        let err = client
            .create(
                &users,
                &json!({"mappings": {"properties": {"email": {"type": "keyword", "bogus": 1}}}}),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ClientErrorKind::Rejected);
    }

    #[tokio::test]
    async fn es_integration_reconcile_round() {
        let client = create_client().await;
        let catalog = catalog();
        let reconciler = IndexReconciler::new(&catalog, &client);

        let report = reconciler
            .run(&SelectionCriterion::All, Intent::Create { force: false })
            .await
            .unwrap();
        assert_eq!(report.applied(), 2);

        let report = reconciler
            .run(&SelectionCriterion::All, Intent::Create { force: false })
            .await
            .unwrap();
        assert_eq!(report.no_ops(), 2);
        assert_eq!(
            report.outcomes()[0].status,
            OutcomeStatus::NoOp(NoOpReason::AlreadyExists)
        );

        let report = reconciler
            .run(
                &SelectionCriterion::ByEntity("Order".to_string()),
                Intent::Create { force: true },
            )
            .await
            .unwrap();
        assert_eq!(report.outcomes()[0].action, ReconcileAction::Recreate);
        assert_eq!(report.outcomes()[0].status, OutcomeStatus::Applied);

        let report = reconciler
            .run(&SelectionCriterion::All, Intent::Delete)
            .await
            .unwrap();
        assert_eq!(report.applied(), 2);
        assert!(!report.has_failures());
    }
}
