//! Query profiling.
//!
//! Every index client call can be reported to a [`QueryObserver`] by wrapping
//! the client in an [`ObservedIndexClient`]. [`QueryCollector`] is the stock
//! observer: it keeps the records in memory so a command can print a profile
//! once it finishes. [`ProfileSnapshot`] bundles the collected queries with
//! per-entity mapping diagnostics and cluster information.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;

use crate::client::{ClientOperation, IndexClient, ServerInfo};
use crate::error::{ClientError, MappingBuildError};
use crate::mapping::{MappingCatalog, MappingDescriptor};

/// One observed index client call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    /// Client operation.
    pub operation: ClientOperation,
    /// Physical index name; empty for cluster-level calls.
    pub index: String,
    /// Wall-clock start of the call.
    pub started_at: DateTime<Utc>,
    /// Call duration.
    pub duration: Duration,
    /// Error message when the call failed.
    pub error: Option<String>,
}

impl QueryRecord {
    /// Returns true if the call succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Receives a record for every observed index client call.
pub trait QueryObserver: Send + Sync {
    /// Called once per completed client call.
    fn on_query(&self, record: &QueryRecord);
}

/// In-memory [`QueryObserver`].
#[derive(Debug, Default)]
pub struct QueryCollector {
    records: Mutex<Vec<QueryRecord>>,
}

impl QueryCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every record so far.
    pub fn records(&self) -> Vec<QueryRecord> {
        self.records.lock().clone()
    }

    /// Number of recorded calls.
    pub fn query_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Sum of all call durations.
    pub fn total_time(&self) -> Duration {
        self.records.lock().iter().map(|r| r.duration).sum()
    }

    /// Number of failed calls.
    pub fn failed_count(&self) -> usize {
        self.records.lock().iter().filter(|r| !r.is_success()).count()
    }
}

impl QueryObserver for QueryCollector {
    fn on_query(&self, record: &QueryRecord) {
        self.records.lock().push(record.clone());
    }
}

/// An [`IndexClient`] decorator that reports every call to an observer.
pub struct ObservedIndexClient<C> {
    inner: C,
    observer: Arc<dyn QueryObserver>,
}

impl<C: IndexClient> ObservedIndexClient<C> {
    /// Wraps `inner`, reporting to `observer`.
    pub fn new(inner: C, observer: Arc<dyn QueryObserver>) -> Self {
        Self { inner, observer }
    }

    /// Returns the wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn report<T>(
        &self,
        operation: ClientOperation,
        index: String,
        started_at: DateTime<Utc>,
        start: Instant,
        result: &Result<T, ClientError>,
    ) {
        let record = QueryRecord {
            operation,
            index,
            started_at,
            duration: start.elapsed(),
            error: result.as_ref().err().map(|e| e.to_string()),
        };
        tracing::trace!(
            operation = %record.operation,
            index = %record.index,
            duration_ms = record.duration.as_millis() as u64,
            "Index client call"
        );
        self.observer.on_query(&record);
    }
}

#[async_trait]
impl<C: IndexClient> IndexClient for ObservedIndexClient<C> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn physical_index_name(&self, descriptor: &MappingDescriptor) -> String {
        self.inner.physical_index_name(descriptor)
    }

    fn build_mapping_body(&self, descriptor: &MappingDescriptor) -> Result<Value, MappingBuildError> {
        self.inner.build_mapping_body(descriptor)
    }

    async fn exists(&self, descriptor: &MappingDescriptor) -> Result<bool, ClientError> {
        let (started_at, start) = (Utc::now(), Instant::now());
        let result = self.inner.exists(descriptor).await;
        self.report(
            ClientOperation::Exists,
            self.physical_index_name(descriptor),
            started_at,
            start,
            &result,
        );
        result
    }

    async fn create(&self, descriptor: &MappingDescriptor, body: &Value) -> Result<(), ClientError> {
        let (started_at, start) = (Utc::now(), Instant::now());
        let result = self.inner.create(descriptor, body).await;
        self.report(
            ClientOperation::Create,
            self.physical_index_name(descriptor),
            started_at,
            start,
            &result,
        );
        result
    }

    async fn delete(&self, descriptor: &MappingDescriptor) -> Result<(), ClientError> {
        let (started_at, start) = (Utc::now(), Instant::now());
        let result = self.inner.delete(descriptor).await;
        self.report(
            ClientOperation::Delete,
            self.physical_index_name(descriptor),
            started_at,
            start,
            &result,
        );
        result
    }

    async fn server_info(&self) -> Result<ServerInfo, ClientError> {
        let (started_at, start) = (Utc::now(), Instant::now());
        let result = self.inner.server_info().await;
        self.report(
            ClientOperation::ServerInfo,
            String::new(),
            started_at,
            start,
            &result,
        );
        result
    }
}

/// Mapping diagnostics for one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityDiagnostic {
    /// The entity's index creation body.
    #[allow(missing_docs)]
    Valid { entity: String, index: String, body: Value },
    /// The entity's mapping cannot be built.
    #[allow(missing_docs)]
    Invalid { entity: String, index: String, error: MappingBuildError },
}

impl EntityDiagnostic {
    /// Entity identifier.
    pub fn entity(&self) -> &str {
        match self {
            EntityDiagnostic::Valid { entity, .. } | EntityDiagnostic::Invalid { entity, .. } => {
                entity
            }
        }
    }
}

/// Mapping diagnostics for a whole catalog, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDiagnostics {
    /// One entry per catalog descriptor.
    pub entries: Vec<EntityDiagnostic>,
}

impl EntityDiagnostics {
    /// Builds every descriptor's mapping body without contacting the cluster.
    pub fn collect<C: IndexClient + ?Sized>(catalog: &MappingCatalog, client: &C) -> Self {
        let entries = catalog
            .iter()
            .map(|descriptor| match client.build_mapping_body(descriptor) {
                Ok(body) => EntityDiagnostic::Valid {
                    entity: descriptor.entity.clone(),
                    index: client.physical_index_name(descriptor),
                    body,
                },
                Err(error) => EntityDiagnostic::Invalid {
                    entity: descriptor.entity.clone(),
                    index: client.physical_index_name(descriptor),
                    error,
                },
            })
            .collect();
        Self { entries }
    }

    /// Entities with a buildable mapping.
    pub fn valid(&self) -> impl Iterator<Item = &EntityDiagnostic> {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntityDiagnostic::Valid { .. }))
    }

    /// Entities whose mapping cannot be built.
    pub fn invalid(&self) -> impl Iterator<Item = &EntityDiagnostic> {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntityDiagnostic::Invalid { .. }))
    }

    /// Number of invalid entities.
    pub fn invalid_count(&self) -> usize {
        self.invalid().count()
    }
}

/// Everything a profile report shows for one command invocation.
#[derive(Debug, Clone)]
pub struct ProfileSnapshot {
    /// Observed client calls.
    pub queries: Vec<QueryRecord>,
    /// Sum of call durations.
    pub total_time: Duration,
    /// Mapping diagnostics.
    pub entities: EntityDiagnostics,
    /// `None` when the cluster could not be reached.
    pub server: Option<ServerInfo>,
    /// Kibana URL.
    pub kibana: String,
}

impl ProfileSnapshot {
    /// Gathers a snapshot. The server info call itself is not recorded.
    pub async fn capture<C: IndexClient + ?Sized>(
        collector: &QueryCollector,
        catalog: &MappingCatalog,
        client: &C,
        kibana: impl Into<String>,
    ) -> Self {
        let queries = collector.records();
        let total_time = collector.total_time();

        let server = match client.server_info().await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch Elasticsearch server info");
                None
            }
        };

        Self {
            queries,
            total_time,
            entities: EntityDiagnostics::collect(catalog, client),
            server,
            kibana: kibana.into(),
        }
    }

    /// Number of observed calls.
    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    /// Returns false when the server is unreachable or outside the supported range.
    pub fn is_compatible(&self) -> bool {
        self.server.as_ref().is_some_and(ServerInfo::is_compatible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryIndexClient;
    use crate::error::ClientErrorKind;
    use crate::mapping::PropertyDescriptor;
    use serde_json::json;

    #[tokio::test]
    async fn test_observed_client_records_every_call() {
        let collector = Arc::new(QueryCollector::new());
        let inner = InMemoryIndexClient::new();
        inner.fail(ClientOperation::Delete, "orders", ClientErrorKind::Rejected);
        let client = ObservedIndexClient::new(inner, collector.clone());

        let users = MappingDescriptor::new("User", "users");
        let orders = MappingDescriptor::new("Order", "orders");

        assert!(!client.exists(&users).await.unwrap());
        client.create(&users, &json!({})).await.unwrap();
        assert!(client.delete(&orders).await.is_err());

        let records = collector.records();
        assert_eq!(collector.query_count(), 3);
        assert_eq!(records[0].operation, ClientOperation::Exists);
        assert_eq!(records[1].operation, ClientOperation::Create);
        assert_eq!(records[1].index, "users");
        assert!(records[1].is_success());
        assert!(!records[2].is_success());
        assert_eq!(collector.failed_count(), 1);
        assert!(client.inner().contains("users"));
    }

    #[test]
    fn test_entity_diagnostics_split() {
        let catalog = MappingCatalog::from_descriptors(vec![
            MappingDescriptor::new("User", "users")
                .with_property(PropertyDescriptor::new("email", "keyword")),
            MappingDescriptor::new("Order", "orders")
                .with_property(PropertyDescriptor::new("total", "money")),
        ])
        .unwrap();
        let client = InMemoryIndexClient::new().with_prefix("app");

        let diagnostics = EntityDiagnostics::collect(&catalog, &client);
        assert_eq!(diagnostics.entries.len(), 2);
        assert_eq!(diagnostics.invalid_count(), 1);

        let valid: Vec<_> = diagnostics.valid().map(|e| e.entity()).collect();
        assert_eq!(valid, vec!["User"]);
        match &diagnostics.entries[1] {
            EntityDiagnostic::Invalid { index, error, .. } => {
                assert_eq!(index, "app_orders");
                assert_eq!(error.path, "total");
            }
            other => panic!("expected invalid entry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_capture() {
        let collector = Arc::new(QueryCollector::new());
        let client = ObservedIndexClient::new(
            InMemoryIndexClient::new().with_version("8.11.1"),
            collector.clone(),
        );
        let catalog =
            MappingCatalog::from_descriptors(vec![MappingDescriptor::new("User", "users")]).unwrap();

        client
            .exists(catalog.get("User").unwrap())
            .await
            .unwrap();

        let snapshot =
            ProfileSnapshot::capture(&collector, &catalog, &client, "http://localhost:5601").await;
        assert_eq!(snapshot.query_count(), 1);
        assert!(snapshot.is_compatible());
        assert_eq!(snapshot.server.unwrap().version, "8.11.1");
        assert_eq!(snapshot.entities.invalid_count(), 0);
    }
}
