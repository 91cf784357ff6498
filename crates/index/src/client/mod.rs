//! Index client abstraction.
//!
//! The reconciler talks to the cluster only through [`IndexClient`]. Two
//! implementations ship with the crate:
//!
//! - [`ElasticsearchIndexClient`] (feature `elasticsearch`) - a real cluster
//! - [`InMemoryIndexClient`] - a process-local index set, for tests and dry runs
//!
//! [`ObservedIndexClient`](crate::profiling::ObservedIndexClient) wraps either
//! one to time each call.

#[cfg(feature = "elasticsearch")]
mod elasticsearch;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, MappingBuildError};
use crate::mapping::{IndexSettings, MappingDescriptor, build_mapping_body};

#[cfg(feature = "elasticsearch")]
pub use self::elasticsearch::{ElasticsearchAuth, ElasticsearchConfig, ElasticsearchIndexClient};
pub use memory::{ClientOperation, InMemoryIndexClient};

/// Operations the reconciler needs from an index backend.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the physical index name (deployment prefix applied).
    fn physical_index_name(&self, descriptor: &MappingDescriptor) -> String {
        descriptor.index.clone()
    }

    /// Builds the index creation body for a descriptor.
    fn build_mapping_body(&self, descriptor: &MappingDescriptor) -> Result<Value, MappingBuildError> {
        build_mapping_body(descriptor, &IndexSettings::default())
    }

    /// Returns true if the descriptor's index exists.
    async fn exists(&self, descriptor: &MappingDescriptor) -> Result<bool, ClientError>;

    /// Creates the descriptor's index with the given body.
    async fn create(&self, descriptor: &MappingDescriptor, body: &Value) -> Result<(), ClientError>;

    /// Deletes the descriptor's index.
    async fn delete(&self, descriptor: &MappingDescriptor) -> Result<(), ClientError>;

    /// Returns cluster identification.
    async fn server_info(&self) -> Result<ServerInfo, ClientError>;
}

/// Cluster identification returned by the root endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Node name.
    pub name: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Version number, e.g. `8.15.0`.
    pub version: String,
}

impl ServerInfo {
    /// Lowest supported server version (inclusive).
    pub const MIN_COMPATIBLE: (u64, u64, u64) = (8, 0, 0);
    /// First unsupported server version.
    pub const MAX_EXCLUSIVE: (u64, u64, u64) = (9, 0, 0);

    /// Parses `major.minor.patch`, ignoring any `-qualifier`.
    pub fn parsed_version(&self) -> Option<(u64, u64, u64)> {
        let core = self.version.split('-').next()?;
        let mut parts = core.split('.').map(|p| p.parse::<u64>().ok());
        let major = parts.next()??;
        let minor = parts.next().unwrap_or(Some(0))?;
        let patch = parts.next().unwrap_or(Some(0))?;
        Some((major, minor, patch))
    }

    /// Returns true when the server version is within the supported range.
    pub fn is_compatible(&self) -> bool {
        self.parsed_version()
            .is_some_and(|v| v >= Self::MIN_COMPATIBLE && v < Self::MAX_EXCLUSIVE)
    }
}
