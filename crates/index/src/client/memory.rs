//! In-memory index client.
//!
//! Keeps the set of existing index names in process memory. Failures can be
//! scripted per operation and index name, which makes batch behaviour under
//! partial failure reproducible without a cluster.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{ClientError, ClientErrorKind};
use crate::mapping::MappingDescriptor;

use super::{IndexClient, ServerInfo};

/// Index client operations, as recorded in call logs and query profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientOperation {
    /// [`IndexClient::exists`]
    Exists,
    /// [`IndexClient::create`]
    Create,
    /// [`IndexClient::delete`]
    Delete,
    /// [`IndexClient::server_info`]
    ServerInfo,
}

impl fmt::Display for ClientOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClientOperation::Exists => "exists",
            ClientOperation::Create => "create",
            ClientOperation::Delete => "delete",
            ClientOperation::ServerInfo => "info",
        };
        f.write_str(s)
    }
}

/// A process-local [`IndexClient`].
#[derive(Default)]
pub struct InMemoryIndexClient {
    prefix: String,
    version: String,
    indexes: Mutex<BTreeMap<String, Value>>,
    failures: Mutex<HashMap<(ClientOperation, String), ClientErrorKind>>,
    calls: Mutex<Vec<(ClientOperation, String)>>,
}

impl fmt::Debug for InMemoryIndexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryIndexClient")
            .field("prefix", &self.prefix)
            .field("indexes", &self.indexes.lock().len())
            .finish_non_exhaustive()
    }
}

impl InMemoryIndexClient {
    /// Creates an empty client reporting version 8.15.0.
    pub fn new() -> Self {
        Self {
            version: "8.15.0".to_string(),
            ..Default::default()
        }
    }

    /// Sets the prefix applied to physical index names.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the version reported by [`IndexClient::server_info`].
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Marks a physical index as existing.
    pub fn with_index(self, physical_name: impl Into<String>) -> Self {
        self.indexes
            .lock()
            .insert(physical_name.into(), Value::Null);
        self
    }

    /// Makes every `operation` on `physical_name` fail with `kind`.
    pub fn fail(&self, operation: ClientOperation, physical_name: impl Into<String>, kind: ClientErrorKind) {
        self.failures
            .lock()
            .insert((operation, physical_name.into()), kind);
    }

    /// Removes all scripted failures.
    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// Returns true if the physical index exists.
    pub fn contains(&self, physical_name: &str) -> bool {
        self.indexes.lock().contains_key(physical_name)
    }

    /// Returns the body an index was created with.
    pub fn body(&self, physical_name: &str) -> Option<Value> {
        self.indexes.lock().get(physical_name).cloned()
    }

    /// Returns existing physical index names, sorted.
    pub fn index_names(&self) -> Vec<String> {
        self.indexes.lock().keys().cloned().collect()
    }

    /// Returns every call made so far, in order.
    pub fn calls(&self) -> Vec<(ClientOperation, String)> {
        self.calls.lock().clone()
    }

    /// Returns the set of operations issued against one index.
    pub fn operations_on(&self, physical_name: &str) -> HashSet<ClientOperation> {
        self.calls
            .lock()
            .iter()
            .filter(|(_, name)| name == physical_name)
            .map(|(op, _)| *op)
            .collect()
    }

    fn enter(&self, operation: ClientOperation, index: &str) -> Result<(), ClientError> {
        self.calls.lock().push((operation, index.to_string()));
        let scripted = self
            .failures
            .lock()
            .get(&(operation, index.to_string()))
            .copied();
        match scripted {
            None => Ok(()),
            Some(kind) => Err(Self::scripted_error(kind, index)),
        }
    }

    fn scripted_error(kind: ClientErrorKind, index: &str) -> ClientError {
        match kind {
            ClientErrorKind::Connection => ClientError::Connection {
                message: format!("connection refused while calling {}", index),
            },
            ClientErrorKind::Rejected => ClientError::Rejected {
                index: index.to_string(),
                status: 400,
                reason: "scripted rejection".to_string(),
            },
            ClientErrorKind::AlreadyExists => ClientError::AlreadyExists {
                index: index.to_string(),
            },
            ClientErrorKind::IndexNotFound => ClientError::IndexNotFound {
                index: index.to_string(),
            },
            ClientErrorKind::Serialization => ClientError::Serialization {
                message: format!("malformed response for {}", index),
            },
        }
    }
}

#[async_trait]
impl IndexClient for InMemoryIndexClient {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn physical_index_name(&self, descriptor: &MappingDescriptor) -> String {
        if self.prefix.is_empty() {
            descriptor.index.clone()
        } else {
            format!("{}_{}", self.prefix, descriptor.index)
        }
    }

    async fn exists(&self, descriptor: &MappingDescriptor) -> Result<bool, ClientError> {
        let index = self.physical_index_name(descriptor);
        self.enter(ClientOperation::Exists, &index)?;
        Ok(self.contains(&index))
    }

    async fn create(&self, descriptor: &MappingDescriptor, body: &Value) -> Result<(), ClientError> {
        let index = self.physical_index_name(descriptor);
        self.enter(ClientOperation::Create, &index)?;

        let mut indexes = self.indexes.lock();
        if indexes.contains_key(&index) {
            return Err(ClientError::AlreadyExists { index });
        }
        indexes.insert(index, body.clone());
        Ok(())
    }

    async fn delete(&self, descriptor: &MappingDescriptor) -> Result<(), ClientError> {
        let index = self.physical_index_name(descriptor);
        self.enter(ClientOperation::Delete, &index)?;

        match self.indexes.lock().remove(&index) {
            Some(_) => Ok(()),
            None => Err(ClientError::IndexNotFound { index }),
        }
    }

    async fn server_info(&self) -> Result<ServerInfo, ClientError> {
        self.enter(ClientOperation::ServerInfo, "")?;
        Ok(ServerInfo {
            name: "memory".to_string(),
            cluster_name: "in-memory".to_string(),
            version: self.version.clone(),
        })
    }
}
