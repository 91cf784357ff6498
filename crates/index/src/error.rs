//! Error types for mapping catalogs, index clients and reconciliation.
//!
//! Errors are split by the level at which they stop work:
//! - run-level errors ([`NotFoundError`], [`MappingBuildError`]) abort a
//!   reconciliation run before or during processing and surface as
//!   [`ReconcileError`];
//! - descriptor-level errors ([`ClientError`]) are recorded in the report
//!   and never propagate out of a run;
//! - load-time errors ([`CatalogError`], [`ConfigError`]) happen before any
//!   run starts.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The top-level error type for this crate.
#[derive(Error, Debug)]
pub enum EsmapError {
    /// Selection or mapping errors that abort a run
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Index client errors outside of a reconciliation run
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Mapping catalog loading errors
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias using [`EsmapError`].
pub type EsmapResult<T> = Result<T, EsmapError>;

/// Errors that terminate a reconciliation run with no report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The selection criterion did not resolve.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A descriptor could not be turned into an index creation body.
    #[error(transparent)]
    MappingBuild(#[from] MappingBuildError),
}

/// A selection criterion named something the catalog does not contain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("Index name \"{name}\" not found.")]
    IndexName { name: String },

    #[error("Index for class \"{id}\" not found.")]
    Entity { id: String },
}

impl NotFoundError {
    /// Returns the unresolved name or entity identifier.
    pub fn detail(&self) -> &str {
        match self {
            NotFoundError::IndexName { name } => name,
            NotFoundError::Entity { id } => id,
        }
    }
}

/// A descriptor's field metadata cannot be expressed as an index mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid mapping for {entity} at '{path}': {reason}")]
pub struct MappingBuildError {
    pub entity: String,
    /// Dotted property path, or `settings` for index-level problems.
    pub path: String,
    pub reason: String,
}

impl MappingBuildError {
    pub fn new(entity: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A failed call to the index client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The transport could not reach the cluster.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The cluster answered with a non-success status.
    #[error("request for index {index} rejected (status {status}): {reason}")]
    Rejected {
        index: String,
        status: u16,
        reason: String,
    },

    /// Create raced with another creator.
    #[error("index {index} already exists")]
    AlreadyExists { index: String },

    /// Delete targeted an index that is gone.
    #[error("index {index} not found")]
    IndexNotFound { index: String },

    /// A request or response body could not be (de)serialized.
    #[error("serialization failed: {message}")]
    Serialization { message: String },
}

impl ClientError {
    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ClientErrorKind {
        match self {
            ClientError::Connection { .. } => ClientErrorKind::Connection,
            ClientError::Rejected { .. } => ClientErrorKind::Rejected,
            ClientError::AlreadyExists { .. } => ClientErrorKind::AlreadyExists,
            ClientError::IndexNotFound { .. } => ClientErrorKind::IndexNotFound,
            ClientError::Serialization { .. } => ClientErrorKind::Serialization,
        }
    }
}

/// Category of a [`ClientError`], used in reports and scripted test failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientErrorKind {
    Connection,
    Rejected,
    AlreadyExists,
    IndexNotFound,
    Serialization,
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClientErrorKind::Connection => "connection",
            ClientErrorKind::Rejected => "rejected",
            ClientErrorKind::AlreadyExists => "already-exists",
            ClientErrorKind::IndexNotFound => "index-not-found",
            ClientErrorKind::Serialization => "serialization",
        };
        f.write_str(s)
    }
}

/// Errors raised while loading mapping descriptors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read mapping file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mapping file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("entity {entity} is mapped more than once")]
    DuplicateEntity { entity: String },
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
