//! Entity-to-index mapping and index reconciliation for Elasticsearch.
//!
//! This crate keeps the Elasticsearch indexes of an application in line with
//! the entity mappings it declares. A [`MappingCatalog`] lists one
//! [`MappingDescriptor`] per entity; an [`IndexReconciler`] resolves a
//! selection of those descriptors and creates, re-creates or deletes their
//! indexes through an [`IndexClient`], producing a per-descriptor
//! [`ReconcileReport`].
//!
//! # Features
//!
//! - `elasticsearch` (default) - [`ElasticsearchIndexClient`](client::ElasticsearchIndexClient)
//!   backed by the official `elasticsearch` crate
//!
//! # Architecture
//!
//! - [`mapping`] - descriptors, the catalog, mapping files and body building
//! - [`client`] - the [`IndexClient`] trait and its implementations
//! - [`reconcile`] - selection resolution, action planning and execution
//! - [`profiling`] - query observation and profile snapshots
//! - [`config`] - tool configuration
//! - [`error`] - error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use esmap_index::client::InMemoryIndexClient;
//! use esmap_index::mapping::{MappingCatalog, MappingDescriptor, PropertyDescriptor};
//! use esmap_index::reconcile::{Intent, IndexReconciler, OutcomeStatus, SelectionCriterion};
//!
//! # tokio_test_block_on(async {
//! let catalog = MappingCatalog::from_descriptors(vec![
//!     MappingDescriptor::new("User", "users")
//!         .with_property(PropertyDescriptor::new("email", "keyword")),
//! ])
//! .unwrap();
//! let client = InMemoryIndexClient::new();
//!
//! let report = IndexReconciler::new(&catalog, &client)
//!     .run(&SelectionCriterion::All, Intent::Create { force: false })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(report.outcomes()[0].status, OutcomeStatus::Applied);
//! assert!(client.contains("users"));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod mapping;
pub mod profiling;
pub mod reconcile;

// Re-export commonly used types at crate root
pub use client::{IndexClient, InMemoryIndexClient, ServerInfo};
pub use config::EsmapConfig;
pub use error::{
    CatalogError, ClientError, ClientErrorKind, ConfigError, EsmapError, EsmapResult,
    MappingBuildError, NotFoundError, ReconcileError,
};
pub use mapping::{CatalogLoader, MappingCatalog, MappingDescriptor, PropertyDescriptor};
pub use profiling::{ObservedIndexClient, ProfileSnapshot, QueryCollector, QueryObserver};
pub use reconcile::{
    IndexReconciler, Intent, NoOpReason, Outcome, OutcomeStatus, ReconcileAction,
    ReconcileReport, SelectionCriterion,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
