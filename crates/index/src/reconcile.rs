//! Index reconciliation.
//!
//! Brings the live indexes of a selection of mapping descriptors in line with
//! an [`Intent`]. A run resolves a [`SelectionCriterion`] against the catalog,
//! then processes the resolved descriptors one at a time, in resolution order:
//!
//! 1. ask the client whether the index exists,
//! 2. [`plan_action`] from the intent and the existence flag,
//! 3. build the mapping body (create/recreate only) and execute the action,
//! 4. append the [`Outcome`] to the [`ReconcileReport`].
//!
//! Resolution failures and mapping build failures abort the run with no
//! report. Client failures are recorded on the descriptor's outcome and the
//! run moves on to the next descriptor. Nothing is retried.

use std::fmt;

use crate::client::IndexClient;
use crate::error::{ClientError, ClientErrorKind, MappingBuildError, NotFoundError, ReconcileError};
use crate::mapping::{MappingCatalog, MappingDescriptor};

/// Which descriptors a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCriterion {
    /// Every descriptor, in catalog order.
    All,
    /// The first descriptor with this (unprefixed) index name.
    ByIndexName(String),
    /// The descriptor for this entity identifier.
    ByEntity(String),
    /// These entity identifiers, in the given order.
    Selected(Vec<String>),
}

/// What the caller wants the selected indexes to look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Make sure the index exists; with `force`, drop and rebuild existing ones.
    Create {
        /// Delete and rebuild indexes that already exist.
        force: bool,
    },
    /// Make sure the index does not exist.
    Delete,
}

impl Intent {
    /// The action reported when the existence check itself fails.
    fn nominal_action(self) -> ReconcileAction {
        match self {
            Intent::Create { .. } => ReconcileAction::Create,
            Intent::Delete => ReconcileAction::Delete,
        }
    }
}

/// Why a descriptor needed no client call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// A non-forced create found the index already present.
    AlreadyExists,
    /// A delete found no index.
    AlreadyAbsent,
}

/// The concrete action chosen for one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Create the absent index.
    Create,
    /// Delete the existing index, then create it.
    Recreate,
    /// Delete the existing index.
    Delete,
    /// Leave the index alone.
    Skip(NoOpReason),
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileAction::Create => f.write_str("create"),
            ReconcileAction::Recreate => f.write_str("recreate"),
            ReconcileAction::Delete => f.write_str("delete"),
            ReconcileAction::Skip(_) => f.write_str("skip"),
        }
    }
}

/// Result of processing one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Every client call of the action succeeded.
    Applied,
    /// The index was already in the requested state.
    NoOp(NoOpReason),
    /// A client call failed; later descriptors were still processed.
    Failed(ClientError),
}

/// One report entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Entity identifier.
    pub entity: String,
    /// Unprefixed index name.
    pub index: String,
    /// Action chosen for the descriptor.
    pub action: ReconcileAction,
    /// What happened.
    pub status: OutcomeStatus,
}

impl Outcome {
    fn new(descriptor: &MappingDescriptor, action: ReconcileAction, status: OutcomeStatus) -> Self {
        Self {
            entity: descriptor.entity.clone(),
            index: descriptor.index.clone(),
            action,
            status,
        }
    }

    /// Returns true for a [`OutcomeStatus::Failed`] outcome.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed(_))
    }
}

/// Outcomes of a run, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    outcomes: Vec<Outcome>,
}

impl ReconcileReport {
    /// Returns the outcomes in processing order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Iterates over the outcomes.
    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    /// Number of processed descriptors.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if nothing was processed.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of applied actions.
    pub fn applied(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Applied))
    }

    /// Number of descriptors that needed no change.
    pub fn no_ops(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::NoOp(_)))
    }

    /// Iterates over failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Returns true if any descriptor failed.
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(Outcome::is_failed)
    }

    fn count(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }
}

impl<'a> IntoIterator for &'a ReconcileReport {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// Resolves a selection criterion against the catalog.
///
/// `Selected` stops at the first unknown entity; no partial selection is
/// returned.
pub fn resolve<'c>(
    criterion: &SelectionCriterion,
    catalog: &'c MappingCatalog,
) -> Result<Vec<&'c MappingDescriptor>, NotFoundError> {
    match criterion {
        SelectionCriterion::All => Ok(catalog.iter().collect()),
        SelectionCriterion::ByIndexName(name) => catalog
            .find_by_index_name(name)
            .map(|d| vec![d])
            .ok_or_else(|| NotFoundError::IndexName { name: name.clone() }),
        SelectionCriterion::ByEntity(id) => catalog
            .get(id)
            .map(|d| vec![d])
            .ok_or_else(|| NotFoundError::Entity { id: id.clone() }),
        SelectionCriterion::Selected(ids) => ids
            .iter()
            .map(|id| {
                catalog
                    .get(id)
                    .ok_or_else(|| NotFoundError::Entity { id: id.clone() })
            })
            .collect(),
    }
}

/// Chooses the action for a descriptor given the intent and whether its index exists.
pub fn plan_action(intent: Intent, exists: bool) -> ReconcileAction {
    match (intent, exists) {
        (Intent::Create { .. }, false) => ReconcileAction::Create,
        (Intent::Create { force: false }, true) => ReconcileAction::Skip(NoOpReason::AlreadyExists),
        (Intent::Create { force: true }, true) => ReconcileAction::Recreate,
        (Intent::Delete, true) => ReconcileAction::Delete,
        (Intent::Delete, false) => ReconcileAction::Skip(NoOpReason::AlreadyAbsent),
    }
}

/// Applies create/delete intents to the indexes of a mapping catalog.
pub struct IndexReconciler<'a, C: ?Sized> {
    catalog: &'a MappingCatalog,
    client: &'a C,
}

impl<'a, C: IndexClient + ?Sized> IndexReconciler<'a, C> {
    /// Creates a reconciler over a catalog and a client.
    pub fn new(catalog: &'a MappingCatalog, client: &'a C) -> Self {
        Self { catalog, client }
    }

    /// Resolves a criterion against this reconciler's catalog.
    pub fn resolve(
        &self,
        criterion: &SelectionCriterion,
    ) -> Result<Vec<&'a MappingDescriptor>, NotFoundError> {
        resolve(criterion, self.catalog)
    }

    /// Executes one planned action.
    ///
    /// The mapping body for `Create`/`Recreate` is built before any client
    /// call, so a malformed mapping never leaves an index deleted.
    pub async fn execute(
        &self,
        descriptor: &MappingDescriptor,
        action: ReconcileAction,
    ) -> Result<Outcome, MappingBuildError> {
        let status = match action {
            ReconcileAction::Skip(reason) => OutcomeStatus::NoOp(reason),
            ReconcileAction::Create => {
                let body = self.client.build_mapping_body(descriptor)?;
                match self.client.create(descriptor, &body).await {
                    Ok(()) => OutcomeStatus::Applied,
                    Err(e) => OutcomeStatus::Failed(e),
                }
            }
            ReconcileAction::Recreate => {
                let body = self.client.build_mapping_body(descriptor)?;
                match self.client.delete(descriptor).await {
                    Ok(()) => match self.client.create(descriptor, &body).await {
                        Ok(()) => OutcomeStatus::Applied,
                        Err(e) => OutcomeStatus::Failed(e),
                    },
                    Err(e) if e.kind() == ClientErrorKind::IndexNotFound => {
                        tracing::debug!(
                            index = %descriptor.index,
                            "Index vanished before re-create, creating it"
                        );
                        match self.client.create(descriptor, &body).await {
                            Ok(()) => OutcomeStatus::Applied,
                            Err(e) => OutcomeStatus::Failed(e),
                        }
                    }
                    Err(e) => OutcomeStatus::Failed(e),
                }
            }
            ReconcileAction::Delete => match self.client.delete(descriptor).await {
                Ok(()) => OutcomeStatus::Applied,
                Err(e) => OutcomeStatus::Failed(e),
            },
        };

        let outcome = Outcome::new(descriptor, action, status);
        match &outcome.status {
            OutcomeStatus::Applied => tracing::info!(
                entity = %outcome.entity,
                index = %outcome.index,
                action = %outcome.action,
                "Index action applied"
            ),
            OutcomeStatus::NoOp(reason) => tracing::debug!(
                entity = %outcome.entity,
                index = %outcome.index,
                reason = ?reason,
                "Index already in the requested state"
            ),
            OutcomeStatus::Failed(e) => tracing::warn!(
                entity = %outcome.entity,
                index = %outcome.index,
                action = %outcome.action,
                error = %e,
                "Index action failed"
            ),
        }
        Ok(outcome)
    }

    /// Resolves `criterion` and reconciles every resolved descriptor toward `intent`.
    pub async fn run(
        &self,
        criterion: &SelectionCriterion,
        intent: Intent,
    ) -> Result<ReconcileReport, ReconcileError> {
        let descriptors = self.resolve(criterion)?;
        tracing::debug!(
            backend = self.client.name(),
            count = descriptors.len(),
            intent = ?intent,
            "Reconciling indexes"
        );

        let mut report = ReconcileReport::default();
        for descriptor in descriptors {
            let exists = match self.client.exists(descriptor).await {
                Ok(exists) => exists,
                Err(e) => {
                    tracing::warn!(
                        entity = %descriptor.entity,
                        index = %descriptor.index,
                        error = %e,
                        "Index existence check failed"
                    );
                    report.push(Outcome::new(
                        descriptor,
                        intent.nominal_action(),
                        OutcomeStatus::Failed(e),
                    ));
                    continue;
                }
            };

            let action = plan_action(intent, exists);
            report.push(self.execute(descriptor, action).await?);
        }

        Ok(report)
    }
}
