//! delete-index command - Delete entity indexes

use clap::Args;
use esmap_index::{IndexClient, IndexReconciler, Intent, MappingCatalog, ReconcileReport};

use crate::error::CliResult;
use crate::options::SelectionArgs;
use crate::prompt::EntityPicker;

/// Arguments for the delete-index command
#[derive(Debug, Clone, Default, Args)]
pub struct DeleteIndexArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Deletes the selected indexes.
pub async fn reconcile<C: IndexClient + ?Sized>(
    args: &DeleteIndexArgs,
    catalog: &MappingCatalog,
    client: &C,
    picker: &dyn EntityPicker,
) -> CliResult<ReconcileReport> {
    let criterion = args.selection.criterion(catalog, picker)?;

    tracing::info!(criterion = ?criterion, "Deleting indexes");
    Ok(IndexReconciler::new(catalog, client)
        .run(&criterion, Intent::Delete)
        .await?)
}
