//! create-index command - Create (or re-create) entity indexes

use clap::Args;
use esmap_index::{IndexClient, IndexReconciler, Intent, MappingCatalog, ReconcileReport};

use crate::error::CliResult;
use crate::options::{SelectionArgs, resolve_bool_option};
use crate::prompt::EntityPicker;

/// Arguments for the create-index command
#[derive(Debug, Clone, Default, Args)]
pub struct CreateIndexArgs {
    /// Delete and re-create indexes that already exist (0 or 1)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "1")]
    pub re_create_indexes: Option<String>,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

impl CreateIndexArgs {
    /// Returns the create intent described by the options.
    pub fn intent(&self) -> CliResult<Intent> {
        let force = resolve_bool_option("re-create-indexes", self.re_create_indexes.as_deref())?;
        Ok(Intent::Create { force })
    }
}

/// Creates the selected indexes.
pub async fn reconcile<C: IndexClient + ?Sized>(
    args: &CreateIndexArgs,
    catalog: &MappingCatalog,
    client: &C,
    picker: &dyn EntityPicker,
) -> CliResult<ReconcileReport> {
    // Option errors are reported before anything is prompted or sent.
    let intent = args.intent()?;
    let criterion = args.selection.criterion(catalog, picker)?;

    tracing::info!(criterion = ?criterion, intent = ?intent, "Creating indexes");
    Ok(IndexReconciler::new(catalog, client)
        .run(&criterion, intent)
        .await?)
}
