//! Command implementations.
//!
//! Each command module exposes its clap `Args` and a function that does the
//! work against any [`IndexClient`](esmap_index::IndexClient); [`execute`]
//! wires them to the configured Elasticsearch cluster.

pub mod create_index;
pub mod delete_index;
pub mod info_index;

use std::sync::Arc;

use esmap_index::client::ElasticsearchIndexClient;
use esmap_index::{
    EsmapConfig, IndexClient, MappingCatalog, ObservedIndexClient, ProfileSnapshot, QueryCollector,
    ReconcileReport,
};

pub use create_index::CreateIndexArgs;
pub use delete_index::DeleteIndexArgs;
pub use info_index::InfoIndexArgs;

use crate::cli::Commands;
use crate::error::CliResult;
use crate::output;
use crate::prompt::{EntityPicker, TerminalPicker};

/// Runs a command against the configured cluster.
pub async fn execute(command: &Commands, config: &EsmapConfig, verbose: bool) -> CliResult<()> {
    let catalog = config.catalog_loader().load()?;
    let client = ElasticsearchIndexClient::new(config.elasticsearch())?;

    let (result, profile) =
        run_profiled(command, config, &catalog, client, &TerminalPicker, verbose).await;
    if let Some(snapshot) = profile {
        eprint!("{}", output::profile_report(&snapshot));
    }
    result
}

/// Runs a command through an observed client.
///
/// When profiling is enabled the snapshot is captured whether or not the
/// command succeeded.
pub async fn run_profiled<C: IndexClient>(
    command: &Commands,
    config: &EsmapConfig,
    catalog: &MappingCatalog,
    client: C,
    picker: &dyn EntityPicker,
    verbose: bool,
) -> (CliResult<()>, Option<ProfileSnapshot>) {
    let collector = Arc::new(QueryCollector::new());
    let client = ObservedIndexClient::new(client, collector.clone());

    let result = match command {
        Commands::CreateIndex(args) => create_index::reconcile(args, catalog, &client, picker)
            .await
            .map(|report| print_report(&report, verbose)),
        Commands::DeleteIndex(args) => delete_index::reconcile(args, catalog, &client, picker)
            .await
            .map(|report| print_report(&report, verbose)),
        Commands::InfoIndex(_) => {
            info_index::execute(catalog);
            Ok(())
        }
    };

    let profile = if config.profiling {
        Some(ProfileSnapshot::capture(&collector, catalog, &client, &config.kibana).await)
    } else {
        None
    };
    (result, profile)
}

fn print_report(report: &ReconcileReport, verbose: bool) {
    if verbose {
        println!("{}", output::report_table(report));
    }
    if report.has_failures() {
        output::warning(&output::report_summary(report));
    } else {
        output::success(&output::report_summary(report));
    }
}
