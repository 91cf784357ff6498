//! info-index command - Show mapped entities and their properties

use clap::Args;
use esmap_index::MappingCatalog;

use crate::output;

/// Arguments for the info-index command
#[derive(Debug, Clone, Default, Args)]
pub struct InfoIndexArgs {}

/// Prints one table per mapped entity.
pub fn execute(catalog: &MappingCatalog) {
    if catalog.is_empty() {
        output::warning("No mapped entities.");
        return;
    }
    for table in output::info_tables(catalog) {
        println!("{}\n", table);
    }
}
