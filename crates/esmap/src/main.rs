//! esmap - Elasticsearch index management for mapped entities.

use clap::Parser;
use esmap::logging::init_logging;
use esmap::{Cli, commands, output};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(4);
        }
    };

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(4);
    }

    info!(
        hosts = ?config.hosts,
        index_prefix = %config.index_prefix,
        mappings = config.mappings.len(),
        "Starting esmap"
    );

    if let Err(e) = commands::execute(&cli.command, &config, cli.verbose).await {
        e.print();
        std::process::exit(e.exit_code());
    }

    Ok(())
}
