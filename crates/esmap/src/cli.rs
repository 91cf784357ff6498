//! Command-line definition.
//!
//! # Environment Variables
//!
//! | Variable | Option |
//! |----------|--------|
//! | `ESMAP_CONFIG` | `--config` |
//! | `ESMAP_HOSTS` | `--hosts` (comma-separated) |
//! | `ESMAP_INDEX_PREFIX` | `--index-prefix` |
//! | `ESMAP_MAPPINGS` | `--mapping` (comma-separated) |
//! | `ESMAP_PROFILING` | `--profiling` |
//! | `ESMAP_LOG_LEVEL` | `--log-level` |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use esmap_index::{ConfigError, EsmapConfig};

use crate::commands::{CreateIndexArgs, DeleteIndexArgs, InfoIndexArgs};

/// esmap - Elasticsearch index management for mapped entities
#[derive(Debug, Parser)]
#[command(name = "esmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "ESMAP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Elasticsearch node URLs.
    #[arg(long, env = "ESMAP_HOSTS", value_delimiter = ',', global = true)]
    pub hosts: Vec<String>,

    /// Prefix prepended to every index name.
    #[arg(long, env = "ESMAP_INDEX_PREFIX", global = true)]
    pub index_prefix: Option<String>,

    /// Mapping file or directory (repeatable).
    #[arg(
        long = "mapping",
        env = "ESMAP_MAPPINGS",
        value_delimiter = ',',
        global = true
    )]
    pub mappings: Vec<PathBuf>,

    /// Print a query profile to stderr after the command (`--profiling=false` to turn off).
    #[arg(
        long,
        env = "ESMAP_PROFILING",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub profiling: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "ESMAP_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Print a per-index result table.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the indexes of mapped entities
    CreateIndex(CreateIndexArgs),

    /// Delete the indexes of mapped entities
    DeleteIndex(DeleteIndexArgs),

    /// Show the mapped entities and their properties
    InfoIndex(InfoIndexArgs),
}

impl Cli {
    /// Loads the configuration file (if any) and applies command-line overrides.
    ///
    /// The result is not validated.
    pub fn resolve_config(&self) -> Result<EsmapConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => EsmapConfig::from_file(path)?,
            None => EsmapConfig::default(),
        };

        if !self.hosts.is_empty() {
            config.hosts = self.hosts.clone();
        }
        if let Some(prefix) = &self.index_prefix {
            config.index_prefix = prefix.clone();
        }
        if !self.mappings.is_empty() {
            config.mappings = self.mappings.clone();
        }
        if let Some(profiling) = self.profiling {
            config.profiling = profiling;
        }

        Ok(config)
    }
}
