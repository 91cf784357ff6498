//! esmap command-line tool.
//!
//! Creates, re-creates, deletes and describes the Elasticsearch indexes of
//! the entities declared in mapping files. The binary is a thin wrapper over
//! [`esmap_index`]; this library holds the argument parsing, prompting and
//! rendering so they can be tested without a terminal or a cluster.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod options;
pub mod output;
pub mod prompt;

pub use cli::{Cli, Commands};
pub use error::{CliError, CliResult};
