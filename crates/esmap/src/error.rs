//! CLI error types and exit codes

use esmap_index::{CatalogError, ClientError, ConfigError, EsmapError, ReconcileError};
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success (including runs with per-index failures)
/// - 1: General error
/// - 2: Invalid option value
/// - 3: Selection did not resolve
/// - 4: Invalid mapping, configuration or mapping files
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parameter {name} has wrong value. Please enter 0 or 1.")]
    InvalidOption { name: String, value: String },

    #[error("No class selected.")]
    EmptySelection,

    #[error("Interactive mode requires a terminal.")]
    NotInteractive,

    #[error(transparent)]
    Esmap(#[from] EsmapError),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl From<ReconcileError> for CliError {
    fn from(err: ReconcileError) -> Self {
        CliError::Esmap(err.into())
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        CliError::Esmap(err.into())
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        CliError::Esmap(err.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Esmap(err.into())
    }
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidOption { .. } => 2,
            CliError::EmptySelection => 3,
            CliError::Esmap(EsmapError::Reconcile(ReconcileError::NotFound(_))) => 3,
            CliError::Esmap(EsmapError::Reconcile(ReconcileError::MappingBuild(_)))
            | CliError::Esmap(EsmapError::Catalog(_))
            | CliError::Esmap(EsmapError::Config(_)) => 4,
            CliError::NotInteractive | CliError::Prompt(_) | CliError::Esmap(_) => 1,
        }
    }

    /// Print the error to stderr
    pub fn print(&self) {
        crate::output::error(&self.to_string());
        if let Some(suggestion) = self.suggestion() {
            eprintln!("\n{}", suggestion);
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::NotInteractive => {
                Some("Use --by-name or --by-class-name instead of --select when scripting.")
            }
            CliError::Esmap(EsmapError::Client(ClientError::Connection { .. })) => {
                Some("Check the --hosts value and that the cluster is reachable.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esmap_index::{MappingBuildError, NotFoundError};

    #[test]
    fn test_invalid_option_message() {
        let err = CliError::InvalidOption {
            name: "select".to_string(),
            value: "yes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Parameter select has wrong value. Please enter 0 or 1."
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_codes_by_cause() {
        let not_found: CliError = ReconcileError::NotFound(NotFoundError::IndexName {
            name: "carts".to_string(),
        })
        .into();
        assert_eq!(not_found.exit_code(), 3);
        assert_eq!(not_found.to_string(), "Index name \"carts\" not found.");

        let invalid: CliError =
            ReconcileError::from(MappingBuildError::new("User", "tags", "unknown type 'tag'")).into();
        assert_eq!(invalid.exit_code(), 4);

        let connection: CliError = ClientError::Connection {
            message: "refused".to_string(),
        }
        .into();
        assert_eq!(connection.exit_code(), 1);
        assert!(connection.suggestion().is_some());
    }
}
