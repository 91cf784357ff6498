//! Tracing subscriber setup.

/// Initializes logging to stderr. `RUST_LOG` takes precedence over `level`.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn default_directives(level: &str) -> String {
    format!("esmap={},esmap_index={}", level, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives("debug"), "esmap=debug,esmap_index=debug");
    }

    #[test]
    fn test_init_logging_twice_fails() {
        let _ = init_logging("warn");
        let err = init_logging("debug").unwrap_err();
        assert!(err.to_string().starts_with("Failed to initialize logging"));
    }
}
