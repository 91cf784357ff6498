//! Tool configuration.
//!
//! [`EsmapConfig`] is read from a JSON file; every field has a default, so an
//! empty object is a valid (if useless) configuration. Command-line
//! arguments are applied on top by the binary before [`EsmapConfig::validate`]
//! runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[cfg(feature = "elasticsearch")]
use crate::client::{ElasticsearchAuth, ElasticsearchConfig};
use crate::error::ConfigError;
use crate::mapping::{CatalogLoader, IndexSettings};

/// Configuration shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsmapConfig {
    /// Elasticsearch node URLs. Only the first one is used.
    pub hosts: Vec<String>,

    /// Prefix prepended to every index name (`{prefix}_{index}`); empty for none.
    pub index_prefix: String,

    /// Collect and print a query profile after each command.
    pub profiling: bool,

    /// Kibana URL shown in the profile.
    pub kibana: String,

    /// Mapping files or directories of `*.json` mapping files.
    pub mappings: Vec<PathBuf>,

    /// Primary shard count for created indexes.
    pub number_of_shards: u32,

    /// Replica count for created indexes.
    pub number_of_replicas: u32,

    /// Refresh interval for created indexes.
    pub refresh_interval: String,

    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[cfg(feature = "elasticsearch")]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation. Only use for development.
    pub disable_certificate_validation: bool,
}

impl Default for EsmapConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["http://localhost:9200".to_string()],
            index_prefix: String::new(),
            profiling: false,
            kibana: "http://localhost:5601".to_string(),
            mappings: Vec::new(),
            number_of_shards: 1,
            number_of_replicas: 1,
            refresh_interval: "1s".to_string(),
            request_timeout_ms: 30000,
            #[cfg(feature = "elasticsearch")]
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

impl EsmapConfig {
    /// Reads a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns every problem with this configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.hosts.is_empty() {
            errors.push("at least one Elasticsearch host is required".to_string());
        }
        for host in &self.hosts {
            if let Err(reason) = check_host(host) {
                errors.push(format!("invalid Elasticsearch host '{}': {}", host, reason));
            }
        }
        if self.mappings.is_empty() {
            errors.push("no mapping files configured".to_string());
        }
        if self.number_of_shards == 0 {
            errors.push("number_of_shards must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            errors.push("request_timeout_ms must be greater than 0".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Like [`validate`](Self::validate), as a [`ConfigError`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate().map_err(ConfigError::Invalid)?;
        Ok(self)
    }

    /// Settings applied to every created index.
    pub fn index_settings(&self) -> IndexSettings {
        IndexSettings {
            number_of_shards: self.number_of_shards,
            number_of_replicas: self.number_of_replicas,
            refresh_interval: self.refresh_interval.clone(),
        }
    }

    /// Connection settings for the Elasticsearch client.
    #[cfg(feature = "elasticsearch")]
    pub fn elasticsearch(&self) -> ElasticsearchConfig {
        ElasticsearchConfig {
            nodes: self.hosts.clone(),
            index_prefix: self.index_prefix.clone(),
            index_settings: self.index_settings(),
            request_timeout_ms: self.request_timeout_ms,
            auth: self.auth.clone(),
            disable_certificate_validation: self.disable_certificate_validation,
        }
    }

    /// Loader over the configured mapping paths.
    pub fn catalog_loader(&self) -> CatalogLoader {
        CatalogLoader::new(self.mappings.iter().cloned())
    }
}

/// Hosts must be absolute `http`/`https` URLs.
fn check_host(host: &str) -> Result<(), String> {
    let url = url::Url::parse(host.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        "http" | "https" => Err("missing host name".to_string()),
        _ => Err(format!(
            "expected an http:// or https:// URL, e.g. http://{}",
            host.trim()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: EsmapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EsmapConfig::default());
        assert_eq!(config.hosts, vec!["http://localhost:9200"]);
        assert_eq!(config.kibana, "http://localhost:5601");
        assert!(!config.profiling);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "hosts": ["http://es:9200"],
                "index_prefix": "shop",
                "mappings": ["mappings/"],
                "number_of_replicas": 0
            }}"#
        )
        .unwrap();

        let config = EsmapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hosts, vec!["http://es:9200"]);
        assert_eq!(config.index_prefix, "shop");
        assert_eq!(config.mappings, vec![PathBuf::from("mappings/")]);
        assert_eq!(config.index_settings().number_of_replicas, 0);
        assert_eq!(config.index_settings().number_of_shards, 1);
    }

    #[test]
    fn test_from_file_errors() {
        let err = EsmapConfig::from_file(Path::new("/nonexistent/esmap.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ hosts: ").unwrap();
        let err = EsmapConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_collects_all_problems() {
        let config = EsmapConfig {
            hosts: vec![],
            number_of_shards: 0,
            request_timeout_ms: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);

        let config = EsmapConfig {
            mappings: vec![PathBuf::from("mappings.json")],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_validate_rejects_scheme_less_host() {
        let config = EsmapConfig {
            hosts: vec!["localhost:9200".to_string()],
            mappings: vec![PathBuf::from("mappings.json")],
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'localhost:9200'"));
        assert!(errors[0].contains("http://localhost:9200"));
    }

    #[test]
    fn test_validate_rejects_blank_host_among_valid_ones() {
        let config = EsmapConfig {
            hosts: vec!["".to_string(), "http://es:9200".to_string()],
            mappings: vec![PathBuf::from("mappings.json")],
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("invalid Elasticsearch host ''"));

        let config = EsmapConfig {
            hosts: vec!["https://es1:9200".to_string(), "http://es2".to_string()],
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "elasticsearch")]
    #[test]
    fn test_elasticsearch_config() {
        let config: EsmapConfig = serde_json::from_str(
            r#"{
                "hosts": ["https://es:9200"],
                "index_prefix": "app",
                "refresh_interval": "30s",
                "auth": {"type": "basic", "username": "elastic", "password": "changeme"}
            }"#,
        )
        .unwrap();

        let es = config.elasticsearch();
        assert_eq!(es.nodes, vec!["https://es:9200"]);
        assert_eq!(es.index_prefix, "app");
        assert_eq!(es.index_settings.refresh_interval, "30s");
        assert!(matches!(es.auth, Some(ElasticsearchAuth::Basic { .. })));
    }
}
