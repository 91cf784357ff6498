//! Elasticsearch index client.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, MappingBuildError};
use crate::mapping::{IndexSettings, MappingDescriptor, build_mapping_body};

use super::{IndexClient, ServerInfo};

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Connection settings for [`ElasticsearchIndexClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    pub nodes: Vec<String>,

    /// Prefix prepended to every index name (`{prefix}_{index}`); empty for none.
    #[serde(default)]
    pub index_prefix: String,

    /// Settings applied to every created index.
    #[serde(default)]
    pub index_settings: IndexSettings,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            index_prefix: String::new(),
            index_settings: IndexSettings::default(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

/// [`IndexClient`] backed by an Elasticsearch cluster.
pub struct ElasticsearchIndexClient {
    client: Elasticsearch,
    config: ElasticsearchConfig,
}

impl Debug for ElasticsearchIndexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchIndexClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchIndexClient {
    /// Creates a client. No request is sent until the first call.
    pub fn new(config: ElasticsearchConfig) -> Result<Self, ClientError> {
        let client = Self::build_client(&config)?;
        Ok(Self { client, config })
    }

    fn build_client(config: &ElasticsearchConfig) -> Result<Elasticsearch, ClientError> {
        let url = config
            .nodes
            .first()
            .cloned()
            .unwrap_or_else(|| "http://localhost:9200".to_string());

        let parsed_url: elasticsearch::http::Url =
            url.parse().map_err(|e| ClientError::Connection {
                message: format!("Invalid URL {}: {}", url, e),
            })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| ClientError::Connection {
            message: format!("Failed to build transport: {}", e),
        })?;

        Ok(Elasticsearch::new(transport))
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }

    /// Maps a non-success response to a [`ClientError`].
    async fn rejection(index: &str, response: Response) -> ClientError {
        let status = response.status_code().as_u16();
        let body = response.text().await.unwrap_or_default();

        if body.contains("resource_already_exists_exception") {
            return ClientError::AlreadyExists {
                index: index.to_string(),
            };
        }
        if body.contains("index_not_found_exception") {
            return ClientError::IndexNotFound {
                index: index.to_string(),
            };
        }

        ClientError::Rejected {
            index: index.to_string(),
            status,
            reason: error_reason(&body),
        }
    }
}

/// Extracts `error.reason` from an error body, falling back to the raw text.
fn error_reason(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/reason")
                .and_then(|r| r.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl IndexClient for ElasticsearchIndexClient {
    fn name(&self) -> &'static str {
        "elasticsearch"
    }

    fn physical_index_name(&self, descriptor: &MappingDescriptor) -> String {
        if self.config.index_prefix.is_empty() {
            descriptor.index.clone()
        } else {
            format!("{}_{}", self.config.index_prefix, descriptor.index)
        }
    }

    fn build_mapping_body(&self, descriptor: &MappingDescriptor) -> Result<Value, MappingBuildError> {
        build_mapping_body(descriptor, &self.config.index_settings)
    }

    async fn exists(&self, descriptor: &MappingDescriptor) -> Result<bool, ClientError> {
        let index = self.physical_index_name(descriptor);

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&index]))
            .send()
            .await
            .map_err(|e| ClientError::Connection {
                message: format!("Failed to check index existence for {}: {}", index, e),
            })?;

        let status = response.status_code();
        if status.is_success() {
            return Ok(true);
        }
        if status.as_u16() == 404 {
            return Ok(false);
        }
        Err(Self::rejection(&index, response).await)
    }

    async fn create(&self, descriptor: &MappingDescriptor, body: &Value) -> Result<(), ClientError> {
        let index = self.physical_index_name(descriptor);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| ClientError::Connection {
                message: format!("Failed to create index {}: {}", index, e),
            })?;

        if !response.status_code().is_success() {
            return Err(Self::rejection(&index, response).await);
        }

        tracing::debug!("Created Elasticsearch index '{}'", index);
        Ok(())
    }

    async fn delete(&self, descriptor: &MappingDescriptor) -> Result<(), ClientError> {
        let index = self.physical_index_name(descriptor);

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[&index]))
            .send()
            .await
            .map_err(|e| ClientError::Connection {
                message: format!("Failed to delete index {}: {}", index, e),
            })?;

        if !response.status_code().is_success() {
            return Err(Self::rejection(&index, response).await);
        }

        tracing::debug!("Deleted Elasticsearch index '{}'", index);
        Ok(())
    }

    async fn server_info(&self) -> Result<ServerInfo, ClientError> {
        let response = self
            .client
            .info()
            .send()
            .await
            .map_err(|e| ClientError::Connection {
                message: format!("Failed to fetch server info: {}", e),
            })?;

        if !response.status_code().is_success() {
            return Err(Self::rejection("", response).await);
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::Serialization {
                message: format!("Failed to parse server info: {}", e),
            })?;

        let field = |pointer: &str| {
            body.pointer(pointer)
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string()
        };

        Ok(ServerInfo {
            name: field("/name"),
            cluster_name: field("/cluster_name"),
            version: field("/version/number"),
        })
    }
}
