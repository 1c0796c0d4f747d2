//! Startup configuration.
//!
//! The hosting page injects three values before the app boots: a JSON blob
//! describing the backend connection, a namespace id, and an optional
//! pre-issued credential. They are parsed once into [`AppConfig`] and passed
//! down explicitly from there.

use serde::{Deserialize, Serialize};
use shared_types::{Namespace, DEFAULT_NAMESPACE};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Backend endpoint and credentials.
///
/// Unknown keys from the injected blob are kept in `extra` so the full
/// object round-trips.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Base URL of the document/auth API. `None` selects the in-memory backend.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub auth_domain: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ConnectionConfig {
    pub fn from_json(raw: &str) -> ClientResult<Self> {
        let mut config: ConnectionConfig = serde_json::from_str(raw)
            .map_err(|e| ClientError::Config(format!("connection config is not valid JSON: {e}")))?;
        config.endpoint = non_empty(config.endpoint.take()).map(|e| e.trim_end_matches('/').to_string());
        config.api_key = non_empty(config.api_key.take());
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ClientResult<()> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(());
        };
        let parsed = Url::parse(endpoint)
            .map_err(|e| ClientError::Config(format!("endpoint '{endpoint}' is not a URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ClientError::Config(format!(
                "endpoint '{endpoint}' must be an http(s) URL"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    pub namespace: Namespace,
    /// Token for custom sign-in; anonymous sign-in when absent
    pub initial_credential: Option<String>,
}

impl AppConfig {
    /// Build from the raw injected values. Empty strings count as absent.
    pub fn from_injected(
        connection_json: &str,
        namespace: Option<&str>,
        initial_credential: Option<&str>,
    ) -> ClientResult<Self> {
        let connection = ConnectionConfig::from_json(connection_json)?;
        let namespace = namespace
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE);
        if namespace.contains('/') {
            return Err(ClientError::Config(format!(
                "namespace '{namespace}' must not contain '/'"
            )));
        }

        Ok(Self {
            connection,
            namespace: Namespace::new(namespace),
            initial_credential: non_empty(initial_credential.map(str::to_string)),
        })
    }

    /// Configuration with no backend endpoint, served from memory.
    pub fn offline() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            namespace: Namespace::default(),
            initial_credential: None,
        }
    }

    pub fn uses_memory_backend(&self) -> bool {
        self.connection.endpoint.is_none()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
