//! Remote library catalog access.
//!
//! The registry is a single JSON document hosted over HTTP:
//!
//! ```json
//! { "libraries": { "foolib": { "source": "https://...", "version": "v1.0" } } }
//! ```
//!
//! Every resolution re-fetches the document; nothing is cached on disk.
//! Neither the document nor the sources it points at are integrity-checked,
//! so the registry host is fully trusted. That is acceptable for a local
//! developer tool and for nothing beyond it.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Default location of the library catalog.
pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/ctpldev/mpm-registry/main/registry.json";

/// Environment variable overriding the catalog location.
pub const REGISTRY_URL_ENV: &str = "MPM_REGISTRY";

/// Errors that can occur during registry operations.
///
/// `Network` and `Http` mean the registry could not be consulted at all;
/// callers report them distinctly from a library that is simply absent
/// from a catalog that was fetched fine.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Transport-level failure before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The registry host answered with a non-success status.
    #[error("registry returned HTTP status {0}")]
    Http(u16),

    /// The response body is not a valid catalog document.
    #[error("invalid registry document: {0}")]
    Parse(String),
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryEntry {
    /// Git URL the library is cloned from.
    pub source: String,

    /// Pinned git ref (tag or branch) to clone at.
    pub version: String,
}

/// The catalog of installable libraries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registry {
    /// Map of library name to entry. Absent in the document means empty.
    #[serde(default)]
    pub libraries: BTreeMap<String, LibraryEntry>,
}

impl Registry {
    /// Parses a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON of the catalog
    /// shape.
    pub fn parse(content: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(content).map_err(|e| RegistryError::Parse(e.to_string()))
    }

    /// Looks up a library by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LibraryEntry> {
        self.libraries.get(name)
    }

    /// Returns the number of catalogued libraries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Returns true if the catalog lists no libraries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Catalog URL.
    pub url: String,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let url = std::env::var(REGISTRY_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_REGISTRY_URL.to_string());
        Self {
            url,
            user_agent: format!("mpm/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Client for fetching the library catalog.
pub struct RegistryClient {
    config: RegistryConfig,
    http_client: reqwest::blocking::Client,
}

impl RegistryClient {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates a client with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: RegistryConfig) -> Result<Self, RegistryError> {
        let http_client = reqwest::blocking::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the catalog URL this client fetches from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Fetches the current catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is unreachable, answers with a
    /// non-success status, or serves a malformed document.
    pub fn fetch(&self) -> Result<Registry, RegistryError> {
        let response = self
            .http_client
            .get(&self.config.url)
            .send()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Http(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| RegistryError::Network(e.to_string()))?;
        Registry::parse(&body)
    }
}
