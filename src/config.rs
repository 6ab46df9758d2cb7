//! Service configuration.
//!
//! Settings are read from a TOML document. Every section and field has a
//! default, so an empty document yields a usable in-process configuration
//! with the comment generator disabled.
//!
//! ```toml
//! [database]
//! url = "postgres://task_mirror@localhost/task_mirror"
//! max_connections = 8
//!
//! [feedback.generator]
//! base_url = "http://localhost:11434"
//! model = "llama3.2"
//! timeout_ms = 10000
//!
//! [log]
//! filter = "task_mirror=info"
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Feedback settings.
    pub feedback: FeedbackConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Time allowed to obtain a connection, in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/task_mirror".to_owned(),
            max_connections: 8,
            connect_timeout_ms: 5_000,
        }
    }
}

/// Feedback composition settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedbackConfig {
    /// Optional natural-language comment generator. Absent means every
    /// feedback uses the templated comment.
    pub generator: Option<CommentGeneratorConfig>,
}

/// Settings for the Ollama-backed comment generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentGeneratorConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model name passed to `/api/generate`.
    pub model: String,
    /// Upper bound for a single generation call, in milliseconds.
    pub timeout_ms: u64,
}

impl CommentGeneratorConfig {
    /// Returns the generation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CommentGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_owned(),
            model: "llama3.2".to_owned(),
            timeout_ms: 10_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing-subscriber` env-filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "task_mirror=info".to_owned(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid configuration TOML.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ServiceConfig {
    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_path = path.as_ref();
        let document = std::fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
            path: file_path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&document)
    }
}
