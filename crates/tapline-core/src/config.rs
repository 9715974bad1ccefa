//! Application configuration schemas.
//!
//! Configuration structs are deserialized from TOML files via the `config`
//! crate, with environment variables prefixed `TAPLINE_` layered on top.

use serde::{Deserialize, Serialize};

use crate::error::TapError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (default file + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Demo pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Log format: `"json"` or `"pretty"`.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Settings for the demo document pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum document size in bytes accepted by the validation hook.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,
    /// Whether the notification hooks are fired after processing.
    #[serde(default = "default_true")]
    pub notifications: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
            notifications: default_true(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; missing sections fall back to their serde
    /// defaults. Environment variables prefixed with `TAPLINE_` override
    /// file values (`TAPLINE_LOGGING__LEVEL=debug`).
    pub fn load(path: &str) -> Result<Self, TapError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TAPLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| TapError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| TapError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

fn default_max_document_bytes() -> u64 {
    1024 * 1024
}

fn default_true() -> bool {
    true
}
