//! Configuration loading, validation, and management for Atlas.
//!
//! Loads configuration from `~/.atlas/config.toml` with environment
//! variable overrides. Validates all settings at startup. Configuration is
//! read once at the entry points (CLI, gateway) and passed into each
//! component at construction — no component reads the process environment
//! from inside business logic.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.atlas/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Google Generative Language API key. Mandatory for every pipeline run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier sent to the LLM backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for LLM calls
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Pipeline tuning knobs
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Gateway (web UI) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("search", &self.search)
            .field("pipeline", &self.pipeline)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Web search credentials. Both values are required together; either absent
/// means search is disabled (a degraded mode, not an error).
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Google Programmable Search Engine identifier (the `cx` parameter)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_id: Option<String>,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Hits requested per sub-question search
    #[serde(default = "default_results_per_query")]
    pub results_per_query: u32,

    /// Worker limit for the sub-question search fan-out
    #[serde(default = "default_search_concurrency")]
    pub search_concurrency: usize,
}

fn default_results_per_query() -> u32 {
    5
}
fn default_search_concurrency() -> usize {
    4
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            results_per_query: default_results_per_query(),
            search_concurrency: default_search_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8501
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.atlas/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `GOOGLE_API_KEY` — LLM credential (mandatory for pipeline runs)
    /// - `GOOGLE_MODEL_NAME` — model identifier override
    /// - `GOOGLE_SEARCH_API_KEY` + `GOOGLE_CSE_ID` — enable web search
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Blank env values are treated as unset, not as empty credentials.
        if let Some(key) = env_non_blank("GOOGLE_API_KEY") {
            config.api_key = Some(key);
        }
        if let Some(model) = env_non_blank("GOOGLE_MODEL_NAME") {
            config.model = model;
        }
        if let Some(key) = env_non_blank("GOOGLE_SEARCH_API_KEY") {
            config.search.api_key = Some(key);
        }
        if let Some(cx) = env_non_blank("GOOGLE_CSE_ID") {
            config.search.engine_id = Some(cx);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".atlas")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.pipeline.results_per_query < 1 || self.pipeline.results_per_query > 10 {
            return Err(ConfigError::ValidationError(
                "pipeline.results_per_query must be between 1 and 10".into(),
            ));
        }

        if self.pipeline.search_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.search_concurrency must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if the mandatory LLM credential is available. A blank value
    /// (empty or whitespace-only) counts as missing, so entry-point
    /// preflight checks reject it before any network call.
    pub fn has_api_key(&self) -> bool {
        is_non_blank(&self.api_key)
    }

    /// Search is enabled only when both credentials are present and
    /// non-blank.
    pub fn search_enabled(&self) -> bool {
        is_non_blank(&self.search.api_key) && is_non_blank(&self.search.engine_id)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            search: SearchConfig::default(),
            pipeline: PipelineConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Read an environment variable, treating blank values as unset.
fn env_non_blank(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn is_non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
