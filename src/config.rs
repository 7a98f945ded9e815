//! Application configuration — layered embedded defaults, optional local
//! file, and `HESTIA__`-prefixed environment variables, in that priority
//! order.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

/// Embedded default configuration, compiled into the binary.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Ambient HTTP surface.
    pub server: ServerConfig,
    /// Planner tuning.
    pub planner: PlannerSettings,
    /// External automation engine adapter.
    pub engine: EngineConfig,
    /// Code index service.
    pub index: IndexConfig,
}

/// `[server]`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address for `POST /chat` and `GET /health`.
    pub bind_addr: String,
    /// Soft per-session wall-clock timeout, in seconds.
    pub session_timeout_secs: u64,
}

/// `[planner]`
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerSettings {
    /// Retry bound in the validate/fix loop.
    pub max_fix_attempts: u32,
    /// Fan-out cap in `gatherContext`.
    pub max_concurrency: usize,
    /// Fast, cheap model used for classification-style calls.
    pub classification_llm: String,
    /// High-quality model used for code generation.
    pub generation_llm: String,
    /// Timeout for the `gatherContext` fan-out, in seconds.
    pub context_gathering_timeout_secs: u64,
    /// Temperature used for code-generation calls.
    pub generation_temperature: f32,
    /// Temperature used for conversational calls.
    pub conversation_temperature: f32,
    /// Default `topK` for similar-code search during context gathering.
    pub similar_code_top_k: usize,
}

/// `[engine]`
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the automation engine's REST API.
    pub base_url: String,
}

/// `[index]`
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Directory containing `*.star` automations and `lib/*.lib.star` modules.
    pub repo_root: String,
    /// Where to persist the vector index; empty string means in-memory only.
    pub vector_store_path: String,
}

impl PlannerSettings {
    /// Timeout for the `gatherContext` fan-out as a [`Duration`].
    #[must_use]
    pub fn context_gathering_timeout(&self) -> Duration {
        Duration::from_secs(self.context_gathering_timeout_secs)
    }
}

impl ServerConfig {
    /// Soft session timeout as a [`Duration`].
    #[must_use]
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }
}

/// Load configuration from the embedded defaults, an optional
/// `config/local.toml`, and `HESTIA__`-prefixed environment variables.
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/local").required(false))
        .add_source(
            Environment::with_prefix("HESTIA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to build configuration")?;

    config.try_deserialize().context("failed to deserialize configuration")
}
