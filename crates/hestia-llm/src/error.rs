//! Error types for hestia-llm

use thiserror::Error;

/// LLM error type
#[derive(Debug, Error)]
pub enum Error {
    /// Provider not configured
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// API error
    #[error("api error: {0}")]
    Api(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimit,

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Schema validation failed
    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Embedding provider error
    #[error("provider error: {0}")]
    Provider(String),

    /// Structured-object extraction exhausted every fallback strategy
    #[error("could not parse structured output: {0}")]
    ParseError(String),

    /// Embedding model or tokenizer not loaded
    #[error("embedding model not ready")]
    ModelNotReady,

    /// Embedding model failed to load from its cache directory
    #[error("embedding model load failed: {0}")]
    ModelLoadError(String),

    /// Tool-use loop exceeded its step budget without a terminal message
    #[error("tool loop exceeded {0} steps")]
    ToolLoopExhausted(usize),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
