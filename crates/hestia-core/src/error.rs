//! Error types for hestia-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Planning failed — bad invariant, unreachable plan, or invalid input.
    #[error("planning error: {0}")]
    Planning(String),

    /// No eligible action at a planner selection step.
    #[error("no applicable plan action found")]
    NoPlanApplicable,

    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] hestia_llm::Error),

    /// Tool execution error
    #[error("tool error: {0}")]
    Tool(#[from] hestia_tools::Error),

    /// Internal error (serialization, invariant violation, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
