//! Hestia LLM - LLM Provider Abstraction and Tool-Augmented Gateway
//!
//! This crate provides LLM integration for Hestia:
//! - Router: Provider trait definition and automatic routing
//! - OpenAI, Anthropic, Ollama: concrete provider implementations
//! - Gateway: tool-use loop and structured-object extraction (feature: used by `hestia-core`)
//! - Embeddings: vector embeddings for semantic code search (feature: `embeddings`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// LLM API providers
pub mod providers;

pub use providers::anthropic;
pub mod completion;
#[cfg(feature = "embeddings")]
pub mod embeddings;
pub mod error;
pub mod gateway;
pub mod message;
pub use providers::ollama;
pub use providers::openai;
pub mod router;
pub mod token;
pub mod tools;
pub mod util;

pub use error::{Error, Result};
pub use gateway::{ExtractionStrategy, Gateway, GatewayOptions, StructuredTarget, TimeoutClass};
pub use router::{
    count_message_tokens, count_tokens, CompletionRequest, CompletionResponse, ImageContent,
    LlmProvider, LlmRouter, Message, MessageRole, MockProvider, MockStep, ModelConfig,
    ModelRoutingConfig, ModelTier, ProviderConfig, RouterConfig, RoutingRules, SequencedMockProvider,
    TaskType, TokenBudget, TokenCounter, TokenUsage, ToolCall, ToolChoice, ToolCompletionRequest,
    ToolCompletionResponse, ToolDefinition, TOKEN_COUNTER,
};

// Re-export provider types
pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use ollama::{OllamaConfig, OllamaProvider};
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export embeddings (when feature is enabled)
#[cfg(feature = "embeddings")]
pub use embeddings::{
    default_embedding_provider, EmbeddingProvider, SharedEmbeddingProvider, TractEmbeddingProvider,
};
