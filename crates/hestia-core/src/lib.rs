//! Hestia Core - conversational planning engine
//!
//! This crate provides the GOAP-based planner that turns a user's chat
//! message into either a generated (and validated) home-automation proposal
//! or a conversational answer:
//! - Types: the per-session fact model the planner reasons over
//! - Blackboard: a type-erased fact store keyed by Rust type
//! - Prompts: the fixed prompt catalog, compiled into the binary
//! - Tool bridge: adapts the tool catalog to the LLM gateway's tool-use loop
//! - Planner: the action/condition graph itself
//! - Session: the single entry point external callers use
//! - Utils: retry, circuit breaker, rate limiting, and metrics primitives

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blackboard;
pub mod error;
pub mod planner;
pub mod prompts;
pub mod session;
pub mod tool_bridge;
pub mod types;
pub mod utils;

pub use blackboard::Blackboard;
pub use error::{Error, Result};
pub use planner::{Planner, PlannerConfig};
pub use prompts::PromptCatalog;
pub use session::{SessionFacade, DEFAULT_SESSION_TIMEOUT};
pub use tool_bridge::ToolRegistryExecutor;
pub use types::{
    AutomationRequirements, CodeProposal, ConversationalAnswer, ExtractedCode, FileProposal,
    FinalResponse, GatheredContext, GeneratedCode, HistoryRole, HistoryTurn, IntentType,
    ParsedIntent, UserInput, ValidatedCode, ValidationFailure,
};
pub use utils::{
    metrics_global, retry_with_backoff, CircuitBreaker, CircuitBreakerConfig, CircuitState,
    Counter, Gauge, Histogram, MetricsRegistry, RateLimitConfig, RateLimitResult, RateLimiter,
    RetryConfig, TieredRateLimiter, Timer,
};
