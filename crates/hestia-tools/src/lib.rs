//! Hestia Tools - Tool Registry and Execution Engine
//!
//! This crate provides the read-only tool catalog the LLM gateway can call
//! into while planning and generating automations:
//! - Registry: Tool registration and discovery
//! - Engine: REST client for the automation engine's catalog/validation API
//! - Builtins: the fixed Tool Catalog (topics, automations, library, search)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod engine;
pub mod error;
pub mod registry;

pub use builtins::{register_builtins, CodeSearchProvider, CodeSearchResult};
pub use engine::{AutomationSummary, CodeKind, EngineClient, LibraryModule, ValidationOutcome};
pub use error::{Error, Result};
pub use registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolRegistry, ToolResult};
