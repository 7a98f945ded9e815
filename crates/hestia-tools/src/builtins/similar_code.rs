//! Semantic code search over previously extracted library modules.
//!
//! This tool doesn't talk to the engine directly — it delegates to whatever
//! vector index the host wires in, via the [`CodeSearchProvider`] trait. That
//! keeps this crate from depending on the indexing/embedding stack just to
//! describe the one tool that uses it.

use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Default number of results to return when the caller doesn't specify one.
const DEFAULT_TOP_K: usize = 5;

/// A single semantic-search hit over indexed code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSearchResult {
    /// Whether this is an automation or a library module.
    pub kind: String,
    /// Name of the matching automation or module.
    pub name: String,
    /// Full source code of the match.
    pub source_code: String,
    /// Cosine similarity to the query, in `[0, 1]`.
    pub similarity: f32,
}

/// Provides semantic search over indexed code.
///
/// Implemented by the code index service; returns an empty vector whenever
/// the index isn't ready rather than erroring, since an empty result is a
/// valid (if unhelpful) answer to "what's similar to this".
#[async_trait::async_trait]
pub trait CodeSearchProvider: Send + Sync {
    /// Find the `top_k` entries most similar to `query`.
    async fn search_similar(&self, query: &str, top_k: usize) -> Result<Vec<CodeSearchResult>>;
}

/// Finds code in the library/automation corpus similar to a natural-language
/// or code query.
pub struct SearchSimilarCodeTool {
    provider: Arc<dyn CodeSearchProvider>,
}

impl SearchSimilarCodeTool {
    /// Build the tool against a shared search provider.
    #[must_use]
    pub fn new(provider: Arc<dyn CodeSearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait::async_trait]
impl Tool for SearchSimilarCodeTool {
    fn definition(&self) -> &ToolDefinition {
        static DEF: std::sync::OnceLock<ToolDefinition> = std::sync::OnceLock::new();
        DEF.get_or_init(|| {
            ToolDefinition::new(
                "searchSimilarCode",
                "Semantically search previously written automations and library modules for code similar to a query",
            )
            .with_parameters(serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Natural-language or code description of what to find"
                    },
                    "topK": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": DEFAULT_TOP_K
                    }
                },
                "required": ["query"]
            }))
            .with_risk_level(RiskLevel::Low)
            .with_category(ToolCategory::Search)
        })
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let query = input.get("query").and_then(|v| v.as_str()).unwrap_or_default();
        let top_k = input
            .get("topK")
            .and_then(serde_json::Value::as_u64)
            .map_or(DEFAULT_TOP_K, |n| n as usize);

        let results = match self.provider.search_similar(query, top_k).await {
            Ok(results) => results,
            Err(_) => Vec::new(),
        };

        Ok(ToolResult::success(
            serde_json::json!(results),
            start.elapsed().as_millis() as u64,
        ))
    }
}
