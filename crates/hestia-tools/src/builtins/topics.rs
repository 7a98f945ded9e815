//! Topic-catalog tools: list every topic the engine knows about, or search
//! that list by substring.

use crate::engine::EngineClient;
use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use std::sync::Arc;
use std::time::Instant;

/// Lists every topic known to the engine.
pub struct GetAllTopicsTool {
    engine: Arc<EngineClient>,
}

impl GetAllTopicsTool {
    /// Build the tool against a shared engine client.
    #[must_use]
    pub fn new(engine: Arc<EngineClient>) -> Self {
        Self { engine }
    }
}

#[async_trait::async_trait]
impl Tool for GetAllTopicsTool {
    fn definition(&self) -> &ToolDefinition {
        static DEF: std::sync::OnceLock<ToolDefinition> = std::sync::OnceLock::new();
        DEF.get_or_init(|| {
            ToolDefinition::new("getAllTopics", "List every topic known to the automation engine")
                .with_parameters(serde_json::json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }))
                .with_risk_level(RiskLevel::Low)
                .with_category(ToolCategory::Search)
        })
    }

    async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let topics = self.engine.get_all_topics().await;
        Ok(ToolResult::success(
            serde_json::json!(topics),
            start.elapsed().as_millis() as u64,
        ))
    }
}

/// Searches topic names by case-insensitive substring.
pub struct SearchTopicsTool {
    engine: Arc<EngineClient>,
}

impl SearchTopicsTool {
    /// Build the tool against a shared engine client.
    #[must_use]
    pub fn new(engine: Arc<EngineClient>) -> Self {
        Self { engine }
    }
}

#[async_trait::async_trait]
impl Tool for SearchTopicsTool {
    fn definition(&self) -> &ToolDefinition {
        static DEF: std::sync::OnceLock<ToolDefinition> = std::sync::OnceLock::new();
        DEF.get_or_init(|| {
            ToolDefinition::new("searchTopics", "Search topic names by case-insensitive substring")
                .with_parameters(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "pattern": {
                            "type": "string",
                            "description": "Substring to match against topic names"
                        }
                    },
                    "required": ["pattern"]
                }))
                .with_risk_level(RiskLevel::Low)
                .with_category(ToolCategory::Search)
        })
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let pattern = input
            .get("pattern")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_lowercase();

        let topics = self.engine.get_all_topics().await;
        let matches: Vec<&String> = topics
            .iter()
            .filter(|t| t.to_lowercase().contains(&pattern))
            .collect();

        Ok(ToolResult::success(
            serde_json::json!(matches),
            start.elapsed().as_millis() as u64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_topics_filters_by_substring() {
        let engine = Arc::new(EngineClient::new("http://127.0.0.1:1"));
        let tool = SearchTopicsTool::new(engine);
        let result = tool
            .execute(serde_json::json!({"pattern": "light"}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, serde_json::json!([]));
    }
}
