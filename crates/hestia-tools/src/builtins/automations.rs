//! Lists the automations currently deployed to the engine.

use crate::engine::EngineClient;
use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use std::sync::Arc;
use std::time::Instant;

/// Lists every automation the engine knows about, enabled or not.
pub struct GetAutomationsTool {
    engine: Arc<EngineClient>,
}

impl GetAutomationsTool {
    /// Build the tool against a shared engine client.
    #[must_use]
    pub fn new(engine: Arc<EngineClient>) -> Self {
        Self { engine }
    }
}

#[async_trait::async_trait]
impl Tool for GetAutomationsTool {
    fn definition(&self) -> &ToolDefinition {
        static DEF: std::sync::OnceLock<ToolDefinition> = std::sync::OnceLock::new();
        DEF.get_or_init(|| {
            ToolDefinition::new(
                "getAutomations",
                "List the automations currently deployed to the engine, with name, description, and enabled status",
            )
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
        let automations = self.engine.get_automations().await;
        Ok(ToolResult::success(
            serde_json::json!(automations),
            start.elapsed().as_millis() as u64,
        ))
    }
}
