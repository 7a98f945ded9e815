//! Global-state key schema lookup.

use crate::engine::EngineClient;
use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use std::sync::Arc;
use std::time::Instant;

/// Returns the mapping of global-state key patterns to the automations that
/// read or write them.
pub struct GetGlobalStateSchemaTool {
    engine: Arc<EngineClient>,
}

impl GetGlobalStateSchemaTool {
    /// Build the tool against a shared engine client.
    #[must_use]
    pub fn new(engine: Arc<EngineClient>) -> Self {
        Self { engine }
    }
}

#[async_trait::async_trait]
impl Tool for GetGlobalStateSchemaTool {
    fn definition(&self) -> &ToolDefinition {
        static DEF: std::sync::OnceLock<ToolDefinition> = std::sync::OnceLock::new();
        DEF.get_or_init(|| {
            ToolDefinition::new(
                "getGlobalStateSchema",
                "Get the mapping of global-state key patterns to the automations that use them",
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
        let schema = self.engine.get_global_state_schema().await;
        Ok(ToolResult::success(
            serde_json::json!(schema),
            start.elapsed().as_millis() as u64,
        ))
    }
}
