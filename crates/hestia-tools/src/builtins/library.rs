//! Shared library module catalog and source lookup.

use crate::engine::EngineClient;
use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use std::sync::Arc;
use std::time::Instant;

/// Lists every shared library module, with the functions each one exports.
pub struct GetLibraryModulesTool {
    engine: Arc<EngineClient>,
}

impl GetLibraryModulesTool {
    /// Build the tool against a shared engine client.
    #[must_use]
    pub fn new(engine: Arc<EngineClient>) -> Self {
        Self { engine }
    }
}

#[async_trait::async_trait]
impl Tool for GetLibraryModulesTool {
    fn definition(&self) -> &ToolDefinition {
        static DEF: std::sync::OnceLock<ToolDefinition> = std::sync::OnceLock::new();
        DEF.get_or_init(|| {
            ToolDefinition::new(
                "getLibraryModules",
                "List every shared library module, with its description and exported functions",
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
        let modules = self.engine.get_library_modules().await;
        Ok(ToolResult::success(
            serde_json::json!(modules),
            start.elapsed().as_millis() as u64,
        ))
    }
}

/// Fetches the source of a single library module by name.
pub struct GetLibraryCodeTool {
    engine: Arc<EngineClient>,
}

impl GetLibraryCodeTool {
    /// Build the tool against a shared engine client.
    #[must_use]
    pub fn new(engine: Arc<EngineClient>) -> Self {
        Self { engine }
    }
}

#[async_trait::async_trait]
impl Tool for GetLibraryCodeTool {
    fn definition(&self) -> &ToolDefinition {
        static DEF: std::sync::OnceLock<ToolDefinition> = std::sync::OnceLock::new();
        DEF.get_or_init(|| {
            ToolDefinition::new("getLibraryCode", "Fetch the source code of a library module by name")
                .with_parameters(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "moduleName": {
                            "type": "string",
                            "description": "Name of the library module to fetch"
                        }
                    },
                    "required": ["moduleName"]
                }))
                .with_risk_level(RiskLevel::Low)
                .with_category(ToolCategory::Search)
        })
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let module_name = input
            .get("moduleName")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let source = self.engine.get_library_code(module_name).await;
        Ok(ToolResult::success(
            serde_json::json!(source),
            start.elapsed().as_millis() as u64,
        ))
    }
}
