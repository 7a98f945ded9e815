//! Adapts a [`hestia_tools::ToolRegistry`] to the [`hestia_llm::gateway::ToolExecutor`]
//! trait the Gateway's tool-use loop depends on.
//!
//! `hestia-llm` doesn't depend on `hestia-tools` — the Gateway only knows
//! about the `ToolExecutor` trait it defines itself — so this bridge is
//! where the two get wired together, one layer up.

use hestia_llm::gateway::ToolExecutor;
use hestia_llm::{Error as LlmError, Result as LlmResult};
use hestia_tools::ToolRegistry;
use std::sync::Arc;
use tracing::warn;

/// Executes tool calls against a concrete [`ToolRegistry`].
pub struct ToolRegistryExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolRegistryExecutor {
    /// Wrap a registry for use as a Gateway tool executor.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for ToolRegistryExecutor {
    async fn execute(&self, name: &str, arguments: &str) -> LlmResult<String> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| LlmError::Api(format!("unknown tool: {name}")))?;

        let input: serde_json::Value = serde_json::from_str(arguments)
            .map_err(|e| LlmError::Api(format!("invalid tool arguments for {name}: {e}")))?;

        let result = tool.execute(input).await.map_err(|e| {
            warn!(tool = name, error = %e, "tool execution failed");
            LlmError::Api(format!("tool {name} failed: {e}"))
        })?;

        serde_json::to_string(&result.output)
            .map_err(|e| LlmError::Api(format!("could not serialize tool result: {e}")))
    }
}
