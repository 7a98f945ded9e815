//! Mock LLM Provider for testing
//!
//! This module provides a mock provider that returns empty responses, and a
//! [`SequencedMockProvider`] for tests that need differentiated responses
//! across a multi-step call sequence (e.g. driving a planner through
//! `parseIntent` -> `extractRequirements` -> `generateCode`).

use super::provider::LlmProvider;
use crate::completion::{
    CompletionRequest, CompletionResponse, ToolCompletionRequest, ToolCompletionResponse,
};
use crate::error::Result;
use crate::tools::ToolCall;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A mock LLM provider that returns empty responses. Useful for testing.
pub struct MockProvider;

impl Default for MockProvider {
    fn default() -> Self {
        Self
    }
}

impl MockProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports_tools(&self) -> bool {
        true
    }

    fn available_models(&self) -> Vec<String> {
        vec!["mock-model".to_string()]
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        Ok(CompletionResponse {
            content: "mock response".to_string(),
            usage: None,
            finish_reason: Some("stop".to_string()),
            model: "mock-model".to_string(),
        })
    }

    async fn complete_with_tools(
        &self,
        _request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse> {
        Ok(ToolCompletionResponse {
            content: Some("mock response".to_string()),
            tool_calls: vec![],
            usage: None,
            finish_reason: Some("stop".to_string()),
            model: "mock-model".to_string(),
        })
    }
}

/// A single queued response for [`SequencedMockProvider`].
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Returned from the next `complete` (non-tool) call.
    Text(String),
    /// Returned from the next `complete_with_tools` call as a terminal
    /// message (no tool calls requested).
    ToolTerminal(String),
    /// Returned from the next `complete_with_tools` call as a tool-call
    /// request.
    ToolCall {
        /// Tool name to invoke.
        name: String,
        /// JSON-encoded arguments.
        arguments: String,
    },
}

/// A provider that replays a fixed queue of responses, one per `complete`/
/// `complete_with_tools` call, in call order. Lets a test drive a planner
/// through a specific sequence of LLM-backed actions with differentiated
/// JSON at each step, instead of every call seeing the same fixed text.
pub struct SequencedMockProvider {
    steps: Mutex<VecDeque<MockStep>>,
}

impl SequencedMockProvider {
    /// Queue `steps`, replayed in order as calls come in.
    #[must_use]
    pub fn new(steps: Vec<MockStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
        }
    }

    fn next_step(&self) -> MockStep {
        self.steps
            .lock()
            .expect("sequenced mock provider queue poisoned")
            .pop_front()
            .expect("SequencedMockProvider queue exhausted; queue more steps than the scenario needs")
    }
}

#[async_trait::async_trait]
impl LlmProvider for SequencedMockProvider {
    fn name(&self) -> &str {
        "sequenced-mock"
    }

    fn supports_tools(&self) -> bool {
        true
    }

    fn available_models(&self) -> Vec<String> {
        vec!["mock-model".to_string()]
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        let content = match self.next_step() {
            MockStep::Text(text) | MockStep::ToolTerminal(text) => text,
            MockStep::ToolCall { name, .. } => panic!(
                "SequencedMockProvider: queued a ToolCall step (`{name}`) for a non-tool `complete` call"
            ),
        };
        Ok(CompletionResponse {
            content,
            usage: None,
            finish_reason: Some("stop".to_string()),
            model: "mock-model".to_string(),
        })
    }

    async fn complete_with_tools(
        &self,
        _request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse> {
        match self.next_step() {
            MockStep::Text(text) | MockStep::ToolTerminal(text) => Ok(ToolCompletionResponse {
                content: Some(text),
                tool_calls: vec![],
                usage: None,
                finish_reason: Some("stop".to_string()),
                model: "mock-model".to_string(),
            }),
            MockStep::ToolCall { name, arguments } => Ok(ToolCompletionResponse {
                content: None,
                tool_calls: vec![ToolCall {
                    id: "call_1".to_string(),
                    name,
                    arguments,
                }],
                usage: None,
                finish_reason: Some("tool_calls".to_string()),
                model: "mock-model".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequenced_mock_provider_replays_in_order() {
        let provider = SequencedMockProvider::new(vec![
            MockStep::Text("first".to_string()),
            MockStep::Text("second".to_string()),
        ]);
        let req = CompletionRequest::new("mock-model".to_string());
        assert_eq!(provider.complete(req.clone()).await.unwrap().content, "first");
        assert_eq!(provider.complete(req).await.unwrap().content, "second");
    }

    #[tokio::test]
    #[should_panic(expected = "queue exhausted")]
    async fn test_sequenced_mock_provider_panics_when_exhausted() {
        let provider = SequencedMockProvider::new(vec![MockStep::Text("only".to_string())]);
        let req = CompletionRequest::new("mock-model".to_string());
        let _ = provider.complete(req.clone()).await;
        let _ = provider.complete(req).await;
    }
}
