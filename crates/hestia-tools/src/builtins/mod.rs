//! Builtins - the fixed read-only tool catalog exposed to the LLM gateway.
//!
//! Every tool here is low-risk and side-effect free: they either query the
//! engine's catalog endpoints or search the code index. Nothing here writes
//! state or executes arbitrary commands.

mod automations;
mod library;
mod similar_code;
mod state_schema;
mod topics;

pub use automations::GetAutomationsTool;
pub use library::{GetLibraryCodeTool, GetLibraryModulesTool};
pub use similar_code::{CodeSearchProvider, CodeSearchResult, SearchSimilarCodeTool};
pub use state_schema::GetGlobalStateSchemaTool;
pub use topics::{GetAllTopicsTool, SearchTopicsTool};

use crate::engine::EngineClient;
use crate::registry::ToolRegistry;
use std::sync::Arc;

/// Register the full tool catalog with the registry.
///
/// `search_provider` is optional because the code index may not be built yet
/// (e.g. on first boot before anything has been indexed); `searchSimilarCode`
/// is still registered in that case, and falls back to empty results.
pub fn register_builtins(
    registry: &mut ToolRegistry,
    engine: Arc<EngineClient>,
    search_provider: Arc<dyn CodeSearchProvider>,
) {
    registry.register(Arc::new(GetAllTopicsTool::new(engine.clone())));
    registry.register(Arc::new(SearchTopicsTool::new(engine.clone())));
    registry.register(Arc::new(GetAutomationsTool::new(engine.clone())));
    registry.register(Arc::new(GetLibraryModulesTool::new(engine.clone())));
    registry.register(Arc::new(GetLibraryCodeTool::new(engine.clone())));
    registry.register(Arc::new(GetGlobalStateSchemaTool::new(engine)));
    registry.register(Arc::new(SearchSimilarCodeTool::new(search_provider)));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptySearchProvider;

    #[async_trait::async_trait]
    impl CodeSearchProvider for EmptySearchProvider {
        async fn search_similar(
            &self,
            _query: &str,
            _top_k: usize,
        ) -> crate::error::Result<Vec<CodeSearchResult>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_register_builtins() {
        let mut registry = ToolRegistry::new();
        let engine = Arc::new(EngineClient::new("http://127.0.0.1:1"));
        register_builtins(&mut registry, engine, Arc::new(EmptySearchProvider));

        assert!(registry.has("getAllTopics"));
        assert!(registry.has("searchTopics"));
        assert!(registry.has("getAutomations"));
        assert!(registry.has("getLibraryModules"));
        assert!(registry.has("getLibraryCode"));
        assert!(registry.has("getGlobalStateSchema"));
        assert!(registry.has("searchSimilarCode"));
        assert_eq!(registry.len(), 7);
    }
}
