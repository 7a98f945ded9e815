//! LLM provider resolution — registers whichever providers have credentials
//! available in the environment and picks a default.

use anyhow::{anyhow, Result};
use hestia_llm::{AnthropicConfig, AnthropicProvider, LlmProvider, LlmRouter, OllamaConfig, OllamaProvider, OpenAiConfig, OpenAiProvider};
use std::sync::Arc;
use tracing::info;

/// Build an [`LlmRouter`] from every provider with credentials present in
/// the environment, falling back to a local Ollama instance if nothing else
/// is configured.
pub fn resolve_llm_provider() -> Result<Arc<dyn LlmProvider>> {
    let mut router = LlmRouter::new("auto");
    let mut registered = 0;
    let mut default_provider: Option<String> = None;

    if let Ok(config) = OpenAiConfig::from_env() {
        let provider = OpenAiProvider::new(config);
        router.register("openai", Arc::new(provider));
        registered += 1;
        default_provider.get_or_insert_with(|| "openai".to_string());
        info!("registered OpenAI provider");
    }

    if let Ok(config) = AnthropicConfig::from_env() {
        if let Ok(provider) = AnthropicProvider::new(config) {
            router.register("anthropic", Arc::new(provider));
            registered += 1;
            default_provider.get_or_insert_with(|| "anthropic".to_string());
            info!("registered Anthropic provider");
        }
    }

    let ollama_config = OllamaConfig::from_env();
    if let Ok(provider) = OllamaProvider::new(ollama_config) {
        router.register("ollama", Arc::new(provider));
        registered += 1;
        default_provider.get_or_insert_with(|| "ollama".to_string());
        info!("registered Ollama provider (local)");
    }

    if registered == 0 {
        return Err(anyhow!(
            "no LLM provider configured; set OPENAI_API_KEY, ANTHROPIC_API_KEY, \
             or run a local Ollama instance"
        ));
    }

    if let Some(default) = default_provider {
        router.set_default(default);
    }

    info!(providers = ?router.list_providers(), "LLM router initialized");
    Ok(Arc::new(router))
}
