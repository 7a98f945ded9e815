//! Entry point: wires configuration, the LLM gateway, the external engine
//! adapter, the code index, and the planner into the ambient HTTP surface.

mod config;
mod http;
mod llm;

use anyhow::{Context, Result};
use async_trait::async_trait;
use hestia_core::{Planner, PlannerConfig, PromptCatalog, SessionFacade};
use hestia_llm::embeddings::{EmbeddingProvider, SharedEmbeddingProvider};
use hestia_llm::gateway::Gateway;
use hestia_search::CodeIndexService;
use hestia_tools::builtins::register_builtins;
use hestia_tools::{CodeSearchProvider, EngineClient, ToolRegistry};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Placeholder embedding provider used when no real model is available.
/// Always reports not-ready, so [`CodeIndexService::search`] degrades to an
/// empty result set rather than erroring the whole request.
struct NullEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    async fn embed_document(&self, _text: &str) -> hestia_llm::Result<Vec<f32>> {
        Err(hestia_llm::Error::ModelNotReady)
    }

    async fn embed_query(&self, _text: &str) -> hestia_llm::Result<Vec<f32>> {
        Err(hestia_llm::Error::ModelNotReady)
    }

    fn dimensions(&self) -> usize {
        hestia_llm::embeddings::DEFAULT_DIMENSIONS
    }

    fn is_ready(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "null"
    }

    fn model(&self) -> &str {
        "none"
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "hestia=info,tower_http=info".into()))
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    guard
}

fn load_embedding_provider() -> SharedEmbeddingProvider {
    match hestia_llm::embeddings::default_embedding_provider() {
        Ok(provider) => provider,
        Err(err) => {
            tracing::warn!(error = %err, "embedding model unavailable, code search disabled until one loads");
            Arc::new(NullEmbeddingProvider)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _tracing_guard = init_tracing();

    let app_config = config::load_config().context("failed to load configuration")?;

    let provider = llm::resolve_llm_provider()?;
    let gateway = Arc::new(Gateway::new(provider));
    let prompts = Arc::new(PromptCatalog::new());
    let engine = Arc::new(EngineClient::new(app_config.engine.base_url.clone()));

    let embeddings = load_embedding_provider();
    let code_index = Arc::new(if app_config.index.vector_store_path.is_empty() {
        CodeIndexService::new(embeddings, app_config.index.repo_root.clone())
            .context("failed to build code index")?
    } else {
        CodeIndexService::open(
            embeddings,
            app_config.index.repo_root.clone(),
            Path::new(&app_config.index.vector_store_path),
        )
        .context("failed to open code index")?
    });

    if let Err(err) = code_index.sync().await {
        tracing::warn!(error = %err, "initial code index sync failed, search will stay degraded until the next sync");
    }

    let search: Arc<dyn CodeSearchProvider> = code_index.clone();

    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, engine.clone(), search.clone());
    let tools = Arc::new(registry);

    let planner_config = PlannerConfig {
        max_fix_attempts: app_config.planner.max_fix_attempts,
        max_concurrency: app_config.planner.max_concurrency,
        classification_llm: app_config.planner.classification_llm.clone(),
        generation_llm: app_config.planner.generation_llm.clone(),
        context_gathering_timeout: app_config.planner.context_gathering_timeout(),
        generation_temperature: app_config.planner.generation_temperature,
        conversation_temperature: app_config.planner.conversation_temperature,
        similar_code_top_k: app_config.planner.similar_code_top_k,
    };

    let planner = Arc::new(Planner::new(gateway, prompts, engine, search, tools, planner_config));
    let session = Arc::new(SessionFacade::with_timeout(planner, app_config.server.session_timeout()));

    let app = http::router(http::AppState { session });

    let listener = tokio::net::TcpListener::bind(&app_config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", app_config.server.bind_addr))?;
    tracing::info!(addr = %app_config.server.bind_addr, "hestia listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
