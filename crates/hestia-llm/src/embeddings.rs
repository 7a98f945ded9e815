//! Embedding providers for semantic code search
//!
//! - `EmbeddingProvider` trait for abstraction
//! - `TractEmbeddingProvider` runs a locally cached ONNX embedding model
//!   through `tract-onnx` (a pure-Rust inference runtime) with a matching
//!   `tokenizers` tokenizer, resolved via `hf-hub` on first use.
//!
//! Documents and queries are embedded differently: queries get a
//! model-specific instruction prefix, documents don't.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Prepended to query text before embedding; the document side gets none.
pub const QUERY_PREFIX: &str = "Represent this query for searching relevant code: ";

/// Default truncation bound, in tokens.
pub const DEFAULT_MAX_LENGTH: usize = 8192;

/// Default output dimensionality.
pub const DEFAULT_DIMENSIONS: usize = 768;

/// Trait for embedding providers
///
/// Embedding providers convert text into dense vector representations
/// suitable for semantic similarity search.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a piece of document text (no prefix).
    async fn embed_document(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a search query (model-specific prefix prepended).
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple documents. Default implementation calls
    /// `embed_document` for each text sequentially; providers may override
    /// for real batch inference.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_document(text).await?);
        }
        Ok(embeddings)
    }

    /// Output vector dimension.
    fn dimensions(&self) -> usize;

    /// Whether the model and tokenizer are loaded and ready to serve calls.
    fn is_ready(&self) -> bool;

    /// Provider name.
    fn name(&self) -> &str;

    /// Model identifier.
    fn model(&self) -> &str;
}

/// Wrapper for thread-safe embedding provider access
pub type SharedEmbeddingProvider = Arc<dyn EmbeddingProvider>;

#[cfg(feature = "embeddings")]
mod tract_impl {
    use super::{DEFAULT_DIMENSIONS, DEFAULT_MAX_LENGTH, QUERY_PREFIX};
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tract_onnx::prelude::*;
    use tracing::{debug, info, instrument};

    type RunnableModel = TypedRunnableModel<TypedModel>;

    struct LoadedModel {
        model: RunnableModel,
        tokenizer: tokenizers::Tokenizer,
    }

    /// ONNX-backed embedding provider, pure Rust via `tract-onnx`.
    ///
    /// Model and tokenizer files are resolved from a local cache directory;
    /// if absent, they're fetched once through `hf-hub` before being memoized
    /// on disk for subsequent runs.
    pub struct TractEmbeddingProvider {
        inner: Mutex<Option<LoadedModel>>,
        model_id: String,
        dimensions: usize,
        max_length: usize,
    }

    impl TractEmbeddingProvider {
        /// Load the default model (`nomic-ai/nomic-embed-text-v1.5`, 768 dims)
        /// from the platform cache directory, downloading it first via
        /// `hf-hub` if it isn't already present.
        pub fn new() -> Result<Self> {
            let cache_dir = dirs::cache_dir()
                .map(|d| d.join("hestia").join("models"))
                .ok_or_else(|| {
                    Error::ModelLoadError("could not resolve a cache directory".to_string())
                })?;
            Self::with_cache_dir("nomic-ai/nomic-embed-text-v1.5", &cache_dir, DEFAULT_DIMENSIONS)
        }

        /// Load a named model's `model.onnx`/`tokenizer.json` from `cache_dir`,
        /// fetching them from the hub into that directory if missing.
        pub fn with_cache_dir(model_id: &str, cache_dir: &Path, dimensions: usize) -> Result<Self> {
            info!(model = model_id, cache_dir = %cache_dir.display(), "loading embedding model");

            let (model_path, tokenizer_path) = resolve_model_files(model_id, cache_dir)?;

            let model = tract_onnx::onnx()
                .model_for_path(&model_path)
                .map_err(|e| Error::ModelLoadError(format!("failed to read model graph: {e}")))?
                .into_optimized()
                .map_err(|e| Error::ModelLoadError(format!("failed to optimize model: {e}")))?
                .into_runnable()
                .map_err(|e| Error::ModelLoadError(format!("failed to make model runnable: {e}")))?;

            let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| Error::ModelLoadError(format!("failed to load tokenizer: {e}")))?;

            info!(model = model_id, dimensions, "embedding model ready");

            Ok(Self {
                inner: Mutex::new(Some(LoadedModel { model, tokenizer })),
                model_id: model_id.to_string(),
                dimensions,
                max_length: DEFAULT_MAX_LENGTH,
            })
        }

        /// Override the token-truncation bound (default 8192).
        #[must_use]
        pub fn with_max_length(mut self, max_length: usize) -> Self {
            self.max_length = max_length;
            self
        }

        #[instrument(skip(self, text), fields(text_len = text.len()))]
        fn run(&self, text: &str) -> Result<Vec<f32>> {
            let guard = self.inner.lock().expect("embedding model mutex poisoned");
            let loaded = guard.as_ref().ok_or(Error::ModelNotReady)?;

            let encoding = loaded
                .tokenizer
                .encode(text, true)
                .map_err(|e| Error::Provider(format!("tokenization failed: {e}")))?;

            // Truncate from the end, preserving the leading (prefix) tokens.
            let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let mut mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            ids.truncate(self.max_length);
            mask.truncate(self.max_length);
            let seq_len = ids.len();
            let type_ids = vec![0i64; seq_len];

            let input_ids = Tensor::from_shape(&[1, seq_len], &ids)
                .map_err(|e| Error::Provider(format!("bad input tensor: {e}")))?;
            let attention_mask = Tensor::from_shape(&[1, seq_len], &mask)
                .map_err(|e| Error::Provider(format!("bad attention mask: {e}")))?;
            let token_type_ids = Tensor::from_shape(&[1, seq_len], &type_ids)
                .map_err(|e| Error::Provider(format!("bad token type ids: {e}")))?;

            let outputs = loaded
                .model
                .run(tvec![
                    input_ids.into(),
                    attention_mask.into(),
                    token_type_ids.into()
                ])
                .map_err(|e| Error::Provider(format!("inference failed: {e}")))?;

            let output = outputs
                .first()
                .ok_or_else(|| Error::Provider("model produced no output tensors".to_string()))?;

            let vector = extract_vector(output, self.dimensions)?;
            debug!(dims = vector.len(), "produced embedding");
            Ok(vector)
        }
    }

    #[async_trait]
    impl super::EmbeddingProvider for TractEmbeddingProvider {
        async fn embed_document(&self, text: &str) -> Result<Vec<f32>> {
            // tract inference is synchronous CPU work; run it on the current
            // worker thread without blocking the rest of the runtime.
            tokio::task::block_in_place(|| self.run(text))
        }

        async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
            let prefixed = format!("{QUERY_PREFIX}{text}");
            tokio::task::block_in_place(|| self.run(&prefixed))
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }

        fn is_ready(&self) -> bool {
            self.inner
                .lock()
                .map(|guard| guard.is_some())
                .unwrap_or(false)
        }

        fn name(&self) -> &str {
            "tract-onnx"
        }

        fn model(&self) -> &str {
            &self.model_id
        }
    }

    /// Extract a D-length vector from an output tensor shaped `[D]`, `[1,D]`,
    /// or `[1,seq,D]` (first position only).
    fn extract_vector(tensor: &Tensor, dimensions: usize) -> Result<Vec<f32>> {
        let shape = tensor.shape();
        let data: &[f32] = tensor
            .as_slice::<f32>()
            .map_err(|e| Error::Provider(format!("unexpected tensor dtype: {e}")))?;

        match shape {
            [d] if *d == dimensions => Ok(data.to_vec()),
            [1, d] if *d == dimensions => Ok(data.to_vec()),
            [1, _seq, d] if *d == dimensions => Ok(data[..dimensions].to_vec()),
            other => Err(Error::Provider(format!(
                "unexpected embedding output shape {other:?}, expected a rank matching [{dimensions}], [1,{dimensions}], or [1,seq,{dimensions}]"
            ))),
        }
    }

    fn resolve_model_files(model_id: &str, cache_dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let model_dir = cache_dir.join(model_id.replace('/', "--"));
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if model_path.exists() && tokenizer_path.exists() {
            return Ok((model_path, tokenizer_path));
        }

        std::fs::create_dir_all(&model_dir)
            .map_err(|e| Error::ModelLoadError(format!("could not create cache dir: {e}")))?;

        let api = hf_hub::api::sync::Api::new()
            .map_err(|e| Error::ModelLoadError(format!("hub client init failed: {e}")))?;
        let repo = api.model(model_id.to_string());

        let fetched_model = repo
            .get("model.onnx")
            .map_err(|e| Error::ModelLoadError(format!("model download failed: {e}")))?;
        let fetched_tokenizer = repo
            .get("tokenizer.json")
            .map_err(|e| Error::ModelLoadError(format!("tokenizer download failed: {e}")))?;

        std::fs::copy(&fetched_model, &model_path)
            .map_err(|e| Error::ModelLoadError(format!("could not cache model file: {e}")))?;
        std::fs::copy(&fetched_tokenizer, &tokenizer_path)
            .map_err(|e| Error::ModelLoadError(format!("could not cache tokenizer file: {e}")))?;

        Ok((model_path, tokenizer_path))
    }
}

#[cfg(feature = "embeddings")]
pub use tract_impl::TractEmbeddingProvider;

/// Create the default embedding provider.
#[cfg(feature = "embeddings")]
pub fn default_embedding_provider() -> Result<SharedEmbeddingProvider> {
    Ok(Arc::new(TractEmbeddingProvider::new()?))
}

/// Placeholder when the `embeddings` feature is disabled.
#[cfg(not(feature = "embeddings"))]
pub fn default_embedding_provider() -> Result<SharedEmbeddingProvider> {
    Err(Error::Provider(
        "embeddings feature not enabled; compile with --features embeddings".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    #[cfg(not(feature = "embeddings"))]
    #[test]
    fn test_default_provider_errors_without_feature() {
        let result = super::default_embedding_provider();
        assert!(result.is_err());
    }
}
