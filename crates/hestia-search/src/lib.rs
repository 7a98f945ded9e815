//! Hestia Search - vector search and semantic code indexing
//!
//! This crate provides the semantic retrieval substrate used to suggest
//! reusable library code during planning:
//! - `VectorIndex`: HNSW-based vector index using usearch
//! - `IndexConfig`: configuration for index parameters
//! - `SearchResult`: raw search result with similarity score
//! - `CodeIndexService`: keeps the index in sync with a file-backed
//!   repository of automation and library source, and answers semantic
//!   similarity queries over it
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Query text                                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ embed_query (hestia-llm)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CodeIndexService                                            │
//! │  ├─ VectorIndex (usearch HNSW)  ~/.hestia/vectors/code.usearch│
//! │  └─ metadata: id -> IndexedCode (name, kind, source, hash)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CodeSearchResult: [(kind, name, sourceCode, similarity), ...]│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hestia_search::{VectorIndex, IndexConfig};
//!
//! // Create index for 768-dimensional embeddings (nomic-embed)
//! let config = IndexConfig::new(768);
//! let index = VectorIndex::new(config)?;
//!
//! // Add vectors
//! index.add("lib:thermostat_schedule", &embedding)?;
//!
//! // Search
//! let results = index.search(&query_embedding, 5)?;
//! for result in results {
//!     println!("{}: score={:.3}", result.id, result.score);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod service;

pub use error::{Error, Result};
pub use index::{IndexConfig, MetricType, SearchResult, VectorIndex};
pub use service::{CodeIndexService, IndexedCode};

/// Get the default vectors directory
pub fn default_vectors_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .map(|p| p.join(".hestia").join("vectors"))
        .unwrap_or_else(|| std::path::PathBuf::from(".hestia/vectors"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vectors_dir() {
        let dir = default_vectors_dir();
        assert!(dir.to_string_lossy().contains("vectors"));
    }
}
