//! Code Index Service - keeps a vector store in sync with a file-backed
//! repository of automation and library source, and answers semantic
//! similarity queries over it.

use crate::error::{Error, Result};
use crate::index::{IndexConfig, VectorIndex};
use hestia_llm::embeddings::SharedEmbeddingProvider;
use hestia_tools::{CodeKind, CodeSearchProvider, CodeSearchResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Automation files live directly under the repository root with this extension.
const AUTOMATION_EXT: &str = "star";
/// Library modules live under this subdirectory of the repository root.
const LIBRARY_DIR: &str = "lib";
/// Library module filename suffix (`foo.lib.star`).
const LIBRARY_SUFFIX: &str = ".lib.star";

/// A piece of indexed source, plus the metadata needed to keep the vector
/// store in sync with its file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedCode {
    /// Stable identifier, derived from `kind` and `name`.
    pub id: String,
    /// Whether this is an automation or a library module.
    pub kind: CodeKind,
    /// Automation or module name.
    pub name: String,
    /// Full source text as last indexed.
    pub source_code: String,
    /// SHA-256 hex digest of `source_code`, used to detect file changes.
    pub source_hash: String,
    /// Path the source was read from, relative to the repository root.
    pub path: PathBuf,
}

impl IndexedCode {
    fn new(kind: CodeKind, name: String, source_code: String, path: PathBuf) -> Self {
        let source_hash = hash_source(&source_code);
        let id = index_id(kind, &name);
        Self {
            id,
            kind,
            name,
            source_code,
            source_hash,
            path,
        }
    }
}

fn index_id(kind: CodeKind, name: &str) -> String {
    let tag = match kind {
        CodeKind::Automation => "automation",
        CodeKind::Library => "library",
    };
    format!("{tag}:{name}")
}

fn hash_source(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Maintains a [`VectorIndex`] aligned with a repository of `*.star`
/// automation files and `lib/*.lib.star` library modules.
pub struct CodeIndexService {
    embeddings: SharedEmbeddingProvider,
    index: VectorIndex,
    metadata: RwLock<HashMap<String, IndexedCode>>,
    repo_root: PathBuf,
    ready: AtomicBool,
}

impl CodeIndexService {
    /// Build a service backed by a fresh in-memory index, watching `repo_root`.
    pub fn new(embeddings: SharedEmbeddingProvider, repo_root: impl Into<PathBuf>) -> Result<Self> {
        let config = IndexConfig::new(embeddings.dimensions());
        let index = VectorIndex::new(config)?;
        Ok(Self {
            embeddings,
            index,
            metadata: RwLock::new(HashMap::new()),
            repo_root: repo_root.into(),
            ready: AtomicBool::new(false),
        })
    }

    /// Build a service whose index is persisted at `index_path`, loading any
    /// existing data found there.
    pub fn open(
        embeddings: SharedEmbeddingProvider,
        repo_root: impl Into<PathBuf>,
        index_path: &Path,
    ) -> Result<Self> {
        let config = IndexConfig::new(embeddings.dimensions());
        let index = VectorIndex::open(index_path, config)?;
        Ok(Self {
            embeddings,
            index,
            metadata: RwLock::new(HashMap::new()),
            repo_root: repo_root.into(),
            ready: AtomicBool::new(false),
        })
    }

    /// True iff the embedding model backing this service is loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire) && self.embeddings.is_ready()
    }

    /// Scan the repository from scratch: embed new or changed files, drop
    /// entries for files that no longer exist.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<usize> {
        let discovered = discover_files(&self.repo_root)?;
        let mut seen_ids = std::collections::HashSet::new();
        let mut updated = 0;

        for (kind, name, path) in discovered {
            let source_code = std::fs::read_to_string(&path)
                .map_err(|e| Error::Repository(format!("{}: {e}", path.display())))?;
            let id = index_id(kind, &name);
            seen_ids.insert(id.clone());

            let hash = hash_source(&source_code);
            let unchanged = self
                .metadata
                .read()
                .expect("code index metadata lock poisoned")
                .get(&id)
                .is_some_and(|existing| existing.source_hash == hash);

            if unchanged {
                continue;
            }

            self.upsert(kind, name, source_code, path).await?;
            updated += 1;
        }

        let stale: Vec<String> = {
            let metadata = self.metadata.read().expect("code index metadata lock poisoned");
            metadata
                .keys()
                .filter(|id| !seen_ids.contains(*id))
                .cloned()
                .collect()
        };
        for id in &stale {
            self.remove(id)?;
        }

        self.ready.store(true, Ordering::Release);
        info!(updated, removed = stale.len(), total = seen_ids.len(), "code index synced");
        Ok(updated)
    }

    /// Re-embed and upsert just the given files, without a full repository scan.
    #[instrument(skip(self, files))]
    pub async fn on_deployed(&self, files: &[PathBuf]) -> Result<usize> {
        let mut updated = 0;
        for path in files {
            let Some((kind, name)) = classify(&self.repo_root, path) else {
                warn!(path = %path.display(), "skipping deployed file outside the automation/library layout");
                continue;
            };
            let source_code = std::fs::read_to_string(path)
                .map_err(|e| Error::Repository(format!("{}: {e}", path.display())))?;
            self.upsert(kind, name, source_code, path.clone()).await?;
            updated += 1;
        }
        Ok(updated)
    }

    async fn upsert(&self, kind: CodeKind, name: String, source_code: String, path: PathBuf) -> Result<()> {
        let vector = self.embeddings.embed_document(&source_code).await?;
        let entry = IndexedCode::new(kind, name, source_code, path);

        if self.index.contains(&entry.id) {
            self.index.update(&entry.id, &vector)?;
        } else {
            self.index.add(&entry.id, &vector)?;
        }
        self.metadata
            .write()
            .expect("code index metadata lock poisoned")
            .insert(entry.id.clone(), entry);
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<()> {
        self.index.remove(id)?;
        self.metadata
            .write()
            .expect("code index metadata lock poisoned")
            .remove(id);
        Ok(())
    }

    /// Semantic search over indexed code, returning the `top_k` closest matches.
    #[instrument(skip(self, query_text))]
    pub async fn search(&self, query_text: &str, top_k: usize) -> Result<Vec<CodeSearchResult>> {
        if !self.is_ready() {
            debug!("code index not ready, returning empty search results");
            return Ok(Vec::new());
        }

        let query_vector = self.embeddings.embed_query(query_text).await?;
        let hits = self.index.search(&query_vector, top_k)?;

        let metadata = self.metadata.read().expect("code index metadata lock poisoned");
        let results = hits
            .into_iter()
            .filter_map(|hit| {
                metadata.get(&hit.id).map(|entry| CodeSearchResult {
                    kind: match entry.kind {
                        CodeKind::Automation => "automation".to_string(),
                        CodeKind::Library => "library".to_string(),
                    },
                    name: entry.name.clone(),
                    source_code: entry.source_code.clone(),
                    similarity: hit.score.clamp(0.0, 1.0),
                })
            })
            .collect();
        Ok(results)
    }
}

#[async_trait::async_trait]
impl CodeSearchProvider for CodeIndexService {
    async fn search_similar(
        &self,
        query: &str,
        top_k: usize,
    ) -> hestia_tools::error::Result<Vec<CodeSearchResult>> {
        self.search(query, top_k)
            .await
            .map_err(|e| hestia_tools::error::Error::Execution(e.to_string()))
    }
}

/// Walk the repository root for `*.star` automations and `lib/*.lib.star`
/// library modules.
fn discover_files(repo_root: &Path) -> Result<Vec<(CodeKind, String, PathBuf)>> {
    let mut found = Vec::new();

    if repo_root.is_dir() {
        for entry in std::fs::read_dir(repo_root)
            .map_err(|e| Error::Repository(format!("{}: {e}", repo_root.display())))?
        {
            let entry = entry.map_err(|e| Error::Repository(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(AUTOMATION_EXT) {
                if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                    found.push((CodeKind::Automation, name.to_string(), path));
                }
            }
        }
    }

    let lib_dir = repo_root.join(LIBRARY_DIR);
    if lib_dir.is_dir() {
        for entry in std::fs::read_dir(&lib_dir)
            .map_err(|e| Error::Repository(format!("{}: {e}", lib_dir.display())))?
        {
            let entry = entry.map_err(|e| Error::Repository(e.to_string()))?;
            let path = entry.path();
            let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
            if let Some(name) = filename.strip_suffix(LIBRARY_SUFFIX) {
                found.push((CodeKind::Library, name.to_string(), path));
            }
        }
    }

    Ok(found)
}

/// Classify a single deployed path as an automation or library module,
/// mirroring [`discover_files`]'s layout rules.
fn classify(repo_root: &Path, path: &Path) -> Option<(CodeKind, String)> {
    let filename = path.file_name()?.to_str()?;

    if path.parent() == Some(&repo_root.join(LIBRARY_DIR)) {
        return filename
            .strip_suffix(LIBRARY_SUFFIX)
            .map(|name| (CodeKind::Library, name.to_string()));
    }

    if path.extension().and_then(|e| e.to_str()) == Some(AUTOMATION_EXT) {
        let name = path.file_stem()?.to_str()?.to_string();
        return Some((CodeKind::Automation, name));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_id_tags_by_kind() {
        assert_eq!(index_id(CodeKind::Automation, "porch_lights"), "automation:porch_lights");
        assert_eq!(index_id(CodeKind::Library, "thermostat_schedule"), "library:thermostat_schedule");
    }

    #[test]
    fn test_hash_source_is_stable() {
        assert_eq!(hash_source("foo"), hash_source("foo"));
        assert_ne!(hash_source("foo"), hash_source("bar"));
    }

    #[test]
    fn test_discover_files_finds_automations_and_library_modules() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("porch_lights.star"), "automation code").unwrap();
        std::fs::create_dir(dir.path().join("lib")).unwrap();
        std::fs::write(
            dir.path().join("lib").join("thermostat_schedule.lib.star"),
            "library code",
        )
        .unwrap();

        let found = discover_files(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|(k, n, _)| *k == CodeKind::Automation && n == "porch_lights"));
        assert!(found.iter().any(|(k, n, _)| *k == CodeKind::Library && n == "thermostat_schedule"));
    }

    #[test]
    fn test_classify_matches_discover_files_layout() {
        let root = Path::new("/repo");
        assert_eq!(
            classify(root, Path::new("/repo/porch_lights.star")),
            Some((CodeKind::Automation, "porch_lights".to_string()))
        );
        assert_eq!(
            classify(root, Path::new("/repo/lib/thermostat_schedule.lib.star")),
            Some((CodeKind::Library, "thermostat_schedule".to_string()))
        );
        assert_eq!(classify(root, Path::new("/repo/notes.txt")), None);
    }
}
