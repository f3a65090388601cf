//! Indexer / Scheduler: drives the full pipeline from a workspace root to a
//! consistent relational store, search index, and vector store.
//!
//! `crate::watcher` handles single-file changes as they happen; this module
//! handles the initial full index and any later backfill pass, using the
//! same per-file commit primitives so a query mid-index sees either a
//! file's old contents or its new contents, never a mix.

mod commit;

pub use commit::CommitOutcome;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::database::SymbolDatabase;
use crate::embeddings::{EmbeddingEngine, VectorStore};
use crate::extractors::ExtractorManager;
use crate::ignore::IgnoreResolver;
use crate::reachability;
use crate::scan;
use crate::search::LexicalEngine;

/// Symbols batched into one ONNX call per the embedding gateway.
const EMBED_BATCH_SIZE: usize = 64;

/// Outcome of one `index_workspace` pass.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub files_scanned: usize,
    pub files_indexed: usize,
    pub files_unchanged: usize,
    pub files_failed: usize,
    pub files_deleted: usize,
    pub symbols_indexed: usize,
    pub relationships_indexed: usize,
    pub reachability_edges: Option<usize>,
}

/// Drives Scan -> Extract -> Embed -> Commit -> Delete -> Refresh over an
/// entire workspace.
pub struct Indexer {
    workspace_root: PathBuf,
    workspace_id: String,
    db: Arc<Mutex<SymbolDatabase>>,
    embeddings: Option<Arc<RwLock<Option<EmbeddingEngine>>>>,
    vector_store: Option<Arc<RwLock<VectorStore>>>,
    search: Option<Arc<RwLock<LexicalEngine>>>,
    extractor_manager: Arc<ExtractorManager>,
    ignore_resolver: IgnoreResolver,
}

impl Indexer {
    pub fn new(
        workspace_root: PathBuf,
        workspace_id: String,
        db: Arc<Mutex<SymbolDatabase>>,
        embeddings: Option<Arc<RwLock<Option<EmbeddingEngine>>>>,
        vector_store: Option<Arc<RwLock<VectorStore>>>,
        search: Option<Arc<RwLock<LexicalEngine>>>,
        extractor_manager: Arc<ExtractorManager>,
        ignore_overrides: &[String],
    ) -> Result<Self> {
        let ignore_resolver = IgnoreResolver::new(&workspace_root, ignore_overrides)?;
        Ok(Self {
            workspace_root,
            workspace_id,
            db,
            embeddings,
            vector_store,
            search,
            extractor_manager,
            ignore_resolver,
        })
    }

    /// Run a full pass: scan the tree, (re)index every file whose content
    /// hash changed, delete rows for files no longer on disk, and refresh
    /// reachability if it's now stale.
    pub async fn index_workspace(&self) -> Result<IndexStats> {
        let mut stats = IndexStats::default();

        let scan_result = scan::scan(&self.workspace_root, &self.ignore_resolver)?;
        stats.files_scanned = scan_result.indexable.len();
        info!(
            "Scanned {} indexable files under {}",
            scan_result.indexable.len(),
            self.workspace_root.display()
        );

        let existing_hashes = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            db.get_file_hashes_for_workspace()?
        };

        let mut changed: Vec<PathBuf> = Vec::new();
        let mut seen_paths: HashSet<String> = HashSet::new();
        for relative in &scan_result.indexable {
            let key = relative.to_string_lossy().replace('\\', "/");
            seen_paths.insert(key.clone());
            let new_hash = scan_result.content_hashes.get(relative);
            let unchanged = matches!(
                (existing_hashes.get(&key), new_hash),
                (Some(old), Some(new)) if old == new
            );
            if unchanged {
                stats.files_unchanged += 1;
            } else {
                changed.push(relative.clone());
            }
        }

        debug!(
            "{} files changed or new, {} unchanged",
            changed.len(),
            stats.files_unchanged
        );

        for batch in changed.chunks(EMBED_BATCH_SIZE) {
            for relative in batch {
                match self.index_one_file(relative).await {
                    Ok(outcome) => {
                        stats.files_indexed += 1;
                        stats.symbols_indexed += outcome.symbols;
                        stats.relationships_indexed += outcome.relationships;
                    }
                    Err(e) => {
                        warn!(
                            "Retrying {} once after indexing failure: {}",
                            relative.display(),
                            e
                        );
                        match self.index_one_file(relative).await {
                            Ok(outcome) => {
                                stats.files_indexed += 1;
                                stats.symbols_indexed += outcome.symbols;
                                stats.relationships_indexed += outcome.relationships;
                            }
                            Err(e) => {
                                warn!("Skipping {} after retry failed: {}", relative.display(), e);
                                stats.files_failed += 1;
                            }
                        }
                    }
                }
            }
        }

        stats.files_deleted = self.delete_disappeared(&seen_paths)?;

        let is_stale = {
            let mut db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            if reachability::is_stale(&db, &self.workspace_id)? {
                Some(reachability::refresh(&mut db, &self.workspace_id)?)
            } else {
                None
            }
        };
        stats.reachability_edges = is_stale;

        info!(
            "Index pass complete: {} indexed, {} unchanged, {} failed, {} deleted",
            stats.files_indexed, stats.files_unchanged, stats.files_failed, stats.files_deleted
        );
        Ok(stats)
    }

    /// Extract, embed, and atomically commit a single file. Caller retries
    /// once on error, per the failure model's file-level isolation.
    async fn index_one_file(&self, relative: &std::path::Path) -> Result<CommitOutcome> {
        let absolute = self.workspace_root.join(relative);
        let relative_str = relative.to_string_lossy().replace('\\', "/");

        let content = tokio::fs::read(&absolute).await?;
        let content_str = String::from_utf8_lossy(&content);

        let language = crate::language::detect(&relative_str)
            .map(|lang| lang.id.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let extraction = self
            .extractor_manager
            .extract_file(&relative_str, &content_str)?;

        let vectors = if let Some(embeddings) = &self.embeddings {
            if !extraction.symbols.is_empty() {
                let mut guard = embeddings.write().await;
                match guard.as_mut() {
                    Some(engine) => engine.embed_symbols_batch(&extraction.symbols)?,
                    None => Vec::new(),
                }
            } else {
                Vec::new()
            }
        } else {
            Vec::new()
        };

        commit::commit_file(
            &self.db,
            self.vector_store.as_ref(),
            self.search.as_ref(),
            &absolute,
            &relative_str,
            &language,
            &self.workspace_root,
            &self.workspace_id,
            extraction.symbols,
            extraction.relationships,
            vectors,
        )
        .await
    }

    /// Delete files (and cascade-deleted symbols/relationships) for rows in
    /// the store whose path is no longer present in `seen_paths`.
    fn delete_disappeared(&self, seen_paths: &HashSet<String>) -> Result<usize> {
        let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
        let existing = db.get_file_hashes_for_workspace()?;
        let disappeared: Vec<String> = existing
            .keys()
            .filter(|path| !seen_paths.contains(*path))
            .cloned()
            .collect();
        if disappeared.is_empty() {
            return Ok(0);
        }
        info!("Removing {} files no longer on disk", disappeared.len());
        db.delete_files_batch(&disappeared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn index_workspace_indexes_a_new_rust_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lib.rs"), "pub fn hello() {}\n").unwrap();

        let db = Arc::new(Mutex::new(SymbolDatabase::new_in_memory().unwrap()));
        let indexer = Indexer::new(
            dir.path().to_path_buf(),
            "primary".to_string(),
            db.clone(),
            None,
            None,
            None,
            Arc::new(ExtractorManager::new()),
            &[],
        )
        .unwrap();

        let stats = indexer.index_workspace().await.unwrap();
        assert_eq!(stats.files_indexed, 1);
        assert!(stats.symbols_indexed >= 1);

        let stats_again = indexer.index_workspace().await.unwrap();
        assert_eq!(stats_again.files_indexed, 0);
        assert_eq!(stats_again.files_unchanged, 1);
    }

    #[tokio::test]
    async fn index_workspace_deletes_removed_files() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("gone.rs");
        fs::write(&file_path, "pub fn bye() {}\n").unwrap();

        let db = Arc::new(Mutex::new(SymbolDatabase::new_in_memory().unwrap()));
        let indexer = Indexer::new(
            dir.path().to_path_buf(),
            "primary".to_string(),
            db.clone(),
            None,
            None,
            None,
            Arc::new(ExtractorManager::new()),
            &[],
        )
        .unwrap();

        indexer.index_workspace().await.unwrap();
        fs::remove_file(&file_path).unwrap();

        let stats = indexer.index_workspace().await.unwrap();
        assert_eq!(stats.files_deleted, 1);
    }
}
