//! File Watcher & Incremental Indexing
//!
//! Watches a workspace for file system changes and keeps the relational
//! store and vector store up to date without a full reindex. Symbol
//! extraction and persistence logic live in `handlers`; this module owns
//! the `notify` watcher, the event queue, and the extension/ignore filters
//! that decide what gets queued in the first place.

mod events;
mod filtering;
mod handlers;
mod types;

use anyhow::{Context, Result};
use notify::{Event, RecursiveMode, Watcher};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{error, info, warn};

use crate::database::SymbolDatabase;
use crate::embeddings::EmbeddingEngine;
use crate::extractors::ExtractorManager;
use crate::search::LexicalEngine;

pub use types::{FileChangeEvent, FileChangeType, IndexingStats};

type VectorIndex = crate::embeddings::VectorStore;

/// Manages incremental indexing with real-time file watching.
pub struct IncrementalIndexer {
    watcher: Option<notify::RecommendedWatcher>,
    workspace_root: PathBuf,
    workspace_id: String,
    db: Arc<std::sync::Mutex<SymbolDatabase>>,
    embeddings: Arc<RwLock<Option<EmbeddingEngine>>>,
    extractor_manager: Arc<ExtractorManager>,
    vector_store: Option<Arc<RwLock<VectorIndex>>>,
    search_index: Option<Arc<RwLock<LexicalEngine>>>,

    index_queue: Arc<Mutex<VecDeque<FileChangeEvent>>>,
    supported_extensions: HashSet<String>,
    ignore_patterns: Vec<glob::Pattern>,
}

impl IncrementalIndexer {
    /// Create a new incremental indexer for the given workspace.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        workspace_root: PathBuf,
        workspace_id: String,
        db: Arc<std::sync::Mutex<SymbolDatabase>>,
        embeddings: Arc<RwLock<Option<EmbeddingEngine>>>,
        extractor_manager: Arc<ExtractorManager>,
        vector_store: Option<Arc<RwLock<VectorIndex>>>,
        search_index: Option<Arc<RwLock<LexicalEngine>>>,
    ) -> Result<Self> {
        Ok(Self {
            watcher: None,
            workspace_root,
            workspace_id,
            db,
            embeddings,
            extractor_manager,
            vector_store,
            search_index,
            index_queue: Arc::new(Mutex::new(VecDeque::new())),
            supported_extensions: filtering::build_supported_extensions(),
            ignore_patterns: filtering::build_ignore_patterns()?,
        })
    }

    /// Start watching the workspace for file changes.
    pub async fn start_watching(&mut self) -> Result<()> {
        info!(
            "Starting file watcher for workspace: {}",
            self.workspace_root.display()
        );

        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Failed to send file event: {}", e);
            }
        })?;

        watcher
            .watch(&self.workspace_root, RecursiveMode::Recursive)
            .context("Failed to start watching workspace")?;

        self.watcher = Some(watcher);

        let supported_extensions = self.supported_extensions.clone();
        let ignore_patterns = self.ignore_patterns.clone();
        let index_queue = self.index_queue.clone();

        tokio::spawn(async move {
            while let Some(event_result) = rx.recv().await {
                match event_result {
                    Ok(event) => {
                        if let Err(e) = events::process_file_system_event(
                            &supported_extensions,
                            &ignore_patterns,
                            index_queue.clone(),
                            event,
                        )
                        .await
                        {
                            error!("Error processing file system event: {}", e);
                        }
                    }
                    Err(e) => warn!("File watcher error: {}", e),
                }
            }
        });

        info!("File watcher started successfully");
        Ok(())
    }

    /// Process any pending file changes from the queue. Call periodically
    /// (or after `start_watching`, in a loop) since queueing happens from a
    /// background task that cannot itself touch `&self`.
    pub async fn process_pending_changes(&self) -> Result<()> {
        while let Some(event) = {
            let mut queue = self.index_queue.lock().await;
            queue.pop_front()
        } {
            if let Err(e) = self.handle_file_change(event).await {
                error!("Failed to handle file change: {}", e);
            }
        }
        Ok(())
    }

    async fn handle_file_change(&self, event: FileChangeEvent) -> Result<()> {
        let start = std::time::Instant::now();

        match event.change_type {
            FileChangeType::Created | FileChangeType::Modified => {
                handlers::handle_file_created_or_modified_static(
                    event.path,
                    &self.db,
                    &self.embeddings,
                    &self.extractor_manager,
                    self.vector_store.as_ref(),
                    self.search_index.as_ref(),
                    &self.workspace_root,
                    &self.workspace_id,
                )
                .await?;
            }
            FileChangeType::Deleted => {
                handlers::handle_file_deleted_static(
                    event.path,
                    &self.db,
                    self.vector_store.as_ref(),
                    self.search_index.as_ref(),
                    &self.workspace_root,
                )
                .await?;
            }
            FileChangeType::Renamed { from, to } => {
                handlers::handle_file_renamed_static(
                    from,
                    to,
                    &self.db,
                    &self.embeddings,
                    &self.extractor_manager,
                    self.vector_store.as_ref(),
                    self.search_index.as_ref(),
                    &self.workspace_root,
                    &self.workspace_id,
                )
                .await?;
            }
        }

        tracing::debug!("File change processed in {:?}", start.elapsed());
        Ok(())
    }

    /// Check if a file should be indexed based on extension and ignore patterns.
    pub fn should_index_file(&self, path: &Path) -> bool {
        filtering::should_index_file(path, &self.supported_extensions, &self.ignore_patterns)
    }

    /// Stop the file watcher.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            info!("File watcher stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_include_core_languages() {
        let extensions = filtering::build_supported_extensions();
        assert!(extensions.contains("rs"));
        assert!(extensions.contains("py"));
    }
}
