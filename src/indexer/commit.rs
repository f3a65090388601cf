//! Atomic per-file commit: relational store, vector store, and search index
//! all settle together so a concurrent query never observes a torn file.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::debug;

use crate::database::SymbolDatabase;
use crate::embeddings::VectorStore;
use crate::extractors::{Relationship, Symbol};
use crate::search::{LexicalEngine, SearchIndexWriter};

/// How many symbols/relationships a single commit touched.
#[derive(Debug, Clone, Default)]
pub struct CommitOutcome {
    pub symbols: usize,
    pub relationships: usize,
}

/// Replace one file's rows in the relational store, vector store, and
/// search index. The relational replace is wrapped in a transaction; vector
/// and search updates happen after it commits, since both are separate
/// stores the relational transaction can't cover.
#[allow(clippy::too_many_arguments)]
pub async fn commit_file(
    db: &Arc<Mutex<SymbolDatabase>>,
    vector_store: Option<&Arc<RwLock<VectorStore>>>,
    search: Option<&Arc<RwLock<LexicalEngine>>>,
    absolute_path: &Path,
    relative_path: &str,
    language: &str,
    workspace_root: &Path,
    workspace_id: &str,
    symbols: Vec<Symbol>,
    relationships: Vec<Relationship>,
    vectors: Vec<(String, Vec<f32>)>,
) -> Result<CommitOutcome> {
    let file_info = crate::database::create_file_info(absolute_path, language, workspace_root)?;

    {
        let mut db = db.lock().unwrap_or_else(|p| p.into_inner());
        db.begin_transaction()?;

        let result: Result<()> = (|| {
            db.store_file_info(&file_info)?;
            // Relationships reference symbols, so they must be deleted first --
            // delete_relationships_for_file's subquery needs the old symbol rows
            // still present to find what to delete.
            db.delete_relationships_for_file(relative_path)?;
            db.delete_symbols_for_file(relative_path)?;
            db.store_symbols(&symbols)?;
            db.store_relationships(&relationships, workspace_id)?;
            Ok(())
        })();

        if let Err(e) = result {
            db.rollback_transaction()?;
            return Err(e);
        }
        db.commit_transaction()?;
    }

    if let Some(vector_store) = vector_store {
        let mut store = vector_store.write().await;
        for symbol in &symbols {
            store.remove_vector(&symbol.id).ok();
        }
        for (symbol_id, vector) in vectors {
            store.store_vector(symbol_id, vector)?;
        }
    }

    if let Some(search) = search {
        let mut engine = search.write().await;
        // SearchEngine never holds a persistent writer, to keep background
        // indexing from blocking a concurrent search -- build one here, commit,
        // then reload the reader to pick up the new segments.
        let mut writer = SearchIndexWriter::new(engine.index(), engine.schema().clone())?;
        writer.delete_file_symbols(relative_path).await?;
        writer.index_symbols(symbols.clone()).await?;
        engine.reload_reader()?;
    }

    debug!(
        "Committed {} symbols, {} relationships for {}",
        symbols.len(),
        relationships.len(),
        relative_path
    );

    Ok(CommitOutcome {
        symbols: symbols.len(),
        relationships: relationships.len(),
    })
}
