//! Relational store: SQLite persistence for symbols, relationships,
//! identifiers, file metadata, and the precomputed reachability closure.
//!
//! The schema is created fresh by `schema::initialize_schema` and then
//! brought up to date by `migrations::run_migrations`, so an existing
//! database on disk and a brand new one end up in the same shape. Most
//! operations live in focused sibling modules and extend `SymbolDatabase`
//! directly via `impl` blocks, rather than being declared here.

mod bulk_operations;
mod files;
mod helpers;
mod identifiers;
mod migrations;
mod reachability;
mod relationships;
mod schema;
mod symbols;
mod type_queries;
mod types;
mod workspace;

use anyhow::{anyhow, Result};
use rusqlite::{Connection, Row};
use std::path::{Path, PathBuf};
use tracing::info;

pub use files::create_file_info;
pub use identifiers::IdentifierRef;
pub use migrations::LATEST_SCHEMA_VERSION;
pub use reachability::ReachabilityEdge;
pub use types::{DatabaseStats, FileInfo, FileSearchResult, WorkspaceCleanupStats, WorkspaceUsageStats};

use crate::extractors::{Identifier, Relationship, RelationshipKind, Symbol, SymbolKind, TypeInfo};

/// SQLite-backed store for everything the indexer extracts from a workspace.
///
/// Opens in WAL mode (set before any migration runs, so schema changes are
/// crash-safe too) and enforces foreign keys. A single connection is shared
/// across all operations; callers that need atomicity span multiple calls
/// with `begin_transaction`/`commit_transaction` or `conn.transaction()`
/// directly where a scoped transaction is more convenient.
pub struct SymbolDatabase {
    conn: Connection,
    file_path: PathBuf,
}

impl SymbolDatabase {
    /// Open (or create) the database at `path` and bring its schema up to
    /// the latest version.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let conn = Connection::open(&file_path)
            .map_err(|e| anyhow!("Failed to open database at {:?}: {}", file_path, e))?;

        let mut db = Self { conn, file_path };

        // WAL must be enabled before schema creation/migration so every
        // subsequent write is crash-safe, including the first one.
        db.conn.execute_batch("PRAGMA journal_mode = WAL")?;

        db.initialize_schema()?;
        db.run_migrations()?;

        info!("Opened database at {:?}", db.file_path);
        Ok(db)
    }

    /// Open an in-memory database. Useful for tests and ephemeral workspaces.
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self {
            conn,
            file_path: PathBuf::from(":memory:"),
        };
        db.initialize_schema()?;
        db.run_migrations()?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_in_memory_database_with_schema() {
        let db = SymbolDatabase::new_in_memory().unwrap();
        let stats = db.get_stats().unwrap();
        assert_eq!(stats.total_symbols, 0);
        assert_eq!(stats.total_files, 0);
    }

    #[test]
    fn migrations_are_idempotent_on_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let _db = SymbolDatabase::new(&path).unwrap();
        }
        // Reopening an already-migrated database must not error.
        let db = SymbolDatabase::new(&path).unwrap();
        assert!(db.has_column("symbols", "workspace_id").unwrap());
    }
}
