//! Core facade: the single entry point a CLI or embedder drives, wiring a
//! loaded workspace to the indexer and the query/search surfaces named in
//! the external interface. `main.rs` is a thin `clap` shell over this.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::extractors::RelationshipKind;
use crate::indexer::{IndexStats, Indexer};
use crate::query::{
    ExploreMode, ExploreParams, ExploreResult, LookupResult, OutlineMode, OutlineNode,
    QueryEngine, ReferenceGroup, TraceDirection, TraceResult,
};
use crate::search::{SearchHit, SearchOptions};
use crate::workspace::registry::{WorkspaceEntry, WorkspaceType};
use crate::workspace::registry_service::WorkspaceRegistryService;
use crate::workspace::JulieWorkspace;

/// Registry action dispatched by `manage_workspace`.
pub enum WorkspaceAction {
    Register { path: String, workspace_type: WorkspaceType },
    Unregister { workspace_id: String },
    List,
    CleanExpired,
}

/// Result of a `manage_workspace` call.
pub enum WorkspaceActionOutcome {
    Registered(WorkspaceEntry),
    Unregistered(bool),
    Listed(Vec<WorkspaceEntry>),
    Cleaned(Vec<String>),
}

/// Ties a loaded `JulieWorkspace` to the indexer, search facade, and query
/// engine behind the operations the spec's external interface names.
pub struct Core {
    workspace: JulieWorkspace,
    registry: WorkspaceRegistryService,
}

impl Core {
    /// Load the workspace rooted at `root`, initializing its `.julie` folder
    /// structure if one doesn't already exist.
    pub async fn open(root: PathBuf) -> Result<Self> {
        let workspace = match JulieWorkspace::detect_and_load(root.clone()).await? {
            Some(ws) => ws,
            None => JulieWorkspace::initialize(root.clone()).await?,
        };
        let registry = WorkspaceRegistryService::new(root);
        Ok(Self { workspace, registry })
    }

    /// Run a full scan-extract-embed-commit pass over the workspace.
    pub async fn index_workspace(&self, ignore_overrides: &[String]) -> Result<IndexStats> {
        let db = self
            .workspace
            .db
            .clone()
            .ok_or_else(|| anyhow!("workspace database is not initialized"))?;

        let indexer = Indexer::new(
            self.workspace.root.clone(),
            "primary".to_string(),
            db,
            self.workspace.embeddings.clone(),
            self.workspace.vector_store.clone(),
            self.workspace.search_index.clone(),
            Arc::new(crate::extractors::ExtractorManager::new()),
            ignore_overrides,
        )?;
        indexer.index_workspace().await
    }

    /// Hybrid/text/pattern/semantic search over the indexed workspace.
    pub async fn search(&self, query: &str, opts: SearchOptions) -> Result<Vec<SearchHit>> {
        let facade = self
            .workspace
            .search_facade()
            .ok_or_else(|| anyhow!("search is not available: workspace not fully initialized"))?;
        facade.search(query, opts, "primary").await
    }

    fn query_engine(&self) -> Result<QueryEngine> {
        self.workspace
            .query_engine()
            .ok_or_else(|| anyhow!("queries are not available: database not initialized"))
    }

    pub async fn lookup(&self, symbols: &[String], context_file: Option<&str>) -> Result<Vec<LookupResult>> {
        self.query_engine()?.lookup(symbols, context_file).await
    }

    pub async fn find_refs(
        &self,
        symbol: &str,
        kind_filter: Option<RelationshipKind>,
        include_context: bool,
        limit: Option<usize>,
    ) -> Result<Vec<ReferenceGroup>> {
        self.query_engine()?
            .find_refs(symbol, kind_filter, include_context, limit)
            .await
    }

    pub async fn get_symbols(
        &self,
        file: &str,
        mode: OutlineMode,
        max_depth: usize,
        target: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<OutlineNode>> {
        self.query_engine()?.get_symbols(file, mode, max_depth, target, limit).await
    }

    pub async fn trace(
        &self,
        symbol: &str,
        direction: TraceDirection,
        max_depth: usize,
        context_file: Option<&str>,
    ) -> Result<TraceResult> {
        self.query_engine()?.trace(symbol, direction, max_depth, context_file).await
    }

    pub async fn explore(&self, mode: ExploreMode, params: ExploreParams) -> Result<Vec<ExploreResult>> {
        self.query_engine()?.explore(mode, params).await
    }

    /// Workspace Registry operations: register/unregister a workspace for
    /// cross-project search, list what's registered, or sweep expired
    /// reference workspaces.
    pub async fn manage_workspace(&self, action: WorkspaceAction) -> Result<WorkspaceActionOutcome> {
        match action {
            WorkspaceAction::Register { path, workspace_type } => Ok(WorkspaceActionOutcome::Registered(
                self.registry.register_workspace(path, workspace_type).await?,
            )),
            WorkspaceAction::Unregister { workspace_id } => Ok(WorkspaceActionOutcome::Unregistered(
                self.registry.unregister_workspace(&workspace_id).await?,
            )),
            WorkspaceAction::List => Ok(WorkspaceActionOutcome::Listed(self.registry.get_all_workspaces().await?)),
            WorkspaceAction::CleanExpired => {
                Ok(WorkspaceActionOutcome::Cleaned(self.registry.cleanup_expired_workspaces().await?))
            }
        }
    }
}
