//! Query Surface: the navigation operations an agent issues after an initial
//! search lands it on a symbol -- resolve a bare name to its definition,
//! find who references it, outline a file's symbol tree, trace a call path
//! across language boundaries, and the exploratory `explore` modes.

pub mod explore;
pub mod lookup;
pub mod outline;
pub mod references;
pub mod trace;

pub use explore::{ExploreMode, ExploreParams, ExploreResult};
pub use lookup::{LookupOutcome, LookupResult, LookupStrategy};
pub use outline::{OutlineMode, OutlineNode};
pub use references::{ReferenceGroup, ReferenceHit};
pub use trace::{TraceDirection, TraceNode, TraceResult};

use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use crate::database::SymbolDatabase;
use crate::embeddings::EmbeddingEngine;
use crate::search::SearchFacade;

/// Identifier naming conventions `trace` generates when a call edge doesn't
/// cross a language boundary directly and a name-based bridge is needed.
pub(crate) mod naming;

/// Facade over the relational store, reachability closure, and (when
/// available) the search engine's semantic leg, answering `lookup`,
/// `find_refs`, `get_symbols`, `trace`, and `explore`.
pub struct QueryEngine {
    pub(crate) db: Arc<Mutex<SymbolDatabase>>,
    pub(crate) search: Option<SearchFacade>,
    pub(crate) embeddings: Option<Arc<RwLock<Option<EmbeddingEngine>>>>,
}

impl QueryEngine {
    pub fn new(
        db: Arc<Mutex<SymbolDatabase>>,
        search: Option<SearchFacade>,
        embeddings: Option<Arc<RwLock<Option<EmbeddingEngine>>>>,
    ) -> Self {
        Self {
            db,
            search,
            embeddings,
        }
    }

    /// Cosine similarity between the embeddings of two free-text snippets,
    /// or `None` when no embedding model is loaded.
    pub(crate) async fn semantic_similarity(&self, a: &str, b: &str) -> Option<f32> {
        let embeddings = self.embeddings.as_ref()?;
        let mut guard = embeddings.write().await;
        let engine = guard.as_mut()?;
        let va = engine.embed_text(a).ok()?;
        let vb = engine.embed_text(b).ok()?;
        Some(crate::embeddings::cosine_similarity(&va, &vb))
    }
}
