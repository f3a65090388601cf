//! Search Engine: the public `search` entry point over the Tantivy-backed
//! lexical index in `engine` and the HNSW-backed semantic index in
//! `crate::embeddings`.
//!
//! `engine::SearchEngine` and its intent-detecting `search()` already cover
//! exact-symbol, generic-type, operator, and file-path lookups; this module
//! adds method selection, the `hybrid` fusion of lexical and semantic
//! results, optional re-ranking, and optional reachability-based graph
//! expansion on top of it.

mod engine;
mod error;
mod schema;
mod tokenizers;

pub use engine::{SearchEngine as LexicalEngine, SearchIndexWriter, SearchResult as LexicalHit};
pub use error::SearchError;

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::SymbolDatabase;
use crate::embeddings::{EmbeddingEngine, VectorStore};
use crate::extractors::Symbol;
use crate::reachability;

/// How a search query should be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    Text,
    Pattern,
    Semantic,
    Hybrid,
}

impl SearchMethod {
    /// Auto-select a method from the shape of the query: `: < > [ ] ( ) { }`
    /// imply a code pattern (`: BaseService`, `ILogger<`, `[Fact]`), a bare
    /// identifier implies a text lookup, anything else goes through hybrid
    /// fusion.
    pub fn detect(query: &str) -> Self {
        const PATTERN_CHARS: &[char] = &[':', '<', '>', '[', ']', '(', ')', '{', '}'];
        if query.chars().any(|c| PATTERN_CHARS.contains(&c)) {
            return SearchMethod::Pattern;
        }
        let is_identifier = !query.is_empty()
            && query
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
            && query.chars().all(|c| c.is_alphanumeric() || c == '_');
        if is_identifier {
            return SearchMethod::Text;
        }
        SearchMethod::Hybrid
    }
}

/// Narrows a search to a subset of the index.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub kind: Option<String>,
    pub language: Option<String>,
    pub file_path_prefix: Option<String>,
}

impl SearchFilters {
    fn matches(&self, symbol: &Symbol) -> bool {
        if let Some(kind) = &self.kind {
            if symbol.kind.to_string().to_lowercase() != kind.to_lowercase() {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if !symbol.language.eq_ignore_ascii_case(language) {
                return false;
            }
        }
        if let Some(prefix) = &self.file_path_prefix {
            if !symbol.file_path.starts_with(prefix.as_str()) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub method: Option<SearchMethod>,
    pub limit: usize,
    pub filters: SearchFilters,
    pub rerank: bool,
    pub expand: bool,
    pub expand_limit: usize,
}

impl SearchOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            rerank: true,
            expand_limit: 5,
            ..Default::default()
        }
    }
}

/// One hit from `search`, carrying enough of the symbol to render without a
/// follow-up lookup plus the optional graph-expansion neighbors.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub symbol_id: String,
    pub name: String,
    pub kind: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub signature: Option<String>,
    pub doc_comment: Option<String>,
    pub code_context: Option<String>,
    pub score: f32,
    pub method_used: &'static str,
    pub fallback: bool,
    pub callers: Vec<String>,
    pub callees: Vec<String>,
}

/// Top-K candidates considered for re-ranking, capped at 4x the requested
/// limit (and never more than 50).
const RERANK_CANDIDATE_CAP: usize = 50;
/// Reciprocal-rank-fusion constant shared by both ranked lists.
const RRF_K: f32 = 60.0;
/// How many nearest neighbors the semantic leg of a search considers before
/// cosine-scoring and truncating to the caller's limit.
const SEMANTIC_OVERFETCH: usize = 4;

/// Facade tying the lexical index, the vector store, and the relational
/// store together behind the spec's single `search` entry point.
pub struct SearchFacade {
    lexical: Arc<RwLock<LexicalEngine>>,
    vectors: Option<Arc<RwLock<VectorStore>>>,
    embeddings: Option<Arc<RwLock<Option<EmbeddingEngine>>>>,
    db: Arc<std::sync::Mutex<SymbolDatabase>>,
}

impl SearchFacade {
    pub fn new(
        lexical: Arc<RwLock<LexicalEngine>>,
        vectors: Option<Arc<RwLock<VectorStore>>>,
        embeddings: Option<Arc<RwLock<Option<EmbeddingEngine>>>>,
        db: Arc<std::sync::Mutex<SymbolDatabase>>,
    ) -> Self {
        Self {
            lexical,
            vectors,
            embeddings,
            db,
        }
    }

    pub async fn search(&self, query: &str, opts: SearchOptions, workspace_id: &str) -> Result<Vec<SearchHit>> {
        let method = opts.method.unwrap_or_else(|| SearchMethod::detect(query));
        let limit = opts.limit.max(1);

        let (mut ranked, method_used, mut fallback) = match method {
            SearchMethod::Text => self.text_search(query, limit).await?,
            SearchMethod::Pattern => self.pattern_search(query, limit).await?,
            SearchMethod::Semantic => (self.semantic_search(query, limit).await?, "semantic", false),
            SearchMethod::Hybrid => self.hybrid_search(query, limit).await?,
        };

        if ranked.is_empty() && method_used != "semantic" {
            ranked = self.semantic_search(query, limit).await?;
            fallback = true;
        }

        ranked.retain(|(symbol, _)| opts.filters.matches(symbol));

        if opts.rerank && ranked.len() > 1 {
            ranked = self.rerank(query, ranked).await?;
        }
        ranked.truncate(limit);

        let mut hits: Vec<SearchHit> = ranked
            .into_iter()
            .map(|(symbol, score)| SearchHit {
                symbol_id: symbol.id,
                name: symbol.name,
                kind: symbol.kind.to_string(),
                file_path: symbol.file_path,
                start_line: symbol.start_line,
                end_line: symbol.end_line,
                signature: symbol.signature,
                doc_comment: symbol.doc_comment,
                code_context: symbol.code_context,
                score,
                method_used,
                fallback,
                callers: Vec::new(),
                callees: Vec::new(),
            })
            .collect();

        // Tie-break: higher score, then lower file_path lexicographically,
        // then lower start_line.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap()
                .then_with(|| a.file_path.cmp(&b.file_path))
                .then_with(|| a.start_line.cmp(&b.start_line))
        });

        if opts.expand && !hits.is_empty() {
            self.expand_graph(&mut hits, opts.expand_limit, workspace_id)?;
        }

        Ok(hits)
    }

    async fn text_search(&self, query: &str, limit: usize) -> Result<(Vec<(Symbol, f32)>, &'static str, bool)> {
        let engine = self.lexical.read().await;
        let results = engine.search(query).await?;
        let raw: Vec<(Symbol, f32)> = results.into_iter().take(limit).map(|r| (r.symbol, r.score)).collect();
        Ok((normalize_lexical_scores(raw), "text", false))
    }

    async fn pattern_search(&self, query: &str, limit: usize) -> Result<(Vec<(Symbol, f32)>, &'static str, bool)> {
        let engine = self.lexical.read().await;
        let results = engine.exact_symbol_search(query).await.unwrap_or_default();
        let raw: Vec<(Symbol, f32)> = results.into_iter().take(limit).map(|r| (r.symbol, r.score)).collect();
        Ok((normalize_lexical_scores(raw), "pattern", false))
    }

    async fn semantic_search(&self, query: &str, limit: usize) -> Result<Vec<(Symbol, f32)>> {
        let Some(vectors) = &self.vectors else {
            return Ok(Vec::new());
        };
        let Some(embeddings) = &self.embeddings else {
            return Ok(Vec::new());
        };

        let query_vector = {
            let mut guard = embeddings.write().await;
            match guard.as_mut() {
                Some(engine) => engine.embed_text(query)?,
                None => return Ok(Vec::new()),
            }
        };

        let neighbors = {
            let store = vectors.read().await;
            store.search_similar(&query_vector, limit * SEMANTIC_OVERFETCH, 0.0)?
        };

        let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
        let mut scored = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            if let Some(symbol) = db.get_symbol_by_id(&neighbor.symbol_id)? {
                scored.push((symbol, neighbor.similarity_score));
            }
        }
        scored.truncate(limit);
        Ok(scored)
    }

    async fn hybrid_search(&self, query: &str, limit: usize) -> Result<(Vec<(Symbol, f32)>, &'static str, bool)> {
        let (text_ranked, _, _) = self.text_search(query, limit * SEMANTIC_OVERFETCH).await?;
        let semantic_ranked = self.semantic_search(query, limit * SEMANTIC_OVERFETCH).await?;

        let mut rrf_scores: HashMap<String, f32> = HashMap::new();
        let mut symbols_by_id: HashMap<String, Symbol> = HashMap::new();

        for (rank, (symbol, _)) in text_ranked.into_iter().enumerate() {
            *rrf_scores.entry(symbol.id.clone()).or_insert(0.0) += 1.0 / (RRF_K + rank as f32 + 1.0);
            symbols_by_id.entry(symbol.id.clone()).or_insert(symbol);
        }
        for (rank, (symbol, _)) in semantic_ranked.into_iter().enumerate() {
            *rrf_scores.entry(symbol.id.clone()).or_insert(0.0) += 1.0 / (RRF_K + rank as f32 + 1.0);
            symbols_by_id.entry(symbol.id.clone()).or_insert(symbol);
        }

        let mut fused: Vec<(Symbol, f32)> = rrf_scores
            .into_iter()
            .filter_map(|(id, score)| symbols_by_id.remove(&id).map(|symbol| (symbol, score)))
            .collect();
        fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        fused.truncate(limit);

        Ok((fused, "hybrid", false))
    }

    /// Re-score the top candidates against the full query using whichever
    /// embedding engine is configured, falling back to the fused ordering on
    /// any failure (missing model, dimension mismatch, empty candidate set).
    async fn rerank(&self, query: &str, candidates: Vec<(Symbol, f32)>) -> Result<Vec<(Symbol, f32)>> {
        let cap = RERANK_CANDIDATE_CAP.min(candidates.len().max(1));
        let mut candidates = candidates;
        let tail = if candidates.len() > cap {
            candidates.split_off(cap)
        } else {
            Vec::new()
        };
        let head = candidates;

        let Some(embeddings) = &self.embeddings else {
            let mut result = head;
            result.extend(tail);
            return Ok(result);
        };

        let mut guard = embeddings.write().await;
        let Some(engine) = guard.as_mut() else {
            drop(guard);
            let mut result = head;
            result.extend(tail);
            return Ok(result);
        };

        let candidate_texts: Vec<String> = head.iter().map(|(symbol, _)| candidate_text(symbol)).collect();
        let scores = engine.rerank_scores(query, &candidate_texts);
        drop(guard);

        let mut rescored = match scores {
            Ok(scores) if scores.len() == head.len() => head
                .into_iter()
                .zip(scores)
                .map(|((symbol, _), score)| (symbol, score))
                .collect(),
            _ => head,
        };
        rescored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        rescored.extend(tail);
        Ok(rescored)
    }

    /// Attach up to `expand_limit` dependents/dependencies per hit, fetched
    /// in exactly three batch queries regardless of hit count: one for all
    /// hits' dependents, one for all hits' dependencies, one to resolve the
    /// resulting ids back to names.
    fn expand_graph(&self, hits: &mut [SearchHit], expand_limit: usize, workspace_id: &str) -> Result<()> {
        let db = self.db.lock().unwrap_or_else(|p| p.into_inner());

        let ids: Vec<String> = hits.iter().map(|h| h.symbol_id.clone()).collect();
        let all_dependents = db.dependents_batch(&ids, reachability::MAX_CLOSURE_DEPTH, workspace_id)?;
        let all_dependencies = db.dependencies_batch(&ids, reachability::MAX_CLOSURE_DEPTH, workspace_id)?;

        let mut dependents_by_target: HashMap<String, Vec<String>> = HashMap::new();
        for edge in all_dependents {
            dependents_by_target.entry(edge.target_id).or_default().push(edge.source_id);
        }
        let mut dependencies_by_source: HashMap<String, Vec<String>> = HashMap::new();
        for edge in all_dependencies {
            dependencies_by_source.entry(edge.source_id).or_default().push(edge.target_id);
        }

        let mut all_ids: std::collections::HashSet<String> = std::collections::HashSet::new();
        for ids in dependents_by_target.values().chain(dependencies_by_source.values()) {
            all_ids.extend(ids.iter().take(expand_limit).cloned());
        }
        let names: HashMap<String, String> = db
            .get_symbols_by_ids(&all_ids.into_iter().collect::<Vec<_>>())?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        for hit in hits.iter_mut() {
            let callers = dependents_by_target.get(&hit.symbol_id).cloned().unwrap_or_default();
            let callees = dependencies_by_source.get(&hit.symbol_id).cloned().unwrap_or_default();
            hit.callers = callers
                .into_iter()
                .take(expand_limit)
                .map(|id| names.get(&id).cloned().unwrap_or(id))
                .collect();
            hit.callees = callees
                .into_iter()
                .take(expand_limit)
                .map(|id| names.get(&id).cloned().unwrap_or(id))
                .collect();
        }

        Ok(())
    }
}

/// Normalize raw BM25 scores to [0, 1] by dividing by the max score in the
/// result set, so the top hit is always 1.0 and the rest are relative to it.
fn normalize_lexical_scores(scored: Vec<(Symbol, f32)>) -> Vec<(Symbol, f32)> {
    let max = scored.iter().map(|(_, score)| *score).fold(0.0_f32, f32::max);
    if max <= 0.0 {
        return scored.into_iter().map(|(symbol, _)| (symbol, 0.0)).collect();
    }
    scored.into_iter().map(|(symbol, score)| (symbol, (score / max).max(0.0))).collect()
}

/// `name ∥ signature ∥ truncated(doc_comment) ∥ code_context`, the text the
/// re-rank gateway scores a candidate against the query on.
fn candidate_text(symbol: &Symbol) -> String {
    let mut parts = vec![symbol.name.clone()];
    if let Some(sig) = &symbol.signature {
        parts.push(sig.clone());
    }
    if let Some(doc) = &symbol.doc_comment {
        parts.push(doc.chars().take(200).collect());
    }
    if let Some(context) = &symbol.code_context {
        parts.push(context.clone());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pattern_from_base_class_syntax() {
        assert_eq!(SearchMethod::detect(": BaseService"), SearchMethod::Pattern);
    }

    #[test]
    fn detects_pattern_from_generic_type_syntax() {
        assert_eq!(SearchMethod::detect("ILogger<"), SearchMethod::Pattern);
    }

    #[test]
    fn detects_pattern_from_attribute_syntax() {
        assert_eq!(SearchMethod::detect("[Fact]"), SearchMethod::Pattern);
    }

    #[test]
    fn detects_text_from_bare_identifier() {
        assert_eq!(SearchMethod::detect("getUserById"), SearchMethod::Text);
    }

    #[test]
    fn detects_hybrid_from_natural_language() {
        assert_eq!(SearchMethod::detect("how do we validate login tokens"), SearchMethod::Hybrid);
    }

    #[test]
    fn detects_hybrid_from_dotted_path_not_identifier() {
        assert_eq!(SearchMethod::detect("foo.bar"), SearchMethod::Hybrid);
    }

    fn test_symbol(name: &str) -> Symbol {
        Symbol {
            id: name.to_string(),
            name: name.to_string(),
            kind: crate::extractors::SymbolKind::Function,
            language: "rust".to_string(),
            file_path: "lib.rs".to_string(),
            start_line: 1,
            start_column: 0,
            end_line: 1,
            end_column: 0,
            start_byte: 0,
            end_byte: 0,
            signature: None,
            doc_comment: None,
            visibility: None,
            parent_id: None,
            metadata: None,
            semantic_group: None,
            confidence: None,
            code_context: None,
            content_type: None,
        }
    }

    #[test]
    fn lexical_scores_normalize_relative_to_set_max() {
        let a = test_symbol("a");
        let b = test_symbol("b");
        let normalized = normalize_lexical_scores(vec![(a, 4.0), (b, 2.0)]);
        assert_eq!(normalized[0].1, 1.0);
        assert_eq!(normalized[1].1, 0.5);
    }

    #[test]
    fn lexical_scores_normalize_empty_set_without_panicking() {
        assert!(normalize_lexical_scores(Vec::new()).is_empty());
    }
}
