//! Explore modes: whole-workspace questions that don't start from a single
//! lookup -- dead code, reference hot spots, and reachability/semantic
//! neighborhoods (types, similar, deps).

use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};

use super::QueryEngine;
use crate::extractors::{RelationshipKind, Symbol, SymbolKind};
use crate::reachability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreMode {
    DeadCode,
    HotSpots,
    Types,
    Similar,
    Deps,
}

/// Similarity floor for the semantic explore modes; internal, not exposed
/// as a caller-tunable parameter.
const SIMILARITY_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, Default)]
pub struct ExploreParams {
    /// Required for `types`, `similar`, and `deps`: the symbol to center
    /// the query on.
    pub target: Option<String>,
    pub limit: usize,
    pub workspace_id: String,
}

#[derive(Debug, Clone)]
pub struct ExploreResult {
    pub symbol: Symbol,
    pub score: f32,
    pub file_count: Option<usize>,
}

impl QueryEngine {
    pub async fn explore(&self, mode: ExploreMode, params: ExploreParams) -> Result<Vec<ExploreResult>> {
        match mode {
            ExploreMode::DeadCode => self.explore_dead_code(&params),
            ExploreMode::HotSpots => self.explore_hot_spots(&params),
            ExploreMode::Types => self.explore_types(&params).await,
            ExploreMode::Similar => self.explore_similar(&params).await,
            ExploreMode::Deps => self.explore_deps(&params),
        }
    }

    fn explore_dead_code(&self, params: &ExploreParams) -> Result<Vec<ExploreResult>> {
        let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
        let all = db.get_all_symbols()?;

        let candidates: Vec<&Symbol> = all
            .iter()
            .filter(|s| matches!(s.kind, SymbolKind::Function | SymbolKind::Method | SymbolKind::Class))
            .filter(|s| !is_test_file(&s.file_path))
            .filter(|s| !s.name.starts_with('_'))
            .collect();

        let mut incoming: HashMap<String, Vec<String>> = HashMap::new();
        for symbol in &candidates {
            let callers: Vec<String> = db
                .get_relationships_to_symbol(&symbol.id)?
                .into_iter()
                .filter(|r| matches!(r.kind, RelationshipKind::Calls | RelationshipKind::References))
                .map(|r| r.from_symbol_id)
                .collect();
            incoming.insert(symbol.id.clone(), callers);
        }

        let mut dead: HashSet<String> = incoming
            .iter()
            .filter(|(_, callers)| callers.is_empty())
            .map(|(id, _)| id.clone())
            .collect();

        // Fixpoint closure: a symbol whose every caller is itself already
        // dead has no *external* predecessor either -- a dead island.
        loop {
            let mut grew = false;
            for (id, callers) in &incoming {
                if dead.contains(id) || callers.is_empty() {
                    continue;
                }
                if callers.iter().all(|c| dead.contains(c)) {
                    dead.insert(id.clone());
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }

        let mut results: Vec<ExploreResult> = candidates
            .into_iter()
            .filter(|s| dead.contains(&s.id))
            .map(|s| ExploreResult {
                symbol: s.clone(),
                score: 1.0,
                file_count: None,
            })
            .collect();
        results.sort_by(|a, b| a.symbol.file_path.cmp(&b.symbol.file_path).then(a.symbol.start_line.cmp(&b.symbol.start_line)));

        if params.limit > 0 {
            results.truncate(params.limit);
        }
        Ok(results)
    }

    fn explore_hot_spots(&self, params: &ExploreParams) -> Result<Vec<ExploreResult>> {
        let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
        let limit = if params.limit == 0 { 50 } else { params.limit };
        let ranked = db.get_most_referenced_symbols(&[], limit * 2)?;

        let mut results = Vec::with_capacity(limit);
        for (symbol_id, count) in ranked {
            let Some(symbol) = db.get_symbol_by_id(&symbol_id)? else {
                continue;
            };
            if is_test_file(&symbol.file_path) {
                continue;
            }
            let file_count = db
                .get_relationships_to_symbol(&symbol_id)?
                .into_iter()
                .map(|r| r.file_path)
                .collect::<HashSet<_>>()
                .len();
            results.push(ExploreResult {
                symbol,
                score: count as f32,
                file_count: Some(file_count),
            });
            if results.len() >= limit {
                break;
            }
        }
        Ok(results)
    }

    async fn explore_types(&self, params: &ExploreParams) -> Result<Vec<ExploreResult>> {
        let target_name = params.target.as_deref().ok_or_else(|| anyhow!("`types` requires a target"))?;
        let all = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            db.get_all_symbols()?
        };
        let type_like: Vec<&Symbol> = all
            .iter()
            .filter(|s| {
                matches!(
                    s.kind,
                    SymbolKind::Class | SymbolKind::Interface | SymbolKind::Struct | SymbolKind::Enum | SymbolKind::Trait
                ) && s.name != target_name
            })
            .collect();

        self.score_by_similarity(target_name, type_like, params.limit).await
    }

    async fn explore_similar(&self, params: &ExploreParams) -> Result<Vec<ExploreResult>> {
        let target_name = params.target.as_deref().ok_or_else(|| anyhow!("`similar` requires a target"))?;
        let target_symbol = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            db.find_symbols_by_name(target_name)?.into_iter().next()
        };
        let Some(target_symbol) = target_symbol else {
            return Err(anyhow!("Symbol '{target_name}' not found"));
        };

        let all = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            db.get_all_symbols()?
        };
        let candidates: Vec<&Symbol> = all
            .iter()
            .filter(|s| s.id != target_symbol.id && s.kind == target_symbol.kind)
            .collect();

        self.score_by_similarity(target_name, candidates, params.limit).await
    }

    fn explore_deps(&self, params: &ExploreParams) -> Result<Vec<ExploreResult>> {
        let target_name = params.target.as_deref().ok_or_else(|| anyhow!("`deps` requires a target"))?;
        let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
        let target_symbol = db
            .find_symbols_by_name(target_name)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Symbol '{target_name}' not found"))?;

        let edges = db.dependencies(&target_symbol.id, reachability::MAX_CLOSURE_DEPTH, &params.workspace_id)?;
        let mut results = Vec::with_capacity(edges.len());
        for edge in edges {
            if let Some(symbol) = db.get_symbol_by_id(&edge.target_id)? {
                results.push(ExploreResult {
                    symbol,
                    score: 1.0 / (edge.min_distance as f32 + 1.0),
                    file_count: None,
                });
            }
        }
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        if params.limit > 0 {
            results.truncate(params.limit);
        }
        Ok(results)
    }

    async fn score_by_similarity(&self, target: &str, candidates: Vec<&Symbol>, limit: usize) -> Result<Vec<ExploreResult>> {
        let mut scored = Vec::with_capacity(candidates.len());
        for symbol in candidates {
            let text = symbol.signature.clone().unwrap_or_else(|| symbol.name.clone());
            let score = self.semantic_similarity(target, &text).await.unwrap_or(0.0);
            if score >= SIMILARITY_THRESHOLD {
                scored.push(ExploreResult {
                    symbol: symbol.clone(),
                    score,
                    file_count: None,
                });
            }
        }
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        let limit = if limit == 0 { scored.len() } else { limit };
        scored.truncate(limit);
        Ok(scored)
    }
}

fn is_test_file(file_path: &str) -> bool {
    let lower = file_path.to_lowercase();
    lower.contains("/test/")
        || lower.contains("/tests/")
        || lower.contains("_test.")
        || lower.contains(".test.")
        || lower.contains("test_")
        || lower.ends_with("_spec.rs")
}
