//! Cross-language call-path trace: BFS over `Calls` relationship edges,
//! bridging language boundaries the extractor couldn't resolve directly by
//! matching naming-convention variants of the target identifier.

use anyhow::{anyhow, Result};
use std::collections::HashSet;

use super::naming::naming_variants;
use super::QueryEngine;
use crate::extractors::{RelationshipKind, Symbol};

/// Which direction a trace walks the call graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceDirection {
    Upstream,
    Downstream,
    Both,
}

/// How a trace step connects to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEdge {
    Calls,
    NameVariant,
}

#[derive(Debug, Clone)]
pub struct TraceNode {
    pub symbol: Symbol,
    pub edge: TraceEdge,
    pub confidence: f32,
    pub depth: usize,
    pub children: Vec<TraceNode>,
}

#[derive(Debug, Clone)]
pub struct TraceResult {
    pub root: TraceNode,
    pub direction: TraceDirection,
    pub truncated: bool,
}

/// Hard cap on total nodes visited in one trace, independent of max_depth,
/// so a densely connected graph can't make a single trace call unbounded.
const MAX_TRACE_NODES: usize = 500;
const NAME_VARIANT_CONFIDENCE_THRESHOLD: f32 = 0.7;

impl QueryEngine {
    pub async fn trace(
        &self,
        symbol: &str,
        direction: TraceDirection,
        max_depth: usize,
        context_file: Option<&str>,
    ) -> Result<TraceResult> {
        let max_depth = max_depth.min(10);

        let resolved = self.lookup(&[symbol.to_string()], context_file).await?;
        let root_symbol = match resolved.into_iter().next().map(|r| r.outcome) {
            Some(super::LookupOutcome::Found { symbol, .. }) => symbol,
            Some(super::LookupOutcome::Ambiguous { .. }) => {
                return Err(anyhow!("Symbol '{symbol}' is ambiguous; qualify it with its parent"));
            }
            _ => return Err(anyhow!("Symbol '{symbol}' not found")),
        };

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(root_symbol.id.clone());
        let mut budget = MAX_TRACE_NODES;

        let mut root = TraceNode {
            symbol: root_symbol,
            edge: TraceEdge::Calls,
            confidence: 1.0,
            depth: 0,
            children: Vec::new(),
        };

        match direction {
            TraceDirection::Upstream => {
                self.expand(&mut root, true, max_depth, &mut visited, &mut budget).await?
            }
            TraceDirection::Downstream => {
                self.expand(&mut root, false, max_depth, &mut visited, &mut budget).await?
            }
            TraceDirection::Both => {
                self.expand(&mut root, true, max_depth, &mut visited, &mut budget).await?;
                self.expand(&mut root, false, max_depth, &mut visited, &mut budget).await?;
            }
        }

        let truncated = budget == 0;
        Ok(TraceResult {
            root,
            direction,
            truncated,
        })
    }

    /// Grow `node`'s children one BFS level at a time, up to `max_depth`,
    /// decrementing `budget` for every node added and stopping at zero.
    fn expand<'a>(
        &'a self,
        node: &'a mut TraceNode,
        upstream: bool,
        max_depth: usize,
        visited: &'a mut HashSet<String>,
        budget: &'a mut usize,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            if node.depth >= max_depth || *budget == 0 {
                return Ok(());
            }

            let next = self.next_steps(&node.symbol, upstream, visited).await?;
            for (next_symbol, edge, confidence) in next {
                if *budget == 0 {
                    break;
                }
                *budget -= 1;
                visited.insert(next_symbol.id.clone());

                let mut child = TraceNode {
                    symbol: next_symbol,
                    edge,
                    confidence,
                    depth: node.depth + 1,
                    children: Vec::new(),
                };
                self.expand(&mut child, upstream, max_depth, visited, budget).await?;
                node.children.push(child);
            }
            Ok(())
        })
    }

    /// One BFS step from `current`: direct `Calls` edges first, then -- only
    /// if there were none -- a naming-variant bridge to symbols in other
    /// languages, disambiguated by semantic similarity when there's more
    /// than one candidate.
    async fn next_steps(
        &self,
        current: &Symbol,
        upstream: bool,
        visited: &HashSet<String>,
    ) -> Result<Vec<(Symbol, TraceEdge, f32)>> {
        let direct = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            if upstream {
                db.get_relationships_to_symbol(&current.id)?
                    .into_iter()
                    .filter(|r| r.kind == RelationshipKind::Calls)
                    .filter_map(|r| db.get_symbol_by_id(&r.from_symbol_id).ok().flatten())
                    .collect::<Vec<_>>()
            } else {
                db.get_outgoing_relationships(&current.id)?
                    .into_iter()
                    .filter(|r| r.kind == RelationshipKind::Calls)
                    .filter_map(|r| db.get_symbol_by_id(&r.to_symbol_id).ok().flatten())
                    .collect::<Vec<_>>()
            }
        };

        let direct: Vec<(Symbol, TraceEdge, f32)> = direct
            .into_iter()
            .filter(|s| !visited.contains(&s.id))
            .map(|s| (s, TraceEdge::Calls, 1.0))
            .collect();
        if !direct.is_empty() {
            return Ok(direct);
        }

        // No AST-resolved edge: try bridging across languages by name.
        let variants = naming_variants(&current.name);
        let mut candidates: Vec<Symbol> = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            let mut found = Vec::new();
            for variant in &variants {
                found.extend(db.find_symbols_by_name(variant)?);
            }
            found
        };
        candidates.retain(|s| s.id != current.id && s.language != current.language && !visited.contains(&s.id));
        candidates.sort_by_key(|s| s.id.clone());
        candidates.dedup_by_key(|s| s.id.clone());

        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        if candidates.len() == 1 {
            return Ok(vec![(candidates.remove(0), TraceEdge::NameVariant, 1.0)]);
        }

        let current_text = current.signature.clone().unwrap_or_else(|| current.name.clone());
        let mut best: Option<(Symbol, f32)> = None;
        for candidate in candidates {
            let candidate_text = candidate.signature.clone().unwrap_or_else(|| candidate.name.clone());
            let score = self
                .semantic_similarity(&current_text, &candidate_text)
                .await
                .unwrap_or(0.0);
            if best.as_ref().map(|(_, b)| score > *b).unwrap_or(true) {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((symbol, score)) if score >= NAME_VARIANT_CONFIDENCE_THRESHOLD => {
                Ok(vec![(symbol, TraceEdge::NameVariant, score)])
            }
            _ => Ok(Vec::new()),
        }
    }
}
