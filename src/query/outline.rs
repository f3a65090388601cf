//! File outline: parse a file's already-extracted symbols into the parent
//! -> child tree the extractor recorded, with three levels of detail.

use anyhow::{anyhow, Result};
use std::collections::HashMap;

use super::QueryEngine;
use crate::extractors::{Symbol, SymbolKind};

/// How much detail each node in the outline carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineMode {
    /// Name and kind only.
    Minimal,
    /// Name, kind, and signature.
    Structure,
    /// Everything: signature, doc comment, and code context.
    Full,
}

#[derive(Debug, Clone)]
pub struct OutlineNode {
    pub id: String,
    pub name: String,
    pub kind: SymbolKind,
    pub start_line: u32,
    pub end_line: u32,
    pub signature: Option<String>,
    pub doc_comment: Option<String>,
    pub code_context: Option<String>,
    /// Cosine similarity against `target`, when one was provided.
    pub relevance: Option<f32>,
    pub children: Vec<OutlineNode>,
}

impl QueryEngine {
    /// Build the symbol tree for `file`, bounded to `max_depth` levels of
    /// parent -> child nesting. `target`, when given, filters nodes by
    /// substring match on name and scores survivors by semantic similarity.
    pub async fn get_symbols(
        &self,
        file: &str,
        mode: OutlineMode,
        max_depth: usize,
        target: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<OutlineNode>> {
        let symbols: Vec<Symbol> = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            db.get_symbols_for_file(file)?
        };
        if symbols.is_empty() {
            return Err(anyhow!("No symbols indexed for file '{file}'"));
        }

        let by_parent: HashMap<Option<String>, Vec<&Symbol>> = symbols.iter().fold(
            HashMap::new(),
            |mut map: HashMap<Option<String>, Vec<&Symbol>>, s| {
                map.entry(s.parent_id.clone()).or_default().push(s);
                map
            },
        );

        let roots = by_parent.get(&None).cloned().unwrap_or_default();
        let mut nodes = Vec::with_capacity(roots.len());
        for root in roots {
            nodes.push(self.build_node(root, mode, &by_parent, 1, max_depth).await);
        }

        if let Some(target) = target {
            filter_and_score(&mut nodes, target, self).await;
        }

        if let Some(limit) = limit {
            nodes.truncate(limit);
        }

        Ok(nodes)
    }

    fn build_node<'a>(
        &'a self,
        symbol: &'a Symbol,
        mode: OutlineMode,
        by_parent: &'a HashMap<Option<String>, Vec<&'a Symbol>>,
        depth: usize,
        max_depth: usize,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = OutlineNode> + 'a>> {
        Box::pin(async move {
            let mut children = Vec::new();
            if depth < max_depth {
                if let Some(kids) = by_parent.get(&Some(symbol.id.clone())) {
                    for kid in kids {
                        children.push(self.build_node(kid, mode, by_parent, depth + 1, max_depth).await);
                    }
                }
            }

            OutlineNode {
                id: symbol.id.clone(),
                name: symbol.name.clone(),
                kind: symbol.kind,
                start_line: symbol.start_line,
                end_line: symbol.end_line,
                signature: matches!(mode, OutlineMode::Structure | OutlineMode::Full)
                    .then(|| symbol.signature.clone())
                    .flatten(),
                doc_comment: matches!(mode, OutlineMode::Full)
                    .then(|| symbol.doc_comment.clone())
                    .flatten(),
                code_context: matches!(mode, OutlineMode::Full)
                    .then(|| symbol.code_context.clone())
                    .flatten(),
                relevance: None,
                children,
            }
        })
    }
}

/// Filter the tree (at every level) to nodes whose name contains `target`,
/// keeping ancestors of a matching descendant, and attach a semantic
/// relevance score to survivors when an embedding model is available.
fn filter_and_score<'a>(
    nodes: &'a mut Vec<OutlineNode>,
    target: &'a str,
    engine: &'a QueryEngine,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + 'a>> {
    Box::pin(async move {
        let target_lower = target.to_lowercase();
        let mut kept = Vec::with_capacity(nodes.len());
        for mut node in std::mem::take(nodes) {
            filter_and_score(&mut node.children, target, engine).await;
            let self_matches = node.name.to_lowercase().contains(&target_lower);
            if self_matches || !node.children.is_empty() {
                if self_matches {
                    node.relevance = engine.semantic_similarity(target, &node.name).await;
                }
                kept.push(node);
            }
        }
        *nodes = kept;
    })
}
