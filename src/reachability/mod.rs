//! Reachability Engine: precomputed transitive closure over Calls edges.
//!
//! `compute` runs a bounded BFS from every symbol that calls something,
//! partitioned across a rayon thread pool by source id, and writes the
//! result into the `reachability` table in one transaction. Reads
//! (`dependents`/`dependencies`/`distance`/`can_reach`) are plain queries
//! against that table, defined alongside the other storage primitives in
//! `crate::database::reachability`.

use std::collections::{HashMap, HashSet, VecDeque};

use anyhow::Result;
use rayon::prelude::*;

use crate::database::{ReachabilityEdge, SymbolDatabase};

/// Shortest call-chain distance the engine will record. Anything farther is
/// left out of the closure -- `distance`/`can_reach` beyond this bound must
/// walk the raw Calls edges themselves.
pub const MAX_CLOSURE_DEPTH: u32 = 10;

/// Recompute the full reachability closure for `workspace_id` from the
/// current Calls relationships and persist it, replacing whatever was there.
pub fn refresh(db: &mut SymbolDatabase, workspace_id: &str) -> Result<usize> {
    let edges = compute(db, workspace_id)?;
    let count = edges.len();
    db.replace_reachability(workspace_id, &edges)?;
    Ok(count)
}

/// BFS the Calls graph from every node that has at least one outgoing call,
/// returning the bounded transitive closure without touching storage.
pub fn compute(db: &SymbolDatabase, workspace_id: &str) -> Result<Vec<ReachabilityEdge>> {
    let raw_edges = db.calls_edges(workspace_id)?;

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, to) in &raw_edges {
        adjacency.entry(from.as_str()).or_default().push(to.as_str());
    }

    let sources: Vec<&str> = adjacency.keys().copied().collect();

    let edges: Vec<ReachabilityEdge> = sources
        .par_iter()
        .flat_map(|source| bfs_from(source, &adjacency))
        .collect();

    Ok(edges)
}

/// Bounded BFS from a single source. A cycle just means the node is already
/// in `visited` by the time it's revisited, so its shortest distance is
/// never overwritten.
fn bfs_from(source: &str, adjacency: &HashMap<&str, Vec<&str>>) -> Vec<ReachabilityEdge> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<(&str, u32)> = VecDeque::new();
    let mut out = Vec::new();

    visited.insert(source);
    if let Some(neighbors) = adjacency.get(source) {
        for &n in neighbors {
            if visited.insert(n) {
                queue.push_back((n, 1));
            }
        }
    }

    while let Some((node, distance)) = queue.pop_front() {
        out.push(ReachabilityEdge {
            source_id: source.to_string(),
            target_id: node.to_string(),
            min_distance: distance,
        });

        if distance >= MAX_CLOSURE_DEPTH {
            continue;
        }

        if let Some(neighbors) = adjacency.get(node) {
            for &n in neighbors {
                if visited.insert(n) {
                    queue.push_back((n, distance + 1));
                }
            }
        }
    }

    out
}

/// Whether the persisted closure needs a rebuild: either it has fewer rows
/// than there are Calls relationships, or it references a symbol that no
/// longer exists.
pub fn is_stale(db: &SymbolDatabase, workspace_id: &str) -> Result<bool> {
    let reachability_count = db.reachability_count(workspace_id)?;
    let calls_count = db.calls_relationship_count(workspace_id)?;
    if reachability_count < calls_count {
        return Ok(true);
    }
    db.reachability_has_dangling_rows(workspace_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{Relationship, RelationshipKind, Symbol, SymbolKind, Visibility};

    fn make_symbol(id: &str) -> Symbol {
        Symbol {
            id: id.to_string(),
            name: id.to_string(),
            kind: SymbolKind::Function,
            language: "rust".to_string(),
            file_path: "src/lib.rs".to_string(),
            start_line: 1,
            start_column: 1,
            end_line: 2,
            end_column: 1,
            start_byte: 0,
            end_byte: 10,
            signature: None,
            doc_comment: None,
            visibility: Some(Visibility::Public),
            parent_id: None,
            metadata: None,
            semantic_group: None,
            confidence: None,
            code_context: None,
        }
    }

    fn make_call(from: &str, to: &str) -> Relationship {
        Relationship {
            id: format!("{}-calls-{}", from, to),
            from_symbol_id: from.to_string(),
            to_symbol_id: to.to_string(),
            kind: RelationshipKind::Calls,
            file_path: "src/lib.rs".to_string(),
            line_number: 1,
            confidence: 1.0,
            metadata: None,
        }
    }

    #[test]
    fn bfs_follows_chain_and_ignores_cycles() {
        let mut db = SymbolDatabase::new_in_memory().unwrap();
        for name in ["a", "b", "c"] {
            db.store_symbols(&[make_symbol(name)]).unwrap();
        }
        db.store_relationships(
            &[
                make_call("a", "b"),
                make_call("b", "c"),
                make_call("c", "a"), // cycle back to a
            ],
            "primary",
        )
        .unwrap();

        let edges = compute(&db, "primary").unwrap();

        let find = |s: &str, t: &str| edges.iter().find(|e| e.source_id == s && e.target_id == t);

        assert_eq!(find("a", "b").unwrap().min_distance, 1);
        assert_eq!(find("a", "c").unwrap().min_distance, 2);
        // a is reachable from c, but a itself should never appear as its own target.
        assert!(find("a", "a").is_none());
    }

    #[test]
    fn refresh_persists_and_clears_staleness() {
        let mut db = SymbolDatabase::new_in_memory().unwrap();
        for name in ["a", "b"] {
            db.store_symbols(&[make_symbol(name)]).unwrap();
        }
        db.store_relationships(&[make_call("a", "b")], "primary")
            .unwrap();

        assert!(is_stale(&db, "primary").unwrap());
        let written = refresh(&mut db, "primary").unwrap();
        assert_eq!(written, 1);
        assert!(!is_stale(&db, "primary").unwrap());
        assert_eq!(db.distance("a", "b", "primary").unwrap(), Some(1));
    }
}
