//! Find references: every identifier whose resolved target is a given
//! symbol, grouped by file and sorted by reference count desc, then line asc.

use anyhow::{anyhow, Result};

use super::QueryEngine;
use crate::extractors::{Relationship, RelationshipKind};

/// One reference site, with optional surrounding context.
#[derive(Debug, Clone)]
pub struct ReferenceHit {
    pub file_path: String,
    pub line_number: u32,
    pub kind: RelationshipKind,
    pub from_symbol_id: String,
    pub context: Option<String>,
}

/// References to a single symbol, grouped by file.
#[derive(Debug, Clone)]
pub struct ReferenceGroup {
    pub file_path: String,
    pub hits: Vec<ReferenceHit>,
}

impl QueryEngine {
    /// Find references to `symbol` (a name or `Parent.child` qualified name,
    /// resolved the same way `lookup` would resolve it).
    pub async fn find_refs(
        &self,
        symbol: &str,
        kind_filter: Option<RelationshipKind>,
        include_context: bool,
        limit: Option<usize>,
    ) -> Result<Vec<ReferenceGroup>> {
        let resolved = self.lookup(&[symbol.to_string()], None).await?;
        let target = match resolved.into_iter().next().map(|r| r.outcome) {
            Some(super::LookupOutcome::Found { symbol, .. }) => symbol,
            Some(super::LookupOutcome::Ambiguous { .. }) => {
                return Err(anyhow!("Symbol '{symbol}' is ambiguous; qualify it with its parent"));
            }
            _ => return Err(anyhow!("Symbol '{symbol}' not found")),
        };

        let relationships: Vec<Relationship> = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            db.get_relationships_to_symbol(&target.id)?
        };

        let mut filtered: Vec<Relationship> = relationships
            .into_iter()
            .filter(|r| kind_filter.map(|k| k == r.kind).unwrap_or(true))
            .collect();
        filtered.sort_by(|a, b| a.file_path.cmp(&b.file_path).then(a.line_number.cmp(&b.line_number)));

        let mut groups: Vec<ReferenceGroup> = Vec::new();
        for rel in filtered {
            let context = if include_context {
                self.line_context(&rel.file_path, rel.line_number)
            } else {
                None
            };
            let hit = ReferenceHit {
                file_path: rel.file_path.clone(),
                line_number: rel.line_number,
                kind: rel.kind,
                from_symbol_id: rel.from_symbol_id,
                context,
            };
            match groups.iter_mut().find(|g| g.file_path == hit.file_path) {
                Some(group) => group.hits.push(hit),
                None => groups.push(ReferenceGroup {
                    file_path: hit.file_path.clone(),
                    hits: vec![hit],
                }),
            }
        }

        groups.sort_by(|a, b| b.hits.len().cmp(&a.hits.len()).then(a.file_path.cmp(&b.file_path)));
        for group in &mut groups {
            group.hits.sort_by_key(|h| h.line_number);
        }

        if let Some(limit) = limit {
            let mut remaining = limit;
            groups.retain_mut(|g| {
                if remaining == 0 {
                    return false;
                }
                if g.hits.len() > remaining {
                    g.hits.truncate(remaining);
                }
                remaining -= g.hits.len();
                true
            });
        }

        Ok(groups)
    }

    /// Read one line (plus a line of context either side) from disk for a
    /// reference snippet. Returns `None` if the file can't be read.
    fn line_context(&self, file_path: &str, line_number: u32) -> Option<String> {
        let content = std::fs::read_to_string(file_path).ok()?;
        let lines: Vec<&str> = content.lines().collect();
        let idx = line_number.saturating_sub(1) as usize;
        let start = idx.saturating_sub(1);
        let end = (idx + 2).min(lines.len());
        if start >= lines.len() {
            return None;
        }
        Some(lines[start..end].join("\n"))
    }
}
