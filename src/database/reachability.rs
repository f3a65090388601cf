//! Storage primitives for the precomputed reachability closure.
//!
//! The BFS that fills these rows lives in `crate::reachability`; this module
//! only knows how to read and replace what's already on disk, plus detect
//! when the closure no longer matches the Calls relationships it was built
//! from.

use anyhow::Result;
use rusqlite::params;

use crate::database::SymbolDatabase;

/// One row of the precomputed transitive closure.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilityEdge {
    pub source_id: String,
    pub target_id: String,
    pub min_distance: u32,
}

impl SymbolDatabase {
    /// Replace the entire reachability closure for `workspace_id` with `edges`,
    /// inside a single transaction so readers never see a half-written table.
    pub fn replace_reachability(
        &mut self,
        workspace_id: &str,
        edges: &[ReachabilityEdge],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM reachability WHERE workspace_id = ?1",
            params![workspace_id],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO reachability (source_id, target_id, min_distance, workspace_id)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for edge in edges {
                stmt.execute(params![
                    edge.source_id,
                    edge.target_id,
                    edge.min_distance,
                    workspace_id
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// All symbols that transitively call `target_id`, within `max_distance` hops.
    pub fn dependents(
        &self,
        target_id: &str,
        max_distance: u32,
        workspace_id: &str,
    ) -> Result<Vec<ReachabilityEdge>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_id, target_id, min_distance FROM reachability
             WHERE target_id = ?1 AND min_distance <= ?2 AND workspace_id = ?3
             ORDER BY min_distance ASC",
        )?;
        let rows = stmt
            .query_map(params![target_id, max_distance, workspace_id], |row| {
                Ok(ReachabilityEdge {
                    source_id: row.get(0)?,
                    target_id: row.get(1)?,
                    min_distance: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// All symbols that `source_id` transitively calls, within `max_distance` hops.
    pub fn dependencies(
        &self,
        source_id: &str,
        max_distance: u32,
        workspace_id: &str,
    ) -> Result<Vec<ReachabilityEdge>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_id, target_id, min_distance FROM reachability
             WHERE source_id = ?1 AND min_distance <= ?2 AND workspace_id = ?3
             ORDER BY min_distance ASC",
        )?;
        let rows = stmt
            .query_map(params![source_id, max_distance, workspace_id], |row| {
                Ok(ReachabilityEdge {
                    source_id: row.get(0)?,
                    target_id: row.get(1)?,
                    min_distance: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// `dependents` for every id in `target_ids` at once, via a single `IN`
    /// query -- the batched counterpart search's graph expansion needs to
    /// stay at three total queries regardless of hit count.
    pub fn dependents_batch(
        &self,
        target_ids: &[String],
        max_distance: u32,
        workspace_id: &str,
    ) -> Result<Vec<ReachabilityEdge>> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = target_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query = format!(
            "SELECT source_id, target_id, min_distance FROM reachability
             WHERE target_id IN ({placeholders}) AND min_distance <= ? AND workspace_id = ?
             ORDER BY target_id, min_distance ASC"
        );
        let mut stmt = self.conn.prepare(&query)?;
        let mut params: Vec<&dyn rusqlite::ToSql> =
            target_ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();
        params.push(&max_distance);
        params.push(&workspace_id);
        let rows = stmt
            .query_map(params.as_slice(), |row| {
                Ok(ReachabilityEdge {
                    source_id: row.get(0)?,
                    target_id: row.get(1)?,
                    min_distance: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// `dependencies` for every id in `source_ids` at once; see
    /// `dependents_batch`.
    pub fn dependencies_batch(
        &self,
        source_ids: &[String],
        max_distance: u32,
        workspace_id: &str,
    ) -> Result<Vec<ReachabilityEdge>> {
        if source_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = source_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query = format!(
            "SELECT source_id, target_id, min_distance FROM reachability
             WHERE source_id IN ({placeholders}) AND min_distance <= ? AND workspace_id = ?
             ORDER BY source_id, min_distance ASC"
        );
        let mut stmt = self.conn.prepare(&query)?;
        let mut params: Vec<&dyn rusqlite::ToSql> =
            source_ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();
        params.push(&max_distance);
        params.push(&workspace_id);
        let rows = stmt
            .query_map(params.as_slice(), |row| {
                Ok(ReachabilityEdge {
                    source_id: row.get(0)?,
                    target_id: row.get(1)?,
                    min_distance: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Shortest call-chain distance from `source_id` to `target_id`, if reachable.
    pub fn distance(
        &self,
        source_id: &str,
        target_id: &str,
        workspace_id: &str,
    ) -> Result<Option<u32>> {
        use rusqlite::OptionalExtension;
        let distance: Option<u32> = self
            .conn
            .query_row(
                "SELECT min_distance FROM reachability
                 WHERE source_id = ?1 AND target_id = ?2 AND workspace_id = ?3",
                params![source_id, target_id, workspace_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(distance)
    }

    pub fn can_reach(&self, source_id: &str, target_id: &str, workspace_id: &str) -> Result<bool> {
        Ok(self.distance(source_id, target_id, workspace_id)?.is_some())
    }

    /// Total reachability rows for a workspace.
    pub fn reachability_count(&self, workspace_id: &str) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reachability WHERE workspace_id = ?1",
            params![workspace_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count of Calls-kind relationships for a workspace -- the engine is
    /// stale whenever this exceeds `reachability_count`.
    pub fn calls_relationship_count(&self, workspace_id: &str) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM relationships WHERE kind = 'calls' AND workspace_id = ?1",
            params![workspace_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// True if any reachability row references a symbol that no longer exists.
    pub fn reachability_has_dangling_rows(&self, workspace_id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reachability r
             WHERE r.workspace_id = ?1
               AND (NOT EXISTS (SELECT 1 FROM symbols s WHERE s.id = r.source_id)
                 OR NOT EXISTS (SELECT 1 FROM symbols s WHERE s.id = r.target_id))",
            params![workspace_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All Calls relationships for a workspace, as `(from_symbol_id, to_symbol_id)`
    /// pairs -- the raw edge list the BFS expands from.
    pub fn calls_edges(&self, workspace_id: &str) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT from_symbol_id, to_symbol_id FROM relationships
             WHERE kind = 'calls' AND workspace_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![workspace_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_then_query_reachability() {
        let mut db = SymbolDatabase::new_in_memory().unwrap();
        db.replace_reachability(
            "primary",
            &[ReachabilityEdge {
                source_id: "a".into(),
                target_id: "b".into(),
                min_distance: 1,
            }],
        )
        .unwrap();

        assert_eq!(db.distance("a", "b", "primary").unwrap(), Some(1));
        assert!(db.can_reach("a", "b", "primary").unwrap());
        assert_eq!(db.reachability_count("primary").unwrap(), 1);
    }
}
