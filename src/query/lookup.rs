//! Definition lookup: resolve each requested symbol name to a definition via
//! a cascade of increasingly fuzzy strategies, stopping at the first one
//! that produces a result. Ambiguity is reported, never silently resolved.

use anyhow::Result;

use super::QueryEngine;
use crate::extractors::Symbol;
use crate::search::{SearchMethod, SearchOptions};

/// Which strategy in the cascade produced a `lookup` hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    ExactName,
    QualifiedName,
    CaseInsensitive,
    WordPart,
    TypoCorrection,
    Semantic,
}

/// Below this Damerau-Levenshtein distance a name is considered a typo of
/// the query rather than a different identifier.
const MAX_TYPO_DISTANCE: usize = 2;
/// Semantic matches below this cosine similarity are reported as no match
/// rather than guessed at.
const SEMANTIC_THRESHOLD: f32 = 0.80;

#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found {
        symbol: Symbol,
        strategy: LookupStrategy,
        score: f32,
    },
    Ambiguous {
        candidates: Vec<Symbol>,
        strategy: LookupStrategy,
    },
    NotFound,
}

#[derive(Debug, Clone)]
pub struct LookupResult {
    pub query: String,
    pub outcome: LookupOutcome,
}

impl QueryEngine {
    /// Resolve each entry in `symbols` to a definition, in the order given.
    pub async fn lookup(&self, symbols: &[String], context_file: Option<&str>) -> Result<Vec<LookupResult>> {
        let mut results = Vec::with_capacity(symbols.len());
        for query in symbols {
            let outcome = self.lookup_one(query, context_file).await?;
            results.push(LookupResult {
                query: query.clone(),
                outcome,
            });
        }
        Ok(results)
    }

    async fn lookup_one(&self, query: &str, context_file: Option<&str>) -> Result<LookupOutcome> {
        // (a) exact name match, optionally restricted to context_file.
        let exact = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            db.find_symbols_by_name(query)?
        };
        let exact = filter_by_context(exact, context_file);
        if let Some(outcome) = resolve(exact, LookupStrategy::ExactName) {
            return Ok(outcome);
        }

        // (b) qualified-name split: "Parent.child" -> look up "child",
        // preferring hits whose parent symbol's name matches "Parent".
        if let Some((parent, child)) = query.rsplit_once('.') {
            let candidates = {
                let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
                db.find_symbols_by_name(child)?
            };
            let candidates = filter_by_context(candidates, context_file);
            let matched_parent: Vec<Symbol> = {
                let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
                candidates
                    .into_iter()
                    .filter(|s| match &s.parent_id {
                        Some(parent_id) => db
                            .get_symbol_by_id(parent_id)
                            .ok()
                            .flatten()
                            .map(|p| p.name == parent)
                            .unwrap_or(false),
                        None => false,
                    })
                    .collect()
            };
            if let Some(outcome) = resolve(matched_parent, LookupStrategy::QualifiedName) {
                return Ok(outcome);
            }
        }

        // (c) case-insensitive match.
        let all = {
            let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
            db.get_all_symbols()?
        };
        let case_insensitive: Vec<Symbol> = all
            .iter()
            .filter(|s| s.name.eq_ignore_ascii_case(query))
            .cloned()
            .collect();
        let case_insensitive = filter_by_context(case_insensitive, context_file);
        if let Some(outcome) = resolve(case_insensitive, LookupStrategy::CaseInsensitive) {
            return Ok(outcome);
        }

        // (d) word-part match: every naming-convention word in the query
        // appears among the symbol's own words.
        let query_words = super::naming::split_words(query);
        let word_part: Vec<Symbol> = all
            .iter()
            .filter(|s| {
                let symbol_words = super::naming::split_words(&s.name);
                !query_words.is_empty() && query_words.iter().all(|w| symbol_words.contains(w))
            })
            .cloned()
            .collect();
        let word_part = filter_by_context(word_part, context_file);
        if let Some(outcome) = resolve(word_part, LookupStrategy::WordPart) {
            return Ok(outcome);
        }

        // (e) Damerau-Levenshtein <= 2 typo correction.
        let mut typo_candidates: Vec<(Symbol, usize)> = all
            .iter()
            .map(|s| (s.clone(), strsim::damerau_levenshtein(query, &s.name)))
            .filter(|(_, distance)| *distance <= MAX_TYPO_DISTANCE)
            .collect();
        typo_candidates.sort_by_key(|(_, distance)| *distance);
        if let Some((_, best_distance)) = typo_candidates.first() {
            let best_distance = *best_distance;
            let tied: Vec<Symbol> = typo_candidates
                .into_iter()
                .take_while(|(_, d)| *d == best_distance)
                .map(|(s, _)| s)
                .collect();
            let tied = filter_by_context(tied, context_file);
            if let Some(outcome) = resolve(tied, LookupStrategy::TypoCorrection) {
                return Ok(outcome);
            }
        }

        // (f) semantic match, cosine >= 0.80 or nothing.
        if let Some(search) = &self.search {
            let hits = search
                .search(
                    query,
                    SearchOptions {
                        method: Some(SearchMethod::Semantic),
                        limit: 5,
                        rerank: false,
                        ..Default::default()
                    },
                    "default",
                )
                .await?;
            if let Some(best) = hits.first() {
                if best.score >= SEMANTIC_THRESHOLD {
                    let db = self.db.lock().unwrap_or_else(|p| p.into_inner());
                    if let Some(symbol) = db.get_symbol_by_id(&best.symbol_id)? {
                        return Ok(LookupOutcome::Found {
                            symbol,
                            strategy: LookupStrategy::Semantic,
                            score: best.score,
                        });
                    }
                }
            }
        }

        Ok(LookupOutcome::NotFound)
    }
}

fn filter_by_context(symbols: Vec<Symbol>, context_file: Option<&str>) -> Vec<Symbol> {
    match context_file {
        None => symbols,
        Some(file) => {
            let narrowed: Vec<Symbol> = symbols.iter().filter(|s| s.file_path == file).cloned().collect();
            if narrowed.is_empty() {
                symbols
            } else {
                narrowed
            }
        }
    }
}

fn resolve(mut candidates: Vec<Symbol>, strategy: LookupStrategy) -> Option<LookupOutcome> {
    match candidates.len() {
        0 => None,
        1 => Some(LookupOutcome::Found {
            symbol: candidates.remove(0),
            strategy,
            score: 1.0,
        }),
        _ => Some(LookupOutcome::Ambiguous { candidates, strategy }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_by_context_falls_back_when_empty() {
        let symbols = vec![make_symbol("a", "file_a.rs"), make_symbol("b", "file_b.rs")];
        let filtered = filter_by_context(symbols.clone(), Some("file_c.rs"));
        assert_eq!(filtered.len(), 2);
        let filtered = filter_by_context(symbols, Some("file_a.rs"));
        assert_eq!(filtered.len(), 1);
    }

    fn make_symbol(name: &str, file_path: &str) -> Symbol {
        use crate::extractors::SymbolKind;
        Symbol {
            id: format!("id_{name}"),
            name: name.to_string(),
            kind: SymbolKind::Function,
            language: "rust".to_string(),
            file_path: file_path.to_string(),
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
}
