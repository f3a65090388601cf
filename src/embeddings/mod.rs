//! Vector Store: ONNX-generated code embeddings, HNSW-backed similarity
//! search, and the model download/cache management that feeds them.
//!
//! `ort_model` wraps the ONNX Runtime session that turns a code snippet into
//! a fixed-size vector; `model_manager` downloads and caches the BGE-Small
//! weights from HuggingFace Hub; `vector_store` owns the actual vectors plus
//! the HNSW index used for approximate nearest-neighbor search;
//! `loaded_index` is a small safety wrapper around `hnsw_rs`'s persistence
//! API. This module is the sole owner of embedding data — the relational
//! store never persists vectors.

mod loaded_index;
mod model_manager;
mod ort_model;
mod vector_store;

pub use loaded_index::LoadedHnswIndex;
pub use model_manager::{ModelManager, ModelPaths};
pub use ort_model::OrtEmbeddingModel;
pub use vector_store::VectorStore;

use crate::database::SymbolDatabase;
use crate::extractors::Symbol;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Turns symbols into vectors. Owns the ONNX session and tokenizer; the
/// database handle is kept around so future callers can drive re-embedding
/// off what's actually in the symbol table rather than what the caller
/// happens to have in hand.
pub struct EmbeddingEngine {
    model: OrtEmbeddingModel,
    #[allow(dead_code)]
    db: Arc<Mutex<SymbolDatabase>>,
}

impl EmbeddingEngine {
    /// Download (if needed) and load `model_name`, caching model files under
    /// `cache_dir`. Currently only "bge-small" is supported, matching
    /// `ModelManager::ensure_model_downloaded`.
    pub async fn new(
        model_name: &str,
        cache_dir: PathBuf,
        db: Arc<Mutex<SymbolDatabase>>,
    ) -> Result<Self> {
        let manager = ModelManager::new(cache_dir)?;
        let paths = manager.ensure_model_downloaded(model_name).await?;
        let model = OrtEmbeddingModel::new(&paths.model, &paths.tokenizer, model_name, None::<PathBuf>)?;
        Ok(Self { model, db })
    }

    pub fn dimensions(&self) -> usize {
        self.model.dimensions()
    }

    pub fn embed_text(&mut self, text: &str) -> Result<Vec<f32>> {
        self.model.encode_single(text.to_string())
    }

    pub fn embed_symbol(&mut self, symbol: &Symbol) -> Result<Vec<f32>> {
        self.embed_text(&symbol_embedding_text(symbol))
    }

    /// Embed a batch of symbols in one ONNX call, returning `(symbol_id, vector)`
    /// pairs in input order.
    pub fn embed_symbols_batch(&mut self, symbols: &[Symbol]) -> Result<Vec<(String, Vec<f32>)>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = symbols.iter().map(symbol_embedding_text).collect();
        let vectors = self.model.encode_batch(texts)?;
        Ok(symbols
            .iter()
            .map(|s| s.id.clone())
            .zip(vectors)
            .collect())
    }

    /// Gateway re-rank entry point: score each candidate text against `query`,
    /// one float per candidate, in input order. There's no separate
    /// cross-encoder weights bundled with this model, so the score comes from
    /// cosine similarity between the same BGE-small encoder's embeddings of
    /// `query` and each candidate -- callers only see the opaque
    /// `rerank(query, candidates) -> scores` contract, not how it's backed.
    pub fn rerank_scores(&mut self, query: &str, candidate_texts: &[String]) -> Result<Vec<f32>> {
        if candidate_texts.is_empty() {
            return Ok(Vec::new());
        }
        let query_vector = self.embed_text(query)?;
        let vectors = self.model.encode_batch(candidate_texts.to_vec())?;
        Ok(vectors.iter().map(|v| cosine_similarity(&query_vector, v)).collect())
    }
}

/// Doc comments beyond this many characters are truncated before being fed
/// to the model -- a long doc comment shouldn't dominate the short
/// signature/name/kind text it's appended to.
const DOC_COMMENT_EMBED_BUDGET: usize = 200;

/// Text representation fed to the embedding model: signature, name, kind,
/// and a truncated doc comment give the model enough signal to place
/// similar-purpose symbols nearby regardless of source language.
fn symbol_embedding_text(symbol: &Symbol) -> String {
    let mut text = match &symbol.signature {
        Some(sig) => format!("{} {} {}", sig, symbol.name, symbol.kind),
        None => format!("{} {}", symbol.name, symbol.kind),
    };
    if let Some(doc) = &symbol.doc_comment {
        let truncated: String = doc.chars().take(DOC_COMMENT_EMBED_BUDGET).collect();
        text.push(' ');
        text.push_str(&truncated);
    }
    text
}

/// A single symbol's similarity search hit: which symbol, how similar, and
/// the embedding itself (handy for callers chaining further comparisons).
#[derive(Debug, Clone)]
pub struct SimilarityResult {
    pub symbol_id: String,
    pub similarity_score: f32,
    pub embedding: Vec<f32>,
}

/// Cosine similarity between two equal-length vectors. Returns 0.0 for a
/// zero-length vector rather than dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let v = vec![0.5, 0.25, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }
}
