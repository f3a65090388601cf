mod indexing;
mod queries;
mod result;
#[cfg(test)]
mod tests;
mod utils;
mod writer;

pub use result::SearchResult;
pub use writer::SearchIndexWriter;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tantivy::directory::MmapDirectory;
use tantivy::tokenizer::{LowerCaser, TextAnalyzer};
use tantivy::{Index, IndexReader};
use tokio::sync::Mutex;

use super::schema::{CodeSearchSchema, QueryProcessor};
use super::tokenizers::CodeTokenizer;

fn register_code_tokenizers(index: &Index) -> Result<()> {
    let tokenizer_manager = index.tokenizers();

    tokenizer_manager.register(
        "code_aware",
        TextAnalyzer::builder(CodeTokenizer::default())
            .filter(LowerCaser)
            .build(),
    );

    Ok(())
}

/// Read side of the symbol search index.
///
/// Writes go through `SearchIndexWriter` instead of a writer held here, so
/// that background indexing never blocks a concurrent search. After a
/// writer commits, call `reload_reader` to pick up the new segments.
pub struct SearchEngine {
    index: Index,
    schema: CodeSearchSchema,
    reader: Arc<Mutex<IndexReader>>,
    query_processor: QueryProcessor,
}

impl SearchEngine {
    /// Create a new search engine with the given index path
    pub fn new<P: AsRef<Path>>(index_path: P) -> Result<Self> {
        let schema = CodeSearchSchema::new()?;
        let directory = MmapDirectory::open(index_path.as_ref())?;
        let index = Index::open_or_create(directory, schema.schema().clone())?;

        register_code_tokenizers(&index)?;

        let reader = index.reader()?;
        let query_processor = QueryProcessor::new()?;

        Ok(Self {
            index,
            schema,
            reader: Arc::new(Mutex::new(reader)),
            query_processor,
        })
    }

    /// Create a search engine in RAM for testing
    pub fn in_memory() -> Result<Self> {
        let schema = CodeSearchSchema::new()?;
        let index = Index::create_in_ram(schema.schema().clone());

        register_code_tokenizers(&index)?;

        let reader = index.reader()?;
        let query_processor = QueryProcessor::new()?;

        Ok(Self {
            index,
            schema,
            reader: Arc::new(Mutex::new(reader)),
            query_processor,
        })
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn schema(&self) -> &CodeSearchSchema {
        &self.schema
    }

    /// Pick up segments written by a `SearchIndexWriter` commit elsewhere.
    pub fn reload_reader(&mut self) -> Result<()> {
        let reader = self.index.reader()?;
        self.reader = Arc::new(Mutex::new(reader));
        Ok(())
    }

    /// Get the total number of documents in the Tantivy index
    /// Used to check if the search index has been populated
    pub async fn get_indexed_document_count(&self) -> Result<u64> {
        let searcher = self.reader.lock().await.searcher();
        let segment_readers = searcher.segment_readers();

        let total_docs: u64 = segment_readers
            .iter()
            .map(|reader| reader.num_docs() as u64)
            .sum();

        Ok(total_docs)
    }
}
