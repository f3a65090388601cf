//! ExtractorManager - public entry point for symbol/identifier/relationship
//! extraction. Parses a file with tree-sitter and dispatches to the
//! language-specific extractor that owns that grammar.

use crate::extractors::base::{ExtractionResult, Identifier, Relationship, Symbol};
use crate::extractors::{go, javascript, python, rust, typescript};
use crate::language::{self, Language};
use tree_sitter::Parser;

/// Stateless dispatcher; one instance is shared across the whole indexer.
#[derive(Default)]
pub struct ExtractorManager {}

impl ExtractorManager {
    pub fn new() -> Self {
        Self {}
    }

    pub fn supported_languages(&self) -> Vec<&'static str> {
        language::ALL_LANGUAGES.iter().map(|l| l.id).collect()
    }

    /// Whether `language` has a concrete tree-sitter extractor wired up, as
    /// opposed to merely being recognized by the language registry.
    pub fn has_extractor(&self, language: &str) -> bool {
        matches!(
            language,
            "rust" | "python" | "javascript" | "jsx" | "typescript" | "tsx" | "go"
        )
    }

    fn parse(&self, language: &Language, content: &str, file_path: &str) -> anyhow::Result<tree_sitter::Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language()?)
            .map_err(|e| anyhow::anyhow!("failed to set parser language for {}: {}", language.id, e))?;
        parser
            .parse(content, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse {}", file_path))
    }

    /// Runs symbol, relationship, and identifier extraction for a file in
    /// one pass, reusing the parsed tree across all three.
    pub fn extract_file(&self, file_path: &str, content: &str) -> anyhow::Result<ExtractionResult> {
        let language = match language::detect(file_path) {
            Some(l) => l,
            None => return Ok(ExtractionResult::default()),
        };

        if !self.has_extractor(language.id) {
            return Ok(ExtractionResult::default());
        }

        let tree = self.parse(&language, content, file_path)?;

        let (symbols, relationships, identifiers) = match language.id {
            "rust" => {
                let mut ext = rust::RustExtractor::new(
                    "rust".to_string(),
                    file_path.to_string(),
                    content.to_string(),
                );
                let symbols = ext.extract_symbols(&tree);
                let relationships = ext.extract_relationships(&tree, &symbols);
                (symbols, relationships, Vec::new())
            }
            "python" => {
                let mut ext = python::PythonExtractor::new(file_path.to_string(), content.to_string());
                let symbols = ext.extract_symbols(&tree);
                let relationships = ext.extract_relationships(&tree, &symbols);
                (symbols, relationships, Vec::new())
            }
            "javascript" | "jsx" => {
                let mut ext = javascript::JavaScriptExtractor::new(
                    language.id.to_string(),
                    file_path.to_string(),
                    content.to_string(),
                );
                let symbols = ext.extract_symbols(&tree);
                let relationships = ext.extract_relationships(&tree, &symbols);
                (symbols, relationships, Vec::new())
            }
            "typescript" | "tsx" => {
                let mut ext = typescript::TypeScriptExtractor::new(
                    language.id.to_string(),
                    file_path.to_string(),
                    content.to_string(),
                );
                let symbols = ext.extract_symbols(&tree);
                let relationships = ext.extract_relationships(&tree, &symbols);
                let identifiers = ext.extract_identifiers(&tree, &symbols);
                (symbols, relationships, identifiers)
            }
            "go" => {
                let mut ext = go::GoExtractor::new(
                    "go".to_string(),
                    file_path.to_string(),
                    content.to_string(),
                );
                let symbols = ext.extract_symbols(&tree);
                let relationships = ext.extract_relationships(&tree, &symbols);
                (symbols, relationships, Vec::new())
            }
            _ => (Vec::new(), Vec::new(), Vec::new()),
        };

        tracing::debug!(
            file = file_path,
            language = language.id,
            symbols = symbols.len(),
            relationships = relationships.len(),
            identifiers = identifiers.len(),
            "extracted file"
        );

        Ok(ExtractionResult {
            symbols,
            identifiers,
            relationships,
        })
    }

    pub fn extract_symbols(&self, file_path: &str, content: &str) -> anyhow::Result<Vec<Symbol>> {
        Ok(self.extract_file(file_path, content)?.symbols)
    }

    pub fn extract_relationships(
        &self,
        file_path: &str,
        content: &str,
        symbols: &[Symbol],
    ) -> anyhow::Result<Vec<Relationship>> {
        let _ = symbols;
        Ok(self.extract_file(file_path, content)?.relationships)
    }

    pub fn extract_identifiers(
        &self,
        file_path: &str,
        content: &str,
        symbols: &[Symbol],
    ) -> anyhow::Result<Vec<Identifier>> {
        let _ = symbols;
        Ok(self.extract_file(file_path, content)?.identifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_returns_empty() {
        let mgr = ExtractorManager::new();
        let result = mgr.extract_file("file.unknownext", "whatever").unwrap();
        assert!(result.symbols.is_empty());
    }

    #[test]
    fn rust_file_extracts_a_function_symbol() {
        let mgr = ExtractorManager::new();
        let result = mgr.extract_file("src/lib.rs", "pub fn add(a: i32, b: i32) -> i32 { a + b }").unwrap();
        assert!(result.symbols.iter().any(|s| s.name == "add"));
    }
}
