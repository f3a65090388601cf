//! Language registry: maps file extensions to language identifiers and, for
//! the handful of languages with a concrete extractor, to a tree-sitter
//! grammar. The registry enumerates every language a workspace scan will
//! recognize; `ExtractorManager::has_extractor` decides which of those
//! actually get symbols/relationships/identifiers extracted.

use anyhow::{anyhow, Result};

/// One entry in the registry: an id, the file extensions that map to it, and
/// whether a concrete tree-sitter extractor exists for it.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    pub id: &'static str,
    pub extensions: &'static [&'static str],
    pub has_grammar: bool,
}

impl Language {
    /// Looks up the tree-sitter grammar for languages that have one wired in.
    /// Callers must check `has_grammar` (or go through `ExtractorManager`)
    /// before calling this for a language the crate doesn't extract.
    pub fn tree_sitter_language(&self) -> Result<tree_sitter::Language> {
        match self.id {
            "rust" => Ok(tree_sitter_rust::LANGUAGE.into()),
            "python" => Ok(tree_sitter_python::LANGUAGE.into()),
            "javascript" | "jsx" => Ok(tree_sitter_javascript::LANGUAGE.into()),
            "typescript" => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            "tsx" => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
            "go" => Ok(tree_sitter_go::LANGUAGE.into()),
            other => Err(anyhow!("no tree-sitter grammar wired up for '{}'", other)),
        }
    }
}

/// Every language the scanner and ignore resolver recognize by extension.
/// Most are data-only (no extractor); see `ExtractorManager::has_extractor`
/// for the subset that actually yields symbols.
pub static ALL_LANGUAGES: &[Language] = &[
    Language { id: "rust", extensions: &["rs"], has_grammar: true },
    Language { id: "python", extensions: &["py", "pyi"], has_grammar: true },
    Language { id: "javascript", extensions: &["js", "mjs", "cjs"], has_grammar: true },
    Language { id: "jsx", extensions: &["jsx"], has_grammar: true },
    Language { id: "typescript", extensions: &["ts", "mts", "cts"], has_grammar: true },
    Language { id: "tsx", extensions: &["tsx"], has_grammar: true },
    Language { id: "go", extensions: &["go"], has_grammar: true },
    Language { id: "java", extensions: &["java"], has_grammar: false },
    Language { id: "c", extensions: &["c", "h"], has_grammar: false },
    Language { id: "cpp", extensions: &["cpp", "cc", "cxx", "hpp"], has_grammar: false },
    Language { id: "csharp", extensions: &["cs"], has_grammar: false },
    Language { id: "ruby", extensions: &["rb"], has_grammar: false },
    Language { id: "php", extensions: &["php"], has_grammar: false },
    Language { id: "swift", extensions: &["swift"], has_grammar: false },
    Language { id: "kotlin", extensions: &["kt", "kts"], has_grammar: false },
    Language { id: "dart", extensions: &["dart"], has_grammar: false },
    Language { id: "gdscript", extensions: &["gd"], has_grammar: false },
    Language { id: "lua", extensions: &["lua"], has_grammar: false },
    Language { id: "r", extensions: &["r", "R"], has_grammar: false },
    Language { id: "vue", extensions: &["vue"], has_grammar: false },
    Language { id: "razor", extensions: &["razor", "cshtml"], has_grammar: false },
    Language { id: "sql", extensions: &["sql"], has_grammar: false },
    Language { id: "html", extensions: &["html", "htm"], has_grammar: false },
    Language { id: "css", extensions: &["css", "scss"], has_grammar: false },
    Language { id: "bash", extensions: &["sh", "bash"], has_grammar: false },
    Language { id: "powershell", extensions: &["ps1"], has_grammar: false },
    Language { id: "zig", extensions: &["zig"], has_grammar: false },
    Language { id: "json", extensions: &["json"], has_grammar: false },
    Language { id: "yaml", extensions: &["yaml", "yml"], has_grammar: false },
    Language { id: "toml", extensions: &["toml"], has_grammar: false },
    Language { id: "markdown", extensions: &["md", "markdown"], has_grammar: false },
];

/// Resolves a file path to its registered language by extension, case
/// sensitively (matters for `.R` vs the Rust-reserved `.r`... both map to
/// `r` in practice, languages rarely collide on extension case).
pub fn detect(file_path: &str) -> Option<Language> {
    let ext = std::path::Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())?;
    ALL_LANGUAGES
        .iter()
        .find(|lang| lang.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rust_by_extension() {
        let lang = detect("src/main.rs").unwrap();
        assert_eq!(lang.id, "rust");
        assert!(lang.has_grammar);
    }

    #[test]
    fn unknown_extension_returns_none() {
        assert!(detect("README").is_none());
    }

    #[test]
    fn data_only_language_has_no_grammar() {
        let lang = detect("main.java").unwrap();
        assert_eq!(lang.id, "java");
        assert!(!lang.has_grammar);
    }
}
