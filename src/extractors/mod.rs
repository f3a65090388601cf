//! Language extractors turn a tree-sitter parse tree into symbols,
//! relationships, and identifiers. `base` holds the shared data model and
//! the per-file extraction state; each language module wraps a
//! `BaseExtractor` and owns the grammar-specific tree walk.

pub mod base;
pub mod go;
pub mod javascript;
pub mod manager;
pub mod python;
pub mod rust;
pub mod typescript;

pub use base::{
    BaseExtractor, ExtractionResult, Identifier, IdentifierKind, Relationship, RelationshipKind,
    Symbol, SymbolKind, SymbolOptions, TypeInfo, Visibility,
};
pub use manager::ExtractorManager;
