// Base extractor types shared by every language extractor.
//
// Each concrete extractor (rust.rs, python.rs, ...) wraps a `BaseExtractor`
// and drives it through a tree-sitter parse tree. The base owns symbol id
// generation, the running symbol_map used to resolve parent/containment
// relationships while walking, and the identifiers collected for a file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tree_sitter::Node;

/// A code symbol (function, class, variable, etc.) extracted from source code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Symbol {
    /// Stable identifier: blake3(file_path, name, kind, start_byte)[:24].
    pub id: String,
    pub name: String,
    pub kind: SymbolKind,
    pub language: String,
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub start_byte: u32,
    pub end_byte: u32,
    pub signature: Option<String>,
    pub doc_comment: Option<String>,
    pub visibility: Option<Visibility>,
    pub parent_id: Option<String>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    /// Cross-language grouping key (e.g. "auth" for AuthService/auth_login).
    pub semantic_group: Option<String>,
    /// Extractor confidence in this symbol's boundaries, 0.0-1.0.
    pub confidence: Option<f32>,
    /// A few lines of surrounding source, used for FTS snippets.
    pub code_context: Option<String>,
    /// Free-form classification used by callers that don't key off SymbolKind.
    pub content_type: Option<String>,
}

/// Kinds of symbols recognized across all supported languages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Interface,
    Function,
    Method,
    Variable,
    Constant,
    Property,
    Field,
    Enum,
    EnumMember,
    Module,
    Namespace,
    Type,
    Trait,
    Struct,
    Union,
    Constructor,
    Destructor,
    Operator,
    Import,
    Export,
    Event,
    Delegate,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Property => "property",
            SymbolKind::Field => "field",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumMember => "enum_member",
            SymbolKind::Module => "module",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Type => "type",
            SymbolKind::Trait => "trait",
            SymbolKind::Struct => "struct",
            SymbolKind::Union => "union",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Destructor => "destructor",
            SymbolKind::Operator => "operator",
            SymbolKind::Import => "import",
            SymbolKind::Export => "export",
            SymbolKind::Event => "event",
            SymbolKind::Delegate => "delegate",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "class" => SymbolKind::Class,
            "interface" => SymbolKind::Interface,
            "function" => SymbolKind::Function,
            "method" => SymbolKind::Method,
            "variable" => SymbolKind::Variable,
            "constant" => SymbolKind::Constant,
            "property" => SymbolKind::Property,
            "field" => SymbolKind::Field,
            "enum" => SymbolKind::Enum,
            "enum_member" => SymbolKind::EnumMember,
            "module" => SymbolKind::Module,
            "namespace" => SymbolKind::Namespace,
            "type" => SymbolKind::Type,
            "trait" => SymbolKind::Trait,
            "struct" => SymbolKind::Struct,
            "union" => SymbolKind::Union,
            "constructor" => SymbolKind::Constructor,
            "destructor" => SymbolKind::Destructor,
            "operator" => SymbolKind::Operator,
            "import" => SymbolKind::Import,
            "export" => SymbolKind::Export,
            "event" => SymbolKind::Event,
            "delegate" => SymbolKind::Delegate,
            _ => SymbolKind::Variable,
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visibility levels for symbols.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Internal,
    Package,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
            Visibility::Package => "package",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            "internal" => Some(Visibility::Internal),
            "package" => Some(Visibility::Package),
            _ => None,
        }
    }
}

/// Relationship between two symbols (Calls, Extends, Implements, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub from_symbol_id: String,
    pub to_symbol_id: String,
    pub kind: RelationshipKind,
    pub file_path: String,
    pub line_number: u32,
    pub confidence: f32,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Calls,
    Extends,
    Implements,
    Uses,
    Returns,
    Parameter,
    Imports,
    Instantiates,
    References,
    Defines,
    Overrides,
    Contains,
    Joins,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Calls => "calls",
            RelationshipKind::Extends => "extends",
            RelationshipKind::Implements => "implements",
            RelationshipKind::Uses => "uses",
            RelationshipKind::Returns => "returns",
            RelationshipKind::Parameter => "parameter",
            RelationshipKind::Imports => "imports",
            RelationshipKind::Instantiates => "instantiates",
            RelationshipKind::References => "references",
            RelationshipKind::Defines => "defines",
            RelationshipKind::Overrides => "overrides",
            RelationshipKind::Contains => "contains",
            RelationshipKind::Joins => "joins",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "calls" => RelationshipKind::Calls,
            "extends" => RelationshipKind::Extends,
            "implements" => RelationshipKind::Implements,
            "uses" => RelationshipKind::Uses,
            "returns" => RelationshipKind::Returns,
            "parameter" => RelationshipKind::Parameter,
            "imports" => RelationshipKind::Imports,
            "instantiates" => RelationshipKind::Instantiates,
            "references" => RelationshipKind::References,
            "defines" => RelationshipKind::Defines,
            "overrides" => RelationshipKind::Overrides,
            "contains" => RelationshipKind::Contains,
            "joins" => RelationshipKind::Joins,
            _ => RelationshipKind::References,
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single usage site: a call, member access, type reference, or import.
/// Distinct from Relationship, which links two resolved symbols; an
/// Identifier may point at a name that never resolves to a known symbol
/// (e.g. a call into a third-party library).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identifier {
    pub id: String,
    pub name: String,
    pub kind: IdentifierKind,
    pub language: String,
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub start_byte: u32,
    pub end_byte: u32,
    /// Symbol whose body contains this usage site, if any.
    pub containing_symbol_id: Option<String>,
    /// Resolved target symbol, filled in by a later linking pass.
    pub target_symbol_id: Option<String>,
    pub confidence: f32,
    pub code_context: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Call,
    MemberAccess,
    TypeUsage,
    VariableRef,
    Import,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Call => "call",
            IdentifierKind::MemberAccess => "member_access",
            IdentifierKind::TypeUsage => "type_usage",
            IdentifierKind::VariableRef => "variable_ref",
            IdentifierKind::Import => "import",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "call" => IdentifierKind::Call,
            "member_access" => IdentifierKind::MemberAccess,
            "type_usage" => IdentifierKind::TypeUsage,
            "variable_ref" => IdentifierKind::VariableRef,
            "import" => IdentifierKind::Import,
            _ => IdentifierKind::VariableRef,
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inferred or declared type for a symbol; kept separate from Symbol since
/// most languages only populate it for a minority of symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeInfo {
    pub symbol_id: String,
    pub resolved_type: String,
    pub generic_params: Option<Vec<String>>,
    pub constraints: Option<Vec<String>>,
    pub is_inferred: bool,
    pub language: String,
}

/// Everything a single-file extraction pass produces.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub symbols: Vec<Symbol>,
    pub identifiers: Vec<Identifier>,
    pub relationships: Vec<Relationship>,
}

/// Optional fields passed to `BaseExtractor::create_symbol`. Most callers only
/// set a handful of these; the rest default to `None`.
#[derive(Debug, Clone, Default)]
pub struct SymbolOptions {
    pub signature: Option<String>,
    pub visibility: Option<Visibility>,
    pub parent_id: Option<String>,
    pub doc_comment: Option<String>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Shared extraction state threaded through every concrete language extractor.
pub struct BaseExtractor {
    pub language: String,
    pub file_path: String,
    pub content: String,
    /// All symbols created so far in this file, keyed by id. Concrete
    /// extractors consult this to resolve parent/containment lookups while
    /// a tree is still being walked.
    pub symbol_map: HashMap<String, Symbol>,
    pub identifiers: Vec<Identifier>,
}

impl BaseExtractor {
    pub fn new(language: String, file_path: String, content: String) -> Self {
        Self {
            language,
            file_path,
            content,
            symbol_map: HashMap::new(),
            identifiers: Vec::new(),
        }
    }

    /// Computes the bit-exact symbol id: blake3(file_path, name, kind,
    /// start_byte), hex-encoded and truncated to 24 characters. Depending
    /// only on these four values (never line/column) keeps ids stable
    /// across whitespace-only edits elsewhere in the file.
    pub fn generate_symbol_id(&self, name: &str, kind: SymbolKind, start_byte: u32) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.file_path.as_bytes());
        hasher.update(b"\0");
        hasher.update(name.as_bytes());
        hasher.update(b"\0");
        hasher.update(kind.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update(start_byte.to_le_bytes().as_slice());
        let hash = hasher.finalize();
        hex::encode(hash.as_bytes())[..24].to_string()
    }

    /// Builds and registers a Symbol for `node`, inserting it into symbol_map
    /// so later siblings in the same file can resolve it as a parent.
    pub fn create_symbol(
        &mut self,
        node: &Node,
        name: String,
        kind: SymbolKind,
        options: SymbolOptions,
    ) -> Symbol {
        let start = node.start_position();
        let end = node.end_position();
        let id = self.generate_symbol_id(&name, kind, node.start_byte() as u32);

        let symbol = Symbol {
            id: id.clone(),
            name,
            kind,
            language: self.language.clone(),
            file_path: self.file_path.clone(),
            start_line: start.row as u32 + 1,
            start_column: start.column as u32,
            end_line: end.row as u32 + 1,
            end_column: end.column as u32,
            start_byte: node.start_byte() as u32,
            end_byte: node.end_byte() as u32,
            signature: options.signature,
            doc_comment: options.doc_comment,
            visibility: options.visibility,
            parent_id: options.parent_id,
            metadata: options.metadata,
            semantic_group: None,
            confidence: Some(1.0),
            code_context: self.code_context_for(node),
            content_type: None,
        };

        self.symbol_map.insert(id, symbol.clone());
        symbol
    }

    /// Registers a usage-site Identifier rooted at `node`.
    pub fn create_identifier(
        &mut self,
        node: &Node,
        name: String,
        kind: IdentifierKind,
        containing_symbol_id: Option<String>,
    ) -> Identifier {
        let start = node.start_position();
        let end = node.end_position();
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.file_path.as_bytes());
        hasher.update(b"\0");
        hasher.update(name.as_bytes());
        hasher.update(b"\0");
        hasher.update(kind.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update((node.start_byte() as u32).to_le_bytes().as_slice());
        let id = hex::encode(hasher.finalize().as_bytes())[..24].to_string();

        let identifier = Identifier {
            id,
            name,
            kind,
            language: self.language.clone(),
            file_path: self.file_path.clone(),
            start_line: start.row as u32 + 1,
            start_column: start.column as u32,
            end_line: end.row as u32 + 1,
            end_column: end.column as u32,
            start_byte: node.start_byte() as u32,
            end_byte: node.end_byte() as u32,
            containing_symbol_id,
            target_symbol_id: None,
            confidence: 0.85,
            code_context: self.code_context_for(node),
        };

        self.identifiers.push(identifier.clone());
        identifier
    }

    /// Finds the innermost symbol in `candidates` whose byte span contains
    /// `node`. Candidates should already be filtered to the current file.
    pub fn find_containing_symbol<'a>(
        &self,
        node: &Node,
        candidates: &'a [Symbol],
    ) -> Option<&'a Symbol> {
        candidates
            .iter()
            .filter(|s| {
                (s.start_byte as usize) <= node.start_byte() && (s.end_byte as usize) >= node.end_byte()
            })
            .min_by_key(|s| s.end_byte - s.start_byte)
    }

    /// Returns the text of `node` verbatim from the source file.
    pub fn get_node_text(&self, node: &Node) -> String {
        self.content
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
            .to_string()
    }

    /// Returns the text of a named child field, if present.
    pub fn get_field_text(&self, node: &Node, field_name: &str) -> Option<String> {
        node.child_by_field_name(field_name)
            .map(|n| self.get_node_text(&n))
    }

    /// A short, best-effort visibility guess shared across languages that
    /// mark visibility with a leading modifier keyword (public/private/
    /// protected/internal). Languages with their own convention (Rust's
    /// `pub`, Go's capitalization) override this in their own extractor.
    pub fn extract_visibility(&self, node: &Node) -> Option<Visibility> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "accessibility_modifier" => {
                    return match self.get_node_text(&child).as_str() {
                        "public" => Some(Visibility::Public),
                        "private" => Some(Visibility::Private),
                        "protected" => Some(Visibility::Protected),
                        _ => None,
                    };
                }
                "public" => return Some(Visibility::Public),
                "private" => return Some(Visibility::Private),
                "protected" => return Some(Visibility::Protected),
                _ => {}
            }
        }
        None
    }

    /// A couple of lines of context around `node`, trimmed, used for search
    /// snippets. Returns None for single-line spans where the signature
    /// already carries enough information.
    fn code_context_for(&self, node: &Node) -> Option<String> {
        let start = node.start_byte();
        let end = node.end_byte().min(self.content.len());
        if start >= end {
            return None;
        }
        let snippet = &self.content[start..end];
        let first_lines: String = snippet.lines().take(3).collect::<Vec<_>>().join("\n");
        if first_lines.is_empty() {
            None
        } else {
            Some(first_lines)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse_rust(src: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .unwrap();
        parser.parse(src, None).unwrap()
    }

    #[test]
    fn symbol_id_is_stable_across_identical_spans() {
        let base = BaseExtractor::new(
            "rust".to_string(),
            "src/lib.rs".to_string(),
            "fn test() {}".to_string(),
        );
        let id1 = base.generate_symbol_id("test", SymbolKind::Function, 0);
        let id2 = base.generate_symbol_id("test", SymbolKind::Function, 0);
        assert_eq!(id1, id2);
        assert_eq!(id1.len(), 24);
    }

    #[test]
    fn symbol_id_changes_with_start_byte() {
        let base = BaseExtractor::new(
            "rust".to_string(),
            "src/lib.rs".to_string(),
            "fn test() {}".to_string(),
        );
        let id1 = base.generate_symbol_id("test", SymbolKind::Function, 0);
        let id2 = base.generate_symbol_id("test", SymbolKind::Function, 10);
        assert_ne!(id1, id2);
    }

    #[test]
    fn create_symbol_registers_in_symbol_map() {
        let src = "fn hello() {}";
        let tree = parse_rust(src);
        let mut base = BaseExtractor::new(
            "rust".to_string(),
            "src/lib.rs".to_string(),
            src.to_string(),
        );
        let root = tree.root_node();
        let fn_node = root.child(0).unwrap();
        let symbol = base.create_symbol(
            &fn_node,
            "hello".to_string(),
            SymbolKind::Function,
            SymbolOptions::default(),
        );
        assert!(base.symbol_map.contains_key(&symbol.id));
        assert_eq!(symbol.name, "hello");
    }
}
