//! Syntax tree for the scanned source subset.
//!
//! Only the parts the generator looks at are modelled: the package clause,
//! imports, and type declarations with their comments. Function bodies,
//! variables and constants are parsed as opaque token runs and dropped.

use std::fmt;

/// Result of the imports-only pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub package: String,
    pub imports: Vec<Import>,
}

/// A single import clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// `name`, `.` or `_` when the import is aliased.
    pub alias: Option<String>,
    /// Path literal exactly as written, quotes included.
    pub path: String,
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} {}", alias, self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// Result of the full pass.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub package: String,
    pub type_decls: Vec<TypeDecl>,
}

/// A comment with its line span (1-based, inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub line: usize,
    pub end_line: usize,
}

/// Adjacent comments with no blank line between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    pub fn end_line(&self) -> usize {
        self.comments.last().map(|c| c.end_line).unwrap_or(0)
    }

    /// Whether any comment in the group contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.comments.iter().any(|c| c.text.contains(needle))
    }
}

/// `type X ...` or `type ( ... )`.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub doc: Option<CommentGroup>,
    pub grouped: bool,
    pub specs: Vec<TypeSpecNode>,
}

/// One named type inside a declaration.
#[derive(Debug, Clone)]
pub struct TypeSpecNode {
    pub name: String,
    /// Own doc comment; only set for specs inside a grouped declaration.
    pub doc: Option<CommentGroup>,
    pub generic: bool,
    pub ty: TypeExpr,
}

/// Declared type of a spec or a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Plain identifier, e.g. `int` or `Header`.
    Ident(String),
    Struct(StructType),
    /// Anything else (pointer, slice, map, qualified name, ...), kept as source text.
    Composite(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructType {
    pub fields: Vec<Field>,
}

/// A struct field line. Embedded fields have no names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub line: usize,
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// Trailing comment on the same line as the field.
    pub comment: Option<CommentGroup>,
}
