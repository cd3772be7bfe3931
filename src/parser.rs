//! Parse source text into the syntax tree using PEST.
//!
//! Two entry points mirror the two passes of the generator:
//! [`parse_header`] reads only the package clause and imports,
//! [`parse_source`] reads the whole file including comments.

use crate::ast::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct SourceParser;

/// Parse the package clause and import section; stops before the first declaration.
pub fn parse_header(source: &str) -> Result<Header, String> {
    let pairs = SourceParser::parse(Rule::header, source)
        .map_err(|e| format!("Parse error: {}", e))?;
    let pair = pairs.into_iter().next().ok_or("Empty parse")?;

    let mut package = None;
    let mut imports = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::package_clause => package = Some(build_package(inner)?),
            Rule::import_decl => build_import_decl(inner, &mut imports)?,
            _ => {}
        }
    }
    Ok(Header {
        package: package.ok_or("missing package clause")?,
        imports,
    })
}

/// Parse a whole source file. Comments are kept and attached to type
/// declarations, type specs and struct fields.
pub fn parse_source(source: &str) -> Result<SourceFile, String> {
    let pairs = SourceParser::parse(Rule::source_file, source)
        .map_err(|e| format!("Parse error: {}", e))?;
    let pair = pairs.into_iter().next().ok_or("Empty parse")?;

    let mut package = None;
    let mut type_decls = Vec::new();
    let mut comments = CommentTracker::default();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::comment => {
                comments.comment(build_comment(&inner));
            }
            Rule::package_clause => {
                comments.item(end_line(&inner));
                package = Some(build_package(inner)?);
            }
            Rule::type_decl => {
                let doc = comments.take_doc(start_line(&inner));
                let end = end_line(&inner);
                type_decls.push(build_type_decl(inner, doc)?);
                comments.item(end);
            }
            Rule::EOI => {}
            _ => comments.item(end_line(&inner)),
        }
    }
    Ok(SourceFile {
        package: package.ok_or("missing package clause")?,
        type_decls,
    })
}

fn start_line(pair: &Pair<Rule>) -> usize {
    pair.as_span().start_pos().line_col().0
}

fn end_line(pair: &Pair<Rule>) -> usize {
    pair.as_span().end_pos().line_col().0
}

/// Groups comments and decides which group documents the next item.
///
/// A group is a run of comments with no blank line between them. It
/// documents an item when it ends on the line directly above it. A comment
/// starting on the line where the previous item ended trails that item.
#[derive(Debug, Default)]
struct CommentTracker {
    pending: Option<CommentGroup>,
    last_item_end: usize,
}

impl CommentTracker {
    fn starting_at(line: usize) -> Self {
        Self {
            pending: None,
            last_item_end: line,
        }
    }

    /// Record a comment; returns it back when it trails the previous item.
    fn comment(&mut self, comment: Comment) -> Option<Comment> {
        if self.last_item_end > 0 && comment.line == self.last_item_end {
            return Some(comment);
        }
        match &mut self.pending {
            Some(group) if comment.line <= group.end_line() + 1 => group.comments.push(comment),
            _ => {
                self.pending = Some(CommentGroup {
                    comments: vec![comment],
                })
            }
        }
        None
    }

    fn take_doc(&mut self, line: usize) -> Option<CommentGroup> {
        self.pending.take().filter(|g| g.end_line() + 1 == line)
    }

    fn item(&mut self, end_line: usize) {
        self.pending = None;
        self.last_item_end = end_line;
    }
}

fn build_comment(pair: &Pair<Rule>) -> Comment {
    Comment {
        text: pair.as_str().to_string(),
        line: start_line(pair),
        end_line: end_line(pair),
    }
}

fn build_package(pair: Pair<Rule>) -> Result<String, String> {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| "package clause: missing name".to_string())
}

fn build_import_decl(pair: Pair<Rule>, imports: &mut Vec<Import>) -> Result<(), String> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::import_spec => imports.push(build_import_spec(inner)?),
            Rule::import_group => {
                for spec in inner.into_inner() {
                    if spec.as_rule() == Rule::import_spec {
                        imports.push(build_import_spec(spec)?);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn build_import_spec(pair: Pair<Rule>) -> Result<Import, String> {
    let mut alias = None;
    let mut path = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::import_alias => alias = Some(inner.as_str().to_string()),
            Rule::import_path => path = Some(inner.as_str().to_string()),
            _ => {}
        }
    }
    Ok(Import {
        alias,
        path: path.ok_or("import: missing path")?,
    })
}

fn build_type_decl(pair: Pair<Rule>, doc: Option<CommentGroup>) -> Result<TypeDecl, String> {
    let mut specs = Vec::new();
    let mut grouped = false;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::type_spec => specs.push(build_type_spec(inner, None)?),
            Rule::type_group => {
                grouped = true;
                build_type_group(inner, &mut specs)?;
            }
            _ => {}
        }
    }
    Ok(TypeDecl {
        doc,
        grouped,
        specs,
    })
}

fn build_type_group(pair: Pair<Rule>, specs: &mut Vec<TypeSpecNode>) -> Result<(), String> {
    let mut comments = CommentTracker::starting_at(start_line(&pair));
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::comment => {
                comments.comment(build_comment(&inner));
            }
            Rule::type_spec => {
                let doc = comments.take_doc(start_line(&inner));
                let end = end_line(&inner);
                specs.push(build_type_spec(inner, doc)?);
                comments.item(end);
            }
            _ => {}
        }
    }
    Ok(())
}

fn build_type_spec(pair: Pair<Rule>, doc: Option<CommentGroup>) -> Result<TypeSpecNode, String> {
    let line = start_line(&pair);
    let mut name = String::new();
    let mut generic = false;
    let mut ty = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => name = inner.as_str().to_string(),
            Rule::type_params => generic = true,
            Rule::type_expr => ty = Some(build_type_expr(inner)?),
            _ => {}
        }
    }
    if name.is_empty() {
        return Err(format!("type spec at line {}: missing name", line));
    }
    Ok(TypeSpecNode {
        name,
        doc,
        generic,
        ty: ty.ok_or("type spec: missing type")?,
    })
}

// Spans of non-atomic rules end after the whitespace skipped before a
// trailing optional that did not match, so source text is trimmed.
fn build_type_expr(pair: Pair<Rule>) -> Result<TypeExpr, String> {
    let text = pair.as_str().trim_end().to_string();
    let inner = pair.into_inner().next().ok_or("Empty type_expr")?;
    match inner.as_rule() {
        Rule::struct_type => Ok(TypeExpr::Struct(build_struct(inner)?)),
        Rule::type_name => Ok(build_type_name(inner)),
        _ => Ok(TypeExpr::Composite(text)),
    }
}

/// `T` is a plain identifier; `pkg.T` and `T[A]` are not.
fn build_type_name(pair: Pair<Rule>) -> TypeExpr {
    let text = pair.as_str().trim_end().to_string();
    let mut parts = pair.into_inner();
    match (parts.next(), parts.next()) {
        (Some(ident), None) if ident.as_rule() == Rule::ident => {
            TypeExpr::Ident(ident.as_str().to_string())
        }
        _ => TypeExpr::Composite(text),
    }
}

fn build_struct(pair: Pair<Rule>) -> Result<StructType, String> {
    let mut comments = CommentTracker::starting_at(start_line(&pair));
    let mut fields: Vec<Field> = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::comment => {
                if let Some(trailing) = comments.comment(build_comment(&inner)) {
                    if let Some(field) = fields.last_mut() {
                        field
                            .comment
                            .get_or_insert_with(CommentGroup::default)
                            .comments
                            .push(trailing);
                    }
                }
            }
            Rule::field_decl => {
                let end = end_line(&inner);
                fields.push(build_field(inner)?);
                comments.item(end);
            }
            _ => {}
        }
    }
    Ok(StructType { fields })
}

fn build_field(pair: Pair<Rule>) -> Result<Field, String> {
    let line = start_line(&pair);
    let mut names = Vec::new();
    let mut ty = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::field_names => {
                names = inner
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::ident)
                    .map(|p| p.as_str().to_string())
                    .collect();
            }
            Rule::type_expr => ty = Some(build_type_expr(inner)?),
            Rule::embedded_field => ty = Some(build_embedded(inner)?),
            _ => {}
        }
    }
    Ok(Field {
        line,
        names,
        ty: ty.ok_or_else(|| format!("field at line {}: missing type", line))?,
        comment: None,
    })
}

fn build_embedded(pair: Pair<Rule>) -> Result<TypeExpr, String> {
    if pair.as_str().starts_with('*') {
        return Ok(TypeExpr::Composite(pair.as_str().trim_end().to_string()));
    }
    let name = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::type_name)
        .ok_or("embedded field: missing type name")?;
    Ok(build_type_name(name))
}
