//! Second pass: find annotated type declarations.
//!
//! A declaration is annotated when a comment of its doc group reads
//! `/* +NetMsg+ <signature> */`. Every matching comment opens its own
//! candidate; candidates are returned in source order together with the
//! type spec they describe.

use crate::ast::{CommentGroup, SourceFile, TypeSpecNode};
use crate::error::GenError;
use crate::imports::read_source;
use crate::message::{ImportList, MessageSpec, SourceUnit};
use crate::parser;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

fn annotation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^/\*\s*\+NetMsg\+(.*?)\*/$").expect("annotation pattern is a valid regex")
    })
}

/// Signature text of an annotation comment, trimmed; `None` if the comment is not one.
pub fn match_annotation(comment: &str) -> Option<&str> {
    annotation_pattern()
        .captures(comment.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// A generation candidate and the syntax node it was found on.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub spec: MessageSpec,
    pub node: TypeSpecNode,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub unit: SourceUnit,
    pub candidates: Vec<Candidate>,
}

/// Parse `path` in full and collect its annotation candidates.
///
/// `imports` is the result of the first pass and is copied into every
/// candidate untouched.
pub fn scan_annotations(path: &Path, imports: &ImportList) -> Result<ScannedFile, GenError> {
    let source = read_source(path)?;
    let file = parser::parse_source(&source).map_err(|e| GenError::parse(path, e))?;
    let unit = SourceUnit {
        path: path.to_path_buf(),
        package: file.package.clone(),
    };
    let candidates = collect_candidates(&file, &unit, imports);
    Ok(ScannedFile { unit, candidates })
}

/// Candidates of an already parsed file, in source order.
pub fn collect_candidates(file: &SourceFile, unit: &SourceUnit, imports: &ImportList) -> Vec<Candidate> {
    let mut out = Vec::new();
    for decl in &file.type_decls {
        // Group-level annotations describe the first spec of the group.
        if let (Some(doc), Some(first)) = (&decl.doc, decl.specs.first()) {
            push_matches(&mut out, doc, first, unit, imports);
        }
        if decl.grouped {
            for spec in &decl.specs {
                if let Some(doc) = &spec.doc {
                    push_matches(&mut out, doc, spec, unit, imports);
                }
            }
        }
    }
    out
}

fn push_matches(
    out: &mut Vec<Candidate>,
    doc: &CommentGroup,
    node: &TypeSpecNode,
    unit: &SourceUnit,
    imports: &ImportList,
) {
    for comment in &doc.comments {
        let Some(signature) = match_annotation(&comment.text) else {
            continue;
        };
        info!(
            "Found message annotation at {}:{} (signature: {}, package: {})",
            unit.path.display(),
            comment.line,
            signature,
            unit.package
        );
        out.push(Candidate {
            spec: MessageSpec {
                package: unit.package.clone(),
                directory: unit.directory().to_path_buf(),
                signature: signature.to_string(),
                imports: imports.clone(),
                ..MessageSpec::default()
            },
            node: node.clone(),
            line: comment.line,
        });
    }
}
