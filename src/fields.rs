//! Fill a candidate with its type name and exported fields.

use crate::ast::{Field, TypeExpr, TypeSpecNode};
use crate::message::{ExportField, MessageSpec};
use tracing::{debug, info};

/// Substring a field's trailing comment must contain to be serialized.
pub const EXPORT_MARKER: &str = "+export+";

/// Upper-case the first character, keep the rest (`int32` -> `Int32`).
pub fn normalize_type_tag(type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Set `spec.type_name` and `spec.fields` from the declaration node.
///
/// Non-struct declarations (and generic ones, which cannot be instantiated
/// by the generated code) leave the spec without a type name. Fields are
/// appended in declaration order; that order is the wire order.
pub fn build_fields(spec: &mut MessageSpec, node: &TypeSpecNode) {
    let TypeExpr::Struct(st) = &node.ty else {
        debug!("{} is not a struct type", node.name);
        return;
    };
    if node.generic {
        debug!("{} is generic; not generating", node.name);
        return;
    }
    spec.type_name = node.name.clone();
    for field in &st.fields {
        if let Some(export) = export_field(field) {
            info!(
                "{}.{}: exporting as {}",
                spec.type_name, export.name, export.type_tag
            );
            spec.fields.push(export);
        }
    }
}

/// Classify one field. `None` means it is not serialized; that is never an error.
fn export_field(field: &Field) -> Option<ExportField> {
    let marked = field
        .comment
        .as_ref()
        .map(|c| c.contains(EXPORT_MARKER))
        .unwrap_or(false);
    if !marked {
        return None;
    }
    let [name] = field.names.as_slice() else {
        debug!(
            "line {}: export marker on field with {} names, skipped",
            field.line,
            field.names.len()
        );
        return None;
    };
    match &field.ty {
        TypeExpr::Ident(type_name) => Some(ExportField {
            name: name.clone(),
            type_tag: normalize_type_tag(type_name),
        }),
        _ => {
            debug!("{}: composite type is not exportable, skipped", name);
            None
        }
    }
}
