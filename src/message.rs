//! Generation records and the emit-eligibility check.

use crate::ast::Import;
use std::path::{Path, PathBuf};

/// Ordered imports of one source file, duplicates kept.
pub type ImportList = Vec<Import>;

/// The file being processed and its package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub package: String,
}

impl SourceUnit {
    /// Directory generated files are written into.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// A struct field selected for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportField {
    pub name: String,
    /// Declared type name with its first character upper-cased (`int` -> `Int`).
    pub type_tag: String,
}

/// One annotated declaration on its way to a generated file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSpec {
    pub type_name: String,
    pub package: String,
    pub directory: PathBuf,
    /// Signature expression, never evaluated.
    pub signature: String,
    /// Serialization order.
    pub fields: Vec<ExportField>,
    pub imports: ImportList,
}

/// Why a spec was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("annotated declaration is not a struct type")]
    MissingTypeName,
    #[error("missing package name")]
    MissingPackage,
    #[error("empty signature expression")]
    MissingSignature,
    #[error("no fields marked +export+")]
    NoExportFields,
}

impl MessageSpec {
    /// Name used in logs before the type name is known.
    pub fn display_name(&self) -> &str {
        if self.type_name.is_empty() {
            "<unnamed>"
        } else {
            &self.type_name
        }
    }

    /// Check emit eligibility. Pure; reports the first failing rule.
    pub fn validate(&self) -> Result<(), Rejection> {
        if self.type_name.is_empty() {
            return Err(Rejection::MissingTypeName);
        }
        if self.package.is_empty() {
            return Err(Rejection::MissingPackage);
        }
        if self.signature.is_empty() {
            return Err(Rejection::MissingSignature);
        }
        if self.fields.is_empty() {
            return Err(Rejection::NoExportFields);
        }
        Ok(())
    }
}
