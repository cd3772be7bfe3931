//! First pass: the import list of a source file.

use crate::error::GenError;
use crate::message::ImportList;
use crate::parser;
use std::path::Path;

pub(crate) fn read_source(path: &Path) -> Result<String, GenError> {
    std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))
}

/// Read the imports of `path` in source order, path literals kept with their quotes.
///
/// Only the package clause and import section are parsed. A file whose
/// header does not parse is a fatal fault.
pub fn extract_imports(path: &Path) -> Result<ImportList, GenError> {
    let source = read_source(path)?;
    let header = parser::parse_header(&source).map_err(|e| GenError::parse(path, e))?;
    Ok(header.imports)
}
