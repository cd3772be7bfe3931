//! Run configuration, built once and passed down the pipeline.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory searched recursively.
    pub root: PathBuf,
    /// Extension of scanned and generated files, without the dot.
    pub extension: String,
    /// Skip files that start with a generated-code header.
    pub skip_generated: bool,
    /// Directory names never descended into (hidden directories are always skipped).
    pub skip_dirs: Vec<String>,
    /// Package qualifier of the buffer library used by generated code.
    pub buffer_package: String,
    /// Package qualifier of the message-dispatch framework.
    pub protocol_package: String,
    /// Type tags whose encoded length depends on the value (`Len<Tag>(v)` instead of `Len<Tag>`).
    pub variable_width: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: "go".to_string(),
            skip_generated: true,
            skip_dirs: vec!["vendor".to_string(), "testdata".to_string()],
            buffer_package: "buffer".to_string(),
            protocol_package: "protocol".to_string(),
            variable_width: vec!["String".to_string()],
        }
    }
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn is_variable_width(&self, type_tag: &str) -> bool {
        self.variable_width.iter().any(|t| t == type_tag)
    }
}
