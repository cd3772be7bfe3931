//! The generation pipeline: discover, extract imports, scan annotations,
//! build fields, validate, emit.
//!
//! Files are processed one at a time and completely. Validation failures
//! and output conflicts drop a single candidate; every [`GenError`] ends
//! the run.

use crate::annotation::{scan_annotations, Candidate};
use crate::config::Config;
use crate::discover::{self, Discovered};
use crate::emit;
use crate::error::GenError;
use crate::fields::build_fields;
use crate::imports::extract_imports;
use crate::message::Rejection;
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

/// A candidate that failed validation.
#[derive(Debug, Clone)]
pub struct Rejected {
    pub source: PathBuf,
    pub line: usize,
    pub type_name: String,
    pub reason: Rejection,
}

/// A candidate whose output path was already written in this run.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub source: PathBuf,
    pub line: usize,
    pub output: PathBuf,
}

/// What a run did.
#[derive(Debug, Default)]
pub struct RunReport {
    pub files_scanned: usize,
    /// Files skipped because they carry a generated-code header.
    pub files_skipped: usize,
    pub written: Vec<PathBuf>,
    pub rejected: Vec<Rejected>,
    pub conflicts: Vec<Conflict>,
    pub discovery_errors: usize,
    /// Output paths claimed in this run.
    claimed: HashSet<PathBuf>,
}

pub struct Generator {
    config: Config,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Walk the configured root and generate handlers for every file found.
    pub fn run(&self) -> Result<RunReport, GenError> {
        info!("Searching {}", self.config.root.display());
        let mut report = RunReport::default();
        for event in discover::spawn(&self.config) {
            match event {
                Discovered::File(path) => self.process_file(&path, &mut report)?,
                Discovered::Error(e) => {
                    error!("Search error: {}", e);
                    report.discovery_errors += 1;
                }
            }
        }
        Ok(report)
    }

    /// Run every stage for one source file, recording results in `report`.
    pub fn process_file(&self, path: &Path, report: &mut RunReport) -> Result<(), GenError> {
        if self.config.skip_generated && is_generated(path)? {
            debug!("Skipping generated file {}", path.display());
            report.files_skipped += 1;
            return Ok(());
        }
        report.files_scanned += 1;

        let imports = extract_imports(path)?;
        let scanned = scan_annotations(path, &imports)?;

        for Candidate { mut spec, node, line } in scanned.candidates {
            build_fields(&mut spec, &node);
            if let Err(reason) = spec.validate() {
                warn!(
                    "Skipping {} ({}:{}): {}",
                    spec.display_name(),
                    path.display(),
                    line,
                    reason
                );
                report.rejected.push(Rejected {
                    source: path.to_path_buf(),
                    line,
                    type_name: spec.type_name,
                    reason,
                });
                continue;
            }
            info!(
                "Message {} (signature: {}, package: {}, {} field(s))",
                spec.type_name,
                spec.signature,
                spec.package,
                spec.fields.len()
            );

            let output = emit::output_path(&spec, &self.config);
            if !report.claimed.insert(output.clone()) {
                warn!(
                    "Conflict: {} ({}:{}) would overwrite {} written earlier in this run; skipped",
                    spec.type_name,
                    path.display(),
                    line,
                    output.display()
                );
                report.conflicts.push(Conflict {
                    source: path.to_path_buf(),
                    line,
                    output,
                });
                continue;
            }

            let written = emit::emit(&spec, &self.config)?;
            info!("Wrote {}", written.display());
            report.written.push(written);
        }
        Ok(())
    }
}

fn generated_header() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^// Code generated .* DO NOT EDIT\.$").expect("header pattern is a valid regex")
    })
}

/// Whether the first line of `path` is a generated-code header.
pub fn is_generated(path: &Path) -> Result<bool, GenError> {
    let file = File::open(path).map_err(|e| GenError::io(path, e))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|e| GenError::io(path, e))?;
    Ok(generated_header().is_match(first.trim_end()))
}
