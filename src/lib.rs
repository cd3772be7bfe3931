//! # netmsg-gen: network message handler generator
//!
//! Scans a source tree for struct declarations annotated as wire messages
//! and writes a companion handler file for each one, implementing the
//! dispatch framework's contract (close, init, deserialize, serialize,
//! signature).
//!
//! ## Annotations
//!
//! ```text
//! /* +NetMsg+ 25 */
//! type Example struct {
//!     Count int    // +export+
//!     Label string
//! }
//! ```
//!
//! - The doc comment of a `type` declaration carries `/* +NetMsg+ <signature> */`.
//!   The signature is copied into the generated code verbatim; it may be a
//!   literal or a constant name.
//! - Fields whose trailing comment contains `+export+` are serialized, in
//!   declaration order. Only fields with a single name and a plain
//!   identifier type qualify.
//! - The handler for `Example` is written to `msgExample.go` next to the
//!   source file.
//!
//! ## Pipeline
//!
//! 1. [`imports::extract_imports`]: imports-only parse of the file
//! 2. [`annotation::scan_annotations`]: full parse, annotated declarations in source order
//! 3. [`fields::build_fields`]: type name and exported fields
//! 4. [`MessageSpec::validate`]: drop incomplete candidates
//! 5. [`emit::emit`]: render the template and write the file
//!
//! [`Generator`] runs the stages over every file found under a root.

pub mod annotation;
pub mod ast;
pub mod config;
pub mod discover;
pub mod emit;
pub mod error;
pub mod fields;
pub mod generator;
pub mod imports;
pub mod message;
pub mod parser;

pub use config::Config;
pub use error::GenError;
pub use generator::{Generator, RunReport};
pub use message::{ExportField, ImportList, MessageSpec, Rejection, SourceUnit};
pub use parser::{parse_header, parse_source};
