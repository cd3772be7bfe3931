//! Render the handler template for a validated [`MessageSpec`] and write it
//! next to the source file.
//!
//! The generated handler calls three functions of the buffer library per
//! type tag `T`:
//!
//! - `Read<T>(data []byte, pos int) (value, int, error)`
//! - `Write<T>(data []byte, pos int, value) int`
//! - `Len<T>` (constant) or `Len<T>(value) int` for variable-width tags
//!
//! The text produced here is consumed by the dispatch framework as is; the
//! golden tests in `tests/generate.rs` pin it.

use crate::config::Config;
use crate::error::GenError;
use crate::message::MessageSpec;
use std::fmt::Write;
use std::path::PathBuf;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by netmsg-gen. DO NOT EDIT.";

const FMT_IMPORT: &str = "\"fmt\"";

/// `<directory>/msg<TypeName>.<ext>`
pub fn output_path(spec: &MessageSpec, config: &Config) -> PathBuf {
    spec.directory
        .join(format!("msg{}.{}", spec.type_name, config.extension))
}

/// Render the generated source for `spec`.
pub fn render(spec: &MessageSpec, config: &Config) -> Result<String, GenError> {
    let name = &spec.type_name;
    let handler = format!("msg{}", name);
    let buf = &config.buffer_package;
    let proto = &config.protocol_package;

    let mut out = String::new();
    writeln!(out, "{}", GENERATED_HEADER)?;
    writeln!(out)?;
    writeln!(out, "package {}", spec.package)?;
    writeln!(out)?;

    writeln!(out, "import (")?;
    for import in &spec.imports {
        writeln!(out, "\t{}", import)?;
    }
    let has_fmt = spec
        .imports
        .iter()
        .any(|i| i.path == FMT_IMPORT && i.alias.as_deref().map_or(true, |a| a == "fmt"));
    if !has_fmt {
        writeln!(out, "\t{}", FMT_IMPORT)?;
    }
    writeln!(out, ")")?;
    writeln!(out)?;

    writeln!(out, "// {} handles {} messages.", handler, name)?;
    writeln!(out, "type {} struct{{}}", handler)?;
    writeln!(out)?;
    writeln!(out, "func (m *{}) Close() {{}}", handler)?;
    writeln!(out)?;
    writeln!(out, "func (m *{}) Init(p *{}.Protocol) {{}}", handler, proto)?;
    writeln!(out)?;

    // Deserialize: one read per field, shared cursor, first error returns.
    writeln!(
        out,
        "func (m *{}) Deserialize(raw *{}.RawMessage, access byte) (interface{{}}, error) {{",
        handler, proto
    )?;
    writeln!(out, "\tv := &{}{{}}", name)?;
    writeln!(out, "\tpos := 0")?;
    writeln!(out, "\tvar err error")?;
    for field in &spec.fields {
        writeln!(
            out,
            "\tif v.{}, pos, err = {}.Read{}(raw.Payload, pos); err != nil {{",
            field.name, buf, field.type_tag
        )?;
        writeln!(out, "\t\treturn nil, err")?;
        writeln!(out, "\t}}")?;
    }
    writeln!(out, "\treturn v, nil")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    // Serialize: exact-size buffer, writes in the same order as the reads above.
    writeln!(
        out,
        "func (m *{}) Serialize(i interface{{}}) (*{}.Message, error) {{",
        handler, proto
    )?;
    writeln!(out, "\tv, ok := i.(*{})", name)?;
    writeln!(out, "\tif !ok {{")?;
    writeln!(
        out,
        "\t\treturn nil, fmt.Errorf(\"{}: expected *{}, got %T\", i)",
        handler, name
    )?;
    writeln!(out, "\t}}")?;
    let lengths: Vec<String> = spec
        .fields
        .iter()
        .map(|f| {
            if config.is_variable_width(&f.type_tag) {
                format!("{}.Len{}(v.{})", buf, f.type_tag, f.name)
            } else {
                format!("{}.Len{}", buf, f.type_tag)
            }
        })
        .collect();
    writeln!(out, "\tsize := {}", lengths.join(" + "))?;
    writeln!(out, "\tdata := make([]byte, size)")?;
    writeln!(out, "\tpos := 0")?;
    for field in &spec.fields {
        writeln!(
            out,
            "\tpos = {}.Write{}(data, pos, v.{})",
            buf, field.type_tag, field.name
        )?;
    }
    writeln!(
        out,
        "\treturn {}.NewMessage(m.Signature(), data), nil",
        proto
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "func (m *{}) Signature() uint16 {{", handler)?;
    writeln!(out, "\treturn {}", spec.signature)?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// Render and write the handler file; returns the written path.
pub fn emit(spec: &MessageSpec, config: &Config) -> Result<PathBuf, GenError> {
    let path = output_path(spec, config);
    let text = render(spec, config)?;
    std::fs::write(&path, text).map_err(|e| GenError::io(&path, e))?;
    Ok(path)
}
