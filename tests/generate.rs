//! End-to-end generation tests: golden output, validation, ordering, idempotence, fault policy.

use netmsg_gen::{Config, GenError, Generator, Rejection};
use regex::Regex;
use std::fs;
use std::path::Path;

const EXAMPLE_SRC: &str = r#"package game

import (
	"example.com/net/buffer"
	"example.com/net/protocol"
)

/* +NetMsg+ 25 */
type Example struct {
	Count int // +export+
	Label string
}
"#;

const LOGIN_SRC: &str = r#"// Package lobby holds login messages.
package lobby

import (
	"fmt"
	"example.com/net/buffer"
	"example.com/net/protocol"
	xlog "example.com/log"
)

const SigLogin = 0x0102

/* +NetMsg+ SigLogin */
type Login struct {
	Zone    uint16 // +export+
	Account string // +export+
	Token   []byte // +export+
	Level   int32  // +export+
	cache   map[string]int
}

func (l *Login) String() string {
	xlog.Debug(`raw { string`)
	return fmt.Sprintf("login{%d}", l.Zone)
}
"#;

const GOLDEN_EXAMPLE: &str = include_str!("golden/msgExample.go.golden");
const GOLDEN_LOGIN: &str = include_str!("golden/msgLogin.go.golden");

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn run(root: &Path) -> netmsg_gen::RunReport {
    Generator::new(Config::new(root)).run().expect("run")
}

#[test]
fn example_matches_golden() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "game/example.go", EXAMPLE_SRC);
    let report = run(dir.path());
    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.written, vec![dir.path().join("game/msgExample.go")]);
    let text = fs::read_to_string(dir.path().join("game/msgExample.go")).unwrap();
    assert_eq!(text, GOLDEN_EXAMPLE);
}

#[test]
fn login_matches_golden() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lobby/login.go", LOGIN_SRC);
    run(dir.path());
    let text = fs::read_to_string(dir.path().join("lobby/msgLogin.go")).unwrap();
    assert_eq!(text, GOLDEN_LOGIN);
}

#[test]
fn example_scenario_reads_and_writes_only_count() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "game/example.go", EXAMPLE_SRC);
    run(dir.path());
    let text = fs::read_to_string(dir.path().join("game/msgExample.go")).unwrap();
    assert_eq!(text.matches("buffer.Read").count(), 1);
    assert_eq!(text.matches("buffer.Write").count(), 1);
    assert!(text.contains("v.Count, pos, err = buffer.ReadInt("));
    assert!(!text.contains("Label"));
    assert!(text.contains("Signature() uint16 {\n\treturn 25\n}"));
}

#[test]
fn unmarked_fields_never_appear() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lobby/login.go", LOGIN_SRC);
    run(dir.path());
    let text = fs::read_to_string(dir.path().join("lobby/msgLogin.go")).unwrap();
    assert!(!text.contains("cache"));
    assert!(!text.contains("Token"));
}

#[test]
fn reads_and_writes_share_one_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lobby/login.go", LOGIN_SRC);
    run(dir.path());
    let text = fs::read_to_string(dir.path().join("lobby/msgLogin.go")).unwrap();

    let reads: Vec<(String, String)> = Regex::new(r"v\.(\w+), pos, err = buffer\.Read(\w+)\(")
        .unwrap()
        .captures_iter(&text)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect();
    let writes: Vec<(String, String)> = Regex::new(r"buffer\.Write(\w+)\(data, pos, v\.(\w+)\)")
        .unwrap()
        .captures_iter(&text)
        .map(|c| (c[2].to_string(), c[1].to_string()))
        .collect();
    let lengths: Vec<String> = Regex::new(r"buffer\.Len(\w+)")
        .unwrap()
        .captures_iter(&text)
        .map(|c| c[1].to_string())
        .collect();

    let expected = vec![
        ("Zone".to_string(), "Uint16".to_string()),
        ("Account".to_string(), "String".to_string()),
        ("Level".to_string(), "Int32".to_string()),
    ];
    assert_eq!(reads, expected);
    assert_eq!(writes, expected);
    assert_eq!(lengths, vec!["Uint16", "String", "Int32"]);
}

#[test]
fn no_export_fields_means_no_file() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "game/empty.go",
        "package game\n\n/* +NetMsg+ 7 */\ntype Empty struct {\n\tA int\n\tB string // exported elsewhere\n}\n",
    );
    let report = run(dir.path());
    assert!(report.written.is_empty());
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].type_name, "Empty");
    assert_eq!(report.rejected[0].reason, Rejection::NoExportFields);
    assert!(!dir.path().join("game/msgEmpty.go").exists());
}

#[test]
fn one_bad_candidate_does_not_block_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "game/mixed.go",
        r#"package game

/* +NetMsg+ 1 */
type Code int

/* +NetMsg+ */
type Unsigned struct {
	A int // +export+
}

/* +NetMsg+ 3 */
type Good struct {
	A int // +export+
}
"#,
    );
    let report = run(dir.path());
    let reasons: Vec<Rejection> = report.rejected.iter().map(|r| r.reason).collect();
    assert_eq!(
        reasons,
        vec![Rejection::MissingTypeName, Rejection::MissingSignature]
    );
    assert_eq!(report.written, vec![dir.path().join("game/msgGood.go")]);
}

#[test]
fn two_annotations_on_one_declaration() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "game/dup.go",
        "package game\n\n/* +NetMsg+ 1 */\n/* +NetMsg+ 2 */\ntype Dup struct {\n\tA int // +export+\n}\n",
    );
    let report = run(dir.path());
    assert_eq!(report.written.len(), 1);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].output, dir.path().join("game/msgDup.go"));
}

#[test]
fn second_run_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "game/example.go", EXAMPLE_SRC);
    write(dir.path(), "lobby/login.go", LOGIN_SRC);

    let first = run(dir.path());
    let snapshot: Vec<Vec<u8>> = first.written.iter().map(|p| fs::read(p).unwrap()).collect();

    let second = run(dir.path());
    assert_eq!(second.written, first.written);
    assert_eq!(second.files_skipped, 2, "generated files are not rescanned");
    let again: Vec<Vec<u8>> = second.written.iter().map(|p| fs::read(p).unwrap()).collect();
    assert_eq!(snapshot, again);
}

#[test]
fn output_order_follows_tree_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b/b.go", "package b\n\n/* +NetMsg+ 2 */\ntype B struct {\n\tX int // +export+\n}\n");
    write(dir.path(), "a/a.go", "package a\n\n/* +NetMsg+ 1 */\ntype A struct {\n\tX int // +export+\n}\n\n/* +NetMsg+ 3 */\ntype C struct {\n\tX int // +export+\n}\n");
    let report = run(dir.path());
    assert_eq!(
        report.written,
        vec![
            dir.path().join("a/msgA.go"),
            dir.path().join("a/msgC.go"),
            dir.path().join("b/msgB.go"),
        ]
    );
}

#[test]
fn unparsable_file_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad/bad.go", "package bad\n\nfunc oops() {\n");
    let err = Generator::new(Config::new(dir.path())).run().unwrap_err();
    assert!(matches!(err, GenError::Parse { .. }), "got {err}");
}

#[test]
fn aligned_columns_do_not_change_the_output() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "game/pos.go",
        "package game\n\n/* +NetMsg+ 9 */\ntype Pos struct {\n\tX     int32   // +export+\n\tLabel string\t// +export+\n}\n",
    );
    run(dir.path());
    let text = fs::read_to_string(dir.path().join("game/msgPos.go")).unwrap();
    assert!(text.contains("buffer.ReadInt32(raw.Payload, pos)"), "{text}");
    assert!(text.contains("buffer.LenInt32 + buffer.LenString(v.Label)"), "{text}");
    assert!(!text.contains("  +"), "{text}");
}

#[test]
fn wrapped_field_names_keep_the_struct() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "game/wrap.go",
        "package game\n\n/* +NetMsg+ 4 */\ntype Wrap struct {\n\tX,\n\tY int\n\tZ int // +export+\n}\n",
    );
    let report = run(dir.path());
    assert!(report.rejected.is_empty());
    assert_eq!(report.written, vec![dir.path().join("game/msgWrap.go")]);
    let text = fs::read_to_string(dir.path().join("game/msgWrap.go")).unwrap();
    assert!(text.contains("v.Z"));
    assert!(!text.contains("v.X") && !text.contains("v.Y"));
}

#[test]
fn unwritable_output_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a/a.go", "package a\n\n/* +NetMsg+ 1 */\ntype A struct {\n\tX int // +export+\n}\n");
    fs::create_dir_all(dir.path().join("a/msgA.go")).unwrap();
    let err = Generator::new(Config::new(dir.path())).run().unwrap_err();
    match err {
        GenError::Io { path, .. } => assert_eq!(path, dir.path().join("a/msgA.go")),
        other => panic!("expected Io error, got {other}"),
    }
}

#[test]
fn missing_root_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(&dir.path().join("nowhere"));
    assert_eq!(report.discovery_errors, 1);
    assert_eq!(report.files_scanned, 0);
}
