//! Parser fuzz target: feed arbitrary text to both parse passes.
//! Neither pass may panic; each returns Ok or Err(String).
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let _ = netmsg_gen::parse_header(s);
    if let Ok(file) = netmsg_gen::parse_source(s) {
        for decl in &file.type_decls {
            for spec in &decl.specs {
                let mut msg = netmsg_gen::MessageSpec::default();
                netmsg_gen::fields::build_fields(&mut msg, spec);
            }
        }
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
