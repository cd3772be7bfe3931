//! Generate message handlers for every annotated struct under a directory.
//!
//! Usage:
//!   netmsg-gen [ROOT]
//!
//! ROOT defaults to the current directory. Log verbosity follows `RUST_LOG`
//! (default `info`). Exit code 1 on a fatal fault.

use netmsg_gen::{Config, Generator};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: netmsg-gen [ROOT]";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }
    if args.len() > 1 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }
    let root = args.first().map(String::as_str).unwrap_or(".");

    let generator = Generator::new(Config::new(root));
    let report = generator.run()?;

    eprintln!(
        "netmsg-gen: {} file(s) scanned, {} written, {} skipped, {} conflict(s), {} search error(s)",
        report.files_scanned,
        report.written.len(),
        report.rejected.len(),
        report.conflicts.len(),
        report.discovery_errors
    );
    Ok(())
}
