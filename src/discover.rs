//! Recursive file discovery on a background thread.
//!
//! Paths are delivered over a channel in file-name order; the channel
//! closes when the walk is done. Files whose name starts with `.` or `_`
//! are ignored, as the Go toolchain does. Walk errors travel on the same channel
//! and never stop the walk.

use crate::config::Config;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug)]
pub enum Discovered {
    File(PathBuf),
    Error(walkdir::Error),
}

/// Start walking `config.root`. Iterate the receiver until it is exhausted.
pub fn spawn(config: &Config) -> Receiver<Discovered> {
    let (tx, rx) = mpsc::channel();
    let root = config.root.clone();
    let extension = config.extension.clone();
    let skip_dirs = config.skip_dirs.clone();
    thread::spawn(move || {
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e, &skip_dirs));
        for entry in walker {
            let event = match entry {
                Ok(e) if e.file_type().is_file()
                    && has_extension(&e, &extension)
                    && !is_ignored_file(&e) =>
                {
                    Discovered::File(e.into_path())
                }
                Ok(_) => continue,
                Err(e) => Discovered::Error(e),
            };
            if tx.send(event).is_err() {
                // Receiver gone; nobody is listening anymore.
                break;
            }
        }
    });
    rx
}

fn is_skipped_dir(entry: &DirEntry, skip_dirs: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || skip_dirs.iter().any(|d| *d == name)
}

fn is_ignored_file(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_')
}

fn has_extension(entry: &DirEntry, extension: &str) -> bool {
    entry
        .path()
        .extension()
        .map(|e| e == extension)
        .unwrap_or(false)
}
