use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::logger::Logger;

/// Collect every regular file under `root`, recursing into subdirectories,
/// in file-name order. Anything under `exclude` is left out, so an output
/// directory nested in the input is never fed back into the run.
///
/// Symlinks to files are collected like the files themselves; links to
/// directories are not descended into. Unreadable entries and dangling
/// links are logged and skipped.
pub fn collect_files(root: &Path, exclude: Option<&Path>, logger: &dyn Logger) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match exclude {
            Some(skip) => entry.depth() == 0 || entry.path() != skip,
            None => true,
        });

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(entry) if entry.path_is_symlink() => {
                if entry.path().is_file() {
                    files.push(entry.into_path());
                } else {
                    logger.info(&format!("⏭️ {} skipped, link does not point to a file", entry.path().display()));
                }
            }
            Ok(_) => {}
            Err(e) => logger.error(&format!("❌ Cannot read {}", e)),
        }
    }
    files
}
