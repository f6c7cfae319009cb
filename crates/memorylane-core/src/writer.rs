use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Copy keeps the source, move removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transfer {
    #[default]
    Copy,
    Move,
}

/// What to do when the destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Leave the existing file alone, keep the source where it is.
    Skip,
    /// Store as `name(1).ext`, `name(2).ext`, ...
    Rename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    Skipped(PathBuf),
}

/// Transfer `source` into `dest_dir`, creating the directory chain first.
pub fn place_file(
    source: &Path,
    dest_dir: &Path,
    file_name: &OsStr,
    transfer: Transfer,
    policy: ConflictPolicy,
) -> anyhow::Result<WriteOutcome> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("creating {}", dest_dir.display()))?;

    let base_dest = dest_dir.join(file_name);
    if same_file(source, &base_dest) {
        return Ok(WriteOutcome::Skipped(base_dest));
    }
    let dest = if base_dest.exists() {
        match policy {
            ConflictPolicy::Overwrite => base_dest,
            ConflictPolicy::Skip => return Ok(WriteOutcome::Skipped(base_dest)),
            ConflictPolicy::Rename => free_name(dest_dir, file_name),
        }
    } else {
        base_dest
    };

    match transfer {
        Transfer::Copy => copy_preserving(source, &dest)?,
        Transfer::Move => move_file(source, &dest)?,
    }
    Ok(WriteOutcome::Written(dest))
}

/// First `stem(N).ext` in `dir` that does not exist yet, starting at 1.
/// Built from the raw name so non-UTF-8 bytes survive.
fn free_name(dir: &Path, file_name: &OsStr) -> PathBuf {
    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(OsStr::new("file"));
    let ext = name.extension();

    let mut counter = 0u32;
    loop {
        counter += 1;
        let mut new_name = OsString::from(stem);
        new_name.push(format!("({})", counter));
        if let Some(ext) = ext {
            new_name.push(".");
            new_name.push(ext);
        }
        let candidate = dir.join(&new_name);
        if !candidate.exists() {
            break candidate;
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy contents and permissions, then carry over access and modification
/// times.
fn copy_preserving(source: &Path, dest: &Path) -> anyhow::Result<()> {
    fs::copy(source, dest)
        .with_context(|| format!("copying to {}", dest.display()))?;
    let meta = fs::metadata(source)?;
    let atime = filetime::FileTime::from_last_access_time(&meta);
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(dest, atime, mtime)
        .with_context(|| format!("setting times on {}", dest.display()))?;
    Ok(())
}

/// Rename, falling back to copy + delete when the rename is refused
/// (typically across filesystems).
fn move_file(source: &Path, dest: &Path) -> anyhow::Result<()> {
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }
    copy_preserving(source, dest)?;
    fs::remove_file(source).with_context(|| format!("removing {}", source.display()))?;
    Ok(())
}
