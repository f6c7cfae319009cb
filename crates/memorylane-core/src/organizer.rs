use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::date::{DateResult, Resolution, Resolver};
use crate::layout::{matches_layout, DateFormat};
use crate::logger::Logger;
use crate::scan;
use crate::writer::{self, ConflictPolicy, Transfer, WriteOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Organize: transferred. `date` is `None` for the `unknown` bucket.
    Placed {
        destination: PathBuf,
        date: Option<DateResult>,
    },
    /// Organize: destination already held the file, nothing transferred.
    Skipped { destination: PathBuf },
    /// Organize: directory creation or transfer failed.
    Failed { reason: String },
    /// Check: the subpath the file would be organized into.
    Reported { subpath: PathBuf, date: DateResult },
    /// Validate: whether the file sits where its date says it should.
    Validated { expected: PathBuf, matches: bool },
    /// Check/validate: no date could be resolved.
    Unresolved(Resolution),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u64,
    pub placed: u64,
    pub unknown: u64,
    pub skipped: u64,
    pub failed: u64,
    pub reported: u64,
    pub unresolved: u64,
    pub matched: u64,
    pub mismatched: u64,
}

impl RunSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut s = RunSummary {
            processed: reports.len() as u64,
            ..Default::default()
        };
        for r in reports {
            match &r.outcome {
                FileOutcome::Placed { date: Some(_), .. } => s.placed += 1,
                FileOutcome::Placed { date: None, .. } => {
                    s.placed += 1;
                    s.unknown += 1;
                }
                FileOutcome::Skipped { .. } => s.skipped += 1,
                FileOutcome::Failed { .. } => s.failed += 1,
                FileOutcome::Reported { .. } => s.reported += 1,
                FileOutcome::Validated { matches: true, .. } => s.matched += 1,
                FileOutcome::Validated { matches: false, .. } => s.mismatched += 1,
                FileOutcome::Unresolved(_) => s.unresolved += 1,
            }
        }
        s
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} files", self.processed)?;
        let parts = [
            (self.placed, "placed"),
            (self.unknown, "without date"),
            (self.skipped, "skipped"),
            (self.failed, "failed"),
            (self.reported, "dated"),
            (self.unresolved, "unresolved"),
            (self.matched, "in place"),
            (self.mismatched, "misplaced"),
        ];
        for (count, label) in parts {
            if count > 0 {
                write!(f, ", {} {}", count, label)?;
            }
        }
        Ok(())
    }
}

fn unresolved_reason(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Undecodable(reason) => reason.clone(),
        _ => "no date in filename or metadata".to_string(),
    }
}

/// Walks an input tree and applies one terminal action per file. Every file
/// gets exactly one info or error line; a failing file never stops the walk.
pub struct Organizer<'a> {
    resolver: Resolver<'a>,
    format: DateFormat,
    logger: &'a dyn Logger,
}

impl<'a> Organizer<'a> {
    pub fn new(resolver: Resolver<'a>, format: DateFormat, logger: &'a dyn Logger) -> Self {
        Self {
            resolver,
            format,
            logger,
        }
    }

    /// Copy or move every file into `output/<rendered date>/<name>`, or
    /// `output/unknown/<name>` when no date resolves.
    pub fn organize(
        &self,
        input: &Path,
        output: &Path,
        transfer: Transfer,
        policy: ConflictPolicy,
    ) -> anyhow::Result<Vec<FileReport>> {
        fs::create_dir_all(output)
            .with_context(|| format!("creating output directory {}", output.display()))?;
        let exclude = nested_output(input, output);
        let files = scan::collect_files(input, exclude.as_deref(), self.logger);
        let verb = match transfer {
            Transfer::Copy => "copied",
            Transfer::Move => "moved",
        };

        let mut reports = Vec::with_capacity(files.len());
        for source in files {
            let resolution = self.resolver.resolve(&source);
            let date = resolution.found().copied();
            let dest_dir = output.join(self.format.subpath(date.as_ref().map(|d| &d.date)));

            let placed = match source.file_name() {
                Some(name) => writer::place_file(&source, &dest_dir, name, transfer, policy),
                None => Err(anyhow::anyhow!("no file name")),
            };
            let outcome = match placed {
                Ok(WriteOutcome::Written(destination)) => {
                    match date {
                        Some(_) => self.logger.info(&format!(
                            "✅ {} {} --> {}",
                            source.display(),
                            verb,
                            destination.display()
                        )),
                        None => self.logger.info(&format!(
                            "🚧 {} {} --> {} (creation date unknown: {})",
                            source.display(),
                            verb,
                            destination.display(),
                            unresolved_reason(&resolution)
                        )),
                    }
                    FileOutcome::Placed { destination, date }
                }
                Ok(WriteOutcome::Skipped(destination)) => {
                    self.logger.info(&format!(
                        "⏭️ {} skipped, {} already exists",
                        source.display(),
                        destination.display()
                    ));
                    FileOutcome::Skipped { destination }
                }
                Err(e) => {
                    self.logger.error(&format!("❌ {}: {:#}", source.display(), e));
                    FileOutcome::Failed {
                        reason: format!("{:#}", e),
                    }
                }
            };
            reports.push(FileReport { source, outcome });
        }
        Ok(reports)
    }

    /// Report the subpath each file would be organized into. Read-only.
    pub fn check(&self, input: &Path) -> Vec<FileReport> {
        scan::collect_files(input, None, self.logger)
            .into_iter()
            .map(|source| {
                let outcome = match self.resolver.resolve(&source) {
                    Resolution::Found(date) => {
                        let subpath = self.format.render(&date.date);
                        self.logger.info(&format!(
                            "✅ {} --> {} (from {})",
                            source.display(),
                            subpath.display(),
                            date.source
                        ));
                        FileOutcome::Reported { subpath, date }
                    }
                    other => {
                        self.logger.error(&format!(
                            "❌ Could not retrieve creation date for file {}: {}",
                            source.display(),
                            unresolved_reason(&other)
                        ));
                        FileOutcome::Unresolved(other)
                    }
                };
                FileReport { source, outcome }
            })
            .collect()
    }

    /// Compare each file's location under `input` with the path its date
    /// renders to. Read-only.
    pub fn validate(&self, input: &Path) -> Vec<FileReport> {
        scan::collect_files(input, None, self.logger)
            .into_iter()
            .map(|source| {
                let outcome = match self.resolver.resolve(&source) {
                    Resolution::Found(date) => {
                        let expected = self
                            .format
                            .expected_path(&date.date, source.file_name().unwrap_or_default());
                        let relative = source.strip_prefix(input).unwrap_or(&source);
                        let matches = matches_layout(relative, &expected);
                        if matches {
                            self.logger.info(&format!("✅ {}", source.display()));
                        } else {
                            self.logger.info(&format!(
                                "❌ {}: should be {}",
                                source.display(),
                                expected.display()
                            ));
                        }
                        FileOutcome::Validated { expected, matches }
                    }
                    other => {
                        self.logger.error(&format!(
                            "🚧 Could not retrieve creation date for file {}: {}",
                            source.display(),
                            unresolved_reason(&other)
                        ));
                        FileOutcome::Unresolved(other)
                    }
                };
                FileReport { source, outcome }
            })
            .collect()
    }
}

/// When `output` lives inside `input`, the same directory expressed under
/// `input` so the walk can prune it.
fn nested_output(input: &Path, output: &Path) -> Option<PathBuf> {
    let input_abs = fs::canonicalize(input).ok()?;
    let output_abs = fs::canonicalize(output).ok()?;
    let rel = output_abs.strip_prefix(&input_abs).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(input.join(rel))
}
