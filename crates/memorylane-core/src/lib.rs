pub mod date;
pub mod layout;
pub mod logger;
pub mod media;
pub mod organizer;
pub mod scan;
pub mod writer;

#[cfg(test)]
pub(crate) mod testutil;

use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

pub use date::{DateResult, DateSource, Resolution, Resolver};
pub use layout::{DateFormat, DEFAULT_DATE_FORMAT, UNKNOWN_DIR};
pub use logger::{LogFacade, Logger, NoopLogger};
pub use organizer::{FileOutcome, FileReport, Organizer, RunSummary};
pub use writer::{ConflictPolicy, Transfer};

/// What to do with each file once its date is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Copy or move into the dated layout.
    #[default]
    Organize,
    /// Report resolved subpaths only.
    Check,
    /// Compare the existing layout against resolved dates.
    Validate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    pub input: PathBuf,
    /// Required for `Mode::Organize`, ignored otherwise
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub transfer: Transfer,
    #[serde(default)]
    pub on_conflict: ConflictPolicy,
    /// MediaInfo executable used for video containers
    #[serde(default = "default_mediainfo")]
    pub mediainfo: PathBuf,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_mediainfo() -> PathBuf {
    PathBuf::from("mediainfo")
}

impl Options {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            date_format: default_date_format(),
            mode: Mode::default(),
            transfer: Transfer::default(),
            on_conflict: ConflictPolicy::default(),
            mediainfo: default_mediainfo(),
        }
    }

    /// Check everything that must hold before any file is touched.
    pub fn validate(&self) -> anyhow::Result<DateFormat> {
        if !self.input.is_dir() {
            bail!("Input directory '{}' does not exist.", self.input.display());
        }
        if self.mode == Mode::Organize && self.output.is_none() {
            bail!("Missing parameter: output directory. Use --help to see how to use the tool.");
        }
        DateFormat::parse(&self.date_format)
    }
}

/// Run one mode over the input tree. Configuration problems are returned as
/// errors before any processing; per-file problems only show up in the log
/// and in the summary.
pub fn run(options: &Options, logger: &dyn Logger) -> anyhow::Result<RunSummary> {
    let format = options.validate()?;
    let resolver = Resolver::with_defaults(&options.mediainfo, logger);
    let organizer = Organizer::new(resolver, format, logger);

    let reports = match options.mode {
        Mode::Organize => {
            let output = options
                .output
                .as_deref()
                .context("output directory required")?;
            organizer.organize(&options.input, output, options.transfer, options.on_conflict)?
        }
        Mode::Check => organizer.check(&options.input),
        Mode::Validate => organizer.validate(&options.input),
    };

    Ok(RunSummary::from_reports(&reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempdir().unwrap();
        let mut options = Options::new(dir.path().join("nope"));
        options.output = Some(dir.path().join("out"));
        let err = run(&options, &NoopLogger).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_organize_requires_output() {
        let dir = tempdir().unwrap();
        let options = Options::new(dir.path());
        assert!(run(&options, &NoopLogger).is_err());

        let mut check = Options::new(dir.path());
        check.mode = Mode::Check;
        assert!(run(&check, &NoopLogger).is_ok());
    }

    #[test]
    fn test_invalid_date_format_is_fatal() {
        let dir = tempdir().unwrap();
        let mut options = Options::new(dir.path());
        options.mode = Mode::Check;
        options.date_format = "%Y/%Q".to_string();
        assert!(run(&options, &NoopLogger).is_err());
    }

    #[test]
    fn test_options_from_json_fills_defaults() {
        let options: Options = serde_json::from_str(
            r#"{"input": "photos", "output": "sorted", "transfer": "move", "on_conflict": "rename"}"#,
        )
        .unwrap();
        assert_eq!(options.mode, Mode::Organize);
        assert_eq!(options.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(options.transfer, Transfer::Move);
        assert_eq!(options.on_conflict, ConflictPolicy::Rename);
        assert_eq!(options.mediainfo, PathBuf::from("mediainfo"));
    }

    #[test]
    fn test_run_organize_end_to_end() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("IMG_20210412_beach.jpg"), b"x").unwrap();
        fs::write(input.join("mystery.bin"), b"x").unwrap();

        let mut options = Options::new(&input);
        options.output = Some(dir.path().join("out"));
        options.transfer = Transfer::Move;

        let summary = run(&options, &NoopLogger).unwrap();
        assert_eq!(summary.placed, 2);
        assert_eq!(summary.unknown, 1);
        assert!(dir.path().join("out/2021/April/IMG_20210412_beach.jpg").is_file());
        assert!(dir.path().join("out/unknown/mystery.bin").is_file());
    }
}
