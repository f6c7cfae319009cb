use anyhow::{bail, ensure};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

/// Subdirectory for files whose date could not be resolved.
pub const UNKNOWN_DIR: &str = "unknown";

pub const DEFAULT_DATE_FORMAT: &str = "%Y/%B";

/// A strftime pattern whose `/` separators become directory levels,
/// e.g. `%Y/%B` renders 2021-04-12 as `2021/April`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    pub fn parse(pattern: &str) -> anyhow::Result<Self> {
        ensure!(!pattern.trim().is_empty(), "date format is empty");
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            bail!("invalid date format {:?}", pattern);
        }
        // Offset directives such as %z parse fine but cannot render a naive date
        let mut probe = String::new();
        if write!(probe, "{}", NaiveDateTime::default().format(pattern)).is_err() {
            bail!("date format {:?} needs a timezone", pattern);
        }
        if pattern.starts_with('/') || pattern.split('/').any(|part| part == "..") {
            bail!("date format {:?} must stay inside the output directory", pattern);
        }
        Ok(Self {
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Relative subdirectory for `date`. Empty levels are dropped.
    pub fn render(&self, date: &NaiveDateTime) -> PathBuf {
        date.format(&self.pattern)
            .to_string()
            .split('/')
            .filter(|part| !part.is_empty())
            .collect()
    }

    /// Relative subdirectory, or `unknown` when there is no date.
    pub fn subpath(&self, date: Option<&NaiveDateTime>) -> PathBuf {
        match date {
            Some(d) => self.render(d),
            None => PathBuf::from(UNKNOWN_DIR),
        }
    }

    /// Where a file named `file_name` with this date belongs.
    pub fn expected_path(&self, date: &NaiveDateTime, file_name: impl AsRef<Path>) -> PathBuf {
        self.render(date).join(file_name)
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// True when the trailing components of `actual` equal `expected`,
/// component by component, ignoring case.
pub fn matches_layout(actual: &Path, expected: &Path) -> bool {
    let actual = normal_components(actual);
    let expected = normal_components(expected);
    if expected.is_empty() || expected.len() > actual.len() {
        return false;
    }
    let tail = &actual[actual.len() - expected.len()..];
    tail.iter()
        .zip(expected.iter())
        .all(|(a, e)| a.to_lowercase() == e.to_lowercase())
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
