use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<y>\d{4})(?P<m>\d{2})(?P<d>\d{2})").unwrap());

/// Take the first run of eight digits in the base name as `YYYYMMDD`.
/// Only the first run is considered; if it is not a real calendar date the
/// filename carries no date.
pub fn date_from_filename(basename: &str) -> Option<NaiveDateTime> {
    let caps = DATE_RE.captures(basename)?;
    let year = caps["y"].parse::<i32>().ok()?;
    let month = caps["m"].parse::<u32>().ok()?;
    let day = caps["d"].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}
