use anyhow::{ensure, Context};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// MediaInfo prints tagged dates with a literal `UTC ` prefix.
pub const TAGGED_DATE_FORMAT: &str = "UTC %Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct Report {
    media: Option<ReportMedia>,
}

#[derive(Debug, Deserialize)]
struct ReportMedia {
    #[serde(default)]
    track: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(rename = "@type")]
    kind: String,
    #[serde(rename = "Tagged_Date")]
    tagged_date: Option<String>,
}

/// Run MediaInfo on `path` and read the General track's tagged date.
pub fn extract_container_date(mediainfo: &Path, path: &Path) -> anyhow::Result<Option<NaiveDateTime>> {
    let output = Command::new(mediainfo)
        .arg("--Output=JSON")
        .arg(path)
        .output()
        .with_context(|| format!("running {}", mediainfo.display()))?;
    ensure!(
        output.status.success(),
        "{} exited with {}",
        mediainfo.display(),
        output.status
    );
    general_tagged_date(&output.stdout)
}

/// Parse a MediaInfo JSON report. Only the track typed `General` counts;
/// per-stream tracks may carry their own dates and are ignored.
pub fn general_tagged_date(report_json: &[u8]) -> anyhow::Result<Option<NaiveDateTime>> {
    let report: Report =
        serde_json::from_slice(report_json).context("parsing MediaInfo report")?;
    let Some(media) = report.media else {
        return Ok(None);
    };
    let tagged = media
        .track
        .iter()
        .filter(|t| t.kind == "General")
        .find_map(|t| t.tagged_date.as_deref().filter(|d| !d.trim().is_empty()));
    let Some(tagged) = tagged else {
        return Ok(None);
    };
    let dt = NaiveDateTime::parse_from_str(tagged.trim(), TAGGED_DATE_FORMAT)
        .with_context(|| format!("unexpected Tagged_Date {:?}", tagged))?;
    Ok(Some(dt))
}
