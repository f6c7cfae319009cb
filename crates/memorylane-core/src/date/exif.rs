use anyhow::Context;
use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Exif datetimes carry no timezone; they are local wall-clock time.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Read `DateTimeOriginal` from the Exif block embedded in an image container
/// (JPEG, TIFF, PNG, WebP, HEIF). A container with no Exif block is `Ok(None)`;
/// anything the reader cannot make sense of is an error.
pub fn extract_container_date(path: &Path) -> anyhow::Result<Option<NaiveDateTime>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => original_datetime(&exif),
        Err(exif::Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e).context("reading Exif block"),
    }
}

fn original_datetime(exif: &Exif) -> anyhow::Result<Option<NaiveDateTime>> {
    let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
        return Ok(None);
    };
    let Value::Ascii(ref values) = field.value else {
        anyhow::bail!("DateTimeOriginal is not an ASCII value");
    };
    let Some(raw) = values.first() else {
        return Ok(None);
    };
    let text = std::str::from_utf8(raw)
        .context("DateTimeOriginal is not valid UTF-8")?
        .trim_end_matches('\0')
        .trim();
    if text.is_empty() {
        return Ok(None);
    }
    let dt = NaiveDateTime::parse_from_str(text, EXIF_DATETIME_FORMAT)
        .with_context(|| format!("unexpected DateTimeOriginal {:?}", text))?;
    Ok(Some(dt))
}
