use std::path::PathBuf;

/// Extensions routed to the HEIF container reader.
pub const HEIF_EXTS: &[&str] = &["heic", "heif"];
/// Extensions routed to the plain Exif reader.
pub const RASTER_EXTS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];
/// Raster formats with no Exif block the container reader understands.
pub const EXIFLESS_EXTS: &[&str] = &["gif", "bmp"];
/// Extensions routed to the MediaInfo general-track reader.
pub const VIDEO_EXTS: &[&str] = &["mp4", "mkv", "avi", "mov", "flv", "wmv", "webm", "m4v"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    HeifImage,
    RasterImage,
    Video,
    Other,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Self {
        if HEIF_EXTS.contains(&ext) {
            MediaKind::HeifImage
        } else if RASTER_EXTS.contains(&ext) {
            MediaKind::RasterImage
        } else if VIDEO_EXTS.contains(&ext) {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Path as handed to the resolver
    pub path: PathBuf,
    /// Lower-cased extension, empty when there is none
    pub extension: String,
    pub kind: MediaKind,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let kind = MediaKind::from_extension(&extension);
        Self {
            path,
            extension,
            kind,
        }
    }

    /// False for formats whose metadata the Exif reader cannot open, so
    /// they report no date instead of a decode failure.
    pub fn may_carry_exif(&self) -> bool {
        !EXIFLESS_EXTS.contains(&self.extension.as_str())
    }

    /// Base name, lossily converted for pattern matching.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
