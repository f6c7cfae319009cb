pub mod exif;
pub mod filename;
pub mod video;

use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::logger::Logger;
use crate::media::{MediaFile, MediaKind};

/// Which stage of the cascade produced a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Filename,
    HeifExif,
    Exif,
    ContainerTag,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateSource::Filename => "filename",
            DateSource::HeifExif => "HEIF Exif item",
            DateSource::Exif => "Exif",
            DateSource::ContainerTag => "container tag",
        };
        f.write_str(name)
    }
}

/// Result of date extraction: the date and the stage it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResult {
    pub date: NaiveDateTime,
    pub source: DateSource,
}

/// Outcome of running the whole cascade on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(DateResult),
    /// Every stage reported the date as absent.
    NotFound,
    /// No stage produced a date and at least one failed to decode its
    /// metadata; holds the last decode error.
    Undecodable(String),
}

impl Resolution {
    pub fn found(&self) -> Option<&DateResult> {
        match self {
            Resolution::Found(r) => Some(r),
            _ => None,
        }
    }
}

/// One step of the cascade. `Ok(None)` means the source has no date;
/// `Err` means the source could not be read.
pub trait DateStrategy {
    fn source(&self) -> DateSource;
    fn extract(&self, file: &MediaFile) -> anyhow::Result<Option<NaiveDateTime>>;
}

/// `YYYYMMDD` anywhere in the base name.
pub struct FilenameStrategy;

impl DateStrategy for FilenameStrategy {
    fn source(&self) -> DateSource {
        DateSource::Filename
    }

    fn extract(&self, file: &MediaFile) -> anyhow::Result<Option<NaiveDateTime>> {
        Ok(filename::date_from_filename(&file.file_name()))
    }
}

/// Exif item inside HEIF/HEIC containers; kamadak-exif locates it through
/// the item boxes.
pub struct HeifStrategy;

impl DateStrategy for HeifStrategy {
    fn source(&self) -> DateSource {
        DateSource::HeifExif
    }

    fn extract(&self, file: &MediaFile) -> anyhow::Result<Option<NaiveDateTime>> {
        if file.kind != MediaKind::HeifImage {
            return Ok(None);
        }
        exif::extract_container_date(&file.path)
    }
}

/// Exif block of JPEG, PNG, TIFF, WebP and friends.
pub struct RasterExifStrategy;

impl DateStrategy for RasterExifStrategy {
    fn source(&self) -> DateSource {
        DateSource::Exif
    }

    fn extract(&self, file: &MediaFile) -> anyhow::Result<Option<NaiveDateTime>> {
        if file.kind != MediaKind::RasterImage || !file.may_carry_exif() {
            return Ok(None);
        }
        exif::extract_container_date(&file.path)
    }
}

/// General-track tagged date reported by MediaInfo.
pub struct ContainerTagStrategy {
    pub mediainfo: PathBuf,
}

impl DateStrategy for ContainerTagStrategy {
    fn source(&self) -> DateSource {
        DateSource::ContainerTag
    }

    fn extract(&self, file: &MediaFile) -> anyhow::Result<Option<NaiveDateTime>> {
        if file.kind != MediaKind::Video {
            return Ok(None);
        }
        video::extract_container_date(&self.mediainfo, &file.path)
    }
}

/// The standard cascade: filename first, then the metadata reader matching
/// the file's extension.
pub fn default_strategies(mediainfo: &Path) -> Vec<Box<dyn DateStrategy>> {
    vec![
        Box::new(FilenameStrategy),
        Box::new(HeifStrategy),
        Box::new(RasterExifStrategy),
        Box::new(ContainerTagStrategy {
            mediainfo: mediainfo.to_path_buf(),
        }),
    ]
}

/// Runs strategies in order and trusts the first one that yields a date.
pub struct Resolver<'a> {
    strategies: Vec<Box<dyn DateStrategy>>,
    logger: &'a dyn Logger,
}

impl<'a> Resolver<'a> {
    pub fn new(strategies: Vec<Box<dyn DateStrategy>>, logger: &'a dyn Logger) -> Self {
        Self { strategies, logger }
    }

    pub fn with_defaults(mediainfo: &Path, logger: &'a dyn Logger) -> Self {
        Self::new(default_strategies(mediainfo), logger)
    }

    pub fn resolve(&self, path: &Path) -> Resolution {
        let file = MediaFile::new(path);
        let mut last_error = None;

        for strategy in &self.strategies {
            match strategy.extract(&file) {
                Ok(Some(date)) => {
                    self.logger.debug(&format!(
                        "{}: date {} taken from {}",
                        path.display(),
                        date,
                        strategy.source()
                    ));
                    return Resolution::Found(DateResult {
                        date,
                        source: strategy.source(),
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    self.logger.debug(&format!(
                        "{}: {} unreadable: {:#}",
                        path.display(),
                        strategy.source(),
                        e
                    ));
                    last_error = Some(format!("{:#}", e));
                }
            }
        }

        match last_error {
            Some(reason) => Resolution::Undecodable(reason),
            None => Resolution::NotFound,
        }
    }
}
