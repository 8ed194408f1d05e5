//! # Resolve Module
//!
//! Turns a file into a dated verdict, with a per-media-type fallback policy.
//!
//! Images always resolve to *some* date: embedded capture metadata first,
//! then the earliest filesystem timestamp, then (defensively) the current
//! clock. Videos resolve only from container metadata; filesystem dates on
//! video files are copy/transfer artifacts and are deliberately never used.

use crate::core::probe::{MediaMetadata, MetadataProber};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

/// Where a resolved date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// Embedded capture metadata (EXIF or container tags)
    Metadata,
    /// Earliest available filesystem timestamp
    Filesystem,
    /// Defensive fallback: the filesystem exposed no timestamps at all.
    /// Files dated this way are flagged for manual review, never moved.
    Clock,
}

impl std::fmt::Display for DateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateSource::Metadata => write!(f, "metadata"),
            DateSource::Filesystem => write!(f, "filesystem"),
            DateSource::Clock => write!(f, "clock"),
        }
    }
}

/// A resolved point-in-time for a file, tagged with its provenance.
/// Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDate {
    pub timestamp: NaiveDateTime,
    pub source: DateSource,
}

/// A resolver verdict: the date plus any auxiliary display metadata the
/// probe happened to surface (video duration/size). The extras never
/// participate in date logic.
#[derive(Debug, Clone)]
pub struct ResolvedDate {
    pub date: FileDate,
    pub duration_secs: Option<f64>,
    pub size_bytes: Option<u64>,
}

impl ResolvedDate {
    fn plain(date: FileDate) -> Self {
        Self {
            date,
            duration_secs: None,
            size_bytes: None,
        }
    }
}

/// EXIF capture-time tags, in priority order
const EXIF_DATE_TAGS: [&str; 3] = ["DateTimeOriginal", "DateTime", "DateTimeDigitized"];

/// Canonical EXIF timestamp form first, then the dash-separated rendering
/// some extraction layers produce for the same tags
const EXIF_DATETIME_FORMATS: [&str; 2] = ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Container-format tag names that may carry a creation time, in priority order
const VIDEO_DATE_TAGS: [&str; 7] = [
    "creation_time",
    "date",
    "date_created",
    "creation_date",
    "creation_time_utc",
    "date_time",
    "date_time_original",
];

/// Per-media-type date resolution capability.
///
/// The two variants share one `resolve` signature so the scanner's
/// orchestration is identical across media types; only the fallback policy
/// differs.
pub enum DateResolver {
    Image(ImageDateResolver),
    Video(VideoDateResolver),
}

impl DateResolver {
    pub fn resolve(&self, path: &Path) -> Option<ResolvedDate> {
        match self {
            DateResolver::Image(r) => Some(r.resolve(path)),
            DateResolver::Video(r) => r.resolve(path),
        }
    }
}

/// Resolves image dates: metadata, then earliest filesystem timestamp,
/// then current time (flagged).
pub struct ImageDateResolver {
    prober: Arc<dyn MetadataProber>,
}

impl ImageDateResolver {
    pub fn new(prober: Arc<dyn MetadataProber>) -> Self {
        Self { prober }
    }

    pub fn resolve(&self, path: &Path) -> ResolvedDate {
        if let Some(meta) = self.prober.probe(path).into_found(path) {
            if let Some(timestamp) = exif_capture_date(&meta) {
                return ResolvedDate::plain(FileDate {
                    timestamp,
                    source: DateSource::Metadata,
                });
            }
        }

        if let Some(timestamp) = earliest_fs_timestamp(path) {
            return ResolvedDate::plain(FileDate {
                timestamp,
                source: DateSource::Filesystem,
            });
        }

        tracing::warn!(path = %path.display(), "no timestamp available, falling back to current time");
        ResolvedDate::plain(FileDate {
            timestamp: Local::now().naive_local(),
            source: DateSource::Clock,
        })
    }
}

/// Resolves video dates from container metadata only.
pub struct VideoDateResolver {
    prober: Arc<dyn MetadataProber>,
}

impl VideoDateResolver {
    pub fn new(prober: Arc<dyn MetadataProber>) -> Self {
        Self { prober }
    }

    pub fn resolve(&self, path: &Path) -> Option<ResolvedDate> {
        let meta = self.prober.probe(path).into_found(path)?;
        let timestamp = video_creation_date(&meta)?;
        Some(ResolvedDate {
            date: FileDate {
                timestamp,
                source: DateSource::Metadata,
            },
            duration_secs: meta.duration_secs,
            size_bytes: meta.size_bytes,
        })
    }
}

/// First EXIF capture tag that parses wins.
fn exif_capture_date(meta: &MediaMetadata) -> Option<NaiveDateTime> {
    EXIF_DATE_TAGS.iter().find_map(|tag| {
        let raw = meta.text(tag)?;
        // Tolerate the quoting and padding some writers leave around the value
        let raw = raw.trim().trim_matches('"');
        EXIF_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    })
}

/// First container tag whose value parses against one of the known
/// timestamp formats wins. A tag that is present but unparseable does not
/// stop the search.
fn video_creation_date(meta: &MediaMetadata) -> Option<NaiveDateTime> {
    VIDEO_DATE_TAGS
        .iter()
        .find_map(|tag| meta.text(tag).and_then(parse_video_datetime))
}

fn parse_video_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%S",
        "%Y:%m:%d %H:%M:%S",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    NaiveDateTime::parse_from_str(s, "%Y/%m/%d %H:%M:%S").ok()
}

/// Earliest of every timestamp the platform exposes: birth time where
/// supported, status-change time on unix, modification and access times.
/// Biased toward "when this file first existed" so copy/backup operations
/// that bump mtime don't skew organization.
fn earliest_fs_timestamp(path: &Path) -> Option<NaiveDateTime> {
    let meta = std::fs::metadata(path).ok()?;
    let mut stamps: Vec<NaiveDateTime> = Vec::with_capacity(4);

    if let Ok(t) = meta.created() {
        stamps.push(to_local_naive(t));
    }
    if let Ok(t) = meta.modified() {
        stamps.push(to_local_naive(t));
    }
    if let Ok(t) = meta.accessed() {
        stamps.push(to_local_naive(t));
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let Some(changed) = Local
            .timestamp_opt(meta.ctime(), meta.ctime_nsec() as u32)
            .single()
        {
            stamps.push(changed.naive_local());
        }
    }

    stamps.into_iter().min()
}

fn to_local_naive(t: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(t).naive_local()
}
