//! # Probe Module
//!
//! Metadata extraction behind a single capability trait.
//!
//! The organizer never talks to EXIF readers or ffprobe directly; it holds a
//! [`MetadataProber`] and gets back a [`ProbeOutcome`]. That keeps the
//! fallback logic ("no metadata" vs "probe blew up") an explicit branch, and
//! lets tests substitute a deterministic fake.

mod image;
mod video;

pub use image::ExifProber;
pub use video::FfprobeProber;

use crate::error::ProbeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A single metadata tag value.
///
/// Simple values compare by equality; composite (nested/structured) values
/// compare by their canonical string rendering. The distinction matters for
/// duplicate detection: a kind mismatch between two files means the
/// dictionaries are not equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagValue {
    Simple(String),
    Composite(String),
}

/// A probed metadata dictionary plus auxiliary display fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Tag name -> value. EXIF tags keep their canonical names
    /// (`DateTimeOriginal`); ffprobe format tags are lowercased.
    pub tags: BTreeMap<String, TagValue>,
    /// Container duration in seconds, when the probe reports one.
    /// Display metadata only; never participates in date logic.
    pub duration_secs: Option<f64>,
    /// Container-reported size in bytes. Display metadata only.
    pub size_bytes: Option<u64>,
}

impl MediaMetadata {
    /// Look up a tag's textual value, whatever its kind.
    pub fn text(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(|v| match v {
            TagValue::Simple(s) | TagValue::Composite(s) => s.as_str(),
        })
    }

    /// Structural equivalence of two metadata dictionaries: identical key
    /// sets, simple values equal, composite values equal by canonical
    /// string. Mismatched kinds for the same key are never equivalent.
    pub fn structurally_equal(&self, other: &MediaMetadata) -> bool {
        if self.tags.len() != other.tags.len() {
            return false;
        }
        self.tags.iter().all(|(key, value)| {
            match (value, other.tags.get(key)) {
                (TagValue::Simple(a), Some(TagValue::Simple(b))) => a == b,
                (TagValue::Composite(a), Some(TagValue::Composite(b))) => a == b,
                _ => false,
            }
        })
    }
}

/// The result of probing a single file.
///
/// `Failed` carries the detail for logging but is handled identically to
/// `Absent` by every caller: the file simply has no usable metadata.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// Metadata was found
    Found(MediaMetadata),
    /// The file has no embedded metadata
    Absent,
    /// The probe itself failed (launch error, timeout, bad output)
    Failed(ProbeError),
}

impl ProbeOutcome {
    /// Collapse to the metadata, logging a failed probe along the way.
    pub fn into_found(self, path: &Path) -> Option<MediaMetadata> {
        match self {
            ProbeOutcome::Found(meta) => Some(meta),
            ProbeOutcome::Absent => None,
            ProbeOutcome::Failed(err) => {
                tracing::debug!(path = %path.display(), error = %err, "metadata probe failed, treating as absent");
                None
            }
        }
    }
}

/// Capability for extracting a metadata dictionary from a file.
///
/// Implementations must never panic or return early errors to the engine;
/// everything that can go wrong is expressed in the outcome.
pub trait MetadataProber: Send + Sync {
    fn probe(&self, path: &Path) -> ProbeOutcome;
}
