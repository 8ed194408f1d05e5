//! # Classify Module
//!
//! Decides whether a filesystem entry is an image, a video, or neither.
//!
//! Classification is by lowercase extension against fixed sets, with a
//! MIME-type guess from the path as fallback. File contents are never read.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// The two media classes the organizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "svg", "ico", "raw", "cr2", "nef",
    "arw", "heic", "heif", "avif", "jxl",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "mkv", "wmv", "flv", "webm", "m4v", "3gp", "ogv", "ts", "mts", "m2ts",
    "vob", "asf", "rm", "rmvb", "divx", "xvid", "mpg", "mpeg", "m2v", "f4v", "f4p", "f4a", "f4b",
];

/// Classifies files into media kinds
pub struct MediaClassifier;

impl MediaClassifier {
    /// Classify a path as image, video, or neither.
    pub fn classify(path: &Path) -> Option<MediaKind> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let ext = ext.to_lowercase();
            if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                return Some(MediaKind::Image);
            }
            if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
                return Some(MediaKind::Video);
            }
        }

        // Unknown extension: fall back to a MIME guess from the path
        let mime = mime_guess::from_path(path).first()?;
        if mime.type_() == mime_guess::mime::IMAGE {
            Some(MediaKind::Image)
        } else if mime.type_() == mime_guess::mime::VIDEO {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_image_extensions() {
        assert_eq!(
            MediaClassifier::classify(Path::new("photo.jpg")),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaClassifier::classify(Path::new("photo.JPG")),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaClassifier::classify(Path::new("scan.HEIC")),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaClassifier::classify(Path::new("raw.cr2")),
            Some(MediaKind::Image)
        );
    }

    #[test]
    fn classifies_common_video_extensions() {
        assert_eq!(
            MediaClassifier::classify(Path::new("clip.mp4")),
            Some(MediaKind::Video)
        );
        assert_eq!(
            MediaClassifier::classify(Path::new("clip.MOV")),
            Some(MediaKind::Video)
        );
        assert_eq!(
            MediaClassifier::classify(Path::new("old.mpeg")),
            Some(MediaKind::Video)
        );
    }

    #[test]
    fn mime_fallback_catches_unlisted_image_extensions() {
        // "jpe" isn't in the extension set but maps to image/jpeg
        assert_eq!(
            MediaClassifier::classify(Path::new("photo.jpe")),
            Some(MediaKind::Image)
        );
    }

    #[test]
    fn non_media_files_are_ignored() {
        assert_eq!(MediaClassifier::classify(Path::new("doc.pdf")), None);
        assert_eq!(MediaClassifier::classify(Path::new("song.mp3")), None);
        assert_eq!(MediaClassifier::classify(Path::new("notes.txt")), None);
        assert_eq!(MediaClassifier::classify(Path::new("no_extension")), None);
    }
}
