//! # Conflict Module
//!
//! Decides what to do when a planned target already exists.
//!
//! For images the full metadata dictionaries of source and target are
//! probed and compared structurally: an exact match means the files are
//! duplicates and the source can be deleted. Anything less - missing
//! metadata on either side, differing dictionaries, or a video collision -
//! is a conflict: both files stay where they are. A differing target is
//! never overwritten.

use crate::core::classify::MediaKind;
use crate::core::probe::{MetadataProber, ProbeOutcome};
use std::path::Path;
use std::sync::Arc;

/// Verdict for a target-exists collision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictVerdict {
    /// Source and target carry structurally identical metadata; the source
    /// is redundant and may be deleted
    Duplicate,
    /// The collision could not be proven harmless; skip the move
    Conflict { reason: String },
}

/// Assesses collisions between a planned source and an existing target
pub struct ConflictResolver {
    image_prober: Arc<dyn MetadataProber>,
}

impl ConflictResolver {
    pub fn new(image_prober: Arc<dyn MetadataProber>) -> Self {
        Self { image_prober }
    }

    pub fn assess(&self, source: &Path, target: &Path, media: MediaKind) -> ConflictVerdict {
        match media {
            MediaKind::Image => self.assess_image(source, target),
            // No metadata-equivalence dedup for video; collisions always skip
            MediaKind::Video => ConflictVerdict::Conflict {
                reason: "target exists; duplicate detection is not performed for video".to_string(),
            },
        }
    }

    fn assess_image(&self, source: &Path, target: &Path) -> ConflictVerdict {
        let source_meta = self.image_prober.probe(source);
        let target_meta = self.image_prober.probe(target);

        match (source_meta, target_meta) {
            (ProbeOutcome::Found(a), ProbeOutcome::Found(b)) => {
                if a.structurally_equal(&b) {
                    ConflictVerdict::Duplicate
                } else {
                    ConflictVerdict::Conflict {
                        reason: "metadata differs between source and target".to_string(),
                    }
                }
            }
            _ => ConflictVerdict::Conflict {
                reason: "cannot compare metadata for source and target".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probe::{MediaMetadata, TagValue};
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct FakeProber {
        outcomes: HashMap<PathBuf, ProbeOutcome>,
    }

    impl MetadataProber for FakeProber {
        fn probe(&self, path: &Path) -> ProbeOutcome {
            self.outcomes
                .get(path)
                .cloned()
                .unwrap_or(ProbeOutcome::Absent)
        }
    }

    fn meta(model: &str) -> ProbeOutcome {
        let mut m = MediaMetadata::default();
        m.tags
            .insert("Model".to_string(), TagValue::Simple(model.to_string()));
        m.tags.insert(
            "DateTimeOriginal".to_string(),
            TagValue::Simple("2023:03:05 10:00:00".to_string()),
        );
        ProbeOutcome::Found(m)
    }

    fn resolver(outcomes: HashMap<PathBuf, ProbeOutcome>) -> ConflictResolver {
        ConflictResolver::new(Arc::new(FakeProber { outcomes }))
    }

    #[test]
    fn identical_metadata_is_a_duplicate() {
        let src = PathBuf::from("/p/a/IMG_1.jpg");
        let dst = PathBuf::from("/p/2023/03-March/IMG_1.jpg");
        let mut outcomes = HashMap::new();
        outcomes.insert(src.clone(), meta("iPhone 15"));
        outcomes.insert(dst.clone(), meta("iPhone 15"));

        let verdict = resolver(outcomes).assess(&src, &dst, MediaKind::Image);
        assert_eq!(verdict, ConflictVerdict::Duplicate);
    }

    #[test]
    fn differing_metadata_is_a_conflict() {
        let src = PathBuf::from("/p/a/IMG_1.jpg");
        let dst = PathBuf::from("/p/2023/03-March/IMG_1.jpg");
        let mut outcomes = HashMap::new();
        outcomes.insert(src.clone(), meta("iPhone 15"));
        outcomes.insert(dst.clone(), meta("iPhone 14"));

        let verdict = resolver(outcomes).assess(&src, &dst, MediaKind::Image);
        assert!(matches!(verdict, ConflictVerdict::Conflict { .. }));
    }

    #[test]
    fn missing_metadata_on_either_side_is_a_conflict() {
        let src = PathBuf::from("/p/a/IMG_1.jpg");
        let dst = PathBuf::from("/p/2023/03-March/IMG_1.jpg");
        let mut outcomes = HashMap::new();
        outcomes.insert(src.clone(), meta("iPhone 15"));
        // target has no metadata

        let verdict = resolver(outcomes).assess(&src, &dst, MediaKind::Image);
        assert!(matches!(verdict, ConflictVerdict::Conflict { .. }));
    }

    #[test]
    fn video_collisions_are_always_conflicts() {
        let src = PathBuf::from("/p/a/clip.mp4");
        let dst = PathBuf::from("/p/2022/07-July/clip.mp4");

        let verdict = resolver(HashMap::new()).assess(&src, &dst, MediaKind::Video);
        assert!(matches!(verdict, ConflictVerdict::Conflict { .. }));
    }
}
