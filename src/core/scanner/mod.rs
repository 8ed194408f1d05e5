//! # Scanner Module
//!
//! Walks the tree once, classifies every regular file, resolves a date with
//! the type-appropriate resolver, and builds the move plan.
//!
//! Routing per file:
//! - dated and already at its target: counted, not listed
//! - dated elsewhere: becomes a move entry in its month bucket
//! - image with no date at all (defensive case): listed for manual review
//! - video with no container date: counted as skipped, nothing else

mod types;

pub use types::{MonthBucket, PlannedMove, ScanReport};

use crate::core::classify::{MediaClassifier, MediaKind};
use crate::core::engine::CancellationToken;
use crate::core::planner::PathPlanner;
use crate::core::resolve::{DateResolver, DateSource};
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use chrono::Datelike;
use std::collections::BTreeMap;
use walkdir::WalkDir;

/// Emit a progress event every this many directory entries
const PROGRESS_EVERY: usize = 100;

/// Walks a directory tree and produces a [`ScanReport`]
pub struct DirectoryScanner {
    planner: PathPlanner,
    image_resolver: DateResolver,
    video_resolver: DateResolver,
    events: EventSender,
    cancel: CancellationToken,
}

impl DirectoryScanner {
    pub fn new(
        planner: PathPlanner,
        image_resolver: DateResolver,
        video_resolver: DateResolver,
        events: EventSender,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            planner,
            image_resolver,
            video_resolver,
            events,
            cancel,
        }
    }

    /// Scan the root recursively. Infallible by design: the caller validates
    /// the root up front, and everything that goes wrong for a single file
    /// is absorbed into the report.
    pub fn scan(&self) -> ScanReport {
        let root = self.planner.root().to_path_buf();
        self.events.send(Event::Scan(ScanEvent::Started {
            root: root.clone(),
        }));

        let mut report = ScanReport::default();
        let mut buckets: BTreeMap<(i32, u32), Vec<PlannedMove>> = BTreeMap::new();

        for entry in WalkDir::new(&root).min_depth(1) {
            if self.cancel.is_cancelled() {
                report.interrupted = true;
                break;
            }

            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            report.files_visited += 1;
            if report.files_visited % PROGRESS_EVERY == 0 {
                self.events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                    files_visited: report.files_visited,
                    images_found: report.images_found,
                    videos_found: report.videos_found,
                    current_path: entry.path().to_path_buf(),
                })));
            }

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(kind) = MediaClassifier::classify(path) else {
                continue;
            };

            let resolver = match kind {
                MediaKind::Image => {
                    report.images_found += 1;
                    &self.image_resolver
                }
                MediaKind::Video => {
                    report.videos_found += 1;
                    &self.video_resolver
                }
            };

            let Some(resolved) = resolver.resolve(path) else {
                // Only videos can be undated; they are deliberately skipped
                // rather than moved on unreliable filesystem evidence.
                report.videos_skipped_no_date += 1;
                continue;
            };

            match resolved.date.source {
                DateSource::Clock => {
                    report.manual_review.push(path.to_path_buf());
                    continue;
                }
                DateSource::Metadata => report.metadata_dates += 1,
                DateSource::Filesystem => report.filesystem_dates += 1,
            }

            if self.planner.is_already_organized(path, &resolved.date) {
                report.already_organized += 1;
                continue;
            }

            let Some(file_name) = path.file_name() else {
                continue;
            };
            let target = self.planner.target_for(&resolved.date, file_name);
            let key = (
                resolved.date.timestamp.year(),
                resolved.date.timestamp.month(),
            );
            buckets.entry(key).or_default().push(PlannedMove {
                source: path.to_path_buf(),
                target,
                date: resolved.date,
                media: kind,
                duration_secs: resolved.duration_secs,
                size_bytes: resolved.size_bytes,
            });
        }

        report.buckets = buckets
            .into_iter()
            .map(|((year, month), moves)| MonthBucket { year, month, moves })
            .collect();

        self.events.send(Event::Scan(ScanEvent::Completed {
            files_visited: report.files_visited,
            images_found: report.images_found,
            videos_found: report.videos_found,
        }));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probe::{MediaMetadata, MetadataProber, ProbeOutcome, TagValue};
    use crate::core::resolve::{ImageDateResolver, VideoDateResolver};
    use crate::events::null_sender;
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

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

    fn exif_meta(date: &str) -> ProbeOutcome {
        let mut meta = MediaMetadata::default();
        meta.tags.insert(
            "DateTimeOriginal".to_string(),
            TagValue::Simple(date.to_string()),
        );
        ProbeOutcome::Found(meta)
    }

    fn video_meta(date: &str) -> ProbeOutcome {
        let mut meta = MediaMetadata::default();
        meta.tags.insert(
            "creation_time".to_string(),
            TagValue::Simple(date.to_string()),
        );
        ProbeOutcome::Found(meta)
    }

    fn scanner_for(
        root: &Path,
        image_outcomes: HashMap<PathBuf, ProbeOutcome>,
        video_outcomes: HashMap<PathBuf, ProbeOutcome>,
    ) -> DirectoryScanner {
        let image_prober = Arc::new(FakeProber {
            outcomes: image_outcomes,
        });
        let video_prober = Arc::new(FakeProber {
            outcomes: video_outcomes,
        });
        DirectoryScanner::new(
            PathPlanner::new(root),
            DateResolver::Image(ImageDateResolver::new(image_prober)),
            DateResolver::Video(VideoDateResolver::new(video_prober)),
            null_sender(),
            CancellationToken::new(),
        )
    }

    #[test]
    fn dated_image_becomes_a_planned_move() {
        let temp = TempDir::new().unwrap();
        let photo = temp.path().join("IMG_1.jpg");
        fs::write(&photo, b"x").unwrap();

        let mut outcomes = HashMap::new();
        outcomes.insert(photo.clone(), exif_meta("2023:03:05 10:00:00"));

        let report = scanner_for(temp.path(), outcomes, HashMap::new()).scan();
        assert_eq!(report.images_found, 1);
        assert_eq!(report.metadata_dates, 1);
        assert_eq!(report.planned_moves(), 1);

        let mv = report.iter_moves().next().unwrap();
        assert_eq!(mv.target, temp.path().join("2023/03-March/IMG_1.jpg"));
    }

    #[test]
    fn file_at_its_target_is_counted_not_listed() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("2023/03-March");
        fs::create_dir_all(&dir).unwrap();
        let photo = dir.join("IMG_1.jpg");
        fs::write(&photo, b"x").unwrap();

        let mut outcomes = HashMap::new();
        outcomes.insert(photo, exif_meta("2023:03:05 10:00:00"));

        let report = scanner_for(temp.path(), outcomes, HashMap::new()).scan();
        assert_eq!(report.already_organized, 1);
        assert_eq!(report.planned_moves(), 0);
    }

    #[test]
    fn undated_video_is_skipped_without_review_listing() {
        let temp = TempDir::new().unwrap();
        let clip = temp.path().join("clip.mp4");
        fs::write(&clip, b"x").unwrap();

        let report = scanner_for(temp.path(), HashMap::new(), HashMap::new()).scan();
        assert_eq!(report.videos_found, 1);
        assert_eq!(report.videos_skipped_no_date, 1);
        assert_eq!(report.planned_moves(), 0);
        assert!(report.manual_review.is_empty());
    }

    #[test]
    fn dated_video_is_planned() {
        let temp = TempDir::new().unwrap();
        let clip = temp.path().join("clip.mp4");
        fs::write(&clip, b"x").unwrap();

        let mut outcomes = HashMap::new();
        outcomes.insert(clip.clone(), video_meta("2022-07-04T12:00:00.000000Z"));

        let report = scanner_for(temp.path(), HashMap::new(), outcomes).scan();
        assert_eq!(report.videos_found, 1);
        assert_eq!(report.metadata_dates, 1);
        let mv = report.iter_moves().next().unwrap();
        assert_eq!(mv.target, temp.path().join("2022/07-July/clip.mp4"));
        assert_eq!(mv.media, MediaKind::Video);
    }

    #[test]
    fn non_media_files_are_not_counted_as_media() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), b"x").unwrap();

        let report = scanner_for(temp.path(), HashMap::new(), HashMap::new()).scan();
        assert_eq!(report.images_found, 0);
        assert_eq!(report.videos_found, 0);
        assert_eq!(report.files_visited, 1);
    }

    #[test]
    fn buckets_come_out_in_year_month_order() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.jpg");
        let b = temp.path().join("b.jpg");
        let c = temp.path().join("c.jpg");
        for p in [&a, &b, &c] {
            fs::write(p, b"x").unwrap();
        }

        let mut outcomes = HashMap::new();
        outcomes.insert(a, exif_meta("2024:01:01 00:00:00"));
        outcomes.insert(b, exif_meta("2022:12:31 00:00:00"));
        outcomes.insert(c, exif_meta("2022:05:01 00:00:00"));

        let report = scanner_for(temp.path(), outcomes, HashMap::new()).scan();
        let keys: Vec<(i32, u32)> = report.buckets.iter().map(|b| (b.year, b.month)).collect();
        assert_eq!(keys, vec![(2022, 5), (2022, 12), (2024, 1)]);
    }

    #[test]
    fn cancellation_marks_the_report_interrupted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.jpg"), b"x").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let image_prober = Arc::new(FakeProber {
            outcomes: HashMap::new(),
        });
        let video_prober = Arc::new(FakeProber {
            outcomes: HashMap::new(),
        });
        let scanner = DirectoryScanner::new(
            PathPlanner::new(temp.path()),
            DateResolver::Image(ImageDateResolver::new(image_prober)),
            DateResolver::Video(VideoDateResolver::new(video_prober)),
            null_sender(),
            cancel,
        );

        let report = scanner.scan();
        assert!(report.interrupted);
        assert_eq!(report.files_visited, 0);
    }
}
