//! Types for the scan report and move plan.

use crate::core::classify::MediaKind;
use crate::core::resolve::FileDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single planned relocation. Created by the scanner only for files that
/// are not at their canonical target (already-organized and undated files
/// fold into counters and the review list instead); consumed exactly once
/// by the engine in move/dry-run modes; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub target: PathBuf,
    pub date: FileDate,
    pub media: MediaKind,
    /// Container duration in seconds, for display only
    pub duration_secs: Option<f64>,
    /// Container-reported size in bytes, for display only
    pub size_bytes: Option<u64>,
}

/// Planned moves for one `(year, month)` folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub moves: Vec<PlannedMove>,
}

/// Aggregate result of one directory scan.
///
/// Built incrementally by the scanner, immutable once handed back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Directory entries visited (files and directories)
    pub files_visited: usize,
    /// Files classified as images
    pub images_found: usize,
    /// Files classified as videos
    pub videos_found: usize,
    /// Files dated from embedded metadata
    pub metadata_dates: usize,
    /// Files dated from filesystem timestamps (images only)
    pub filesystem_dates: usize,
    /// Files already at their canonical target
    pub already_organized: usize,
    /// Videos with no parsable container date; excluded from the plan
    pub videos_skipped_no_date: usize,
    /// Images the scanner could not date at all; left untouched
    pub manual_review: Vec<PathBuf>,
    /// Needs-move entries grouped by (year, month), ascending
    pub buckets: Vec<MonthBucket>,
    /// True when the scan was cancelled before completing
    pub interrupted: bool,
}

impl ScanReport {
    /// Total number of planned moves across all buckets
    pub fn planned_moves(&self) -> usize {
        self.buckets.iter().map(|b| b.moves.len()).sum()
    }

    /// Iterate planned moves in (year, month) order
    pub fn iter_moves(&self) -> impl Iterator<Item = &PlannedMove> {
        self.buckets.iter().flat_map(|b| b.moves.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolve::DateSource;
    use chrono::NaiveDate;

    #[test]
    fn planned_moves_counts_across_buckets() {
        let mv = PlannedMove {
            source: PathBuf::from("/p/a.jpg"),
            target: PathBuf::from("/p/2023/03-March/a.jpg"),
            date: FileDate {
                timestamp: NaiveDate::from_ymd_opt(2023, 3, 5)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                source: DateSource::Metadata,
            },
            media: MediaKind::Image,
            duration_secs: None,
            size_bytes: None,
        };

        let report = ScanReport {
            buckets: vec![
                MonthBucket {
                    year: 2023,
                    month: 3,
                    moves: vec![mv.clone(), mv.clone()],
                },
                MonthBucket {
                    year: 2024,
                    month: 1,
                    moves: vec![mv],
                },
            ],
            ..Default::default()
        };

        assert_eq!(report.planned_moves(), 3);
        assert_eq!(report.iter_moves().count(), 3);
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = ScanReport {
            files_visited: 10,
            images_found: 4,
            ..Default::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.images_found, 4);
    }
}
