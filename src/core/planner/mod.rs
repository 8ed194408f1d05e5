//! # Planner Module
//!
//! Computes the canonical target path for a dated file:
//! `<root>/<year>/<MM>-<MonthName>/<original filename>`. The filename is
//! never altered, only relocated.

use crate::core::resolve::FileDate;
use chrono::Datelike;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Computes canonical target paths under a scan root
#[derive(Debug, Clone)]
pub struct PathPlanner {
    root: PathBuf,
}

impl PathPlanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The single deterministic location a file with this date must occupy.
    pub fn target_for(&self, date: &FileDate, file_name: &OsStr) -> PathBuf {
        let year = date.timestamp.year();
        let month = date.timestamp.month();
        self.root
            .join(year.to_string())
            .join(format!("{:02}-{}", month, month_name(month)))
            .join(file_name)
    }

    /// True iff the file already sits at its computed target. Exact path
    /// equality; existence of equivalent content elsewhere doesn't count.
    pub fn is_already_organized(&self, path: &Path, date: &FileDate) -> bool {
        match path.file_name() {
            Some(name) => path == self.target_for(date, name),
            None => false,
        }
    }
}

/// Full English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolve::DateSource;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> FileDate {
        FileDate {
            timestamp: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            source: DateSource::Metadata,
        }
    }

    #[test]
    fn target_path_is_deterministic() {
        let planner = PathPlanner::new("/photos");
        let target = planner.target_for(&date(2023, 3, 5), OsStr::new("IMG_1.jpg"));
        assert_eq!(target, PathBuf::from("/photos/2023/03-March/IMG_1.jpg"));
    }

    #[test]
    fn month_numbers_are_zero_padded() {
        let planner = PathPlanner::new("/photos");
        let target = planner.target_for(&date(2024, 12, 25), OsStr::new("xmas.png"));
        assert_eq!(target, PathBuf::from("/photos/2024/12-December/xmas.png"));
    }

    #[test]
    fn file_at_its_target_is_already_organized() {
        let planner = PathPlanner::new("/photos");
        let d = date(2023, 3, 5);
        assert!(planner.is_already_organized(Path::new("/photos/2023/03-March/IMG_1.jpg"), &d));
        assert!(!planner.is_already_organized(Path::new("/photos/stray/IMG_1.jpg"), &d));
        // same filename under the wrong month is not organized
        assert!(!planner.is_already_organized(Path::new("/photos/2023/04-April/IMG_1.jpg"), &d));
    }

    #[test]
    fn every_month_has_a_name() {
        for m in 1..=12 {
            assert_ne!(month_name(m), "Unknown");
        }
        assert_eq!(month_name(3), "March");
        assert_eq!(month_name(0), "Unknown");
    }
}
