//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the organizing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Move phase events (also emitted, unexecuted, in dry-run mode)
    Move(MoveEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// Progress update, emitted every 100 directory entries
    Progress(ScanProgress),
    /// Scanning completed
    Completed {
        files_visited: usize,
        images_found: usize,
        videos_found: usize,
    },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Directory entries visited so far
    pub files_visited: usize,
    /// Images found so far
    pub images_found: usize,
    /// Videos found so far
    pub videos_found: usize,
    /// Entry currently being examined
    pub current_path: PathBuf,
}

/// Events during the move phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MoveEvent {
    /// The move phase has started
    Started { planned: usize },
    /// A file was moved (or would be, in dry-run mode)
    Moved { source: PathBuf, target: PathBuf },
    /// A source was deleted because the target is a confirmed duplicate
    DuplicateRemoved { source: PathBuf, target: PathBuf },
    /// The target exists and differs; both files were left in place
    Conflict { source: PathBuf, target: PathBuf },
    /// A move failed with an I/O error; the batch continues
    Failed { source: PathBuf, message: String },
    /// The move phase completed
    Completed { moved: usize, failed: usize },
}
