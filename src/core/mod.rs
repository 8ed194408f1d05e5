//! # Core Module
//!
//! The GUI-agnostic media organizing engine.
//!
//! ## Modules
//! - `classify` - decides whether a file is an image or a video
//! - `probe` - extracts metadata dictionaries (EXIF, ffprobe)
//! - `resolve` - turns metadata and timestamps into a dated verdict per file
//! - `planner` - computes the canonical `YEAR/MM-MonthName/` target path
//! - `scanner` - walks the tree and builds the move plan
//! - `conflict` - decides duplicate-vs-conflict when a target already exists
//! - `engine` - orchestrates check / dry-run / move modes

pub mod classify;
pub mod conflict;
pub mod engine;
pub mod planner;
pub mod probe;
pub mod resolve;
pub mod scanner;

// Re-export commonly used types
pub use classify::{MediaClassifier, MediaKind};
pub use engine::{CancellationToken, Mode, MoveFailure, OrganizeOutcome, OrganizingEngine};
pub use probe::{MediaMetadata, MetadataProber, ProbeOutcome};
pub use resolve::{DateResolver, DateSource, FileDate};
pub use scanner::{MonthBucket, PlannedMove, ScanReport};
