//! # Engine Module
//!
//! Orchestrates the scan and the move phase under one of three modes.
//!
//! - `check`: scan only, zero filesystem mutation
//! - `dry-run`: the full move decision logic, with every mutation replaced
//!   by a log line; zero filesystem mutation
//! - `move`: execute each planned move in (year, month) order
//!
//! Per-file failures never abort the batch; they accumulate in the outcome.
//! There is no partial undo: a completed rename or delete is permanent.

use crate::core::conflict::{ConflictResolver, ConflictVerdict};
use crate::core::planner::PathPlanner;
use crate::core::probe::{ExifProber, FfprobeProber, MetadataProber};
use crate::core::resolve::{DateResolver, ImageDateResolver, VideoDateResolver};
use crate::core::scanner::{DirectoryScanner, PlannedMove, ScanReport};
use crate::error::{Result, ScanError};
use crate::events::{null_sender, Event, EventSender, MoveEvent};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Operating mode, selected per invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Report what would change; touch nothing
    #[default]
    Check,
    /// Run the full move logic but log instead of mutating
    DryRun,
    /// Actually move files
    Move,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Check => write!(f, "check"),
            Mode::DryRun => write!(f, "dry-run"),
            Mode::Move => write!(f, "move"),
        }
    }
}

/// Cooperative cancellation flag, checked between files.
///
/// Cancelling never kills an in-flight move; whatever completed stays
/// completed and the outcome is marked interrupted.
#[derive(Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// A single move that could not be completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFailure {
    pub source: PathBuf,
    pub target: PathBuf,
    pub reason: String,
}

/// Result of one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeOutcome {
    pub mode: Mode,
    pub report: ScanReport,
    /// Files moved (or that would be moved, in dry-run)
    pub moved: usize,
    /// Sources deleted because the target was a confirmed duplicate
    /// (included in `moved`)
    pub duplicates_removed: usize,
    pub failures: Vec<MoveFailure>,
    pub interrupted: bool,
    pub duration_ms: u64,
}

/// Builder for engine configuration
pub struct EngineBuilder {
    root: PathBuf,
    mode: Mode,
    probe_timeout: Duration,
    image_prober: Option<Arc<dyn MetadataProber>>,
    video_prober: Option<Arc<dyn MetadataProber>>,
    events: Option<EventSender>,
    cancel: CancellationToken,
}

impl EngineBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: Mode::default(),
            probe_timeout: Duration::from_secs(30),
            image_prober: None,
            video_prober: None,
            events: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Timeout applied to each external probe invocation
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Substitute the image metadata prober (tests use a fake)
    pub fn image_prober(mut self, prober: Arc<dyn MetadataProber>) -> Self {
        self.image_prober = Some(prober);
        self
    }

    /// Substitute the video metadata prober (tests use a fake)
    pub fn video_prober(mut self, prober: Arc<dyn MetadataProber>) -> Self {
        self.video_prober = Some(prober);
        self
    }

    pub fn events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn build(self) -> OrganizingEngine {
        let image_prober = self
            .image_prober
            .unwrap_or_else(|| Arc::new(ExifProber::new()));
        let video_prober = self
            .video_prober
            .unwrap_or_else(|| Arc::new(FfprobeProber::new(self.probe_timeout)));
        OrganizingEngine {
            root: self.root,
            mode: self.mode,
            image_prober,
            video_prober,
            events: self.events.unwrap_or_else(null_sender),
            cancel: self.cancel,
        }
    }
}

/// The media organizing engine
pub struct OrganizingEngine {
    root: PathBuf,
    mode: Mode,
    image_prober: Arc<dyn MetadataProber>,
    video_prober: Arc<dyn MetadataProber>,
    events: EventSender,
    cancel: CancellationToken,
}

impl OrganizingEngine {
    pub fn builder(root: impl Into<PathBuf>) -> EngineBuilder {
        EngineBuilder::new(root)
    }

    /// Run the engine. Only pre-flight validation can fail; everything else
    /// is absorbed into the outcome.
    pub fn run(&self) -> Result<OrganizeOutcome> {
        let start = Instant::now();

        if !self.root.exists() {
            return Err(ScanError::RootNotFound {
                path: self.root.clone(),
            }
            .into());
        }
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory {
                path: self.root.clone(),
            }
            .into());
        }

        let scanner = DirectoryScanner::new(
            PathPlanner::new(&self.root),
            DateResolver::Image(ImageDateResolver::new(self.image_prober.clone())),
            DateResolver::Video(VideoDateResolver::new(self.video_prober.clone())),
            self.events.clone(),
            self.cancel.clone(),
        );
        let report = scanner.scan();

        let mut outcome = OrganizeOutcome {
            mode: self.mode,
            moved: 0,
            duplicates_removed: 0,
            failures: Vec::new(),
            interrupted: report.interrupted,
            duration_ms: 0,
            report,
        };

        if self.mode != Mode::Check && !outcome.interrupted {
            self.execute(&mut outcome);
        }

        outcome.duration_ms = start.elapsed().as_millis() as u64;
        Ok(outcome)
    }

    fn execute(&self, outcome: &mut OrganizeOutcome) {
        let dry_run = self.mode == Mode::DryRun;
        let conflicts = ConflictResolver::new(self.image_prober.clone());
        let planned = outcome.report.planned_moves();

        self.events
            .send(Event::Move(MoveEvent::Started { planned }));

        // Buckets are already in (year, month) order
        let moves: Vec<PlannedMove> = outcome.report.iter_moves().cloned().collect();
        for mv in moves {
            if self.cancel.is_cancelled() {
                outcome.interrupted = true;
                break;
            }
            self.execute_one(&mv, dry_run, &conflicts, outcome);
        }

        self.events.send(Event::Move(MoveEvent::Completed {
            moved: outcome.moved,
            failed: outcome.failures.len(),
        }));
    }

    fn execute_one(
        &self,
        mv: &PlannedMove,
        dry_run: bool,
        conflicts: &ConflictResolver,
        outcome: &mut OrganizeOutcome,
    ) {
        if let Some(parent) = mv.target.parent() {
            if dry_run {
                tracing::info!(directory = %parent.display(), "dry-run: would create directory");
            } else if let Err(e) = fs::create_dir_all(parent) {
                self.fail(outcome, mv, format!("failed to create {}: {e}", parent.display()));
                return;
            }
        }

        if mv.target.exists() {
            match conflicts.assess(&mv.source, &mv.target, mv.media) {
                ConflictVerdict::Duplicate => {
                    if dry_run {
                        tracing::info!(source = %mv.source.display(), "dry-run: would delete duplicate source");
                    } else if let Err(e) = fs::remove_file(&mv.source) {
                        self.fail(outcome, mv, format!("failed to delete duplicate: {e}"));
                        return;
                    }
                    outcome.moved += 1;
                    outcome.duplicates_removed += 1;
                    self.events.send(Event::Move(MoveEvent::DuplicateRemoved {
                        source: mv.source.clone(),
                        target: mv.target.clone(),
                    }));
                }
                ConflictVerdict::Conflict { reason } => {
                    self.events.send(Event::Move(MoveEvent::Conflict {
                        source: mv.source.clone(),
                        target: mv.target.clone(),
                    }));
                    outcome.failures.push(MoveFailure {
                        source: mv.source.clone(),
                        target: mv.target.clone(),
                        reason,
                    });
                }
            }
            return;
        }

        if dry_run {
            tracing::info!(
                source = %mv.source.display(),
                target = %mv.target.display(),
                "dry-run: would move"
            );
        } else if let Err(e) = fs::rename(&mv.source, &mv.target) {
            self.fail(outcome, mv, e.to_string());
            return;
        }

        outcome.moved += 1;
        self.events.send(Event::Move(MoveEvent::Moved {
            source: mv.source.clone(),
            target: mv.target.clone(),
        }));
    }

    fn fail(&self, outcome: &mut OrganizeOutcome, mv: &PlannedMove, reason: String) {
        tracing::warn!(source = %mv.source.display(), %reason, "move failed");
        self.events.send(Event::Move(MoveEvent::Failed {
            source: mv.source.clone(),
            message: reason.clone(),
        }));
        outcome.failures.push(MoveFailure {
            source: mv.source.clone(),
            target: mv.target.clone(),
            reason,
        });
    }
}
