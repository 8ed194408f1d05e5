//! # Media Organizer
//!
//! Organizes a media library into a `YEAR/MM-MonthName/` hierarchy rooted at
//! the scanned directory, using each file's capture metadata as the source of
//! truth for where it belongs.
//!
//! ## Core Philosophy
//! - **Never lose data** - a move is a single rename; a differing target is
//!   never overwritten
//! - **Metadata first** - embedded capture dates beat filesystem timestamps
//! - **Idempotent** - re-running over an organized tree is a no-op
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation layers:
//! - `core` - the organizing engine (classify, probe, resolve, plan, move)
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - user-friendly error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{OrganizerError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
