//! # Error Module
//!
//! User-friendly error types for the media organizer.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Absorb per-file failures** - only pre-flight validation is fatal;
//!   everything that goes wrong for a single file ends up in the report
//!   instead of aborting the batch

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur before or during the directory scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

/// Failures of a single metadata probe.
///
/// These are never fatal: the caller treats a failed probe exactly like a
/// file with no metadata, after logging the detail. Keeping them as a typed
/// outcome makes the fallback a visible branch rather than a swallowed
/// exception.
#[derive(Error, Debug, Clone)]
pub enum ProbeError {
    #[error("failed to launch {tool}: {message}")]
    Launch { tool: &'static str, message: String },

    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: &'static str, seconds: u64 },

    #[error("{tool} exited with {status}")]
    Exit { tool: &'static str, status: String },

    #[error("unreadable {tool} output: {message}")]
    Malformed { tool: &'static str, message: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, OrganizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::RootNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn probe_timeout_names_the_tool() {
        let error = ProbeError::Timeout {
            tool: "ffprobe",
            seconds: 30,
        };
        let message = error.to_string();
        assert!(message.contains("ffprobe"));
        assert!(message.contains("30"));
    }
}
