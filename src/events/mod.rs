//! # Events Module
//!
//! Event-driven progress reporting for the organizing engine.
//!
//! The engine emits events through a channel instead of printing directly,
//! so any frontend (CLI progress bar, GUI, tests) can subscribe without the
//! core knowing about it.

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::{Event, MoveEvent, ScanEvent, ScanProgress};
