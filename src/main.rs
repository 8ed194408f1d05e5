//! # media-organize CLI
//!
//! Command-line interface for the media organizer.
//!
//! ## Usage
//! ```bash
//! media-organize ~/Pictures
//! media-organize ~/Pictures --dry-run
//! media-organize ~/Pictures --move --output json
//! ```

mod cli;

use media_organizer::Result;

fn main() -> Result<()> {
    media_organizer::init_tracing();
    cli::run()
}
