//! # CLI Module
//!
//! Command-line interface for the media organizer.
//!
//! ## Usage
//! ```bash
//! # Report what needs organizing (default, touches nothing)
//! media-organize ~/Pictures
//!
//! # Full move logic, logged instead of executed
//! media-organize ~/Pictures --dry-run
//!
//! # Actually move files
//! media-organize ~/Pictures --move
//!
//! # JSON output for scripting
//! media-organize ~/Pictures --output json
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_organizer::core::planner::month_name;
use media_organizer::core::{Mode, OrganizeOutcome, OrganizingEngine, ScanReport};
use media_organizer::error::Result;
use media_organizer::events::{Event, EventChannel, MoveEvent, ScanEvent};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Media Organizer - sort photos and videos into year/month folders
#[derive(Parser, Debug)]
#[command(name = "media-organize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan and organize
    directory: PathBuf,

    /// Actually move files into place
    #[arg(long = "move", conflicts_with = "dry_run")]
    do_move: bool,

    /// Run the full move logic but only log what would happen
    #[arg(long)]
    dry_run: bool,

    /// Seconds allowed for each external metadata probe
    #[arg(long, default_value = "30")]
    probe_timeout: u64,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mode = if cli.do_move {
        Mode::Move
    } else if cli.dry_run {
        Mode::DryRun
    } else {
        Mode::Check
    };

    let term = Term::stderr();
    let pretty = matches!(cli.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Media Organizer").bold().cyan(),
            style(format!("({mode} mode)")).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if pretty {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {pos}/{len} {msg}")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else { continue };
            match event {
                Event::Scan(ScanEvent::Progress(p)) => {
                    pb.set_message(format!(
                        "scanned {} entries ({} images, {} videos)",
                        p.files_visited, p.images_found, p.videos_found
                    ));
                    pb.tick();
                }
                Event::Scan(ScanEvent::Completed { files_visited, .. }) => {
                    pb.set_message(format!("scan complete ({files_visited} entries)"));
                }
                Event::Move(MoveEvent::Started { planned }) => {
                    pb.set_length(planned as u64);
                    pb.set_message("moving files");
                }
                Event::Move(MoveEvent::Moved { .. })
                | Event::Move(MoveEvent::DuplicateRemoved { .. })
                | Event::Move(MoveEvent::Conflict { .. })
                | Event::Move(MoveEvent::Failed { .. }) => {
                    pb.inc(1);
                }
                Event::Move(MoveEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let engine = OrganizingEngine::builder(&cli.directory)
        .mode(mode)
        .probe_timeout(Duration::from_secs(cli.probe_timeout))
        .events(sender)
        .build();

    let result = engine.run();

    // Drop finished; signal the event thread by ending the channel
    drop(engine);
    event_thread.join().ok();

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let outcome = result?;

    match cli.output {
        OutputFormat::Pretty => print_pretty(&term, &outcome, cli.verbose),
        OutputFormat::Json => print_json(&outcome),
    }

    Ok(())
}

fn print_pretty(term: &Term, outcome: &OrganizeOutcome, verbose: bool) {
    let report = &outcome.report;

    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} entries visited in {:.1}s",
        style(report.files_visited).cyan(),
        outcome.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} images, {} videos",
        style(report.images_found).cyan(),
        style(report.videos_found).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} dated from metadata, {} from filesystem timestamps",
        style(report.metadata_dates).cyan(),
        style(report.filesystem_dates).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} already organized",
        style(report.already_organized).cyan()
    ))
    .ok();
    if report.videos_skipped_no_date > 0 {
        term.write_line(&format!(
            "  {} videos skipped (no metadata date)",
            style(report.videos_skipped_no_date).yellow()
        ))
        .ok();
    }
    if outcome.interrupted {
        term.write_line(&format!(
            "  {} interrupted before completing; results are partial",
            style("!").yellow().bold()
        ))
        .ok();
    }
    term.write_line("").ok();

    if report.planned_moves() == 0 {
        term.write_line(&format!(
            "  {} Everything is already in the right place!",
            style("🎉").green()
        ))
        .ok();
    } else {
        let heading = match outcome.mode {
            Mode::Check => "Files needing organization:",
            Mode::DryRun => "Planned moves (dry run):",
            Mode::Move => "Moves executed:",
        };
        term.write_line(&format!("{}", style(heading).bold().underlined()))
            .ok();

        print_plan(term, report, verbose);
    }

    if outcome.mode != Mode::Check {
        term.write_line("").ok();
        term.write_line(&format!(
            "  {} moved ({} duplicate sources removed), {} failed",
            style(outcome.moved).green(),
            style(outcome.duplicates_removed).dim(),
            style(outcome.failures.len()).red()
        ))
        .ok();

        for failure in &outcome.failures {
            term.write_line(&format!(
                "    {} {}: {}",
                style("✗").red(),
                display_path(&failure.source),
                failure.reason
            ))
            .ok();
        }
    }

    if !report.manual_review.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Manual review required (no date information):").bold()
        ))
        .ok();
        for path in &report.manual_review {
            term.write_line(&format!("  {}", display_path(path))).ok();
        }
        term.write_line(&format!(
            "{}",
            style("These files stay where they are; date them from filename patterns or your own records.").dim()
        ))
        .ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style("Remember: a differing target is never overwritten.").dim()
    ))
    .ok();
}

fn print_plan(term: &Term, report: &ScanReport, verbose: bool) {
    for bucket in &report.buckets {
        term.write_line("").ok();
        term.write_line(&format!("{}", style(bucket.year).bold())).ok();
        term.write_line(&format!(
            "  {:02}-{}/",
            bucket.month,
            month_name(bucket.month)
        ))
        .ok();

        for mv in &bucket.moves {
            let name = mv
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            term.write_line(&format!("    {}", style(name).bold())).ok();
            term.write_line(&format!("      From: {}", display_path(&mv.source)))
                .ok();
            term.write_line(&format!("      To:   {}", display_path(&mv.target)))
                .ok();
            term.write_line(&format!(
                "      Date: {} ({})",
                mv.date.timestamp.format("%Y-%m-%d %H:%M:%S"),
                mv.date.source
            ))
            .ok();

            if verbose {
                if let Some(duration) = mv.duration_secs {
                    term.write_line(&format!("      Duration: {:.1} minutes", duration / 60.0))
                        .ok();
                }
                if let Some(size) = mv.size_bytes {
                    term.write_line(&format!("      Size: {}", format_bytes(size)))
                        .ok();
                }
            }
        }
    }
}

fn print_json(outcome: &OrganizeOutcome) {
    match serde_json::to_string_pretty(outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize outcome: {e}"),
    }
}

fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
