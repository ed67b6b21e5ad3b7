//! shiftgrid - extract staff shift schedules from OCR detection dumps
//!
//! Reads JSON detection dumps produced by an external OCR engine, rebuilds
//! the schedule table, and writes calendar-event JSON for one staff member.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use shiftgrid::config::{load_config, ParserConfig};
use shiftgrid::detection::parse_detections;
use shiftgrid::schedule::{CalendarEvent, MatchMode};
use shiftgrid::ScheduleParser;

/// shiftgrid - schedule extraction from OCR detections
#[derive(Parser, Debug)]
#[command(name = "shiftgrid")]
#[command(about = "Rebuilds a shift schedule table from OCR detections and exports calendar events")]
struct Args {
    /// Detection dump files (JSON), one per schedule image
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Staff name to resolve shifts for
    #[arg(short, long)]
    staff: Option<String>,

    /// Parser configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write events JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Permissive character-overlap name matching for noisy OCR
    #[arg(long)]
    fuzzy: bool,

    /// Print each reconstructed grid instead of resolving shifts
    #[arg(long)]
    dump_grid: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ParserConfig::default(),
    };
    if args.fuzzy {
        config.match_mode = MatchMode::CharOverlap { min_chars: 1 };
    }

    if args.staff.is_none() && !args.dump_grid {
        bail!("pass --staff <NAME> to resolve shifts, or --dump-grid to inspect the table");
    }

    let parser = ScheduleParser::with_config(config);
    let mut events: Vec<CalendarEvent> = Vec::new();

    // One bad dump must not abort the rest of the batch
    for input in &args.inputs {
        let detections = match std::fs::read_to_string(input)
            .map_err(anyhow::Error::from)
            .and_then(|json| parse_detections(&json).map_err(anyhow::Error::from))
        {
            Ok(detections) => detections,
            Err(e) => {
                warn!("skipping {}: {:#}", input.display(), e);
                continue;
            }
        };

        info!("{}: {} detections", input.display(), detections.len());
        let sheet = parser.parse(&detections);

        if args.dump_grid {
            println!("{}", input.display());
            print!("{}", sheet.grid);
            continue;
        }

        if let Some(staff) = &args.staff {
            let sheet_events = parser.events_for(&sheet, staff);
            info!("{}: {} events for {}", input.display(), sheet_events.len(), staff);
            events.extend(sheet_events);
        }
    }

    if args.dump_grid {
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&events)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {} events to {}", events.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
