//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;

use crate::config::parse_instant;

fn parse_blackout(s: &str) -> Result<NaiveDateTime, String> {
    parse_instant("--blackout", s).map_err(|e| e.message)
}

/// Replays a grid recovery from a blackout, minute by minute.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Load the scenario from a TOML file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in scenario (baseline, renewable_heavy, nuclear_only)
    #[arg(long)]
    pub preset: Option<String>,

    /// Blackout instant, e.g. 2025-04-28T12:33:00
    #[arg(long, value_parser = parse_blackout)]
    pub blackout: Option<NaiveDateTime>,

    /// Roster CSV replacing the scenario's plants
    #[arg(long)]
    pub plants: Option<PathBuf>,

    /// Demand CSV replacing the scenario's forecast
    #[arg(long)]
    pub forecast: Option<PathBuf>,

    /// Write the minute snapshots as CSV
    #[arg(long)]
    pub csv_out: Option<PathBuf>,

    /// Write the minute snapshots as JSON
    #[arg(long)]
    pub json_out: Option<PathBuf>,

    /// Write the final roster state as JSON
    #[arg(long)]
    pub roster_out: Option<PathBuf>,

    /// Print one snapshot line every N minutes (0 disables)
    #[arg(long, default_value_t = 60)]
    pub print_every: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Start the REST API after the run
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

impl Args {
    /// Preset to use when no scenario file is given.
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or("baseline")
    }
}
