// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of WattPlan.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! CLI argument definitions using clap.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "wattplan")]
#[command(author, version, about = "WattPlan charge schedule resolver")]
#[command(
    long_about = "Resolve a wildcard charge/discharge timetable into the effective\n\
    directives for a day, and maintain the timetable file.\n\
    \nKeys are 12 characters (YYYYMMDDHHmm), any position may be '*'.\n\
    Values are watts (positive charges, negative discharges), 'netzero' or 'netzero+'.\n\
    \nExamples:\n  \
    wattplan resolve                       # Today's timetable\n  \
    wattplan value --soc 93                # What to do right now\n  \
    wattplan set '********0800' netzero    # Every day from 08:00\n  \
    wattplan cleanup --simulate            # Show entries that have expired"
)]
pub struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Schedule file, overrides storage.schedule_path
    #[arg(long, global = true, value_name = "PATH")]
    pub schedule: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the resolved breakpoints for one or more days
    Resolve(ResolveArgs),

    /// Show the directive in effect at an instant, after battery limits
    Value(ValueArgs),

    /// List every timetable entry
    List,

    /// Add or replace an entry
    Set(SetArgs),

    /// Remove an entry
    Delete(DeleteArgs),

    /// Find (and optionally remove) entries dated before a day
    Cleanup(CleanupArgs),
}

#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// First day to resolve (defaults to today)
    #[arg(long, value_name = "YYYYMMDD")]
    pub date: Option<String>,

    /// Number of consecutive days
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=31))]
    pub days: u16,

    /// Merge adjacent breakpoints with the same value
    #[arg(long, default_value_t = false)]
    pub collapse: bool,

    /// Print JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct ValueArgs {
    /// Day to query (defaults to today)
    #[arg(long, value_name = "YYYYMMDD")]
    pub date: Option<String>,

    /// Time to query (defaults to now)
    #[arg(long, value_name = "HHmm")]
    pub time: Option<String>,

    /// Current battery state of charge (%), enables the limit guard
    #[arg(long, value_name = "PERCENT")]
    pub soc: Option<f32>,

    /// Also list every eligible entry in ranking order
    #[arg(long, default_value_t = false)]
    pub explain: bool,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct SetArgs {
    /// 12-character key, e.g. 20251222**** or ********0800
    pub key: String,

    /// Watts, netzero or netzero+
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// 12-character key to remove
    pub key: String,
}

#[derive(Debug, Parser)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["simulate", "delete"])
))]
pub struct CleanupArgs {
    /// Entries dated strictly before this day are stale (defaults to today)
    #[arg(long, value_name = "YYYYMMDD")]
    pub as_of: Option<String>,

    /// Report what would be removed without changing anything
    #[arg(long)]
    pub simulate: bool,

    /// Remove stale entries and move them to the archive
    #[arg(long)]
    pub delete: bool,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
