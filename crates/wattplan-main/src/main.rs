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

mod cli;
mod config;
mod output;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use wattplan_core::{
    CleanupMode, QueryDate, QueryTime, ScheduleKey, ScheduleValue,
    SchedulePersistence, collapse_slots, guard_value, query_instant, ranked_candidates,
    resolve_day, resolve_days, value_at,
};

use crate::cli::{CleanupArgs, Cli, Commands, ResolveArgs, SetArgs, ValueArgs};
use crate::config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(schedule) = &cli.schedule {
        config.storage.schedule_path = schedule.display().to_string();
    }

    // Initialize tracing with env filter support
    // Respects RUST_LOG environment variable, logs go to stderr so stdout stays parseable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.system.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    let persistence = config.persistence();
    info!("Using schedule file {}", persistence.path().display());

    match cli.command {
        Commands::Resolve(args) => run_resolve(&config, &persistence, &args),
        Commands::Value(args) => run_value(&config, &persistence, &args),
        Commands::List => run_list(&persistence),
        Commands::Set(args) => run_set(&persistence, &args),
        Commands::Delete(args) => {
            let key = ScheduleKey::parse(&args.key)?;
            if persistence.delete_entry(&key)? {
                println!("Deleted {key}");
            } else {
                println!("No entry {key}");
            }
            Ok(())
        }
        Commands::Cleanup(args) => run_cleanup(&config, &persistence, &args),
    }
}

/// Query date from the argument, or today in the configured timezone
fn query_date(config: &AppConfig, arg: Option<&str>) -> Result<QueryDate> {
    match arg {
        Some(raw) => Ok(QueryDate::parse(raw)?),
        None => Ok(query_instant(config.local_now()?)?.0),
    }
}

/// Query date and time from the arguments.
///
/// Missing parts default to a single reading of the local clock, so a query
/// issued across midnight never pairs one day's date with the next day's time.
fn query_date_time(
    config: &AppConfig,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<(QueryDate, QueryTime)> {
    resolve_query(date, time, || config.local_now())
}

fn resolve_query(
    date: Option<&str>,
    time: Option<&str>,
    now: impl FnOnce() -> Result<NaiveDateTime>,
) -> Result<(QueryDate, QueryTime)> {
    if let (Some(date), Some(time)) = (date, time) {
        return Ok((QueryDate::parse(date)?, QueryTime::parse(time)?));
    }

    let (today, current) = query_instant(now()?)?;
    let date = match date {
        Some(raw) => QueryDate::parse(raw)?,
        None => today,
    };
    let time = match time {
        Some(raw) => QueryTime::parse(raw)?,
        None => current,
    };
    Ok((date, time))
}

fn run_resolve(
    config: &AppConfig,
    persistence: &SchedulePersistence,
    args: &ResolveArgs,
) -> Result<()> {
    let start = query_date(config, args.date.as_deref())?;
    let loaded = persistence.load()?;

    let mut days = resolve_days(&loaded.map, &start, usize::from(args.days));
    if args.collapse {
        for day in &mut days {
            day.slots = collapse_slots(&day.slots);
        }
    }

    if args.json {
        let skipped: Vec<&str> = loaded.skipped.iter().map(|s| s.key.as_str()).collect();
        let body = json!({
            "success": true,
            "days": days,
            "skipped": skipped,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let rendered: Vec<String> = days.iter().map(output::format_day).collect();
        println!("{}", rendered.join("\n\n"));
        for skipped in &loaded.skipped {
            println!("skipped malformed entry '{}': {}", skipped.key, skipped.error);
        }
    }

    Ok(())
}

fn run_value(
    config: &AppConfig,
    persistence: &SchedulePersistence,
    args: &ValueArgs,
) -> Result<()> {
    let (date, time) = query_date_time(config, args.date.as_deref(), args.time.as_deref())?;
    let loaded = persistence.load()?;

    let slots = resolve_day(&loaded.map, &date);
    let requested = value_at(&slots, &time);
    let limit_state = args
        .soc
        .map(|soc| config.limit_state(soc))
        .unwrap_or_default();
    let outcome = guard_value(requested, limit_state);

    if outcome.is_overridden() {
        warn!(
            "Directive overridden by battery limits at {} {}: {:?}",
            date, time, outcome.override_reason
        );
    }

    if args.json {
        let body = json!({
            "date": date,
            "time": time,
            "limitState": limit_state,
            "requested": outcome.requested,
            "applied": outcome.applied,
            "overrideReason": outcome.override_reason,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!(
            "{}",
            output::format_outcome(date.as_str(), time.as_str(), &outcome)
        );
        if args.explain {
            let candidates = ranked_candidates(&loaded.map, &date, &time);
            if candidates.is_empty() {
                println!("No eligible entries");
            } else {
                println!("{}", output::format_candidates(&candidates));
            }
        }
    }

    Ok(())
}

fn run_list(persistence: &SchedulePersistence) -> Result<()> {
    let loaded = persistence.load()?;
    println!("{}", output::format_entries(&loaded.map));
    for skipped in &loaded.skipped {
        println!("skipped malformed entry '{}': {}", skipped.key, skipped.error);
    }
    Ok(())
}

fn run_set(persistence: &SchedulePersistence, args: &SetArgs) -> Result<()> {
    let key = ScheduleKey::parse(&args.key)?;
    let value: ScheduleValue = args.value.parse()?;

    match persistence.set_entry(&key, value)? {
        Some(previous) => println!("Updated {key}: {previous} -> {value}"),
        None => println!("Added {key} = {value}"),
    }
    Ok(())
}

fn run_cleanup(
    config: &AppConfig,
    persistence: &SchedulePersistence,
    args: &CleanupArgs,
) -> Result<()> {
    let as_of = query_date(config, args.as_of.as_deref())?;
    let mode = if args.delete {
        CleanupMode::Delete
    } else {
        CleanupMode::Simulate
    };

    let report = persistence.cleanup(&as_of, mode)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", output::format_cleanup(&report));
    }
    Ok(())
}
