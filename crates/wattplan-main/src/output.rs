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

//! Output formatters for CLI results.

use comfy_table::{Attribute, Cell, Table, presets::UTF8_FULL};
use wattplan_core::{
    Candidate, CleanupMode, CleanupReport, DayResolution, GuardOutcome, ScheduleMap,
    ScheduleValue,
};

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table(labels: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(labels));
    table
}

/// `HHmm` as `HH:mm`
pub fn format_time(hhmm: &str) -> String {
    match (hhmm.get(..2), hhmm.get(2..)) {
        (Some(hours), Some(minutes)) if hhmm.len() == 4 => format!("{hours}:{minutes}"),
        _ => hhmm.to_owned(),
    }
}

/// Human-readable meaning of a directive
pub fn describe_value(value: Option<ScheduleValue>) -> String {
    match value {
        None => "unscheduled".to_owned(),
        Some(ScheduleValue::Watts(0)) => "idle".to_owned(),
        Some(ScheduleValue::Watts(w)) if w > 0 => format!("charge {w} W"),
        Some(ScheduleValue::Watts(w)) => format!("discharge {} W", w.unsigned_abs()),
        Some(ScheduleValue::NetZero) => "net zero (follow household load)".to_owned(),
        Some(ScheduleValue::NetZeroPlus) => "net zero+ (charge from surplus only)".to_owned(),
    }
}

fn value_cell(value: Option<ScheduleValue>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

/// Breakpoints of one day as a table
pub fn format_day(day: &DayResolution) -> String {
    let mut table = new_table(&["From", "Value", "Meaning", "Source key"]);

    for slot in &day.slots {
        table.add_row(vec![
            Cell::new(format_time(&slot.time)),
            Cell::new(value_cell(slot.value)),
            Cell::new(describe_value(slot.value)),
            Cell::new(
                slot.source_key
                    .as_ref()
                    .map_or("-", |key| key.as_str()),
            ),
        ]);
    }

    format!("Schedule for {}\n{table}", day.date)
}

/// Every entry of the map with its derived attributes
pub fn format_entries(map: &ScheduleMap) -> String {
    let mut table = new_table(&["Key", "Value", "Meaning", "Specificity", "Recurring"]);

    for (key, value) in map {
        table.add_row(vec![
            Cell::new(key.as_str()),
            Cell::new(value.to_string()),
            Cell::new(describe_value(Some(*value))),
            Cell::new(key.specificity()),
            Cell::new(if key.is_recurring() { "yes" } else { "no" }),
        ]);
    }

    format!("{} entries\n{table}", map.len())
}

/// Eligible candidates in ranking order, winner first
pub fn format_candidates(candidates: &[Candidate<'_>]) -> String {
    let mut table = new_table(&["Rank", "Key", "Value", "Floor time", "Specificity"]);

    for (rank, candidate) in candidates.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(candidate.key.as_str()),
            Cell::new(candidate.value.to_string()),
            Cell::new(format_time(&candidate.floor_time)),
            Cell::new(candidate.specificity),
        ]);
    }

    table.to_string()
}

/// One-paragraph summary of a guarded directive
pub fn format_outcome(date: &str, time: &str, outcome: &GuardOutcome) -> String {
    let mut text = format!(
        "{date} {}: {} ({})",
        format_time(time),
        outcome.applied,
        describe_value(Some(outcome.applied))
    );

    if let Some(reason) = &outcome.override_reason {
        text.push_str(&format!(
            "\n  scheduled {}, overridden: {reason}",
            value_cell(outcome.requested)
        ));
    } else if outcome.requested.is_none() {
        text.push_str("\n  no directive in effect, running idle");
    }

    text
}

pub fn format_cleanup(report: &CleanupReport) -> String {
    let verb = match report.mode {
        CleanupMode::Simulate => "Would remove",
        CleanupMode::Delete => "Removed",
    };

    let mut text = format!(
        "{verb} {} entries dated before {}",
        report.count, report.as_of
    );
    for key in &report.keys {
        text.push_str(&format!("\n  {key}"));
    }
    text
}
