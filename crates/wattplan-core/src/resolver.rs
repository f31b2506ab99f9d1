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

//! Day resolution: turn the sparse pattern map into a step function of
//! breakpoints for one calendar date.

use std::collections::BTreeSet;

use tracing::{debug, warn};
use wattplan_types::{
    DayResolution, QueryDate, QueryTime, ResolvedSlot, ScheduleMap, ScheduleValue,
};

use crate::matcher::{floor_time, matches_date};
use crate::selector::select_winner_at;

/// Resolve every breakpoint of `date`.
///
/// Breakpoints are midnight plus the floor time of every entry whose date
/// pattern matches. Output is sorted by time, starts at `0000`, and holds one
/// slot per distinct breakpoint. Adjacent slots may carry the same value; use
/// [`collapse_slots`] to merge them.
pub fn resolve_day(map: &ScheduleMap, date: &QueryDate) -> Vec<ResolvedSlot> {
    let mut breakpoints = BTreeSet::from([QueryTime::MIDNIGHT.to_owned()]);
    breakpoints.extend(
        map.keys()
            .filter(|key| matches_date(key.date_pattern(), date))
            .map(floor_time),
    );

    let slots: Vec<ResolvedSlot> = breakpoints
        .into_iter()
        .map(|time| match select_winner_at(map, date, &time) {
            Some(directive) => ResolvedSlot {
                time,
                value: Some(directive.value),
                source_key: Some(directive.key),
            },
            None => ResolvedSlot::unscheduled(time),
        })
        .collect();

    debug!(
        "Resolved {} breakpoint(s) for {} from {} entries",
        slots.len(),
        date,
        map.len()
    );

    slots
}

/// Resolve `days` consecutive dates starting at `start`
pub fn resolve_days(map: &ScheduleMap, start: &QueryDate, days: usize) -> Vec<DayResolution> {
    let mut resolutions = Vec::with_capacity(days);
    let mut current = Some(start.clone());

    for _ in 0..days {
        let Some(date) = current else {
            warn!("Stopping day resolution: calendar range exhausted");
            break;
        };
        resolutions.push(DayResolution {
            slots: resolve_day(map, &date),
            date: date.clone(),
        });
        current = date.next_day();
    }

    resolutions
}

/// Merge runs of adjacent slots with the same value, keeping the earliest
/// slot of each run. The effective value at every instant is unchanged.
pub fn collapse_slots(slots: &[ResolvedSlot]) -> Vec<ResolvedSlot> {
    let mut collapsed: Vec<ResolvedSlot> = Vec::with_capacity(slots.len());

    for slot in slots {
        match collapsed.last() {
            Some(previous) if previous.value == slot.value => {}
            _ => collapsed.push(slot.clone()),
        }
    }

    collapsed
}

/// Effective value at `time`: the value of the latest slot starting at or
/// before it. `None` when nothing is scheduled.
pub fn value_at(slots: &[ResolvedSlot], time: &QueryTime) -> Option<ScheduleValue> {
    slots
        .iter()
        .filter(|slot| slot.time.as_str() <= time.as_str())
        .max_by(|a, b| a.time.cmp(&b.time))
        .and_then(|slot| slot.value)
}
