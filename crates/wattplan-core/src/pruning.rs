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

//! Stale entry detection for timetable cleanup.

use serde::{Deserialize, Serialize};
use std::fmt;
use wattplan_types::{QueryDate, ScheduleKey, ScheduleMap};

use crate::matcher::has_concrete_date;

/// How a cleanup request is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupMode {
    /// Report what would be removed, change nothing
    #[default]
    Simulate,
    /// Remove the reported entries
    Delete,
}

impl fmt::Display for CleanupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulate => f.write_str("simulate"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Outcome of a cleanup pass. Identical for both modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub mode: CleanupMode,
    pub as_of: QueryDate,
    pub count: usize,
    pub keys: Vec<ScheduleKey>,
}

/// An entry is prunable only when its date is fully concrete and strictly
/// before `as_of`. Recurring entries (any wildcard in the date) never expire.
pub fn is_prunable(key: &ScheduleKey, as_of: &QueryDate) -> bool {
    has_concrete_date(key) && key.date_pattern() < as_of.as_str()
}

/// Keys of every prunable entry, in key order
pub fn list_prunable(map: &ScheduleMap, as_of: &QueryDate) -> Vec<ScheduleKey> {
    map.keys()
        .filter(|key| is_prunable(key, as_of))
        .cloned()
        .collect()
}

/// Build the cleanup report for `mode`. Never touches the map.
pub fn plan_cleanup(map: &ScheduleMap, as_of: &QueryDate, mode: CleanupMode) -> CleanupReport {
    let keys = list_prunable(map, as_of);
    CleanupReport {
        mode,
        as_of: as_of.clone(),
        count: keys.len(),
        keys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wattplan_types::ScheduleValue;

    fn key(raw: &str) -> ScheduleKey {
        ScheduleKey::parse(raw).unwrap()
    }

    fn date(raw: &str) -> QueryDate {
        QueryDate::parse(raw).unwrap()
    }

    #[test]
    fn test_is_prunable() {
        let as_of = date("20250102");
        assert!(is_prunable(&key("202501010000"), &as_of));
        assert!(is_prunable(&key("20250101****"), &as_of));
        assert!(!is_prunable(&key("202501020000"), &as_of));
        assert!(!is_prunable(&key("202501030000"), &as_of));
    }

    #[test]
    fn test_recurring_entries_never_pruned() {
        let as_of = date("20250102");
        assert!(!is_prunable(&key("****01010000"), &as_of));
        assert!(!is_prunable(&key("********0000"), &as_of));
        assert!(!is_prunable(&key("2024****0000"), &as_of));
    }

    #[test]
    fn test_plan_cleanup_same_for_both_modes() {
        let map: ScheduleMap = [
            ("202412310800", ScheduleValue::Watts(400)),
            ("202501010000", ScheduleValue::NetZero),
            ("202501020000", ScheduleValue::Watts(-100)),
            ("****01010000", ScheduleValue::IDLE),
        ]
        .into_iter()
        .map(|(k, v)| (key(k), v))
        .collect();

        let simulate = plan_cleanup(&map, &date("20250102"), CleanupMode::Simulate);
        let delete = plan_cleanup(&map, &date("20250102"), CleanupMode::Delete);

        assert_eq!(simulate.count, 2);
        assert_eq!(simulate.keys, vec![key("202412310800"), key("202501010000")]);
        assert_eq!(simulate.keys, delete.keys);
        assert_eq!(map.len(), 4);
    }
}
