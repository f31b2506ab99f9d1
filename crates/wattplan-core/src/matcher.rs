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

//! Pattern matching shared by day resolution and stale-entry cleanup.
//!
//! Every comparison between a wildcard pattern and a concrete date or time
//! goes through this module.

use wattplan_types::key::WILDCARD;
use wattplan_types::{QueryDate, QueryTime, ScheduleKey};

/// True iff every position of `pattern` is `*` or equals the same position
/// of the concrete date.
pub fn matches_date(pattern: &str, date: &QueryDate) -> bool {
    let date = date.as_str();
    pattern.len() == date.len()
        && pattern
            .chars()
            .zip(date.chars())
            .all(|(p, d)| p == WILDCARD || p == d)
}

/// Earliest time a time pattern could apply: wildcards replaced by `0`.
///
/// `"****"` floors to `"0000"`, so a wildcard-time entry is in effect from
/// the start of the day and acts as a background value.
pub fn effective_floor_time(time_pattern: &str) -> String {
    time_pattern
        .chars()
        .map(|c| if c == WILDCARD { '0' } else { c })
        .collect()
}

/// Floor time of a key's time component
pub fn floor_time(key: &ScheduleKey) -> String {
    effective_floor_time(key.time_pattern())
}

/// Whether `key` can govern `query_time` on `date`.
pub fn is_eligible(key: &ScheduleKey, date: &QueryDate, query_time: &QueryTime) -> bool {
    is_eligible_at(key, date, query_time.as_str())
}

/// Eligibility against a raw `HHmm` breakpoint.
///
/// Breakpoints are floor times and may lie past `2359`. Times are
/// zero-padded, so string order equals numeric order.
pub(crate) fn is_eligible_at(key: &ScheduleKey, date: &QueryDate, time: &str) -> bool {
    matches_date(key.date_pattern(), date) && floor_time(key).as_str() <= time
}

/// Number of non-wildcard characters in the key (0-12)
pub fn specificity(key: &ScheduleKey) -> usize {
    key.specificity()
}

/// True when the date component has no wildcard, i.e. the entry does not recur
pub fn has_concrete_date(key: &ScheduleKey) -> bool {
    !key.is_recurring()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> ScheduleKey {
        ScheduleKey::parse(raw).unwrap()
    }

    fn date(raw: &str) -> QueryDate {
        QueryDate::parse(raw).unwrap()
    }

    fn time(raw: &str) -> QueryTime {
        QueryTime::parse(raw).unwrap()
    }

    #[test]
    fn test_matches_date() {
        let d = date("20251222");
        assert!(matches_date("20251222", &d));
        assert!(matches_date("********", &d));
        assert!(matches_date("****12**", &d));
        assert!(matches_date("2025122*", &d));
        assert!(!matches_date("20251223", &d));
        assert!(!matches_date("****11**", &d));
        assert!(!matches_date("2025122", &d));
    }

    #[test]
    fn test_effective_floor_time() {
        assert_eq!(effective_floor_time("****"), "0000");
        assert_eq!(effective_floor_time("08**"), "0800");
        assert_eq!(effective_floor_time("*830"), "0830");
        assert_eq!(effective_floor_time("1*3*"), "1030");
        assert_eq!(effective_floor_time("1730"), "1730");
    }

    #[test]
    fn test_is_eligible() {
        let d = date("20251222");
        assert!(is_eligible(&key("20251222****"), &d, &time("0000")));
        assert!(is_eligible(&key("********0800"), &d, &time("0800")));
        assert!(!is_eligible(&key("********0800"), &d, &time("0759")));
        assert!(!is_eligible(&key("202512230000"), &d, &time("2359")));
    }

    #[test]
    fn test_breakpoint_past_midnight_clock() {
        let d = date("20251222");
        assert!(is_eligible_at(&key("********7***"), &d, "7000"));
        assert!(!is_eligible_at(&key("********7***"), &d, "2359"));
    }

    #[test]
    fn test_specificity() {
        assert_eq!(specificity(&key("202512220130")), 12);
        assert_eq!(specificity(&key("20251222****")), 8);
        assert_eq!(specificity(&key("********0000")), 4);
        assert_eq!(specificity(&key("************")), 0);
        assert_eq!(specificity(&key("****12**08*0")), 5);
    }

    #[test]
    fn test_has_concrete_date() {
        assert!(has_concrete_date(&key("20250101****")));
        assert!(!has_concrete_date(&key("****01010000")));
        assert!(!has_concrete_date(&key("2025010*0000")));
    }
}
