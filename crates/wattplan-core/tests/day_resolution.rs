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

//! Day resolution scenarios over realistic timetables

use serde_json::json;
use wattplan_core::{
    QueryDate, QueryTime, ResolvedSlot, ScheduleKey, ScheduleMap, ScheduleValue, collapse_slots,
    resolve_day, select_winner, value_at,
};

fn reference_entries() -> Vec<(&'static str, serde_json::Value)> {
    vec![
        ("202512220000", json!(-498)),
        ("202512220130", json!(112)),
        ("20251222****", json!(0)),
        ("********0000", json!(-200)),
        ("********0800", json!("netzero")),
    ]
}

fn reference_map() -> ScheduleMap {
    let (map, skipped) = ScheduleMap::from_raw_entries(reference_entries());
    assert!(skipped.is_empty());
    map
}

fn date(raw: &str) -> QueryDate {
    QueryDate::parse(raw).unwrap()
}

fn time(raw: &str) -> QueryTime {
    QueryTime::parse(raw).unwrap()
}

fn slot_value<'a>(slots: &'a [ResolvedSlot], at: &str) -> Option<&'a ResolvedSlot> {
    slots.iter().find(|s| s.time == at)
}

#[test]
fn test_reference_day_mandatory_breakpoints() {
    let slots = resolve_day(&reference_map(), &date("20251222"));

    let midnight = slot_value(&slots, "0000").expect("midnight breakpoint");
    assert_eq!(midnight.value, Some(ScheduleValue::Watts(-498)));
    assert_eq!(
        midnight.source_key.as_ref().map(ScheduleKey::as_str),
        Some("202512220000")
    );

    let early = slot_value(&slots, "0130").expect("01:30 breakpoint");
    assert_eq!(early.value, Some(ScheduleValue::Watts(112)));

    let morning = slot_value(&slots, "0800").expect("08:00 breakpoint");
    assert_eq!(morning.value, Some(ScheduleValue::NetZero));
    assert_eq!(
        morning.source_key.as_ref().map(ScheduleKey::as_str),
        Some("********0800")
    );
}

#[test]
fn test_reference_day_collapsed_view() {
    let slots = resolve_day(&reference_map(), &date("20251222"));
    let collapsed = collapse_slots(&slots);

    let view: Vec<(&str, Option<ScheduleValue>)> = collapsed
        .iter()
        .map(|s| (s.time.as_str(), s.value))
        .collect();
    assert_eq!(
        view,
        vec![
            ("0000", Some(ScheduleValue::Watts(-498))),
            ("0130", Some(ScheduleValue::Watts(112))),
            ("0800", Some(ScheduleValue::NetZero)),
        ]
    );
}

#[test]
fn test_reference_map_on_other_day_uses_recurring_entries() {
    let slots = resolve_day(&reference_map(), &date("20251223"));
    let view: Vec<(&str, Option<ScheduleValue>)> =
        slots.iter().map(|s| (s.time.as_str(), s.value)).collect();

    assert_eq!(
        view,
        vec![
            ("0000", Some(ScheduleValue::Watts(-200))),
            ("0800", Some(ScheduleValue::NetZero)),
        ]
    );
}

#[test]
fn test_resolved_day_agrees_with_selector_at_every_minute() {
    let map = reference_map();
    let day = date("20251222");
    let slots = resolve_day(&map, &day);

    for hour in 0..24 {
        for minute in 0..60 {
            let t = time(&format!("{hour:02}{minute:02}"));
            let direct = select_winner(&map, &day, &t).map(|d| d.value);
            assert_eq!(value_at(&slots, &t), direct, "mismatch at {t}");
        }
    }
}

#[test]
fn test_output_sorted_and_starts_at_midnight() {
    let maps = [
        ScheduleMap::new(),
        reference_map(),
        ScheduleMap::from_raw_entries(vec![
            ("****12**2*15", json!(50)),
            ("2025*2221745", json!("netzero+")),
            ("********1***", json!(-75)),
        ])
        .0,
    ];

    for map in &maps {
        for d in ["20251222", "20250101", "20241229"] {
            let slots = resolve_day(map, &date(d));
            assert_eq!(slots.first().map(|s| s.time.as_str()), Some("0000"));
            assert!(
                slots.windows(2).all(|w| w[0].time < w[1].time),
                "breakpoints not strictly increasing for {d}"
            );
        }
    }
}

#[test]
fn test_resolution_independent_of_insertion_order() {
    let forward = reference_map();
    let mut reversed_entries = reference_entries();
    reversed_entries.reverse();
    let (reversed, _) = ScheduleMap::from_raw_entries(reversed_entries);

    let day = date("20251222");
    assert_eq!(resolve_day(&forward, &day), resolve_day(&reversed, &day));
    assert_eq!(resolve_day(&forward, &day), resolve_day(&forward, &day));
}

#[test]
fn test_malformed_entries_do_not_abort_resolution() {
    let mut entries = reference_entries();
    entries.push(("2025122208", json!(1000)));
    entries.push(("********1200", json!({"watts": 5})));

    let (map, skipped) = ScheduleMap::from_raw_entries(entries);
    assert_eq!(skipped.len(), 2);

    let slots = resolve_day(&map, &date("20251222"));
    assert_eq!(slots, resolve_day(&reference_map(), &date("20251222")));
}
