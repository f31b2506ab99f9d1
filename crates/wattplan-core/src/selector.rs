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

//! Candidate selection: which entry is in effect at a given instant.

use std::cmp::Ordering;

use tracing::debug;
use wattplan_types::{ActiveDirective, QueryDate, QueryTime, ScheduleKey, ScheduleMap, ScheduleValue};

use crate::matcher::{floor_time, is_eligible_at, specificity};

/// An eligible entry together with its ranking attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub key: &'a ScheduleKey,
    pub value: ScheduleValue,
    pub floor_time: String,
    pub specificity: usize,
}

impl Candidate<'_> {
    /// Ranking order, best first:
    /// 1. later floor time
    /// 2. higher specificity
    /// 3. lexicographically smaller key
    fn rank(&self, other: &Self) -> Ordering {
        other
            .floor_time
            .cmp(&self.floor_time)
            .then_with(|| other.specificity.cmp(&self.specificity))
            .then_with(|| self.key.cmp(other.key))
    }

    fn to_directive(&self) -> ActiveDirective {
        ActiveDirective {
            key: self.key.clone(),
            value: self.value,
        }
    }
}

/// All entries eligible at `time` on `date`, best candidate first
pub fn ranked_candidates<'a>(
    map: &'a ScheduleMap,
    date: &QueryDate,
    time: &QueryTime,
) -> Vec<Candidate<'a>> {
    ranked_candidates_at(map, date, time.as_str())
}

fn ranked_candidates_at<'a>(
    map: &'a ScheduleMap,
    date: &QueryDate,
    time: &str,
) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = map
        .iter()
        .filter(|(key, _)| is_eligible_at(key, date, time))
        .map(|(key, value)| Candidate {
            key,
            value: *value,
            floor_time: floor_time(key),
            specificity: specificity(key),
        })
        .collect();

    candidates.sort_by(Candidate::rank);
    candidates
}

/// The entry in effect at `time` on `date`, or `None` if nothing governs it.
///
/// `None` is a valid unscheduled state, not a failure.
pub fn select_winner(
    map: &ScheduleMap,
    date: &QueryDate,
    time: &QueryTime,
) -> Option<ActiveDirective> {
    select_winner_at(map, date, time.as_str())
}

pub(crate) fn select_winner_at(
    map: &ScheduleMap,
    date: &QueryDate,
    time: &str,
) -> Option<ActiveDirective> {
    let candidates = ranked_candidates_at(map, date, time);
    let winner = candidates.first()?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!(
            "{} {}: {} wins over {} other candidate(s) (floor {}, specificity {})",
            date,
            time,
            winner.key,
            candidates.len() - 1,
            winner.floor_time,
            winner.specificity
        );
    }

    Some(winner.to_directive())
}
