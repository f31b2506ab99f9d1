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

//! Schedule resolution engine.
//!
//! Pure functions over an in-memory [`ScheduleMap`] snapshot plus the file
//! persistence collaborator that loads and stores it.

pub mod guard;
pub mod matcher;
pub mod pruning;
pub mod resolver;
pub mod schedule_persistence;
pub mod selector;

pub use guard::{GuardOutcome, LimitState, guard_value};
pub use matcher::{effective_floor_time, is_eligible, matches_date, specificity};
pub use pruning::{CleanupMode, CleanupReport, is_prunable, list_prunable, plan_cleanup};
pub use resolver::{collapse_slots, resolve_day, resolve_days, value_at};
pub use schedule_persistence::{DEFAULT_SCHEDULE_PATH, LoadedSchedule, SchedulePersistence};
pub use selector::{Candidate, ranked_candidates, select_winner};

pub use wattplan_types::*;
