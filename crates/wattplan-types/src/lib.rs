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

pub mod error;
pub mod key;
pub mod map;
pub mod query;
pub mod slot;
pub mod value;

// Re-export common types for convenience
pub use error::ScheduleError;
pub use key::ScheduleKey;
pub use map::{ScheduleMap, SkippedEntry};
pub use query::{QueryDate, QueryTime, query_instant};
pub use slot::{ActiveDirective, DayResolution, ResolvedSlot};
pub use value::ScheduleValue;
