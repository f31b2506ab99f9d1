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

use serde::{Deserialize, Serialize};

use crate::key::ScheduleKey;
use crate::query::QueryDate;
use crate::value::ScheduleValue;

/// One breakpoint of a resolved day: from `time` until the next slot (or the
/// end of the day) the effective directive is `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSlot {
    /// Start of this slot (`HHmm`)
    pub time: String,

    /// Effective value, `None` when no entry governs this time
    pub value: Option<ScheduleValue>,

    /// Entry that contributed the value
    pub source_key: Option<ScheduleKey>,
}

impl ResolvedSlot {
    pub fn unscheduled(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            value: None,
            source_key: None,
        }
    }
}

/// The entry in effect at a queried instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDirective {
    pub key: ScheduleKey,
    pub value: ScheduleValue,
}

/// Resolved breakpoints for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayResolution {
    pub date: QueryDate,
    pub slots: Vec<ResolvedSlot>,
}
