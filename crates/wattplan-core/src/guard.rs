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

//! Battery limit guard applied to the resolved directive before it reaches
//! the device.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use wattplan_types::ScheduleValue;

/// Power assumed for the net-zero modes when checking limits (watts).
/// `NetZero` counts as a discharge and `NetZeroPlus` as a charge.
pub const NETZERO_LIMIT_PROBE_W: i32 = 250;

/// Battery level relative to the configured charge window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitState {
    #[default]
    Normal,
    /// At or above the maximum charge level, charging not allowed
    AtMaximum,
    /// At or below the minimum charge level, discharging not allowed
    AtMinimum,
}

impl LimitState {
    /// Classify a state of charge (%) against the min/max charge levels
    pub fn from_soc(soc: f32, min_level: f32, max_level: f32) -> Self {
        if soc <= min_level {
            Self::AtMinimum
        } else if soc >= max_level {
            Self::AtMaximum
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for LimitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::AtMaximum => write!(f, "At maximum charge level"),
            Self::AtMinimum => write!(f, "At minimum charge level"),
        }
    }
}

/// Result of guarding a directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardOutcome {
    /// Directive from the schedule (`None` when unscheduled)
    pub requested: Option<ScheduleValue>,
    /// What the device should actually do
    pub applied: ScheduleValue,
    /// Why `applied` differs from `requested`, if it does
    pub override_reason: Option<String>,
}

impl GuardOutcome {
    pub fn is_overridden(&self) -> bool {
        self.override_reason.is_some()
    }
}

/// Signed power used for limit checks; positive charges
pub fn limit_probe_watts(value: ScheduleValue) -> i32 {
    match value {
        ScheduleValue::Watts(w) => w,
        ScheduleValue::NetZero => -NETZERO_LIMIT_PROBE_W,
        ScheduleValue::NetZeroPlus => NETZERO_LIMIT_PROBE_W,
    }
}

/// Apply battery limits to a resolved directive.
///
/// Unscheduled time runs idle. A charge at maximum level or a discharge at
/// minimum level is replaced with idle.
pub fn guard_value(requested: Option<ScheduleValue>, state: LimitState) -> GuardOutcome {
    let Some(value) = requested else {
        return GuardOutcome {
            requested,
            applied: ScheduleValue::IDLE,
            override_reason: None,
        };
    };

    let probe = limit_probe_watts(value);
    let override_reason = match state {
        LimitState::AtMaximum if probe > 0 => {
            Some(format!("Battery at maximum charge level, preventing charge ({value})"))
        }
        LimitState::AtMinimum if probe < 0 => Some(format!(
            "Battery at minimum charge level, preventing discharge ({value})"
        )),
        LimitState::Normal | LimitState::AtMaximum | LimitState::AtMinimum => None,
    };

    if let Some(reason) = &override_reason {
        debug!("{reason}");
    }

    GuardOutcome {
        requested,
        applied: if override_reason.is_some() {
            ScheduleValue::IDLE
        } else {
            value
        },
        override_reason,
    }
}
