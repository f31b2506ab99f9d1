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

//! Schedule values: fixed watts or one of the net-zero modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScheduleError};

const NETZERO_TOKEN: &str = "netzero";
const NETZERO_PLUS_TOKEN: &str = "netzero+";

/// A charge/discharge directive.
///
/// JSON shape is an integer for `Watts` and the string tokens `"netzero"` /
/// `"netzero+"` for the two dynamic modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawScheduleValue", into = "RawScheduleValue")]
pub enum ScheduleValue {
    /// Fixed power in watts: positive charges, negative discharges, zero idles
    Watts(i32),
    /// Discharge to match household load (zero feed-in)
    NetZero,
    /// Charge only from surplus solar, never discharge
    NetZeroPlus,
}

impl ScheduleValue {
    pub const IDLE: Self = Self::Watts(0);

    /// Build a value from an untyped JSON scalar
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| ScheduleError::MalformedValue(n.to_string()))
                .and_then(Self::from_i64),
            serde_json::Value::String(s) => s.parse(),
            other => Err(ScheduleError::MalformedValue(other.to_string())),
        }
    }

    fn from_i64(watts: i64) -> Result<Self> {
        i32::try_from(watts)
            .map(Self::Watts)
            .map_err(|_| ScheduleError::MalformedValue(watts.to_string()))
    }
}

impl fmt::Display for ScheduleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Watts(w) => write!(f, "{w}"),
            Self::NetZero => f.write_str(NETZERO_TOKEN),
            Self::NetZeroPlus => f.write_str(NETZERO_PLUS_TOKEN),
        }
    }
}

impl FromStr for ScheduleValue {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            NETZERO_TOKEN => Ok(Self::NetZero),
            NETZERO_PLUS_TOKEN => Ok(Self::NetZeroPlus),
            other => other
                .parse::<i32>()
                .map(Self::Watts)
                .map_err(|_| ScheduleError::MalformedValue(s.to_owned())),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawScheduleValue {
    Watts(i64),
    Token(String),
}

impl TryFrom<RawScheduleValue> for ScheduleValue {
    type Error = ScheduleError;

    fn try_from(raw: RawScheduleValue) -> Result<Self> {
        match raw {
            RawScheduleValue::Watts(w) => Self::from_i64(w),
            RawScheduleValue::Token(token) => token.parse(),
        }
    }
}

impl From<ScheduleValue> for RawScheduleValue {
    fn from(value: ScheduleValue) -> Self {
        match value {
            ScheduleValue::Watts(w) => Self::Watts(i64::from(w)),
            ScheduleValue::NetZero => Self::Token(NETZERO_TOKEN.to_owned()),
            ScheduleValue::NetZeroPlus => Self::Token(NETZERO_PLUS_TOKEN.to_owned()),
        }
    }
}
