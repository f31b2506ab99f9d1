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

//! Schedule keys: 12-character `YYYYMMDDHHmm` patterns where any position
//! may be the `*` wildcard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScheduleError};

/// Total key length in characters
pub const KEY_LENGTH: usize = 12;

/// Length of the date component (`YYYYMMDD`)
pub const DATE_PATTERN_LENGTH: usize = 8;

/// Length of the time component (`HHmm`)
pub const TIME_PATTERN_LENGTH: usize = 4;

/// Wildcard character, matches any digit at its position
pub const WILDCARD: char = '*';

/// A validated schedule key.
///
/// Ordering is plain lexicographic order of the underlying string, so `*`
/// sorts before every digit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleKey(String);

impl ScheduleKey {
    /// Parse and validate a raw key
    pub fn parse(raw: &str) -> Result<Self> {
        if let Some(bad) = raw.chars().find(|c| !is_pattern_char(*c)) {
            return Err(ScheduleError::key(
                raw,
                format!("invalid character '{bad}', only digits and '{WILDCARD}' are allowed"),
            ));
        }

        // All characters are ASCII at this point, so byte length == char count
        if raw.len() != KEY_LENGTH {
            return Err(ScheduleError::key(
                raw,
                format!("expected {KEY_LENGTH} characters, got {}", raw.len()),
            ));
        }

        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Date component, positions 0..8
    pub fn date_pattern(&self) -> &str {
        &self.0[..DATE_PATTERN_LENGTH]
    }

    /// Time-of-day component, positions 8..12
    pub fn time_pattern(&self) -> &str {
        &self.0[DATE_PATTERN_LENGTH..]
    }

    /// Number of non-wildcard characters (0-12)
    pub fn specificity(&self) -> usize {
        self.0.chars().filter(|c| *c != WILDCARD).count()
    }

    /// True when the date component contains a wildcard, so the entry can
    /// match more than one day
    pub fn is_recurring(&self) -> bool {
        self.date_pattern().contains(WILDCARD)
    }
}

fn is_pattern_char(c: char) -> bool {
    c == WILDCARD || c.is_ascii_digit()
}

impl fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ScheduleKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ScheduleKey {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ScheduleKey> for String {
    fn from(key: ScheduleKey) -> Self {
        key.0
    }
}
