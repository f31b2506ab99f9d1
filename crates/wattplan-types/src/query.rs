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

//! Canonical query arguments: a concrete `YYYYMMDD` date and `HHmm` time.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScheduleError};

/// A concrete calendar date in `YYYYMMDD` form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueryDate {
    raw: String,
    date: NaiveDate,
}

impl QueryDate {
    pub fn parse(raw: &str) -> Result<Self> {
        check_digits(raw, 8, "YYYYMMDD")?;

        let year = digits_value(&raw[..4]);
        let month = digits_value(&raw[4..6]);
        let day = digits_value(&raw[6..]);
        let date = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
            .ok_or_else(|| ScheduleError::query(raw, "not a valid calendar date"))?;

        Ok(Self {
            raw: raw.to_owned(),
            date,
        })
    }

    /// Convert a chrono date; fails only for years outside 0000-9999
    pub fn from_naive(date: NaiveDate) -> Result<Self> {
        let raw = format!("{:04}{:02}{:02}", date.year(), date.month(), date.day());
        Self::parse(&raw)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn to_naive(&self) -> NaiveDate {
        self.date
    }

    /// The following calendar day
    pub fn next_day(&self) -> Option<Self> {
        self.date
            .checked_add_days(Days::new(1))
            .and_then(|d| Self::from_naive(d).ok())
    }
}

/// A clock time in `HHmm` form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueryTime(String);

impl QueryTime {
    pub const MIDNIGHT: &'static str = "0000";

    pub fn parse(raw: &str) -> Result<Self> {
        check_digits(raw, 4, "HHmm")?;

        let hour = digits_value(&raw[..2]);
        let minute = digits_value(&raw[2..]);
        if NaiveTime::from_hms_opt(hour, minute, 0).is_none() {
            return Err(ScheduleError::query(raw, "not a valid clock time"));
        }

        Ok(Self(raw.to_owned()))
    }

    pub fn from_naive(time: NaiveTime) -> Self {
        Self(format!("{:02}{:02}", time.hour(), time.minute()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Split a local date-time into the canonical query pair
pub fn query_instant(at: NaiveDateTime) -> Result<(QueryDate, QueryTime)> {
    Ok((
        QueryDate::from_naive(at.date())?,
        QueryTime::from_naive(at.time()),
    ))
}

fn check_digits(raw: &str, len: usize, shape: &str) -> Result<()> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScheduleError::query(
            raw,
            format!("expected digits only ({shape})"),
        ));
    }
    if raw.len() != len {
        return Err(ScheduleError::query(
            raw,
            format!("expected {len} digits ({shape}), got {}", raw.len()),
        ));
    }
    Ok(())
}

/// Numeric value of an ASCII digit string already checked by `check_digits`
fn digits_value(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

impl fmt::Display for QueryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryDate {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QueryDate {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl fmt::Display for QueryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QueryTime {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<QueryDate> for String {
    fn from(value: QueryDate) -> Self {
        value.raw
    }
}

impl From<QueryTime> for String {
    fn from(value: QueryTime) -> Self {
        value.0
    }
}
