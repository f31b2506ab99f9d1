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

//! Error types for schedule data and queries

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A schedule key is not 12 characters of digits and `*`
    #[error("malformed schedule key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },

    /// A query date or time is not in canonical digit-only form
    #[error("malformed query '{input}': {reason}")]
    MalformedQuery { input: String, reason: String },

    /// A schedule value is neither watts nor one of the net-zero tokens
    #[error("malformed schedule value '{0}': expected an integer, \"netzero\" or \"netzero+\"")]
    MalformedValue(String),
}

impl ScheduleError {
    pub(crate) fn key(key: &str, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn query(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedQuery {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
