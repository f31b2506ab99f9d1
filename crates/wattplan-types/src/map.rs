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

//! The schedule map: every charge/discharge directive keyed by pattern.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use tracing::warn;

use crate::error::ScheduleError;
use crate::key::ScheduleKey;
use crate::value::ScheduleValue;

/// Mapping from schedule key to value.
///
/// Backed by a `BTreeMap`, so iteration order depends only on the contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleMap {
    entries: BTreeMap<ScheduleKey, ScheduleValue>,
}

/// An entry dropped while building a map from untrusted data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub key: String,
    pub error: ScheduleError,
}

impl ScheduleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from raw storage entries, skipping anything malformed.
    ///
    /// A bad key or value never aborts the whole map; each skip is logged and
    /// returned so the caller can surface it.
    pub fn from_raw_entries<I, K>(raw: I) -> (Self, Vec<SkippedEntry>)
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        let mut map = Self::new();
        let mut skipped = Vec::new();

        for (raw_key, raw_value) in raw {
            let raw_key = raw_key.into();
            let parsed = ScheduleKey::parse(&raw_key)
                .and_then(|key| ScheduleValue::from_json(&raw_value).map(|value| (key, value)));

            match parsed {
                Ok((key, value)) => {
                    map.insert(key, value);
                }
                Err(error) => {
                    warn!("Skipping schedule entry '{raw_key}': {error}");
                    skipped.push(SkippedEntry {
                        key: raw_key,
                        error,
                    });
                }
            }
        }

        (map, skipped)
    }

    /// Insert or replace an entry, returning the previous value
    pub fn insert(&mut self, key: ScheduleKey, value: ScheduleValue) -> Option<ScheduleValue> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &ScheduleKey) -> Option<ScheduleValue> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &ScheduleKey) -> Option<ScheduleValue> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &ScheduleKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ScheduleKey, ScheduleValue> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, ScheduleKey, ScheduleValue> {
        self.entries.keys()
    }
}

impl FromIterator<(ScheduleKey, ScheduleValue)> for ScheduleMap {
    fn from_iter<T: IntoIterator<Item = (ScheduleKey, ScheduleValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ScheduleMap {
    type Item = (&'a ScheduleKey, &'a ScheduleValue);
    type IntoIter = btree_map::Iter<'a, ScheduleKey, ScheduleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
