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

//! Persistence layer for the charge schedule.
//!
//! The schedule file is a flat JSON object of 12-character keys to values.
//! Entries that fail validation are kept on disk untouched and reported on
//! load; only well-formed entries take part in resolution.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};
use wattplan_types::{QueryDate, ScheduleKey, ScheduleMap, ScheduleValue, SkippedEntry};

use crate::pruning::{CleanupMode, CleanupReport, plan_cleanup};

/// Default path for the schedule file.
/// Relative so it works both in development and in the container.
pub const DEFAULT_SCHEDULE_PATH: &str = "./data/charge_schedule.json";

/// A schedule snapshot read from disk
#[derive(Debug, Clone)]
pub struct LoadedSchedule {
    pub map: ScheduleMap,
    /// Entries present in the file but not usable
    pub skipped: Vec<SkippedEntry>,
}

/// Schedule file persistence manager.
#[derive(Debug, Clone)]
pub struct SchedulePersistence {
    /// Path to the schedule file.
    schedule_path: PathBuf,

    /// Path where pruned entries are archived.
    archive_path: PathBuf,
}

impl SchedulePersistence {
    /// Create a persistence manager; the archive lives next to the schedule.
    pub fn new(schedule_path: impl Into<PathBuf>) -> Self {
        let schedule_path = schedule_path.into();
        let archive_path = schedule_path.with_extension("archive.json");
        Self {
            schedule_path,
            archive_path,
        }
    }

    #[must_use]
    pub fn with_archive_path(mut self, archive_path: impl Into<PathBuf>) -> Self {
        self.archive_path = archive_path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.schedule_path
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn exists(&self) -> bool {
        self.schedule_path.exists()
    }

    /// Load the schedule.
    ///
    /// Returns an empty map if the file doesn't exist. The whole file is read
    /// at once so callers always resolve against one consistent snapshot.
    pub fn load(&self) -> Result<LoadedSchedule> {
        let raw = read_object(&self.schedule_path)?;
        let (map, skipped) = ScheduleMap::from_raw_entries(raw);

        if !skipped.is_empty() {
            warn!(
                "{} malformed schedule entries ignored in {}",
                skipped.len(),
                self.schedule_path.display()
            );
        }

        info!(
            "Loaded {} schedule entries from {}",
            map.len(),
            self.schedule_path.display()
        );

        Ok(LoadedSchedule { map, skipped })
    }

    /// Replace the schedule file with `map`.
    ///
    /// Uses atomic write (temp file + rename) to prevent corruption.
    pub fn save(&self, map: &ScheduleMap) -> Result<()> {
        let value = serde_json::to_value(map).context("Failed to serialize schedule")?;
        let Value::Object(object) = value else {
            bail!("Schedule did not serialize to a JSON object");
        };
        write_object(&self.schedule_path, &object)?;

        info!(
            "Saved {} schedule entries to {}",
            map.len(),
            self.schedule_path.display()
        );
        Ok(())
    }

    /// Insert or replace one entry, returning the previous value if it was valid.
    pub fn set_entry(&self, key: &ScheduleKey, value: ScheduleValue) -> Result<Option<ScheduleValue>> {
        let mut raw = read_object(&self.schedule_path)?;
        let json = serde_json::to_value(value).context("Failed to serialize schedule value")?;
        let previous = raw.insert(key.to_string(), json);
        write_object(&self.schedule_path, &raw)?;

        info!("Set schedule entry {key} = {value}");
        Ok(previous.and_then(|v| ScheduleValue::from_json(&v).ok()))
    }

    /// Delete one entry. Returns false if it wasn't present.
    pub fn delete_entry(&self, key: &ScheduleKey) -> Result<bool> {
        let mut raw = read_object(&self.schedule_path)?;
        if raw.remove(key.as_str()).is_none() {
            return Ok(false);
        }
        write_object(&self.schedule_path, &raw)?;

        info!("Deleted schedule entry {key}");
        Ok(true)
    }

    /// Find entries dated before `as_of` and, in delete mode, archive and
    /// remove them. Simulate mode writes nothing and reports the same keys.
    pub fn cleanup(&self, as_of: &QueryDate, mode: CleanupMode) -> Result<CleanupReport> {
        let mut raw = read_object(&self.schedule_path)?;
        let (map, _) = ScheduleMap::from_raw_entries(raw.clone());
        let report = plan_cleanup(&map, as_of, mode);

        if mode == CleanupMode::Simulate || report.keys.is_empty() {
            info!(
                "Cleanup ({mode}) as of {as_of}: {} prunable entries",
                report.count
            );
            return Ok(report);
        }

        let mut archive = read_object(&self.archive_path)?;
        for key in &report.keys {
            if let Some(value) = raw.remove(key.as_str()) {
                archive.insert(key.to_string(), value);
            }
        }

        // Archive is written before the schedule, so a removed entry is always in one of the two files
        write_object(&self.archive_path, &archive)?;
        write_object(&self.schedule_path, &raw)?;

        info!(
            "Cleanup ({mode}) as of {as_of}: removed {} entries, archived to {}",
            report.count,
            self.archive_path.display()
        );
        Ok(report)
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        info!("Schedule file not found at {}, starting empty", path.display());
        return Ok(Map::new());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule from {}", path.display()))?;

    if contents.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(&contents)
        .with_context(|| format!("Failed to parse schedule from {}", path.display()))?
    {
        Value::Object(object) => Ok(object),
        other => bail!(
            "Schedule file {} must contain a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

fn write_object(path: &Path, object: &Map<String, Value>) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(object).context("Failed to serialize schedule")?;

    // Atomic write: unique temp file in the target directory, then rename
    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    temp.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write temp file {}", temp.path().display()))?;
    temp.persist(path)
        .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;

    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(raw: &str) -> ScheduleKey {
        ScheduleKey::parse(raw).unwrap()
    }

    #[test]
    fn test_load_nonexistent_file() {
        let dir = tempdir().unwrap();
        let persistence = SchedulePersistence::new(dir.path().join("missing.json"));

        let loaded = persistence.load().unwrap();
        assert!(loaded.map.is_empty());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let persistence = SchedulePersistence::new(dir.path().join("data/schedule.json"));

        let mut map = ScheduleMap::new();
        map.insert(key("202512220000"), ScheduleValue::Watts(-498));
        map.insert(key("********0800"), ScheduleValue::NetZero);

        persistence.save(&map).unwrap();
        assert!(persistence.exists());
        let files: Vec<_> = fs::read_dir(dir.path().join("data")).unwrap().collect();
        assert_eq!(files.len(), 1);

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.map, map);
    }

    #[test]
    fn test_concurrent_writers_leave_a_complete_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schedule.json");

        std::thread::scope(|scope| {
            for watts in 0..8 {
                let path = path.clone();
                scope.spawn(move || {
                    let persistence = SchedulePersistence::new(path);
                    let mut map = ScheduleMap::new();
                    map.insert(key("********0000"), ScheduleValue::Watts(watts * 100));
                    for _ in 0..10 {
                        persistence.save(&map).unwrap();
                    }
                });
            }
        });

        let loaded = SchedulePersistence::new(&path).load().unwrap();
        assert_eq!(loaded.map.len(), 1);
        assert!(loaded.skipped.is_empty());

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_malformed_entries_reported_and_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        fs::write(
            &path,
            r#"{"202512220000": -498, "bogus": 5, "********0800": "turbo"}"#,
        )
        .unwrap();
        let persistence = SchedulePersistence::new(&path);

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.map.len(), 1);
        assert_eq!(loaded.skipped.len(), 2);

        // A targeted edit must not drop entries it did not touch
        persistence
            .set_entry(&key("********1200"), ScheduleValue::NetZeroPlus)
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("bogus"));
        assert!(contents.contains("turbo"));
        assert!(contents.contains("netzero+"));
    }

    #[test]
    fn test_rejects_non_object_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = SchedulePersistence::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn test_set_and_delete_entry() {
        let dir = tempdir().unwrap();
        let persistence = SchedulePersistence::new(dir.path().join("schedule.json"));

        let previous = persistence
            .set_entry(&key("20251222****"), ScheduleValue::IDLE)
            .unwrap();
        assert_eq!(previous, None);

        let previous = persistence
            .set_entry(&key("20251222****"), ScheduleValue::Watts(250))
            .unwrap();
        assert_eq!(previous, Some(ScheduleValue::IDLE));

        assert!(persistence.delete_entry(&key("20251222****")).unwrap());
        assert!(!persistence.delete_entry(&key("20251222****")).unwrap());
        assert!(persistence.load().unwrap().map.is_empty());
    }

    #[test]
    fn test_cleanup_simulate_writes_nothing() {
        let dir = tempdir().unwrap();
        let persistence = SchedulePersistence::new(dir.path().join("schedule.json"));
        let mut map = ScheduleMap::new();
        map.insert(key("202501010000"), ScheduleValue::Watts(100));
        map.insert(key("****01010000"), ScheduleValue::IDLE);
        persistence.save(&map).unwrap();

        let as_of = QueryDate::parse("20250102").unwrap();
        let report = persistence.cleanup(&as_of, CleanupMode::Simulate).unwrap();

        assert_eq!(report.count, 1);
        assert_eq!(report.keys, vec![key("202501010000")]);
        assert_eq!(persistence.load().unwrap().map.len(), 2);
        assert!(!persistence.archive_path().exists());
    }

    #[test]
    fn test_cleanup_delete_archives_removed_entries() {
        let dir = tempdir().unwrap();
        let persistence = SchedulePersistence::new(dir.path().join("schedule.json"));
        let mut map = ScheduleMap::new();
        map.insert(key("202412310800"), ScheduleValue::NetZero);
        map.insert(key("202501010000"), ScheduleValue::Watts(100));
        map.insert(key("202501020000"), ScheduleValue::Watts(-100));
        map.insert(key("****01010000"), ScheduleValue::IDLE);
        persistence.save(&map).unwrap();

        let as_of = QueryDate::parse("20250102").unwrap();
        let simulated = persistence.cleanup(&as_of, CleanupMode::Simulate).unwrap();
        let deleted = persistence.cleanup(&as_of, CleanupMode::Delete).unwrap();
        assert_eq!(simulated.keys, deleted.keys);
        assert_eq!(deleted.count, 2);

        let remaining = persistence.load().unwrap().map;
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains_key(&key("202501020000")));
        assert!(remaining.contains_key(&key("****01010000")));

        let archived = SchedulePersistence::new(persistence.archive_path())
            .load()
            .unwrap()
            .map;
        assert_eq!(archived.len(), 2);
        assert_eq!(archived.get(&key("202412310800")), Some(ScheduleValue::NetZero));
    }
}
