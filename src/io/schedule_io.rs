use std::path::Path;

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::io::store::{KeyValueStore, StoreError};
use crate::model::schedule::WeeklySchedule;

/// The single store key holding the whole weekly schedule
pub const STORE_KEY: &str = "zenweekly-v2-data";

/// Where a loaded schedule came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Parsed from the store
    Stored,
    /// Nothing stored yet; default template
    Missing,
    /// Stored value could not be read or parsed; default template.
    /// `raw` holds the stored text when it could be read.
    Unreadable { reason: String, raw: Option<String> },
}

/// Result of [`load`]: always a usable schedule
#[derive(Debug, Clone)]
pub struct Loaded {
    pub schedule: WeeklySchedule,
    pub origin: LoadOrigin,
}

/// Serialize a schedule to the stored text form
pub fn serialize_schedule(schedule: &WeeklySchedule) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(schedule)
}

/// Parse the stored text form. The top level must be an object keyed by
/// weekday name; anything else is an incompatible shape.
pub fn parse_schedule(text: &str) -> Result<WeeklySchedule, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom(
            "expected an object keyed by weekday name",
        ));
    }
    serde_json::from_value(value)
}

/// Read the schedule from the store, falling back to the default template
/// when the key is missing or its value is unusable. Never fails.
pub fn load(store: &dyn KeyValueStore) -> Loaded {
    let (schedule, origin) = match store.get(STORE_KEY) {
        Ok(Some(raw)) => match parse_schedule(&raw) {
            Ok(schedule) => (schedule, LoadOrigin::Stored),
            Err(e) => (
                WeeklySchedule::from_template(),
                LoadOrigin::Unreadable {
                    reason: e.to_string(),
                    raw: Some(raw),
                },
            ),
        },
        Ok(None) => (WeeklySchedule::from_template(), LoadOrigin::Missing),
        Err(e) => (
            WeeklySchedule::from_template(),
            LoadOrigin::Unreadable {
                reason: e.to_string(),
                raw: None,
            },
        ),
    };
    Loaded { schedule, origin }
}

/// Replace the stored schedule with `schedule`
pub fn save(store: &mut dyn KeyValueStore, schedule: &WeeklySchedule) -> Result<(), StoreError> {
    let text = serialize_schedule(schedule)?;
    store.set(STORE_KEY, &text)
}

/// Record an unreadable store value in the recovery log, preserving the
/// stored text. Does nothing for other origins.
pub fn log_load_fallback(data_dir: &Path, origin: &LoadOrigin) {
    if let LoadOrigin::Unreadable { reason, raw } = origin {
        let entry = RecoveryEntry::now(RecoveryCategory::Parser, "stored schedule unreadable")
            .field("Key", STORE_KEY)
            .field("Error", reason.as_str())
            .field("Action", "started from the default habit template")
            .body(raw.clone().unwrap_or_default());
        log_recovery(data_dir, entry);
    }
}

/// Record a failed save in the recovery log with the schedule that was lost
pub fn log_save_failure(data_dir: &Path, error: &StoreError, schedule: &WeeklySchedule) {
    let entry = RecoveryEntry::now(RecoveryCategory::Write, "store write failed")
        .field("Key", STORE_KEY)
        .field("Error", error.to_string())
        .body(serialize_schedule(schedule).unwrap_or_default());
    log_recovery(data_dir, entry);
}
