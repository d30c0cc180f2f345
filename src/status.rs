//! Point-in-time snapshots of engine-reported sync status.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key under which every snapshot carries the engine's summary status line.
pub const SUMMARY_STATUS_KEY: &str = "Summary";

/// An immutable key/value view of sync status at a single point in time.
///
/// Snapshots are built with [`StatusSnapshot::new`] and [`StatusSnapshot::with`]
/// and never mutated afterwards; the summary key is present by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    values: BTreeMap<String, String>,
    captured_at: DateTime<Utc>,
}

impl StatusSnapshot {
    /// Create a snapshot with the required summary status.
    pub fn new(summary: impl Into<String>) -> Self {
        let mut values = BTreeMap::new();
        values.insert(SUMMARY_STATUS_KEY.to_string(), summary.into());
        Self {
            values,
            captured_at: Utc::now(),
        }
    }

    /// Add a key/value pair, consuming and returning the snapshot.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// The engine's summary status line.
    pub fn summary(&self) -> &str {
        self.values
            .get(SUMMARY_STATUS_KEY)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Look up a status value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether the snapshot carries the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of key/value pairs captured.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the snapshot carries no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// When the snapshot was captured.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// JSON rendering for diagnostics and logs.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
