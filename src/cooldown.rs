//! Notification deduplication
//!
//! A time-windowed gate keyed on aircraft identity + tag set. The map only
//! grows with key cardinality over the process lifetime, which is bounded in
//! practice by local traffic; entries are never evicted.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::classifier::Tag;

/// Deduplication key: one aircraft in one behavioral state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey(String);

impl AlertKey {
    /// Build a key from an aircraft's hex identity and its current tags
    pub fn new(hex: &str, tags: &[Tag]) -> Self {
        let mut key = String::from(hex);
        for tag in tags {
            key.push(',');
            key.push_str(&tag.to_string());
        }
        Self(key)
    }
}

impl std::fmt::Display for AlertKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time-windowed alert deduplicator
///
/// Owned by the watcher rather than living in a global so its behavior is
/// testable in isolation.
#[derive(Debug)]
pub struct CooldownGate {
    window: Duration,
    last_alert: HashMap<AlertKey, DateTime<Utc>>,
}

impl CooldownGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_alert: HashMap::new(),
        }
    }

    /// Check whether an alert for `key` may fire at `now`
    ///
    /// Returns true for a never-seen key, or once the window has fully
    /// elapsed since the last *successful* pass; either way `now` is
    /// recorded. A suppressed call leaves the recorded timestamp untouched,
    /// so repeated matches cannot push the window forward indefinitely.
    pub fn should_notify(&mut self, key: AlertKey, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_alert.get(&key)
            && now.signed_duration_since(*last) < self.window
        {
            return false;
        }
        self.last_alert.insert(key, now);
        true
    }

    /// Number of distinct keys seen so far
    pub fn tracked_keys(&self) -> usize {
        self.last_alert.len()
    }
}
