//! Product cooldown tracking with lazy expiry.
//!
//! Cooldowns arrive from two racing sources: a fast-path notification
//! channel and a slower periodic poller. The tracker therefore accepts
//! concurrent inserts with last-write-wins semantics and filters expired
//! entries at read time; nothing is ever proactively swept.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::{Map, Value};

/// Concurrent mapping from product identifier to cooldown expiry instant.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    until: DashMap<String, DateTime<Utc>>,
}

impl CooldownTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cooldown for a product. A racing writer to the same key
    /// wins by arriving last; readers never observe a partial entry.
    pub fn set(&self, product_id: impl Into<String>, until: DateTime<Utc>) {
        self.until.insert(product_id.into(), until);
    }

    /// All cooldowns whose expiry is strictly after `now`, sorted by
    /// product id for deterministic serialization. Expired entries are
    /// skipped, not removed.
    #[must_use]
    pub fn active_at(&self, now: DateTime<Utc>) -> BTreeMap<String, DateTime<Utc>> {
        self.until
            .iter()
            .filter(|entry| *entry.value() > now)
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Wire object of active cooldowns: `{product_id: rfc3339_expiry}`.
    #[must_use]
    pub fn to_wire(&self, now: DateTime<Utc>) -> Value {
        let mut object = Map::new();
        for (product_id, until) in self.active_at(now) {
            object.insert(product_id, Value::String(until.to_rfc3339()));
        }
        Value::Object(object)
    }

    /// Number of tracked entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.until.len()
    }

    /// True when no entries are tracked at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.until.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn expired_entries_are_dropped_at_read_time() {
        let tracker = CooldownTracker::new();
        let now = Utc::now();
        tracker.set("product-a", now + Duration::seconds(10));
        tracker.set("product-b", now - Duration::seconds(5));

        let active = tracker.active_at(now);
        assert_eq!(active.len(), 1);
        assert!(active.contains_key("product-a"));

        // Lazy eviction: the expired entry stays tracked.
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn expiry_must_be_strictly_in_the_future() {
        let tracker = CooldownTracker::new();
        let now = Utc::now();
        tracker.set("product-a", now);
        assert!(tracker.active_at(now).is_empty());
    }

    #[test]
    fn last_write_wins_per_key() {
        let tracker = CooldownTracker::new();
        let now = Utc::now();
        tracker.set("product-a", now + Duration::seconds(10));
        tracker.set("product-a", now + Duration::seconds(60));

        let active = tracker.active_at(now);
        assert_eq!(active["product-a"], now + Duration::seconds(60));
    }

    #[test]
    fn wire_object_uses_rfc3339_expiries() {
        let tracker = CooldownTracker::new();
        let now = Utc::now();
        let until = now + Duration::seconds(30);
        tracker.set("product-a", until);

        let wire = tracker.to_wire(now);
        assert_eq!(
            wire.get("product-a").and_then(Value::as_str),
            Some(until.to_rfc3339().as_str())
        );
    }
}
