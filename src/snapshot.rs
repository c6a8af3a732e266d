//! The in-memory snapshot store.
//!
//! Holds two concurrent facet maps: the *current* snapshot (facets small
//! enough to deliver whole every tick) and the *cyclic* snapshot (oversized
//! facets persisted across ticks so a partial view can be served
//! mid-rotation). Producers overwrite facet values while the delivery tick
//! reads; each facet value is replaced atomically as a whole, so readers
//! never observe a torn update.
//!
//! One store is created per plugin session and lives until logout or an
//! account switch; it is injected into the scheduler, filter, and updater
//! rather than being a process-wide singleton.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::facet::Facet;

/// Concurrent holder of the current and cyclic facet snapshots.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: DashMap<Facet, Value>,
    cyclic: DashMap<Facet, Value>,

    /// Last instant the player was observed inside the tracked raid zone.
    /// Session behaviour state, not itself synced.
    last_raid_presence: RwLock<Option<DateTime<Utc>>>,
}

impl SnapshotStore {
    /// Creates an empty store for a new session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a facet value in the current snapshot. Last write wins;
    /// there is no ordering guarantee across different facets.
    pub fn set_facet(&self, facet: Facet, value: Value) {
        self.current.insert(facet, value);
    }

    /// Overwrites a facet value in the cyclic snapshot.
    pub fn set_cyclic_facet(&self, facet: Facet, value: Value) {
        self.cyclic.insert(facet, value);
    }

    /// Cloned value of one current facet.
    #[must_use]
    pub fn facet_value(&self, facet: Facet) -> Option<Value> {
        self.current.get(&facet).map(|entry| entry.value().clone())
    }

    /// Cloned value of one cyclic facet.
    #[must_use]
    pub fn cyclic_value(&self, facet: Facet) -> Option<Value> {
        self.cyclic.get(&facet).map(|entry| entry.value().clone())
    }

    /// Whether the cyclic snapshot holds a value for the facet.
    #[must_use]
    pub fn has_cyclic(&self, facet: Facet) -> bool {
        self.cyclic.contains_key(&facet)
    }

    /// Removes a facet from the current snapshot.
    pub fn clear_facet(&self, facet: Facet) {
        self.current.remove(&facet);
    }

    /// Removes a facet from the cyclic snapshot.
    pub fn clear_cyclic_facet(&self, facet: Facet) {
        self.cyclic.remove(&facet);
    }

    /// Deep copy of the current snapshot keyed by wire key.
    ///
    /// The returned map shares nothing with the store, so downstream
    /// filter stages can mutate it freely.
    #[must_use]
    pub fn current_snapshot(&self) -> Map<String, Value> {
        let mut snapshot = Map::new();
        for entry in &self.current {
            snapshot.insert(entry.key().key().to_string(), entry.value().clone());
        }
        snapshot
    }

    /// Discards both snapshots, returning the store to its empty state.
    /// Used on logout/disconnect.
    pub fn reset(&self) {
        self.current.clear();
        self.cyclic.clear();
        *self.last_raid_presence.write() = None;
    }

    /// Records that the player is inside the tracked raid zone right now.
    pub fn mark_raid_presence(&self) {
        self.mark_raid_presence_at(Utc::now());
    }

    /// Records raid-zone presence at an explicit instant. Hosts that
    /// timestamp their game events call this variant.
    pub fn mark_raid_presence_at(&self, at: DateTime<Utc>) {
        *self.last_raid_presence.write() = Some(at);
    }

    /// Whether the player was inside the raid zone within the debounce
    /// window ending now.
    #[must_use]
    pub fn raid_presence_within(&self, window: Duration) -> bool {
        self.last_raid_presence
            .read()
            .is_some_and(|last| Utc::now() - last < window)
    }
}
