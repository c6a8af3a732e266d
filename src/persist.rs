//! The persisted-settings collaborator seam.
//!
//! Per-account facets survive client restarts through a text key/value
//! store owned by the host: numbers as decimal strings, collections as
//! serialized JSON arrays. The engine writes whenever a persisted facet
//! changes and reads the whole set back on an account switch.

use dashmap::DashMap;

/// Persisted key for the tabbed bank items.
pub const BANK_ITEMS_KEY: &str = "bank-items";
/// Persisted key for the total bank price.
pub const BANK_PRICE_KEY: &str = "bank-price";
/// Persisted key for the quest list.
pub const QUESTS_KEY: &str = "quests";
/// Persisted key for the raid invocation list.
pub const INVOCATIONS_KEY: &str = "invocations";
/// Persisted key for the raid invocation level.
pub const INVOCATIONS_RAID_LEVEL_KEY: &str = "invocations-raid-level";
/// Persisted key for the looting bag items.
pub const LOOTING_BAG_ITEMS_KEY: &str = "looting-bag-items";
/// Persisted key for the total looting bag price.
pub const LOOTING_BAG_PRICE_KEY: &str = "looting-bag-price";

/// Every persisted-state key, for bulk maintenance by hosts.
pub const PERSISTED_STATE_KEYS: [&str; 7] = [
    BANK_ITEMS_KEY,
    BANK_PRICE_KEY,
    QUESTS_KEY,
    INVOCATIONS_KEY,
    INVOCATIONS_RAID_LEVEL_KEY,
    LOOTING_BAG_ITEMS_KEY,
    LOOTING_BAG_PRICE_KEY,
];

/// Text key/value persistence owned by the host plugin.
///
/// Implementations must tolerate concurrent access; the engine calls
/// `store` from producer threads and `load` from the reload path.
pub trait SettingsStore: Send + Sync {
    /// Last persisted value under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Persists `value` under `key`, overwriting any previous value.
    fn store(&self, key: &str, value: &str);

    /// Removes any value under `key`.
    fn clear(&self, key: &str);
}

/// Embedded in-memory settings store.
///
/// Reference implementation for embedded usage and tests; hosts with real
/// profile storage implement [`SettingsStore`] over it instead.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: DashMap<String, String>,
}

impl MemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    fn store(&self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn clear(&self, key: &str) {
        self.values.remove(key);
    }
}
