//! The write-side facet update API.
//!
//! Producers (game-event callbacks, periodic pollers) push new facet values
//! through one setter per facet. Each setter normalizes its input, writes
//! the wire shape into the [`SnapshotStore`], and persists per-account
//! facets through the [`SettingsStore`]. No setter panics or propagates an
//! error: invalid input is logged and the facet keeps its previous value.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::warn;

use crate::config::{FeatureFlags, Theme, Visibility, MAX_OVERLAY_TOP_POSITION, MIN_OVERLAY_TOP_POSITION};
use crate::cooldown::CooldownTracker;
use crate::error::{InputError, PersistError, SyncResult};
use crate::facet::Facet;
use crate::item::{items_to_wire, tabbed_bank_to_wire, ItemStack};
use crate::persist::{
    SettingsStore, BANK_ITEMS_KEY, BANK_PRICE_KEY, INVOCATIONS_KEY, INVOCATIONS_RAID_LEVEL_KEY,
    LOOTING_BAG_ITEMS_KEY, LOOTING_BAG_PRICE_KEY, QUESTS_KEY,
};
use crate::snapshot::SnapshotStore;

/// Upper bound on a synthetic item quantity under the stress injector.
pub const MAX_ITEM_QUANTITY: i32 = 8_000;

/// Upper bound on a synthetic fight statistic under the stress injector.
pub const MAX_FIGHT_STATISTIC_VALUE: i32 = 700;

/// Maximum skill experience the extension renders.
pub const MAX_SKILL_EXPERIENCE: i32 = 200_000_000;

/// Maximum (virtual) skill level the extension renders.
pub const MAX_SKILL_LEVEL: i32 = 126;

/// Write-side entry point for all facet producers.
pub struct FacetUpdater {
    store: Arc<SnapshotStore>,
    settings: Arc<dyn SettingsStore>,
}

impl FacetUpdater {
    /// Creates an updater over the session's store and the host's
    /// persisted settings.
    #[must_use]
    pub fn new(store: Arc<SnapshotStore>, settings: Arc<dyn SettingsStore>) -> Self {
        Self { store, settings }
    }

    /// Seeds the facets that receive no game event while empty: layout
    /// configuration, empty containers, and zero weight.
    pub fn seed_defaults(&self, flags: &dyn FeatureFlags) {
        self.set_overlay_top_position(flags.overlay_top_position());
        self.set_virtual_levels_enabled(flags.virtual_levels_enabled());
        self.set_theme(flags.theme());
        self.set_visibility(flags.visibility());
        self.set_inventory_items(None, 0);
        self.set_equipment_items(None, 0);
        self.set_weight(0);
    }

    pub fn set_player_name(&self, name: &str) {
        self.store
            .set_facet(Facet::PlayerName, Value::String(name.to_string()));
    }

    pub fn set_account_hash(&self, hash: i64) {
        self.store.set_facet(Facet::AccountHash, json!(hash));
    }

    /// Absent account types happen while the client is booting; the facet
    /// keeps its previous value.
    pub fn set_account_type(&self, account_type: Option<&str>) {
        let Some(account_type) = account_type else {
            return;
        };
        self.store
            .set_facet(Facet::AccountType, Value::String(account_type.to_string()));
    }

    pub fn set_region_id(&self, region_id: i64) {
        self.store.set_facet(Facet::RegionId, json!(region_id));
    }

    /// Clamps to the allowed vertical range before storing.
    pub fn set_overlay_top_position(&self, percent: i64) {
        let clamped = percent.clamp(MIN_OVERLAY_TOP_POSITION, MAX_OVERLAY_TOP_POSITION);
        self.store.set_facet(Facet::OverlayTopPosition, json!(clamped));
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store
            .set_facet(Facet::Theme, Value::String(theme.key().to_string()));
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        self.store
            .set_facet(Facet::Visibility, Value::String(visibility.key().to_string()));
    }

    pub fn set_weight(&self, weight: i64) {
        self.store.set_facet(Facet::Weight, json!(weight));
    }

    pub fn set_virtual_levels_enabled(&self, enabled: bool) {
        self.store
            .set_facet(Facet::VirtualLevelsEnabled, Value::Bool(enabled));
    }

    /// The input slice may be owned by the render path; it is copied into
    /// the wire array and never mutated.
    pub fn set_skill_experiences(&self, experiences: &[i32]) {
        self.store
            .set_facet(Facet::SkillExperiences, int_array_to_wire(experiences));
    }

    /// See [`Self::set_skill_experiences`] on input ownership.
    pub fn set_boosted_skill_levels(&self, levels: &[i32]) {
        self.store
            .set_facet(Facet::BoostedSkillLevels, int_array_to_wire(levels));
    }

    /// Fight statistics are produced fully formed by the combat tracker
    /// and pass through opaque.
    pub fn set_fight_statistics(&self, statistics: Value) {
        self.store.set_facet(Facet::FightStatistics, statistics);
    }

    pub fn set_seasonal_items(&self, items: Value) {
        self.store.set_facet(Facet::SeasonalItems, items);
    }

    pub fn set_inventory_items(&self, items: Option<&[ItemStack]>, total_price: i64) {
        self.store
            .set_facet(Facet::InventoryItems, items_to_wire(items));
        self.store.set_facet(Facet::InventoryPrice, json!(total_price));
    }

    pub fn set_equipment_items(&self, items: Option<&[ItemStack]>, total_price: i64) {
        self.store
            .set_facet(Facet::EquipmentItems, items_to_wire(items));
        self.store.set_facet(Facet::EquipmentPrice, json!(total_price));
    }

    /// Looting bag contents survive account switches; both facets persist.
    pub fn set_looting_bag_items(&self, items: Option<&[ItemStack]>, total_price: i64) {
        let wire = items_to_wire(items);
        self.settings.store(LOOTING_BAG_ITEMS_KEY, &wire.to_string());
        self.settings
            .store(LOOTING_BAG_PRICE_KEY, &total_price.to_string());
        self.store.set_facet(Facet::LootingBagItems, wire);
        self.store.set_facet(Facet::LootingBagPrice, json!(total_price));
    }

    /// Converts the client's flat bank report (items plus per-tab counts)
    /// into the tabbed wire shape, with the untabbed remainder prepended.
    pub fn set_bank_items(&self, items: &[ItemStack], tab_amounts: &[usize]) {
        self.set_tabbed_bank_items(tabbed_bank_to_wire(items, tab_amounts));
    }

    /// Stores an already-tabbed bank collection; the reload path re-enters
    /// here with the parsed persisted value.
    pub fn set_tabbed_bank_items(&self, tabs: Value) {
        self.settings.store(BANK_ITEMS_KEY, &tabs.to_string());
        self.store.set_cyclic_facet(Facet::BankTabbedItems, tabs);
    }

    pub fn set_bank_price(&self, total_price: i64) {
        self.settings.store(BANK_PRICE_KEY, &total_price.to_string());
        self.store
            .set_cyclic_facet(Facet::BankPrice, json!(total_price));
    }

    pub fn set_quests(&self, quests: Value) {
        self.settings.store(QUESTS_KEY, &quests.to_string());
        self.store.set_cyclic_facet(Facet::Quests, quests);
    }

    pub fn set_invocations(&self, invocations: Value) {
        self.settings.store(INVOCATIONS_KEY, &invocations.to_string());
        self.store.set_cyclic_facet(Facet::Invocations, invocations);
    }

    /// The raid level arrives as widget text; an unparseable value leaves
    /// the facet untouched.
    pub fn set_invocations_raid_level(&self, raid_level: &str) {
        if let Err(error) = self.try_set_invocations_raid_level(raid_level) {
            warn!(raw = raid_level, %error, "could not set invocations raid level");
        }
    }

    fn try_set_invocations_raid_level(&self, raid_level: &str) -> SyncResult<()> {
        let parsed: i64 =
            raid_level
                .trim()
                .parse()
                .map_err(|_| InputError::UnparseableNumber {
                    facet: Facet::InvocationsRaidLevel.key(),
                    raw: raid_level.to_string(),
                })?;
        self.settings
            .store(INVOCATIONS_RAID_LEVEL_KEY, &parsed.to_string());
        self.store
            .set_cyclic_facet(Facet::InvocationsRaidLevel, json!(parsed));
        Ok(())
    }

    /// Channel-point rewards are always-on cyclic data; they survive even
    /// an ineligible session.
    pub fn set_channel_point_rewards(&self, rewards: Value) {
        self.store
            .set_cyclic_facet(Facet::ChannelPointRewards, rewards);
    }

    /// Serializes the currently active product cooldowns; entries already
    /// expired at this moment are dropped silently.
    pub fn sync_product_cooldowns(&self, cooldowns: &CooldownTracker) {
        self.store
            .set_facet(Facet::ProductCooldowns, cooldowns.to_wire(Utc::now()));
    }

    /// An absent or already-expired shared cooldown removes the facet from
    /// the snapshot entirely.
    pub fn set_shared_cooldown(&self, until: Option<DateTime<Utc>>) {
        match until {
            Some(until) if until > Utc::now() => {
                self.store
                    .set_facet(Facet::SharedCooldown, Value::String(until.to_rfc3339()));
            }
            _ => self.store.clear_facet(Facet::SharedCooldown),
        }
    }

    /// Records raid-zone presence for the auto-detect debounce.
    pub fn set_in_raid_zone(&self, in_zone: bool) {
        if in_zone {
            self.store.mark_raid_presence();
        }
    }

    /// Switches the store to a new account: synchronously clears every
    /// per-account facet, then repopulates each one from its last
    /// persisted value. A malformed value skips only its own facet.
    ///
    /// Clearing strictly precedes any reload so a stale cross-account
    /// snapshot is never served, even mid-switch.
    pub fn reload_account(&self) {
        self.store.clear_cyclic_facet(Facet::BankTabbedItems);
        self.store.clear_cyclic_facet(Facet::BankPrice);
        self.store.clear_cyclic_facet(Facet::Quests);
        self.store.clear_cyclic_facet(Facet::Invocations);
        self.store.clear_cyclic_facet(Facet::InvocationsRaidLevel);
        self.store.set_facet(Facet::LootingBagItems, Value::Null);
        self.store.set_facet(Facet::LootingBagPrice, json!(0));

        match self.load_json_array(BANK_ITEMS_KEY) {
            Ok(Some(tabs)) => self.set_tabbed_bank_items(tabs),
            Ok(None) => {}
            Err(error) => warn!(key = BANK_ITEMS_KEY, %error, "skipping persisted bank items"),
        }

        match self.load_number(BANK_PRICE_KEY) {
            Ok(Some(price)) => self.set_bank_price(price),
            Ok(None) => {}
            Err(error) => warn!(key = BANK_PRICE_KEY, %error, "skipping persisted bank price"),
        }

        match self.load_json_array(QUESTS_KEY) {
            Ok(Some(quests)) => self.set_quests(quests),
            Ok(None) => {}
            Err(error) => warn!(key = QUESTS_KEY, %error, "skipping persisted quests"),
        }

        match self.load_json_array(LOOTING_BAG_ITEMS_KEY) {
            Ok(Some(items)) => self.store.set_facet(Facet::LootingBagItems, items),
            Ok(None) => {}
            Err(error) => {
                warn!(key = LOOTING_BAG_ITEMS_KEY, %error, "skipping persisted looting bag items");
            }
        }

        match self.load_number(LOOTING_BAG_PRICE_KEY) {
            Ok(Some(price)) => self.store.set_facet(Facet::LootingBagPrice, json!(price)),
            Ok(None) => {}
            Err(error) => {
                warn!(key = LOOTING_BAG_PRICE_KEY, %error, "skipping persisted looting bag price");
            }
        }

        match self.load_json_array(INVOCATIONS_KEY) {
            Ok(Some(invocations)) => self.set_invocations(invocations),
            Ok(None) => {}
            Err(error) => warn!(key = INVOCATIONS_KEY, %error, "skipping persisted invocations"),
        }

        if let Some(raw) = self.settings.load(INVOCATIONS_RAID_LEVEL_KEY) {
            self.set_invocations_raid_level(&raw);
        }
    }

    fn load_json_array(&self, key: &'static str) -> Result<Option<Value>, PersistError> {
        let Some(raw) = self.settings.load(key) else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&raw).map_err(|error| {
            PersistError::MalformedJson {
                key,
                reason: error.to_string(),
            }
        })?;
        if !value.is_array() {
            return Err(PersistError::WrongShape {
                key,
                expected: "JSON array",
            });
        }
        Ok(Some(value))
    }

    fn load_number(&self, key: &'static str) -> Result<Option<i64>, PersistError> {
        let Some(raw) = self.settings.load(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| PersistError::MalformedNumber { key, raw })
    }
}

fn int_array_to_wire(values: &[i32]) -> Value {
    Value::Array(values.iter().map(|value| Value::from(*value)).collect())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::persist::MemorySettingsStore;

    fn updater() -> (Arc<SnapshotStore>, Arc<MemorySettingsStore>, FacetUpdater) {
        let store = Arc::new(SnapshotStore::new());
        let settings = Arc::new(MemorySettingsStore::new());
        let settings_dyn: Arc<dyn SettingsStore> = settings.clone();
        let updater = FacetUpdater::new(Arc::clone(&store), settings_dyn);
        (store, settings, updater)
    }

    #[test]
    fn overlay_position_is_clamped() {
        let (store, _, updater) = updater();

        updater.set_overlay_top_position(10);
        assert_eq!(store.facet_value(Facet::OverlayTopPosition), Some(json!(25)));

        updater.set_overlay_top_position(90);
        assert_eq!(store.facet_value(Facet::OverlayTopPosition), Some(json!(75)));

        updater.set_overlay_top_position(50);
        assert_eq!(store.facet_value(Facet::OverlayTopPosition), Some(json!(50)));
    }

    #[test]
    fn absent_account_type_keeps_previous_value() {
        let (store, _, updater) = updater();
        updater.set_account_type(Some("ironman"));
        updater.set_account_type(None);
        assert_eq!(
            store.facet_value(Facet::AccountType),
            Some(json!("ironman"))
        );
    }

    #[test]
    fn bank_setter_builds_tabs_and_persists() {
        let (store, settings, updater) = updater();
        let items = [
            ItemStack::new(1, 1),
            ItemStack::new(2, 2),
            ItemStack::new(3, 3),
        ];

        updater.set_bank_items(&items, &[2]);
        updater.set_bank_price(123);

        let tabs = store.cyclic_value(Facet::BankTabbedItems).unwrap();
        assert_eq!(tabs, json!([[[3, 3]], [[1, 1], [2, 2]]]));
        assert_eq!(
            settings.load(BANK_ITEMS_KEY),
            Some(tabs.to_string())
        );
        assert_eq!(settings.load(BANK_PRICE_KEY), Some("123".to_string()));
    }

    #[test]
    fn unparseable_raid_level_leaves_previous_value() {
        let (store, settings, updater) = updater();
        updater.set_invocations_raid_level("305");
        updater.set_invocations_raid_level("expert");

        assert_eq!(
            store.cyclic_value(Facet::InvocationsRaidLevel),
            Some(json!(305))
        );
        assert_eq!(
            settings.load(INVOCATIONS_RAID_LEVEL_KEY),
            Some("305".to_string())
        );
    }

    #[test]
    fn expired_shared_cooldown_removes_the_facet() {
        let (store, _, updater) = updater();
        let now = Utc::now();

        updater.set_shared_cooldown(Some(now + Duration::seconds(30)));
        assert!(store.facet_value(Facet::SharedCooldown).is_some());

        updater.set_shared_cooldown(Some(now - Duration::seconds(30)));
        assert_eq!(store.facet_value(Facet::SharedCooldown), None);

        updater.set_shared_cooldown(Some(now + Duration::seconds(30)));
        updater.set_shared_cooldown(None);
        assert_eq!(store.facet_value(Facet::SharedCooldown), None);
    }

    #[test]
    fn product_cooldown_sync_drops_expired_entries() {
        let (store, _, updater) = updater();
        let cooldowns = CooldownTracker::new();
        let now = Utc::now();
        cooldowns.set("product-a", now + Duration::seconds(10));
        cooldowns.set("product-b", now - Duration::seconds(5));

        updater.sync_product_cooldowns(&cooldowns);

        let wire = store.facet_value(Facet::ProductCooldowns).unwrap();
        assert!(wire.get("product-a").is_some());
        assert!(wire.get("product-b").is_none());
    }

    #[test]
    fn reload_clears_then_restores_persisted_facets() {
        let (store, settings, updater) = updater();
        settings.store(BANK_ITEMS_KEY, "[[[1,1]]]");
        settings.store(BANK_PRICE_KEY, "777");
        settings.store(QUESTS_KEY, "not json");

        store.set_cyclic_facet(Facet::Quests, json!([["Old Quest", 1]]));
        updater.reload_account();

        // Restored from persistence.
        assert_eq!(
            store.cyclic_value(Facet::BankTabbedItems),
            Some(json!([[[1, 1]]]))
        );
        assert_eq!(store.cyclic_value(Facet::BankPrice), Some(json!(777)));
        // Malformed quests leave only that facet absent.
        assert_eq!(store.cyclic_value(Facet::Quests), None);
        // Looting bag is nulled pending reload data.
        assert_eq!(store.facet_value(Facet::LootingBagItems), Some(Value::Null));
        assert_eq!(store.facet_value(Facet::LootingBagPrice), Some(json!(0)));
    }

    #[test]
    fn seed_defaults_populates_initial_facets() {
        struct Defaults;
        impl FeatureFlags for Defaults {}

        let (store, _, updater) = updater();
        updater.seed_defaults(&Defaults);

        assert_eq!(store.facet_value(Facet::OverlayTopPosition), Some(json!(35)));
        assert_eq!(store.facet_value(Facet::InventoryItems), Some(json!([])));
        assert_eq!(store.facet_value(Facet::EquipmentItems), Some(json!([])));
        assert_eq!(store.facet_value(Facet::Weight), Some(json!(0)));
        assert_eq!(store.facet_value(Facet::Theme), Some(json!("light")));
    }
}
