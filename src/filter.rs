//! The outbound view filter pipeline.
//!
//! Produces the exactly-once-per-tick outbound view from a deep copy of the
//! current snapshot. Five stages run in fixed order, each receiving and
//! returning the working document:
//!
//! 1. merge the active cyclic slice,
//! 2. stamp the freshness token,
//! 3. suppress everything for an ineligible session (minus the
//!    channel-point-reward exception),
//! 4. stamp connectivity, and
//! 5. null out facets disabled by configuration.
//!
//! The pipeline is deterministic and idempotent for a fixed store state:
//! two passes with no writes in between differ only in the freshness
//! token. It never fails; missing data degrades to a smaller view.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};

use crate::config::{FeatureFlags, SessionProbe};
use crate::cycle::CyclicScheduler;
use crate::facet::Facet;
use crate::snapshot::SnapshotStore;

/// Seconds the invocation facets survive after the player leaves the
/// tracked raid zone.
pub const RAID_PRESENCE_DEBOUNCE_SECS: i64 = 20;

/// Account hash marking an invalid/unknown identity.
const INVALID_ACCOUNT_HASH: i64 = -1;

/// Read-side pipeline over one session's store.
pub struct ViewFilter {
    store: Arc<SnapshotStore>,
    scheduler: Arc<CyclicScheduler>,
    flags: Arc<dyn FeatureFlags>,
    session: Arc<dyn SessionProbe>,
}

impl ViewFilter {
    /// Creates a pipeline reading the given store, scheduler, and live
    /// host configuration.
    #[must_use]
    pub fn new(
        store: Arc<SnapshotStore>,
        scheduler: Arc<CyclicScheduler>,
        flags: Arc<dyn FeatureFlags>,
        session: Arc<dyn SessionProbe>,
    ) -> Self {
        Self {
            store,
            scheduler,
            flags,
            session,
        }
    }

    /// Computes the current outbound view.
    ///
    /// Consumers receive the whole object or a minimal one; a view is
    /// never partially delivered.
    #[must_use]
    pub fn filtered_view(&self) -> Value {
        let mut state = self.store.current_snapshot();

        state = self.merge_cyclic(state);
        state = Self::stamp_freshness(state);
        state = self.suppress_ineligible(state);
        state = self.stamp_connectivity(state);
        state = self.remove_disabled(state);

        Value::Object(state)
    }

    /// Merges the active cyclic facet's slice plus the always-on
    /// channel-point rewards into the working document.
    fn merge_cyclic(&self, mut state: Map<String, Value>) -> Map<String, Value> {
        match self.scheduler.active_facet() {
            Facet::BankTabbedItems => {
                // Both halves or neither: a price without items (or the
                // reverse) would show a half-loaded bank to viewers.
                let tabs = self.store.cyclic_value(Facet::BankTabbedItems);
                let price = self.store.cyclic_value(Facet::BankPrice);
                if let (Some(tabs), Some(price)) = (tabs, price) {
                    state.insert(
                        Facet::BankTabbedItems.key().to_string(),
                        self.scheduler.sliced_tabbed_items(&tabs),
                    );
                    state.insert(Facet::BankPrice.key().to_string(), price);
                }
            }
            Facet::Quests => {
                if let Some(quests) = self.store.cyclic_value(Facet::Quests) {
                    state.insert(Facet::Quests.key().to_string(), quests);
                }
            }
            Facet::Invocations => {
                if let Some(invocations) = self.store.cyclic_value(Facet::Invocations) {
                    let raid_level = self
                        .store
                        .cyclic_value(Facet::InvocationsRaidLevel)
                        .unwrap_or(Value::Null);
                    state.insert(Facet::Invocations.key().to_string(), invocations);
                    state.insert(Facet::InvocationsRaidLevel.key().to_string(), raid_level);
                }
            }
            other => {
                if let Some(value) = self.store.cyclic_value(other) {
                    state.insert(other.key().to_string(), value);
                }
            }
        }

        // Always-on cyclic data rides along on every tick.
        if self.scheduler.active_facet() != Facet::ChannelPointRewards {
            if let Some(rewards) = self.store.cyclic_value(Facet::ChannelPointRewards) {
                state.insert(Facet::ChannelPointRewards.key().to_string(), rewards);
            }
        }

        state
    }

    /// Stamps the token consumers use to tell a fresh payload from a
    /// retransmission.
    fn stamp_freshness(mut state: Map<String, Value>) -> Map<String, Value> {
        state.insert(
            Facet::ContentId.key().to_string(),
            Value::String(Utc::now().timestamp_millis().to_string()),
        );
        state
    }

    /// Replaces the whole document with an empty one when the session is
    /// not eligible to be shown, keeping only the channel-point rewards.
    fn suppress_ineligible(&self, state: Map<String, Value>) -> Map<String, Value> {
        let account_hash = state
            .get(Facet::AccountHash.key())
            .and_then(Value::as_i64)
            .unwrap_or(INVALID_ACCOUNT_HASH);

        let eligible = account_hash != INVALID_ACCOUNT_HASH && self.session.is_authenticated();
        if eligible {
            return state;
        }

        let mut wiped = Map::new();
        if let Some(rewards) = state.get(Facet::ChannelPointRewards.key()) {
            wiped.insert(Facet::ChannelPointRewards.key().to_string(), rewards.clone());
        }
        wiped
    }

    /// Attaches the connectivity stamp unconditionally so the installer
    /// view can show link state even when nothing is synced.
    fn stamp_connectivity(&self, mut state: Map<String, Value>) -> Map<String, Value> {
        state.insert(
            Facet::ConnectionStatus.key().to_string(),
            json!({
                "connected": self.session.is_connected(),
                "authenticated": self.session.is_authenticated(),
            }),
        );
        state
    }

    /// Nulls out facets disabled by configuration. Explicit nulls, never
    /// omission: viewers must be able to clear stale display state.
    fn remove_disabled(&self, mut state: Map<String, Value>) -> Map<String, Value> {
        let flags = &self.flags;

        if !flags.sync_enabled() {
            for facet in Facet::ALL {
                if facet.is_nullable() {
                    state.insert(facet.key().to_string(), Value::Null);
                }
            }
        }

        if !flags.player_info_enabled() {
            null_facets(&mut state, &[Facet::PlayerName]);
        }
        if !flags.inventory_enabled() {
            null_facets(&mut state, &[Facet::InventoryItems, Facet::InventoryPrice]);
        }
        if !flags.equipment_enabled() {
            null_facets(&mut state, &[Facet::EquipmentItems, Facet::EquipmentPrice]);
        }
        if !flags.looting_bag_enabled() {
            null_facets(&mut state, &[Facet::LootingBagItems, Facet::LootingBagPrice]);
        }
        if !flags.bank_enabled() {
            null_facets(&mut state, &[Facet::BankTabbedItems, Facet::BankPrice]);
        }
        if !flags.bank_price_enabled() {
            null_facets(&mut state, &[Facet::BankPrice]);
        }
        if !flags.fight_statistics_enabled() {
            null_facets(&mut state, &[Facet::FightStatistics]);
        }
        if !flags.skills_enabled() {
            null_facets(
                &mut state,
                &[Facet::SkillExperiences, Facet::BoostedSkillLevels],
            );
        }
        if !flags.weight_enabled() {
            null_facets(&mut state, &[Facet::Weight]);
        }
        if !flags.invocations_enabled() {
            null_facets(&mut state, &[Facet::Invocations]);
        }
        if !flags.invocations_enabled() || !flags.invocations_raid_level_enabled() {
            null_facets(&mut state, &[Facet::InvocationsRaidLevel]);
        }
        if !flags.quests_enabled() {
            null_facets(&mut state, &[Facet::Quests]);
        }
        if !flags.seasonals_enabled() || !self.session.is_seasonal_world() {
            null_facets(&mut state, &[Facet::SeasonalItems]);
        }

        // Once the player has been out of the raid past the debounce
        // window, a lingering invocation list is stale configuration and
        // must be cleared for viewers. The debounce keeps an alt window
        // from wiping the main window's raid state.
        if self.session.is_authenticated()
            && flags.auto_detect_raid_enabled()
            && !self
                .store
                .raid_presence_within(Duration::seconds(RAID_PRESENCE_DEBOUNCE_SECS))
            && state
                .get(Facet::Invocations.key())
                .is_some_and(Value::is_array)
        {
            null_facets(
                &mut state,
                &[Facet::Invocations, Facet::InvocationsRaidLevel],
            );
        }

        state
    }
}

fn null_facets(state: &mut Map<String, Value>, facets: &[Facet]) {
    for facet in facets {
        state.insert(facet.key().to_string(), Value::Null);
    }
}
