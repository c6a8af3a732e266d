//! Persisted-facet round trips across account switches, including the
//! isolation of malformed persisted values.

use std::sync::Arc;

use serde_json::{json, Value};

use loadsync::{
    Facet, FacetUpdater, MemorySettingsStore, SettingsStore, SnapshotStore, PERSISTED_STATE_KEYS,
};

fn harness() -> (Arc<SnapshotStore>, Arc<MemorySettingsStore>, FacetUpdater) {
    let store = Arc::new(SnapshotStore::new());
    let settings = Arc::new(MemorySettingsStore::new());
    let settings_dyn: Arc<dyn SettingsStore> = settings.clone();
    let updater = FacetUpdater::new(Arc::clone(&store), settings_dyn);
    (store, settings, updater)
}

#[test]
fn setters_write_through_to_the_settings_store() {
    let (_, settings, updater) = harness();

    updater.set_tabbed_bank_items(json!([[[4151, 1]]]));
    updater.set_bank_price(120_000);
    updater.set_quests(json!([["Cook's Assistant", 2]]));
    updater.set_invocations(json!([["Overly Draining", 1, true]]));
    updater.set_invocations_raid_level("405");
    updater.set_looting_bag_items(None, 0);

    for key in PERSISTED_STATE_KEYS {
        assert!(
            settings.load(key).is_some(),
            "expected a persisted value under '{key}'"
        );
    }
}

#[test]
fn reload_restores_every_persisted_facet() {
    let (store, settings, updater) = harness();
    settings.store("bank-items", r#"[[[4151,1],[11802,1]],[[2434,4]]]"#);
    settings.store("bank-price", "2500000");
    settings.store("quests", r#"[["Dragon Slayer",2]]"#);
    settings.store("invocations", r#"[["Walk for it",1,false]]"#);
    settings.store("invocations-raid-level", "150");
    settings.store("looting-bag-items", r#"[[995,25000]]"#);
    settings.store("looting-bag-price", "25000");

    updater.reload_account();

    assert_eq!(
        store.cyclic_value(Facet::BankTabbedItems),
        Some(json!([[[4151, 1], [11802, 1]], [[2434, 4]]]))
    );
    assert_eq!(store.cyclic_value(Facet::BankPrice), Some(json!(2_500_000)));
    assert_eq!(
        store.cyclic_value(Facet::Quests),
        Some(json!([["Dragon Slayer", 2]]))
    );
    assert_eq!(
        store.cyclic_value(Facet::Invocations),
        Some(json!([["Walk for it", 1, false]]))
    );
    assert_eq!(
        store.cyclic_value(Facet::InvocationsRaidLevel),
        Some(json!(150))
    );
    assert_eq!(
        store.facet_value(Facet::LootingBagItems),
        Some(json!([[995, 25000]]))
    );
    assert_eq!(store.facet_value(Facet::LootingBagPrice), Some(json!(25000)));
}

#[test]
fn one_malformed_value_does_not_block_the_other_facets() {
    let (store, settings, updater) = harness();
    settings.store("bank-items", "{ not json");
    settings.store("bank-price", "not a number");
    settings.store("quests", r#"{"shape":"object"}"#);
    settings.store("invocations", r#"[["Walk for it",1,false]]"#);

    updater.reload_account();

    assert_eq!(store.cyclic_value(Facet::BankTabbedItems), None);
    assert_eq!(store.cyclic_value(Facet::BankPrice), None);
    assert_eq!(store.cyclic_value(Facet::Quests), None);
    assert_eq!(
        store.cyclic_value(Facet::Invocations),
        Some(json!([["Walk for it", 1, false]]))
    );
}

#[test]
fn reload_without_persisted_data_leaves_facets_absent() {
    let (store, _, updater) = harness();
    store.set_cyclic_facet(Facet::Quests, json!([["Old Quest", 1]]));

    updater.reload_account();

    assert_eq!(store.cyclic_value(Facet::Quests), None);
    assert_eq!(store.facet_value(Facet::LootingBagItems), Some(Value::Null));
}
