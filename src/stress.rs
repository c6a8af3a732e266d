//! Synthetic maxed-out facet values for payload-limit tuning.
//!
//! Only compiled with the `stress` cargo feature and never part of the
//! production data path: the injector is a separate producer that pushes
//! synthetic values through the same public update API real producers use,
//! filling collections and statistics toward their declared maxima to
//! measure how close a full snapshot comes to the transport ceiling.

use rand::Rng;
use serde_json::{json, Map, Value};

use crate::item::ItemStack;
use crate::update::{
    FacetUpdater, MAX_FIGHT_STATISTIC_VALUE, MAX_ITEM_QUANTITY, MAX_SKILL_EXPERIENCE,
    MAX_SKILL_LEVEL,
};

/// Number of skills the extension renders.
const SKILL_COUNT: usize = 23;

/// Pushes synthetic worst-case values through a [`FacetUpdater`].
pub struct StressInjector<'a> {
    updater: &'a FacetUpdater,
}

impl<'a> StressInjector<'a> {
    /// Creates an injector over the given updater.
    #[must_use]
    pub const fn new(updater: &'a FacetUpdater) -> Self {
        Self { updater }
    }

    /// Randomized skill arrays toward the declared maxima.
    pub fn inject_skills(&self) {
        let mut rng = rand::thread_rng();
        let experiences: Vec<i32> = (0..SKILL_COUNT)
            .map(|_| rng.gen_range(0..=MAX_SKILL_EXPERIENCE))
            .collect();
        let levels: Vec<i32> = (0..SKILL_COUNT)
            .map(|_| rng.gen_range(1..=MAX_SKILL_LEVEL))
            .collect();
        self.updater.set_skill_experiences(&experiences);
        self.updater.set_boosted_skill_levels(&levels);
    }

    /// A full synthetic bank with maxed-out stack quantities.
    pub fn inject_bank(&self, tabs: usize, items_per_tab: usize) {
        let mut rng = rand::thread_rng();
        let total = tabs * items_per_tab;
        let items: Vec<ItemStack> = (0..total)
            .map(|index| {
                let id = i32::try_from(index).unwrap_or(i32::MAX);
                ItemStack::new(id, rng.gen_range(1..=MAX_ITEM_QUANTITY))
            })
            .collect();
        let tab_amounts = vec![items_per_tab; tabs];

        self.updater.set_bank_items(&items, &tab_amounts);
        self.updater
            .set_bank_price(i64::from(MAX_ITEM_QUANTITY) * total as i64);
    }

    /// Synthetic fight statistics for the given number of fights.
    pub fn inject_fight_statistics(&self, fights: usize) {
        let mut rng = rand::thread_rng();
        let mut statistics = Map::new();
        for index in 0..fights {
            statistics.insert(
                format!("fight-{index}"),
                json!({
                    "hits": rng.gen_range(0..=MAX_FIGHT_STATISTIC_VALUE),
                    "damage": rng.gen_range(0..=MAX_FIGHT_STATISTIC_VALUE),
                    "misses": rng.gen_range(0..=MAX_FIGHT_STATISTIC_VALUE),
                }),
            );
        }
        self.updater.set_fight_statistics(Value::Object(statistics));
    }

    /// Fills every stressed facet at once.
    pub fn inject_all(&self) {
        self.inject_skills();
        self.inject_bank(9, 100);
        self.inject_fight_statistics(10);
    }
}
