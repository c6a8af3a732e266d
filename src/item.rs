//! Item collections and their wire representation.
//!
//! Items travel as compact `[id, quantity]` pairs to keep the payload small;
//! the tabbed bank is an array of such pair-arrays, one per tab, with the
//! untabbed remainder ("zero tab") prepended. Slots hidden by the cyclic
//! slice window are replaced by the `[-1, -1]` sentinel so the collection
//! shape is always preserved.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Sentinel id/quantity marking a collection slot not revealed by the
/// active slice.
pub const SENTINEL_ITEM_ID: i64 = -1;

/// A single item stack as reported by the game client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Game item identifier.
    pub id: i32,
    /// Stack quantity.
    pub quantity: i32,
}

impl ItemStack {
    /// Creates a new item stack.
    #[must_use]
    pub const fn new(id: i32, quantity: i32) -> Self {
        Self { id, quantity }
    }

    /// Compact `[id, quantity]` wire pair.
    #[must_use]
    pub fn to_wire(self) -> Value {
        json!([self.id, self.quantity])
    }
}

/// The `[-1, -1]` placeholder pair for a slot outside the slice window.
#[must_use]
pub fn sentinel_pair() -> Value {
    json!([SENTINEL_ITEM_ID, SENTINEL_ITEM_ID])
}

/// Converts an item list to its wire array.
///
/// A `None` collection becomes an empty array, never an error; producers
/// report empty containers as absent lists.
#[must_use]
pub fn items_to_wire(items: Option<&[ItemStack]>) -> Value {
    let items = items.unwrap_or_default();
    Value::Array(items.iter().map(|item| item.to_wire()).collect())
}

/// Builds the tabbed bank wire shape from the flat item list the client
/// reports plus the per-tab item counts.
///
/// Items beyond the listed tabs belong to the remaining "zero tab", which
/// is prepended so viewers render it first. Tab counts that overrun the
/// item list yield short tabs rather than an error.
#[must_use]
pub fn tabbed_bank_to_wire(items: &[ItemStack], tab_amounts: &[usize]) -> Value {
    let mut tabs: Vec<Value> = Vec::with_capacity(tab_amounts.len() + 1);
    let mut consumed = 0usize;

    for &amount in tab_amounts {
        let end = consumed.saturating_add(amount).min(items.len());
        let tab = items.get(consumed..end).unwrap_or_default();
        tabs.push(items_to_wire(Some(tab)));
        consumed = end;
    }

    let zero_tab = items.get(consumed..).unwrap_or_default();
    let mut tabbed = Vec::with_capacity(tabs.len() + 1);
    tabbed.push(items_to_wire(Some(zero_tab)));
    tabbed.extend(tabs);

    Value::Array(tabbed)
}

/// Total number of item slots across all tabs of a tabbed wire collection.
///
/// Non-array input counts as empty.
#[must_use]
pub fn tabbed_item_count(tabs: &Value) -> usize {
    tabs.as_array()
        .map(|tabs| {
            tabs.iter()
                .map(|tab| tab.as_array().map_or(0, Vec::len))
                .sum()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_stack_wire_pair() {
        let item = ItemStack::new(4151, 3);
        assert_eq!(item.to_wire(), json!([4151, 3]));
    }

    #[test]
    fn none_collection_becomes_empty_array() {
        assert_eq!(items_to_wire(None), json!([]));
    }

    #[test]
    fn tabbed_bank_prepends_zero_tab() {
        let items = [
            ItemStack::new(1, 1),
            ItemStack::new(2, 1),
            ItemStack::new(3, 1),
            ItemStack::new(4, 1),
            ItemStack::new(5, 1),
        ];
        // Two tabs of two items; the fifth item falls into the zero tab.
        let tabbed = tabbed_bank_to_wire(&items, &[2, 2]);
        assert_eq!(
            tabbed,
            json!([[[5, 1]], [[1, 1], [2, 1]], [[3, 1], [4, 1]]])
        );
        assert_eq!(tabbed_item_count(&tabbed), 5);
    }

    #[test]
    fn overrunning_tab_amounts_yield_short_tabs() {
        let items = [ItemStack::new(1, 1)];
        let tabbed = tabbed_bank_to_wire(&items, &[4]);
        assert_eq!(tabbed, json!([[], [[1, 1]]]));
        assert_eq!(tabbed_item_count(&tabbed), 1);
    }

    #[test]
    fn item_count_of_non_array_is_zero() {
        assert_eq!(tabbed_item_count(&Value::Null), 0);
        assert_eq!(tabbed_item_count(&json!("bank")), 0);
    }
}
