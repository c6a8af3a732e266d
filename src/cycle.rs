//! Cyclic slicing of oversized facets.
//!
//! The transport caps one outbound document at roughly 5KB. Facets that do
//! not fit whole are parked in the cyclic snapshot and revealed one slice
//! per delivery tick: a window of [`MAX_ITEMS_PER_SLICE`] real values walks
//! across the facet's flattened collection while every slot outside the
//! window is emitted as the `[-1, -1]` sentinel, preserving the exact
//! nested shape. The slice size is tuned so fight data and the other whole
//! facets keep roughly 20% of the payload ceiling.
//!
//! Advancement is externally ticked: the scheduler owns no timer and only
//! mutates the cursor when [`CyclicScheduler::advance_cycle`] is called.

use parking_lot::Mutex;
use serde_json::Value;

use crate::facet::Facet;
use crate::item::{sentinel_pair, tabbed_item_count};
use crate::snapshot::SnapshotStore;

/// Maximum number of real item slots revealed per delivery tick.
pub const MAX_ITEMS_PER_SLICE: usize = 250;

#[derive(Debug)]
struct CursorState {
    active: Facet,
    offset: usize,
}

/// Tracks which oversized facet is active and where its slice window
/// starts. Safe to read at arbitrary cadence relative to advancement.
#[derive(Debug)]
pub struct CyclicScheduler {
    cursor: Mutex<CursorState>,
}

impl CyclicScheduler {
    /// Creates a scheduler with the bank as the active facet at offset 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: Mutex::new(CursorState {
                active: Facet::BankTabbedItems,
                offset: 0,
            }),
        }
    }

    /// The currently active oversized facet.
    #[must_use]
    pub fn active_facet(&self) -> Facet {
        self.cursor.lock().active
    }

    /// Start of the current slice window in the flattened collection.
    #[must_use]
    pub fn slice_offset(&self) -> usize {
        self.cursor.lock().offset
    }

    /// Switches the active facet and rewinds the window to the start.
    /// Hosts with their own rotation policy drive this directly.
    pub fn set_active_facet(&self, facet: Facet) {
        let mut cursor = self.cursor.lock();
        cursor.active = facet;
        cursor.offset = 0;
    }

    /// Advances the slice window by one slice width, wrapping to 0 once a
    /// full pass over the active facet's collection completes.
    ///
    /// Invoked by the external ticking collaborator at its delivery
    /// cadence; an empty or absent active facet pins the window at 0.
    pub fn advance_cycle(&self, store: &SnapshotStore) {
        let mut cursor = self.cursor.lock();
        let total = store
            .cyclic_value(cursor.active)
            .map_or(0, |value| tabbed_item_count(&value));

        if total == 0 {
            cursor.offset = 0;
            return;
        }

        let next = cursor.offset + MAX_ITEMS_PER_SLICE;
        cursor.offset = if next >= total { 0 } else { next };
    }

    /// Slices a tabbed collection at the current window.
    ///
    /// Every slot keeps its tab and position; slots whose flattened index
    /// falls outside `[offset, offset + MAX_ITEMS_PER_SLICE)` are replaced
    /// by the sentinel pair so viewers can distinguish "known empty slot"
    /// from "not yet revealed".
    #[must_use]
    pub fn sliced_tabbed_items(&self, tabs: &Value) -> Value {
        slice_tabbed(tabs, self.slice_offset(), MAX_ITEMS_PER_SLICE)
    }
}

impl Default for CyclicScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn slice_tabbed(tabs: &Value, offset: usize, max_slice: usize) -> Value {
    let Some(tabs) = tabs.as_array() else {
        return Value::Array(Vec::new());
    };

    let window_end = offset.saturating_add(max_slice);
    let mut flattened_index = 0usize;
    let mut sliced_tabs: Vec<Value> = Vec::with_capacity(tabs.len());

    for tab in tabs {
        let Some(tab_items) = tab.as_array() else {
            sliced_tabs.push(Value::Array(Vec::new()));
            continue;
        };

        let mut sliced_items: Vec<Value> = Vec::with_capacity(tab_items.len());
        for item in tab_items {
            let in_window = flattened_index >= offset && flattened_index < window_end;
            flattened_index += 1;

            if in_window {
                sliced_items.push(item.clone());
            } else {
                sliced_items.push(sentinel_pair());
            }
        }
        sliced_tabs.push(Value::Array(sliced_items));
    }

    Value::Array(sliced_tabs)
}
