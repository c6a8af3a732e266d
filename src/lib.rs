//! # loadsync - Live-Loadout State Synchronization
//!
//! `loadsync` aggregates a player's in-game state (inventory, bank, combat
//! statistics, quests, raid invocations, cooldowns) into one coherent
//! snapshot and computes the size-bounded view that is synced to a
//! viewer-facing stream-overlay extension.
//!
//! ## Core Concepts
//!
//! - **Facet**: one named, typed unit of synchronized state
//! - **Snapshot**: the full keyed set of current facet values, held twice
//!   (current + cyclic) by the [`SnapshotStore`]
//! - **Cyclic slice**: the sub-range of an oversized facet revealed this
//!   delivery tick, placeholdered with sentinels elsewhere
//! - **View**: the filtered, stamped document handed to the transport
//!
//! The transport caps one outbound document at roughly 5KB, so oversized
//! facets rotate through sliced delivery while everything else ships whole
//! every tick.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use loadsync::{
//!     CyclicScheduler, FacetUpdater, ItemStack, MemorySettingsStore,
//!     SnapshotStore, ViewFilter,
//! };
//!
//! let store = Arc::new(SnapshotStore::new());
//! let scheduler = Arc::new(CyclicScheduler::new());
//! let updater = FacetUpdater::new(Arc::clone(&store), Arc::new(MemorySettingsStore::new()));
//!
//! // Producers push facet updates as game events arrive.
//! updater.set_account_hash(1234);
//! updater.set_inventory_items(Some(&[ItemStack::new(4151, 1)]), 120_000);
//!
//! // The delivery tick asks for the current view and advances the cycle.
//! let filter = ViewFilter::new(store.clone(), scheduler.clone(), flags, session);
//! let view = filter.filtered_view();
//! scheduler.advance_cycle(&store);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod cooldown;
pub mod cycle;
pub mod error;
pub mod facet;
pub mod filter;
pub mod item;
pub mod persist;
pub mod snapshot;
pub mod update;

#[cfg(feature = "stress")]
pub mod stress;

// Re-export primary types at crate root for convenience
pub use config::{FeatureFlags, SessionProbe, Theme, Visibility};
pub use cooldown::CooldownTracker;
pub use cycle::{CyclicScheduler, MAX_ITEMS_PER_SLICE};
pub use error::{InputError, PersistError, SyncError, SyncResult};
pub use facet::{Facet, SizeClass};
pub use filter::{ViewFilter, RAID_PRESENCE_DEBOUNCE_SECS};
pub use item::{ItemStack, SENTINEL_ITEM_ID};
pub use persist::{MemorySettingsStore, SettingsStore, PERSISTED_STATE_KEYS};
pub use snapshot::SnapshotStore;
pub use update::FacetUpdater;

#[cfg(feature = "stress")]
pub use stress::StressInjector;
