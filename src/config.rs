//! Live configuration and session condition seams.
//!
//! Feature flags and session state are owned by the host plugin; the engine
//! reads them through these traits on every filter pass and never caches.
//! Default implementations mirror the host's shipped defaults so fixtures
//! only override what a test varies.

/// Lower bound of the overlay vertical position, in percent of the screen
/// height.
pub const MIN_OVERLAY_TOP_POSITION: i64 = 25;

/// Upper bound of the overlay vertical position.
pub const MAX_OVERLAY_TOP_POSITION: i64 = 75;

/// Viewer-facing extension theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    /// Light interface theme.
    #[default]
    Light,
    /// Dark interface theme.
    Dark,
}

impl Theme {
    /// Stable wire identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// When the extension overlay is shown to viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Only while the viewer hovers the video stream.
    #[default]
    Hover,
    /// Always visible.
    Always,
}

impl Visibility {
    /// Stable wire identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Always => "always",
        }
    }
}

/// Read-only viewer-facing feature configuration, consulted live on every
/// filter pass.
#[allow(missing_docs)]
pub trait FeatureFlags: Send + Sync {
    /// Master switch; off nulls every nullable facet for all viewers.
    fn sync_enabled(&self) -> bool {
        true
    }

    fn player_info_enabled(&self) -> bool {
        true
    }

    fn inventory_enabled(&self) -> bool {
        true
    }

    fn equipment_enabled(&self) -> bool {
        true
    }

    fn looting_bag_enabled(&self) -> bool {
        true
    }

    fn bank_enabled(&self) -> bool {
        true
    }

    fn bank_price_enabled(&self) -> bool {
        true
    }

    fn fight_statistics_enabled(&self) -> bool {
        true
    }

    fn skills_enabled(&self) -> bool {
        true
    }

    fn weight_enabled(&self) -> bool {
        true
    }

    fn invocations_enabled(&self) -> bool {
        true
    }

    fn invocations_raid_level_enabled(&self) -> bool {
        true
    }

    fn quests_enabled(&self) -> bool {
        true
    }

    fn seasonals_enabled(&self) -> bool {
        true
    }

    /// Null the invocation facets once the player has been out of the
    /// tracked raid for the debounce window.
    fn auto_detect_raid_enabled(&self) -> bool {
        true
    }

    /// Overlay vertical position in percent; clamped by the updater.
    fn overlay_top_position(&self) -> i64 {
        35
    }

    fn virtual_levels_enabled(&self) -> bool {
        true
    }

    fn theme(&self) -> Theme {
        Theme::default()
    }

    fn visibility(&self) -> Visibility {
        Visibility::default()
    }
}

/// Session-level conditions of the viewing/game session.
pub trait SessionProbe: Send + Sync {
    /// Whether the transport link to the extension backend is up.
    fn is_connected(&self) -> bool;

    /// Whether the underlying game session is authenticated (logged in).
    fn is_authenticated(&self) -> bool;

    /// Whether the current game world is a seasonal one.
    fn is_seasonal_world(&self) -> bool {
        false
    }
}
