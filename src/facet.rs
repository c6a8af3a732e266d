//! Facet identifiers and their synchronization metadata.
//!
//! Every unit of synchronized state is identified by a `Facet`. The enum is
//! the single source of truth for the wire key, whether disabling the facet
//! writes an explicit `null` (so viewers can distinguish "disabled" from
//! "absent"), and whether the facet is small enough to deliver whole every
//! tick or must be rotated through sliced cyclic delivery.

/// Delivery size class of a facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// Delivered in full on every delivery tick.
    Whole,
    /// Too large for one payload; delivered via the cyclic snapshot.
    Cyclic,
}

/// A named unit of synchronized game state.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    PlayerName,
    AccountHash,
    AccountType,
    RegionId,
    OverlayTopPosition,
    Theme,
    Visibility,
    Weight,
    SkillExperiences,
    BoostedSkillLevels,
    VirtualLevelsEnabled,
    FightStatistics,
    InventoryItems,
    InventoryPrice,
    EquipmentItems,
    EquipmentPrice,
    LootingBagItems,
    LootingBagPrice,
    SeasonalItems,
    ProductCooldowns,
    SharedCooldown,
    BankTabbedItems,
    BankPrice,
    Quests,
    Invocations,
    InvocationsRaidLevel,
    ChannelPointRewards,
    ConnectionStatus,
    ContentId,
}

impl Facet {
    /// Every facet, in wire-key order. Drives the nulling and reset passes
    /// so no facet can be forgotten in a scattered string literal.
    pub const ALL: [Self; 29] = [
        Self::PlayerName,
        Self::AccountHash,
        Self::AccountType,
        Self::RegionId,
        Self::OverlayTopPosition,
        Self::Theme,
        Self::Visibility,
        Self::Weight,
        Self::SkillExperiences,
        Self::BoostedSkillLevels,
        Self::VirtualLevelsEnabled,
        Self::FightStatistics,
        Self::InventoryItems,
        Self::InventoryPrice,
        Self::EquipmentItems,
        Self::EquipmentPrice,
        Self::LootingBagItems,
        Self::LootingBagPrice,
        Self::SeasonalItems,
        Self::ProductCooldowns,
        Self::SharedCooldown,
        Self::BankTabbedItems,
        Self::BankPrice,
        Self::Quests,
        Self::Invocations,
        Self::InvocationsRaidLevel,
        Self::ChannelPointRewards,
        Self::ConnectionStatus,
        Self::ContentId,
    ];

    /// Stable wire identifier under which the facet appears in the
    /// outbound document.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PlayerName => "player_name",
            Self::AccountHash => "account_hash",
            Self::AccountType => "account_type",
            Self::RegionId => "region_id",
            Self::OverlayTopPosition => "top_position",
            Self::Theme => "theme_type",
            Self::Visibility => "visibility_type",
            Self::Weight => "weight",
            Self::SkillExperiences => "skill_experiences",
            Self::BoostedSkillLevels => "boosted_skill_levels",
            Self::VirtualLevelsEnabled => "virtual_levels_enabled",
            Self::FightStatistics => "fight_statistics",
            Self::InventoryItems => "inventory_items",
            Self::InventoryPrice => "inventory_price",
            Self::EquipmentItems => "equipment_items",
            Self::EquipmentPrice => "equipment_price",
            Self::LootingBagItems => "looting_bag_items",
            Self::LootingBagPrice => "looting_bag_price",
            Self::SeasonalItems => "seasonal_items",
            Self::ProductCooldowns => "current_product_cooldowns",
            Self::SharedCooldown => "current_shared_cooldown",
            Self::BankTabbedItems => "bank_tabbed_items",
            Self::BankPrice => "bank_price",
            Self::Quests => "quests",
            Self::Invocations => "invocations",
            Self::InvocationsRaidLevel => "invocations_raid_level",
            Self::ChannelPointRewards => "channel_point_rewards",
            Self::ConnectionStatus => "connection_status",
            Self::ContentId => "content_id",
        }
    }

    /// Whether disabling/clearing this facet writes an explicit `null`
    /// marker into the outbound view rather than omitting the key.
    #[must_use]
    pub const fn is_nullable(self) -> bool {
        matches!(
            self,
            Self::PlayerName
                | Self::Weight
                | Self::SkillExperiences
                | Self::BoostedSkillLevels
                | Self::FightStatistics
                | Self::InventoryItems
                | Self::InventoryPrice
                | Self::EquipmentItems
                | Self::EquipmentPrice
                | Self::LootingBagItems
                | Self::LootingBagPrice
                | Self::SeasonalItems
                | Self::BankTabbedItems
                | Self::BankPrice
                | Self::Quests
                | Self::Invocations
                | Self::InvocationsRaidLevel
        )
    }

    /// Delivery size class.
    #[must_use]
    pub const fn size_class(self) -> SizeClass {
        match self {
            Self::BankTabbedItems
            | Self::BankPrice
            | Self::Quests
            | Self::Invocations
            | Self::InvocationsRaidLevel
            | Self::ChannelPointRewards => SizeClass::Cyclic,
            _ => SizeClass::Whole,
        }
    }

    /// Convenience predicate for the cyclic size class.
    #[must_use]
    pub const fn is_cyclic(self) -> bool {
        matches!(self.size_class(), SizeClass::Cyclic)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn wire_keys_are_unique() {
        let keys: HashSet<&str> = Facet::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys.len(), Facet::ALL.len());
    }

    #[test]
    fn cyclic_facets_match_the_oversized_set() {
        let cyclic: Vec<Facet> = Facet::ALL.iter().copied().filter(|f| f.is_cyclic()).collect();
        assert_eq!(
            cyclic,
            vec![
                Facet::BankTabbedItems,
                Facet::BankPrice,
                Facet::Quests,
                Facet::Invocations,
                Facet::InvocationsRaidLevel,
                Facet::ChannelPointRewards,
            ]
        );
    }

    #[test]
    fn stamps_and_identity_facets_are_not_nullable() {
        for facet in [
            Facet::AccountHash,
            Facet::AccountType,
            Facet::ConnectionStatus,
            Facet::ContentId,
            Facet::ChannelPointRewards,
            Facet::ProductCooldowns,
            Facet::SharedCooldown,
        ] {
            assert!(!facet.is_nullable(), "{facet:?} must not be nullable");
        }
        assert!(Facet::BankTabbedItems.is_nullable());
        assert!(Facet::SkillExperiences.is_nullable());
    }
}
