//! Schema version policy.
//!
//! Every version-dependent field in the database is described by one row of
//! [`RULES`]. Decoders ask the policy whether a field is present and how wide
//! it is instead of comparing version numbers inline. Encoders always write
//! the [`LATEST_VERSION`] layout and never consult the policy.

use crate::{Error, Result};

/// Oldest schema version the decoder accepts.
pub const MIN_VERSION: i32 = 60;

/// Schema version written by the encoder.
pub const LATEST_VERSION: i32 = 112;

/// Storage form of a version-dependent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Not stored at all.
    Absent,
    /// Stored with a width that never changed.
    Present,
    U8,
    U16,
    U32,
    I32,
    I64,
    /// A one-byte boolean replaced by a later field.
    LegacyBool,
    /// Stats stored as a fixed sequence of individual fields.
    LegacyFixed,
    /// Stats stored as a count-prefixed sparse table.
    StatTable,
    /// Not stored; computed from other fields on decode.
    Derived,
}

/// Version-dependent fields, one per row of [`RULES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Field {
    HeaderGameShopIndex,
    HeaderConquestIndex,
    HeaderRespawnTimerIndex,
    NpcImage,
    NpcTimeVisibility,
    NpcConquest,
    NpcBigMap,
    NpcCanTeleportTo,
    NpcConquestVisible,
    ItemStackSize,
    ItemStats,
    ItemGlobalDropNotify,
    ItemSlots,
    ItemRingBindTransform,
    MonsterLevel,
    MonsterLegacyStatWidth,
    MonsterStats,
    MonsterRevival,
    MonsterDropPath,
    QuestTimeLimit,
    MapRespawnExtras,
    MapMovementConquest,
    MapMovementBigMap,
    MapNoTownTeleport,
    MapNoReincarnation,
    MapWeatherParticles,
    MapGt,
    MagicRange,
    MagicMultipliers,
    GameShopCount,
    GameShopCanBuy,
    ConquestFlags,
    ConquestFullMap,
    ConquestControlPoints,
    ConquestRepairCost,
    RespawnCurrentDelay,
}

/// One row of the version matrix: `version >= since` selects `after`,
/// anything older selects `before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub field: Field,
    pub since: i32,
    pub before: Width,
    pub after: Width,
}

const fn rule(field: Field, since: i32, before: Width, after: Width) -> Rule {
    Rule { field, since, before, after }
}

const fn added(field: Field, since: i32) -> Rule {
    rule(field, since, Width::Absent, Width::Present)
}

/// The complete version matrix, ordered by [`Field`] discriminant.
pub const RULES: &[Rule] = &[
    added(Field::HeaderGameShopIndex, 63),
    added(Field::HeaderConquestIndex, 66),
    added(Field::HeaderRespawnTimerIndex, 68),
    rule(Field::NpcImage, 72, Width::U8, Width::U16),
    added(Field::NpcTimeVisibility, 64),
    rule(Field::NpcConquest, 66, Width::LegacyBool, Width::I32),
    added(Field::NpcBigMap, 96),
    added(Field::NpcCanTeleportTo, 97),
    added(Field::NpcConquestVisible, 107),
    rule(Field::ItemStackSize, 85, Width::U32, Width::U16),
    rule(Field::ItemStats, 85, Width::LegacyFixed, Width::StatTable),
    added(Field::ItemGlobalDropNotify, 77),
    added(Field::ItemSlots, 84),
    rule(Field::ItemRingBindTransform, 70, Width::Present, Width::Absent),
    rule(Field::MonsterLevel, 62, Width::U8, Width::U16),
    rule(Field::MonsterLegacyStatWidth, 62, Width::U8, Width::U16),
    rule(Field::MonsterStats, 85, Width::LegacyFixed, Width::StatTable),
    added(Field::MonsterRevival, 18),
    added(Field::MonsterDropPath, 89),
    added(Field::QuestTimeLimit, 91),
    added(Field::MapRespawnExtras, 68),
    added(Field::MapMovementConquest, 69),
    added(Field::MapMovementBigMap, 95),
    added(Field::MapNoTownTeleport, 78),
    added(Field::MapNoReincarnation, 79),
    added(Field::MapWeatherParticles, 110),
    added(Field::MapGt, 111),
    added(Field::MagicRange, 67),
    added(Field::MagicMultipliers, 71),
    rule(Field::GameShopCount, 85, Width::U32, Width::U16),
    added(Field::GameShopCanBuy, 106),
    added(Field::ConquestFlags, 73),
    added(Field::ConquestFullMap, 74),
    added(Field::ConquestControlPoints, 75),
    rule(Field::ConquestRepairCost, 85, Width::U32, Width::I32),
    rule(Field::RespawnCurrentDelay, 112, Width::Derived, Width::I64),
];

/// Field layout rules for one declared stream version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPolicy {
    version: i32,
}

impl VersionPolicy {
    /// Policy for `version`, rejecting anything outside the supported range.
    pub fn new(version: i32) -> Result<Self> {
        if !(MIN_VERSION..=LATEST_VERSION).contains(&version) {
            return Err(Error::UnsupportedVersion(version));
        }
        Ok(Self { version })
    }

    /// Policy for the layout the encoder writes.
    pub const fn latest() -> Self {
        Self { version: LATEST_VERSION }
    }

    pub const fn version(&self) -> i32 {
        self.version
    }

    /// Storage form of `field` at this version.
    pub fn field_width(&self, field: Field) -> Width {
        let rule = &RULES[field as usize];
        if self.version >= rule.since {
            rule.after
        } else {
            rule.before
        }
    }

    /// Whether `field` is stored (or applies) at this version.
    pub fn field_present(&self, field: Field) -> bool {
        self.field_width(field) != Width::Absent
    }
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self::latest()
    }
}
