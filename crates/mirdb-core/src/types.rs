//! Wire enumerations and flag sets.
//!
//! Enumerated fields are decoded tolerantly: a byte that no longer names a
//! member decodes to the type's default member instead of failing the record.
//! [`decode_tolerant`] is the single place that policy lives.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A type with a numeric wire representation and a default member.
pub trait WireEnum: Copy + Sized {
    /// Member substituted for unknown wire values.
    const DEFAULT: Self;

    fn from_wire(value: u32) -> Option<Self>;

    fn to_wire(self) -> u32;
}

/// Decode `raw`, substituting `T::DEFAULT` when it names no member.
pub fn decode_tolerant<T: WireEnum>(raw: u32) -> T {
    match T::from_wire(raw) {
        Some(value) => value,
        None => {
            tracing::debug!(
                value = raw,
                kind = std::any::type_name::<T>(),
                "unknown enum value, using default"
            );
            T::DEFAULT
        }
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : default $default:ident {
            $($variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $name {
            /// All members in wire order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Parse from a wire byte.
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Get the member name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl WireEnum for $name {
            const DEFAULT: Self = Self::$default;

            fn from_wire(value: u32) -> Option<Self> {
                u8::try_from(value).ok().and_then(Self::from_u8)
            }

            fn to_wire(self) -> u32 {
                self as u32
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// Item category.
    pub enum ItemType: default Nothing {
        Nothing = 0,
        Weapon = 1,
        Armour = 2,
        Helmet = 3,
        Necklace = 4,
        Bracelet = 5,
        Ring = 6,
        Amulet = 7,
        Belt = 8,
        Boots = 9,
        Stone = 10,
        Torch = 11,
        Potion = 12,
        Ore = 13,
        Meat = 14,
        CraftingMaterial = 15,
        Scroll = 16,
        Gem = 17,
        Mount = 18,
        Book = 19,
        Script = 20,
        Reins = 21,
        Bells = 22,
        Saddle = 23,
        Ribbon = 24,
        Mask = 25,
        Food = 26,
        Hook = 27,
        Float = 28,
        Bait = 29,
        Finder = 30,
        Reel = 31,
        Fish = 32,
        Quest = 33,
        Awakening = 34,
        Pets = 35,
        Transform = 36,
        Deco = 37,
    }
}

wire_enum! {
    /// Item rarity.
    pub enum ItemGrade: default None {
        None = 0,
        Common = 1,
        Rare = 2,
        Legendary = 3,
        Mythical = 4,
    }
}

wire_enum! {
    /// Attribute checked against `required_amount` before equipping.
    pub enum RequiredType: default Level {
        Level = 0,
        MaxAC = 1,
        MaxMAC = 2,
        MaxDC = 3,
        MaxMC = 4,
        MaxSC = 5,
        MaxLevel = 6,
        MinAC = 7,
        MinMAC = 8,
        MinDC = 9,
        MinMC = 10,
        MinSC = 11,
    }
}

wire_enum! {
    /// Character class restriction.
    pub enum RequiredClass: default None {
        None = 0,
        Warrior = 1,
        Wizard = 2,
        Taoist = 3,
        Assassin = 4,
        Archer = 5,
    }
}

wire_enum! {
    pub enum RequiredGender: default None {
        None = 0,
        Male = 1,
        Female = 2,
    }
}

wire_enum! {
    /// Equipment set membership.
    pub enum ItemSet: default None {
        None = 0,
        Spirit = 1,
        Recall = 2,
        RedOrchid = 3,
        RedFlame = 4,
        WhiteGold = 5,
        WhiteGoldH = 6,
        WhiteGoldL = 7,
        WhiteGoldW = 8,
        WhiteGoldM = 9,
        WhiteGoldT = 10,
        WhiteGoldA = 11,
        WhiteGoldI = 12,
        WhiteGoldS = 13,
        WhiteGoldC = 14,
        WhiteGoldB = 15,
        WhiteGoldD = 16,
        WhiteGoldE = 17,
        WhiteGoldF = 18,
        WhiteGoldG = 19,
        WhiteGoldJ = 20,
        WhiteGoldK = 21,
        WhiteGoldN = 22,
        WhiteGoldO = 23,
        WhiteGoldP = 24,
        WhiteGoldQ = 25,
        WhiteGoldR = 26,
        WhiteGoldU = 27,
        WhiteGoldV = 28,
        WhiteGoldX = 29,
        WhiteGoldY = 30,
        WhiteGoldZ = 31,
    }
}

wire_enum! {
    /// Map ambient lighting.
    pub enum LightSetting: default Normal {
        Normal = 0,
        Dawn = 1,
        Day = 2,
        Dusk = 3,
        Night = 4,
    }
}

wire_enum! {
    /// Map weather particle effect.
    pub enum WeatherSetting: default None {
        None = 0,
        Rain = 1,
        Snow = 2,
        Fog = 3,
    }
}

wire_enum! {
    /// Spell kind of a magic record.
    ///
    /// Only these ids are known. Any other byte decodes to `None` and is
    /// written back as 0.
    pub enum Spell: default None {
        None = 0,
        FireBall = 1,
        Healing = 2,
    }
}

wire_enum! {
    pub enum QuestType: default General {
        General = 0,
        Daily = 1,
        Weekly = 2,
        Repeatable = 3,
        Story = 4,
        Achievement = 5,
        Tutorial = 6,
    }
}

wire_enum! {
    /// How a conquest war is started.
    pub enum ConquestType: default Request {
        Request = 0,
        AutoWar = 1,
        Forced = 2,
    }
}

wire_enum! {
    /// Win condition of a conquest war.
    pub enum ConquestGame: default CapturePalace {
        CapturePalace = 0,
        KingOfHill = 1,
        Random = 2,
        Classic = 3,
        ControlPoints = 4,
    }
}

bitflags! {
    /// Restrictions bound to an item. Stored as an i16.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BindMode: u16 {
        const DONT_DROP = 1;
        const DONT_DEATH_DROP = 1 << 1;
        const DONT_STORE = 1 << 2;
        const DONT_TRADE = 1 << 3;
        const DONT_REPAIR = 1 << 4;
        const DONT_SELL = 1 << 5;
        const DONT_DROP_RARE = 1 << 6;
        const BREAK_ON_DEATH = 1 << 7;
        const BIND_ON_EQUIP = 1 << 8;
        const NO_WEDDING_RING = 1 << 12;
    }
}

bitflags! {
    /// Special behaviour of an item.
    ///
    /// The wire field is an i16, so members above bit 15 exist in the model
    /// but cannot be written.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SpecialItemMode: u32 {
        const PARALIZE = 1;
        const TELEPORT = 1 << 1;
        const CLEAR_RING = 1 << 2;
        const PROTECTION = 1 << 3;
        const REVIVAL = 1 << 4;
        const MUSCLE = 1 << 5;
        const FLAME = 1 << 6;
        const HEALING = 1 << 7;
        const PROBE = 1 << 8;
        const SKILL = 1 << 9;
        const NO_DURA_LOSS = 1 << 10;
        const BLINK = 1 << 11;
        const BLESSING = 1 << 12;
        const CURSE = 1 << 13;
        const NO_DROP = 1 << 14;
        const NO_DEATH_DROP = 1 << 15;
        const NO_STORE = 1 << 16;
        const NO_TRADE = 1 << 17;
        const NO_REPAIR = 1 << 18;
        const NO_SELL = 1 << 19;
        const NO_WEDDING_RING = 1 << 20;
    }
}

// A flag value carrying any undefined bit is out of range as a whole and
// decodes to the empty set.
impl WireEnum for BindMode {
    const DEFAULT: Self = Self::empty();

    fn from_wire(value: u32) -> Option<Self> {
        u16::try_from(value).ok().and_then(Self::from_bits)
    }

    fn to_wire(self) -> u32 {
        u32::from(self.bits())
    }
}

impl WireEnum for SpecialItemMode {
    const DEFAULT: Self = Self::empty();

    fn from_wire(value: u32) -> Option<Self> {
        Self::from_bits(value)
    }

    fn to_wire(self) -> u32 {
        self.bits()
    }
}

/// Reinterpret an i16 flag field as its unsigned bit pattern.
pub(crate) fn flags_from_i16(raw: i16) -> u32 {
    u32::from(raw as u16)
}

/// Narrow a flag set to the i16 the wire stores, failing when bits would be lost.
pub(crate) fn flags_to_i16<T: WireEnum>(field: &'static str, value: T) -> Result<i16> {
    let bits = value.to_wire();
    u16::try_from(bits)
        .map(|bits| bits as i16)
        .map_err(|_| Error::ValueOutOfRange {
            field,
            value: i64::from(bits),
        })
}
