//! Item definitions.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter};
use serde::{Deserialize, Serialize};

use crate::codec::{read_uint, saturate_u16, Record};
use crate::stat::{Stat, StatTable};
use crate::types::{
    decode_tolerant, flags_from_i16, flags_to_i16, BindMode, ItemGrade, ItemSet, ItemType,
    RequiredClass, RequiredGender, RequiredType, SpecialItemMode, WireEnum,
};
use crate::version::{Field, VersionPolicy, Width};
use crate::Result;

const NEED_IDENTIFY: u8 = 0x01;
const SHOW_GROUP_PICKUP: u8 = 0x02;
const CLASS_BASED: u8 = 0x04;
const LEVEL_BASED: u8 = 0x08;
const CAN_MINE: u8 = 0x10;
const GLOBAL_DROP_NOTIFY: u8 = 0x20;

// Legacy layouts store stats as individual fields in four runs between
// regular item fields.
const LEGACY_COMBAT: [Stat; 10] = [
    Stat::MinAC,
    Stat::MaxAC,
    Stat::MinMAC,
    Stat::MaxMAC,
    Stat::MinDC,
    Stat::MaxDC,
    Stat::MinMC,
    Stat::MaxMC,
    Stat::MinSC,
    Stat::MaxSC,
];
const LEGACY_ATTRIBUTES: [Stat; 4] = [Stat::Accuracy, Stat::Agility, Stat::Luck, Stat::AttackSpeed];
const LEGACY_WEIGHTS: [Stat; 3] = [Stat::BagWeight, Stat::HandWeight, Stat::WearWeight];
const LEGACY_RESISTANCES: [Stat; 10] = [
    Stat::Strong,
    Stat::MagicResist,
    Stat::PoisonResist,
    Stat::HealthRecovery,
    Stat::SpellRecovery,
    Stat::PoisonRecovery,
    Stat::HPRatePercent,
    Stat::MPRatePercent,
    Stat::CriticalRate,
    Stat::CriticalDamage,
];
const LEGACY_ELEMENTS: [Stat; 5] = [
    Stat::MaxACRatePercent,
    Stat::MaxMACRatePercent,
    Stat::Holy,
    Stat::Freezing,
    Stat::PoisonAttack,
];
const LEGACY_REFLECT: [Stat; 2] = [Stat::Reflect, Stat::HPDrainRatePercent];

/// An item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub index: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub grade: ItemGrade,
    pub required_type: RequiredType,
    pub required_class: RequiredClass,
    pub required_gender: RequiredGender,
    pub set: ItemSet,
    pub shape: i16,
    pub weight: u8,
    pub light: u8,
    pub required_amount: u8,
    pub image: u16,
    pub durability: u16,
    pub stack_size: u16,
    pub price: u32,
    pub start_item: bool,
    pub effect: u8,
    pub need_identify: bool,
    pub show_group_pickup: bool,
    pub class_based: bool,
    pub level_based: bool,
    pub can_mine: bool,
    pub global_drop_notify: bool,
    pub bind: BindMode,
    pub unique: SpecialItemMode,
    pub random_stats_id: u8,
    pub can_fast_run: bool,
    pub can_awakening: bool,
    pub slots: u8,
    pub stats: StatTable,
    /// Tooltip text. `None` is stored as a false flag with no string.
    pub tool_tip: Option<String>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            index: 0,
            name: String::new(),
            item_type: ItemType::Nothing,
            grade: ItemGrade::None,
            required_type: RequiredType::Level,
            required_class: RequiredClass::None,
            required_gender: RequiredGender::None,
            set: ItemSet::None,
            shape: 0,
            weight: 0,
            light: 0,
            required_amount: 0,
            image: 0,
            durability: 0,
            stack_size: 1,
            price: 0,
            start_item: false,
            effect: 0,
            need_identify: false,
            show_group_pickup: false,
            class_based: false,
            level_based: false,
            can_mine: false,
            global_drop_notify: false,
            bind: BindMode::empty(),
            unique: SpecialItemMode::empty(),
            random_stats_id: 0,
            can_fast_run: false,
            can_awakening: false,
            slots: 0,
            stats: StatTable::new(),
            tool_tip: None,
        }
    }
}

fn read_legacy_bytes(reader: &mut BinaryReader<'_>, stats: &mut StatTable, run: &[Stat]) -> Result<()> {
    for stat in run {
        stats.set(*stat, i32::from(reader.read_u8()?));
    }
    Ok(())
}

impl Item {
    fn flags_byte(&self) -> u8 {
        let mut flags = 0;
        for (set, bit) in [
            (self.need_identify, NEED_IDENTIFY),
            (self.show_group_pickup, SHOW_GROUP_PICKUP),
            (self.class_based, CLASS_BASED),
            (self.level_based, LEVEL_BASED),
            (self.can_mine, CAN_MINE),
            (self.global_drop_notify, GLOBAL_DROP_NOTIFY),
        ] {
            if set {
                flags |= bit;
            }
        }
        flags
    }
}

impl Record for Item {
    const KIND: &'static str = "item";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let legacy_stats = policy.field_width(Field::ItemStats) == Width::LegacyFixed;
        let mut item = Item {
            index: reader.read_i32()?,
            name: reader.read_string()?,
            item_type: decode_tolerant(reader.read_u8()?.into()),
            grade: decode_tolerant(reader.read_u8()?.into()),
            required_type: decode_tolerant(reader.read_u8()?.into()),
            required_class: decode_tolerant(reader.read_u8()?.into()),
            required_gender: decode_tolerant(reader.read_u8()?.into()),
            set: decode_tolerant(reader.read_u8()?.into()),
            shape: reader.read_i16()?,
            weight: reader.read_u8()?,
            light: reader.read_u8()?,
            required_amount: reader.read_u8()?,
            image: reader.read_u16()?,
            durability: reader.read_u16()?,
            ..Item::default()
        };

        let stack_size = read_uint(reader, policy.field_width(Field::ItemStackSize))?;
        item.stack_size = saturate_u16("item stack size", stack_size);
        item.price = reader.read_u32()?;

        if legacy_stats {
            read_legacy_bytes(reader, &mut item.stats, &LEGACY_COMBAT)?;
            item.stats.set(Stat::HP, i32::from(reader.read_u16()?));
            item.stats.set(Stat::MP, i32::from(reader.read_u16()?));
            read_legacy_bytes(reader, &mut item.stats, &LEGACY_ATTRIBUTES)?;
        }

        item.start_item = reader.read_bool()?;

        if legacy_stats {
            read_legacy_bytes(reader, &mut item.stats, &LEGACY_WEIGHTS)?;
        }

        item.effect = reader.read_u8()?;

        if legacy_stats {
            read_legacy_bytes(reader, &mut item.stats, &LEGACY_RESISTANCES)?;
        }

        let flags = reader.read_u8()?;
        item.need_identify = flags & NEED_IDENTIFY != 0;
        item.show_group_pickup = flags & SHOW_GROUP_PICKUP != 0;
        item.class_based = flags & CLASS_BASED != 0;
        item.level_based = flags & LEVEL_BASED != 0;
        item.can_mine = flags & CAN_MINE != 0;
        if policy.field_present(Field::ItemGlobalDropNotify) {
            item.global_drop_notify = flags & GLOBAL_DROP_NOTIFY != 0;
        }

        if legacy_stats {
            read_legacy_bytes(reader, &mut item.stats, &LEGACY_ELEMENTS)?;
        }

        item.bind = decode_tolerant(flags_from_i16(reader.read_i16()?));

        if legacy_stats {
            read_legacy_bytes(reader, &mut item.stats, &LEGACY_REFLECT)?;
        }

        item.unique = decode_tolerant(flags_from_i16(reader.read_i16()?));
        item.random_stats_id = reader.read_u8()?;
        item.can_fast_run = reader.read_bool()?;
        item.can_awakening = reader.read_bool()?;

        if policy.field_present(Field::ItemSlots) {
            item.slots = reader.read_u8()?;
        }

        if !legacy_stats {
            item.stats = StatTable::read(reader)?;
        }

        if reader.read_bool()? {
            item.tool_tip = Some(reader.read_string()?);
        }

        if policy.field_present(Field::ItemRingBindTransform)
            && item.item_type == ItemType::Ring
            && !item.unique.is_empty()
        {
            item.bind |= BindMode::NO_WEDDING_RING;
        }

        Ok(item)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.index)?;
        writer.write_string(&self.name)?;
        writer.write_u8(self.item_type.to_wire() as u8)?;
        writer.write_u8(self.grade.to_wire() as u8)?;
        writer.write_u8(self.required_type.to_wire() as u8)?;
        writer.write_u8(self.required_class.to_wire() as u8)?;
        writer.write_u8(self.required_gender.to_wire() as u8)?;
        writer.write_u8(self.set.to_wire() as u8)?;
        writer.write_i16(self.shape)?;
        writer.write_u8(self.weight)?;
        writer.write_u8(self.light)?;
        writer.write_u8(self.required_amount)?;
        writer.write_u16(self.image)?;
        writer.write_u16(self.durability)?;
        writer.write_u16(self.stack_size)?;
        writer.write_u32(self.price)?;
        writer.write_bool(self.start_item)?;
        writer.write_u8(self.effect)?;
        writer.write_u8(self.flags_byte())?;
        writer.write_i16(flags_to_i16("item bind", self.bind)?)?;
        writer.write_i16(flags_to_i16("item special mode", self.unique)?)?;
        writer.write_u8(self.random_stats_id)?;
        writer.write_bool(self.can_fast_run)?;
        writer.write_bool(self.can_awakening)?;
        writer.write_u8(self.slots)?;
        self.stats.write_to(writer)?;
        writer.write_bool(self.tool_tip.is_some())?;
        if let Some(tool_tip) = &self.tool_tip {
            writer.write_string(tool_tip)?;
        }
        Ok(())
    }
}
