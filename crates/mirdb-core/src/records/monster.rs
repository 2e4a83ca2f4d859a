//! Monster definitions.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter};
use serde::{Deserialize, Serialize};

use crate::codec::{read_uint, Record};
use crate::stat::{Stat, StatTable};
use crate::version::{Field, VersionPolicy, Width};
use crate::Result;

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

/// A monster definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monster {
    pub index: i32,
    pub name: String,
    pub image: u16,
    pub ai: u8,
    pub effect: u8,
    pub level: u16,
    pub view_range: u8,
    pub cool_eye: u8,
    pub stats: StatTable,
    pub light: u8,
    pub attack_speed: u16,
    pub move_speed: u16,
    pub experience: u32,
    pub can_push: bool,
    pub can_tame: bool,
    pub auto_rev: bool,
    pub undead: bool,
    pub drop_path: String,
}

impl Default for Monster {
    fn default() -> Self {
        Self {
            index: 0,
            name: String::new(),
            image: 0,
            ai: 0,
            effect: 0,
            level: 0,
            view_range: 7,
            cool_eye: 0,
            stats: StatTable::new(),
            light: 0,
            attack_speed: 2500,
            move_speed: 1800,
            experience: 0,
            can_push: true,
            can_tame: true,
            auto_rev: true,
            undead: false,
            drop_path: String::new(),
        }
    }
}

fn read_legacy_stats(reader: &mut BinaryReader<'_>, width: Width) -> Result<StatTable> {
    let mut stats = StatTable::new();
    stats.set(Stat::HP, reader.read_u32()? as i32);
    for stat in LEGACY_COMBAT {
        stats.set(stat, read_uint(reader, width)? as i32);
    }
    stats.set(Stat::Accuracy, i32::from(reader.read_u8()?));
    stats.set(Stat::Agility, i32::from(reader.read_u8()?));
    Ok(stats)
}

impl Record for Monster {
    const KIND: &'static str = "monster";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let mut monster = Monster {
            index: reader.read_i32()?,
            name: reader.read_string()?,
            image: reader.read_u16()?,
            ai: reader.read_u8()?,
            effect: reader.read_u8()?,
            ..Monster::default()
        };

        // Both widths are at most 16 bits.
        monster.level = read_uint(reader, policy.field_width(Field::MonsterLevel))? as u16;
        monster.view_range = reader.read_u8()?;
        monster.cool_eye = reader.read_u8()?;

        monster.stats = match policy.field_width(Field::MonsterStats) {
            Width::StatTable => StatTable::read(reader)?,
            _ => read_legacy_stats(reader, policy.field_width(Field::MonsterLegacyStatWidth))?,
        };

        monster.light = reader.read_u8()?;
        monster.attack_speed = reader.read_u16()?;
        monster.move_speed = reader.read_u16()?;
        monster.experience = reader.read_u32()?;
        monster.can_push = reader.read_bool()?;
        monster.can_tame = reader.read_bool()?;

        if policy.field_present(Field::MonsterRevival) {
            monster.auto_rev = reader.read_bool()?;
            monster.undead = reader.read_bool()?;
        }

        if policy.field_present(Field::MonsterDropPath) {
            monster.drop_path = reader.read_string()?;
        }

        Ok(monster)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.index)?;
        writer.write_string(&self.name)?;
        writer.write_u16(self.image)?;
        writer.write_u8(self.ai)?;
        writer.write_u8(self.effect)?;
        writer.write_u16(self.level)?;
        writer.write_u8(self.view_range)?;
        writer.write_u8(self.cool_eye)?;
        self.stats.write_to(writer)?;
        writer.write_u8(self.light)?;
        writer.write_u16(self.attack_speed)?;
        writer.write_u16(self.move_speed)?;
        writer.write_u32(self.experience)?;
        writer.write_bool(self.can_push)?;
        writer.write_bool(self.can_tame)?;
        writer.write_bool(self.auto_rev)?;
        writer.write_bool(self.undead)?;
        writer.write_string(&self.drop_path)?;
        Ok(())
    }
}
