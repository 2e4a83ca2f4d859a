//! Spell definitions.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter};
use serde::{Deserialize, Serialize};

use crate::codec::Record;
use crate::types::{decode_tolerant, Spell, WireEnum};
use crate::version::{Field, VersionPolicy};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Magic {
    pub name: String,
    pub spell: Spell,
    pub base_cost: u8,
    pub level_cost: u8,
    pub icon: u8,
    pub level1: u8,
    pub level2: u8,
    pub level3: u8,
    pub need1: u16,
    pub need2: u16,
    pub need3: u16,
    pub delay_base: u32,
    pub delay_reduction: u32,
    pub power_base: u16,
    pub power_bonus: u16,
    pub mpower_base: u16,
    pub mpower_bonus: u16,
    pub range: u8,
    pub multiplier_base: f32,
    pub multiplier_bonus: f32,
}

impl Default for Magic {
    fn default() -> Self {
        Self {
            name: String::new(),
            spell: Spell::None,
            base_cost: 0,
            level_cost: 0,
            icon: 0,
            level1: 0,
            level2: 0,
            level3: 0,
            need1: 0,
            need2: 0,
            need3: 0,
            delay_base: 1800,
            delay_reduction: 0,
            power_base: 0,
            power_bonus: 0,
            mpower_base: 0,
            mpower_bonus: 0,
            range: 9,
            multiplier_base: 1.0,
            multiplier_bonus: 0.0,
        }
    }
}

impl Record for Magic {
    const KIND: &'static str = "magic";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let mut magic = Magic {
            name: reader.read_string()?,
            spell: decode_tolerant(reader.read_u8()?.into()),
            base_cost: reader.read_u8()?,
            level_cost: reader.read_u8()?,
            icon: reader.read_u8()?,
            level1: reader.read_u8()?,
            level2: reader.read_u8()?,
            level3: reader.read_u8()?,
            need1: reader.read_u16()?,
            need2: reader.read_u16()?,
            need3: reader.read_u16()?,
            delay_base: reader.read_u32()?,
            delay_reduction: reader.read_u32()?,
            power_base: reader.read_u16()?,
            power_bonus: reader.read_u16()?,
            mpower_base: reader.read_u16()?,
            mpower_bonus: reader.read_u16()?,
            ..Magic::default()
        };

        if policy.field_present(Field::MagicRange) {
            magic.range = reader.read_u8()?;
        }
        if policy.field_present(Field::MagicMultipliers) {
            magic.multiplier_base = reader.read_f32()?;
            magic.multiplier_bonus = reader.read_f32()?;
        }

        Ok(magic)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_string(&self.name)?;
        writer.write_u8(self.spell.to_wire() as u8)?;
        for v in [
            self.base_cost,
            self.level_cost,
            self.icon,
            self.level1,
            self.level2,
            self.level3,
        ] {
            writer.write_u8(v)?;
        }
        writer.write_u16(self.need1)?;
        writer.write_u16(self.need2)?;
        writer.write_u16(self.need3)?;
        writer.write_u32(self.delay_base)?;
        writer.write_u32(self.delay_reduction)?;
        writer.write_u16(self.power_base)?;
        writer.write_u16(self.power_bonus)?;
        writer.write_u16(self.mpower_base)?;
        writer.write_u16(self.mpower_bonus)?;
        writer.write_u8(self.range)?;
        writer.write_f32(self.multiplier_base)?;
        writer.write_f32(self.multiplier_bonus)?;
        Ok(())
    }
}
