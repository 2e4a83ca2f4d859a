//! NPC definitions.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter, Point};
use serde::{Deserialize, Serialize};

use crate::codec::{read_list, read_uint, write_list, Record};
use crate::version::{Field, VersionPolicy, Width};
use crate::Result;

const MAX_QUEST_LINKS: usize = 65_535;

/// An NPC placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Npc {
    pub index: i32,
    pub map_index: i32,
    pub collect_quest_indexes: Vec<i32>,
    pub finish_quest_indexes: Vec<i32>,
    pub file_name: String,
    pub name: String,
    pub location: Point,
    pub image: u16,
    pub rate: u16,
    pub time_visible: bool,
    pub hour_start: u8,
    pub minute_start: u8,
    pub hour_end: u8,
    pub minute_end: u8,
    pub min_lev: i16,
    pub max_lev: i16,
    pub day_of_week: String,
    pub class_required: String,
    pub conquest: i32,
    pub flag_needed: i32,
    pub show_on_big_map: bool,
    pub big_map_icon: i32,
    pub can_teleport_to: bool,
    pub conquest_visible: bool,
}

impl Default for Npc {
    fn default() -> Self {
        Self {
            index: 0,
            map_index: 0,
            collect_quest_indexes: Vec::new(),
            finish_quest_indexes: Vec::new(),
            file_name: String::new(),
            name: String::new(),
            location: Point::ZERO,
            image: 0,
            rate: 100,
            time_visible: false,
            hour_start: 0,
            minute_start: 0,
            hour_end: 0,
            minute_end: 1,
            min_lev: 0,
            max_lev: 0,
            day_of_week: String::new(),
            class_required: String::new(),
            conquest: 0,
            flag_needed: 0,
            show_on_big_map: false,
            big_map_icon: 0,
            can_teleport_to: false,
            conquest_visible: true,
        }
    }
}

impl Record for Npc {
    const KIND: &'static str = "npc";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let mut npc = Npc {
            index: reader.read_i32()?,
            map_index: reader.read_i32()?,
            collect_quest_indexes: read_list(reader, "collect quest", MAX_QUEST_LINKS, |r| Ok(r.read_i32()?))?,
            finish_quest_indexes: read_list(reader, "finish quest", MAX_QUEST_LINKS, |r| Ok(r.read_i32()?))?,
            file_name: reader.read_string()?,
            name: reader.read_string()?,
            location: reader.read_point()?,
            ..Npc::default()
        };

        npc.image = read_uint(reader, policy.field_width(Field::NpcImage))? as u16;
        npc.rate = reader.read_u16()?;

        if policy.field_present(Field::NpcTimeVisibility) {
            npc.time_visible = reader.read_bool()?;
            npc.hour_start = reader.read_u8()?;
            npc.minute_start = reader.read_u8()?;
            npc.hour_end = reader.read_u8()?;
            npc.minute_end = reader.read_u8()?;
            npc.min_lev = reader.read_i16()?;
            npc.max_lev = reader.read_i16()?;
            npc.day_of_week = reader.read_string()?;
            npc.class_required = reader.read_string()?;

            match policy.field_width(Field::NpcConquest) {
                Width::LegacyBool => {
                    let sabuk = reader.read_bool()?;
                    tracing::trace!(npc = npc.index, sabuk, "dropping legacy sabuk flag");
                }
                _ => npc.conquest = reader.read_i32()?,
            }

            npc.flag_needed = reader.read_i32()?;
        }

        if policy.field_present(Field::NpcBigMap) {
            npc.show_on_big_map = reader.read_bool()?;
            npc.big_map_icon = reader.read_i32()?;
        }
        if policy.field_present(Field::NpcCanTeleportTo) {
            npc.can_teleport_to = reader.read_bool()?;
        }
        if policy.field_present(Field::NpcConquestVisible) {
            npc.conquest_visible = reader.read_bool()?;
        }

        Ok(npc)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.index)?;
        writer.write_i32(self.map_index)?;
        write_list(writer, "collect quest", &self.collect_quest_indexes, |w, v| Ok(w.write_i32(*v)?))?;
        write_list(writer, "finish quest", &self.finish_quest_indexes, |w, v| Ok(w.write_i32(*v)?))?;
        writer.write_string(&self.file_name)?;
        writer.write_string(&self.name)?;
        writer.write_point(self.location)?;
        writer.write_u16(self.image)?;
        writer.write_u16(self.rate)?;
        writer.write_bool(self.time_visible)?;
        writer.write_u8(self.hour_start)?;
        writer.write_u8(self.minute_start)?;
        writer.write_u8(self.hour_end)?;
        writer.write_u8(self.minute_end)?;
        writer.write_i16(self.min_lev)?;
        writer.write_i16(self.max_lev)?;
        writer.write_string(&self.day_of_week)?;
        writer.write_string(&self.class_required)?;
        writer.write_i32(self.conquest)?;
        writer.write_i32(self.flag_needed)?;
        writer.write_bool(self.show_on_big_map)?;
        writer.write_i32(self.big_map_icon)?;
        writer.write_bool(self.can_teleport_to)?;
        writer.write_bool(self.conquest_visible)?;
        Ok(())
    }
}
