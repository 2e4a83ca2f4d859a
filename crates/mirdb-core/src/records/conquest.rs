//! Guild conquest definitions.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter, Point};
use serde::{Deserialize, Serialize};

use crate::codec::{read_list, write_list, Record};
use crate::types::{decode_tolerant, ConquestGame, ConquestType, WireEnum};
use crate::version::{Field, VersionPolicy, Width};
use crate::{Error, Result};

const MAX_STRUCTURES: usize = 10_000;
const MAX_EXTRA_MAPS: usize = 10_000;

/// A guard, gate, wall or siege placement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConquestStructure {
    pub index: i32,
    pub location: Point,
    pub mob_index: i32,
    pub name: String,
    /// Guards store this as u32, every other structure as i32.
    pub repair_cost: i64,
}

/// A flag or control point.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConquestFlag {
    pub index: i32,
    pub location: Point,
    pub name: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CostWidth {
    Unsigned,
    Signed,
}

impl ConquestStructure {
    fn read(reader: &mut BinaryReader<'_>, cost: CostWidth) -> Result<Self> {
        let index = reader.read_i32()?;
        let location = reader.read_point()?;
        let mob_index = reader.read_i32()?;
        let name = reader.read_string()?;
        let repair_cost = match cost {
            CostWidth::Unsigned => i64::from(reader.read_u32()?),
            CostWidth::Signed => i64::from(reader.read_i32()?),
        };
        Ok(Self {
            index,
            location,
            mob_index,
            name,
            repair_cost,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>, cost: CostWidth) -> Result<()> {
        writer.write_i32(self.index)?;
        writer.write_point(self.location)?;
        writer.write_i32(self.mob_index)?;
        writer.write_string(&self.name)?;
        let out_of_range = || Error::ValueOutOfRange {
            field: "conquest repair cost",
            value: self.repair_cost,
        };
        match cost {
            CostWidth::Unsigned => writer.write_u32(u32::try_from(self.repair_cost).map_err(|_| out_of_range())?)?,
            CostWidth::Signed => writer.write_i32(i32::try_from(self.repair_cost).map_err(|_| out_of_range())?)?,
        }
        Ok(())
    }
}

impl ConquestFlag {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            index: reader.read_i32()?,
            location: reader.read_point()?,
            name: reader.read_string()?,
            file_name: reader.read_string()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.index)?;
        writer.write_point(self.location)?;
        writer.write_string(&self.name)?;
        writer.write_string(&self.file_name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conquest {
    pub index: i32,
    pub full_map: bool,
    pub location: Point,
    pub size: u16,
    pub name: String,
    pub map_index: i32,
    pub palace_index: i32,
    pub guard_index: i32,
    pub gate_index: i32,
    pub wall_index: i32,
    pub siege_index: i32,
    pub flag_index: i32,
    pub guards: Vec<ConquestStructure>,
    pub extra_maps: Vec<i32>,
    pub gates: Vec<ConquestStructure>,
    pub walls: Vec<ConquestStructure>,
    pub sieges: Vec<ConquestStructure>,
    pub flags: Vec<ConquestFlag>,
    pub start_hour: u8,
    pub war_length: i32,
    #[serde(rename = "type")]
    pub conquest_type: ConquestType,
    pub game: ConquestGame,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub king_location: Point,
    pub king_size: u16,
    pub control_point_index: i32,
    pub control_points: Vec<ConquestFlag>,
}

impl Default for Conquest {
    fn default() -> Self {
        Self {
            index: 0,
            full_map: false,
            location: Point::ZERO,
            size: 0,
            name: String::new(),
            map_index: 0,
            palace_index: 0,
            guard_index: 0,
            gate_index: 0,
            wall_index: 0,
            siege_index: 0,
            flag_index: 0,
            guards: Vec::new(),
            extra_maps: Vec::new(),
            gates: Vec::new(),
            walls: Vec::new(),
            sieges: Vec::new(),
            flags: Vec::new(),
            start_hour: 0,
            war_length: 60,
            conquest_type: ConquestType::default(),
            game: ConquestGame::default(),
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            saturday: false,
            sunday: false,
            king_location: Point::ZERO,
            king_size: 0,
            control_point_index: 0,
            control_points: Vec::new(),
        }
    }
}

impl Conquest {
    fn weekdays_mut(&mut self) -> [&mut bool; 7] {
        [
            &mut self.monday,
            &mut self.tuesday,
            &mut self.wednesday,
            &mut self.thursday,
            &mut self.friday,
            &mut self.saturday,
            &mut self.sunday,
        ]
    }

    fn weekdays(&self) -> [bool; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }
}

impl Record for Conquest {
    const KIND: &'static str = "conquest";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let mut conquest = Conquest {
            index: reader.read_i32()?,
            ..Conquest::default()
        };

        if policy.field_present(Field::ConquestFullMap) {
            conquest.full_map = reader.read_bool()?;
        }
        conquest.location = reader.read_point()?;
        conquest.size = reader.read_u16()?;
        conquest.name = reader.read_string()?;
        conquest.map_index = reader.read_i32()?;
        conquest.palace_index = reader.read_i32()?;
        conquest.guard_index = reader.read_i32()?;
        conquest.gate_index = reader.read_i32()?;
        conquest.wall_index = reader.read_i32()?;
        conquest.siege_index = reader.read_i32()?;

        let has_flags = policy.field_present(Field::ConquestFlags);
        if has_flags {
            conquest.flag_index = reader.read_i32()?;
        }

        let cost = match policy.field_width(Field::ConquestRepairCost) {
            Width::U32 => CostWidth::Unsigned,
            _ => CostWidth::Signed,
        };

        conquest.guards = read_list(reader, "conquest guard", MAX_STRUCTURES, |r| {
            ConquestStructure::read(r, CostWidth::Unsigned)
        })?;
        conquest.extra_maps = read_list(reader, "conquest extra map", MAX_EXTRA_MAPS, |r| Ok(r.read_i32()?))?;
        conquest.gates = read_list(reader, "conquest gate", MAX_STRUCTURES, |r| ConquestStructure::read(r, cost))?;
        conquest.walls = read_list(reader, "conquest wall", MAX_STRUCTURES, |r| ConquestStructure::read(r, cost))?;
        conquest.sieges = read_list(reader, "conquest siege", MAX_STRUCTURES, |r| ConquestStructure::read(r, cost))?;
        if has_flags {
            conquest.flags = read_list(reader, "conquest flag", MAX_STRUCTURES, ConquestFlag::read)?;
        }

        conquest.start_hour = reader.read_u8()?;
        conquest.war_length = reader.read_i32()?;
        conquest.conquest_type = decode_tolerant(reader.read_u8()?.into());
        conquest.game = decode_tolerant(reader.read_u8()?.into());
        for day in conquest.weekdays_mut() {
            *day = reader.read_bool()?;
        }
        conquest.king_location = reader.read_point()?;
        conquest.king_size = reader.read_u16()?;

        if policy.field_present(Field::ConquestControlPoints) {
            conquest.control_point_index = reader.read_i32()?;
            conquest.control_points = read_list(reader, "conquest control point", MAX_STRUCTURES, ConquestFlag::read)?;
        }

        Ok(conquest)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.index)?;
        writer.write_bool(self.full_map)?;
        writer.write_point(self.location)?;
        writer.write_u16(self.size)?;
        writer.write_string(&self.name)?;
        for v in [
            self.map_index,
            self.palace_index,
            self.guard_index,
            self.gate_index,
            self.wall_index,
            self.siege_index,
            self.flag_index,
        ] {
            writer.write_i32(v)?;
        }

        write_list(writer, "conquest guard", &self.guards, |w, s| s.write_to(w, CostWidth::Unsigned))?;
        write_list(writer, "conquest extra map", &self.extra_maps, |w, v| Ok(w.write_i32(*v)?))?;
        write_list(writer, "conquest gate", &self.gates, |w, s| s.write_to(w, CostWidth::Signed))?;
        write_list(writer, "conquest wall", &self.walls, |w, s| s.write_to(w, CostWidth::Signed))?;
        write_list(writer, "conquest siege", &self.sieges, |w, s| s.write_to(w, CostWidth::Signed))?;
        write_list(writer, "conquest flag", &self.flags, |w, f| f.write_to(w))?;

        writer.write_u8(self.start_hour)?;
        writer.write_i32(self.war_length)?;
        writer.write_u8(self.conquest_type.to_wire() as u8)?;
        writer.write_u8(self.game.to_wire() as u8)?;
        for day in self.weekdays() {
            writer.write_bool(day)?;
        }
        writer.write_point(self.king_location)?;
        writer.write_u16(self.king_size)?;
        writer.write_i32(self.control_point_index)?;
        write_list(writer, "conquest control point", &self.control_points, |w, f| f.write_to(w))?;
        Ok(())
    }
}
