//! Map definitions and their zone, respawn and movement lists.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter, Point};
use serde::{Deserialize, Serialize};

use crate::codec::{read_list, write_list, Record};
use crate::types::{LightSetting, WeatherSetting, WireEnum};
use crate::version::{Field, VersionPolicy};
use crate::{Error, Result};

const MAX_MINE_ZONES: usize = 1000;
const MAX_ZONES: usize = 65_535;

/// A safe area on a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeZone {
    pub location: Point,
    pub size: u16,
    pub start_point: bool,
}

impl SafeZone {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            location: reader.read_point()?,
            size: reader.read_u16()?,
            start_point: reader.read_bool()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_point(self.location)?;
        writer.write_u16(self.size)?;
        writer.write_bool(self.start_point)?;
        Ok(())
    }
}

/// A monster spawn point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnInfo {
    pub monster_index: i32,
    pub location: Point,
    pub count: u16,
    pub spread: u16,
    pub delay: u16,
    pub direction: u8,
    pub route_path: String,
    pub random_delay: u16,
    pub respawn_index: i32,
    pub save_respawn_time: bool,
    pub respawn_ticks: u16,
}

impl RespawnInfo {
    fn read(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let mut respawn = Self {
            monster_index: reader.read_i32()?,
            location: reader.read_point()?,
            count: reader.read_u16()?,
            spread: reader.read_u16()?,
            delay: reader.read_u16()?,
            direction: reader.read_u8()?,
            route_path: reader.read_string()?,
            ..Self::default()
        };
        if policy.field_present(Field::MapRespawnExtras) {
            respawn.random_delay = reader.read_u16()?;
            respawn.respawn_index = reader.read_i32()?;
            respawn.save_respawn_time = reader.read_bool()?;
            respawn.respawn_ticks = reader.read_u16()?;
        }
        Ok(respawn)
    }

    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.monster_index)?;
        writer.write_point(self.location)?;
        writer.write_u16(self.count)?;
        writer.write_u16(self.spread)?;
        writer.write_u16(self.delay)?;
        writer.write_u8(self.direction)?;
        writer.write_string(&self.route_path)?;
        writer.write_u16(self.random_delay)?;
        writer.write_i32(self.respawn_index)?;
        writer.write_bool(self.save_respawn_time)?;
        writer.write_u16(self.respawn_ticks)?;
        Ok(())
    }
}

/// A link from a cell on this map to a cell on another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movement {
    pub map_index: i32,
    pub source: Point,
    pub destination: Point,
    pub need_hole: bool,
    pub need_move: bool,
    pub conquest_index: i32,
    pub show_on_big_map: bool,
    pub icon: i32,
}

impl Movement {
    fn read(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let mut movement = Self {
            map_index: reader.read_i32()?,
            source: reader.read_point()?,
            destination: reader.read_point()?,
            need_hole: reader.read_bool()?,
            need_move: reader.read_bool()?,
            ..Self::default()
        };
        if policy.field_present(Field::MapMovementConquest) {
            movement.conquest_index = reader.read_i32()?;
        }
        if policy.field_present(Field::MapMovementBigMap) {
            movement.show_on_big_map = reader.read_bool()?;
            movement.icon = reader.read_i32()?;
        }
        Ok(movement)
    }

    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.map_index)?;
        writer.write_point(self.source)?;
        writer.write_point(self.destination)?;
        writer.write_bool(self.need_hole)?;
        writer.write_bool(self.need_move)?;
        writer.write_i32(self.conquest_index)?;
        writer.write_bool(self.show_on_big_map)?;
        writer.write_i32(self.icon)?;
        Ok(())
    }
}

/// An area where mining yields a given mine table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineZone {
    pub location: Point,
    pub size: i32,
    pub mine: u8,
}

impl MineZone {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            location: reader.read_point()?,
            size: reader.read_i32()?,
            mine: reader.read_u8()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_point(self.location)?;
        writer.write_i32(self.size)?;
        writer.write_u8(self.mine)?;
        Ok(())
    }
}

/// A map definition.
///
/// `light` and `weather_particles` keep their raw stored values so that
/// [`Map::validate`] can report out-of-range data instead of hiding it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Map {
    pub index: i32,
    pub file_name: String,
    pub title: String,
    pub mini_map: u16,
    pub light: u8,
    pub big_map: u16,
    pub safe_zones: Vec<SafeZone>,
    pub respawns: Vec<RespawnInfo>,
    pub movements: Vec<Movement>,
    pub no_teleport: bool,
    pub no_reconnect: bool,
    pub no_reconnect_map: String,
    pub no_random: bool,
    pub no_escape: bool,
    pub no_recall: bool,
    pub no_drug: bool,
    pub no_position: bool,
    pub no_throw_item: bool,
    pub no_drop_player: bool,
    pub no_drop_monster: bool,
    pub no_names: bool,
    pub fight: bool,
    pub fire: bool,
    pub fire_damage: i32,
    pub lightning: bool,
    pub lightning_damage: i32,
    pub map_dark_light: u8,
    pub mine_zones: Vec<MineZone>,
    pub mine_index: u8,
    pub no_mount: bool,
    pub need_bridle: bool,
    pub no_fight: bool,
    pub music: u16,
    pub no_town_teleport: bool,
    pub no_reincarnation: bool,
    pub weather_particles: u16,
    pub gt: bool,
    pub gt_index: u8,
}

impl Map {
    pub fn light_setting(&self) -> Option<LightSetting> {
        LightSetting::from_wire(u32::from(self.light))
    }

    pub fn weather(&self) -> Option<WeatherSetting> {
        WeatherSetting::from_wire(u32::from(self.weather_particles))
    }
}

impl Record for Map {
    const KIND: &'static str = "map";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let mut map = Map {
            index: reader.read_i32()?,
            file_name: reader.read_string()?,
            title: reader.read_string()?,
            mini_map: reader.read_u16()?,
            light: reader.read_u8()?,
            big_map: reader.read_u16()?,
            ..Map::default()
        };

        map.safe_zones = read_list(reader, "safe zone", MAX_ZONES, SafeZone::read)?;
        map.respawns = read_list(reader, "respawn", MAX_ZONES, |r| RespawnInfo::read(r, policy))?;
        map.movements = read_list(reader, "movement", MAX_ZONES, |r| Movement::read(r, policy))?;

        map.no_teleport = reader.read_bool()?;
        map.no_reconnect = reader.read_bool()?;
        map.no_reconnect_map = reader.read_string()?;
        map.no_random = reader.read_bool()?;
        map.no_escape = reader.read_bool()?;
        map.no_recall = reader.read_bool()?;
        map.no_drug = reader.read_bool()?;
        map.no_position = reader.read_bool()?;
        map.no_throw_item = reader.read_bool()?;
        map.no_drop_player = reader.read_bool()?;
        map.no_drop_monster = reader.read_bool()?;
        map.no_names = reader.read_bool()?;
        map.fight = reader.read_bool()?;
        map.fire = reader.read_bool()?;
        map.fire_damage = reader.read_i32()?;
        map.lightning = reader.read_bool()?;
        map.lightning_damage = reader.read_i32()?;
        map.map_dark_light = reader.read_u8()?;

        map.mine_zones = read_list(reader, "mine zone", MAX_MINE_ZONES, MineZone::read)?;

        map.mine_index = reader.read_u8()?;
        map.no_mount = reader.read_bool()?;
        map.need_bridle = reader.read_bool()?;
        map.no_fight = reader.read_bool()?;
        map.music = reader.read_u16()?;

        if policy.field_present(Field::MapNoTownTeleport) {
            map.no_town_teleport = reader.read_bool()?;
        }
        if policy.field_present(Field::MapNoReincarnation) {
            map.no_reincarnation = reader.read_bool()?;
        }
        if policy.field_present(Field::MapWeatherParticles) {
            map.weather_particles = reader.read_u16()?;
        }
        if policy.field_present(Field::MapGt) {
            map.gt = reader.read_bool()?;
            map.gt_index = reader.read_u8()?;
        }

        Ok(map)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.index)?;
        writer.write_string(&self.file_name)?;
        writer.write_string(&self.title)?;
        writer.write_u16(self.mini_map)?;
        writer.write_u8(self.light)?;
        writer.write_u16(self.big_map)?;

        write_list(writer, "safe zone", &self.safe_zones, |w, zone| zone.write_to(w))?;
        write_list(writer, "respawn", &self.respawns, |w, respawn| respawn.write_to(w))?;
        write_list(writer, "movement", &self.movements, |w, movement| movement.write_to(w))?;

        writer.write_bool(self.no_teleport)?;
        writer.write_bool(self.no_reconnect)?;
        writer.write_string(&self.no_reconnect_map)?;
        for flag in [
            self.no_random,
            self.no_escape,
            self.no_recall,
            self.no_drug,
            self.no_position,
            self.no_throw_item,
            self.no_drop_player,
            self.no_drop_monster,
            self.no_names,
            self.fight,
            self.fire,
        ] {
            writer.write_bool(flag)?;
        }
        writer.write_i32(self.fire_damage)?;
        writer.write_bool(self.lightning)?;
        writer.write_i32(self.lightning_damage)?;
        writer.write_u8(self.map_dark_light)?;

        if self.mine_zones.len() > MAX_MINE_ZONES {
            return Err(Error::ValueOutOfRange {
                field: "mine zone count",
                value: self.mine_zones.len() as i64,
            });
        }
        write_list(writer, "mine zone", &self.mine_zones, |w, zone| zone.write_to(w))?;

        writer.write_u8(self.mine_index)?;
        writer.write_bool(self.no_mount)?;
        writer.write_bool(self.need_bridle)?;
        writer.write_bool(self.no_fight)?;
        writer.write_u16(self.music)?;
        writer.write_bool(self.no_town_teleport)?;
        writer.write_bool(self.no_reincarnation)?;
        writer.write_u16(self.weather_particles)?;
        writer.write_bool(self.gt)?;
        writer.write_u8(self.gt_index)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidRecord { what: Self::KIND, reason };
        if self.index < 0 {
            return Err(invalid(format!("negative index {}", self.index)));
        }
        if self.file_name.is_empty() {
            return Err(invalid(format!("map {} has no file name", self.index)));
        }
        if self.title.is_empty() {
            return Err(invalid(format!("map {} has no title", self.index)));
        }
        if self.light_setting().is_none() {
            return Err(invalid(format!("map {} light {} out of range", self.index, self.light)));
        }
        if self.weather().is_none() {
            return Err(invalid(format!(
                "map {} weather {} out of range",
                self.index, self.weather_particles
            )));
        }
        Ok(())
    }
}
