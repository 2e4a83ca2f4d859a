//! The dragon event singleton.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter, Point};
use serde::{Deserialize, Serialize};

use crate::codec::Record;
use crate::version::VersionPolicy;
use crate::Result;

/// Number of experience thresholds stored on the wire.
pub const DRAGON_EXP_LEVELS: usize = 12;
/// Number of drop tables, one per dragon level.
pub const DRAGON_DROP_LEVELS: usize = 13;

/// One entry of a dragon drop table. Either `item_index` or `gold` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragonDropInfo {
    pub chance: i32,
    pub item_index: Option<i32>,
    pub gold: u32,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dragon {
    pub enabled: bool,
    pub map_file_name: String,
    pub monster_name: String,
    pub body_name: String,
    pub location: Point,
    pub drop_area_top: Point,
    pub drop_area_bottom: Point,
    pub exps: [i64; DRAGON_EXP_LEVELS],
    /// Drop tables indexed by level minus one. Filled by enrichment only.
    pub drops: Vec<Vec<DragonDropInfo>>,
}

impl Default for Dragon {
    fn default() -> Self {
        Self {
            enabled: false,
            map_file_name: "D2083".to_string(),
            monster_name: "Evil Mir".to_string(),
            body_name: "00".to_string(),
            location: Point::new(82, 44),
            drop_area_top: Point::new(75, 45),
            drop_area_bottom: Point::new(86, 57),
            exps: std::array::from_fn(|i| 10_000 * (i as i64 + 1)),
            drops: vec![Vec::new(); DRAGON_DROP_LEVELS],
        }
    }
}

impl Dragon {
    /// Empty every drop table, keeping all levels present.
    pub fn clear_drops(&mut self) {
        self.drops.clear();
        self.drops.resize(DRAGON_DROP_LEVELS, Vec::new());
    }
}

impl Record for Dragon {
    const KIND: &'static str = "dragon";

    fn decode(reader: &mut BinaryReader<'_>, _policy: &VersionPolicy) -> Result<Self> {
        let mut dragon = Dragon {
            enabled: reader.read_bool()?,
            map_file_name: reader.read_string()?,
            monster_name: reader.read_string()?,
            body_name: reader.read_string()?,
            location: reader.read_point()?,
            drop_area_top: reader.read_point()?,
            drop_area_bottom: reader.read_point()?,
            ..Dragon::default()
        };
        for exp in dragon.exps.iter_mut() {
            *exp = reader.read_i64()?;
        }
        Ok(dragon)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_bool(self.enabled)?;
        writer.write_string(&self.map_file_name)?;
        writer.write_string(&self.monster_name)?;
        writer.write_string(&self.body_name)?;
        writer.write_point(self.location)?;
        writer.write_point(self.drop_area_top)?;
        writer.write_point(self.drop_area_bottom)?;
        for exp in &self.exps {
            writer.write_i64(*exp)?;
        }
        Ok(())
    }
}
