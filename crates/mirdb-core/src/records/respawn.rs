//! The respawn timer singleton.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter};
use serde::{Deserialize, Serialize};

use crate::codec::{read_list, write_list, Record};
use crate::version::{Field, VersionPolicy, Width};
use crate::Result;

const MAX_OPTIONS: usize = 1_000;
const MILLIS_PER_MINUTE: i64 = 60_000;

/// Spawn delay reduction applied once `user_count` players are online.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespawnTickOption {
    pub user_count: i32,
    pub delay_loss: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnTimer {
    /// Base respawn rate in minutes.
    pub base_spawn_rate: u8,
    pub current_tick_counter: u64,
    pub options: Vec<RespawnTickOption>,
    /// Current delay in milliseconds.
    pub current_delay: i64,
}

impl RespawnTimer {
    /// The delay implied by `base_spawn_rate` alone.
    pub fn base_delay(&self) -> i64 {
        i64::from(self.base_spawn_rate) * MILLIS_PER_MINUTE
    }
}

impl Default for RespawnTimer {
    fn default() -> Self {
        let mut timer = Self {
            base_spawn_rate: 20,
            current_tick_counter: 0,
            options: Vec::new(),
            current_delay: 0,
        };
        timer.current_delay = timer.base_delay();
        timer
    }
}

impl Record for RespawnTimer {
    const KIND: &'static str = "respawn timer";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let base_spawn_rate = reader.read_u8()?;
        // Short counters read as zero; some writers truncated this field.
        let current_tick_counter = reader.read_u64_lenient();
        let options = read_list(reader, "respawn option", MAX_OPTIONS, |r| {
            Ok(RespawnTickOption {
                user_count: r.read_i32()?,
                delay_loss: r.read_f32()?,
            })
        })?;

        let mut timer = RespawnTimer {
            base_spawn_rate,
            current_tick_counter,
            options,
            current_delay: 0,
        };
        timer.current_delay = match policy.field_width(Field::RespawnCurrentDelay) {
            Width::I64 => reader.read_i64()?,
            _ => timer.base_delay(),
        };
        Ok(timer)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_u8(self.base_spawn_rate)?;
        writer.write_u64(self.current_tick_counter)?;
        write_list(writer, "respawn option", &self.options, |w, o| {
            w.write_i32(o.user_count)?;
            w.write_f32(o.delay_loss)?;
            Ok(())
        })?;
        writer.write_i64(self.current_delay)?;
        Ok(())
    }
}
