//! Stats and the sparse stat table.

use std::fmt;
use std::io::Write;

use indexmap::IndexMap;
use mirdb_common::{BinaryReader, BinaryWriter};
use serde::{Deserialize, Serialize};

use crate::codec::write_count;
use crate::types::{wire_enum, WireEnum};
use crate::{Error, Result};

/// Upper bound on entries in a stored stat table.
const MAX_STAT_ENTRIES: i32 = 256;

wire_enum! {
    /// A numeric character or item attribute.
    pub enum Stat: default Unknown {
        MinAC = 0,
        MaxAC = 1,
        MinMAC = 2,
        MaxMAC = 3,
        MinDC = 4,
        MaxDC = 5,
        MinMC = 6,
        MaxMC = 7,
        MinSC = 8,
        MaxSC = 9,
        Accuracy = 10,
        Agility = 11,
        HP = 12,
        MP = 13,
        AttackSpeed = 14,
        Luck = 15,
        BagWeight = 16,
        HandWeight = 17,
        WearWeight = 18,
        Reflect = 19,
        Strong = 20,
        Holy = 21,
        Freezing = 22,
        PoisonAttack = 23,
        MagicResist = 30,
        PoisonResist = 31,
        HealthRecovery = 32,
        SpellRecovery = 33,
        PoisonRecovery = 34,
        CriticalRate = 35,
        CriticalDamage = 36,
        MaxACRatePercent = 40,
        MaxMACRatePercent = 41,
        MaxDCRatePercent = 42,
        MaxMCRatePercent = 43,
        MaxSCRatePercent = 44,
        AttackSpeedRatePercent = 45,
        HPRatePercent = 46,
        MPRatePercent = 47,
        HPDrainRatePercent = 48,
        ExpRatePercent = 100,
        ItemDropRatePercent = 101,
        GoldDropRatePercent = 102,
        MineRatePercent = 103,
        GemRatePercent = 104,
        FishRatePercent = 105,
        CraftRatePercent = 106,
        SkillGainMultiplier = 107,
        AttackBonus = 108,
        LoverExpRatePercent = 120,
        MentorDamageRatePercent = 121,
        MentorExpRatePercent = 123,
        DamageReductionPercent = 124,
        EnergyShieldPercent = 125,
        EnergyShieldHPGain = 126,
        ManaPenaltyPercent = 127,
        TeleportManaPenaltyPercent = 128,
        Hero = 129,
        Unknown = 255,
    }
}

/// Sparse mapping from [`Stat`] to value.
///
/// A stat that is absent reads as zero, and assigning zero removes the entry,
/// so the table never holds zero values. Entries keep their insertion order so
/// a decoded table re-encodes to the same bytes. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatTable {
    values: IndexMap<Stat, i32>,
}

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `stat`, zero when absent.
    pub fn get(&self, stat: Stat) -> i32 {
        self.values.get(&stat).copied().unwrap_or(0)
    }

    /// Assign `stat`. Zero deletes the entry.
    pub fn set(&mut self, stat: Stat, value: i32) {
        if value == 0 {
            self.values.shift_remove(&stat);
        } else {
            self.values.insert(stat, value);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        self.values.iter().map(|(stat, value)| (*stat, *value))
    }

    /// Size of the stored form in bytes.
    pub fn encoded_len(&self) -> usize {
        4 + 5 * self.values.len()
    }

    /// Decode a count-prefixed table. Unknown stat ids are skipped.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let count = reader.read_i32()?;
        if !(0..=MAX_STAT_ENTRIES).contains(&count) {
            return Err(Error::MalformedCount {
                what: "stat",
                count: i64::from(count),
            });
        }

        let mut table = Self::new();
        for _ in 0..count {
            let id = reader.read_u8()?;
            let value = reader.read_i32()?;
            match Stat::from_u8(id) {
                Some(stat) => table.set(stat, value),
                None => tracing::debug!(id, value, "discarding unknown stat"),
            }
        }
        Ok(table)
    }

    pub fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        write_count(writer, "stat table", self.values.len())?;
        for (stat, value) in self.iter() {
            writer.write_u8(stat.to_wire() as u8)?;
            writer.write_i32(value)?;
        }
        Ok(())
    }
}

impl FromIterator<(Stat, i32)> for StatTable {
    fn from_iter<I: IntoIterator<Item = (Stat, i32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (stat, value) in iter {
            table.set(stat, value);
        }
        table
    }
}

impl fmt::Display for StatTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (stat, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{stat}={value}")?;
            first = false;
        }
        Ok(())
    }
}

// Imported tables go through `set` so zero entries are dropped.
impl<'de> Deserialize<'de> for StatTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = IndexMap::<Stat, i32>::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(table: &StatTable) -> Vec<u8> {
        let mut writer = BinaryWriter::in_memory();
        table.write_to(&mut writer).unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_set_zero_removes_key() {
        let mut table = StatTable::new();
        table.set(Stat::HP, 50);
        table.set(Stat::MaxDC, 7);
        assert_eq!(table.len(), 2);

        table.set(Stat::HP, 0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(Stat::HP), 0);
        assert_eq!(table.get(Stat::MaxDC), 7);
    }

    #[test]
    fn test_encoded_length_is_sparse() {
        let mut table = StatTable::new();
        assert_eq!(encode(&table).len(), 4);

        table.set(Stat::MinAC, 1);
        table.set(Stat::Hero, -3);
        table.set(Stat::Luck, 0);
        let bytes = encode(&table);
        assert_eq!(bytes.len(), 4 + 5 * 2);
        assert_eq!(bytes.len(), table.encoded_len());
        assert_eq!(&bytes[..4], &2i32.to_le_bytes());
    }

    #[test]
    fn test_unknown_ids_discarded() {
        let mut data = Vec::new();
        data.extend_from_slice(&3i32.to_le_bytes());
        data.push(12);
        data.extend_from_slice(&100i32.to_le_bytes());
        data.push(60); // not a stat
        data.extend_from_slice(&9i32.to_le_bytes());
        data.push(255);
        data.extend_from_slice(&1i32.to_le_bytes());

        let mut reader = BinaryReader::new(&data);
        let table = StatTable::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(Stat::HP), 100);
        assert_eq!(table.get(Stat::Unknown), 1);
    }

    #[test]
    fn test_order_preserved_through_codec() {
        let table: StatTable = [(Stat::Hero, 1), (Stat::MinAC, 2), (Stat::Luck, 3)]
            .into_iter()
            .collect();
        let bytes = encode(&table);
        let decoded = StatTable::read(&mut BinaryReader::new(&bytes)).unwrap();
        assert_eq!(encode(&decoded), bytes);
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_negative_count_rejected() {
        let data = (-1i32).to_le_bytes();
        let result = StatTable::read(&mut BinaryReader::new(&data));
        assert!(matches!(result, Err(Error::MalformedCount { what: "stat", count: -1 })));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: StatTable = [(Stat::HP, 1), (Stat::MP, 2)].into_iter().collect();
        let b: StatTable = [(Stat::MP, 2), (Stat::HP, 1)].into_iter().collect();
        assert_eq!(a, b);
    }
}
