//! Quest definitions.
//!
//! Only the header fields of a quest live in the database. Descriptions,
//! tasks and rewards come from the quest's text file and are filled in by
//! the enrichment pass; they are never written to the binary form.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter};
use serde::{Deserialize, Serialize};

use crate::codec::Record;
use crate::types::{decode_tolerant, QuestType, RequiredClass, WireEnum};
use crate::version::{Field, VersionPolicy};
use crate::Result;

/// Stored maximum level meaning "no upper bound".
pub const UNBOUNDED_MAX_LEVEL: i32 = u16::MAX as i32;

/// An item to carry or collect. `item_index` is the item's `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestItemTask {
    pub item_index: i32,
    pub count: u32,
    pub message: String,
}

/// Monsters to kill. `monster_index` is the monster's `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestKillTask {
    pub monster_index: i32,
    pub count: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestFlagTask {
    pub number: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestItemReward {
    pub item_index: i32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quest {
    pub index: i32,
    pub name: String,
    pub group: String,
    pub file_name: String,
    pub required_min_level: i32,
    pub required_max_level: i32,
    pub required_quest: i32,
    pub required_class: RequiredClass,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub goto_message: String,
    pub kill_message: String,
    pub item_message: String,
    pub flag_message: String,
    pub time_limit_seconds: i32,

    pub description: Vec<String>,
    pub task_description: Vec<String>,
    pub return_description: Vec<String>,
    pub completion_description: Vec<String>,
    pub carry_items: Vec<QuestItemTask>,
    pub kill_tasks: Vec<QuestKillTask>,
    pub item_tasks: Vec<QuestItemTask>,
    pub flag_tasks: Vec<QuestFlagTask>,
    pub fixed_rewards: Vec<QuestItemReward>,
    pub select_rewards: Vec<QuestItemReward>,
    pub exp_reward: u32,
    pub gold_reward: u32,
    pub credit_reward: u32,
}

impl Default for Quest {
    fn default() -> Self {
        Self {
            index: 0,
            name: String::new(),
            group: String::new(),
            file_name: String::new(),
            required_min_level: 0,
            required_max_level: UNBOUNDED_MAX_LEVEL,
            required_quest: 0,
            required_class: RequiredClass::default(),
            quest_type: QuestType::default(),
            goto_message: String::new(),
            kill_message: String::new(),
            item_message: String::new(),
            flag_message: String::new(),
            time_limit_seconds: 0,
            description: Vec::new(),
            task_description: Vec::new(),
            return_description: Vec::new(),
            completion_description: Vec::new(),
            carry_items: Vec::new(),
            kill_tasks: Vec::new(),
            item_tasks: Vec::new(),
            flag_tasks: Vec::new(),
            fixed_rewards: Vec::new(),
            select_rewards: Vec::new(),
            exp_reward: 0,
            gold_reward: 0,
            credit_reward: 0,
        }
    }
}

impl Quest {
    /// Reset every field populated from the quest's text file.
    pub fn clear_details(&mut self) {
        self.description.clear();
        self.task_description.clear();
        self.return_description.clear();
        self.completion_description.clear();
        self.carry_items.clear();
        self.kill_tasks.clear();
        self.item_tasks.clear();
        self.flag_tasks.clear();
        self.fixed_rewards.clear();
        self.select_rewards.clear();
        self.exp_reward = 0;
        self.gold_reward = 0;
        self.credit_reward = 0;
    }
}

impl Record for Quest {
    const KIND: &'static str = "quest";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let mut quest = Quest {
            index: reader.read_i32()?,
            name: reader.read_string()?,
            group: reader.read_string()?,
            file_name: reader.read_string()?,
            required_min_level: reader.read_i32()?,
            required_max_level: reader.read_i32()?,
            required_quest: reader.read_i32()?,
            required_class: decode_tolerant(reader.read_u8()?.into()),
            quest_type: decode_tolerant(reader.read_u8()?.into()),
            goto_message: reader.read_string()?,
            kill_message: reader.read_string()?,
            item_message: reader.read_string()?,
            flag_message: reader.read_string()?,
            ..Quest::default()
        };

        if quest.required_max_level == 0 {
            quest.required_max_level = UNBOUNDED_MAX_LEVEL;
        }
        if policy.field_present(Field::QuestTimeLimit) {
            quest.time_limit_seconds = reader.read_i32()?;
        }

        Ok(quest)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.index)?;
        writer.write_string(&self.name)?;
        writer.write_string(&self.group)?;
        writer.write_string(&self.file_name)?;
        writer.write_i32(self.required_min_level)?;
        writer.write_i32(self.required_max_level)?;
        writer.write_i32(self.required_quest)?;
        writer.write_u8(self.required_class.to_wire() as u8)?;
        writer.write_u8(self.quest_type.to_wire() as u8)?;
        writer.write_string(&self.goto_message)?;
        writer.write_string(&self.kill_message)?;
        writer.write_string(&self.item_message)?;
        writer.write_string(&self.flag_message)?;
        writer.write_i32(self.time_limit_seconds)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::generate::{assert_roundtrip, RecordGen, CASES};

    pub(crate) fn sample_quest() -> Quest {
        Quest {
            index: 3,
            name: "Wolf Hunt".into(),
            group: "Bichon".into(),
            file_name: "WolfHunt".into(),
            required_min_level: 7,
            required_max_level: 30,
            required_quest: 2,
            required_class: RequiredClass::Warrior,
            quest_type: QuestType::Daily,
            kill_message: "Kill wolves".into(),
            time_limit_seconds: 600,
            ..Quest::default()
        }
    }

    #[test]
    fn test_quest_roundtrip() {
        let quest = sample_quest();
        let bytes = quest.to_bytes().unwrap();
        let decoded = Quest::from_bytes(&bytes, &VersionPolicy::latest()).unwrap();
        assert_eq!(decoded, quest);
    }

    #[test]
    fn test_zero_max_level_is_unbounded() {
        let quest = Quest {
            required_max_level: 0,
            ..sample_quest()
        };
        let bytes = quest.to_bytes().unwrap();
        let decoded = Quest::from_bytes(&bytes, &VersionPolicy::latest()).unwrap();
        assert_eq!(decoded.required_max_level, 65_535);
    }

    #[test]
    fn test_time_limit_absent_before_91() {
        let quest = sample_quest();
        let mut bytes = quest.to_bytes().unwrap();
        bytes.truncate(bytes.len() - 4);

        let mut reader = BinaryReader::new(&bytes);
        let decoded = Quest::decode(&mut reader, &VersionPolicy::new(90).unwrap()).unwrap();
        assert!(reader.is_empty());
        assert_eq!(decoded.time_limit_seconds, 0);
        assert_eq!(decoded.name, "Wolf Hunt");
    }

    #[test]
    fn test_unknown_quest_type_is_general() {
        let mut bytes = sample_quest().to_bytes().unwrap();
        // index, three strings, three i32 fields, class byte
        let type_offset = 4 + 10 + 7 + 9 + 12 + 1;
        bytes[type_offset] = 42;
        let decoded = Quest::from_bytes(&bytes, &VersionPolicy::latest()).unwrap();
        assert_eq!(decoded.quest_type, QuestType::General);
        assert_eq!(decoded.required_class, RequiredClass::Warrior);
    }

    #[test]
    fn test_details_are_not_encoded() {
        let mut quest = sample_quest();
        let plain = quest.to_bytes().unwrap();
        quest.description.push("Go north".into());
        quest.exp_reward = 500;
        assert_eq!(quest.to_bytes().unwrap(), plain);

        quest.clear_details();
        assert!(quest.description.is_empty());
        assert_eq!(quest.exp_reward, 0);
    }

    #[test]
    fn test_generated_quests_roundtrip() {
        let mut rng = RecordGen::new(91);
        for _ in 0..CASES {
            assert_roundtrip(&rng.quest());
        }
    }

    #[test]
    fn test_generated_details_leave_bytes_unchanged() {
        let mut rng = RecordGen::new(0x9E);
        for _ in 0..CASES {
            let bare = rng.quest();
            let mut detailed = bare.clone();
            detailed.description.push(bare.name.clone());
            detailed.kill_tasks.push(QuestKillTask {
                monster_index: bare.index,
                count: 2,
                message: bare.kill_message.clone(),
            });
            detailed.gold_reward = 500;
            assert_eq!(detailed.to_bytes().unwrap(), bare.to_bytes().unwrap());
        }
    }
}
