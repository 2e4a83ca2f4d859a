//! Typed records and their binary codecs.

mod conquest;
mod dragon;
mod gameshop;
#[cfg(test)]
mod generate;
mod item;
mod magic;
mod map;
mod monster;
mod npc;
mod quest;
mod respawn;

pub use conquest::{Conquest, ConquestFlag, ConquestStructure};
pub use dragon::{Dragon, DragonDropInfo, DRAGON_DROP_LEVELS, DRAGON_EXP_LEVELS};
pub use gameshop::GameShopItem;
pub use item::Item;
pub use magic::Magic;
pub use map::{Map, MineZone, Movement, RespawnInfo, SafeZone};
pub use monster::Monster;
pub use npc::Npc;
pub use quest::{Quest, QuestFlagTask, QuestItemReward, QuestItemTask, QuestKillTask, UNBOUNDED_MAX_LEVEL};
pub use respawn::{RespawnTickOption, RespawnTimer};

#[cfg(test)]
pub(crate) mod samples {
    pub(crate) use super::conquest::tests::sample_conquest;
    pub(crate) use super::gameshop::tests::sample_gameshop_item;
    pub(crate) use super::item::tests::sample_item;
    pub(crate) use super::magic::tests::sample_magic;
    pub(crate) use super::map::tests::sample_map;
    pub(crate) use super::monster::tests::sample_monster;
    pub(crate) use super::npc::tests::sample_npc;
    pub(crate) use super::quest::tests::sample_quest;
}
