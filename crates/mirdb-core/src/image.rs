//! The decoded database container and its lookup index.

use std::io::Write;

use hashbrown::HashMap as FastHashMap;
use mirdb_common::{BinaryReader, BinaryWriter};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::records::{Conquest, Dragon, GameShopItem, Item, Magic, Map, Monster, Npc, Quest, RespawnTimer};
use crate::version::{Field, VersionPolicy, LATEST_VERSION};
use crate::Result;

type FxHashMap<K, V> = FastHashMap<K, V, std::hash::BuildHasherDefault<FxHasher>>;

/// Stream header: schema version and the server's running index counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub version: i32,
    pub custom_version: i32,
    pub map_index: i32,
    pub item_index: i32,
    pub monster_index: i32,
    pub npc_index: i32,
    pub quest_index: i32,
    pub gameshop_index: i32,
    pub conquest_index: i32,
    pub respawn_timer_index: i32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            custom_version: 0,
            map_index: 0,
            item_index: 0,
            monster_index: 0,
            npc_index: 0,
            quest_index: 0,
            gameshop_index: 0,
            conquest_index: 0,
            respawn_timer_index: 0,
        }
    }
}

impl Header {
    /// Read the header and the policy its version selects.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<(Self, VersionPolicy)> {
        let version = reader.read_i32()?;
        let policy = VersionPolicy::new(version)?;

        let mut header = Header {
            version,
            custom_version: reader.read_i32()?,
            map_index: reader.read_i32()?,
            item_index: reader.read_i32()?,
            monster_index: reader.read_i32()?,
            npc_index: reader.read_i32()?,
            quest_index: reader.read_i32()?,
            ..Header::default()
        };
        if policy.field_present(Field::HeaderGameShopIndex) {
            header.gameshop_index = reader.read_i32()?;
        }
        if policy.field_present(Field::HeaderConquestIndex) {
            header.conquest_index = reader.read_i32()?;
        }
        if policy.field_present(Field::HeaderRespawnTimerIndex) {
            header.respawn_timer_index = reader.read_i32()?;
        }

        Ok((header, policy))
    }

    /// Write the header in the latest layout, stamping the latest version.
    pub fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        for v in [
            LATEST_VERSION,
            self.custom_version,
            self.map_index,
            self.item_index,
            self.monster_index,
            self.npc_index,
            self.quest_index,
            self.gameshop_index,
            self.conquest_index,
            self.respawn_timer_index,
        ] {
            writer.write_i32(v)?;
        }
        Ok(())
    }
}

/// A fully decoded database.
///
/// Arrays keep stream order; records are identified by their `index` field,
/// not by position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseImage {
    pub header: Header,
    pub maps: Vec<Map>,
    pub items: Vec<Item>,
    pub monsters: Vec<Monster>,
    pub npcs: Vec<Npc>,
    pub quests: Vec<Quest>,
    /// `None` when the section failed to decode.
    pub dragon: Option<Dragon>,
    pub magics: Vec<Magic>,
    pub gameshop_items: Vec<GameShopItem>,
    pub conquests: Vec<Conquest>,
    /// `None` when the section failed to decode or the version predates it.
    pub respawn_timer: Option<RespawnTimer>,
}

impl DatabaseImage {
    /// An empty image at the latest version.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> i32 {
        self.header.version
    }

    pub fn item_by_name(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| names_match(&item.name, name))
    }

    pub fn monster_by_name(&self, name: &str) -> Option<&Monster> {
        self.monsters.iter().find(|monster| names_match(&monster.name, name))
    }

    pub fn item_by_index(&self, index: i32) -> Option<&Item> {
        self.items.iter().find(|item| item.index == index)
    }

    pub fn map_by_index(&self, index: i32) -> Option<&Map> {
        self.maps.iter().find(|map| map.index == index)
    }

    /// Build hash indices for repeated lookups.
    pub fn index(&self) -> ImageIndex<'_> {
        ImageIndex::new(self)
    }

    /// Total number of records across every array and singleton.
    pub fn record_count(&self) -> usize {
        self.maps.len()
            + self.items.len()
            + self.monsters.len()
            + self.npcs.len()
            + self.quests.len()
            + usize::from(self.dragon.is_some())
            + self.magics.len()
            + self.gameshop_items.len()
            + self.conquests.len()
            + usize::from(self.respawn_timer.is_some())
    }
}

/// Names compare case-insensitively with spaces ignored.
fn names_match(stored: &str, wanted: &str) -> bool {
    folded(stored).eq(folded(wanted))
}

fn name_key(name: &str) -> String {
    folded(name).collect()
}

// Latin-1 names carry accented letters, so fold beyond ASCII.
fn folded(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().filter(|c| *c != ' ').flat_map(char::to_lowercase)
}

/// Borrowed hash indices over a [`DatabaseImage`].
///
/// When several records share a key the first in stream order wins, matching
/// the linear lookups on the image.
pub struct ImageIndex<'a> {
    items_by_name: FxHashMap<String, &'a Item>,
    items_by_index: FxHashMap<i32, &'a Item>,
    monsters_by_name: FxHashMap<String, &'a Monster>,
    maps_by_index: FxHashMap<i32, &'a Map>,
}

impl<'a> ImageIndex<'a> {
    fn new(image: &'a DatabaseImage) -> Self {
        Self::from_parts(&image.maps, &image.items, &image.monsters)
    }

    /// Index borrowed arrays directly, leaving the rest of an image free for
    /// mutable use.
    pub(crate) fn from_parts(maps: &'a [Map], items: &'a [Item], monsters: &'a [Monster]) -> Self {
        let mut items_by_name = FxHashMap::default();
        let mut items_by_index = FxHashMap::default();
        for item in items {
            items_by_name.entry(name_key(&item.name)).or_insert(item);
            items_by_index.entry(item.index).or_insert(item);
        }

        let mut monsters_by_name = FxHashMap::default();
        for monster in monsters {
            monsters_by_name.entry(name_key(&monster.name)).or_insert(monster);
        }

        let mut maps_by_index = FxHashMap::default();
        for map in maps {
            maps_by_index.entry(map.index).or_insert(map);
        }

        Self {
            items_by_name,
            items_by_index,
            monsters_by_name,
            maps_by_index,
        }
    }

    pub fn item_by_name(&self, name: &str) -> Option<&'a Item> {
        self.items_by_name.get(&name_key(name)).copied()
    }

    pub fn item_by_index(&self, index: i32) -> Option<&'a Item> {
        self.items_by_index.get(&index).copied()
    }

    pub fn monster_by_name(&self, name: &str) -> Option<&'a Monster> {
        self.monsters_by_name.get(&name_key(name)).copied()
    }

    pub fn map_by_index(&self, index: i32) -> Option<&'a Map> {
        self.maps_by_index.get(&index).copied()
    }
}
