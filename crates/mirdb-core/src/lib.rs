//! Versioned binary codec for MMORPG server databases.
//!
//! A database is one little-endian stream: a header carrying the schema
//! version and the server's index counters, followed by maps, items,
//! monsters, NPCs, quests, the dragon, magics, game shop listings, conquests
//! and the respawn timer. Versions 60 through 112 are read; writing always
//! produces the latest layout.
//!
//! # Quick Start
//!
//! ```no_run
//! use mirdb_core::{DatabaseImage, LoadOptions};
//!
//! let report = DatabaseImage::open("Server.MirDB", &LoadOptions::default())?;
//! for error in &report.errors {
//!     eprintln!("skipped: {error}");
//! }
//! let image = report.image;
//! println!("{} items, {} monsters", image.items.len(), image.monsters.len());
//!
//! image.save("Server.MirDB.new")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - **Version policy** ([`VersionPolicy`]): one table deciding, per field,
//!   whether it exists in a given version and at what width
//! - **Records** ([`records`]): one [`Record`] codec per entity
//! - **Image** ([`DatabaseImage`]): the decoded container, with lookups
//! - **Loader** ([`load_database`], [`save_database`]): per-record failure
//!   isolation on decode, all-or-nothing encode
//! - **Enrichment** ([`enrich`]): quest text and dragon drop companion files
//! - **Export** (`export`, feature `json-export`): JSON projection
//!
//! # Features
//!
//! - `json-export` (default): JSON export and import via `serde_json`
//! - `parallel`: enrich quests in parallel with rayon

mod codec;
pub mod enrich;
mod error;
#[cfg(feature = "json-export")]
pub mod export;
mod image;
mod loader;
pub mod records;
mod stat;
mod types;
mod version;

pub use codec::Record;
pub use enrich::{EnrichPaths, FsLineSource, ItemLookup, LineSource, MonsterLookup};
pub use error::{Error, RecordError, Result, Section};
pub use image::{DatabaseImage, Header, ImageIndex};
pub use loader::{decode_section, load_database, save_database, LoadOptions, LoadReport, MAX_SECTION_RECORDS};
pub use records::{Conquest, Dragon, GameShopItem, Item, Magic, Map, Monster, Npc, Quest, RespawnTimer};
pub use stat::{Stat, StatTable};
pub use types::{
    decode_tolerant, BindMode, ConquestGame, ConquestType, ItemGrade, ItemSet, ItemType, LightSetting, QuestType,
    RequiredClass, RequiredGender, RequiredType, SpecialItemMode, Spell, WeatherSetting, WireEnum,
};
pub use version::{Field, Rule, VersionPolicy, Width, LATEST_VERSION, MIN_VERSION, RULES};

#[cfg(feature = "json-export")]
pub use export::{export_json_dir, import_json_dir, JsonExporter};
