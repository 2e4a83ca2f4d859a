//! MirDB - MMORPG server database codec.
//!
//! This crate provides a unified interface to the MirDB crates.
//!
//! # Crates
//!
//! - [`mirdb_common`] - Byte cursor, stream writer, 7-bit length strings, `Point`
//! - [`mirdb_core`] - Version policy, record codecs, database image, enrichment
//!
//! # Example
//!
//! ```no_run
//! use mirdb::prelude::*;
//!
//! let report = DatabaseImage::open("Server.MirDB", &LoadOptions::enriched())?;
//! let image = report.image;
//!
//! if let Some(item) = image.item_by_name("WoodenSword") {
//!     println!("{} sells for {}", item.name, item.price);
//! }
//!
//! let mut out = Vec::new();
//! save_database(&image, &mut out)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use mirdb_common as common;
pub use mirdb_core as database;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use mirdb_common::{BinaryReader, BinaryWriter, Point};
    pub use mirdb_core::{
        load_database, save_database, DatabaseImage, EnrichPaths, FsLineSource, Header, LoadOptions, LoadReport,
        Record, RecordError, Section, Stat, StatTable, VersionPolicy, LATEST_VERSION, MIN_VERSION,
    };

    #[cfg(feature = "full")]
    pub use mirdb_core::{export_json_dir, import_json_dir, JsonExporter};
}

// Re-export commonly used types at the crate root
pub use mirdb_core::{DatabaseImage, Error, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
