//! JSON projection of a database image.
//!
//! Enum members are written by name, points as `{x, y}`, stat tables as
//! name to value objects and flag sets as `"A | B"` strings. The projection
//! is lossless: importing an export yields an equal image.

mod json;

pub use json::{import_json_dir, ExportStats, JsonExporter, ENTITY_FILES};

use crate::image::DatabaseImage;
use crate::Result;

/// Write the per-entity JSON files for `image` into `dir`.
pub fn export_json_dir<P: AsRef<std::path::Path>>(image: &DatabaseImage, dir: P) -> Result<ExportStats> {
    JsonExporter::new(image).export_dir(dir, |_, _| {})
}

impl DatabaseImage {
    /// The whole image as one JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
