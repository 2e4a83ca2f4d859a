//! Per-entity JSON files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::image::{DatabaseImage, Header};
use crate::Result;

const VERSION_FILE: &str = "version.json";

/// Entity files written next to `version.json`, in export order.
pub const ENTITY_FILES: [&str; 10] = [
    "maps.json",
    "items.json",
    "monsters.json",
    "npcs.json",
    "quests.json",
    "dragons.json",
    "magics.json",
    "gameshop_items.json",
    "conquests.json",
    "respawn_timers.json",
];

/// Counts from one export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub files: usize,
    pub records: usize,
}

/// Writes an image as a directory of JSON files.
pub struct JsonExporter<'a> {
    image: &'a DatabaseImage,
}

impl<'a> JsonExporter<'a> {
    pub fn new(image: &'a DatabaseImage) -> Self {
        Self { image }
    }

    /// Export every entity file into `dir`, creating it if needed.
    ///
    /// The progress callback receives (completed, total) file counts.
    pub fn export_dir<P, F>(&self, dir: P, mut progress: F) -> Result<ExportStats>
    where
        P: AsRef<Path>,
        F: FnMut(usize, usize),
    {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let image = self.image;
        let total = ENTITY_FILES.len() + 1;
        let mut stats = ExportStats::default();

        write_json(&dir.join(VERSION_FILE), &image.header)?;
        stats.files += 1;
        progress(stats.files, total);

        let dragons: Vec<_> = image.dragon.iter().collect();
        let timers: Vec<_> = image.respawn_timer.iter().collect();
        let counts = [
            write_entities(dir, ENTITY_FILES[0], &image.maps)?,
            write_entities(dir, ENTITY_FILES[1], &image.items)?,
            write_entities(dir, ENTITY_FILES[2], &image.monsters)?,
            write_entities(dir, ENTITY_FILES[3], &image.npcs)?,
            write_entities(dir, ENTITY_FILES[4], &image.quests)?,
            write_entities(dir, ENTITY_FILES[5], &dragons)?,
            write_entities(dir, ENTITY_FILES[6], &image.magics)?,
            write_entities(dir, ENTITY_FILES[7], &image.gameshop_items)?,
            write_entities(dir, ENTITY_FILES[8], &image.conquests)?,
            write_entities(dir, ENTITY_FILES[9], &timers)?,
        ];
        for count in counts {
            stats.files += 1;
            stats.records += count;
            progress(stats.files, total);
        }

        info!(dir = %dir.display(), files = stats.files, records = stats.records, "exported JSON");
        Ok(stats)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_entities<T: Serialize>(dir: &Path, name: &str, records: &[T]) -> Result<usize> {
    write_json(&dir.join(name), records)?;
    debug!(file = name, records = records.len(), "wrote entity file");
    Ok(records.len())
}

/// Read an entity file; a missing file reads as no records.
fn read_entities<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
    let path = dir.join(name);
    if !path.exists() {
        debug!(file = name, "entity file missing, treating as empty");
        return Ok(Vec::new());
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Rebuild an image from a directory written by [`JsonExporter`].
///
/// `version.json` is required. Missing entity files yield empty arrays and
/// absent singletons.
pub fn import_json_dir<P: AsRef<Path>>(dir: P) -> Result<DatabaseImage> {
    let dir = dir.as_ref();
    let header: Header = serde_json::from_reader(BufReader::new(File::open(dir.join(VERSION_FILE))?))?;

    let image = DatabaseImage {
        header,
        maps: read_entities(dir, ENTITY_FILES[0])?,
        items: read_entities(dir, ENTITY_FILES[1])?,
        monsters: read_entities(dir, ENTITY_FILES[2])?,
        npcs: read_entities(dir, ENTITY_FILES[3])?,
        quests: read_entities(dir, ENTITY_FILES[4])?,
        dragon: read_entities(dir, ENTITY_FILES[5])?.into_iter().next(),
        magics: read_entities(dir, ENTITY_FILES[6])?,
        gameshop_items: read_entities(dir, ENTITY_FILES[7])?,
        conquests: read_entities(dir, ENTITY_FILES[8])?,
        respawn_timer: read_entities(dir, ENTITY_FILES[9])?.into_iter().next(),
    };
    info!(dir = %dir.display(), records = image.record_count(), "imported JSON");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::samples::*;
    use crate::records::{Dragon, RespawnTimer};
    use crate::stat::Stat;
    use crate::types::{BindMode, ItemType};
    use serde_json::Value;

    fn full_image() -> DatabaseImage {
        let mut image = DatabaseImage::new();
        image.header.custom_version = 3;
        image.maps.push(sample_map());
        image.items.push(sample_item());
        image.monsters.push(sample_monster());
        image.npcs.push(sample_npc());
        image.quests.push(sample_quest());
        image.dragon = Some(Dragon::default());
        image.magics.push(sample_magic());
        image.gameshop_items.push(sample_gameshop_item());
        image.conquests.push(sample_conquest());
        image.respawn_timer = Some(RespawnTimer::default());
        image
    }

    #[test]
    fn test_dir_roundtrip() {
        let image = full_image();
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("json");

        let mut calls = 0;
        let stats = JsonExporter::new(&image)
            .export_dir(&dir, |done, total| {
                calls += 1;
                assert!(done <= total);
            })
            .unwrap();
        assert_eq!(stats.files, 11);
        assert_eq!(stats.records, 10);
        assert_eq!(calls, 11);

        let imported = import_json_dir(&dir).unwrap();
        assert_eq!(imported, image);
    }

    #[test]
    fn test_missing_entity_files_are_empty() {
        let image = full_image();
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("json");
        crate::export::export_json_dir(&image, &dir).unwrap();
        std::fs::remove_file(dir.join("npcs.json")).unwrap();
        std::fs::remove_file(dir.join("dragons.json")).unwrap();

        let imported = import_json_dir(&dir).unwrap();
        assert!(imported.npcs.is_empty());
        assert!(imported.dragon.is_none());
        assert_eq!(imported.items, image.items);
    }

    #[test]
    fn test_json_shape() {
        let mut item = sample_item();
        item.item_type = ItemType::Ring;
        item.bind = BindMode::DONT_DROP | BindMode::DONT_TRADE;
        item.stats.set(Stat::MaxDC, 12);
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["type"], Value::from("Ring"));
        assert_eq!(value["bind"], Value::from("DONT_DROP | DONT_TRADE"));
        assert_eq!(value["stats"]["MaxDC"], Value::from(12));

        let map = serde_json::to_value(sample_map()).unwrap();
        let location = &map["safe_zones"][0]["location"];
        assert!(location["x"].is_number() && location["y"].is_number());
    }

    #[test]
    fn test_whole_image_json() {
        let image = full_image();
        let text = image.to_json().unwrap();
        assert_eq!(DatabaseImage::from_json(&text).unwrap(), image);
    }
}
