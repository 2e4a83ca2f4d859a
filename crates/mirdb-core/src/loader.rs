//! Whole-image decode and encode.
//!
//! Decoding isolates failures per record: a record that fails to decode or
//! validate is logged, recorded in [`LoadReport::errors`] and left out of the
//! image. A section whose count prefix cannot be read ends the load, since
//! nothing after it can be located. Encoding is all-or-nothing.

use std::io::Write;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use mirdb_common::{BinaryReader, BinaryWriter};
use tracing::{debug, info, warn};

use crate::codec::{read_count, write_list, Record};
use crate::enrich::{EnrichPaths, FsLineSource};
use crate::error::{RecordError, Section};
use crate::image::{DatabaseImage, Header};
use crate::records::{Dragon, RespawnTimer};
use crate::version::{Field, VersionPolicy};
use crate::Result;

/// Upper bound on any top-level array count.
pub const MAX_SECTION_RECORDS: usize = 1_000_000;

/// Options for [`DatabaseImage::open`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Run the quest text and dragon drop passes after decoding.
    pub enrich: bool,
    /// Directory holding `Quests/` and `Drops/`. Defaults to the database
    /// file's directory.
    pub data_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn enriched() -> Self {
        Self {
            enrich: true,
            data_dir: None,
        }
    }
}

/// Result of a load: the image plus every isolated failure.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub image: DatabaseImage,
    pub errors: Vec<RecordError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode a count-prefixed array of records.
///
/// Returns the records that decoded and validated, plus one error per record
/// that did not. The loop runs for the full declared count; a truncated
/// record near the end of the stream fails alone, while corruption further
/// up leaves the cursor misaligned and typically fails every later record.
///
/// An unreadable or malformed count is returned as `Err`.
pub fn decode_section<T: Record>(
    reader: &mut BinaryReader<'_>,
    policy: &VersionPolicy,
    section: Section,
) -> std::result::Result<(Vec<T>, Vec<RecordError>), RecordError> {
    let count = read_count(reader, section.as_str(), MAX_SECTION_RECORDS).map_err(|error| RecordError {
        section,
        ordinal: None,
        error,
    })?;

    let mut records = Vec::with_capacity(count);
    let mut errors = Vec::new();
    for ordinal in 0..count {
        let start = reader.position();
        match T::decode(reader, policy).and_then(|record| record.validate().map(|()| record)) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(%section, ordinal, offset = start, %error, "skipping {}", T::KIND);
                errors.push(RecordError {
                    section,
                    ordinal: Some(ordinal),
                    error,
                });
            }
        }
    }

    debug!(%section, count, decoded = records.len(), "decoded section");
    Ok((records, errors))
}

fn decode_singleton<T: Record>(
    reader: &mut BinaryReader<'_>,
    policy: &VersionPolicy,
    section: Section,
    errors: &mut Vec<RecordError>,
) -> Option<T> {
    match T::decode(reader, policy) {
        Ok(record) => Some(record),
        Err(error) => {
            warn!(%section, %error, "skipping {}", T::KIND);
            errors.push(RecordError {
                section,
                ordinal: Some(0),
                error,
            });
            None
        }
    }
}

/// Decode a database image from bytes.
///
/// Only a header failure (truncation or unsupported version) is returned as
/// `Err`; everything else ends up in the report.
pub fn load_database(data: &[u8]) -> Result<LoadReport> {
    let mut reader = BinaryReader::new(data);
    let (header, policy) = Header::read(&mut reader)?;
    info!(version = header.version, custom_version = header.custom_version, "loading database");

    let mut report = LoadReport {
        image: DatabaseImage {
            header,
            ..DatabaseImage::default()
        },
        errors: Vec::new(),
    };
    if let Err(error) = load_sections(&mut reader, &policy, &mut report) {
        warn!(%error, "load stopped early");
        report.errors.push(error);
    }

    if !reader.is_empty() {
        debug!(trailing = reader.remaining(), "unread bytes after last section");
    }
    Ok(report)
}

/// Fill `report` section by section. Returns `Err` when a count prefix fails.
fn load_sections(
    reader: &mut BinaryReader<'_>,
    policy: &VersionPolicy,
    report: &mut LoadReport,
) -> std::result::Result<(), RecordError> {
    let LoadReport { image, errors } = report;

    macro_rules! section {
        ($field:ident, $section:expr) => {{
            let (records, mut failed) = decode_section(reader, policy, $section)?;
            image.$field = records;
            errors.append(&mut failed);
        }};
    }

    section!(maps, Section::Maps);
    section!(items, Section::Items);
    section!(monsters, Section::Monsters);
    section!(npcs, Section::Npcs);
    section!(quests, Section::Quests);
    image.dragon = decode_singleton::<Dragon>(reader, policy, Section::Dragon, errors);
    section!(magics, Section::Magics);
    if policy.field_present(Field::HeaderGameShopIndex) {
        section!(gameshop_items, Section::GameShop);
    }
    if policy.field_present(Field::HeaderConquestIndex) {
        section!(conquests, Section::Conquests);
    }
    if policy.field_present(Field::HeaderRespawnTimerIndex) {
        image.respawn_timer = decode_singleton::<RespawnTimer>(reader, policy, Section::RespawnTimer, errors);
    }
    Ok(())
}

/// Encode `image` in the latest layout and write it to `out`.
///
/// The whole image is encoded in memory first, so an encode failure leaves
/// `out` untouched. Missing singletons are written with their defaults.
pub fn save_database<W: Write>(image: &DatabaseImage, out: &mut W) -> Result<()> {
    let bytes = encode_image(image)?;
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

fn encode_image(image: &DatabaseImage) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::in_memory();
    image.header.write_to(&mut writer)?;

    write_list(&mut writer, "maps", &image.maps, |w, r| r.encode(w))?;
    write_list(&mut writer, "items", &image.items, |w, r| r.encode(w))?;
    write_list(&mut writer, "monsters", &image.monsters, |w, r| r.encode(w))?;
    write_list(&mut writer, "npcs", &image.npcs, |w, r| r.encode(w))?;
    write_list(&mut writer, "quests", &image.quests, |w, r| r.encode(w))?;
    match &image.dragon {
        Some(dragon) => dragon.encode(&mut writer)?,
        None => Dragon::default().encode(&mut writer)?,
    }
    write_list(&mut writer, "magics", &image.magics, |w, r| r.encode(w))?;
    write_list(&mut writer, "gameshop items", &image.gameshop_items, |w, r| r.encode(w))?;
    write_list(&mut writer, "conquests", &image.conquests, |w, r| r.encode(w))?;
    match &image.respawn_timer {
        Some(timer) => timer.encode(&mut writer)?,
        None => RespawnTimer::default().encode(&mut writer)?,
    }

    debug!(bytes = writer.written(), records = image.record_count(), "encoded database");
    Ok(writer.into_inner())
}

impl DatabaseImage {
    /// Memory-map and load a database file.
    pub fn open<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<LoadReport> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        // SAFETY: the map is read-only and dropped before this function
        // returns; the decoded image owns all of its data.
        let mmap = unsafe { Mmap::map(&file)? };
        let mut report = load_database(&mmap)?;
        drop(mmap);

        if options.enrich {
            let data_dir = match &options.data_dir {
                Some(dir) => dir.clone(),
                None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
            };
            report.image.enrich(&EnrichPaths::under(&data_dir), &FsLineSource)?;
        }
        Ok(report)
    }

    /// Decode an image from bytes.
    pub fn parse(data: &[u8]) -> Result<LoadReport> {
        load_database(data)
    }

    /// Encode the image in the latest layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_image(self)
    }

    /// Encode the image and write it to `path`.
    ///
    /// The file is only created once encoding has succeeded.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = encode_image(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::samples::*;
    use crate::records::Item;
    use crate::stat::Stat;
    use crate::{Error, LATEST_VERSION};
    use mirdb_common::Point;

    fn sample_image() -> DatabaseImage {
        let mut image = DatabaseImage::new();
        image.header.map_index = 1;
        image.header.item_index = 1;
        image.header.monster_index = 1;
        image.maps.push(sample_map());
        image.items.push(sample_item());
        image.monsters.push(sample_monster());
        image
    }

    #[test]
    fn test_end_to_end_image() {
        let image = sample_image();
        assert_eq!(image.maps[0].safe_zones.len(), 2);
        assert_eq!(image.maps[0].respawns.len(), 1);
        assert_eq!(image.monsters[0].stats.len(), 3);

        let bytes = image.to_bytes().unwrap();
        let report = load_database(&bytes).unwrap();
        assert!(report.is_clean(), "{:?}", report.errors);

        // Singletons come back as their defaults.
        let expected = DatabaseImage {
            dragon: Some(Dragon::default()),
            respawn_timer: Some(RespawnTimer::default()),
            ..image
        };
        assert_eq!(report.image, expected);
        assert_eq!(report.image.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_every_section_roundtrips() {
        let mut image = sample_image();
        image.npcs.push(sample_npc());
        image.quests.push(sample_quest());
        image.magics.push(sample_magic());
        image.gameshop_items.push(sample_gameshop_item());
        image.conquests.push(sample_conquest());
        image.dragon = Some(Dragon {
            enabled: true,
            ..Dragon::default()
        });
        image.respawn_timer = Some(RespawnTimer {
            base_spawn_rate: 5,
            current_delay: 42,
            ..RespawnTimer::default()
        });

        let report = load_database(&image.to_bytes().unwrap()).unwrap();
        assert!(report.is_clean(), "{:?}", report.errors);
        assert_eq!(report.image, image);
        assert_eq!(report.image.record_count(), 10);
    }

    fn item_section(items: &[Item]) -> Vec<u8> {
        let mut writer = BinaryWriter::in_memory();
        write_list(&mut writer, "items", items, |w, r| r.encode(w)).unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_truncated_last_record_is_isolated() {
        let items: Vec<Item> = (0..3)
            .map(|i| Item {
                index: i,
                name: format!("Item{i}"),
                ..sample_item()
            })
            .collect();
        let mut data = item_section(&items);
        data.truncate(data.len() - 5);

        let mut reader = BinaryReader::new(&data);
        let (decoded, errors) = decode_section::<Item>(&mut reader, &VersionPolicy::latest(), Section::Items).unwrap();
        assert_eq!(decoded, items[..2].to_vec());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].section, Section::Items);
        assert_eq!(errors[0].ordinal, Some(2));
        assert!(errors[0].error.is_truncation());
    }

    #[test]
    fn test_invalid_record_is_omitted() {
        let mut bad = sample_map();
        bad.index = 2;
        bad.light = 9;
        let good = sample_map();

        let mut writer = BinaryWriter::in_memory();
        write_list(&mut writer, "maps", &[bad, good.clone()], |w, r| r.encode(w)).unwrap();
        let data = writer.into_inner();

        let mut reader = BinaryReader::new(&data);
        let (maps, errors) =
            decode_section::<crate::records::Map>(&mut reader, &VersionPolicy::latest(), Section::Maps).unwrap();
        assert!(reader.is_empty());
        assert_eq!(maps, vec![good]);
        assert_eq!(errors[0].ordinal, Some(0));
        assert!(matches!(errors[0].error, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_negative_section_count() {
        let data = (-1i32).to_le_bytes();
        let mut reader = BinaryReader::new(&data);
        let err = decode_section::<Item>(&mut reader, &VersionPolicy::latest(), Section::Items).unwrap_err();
        assert_eq!(err.ordinal, None);
        assert!(matches!(err.error, Error::MalformedCount { count: -1, .. }));
    }

    #[test]
    fn test_count_failure_stops_load() {
        let mut bytes = sample_image().to_bytes().unwrap();
        // Cut the stream right after the item section.
        let mut writer = BinaryWriter::in_memory();
        sample_image().header.write_to(&mut writer).unwrap();
        let header_len = writer.written();
        let maps_len = item_section(&[]).len() + sample_map().to_bytes().unwrap().len();
        let items_len = 4 + sample_item().to_bytes().unwrap().len();
        bytes.truncate(header_len + maps_len + items_len);

        let report = load_database(&bytes).unwrap();
        assert_eq!(report.image.maps.len(), 1);
        assert_eq!(report.image.items.len(), 1);
        assert!(report.image.monsters.is_empty());
        assert!(report.image.dragon.is_none());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].section, Section::Monsters);
        assert_eq!(report.errors[0].ordinal, None);
    }

    #[test]
    fn test_header_failure_is_fatal() {
        assert!(load_database(&[1, 2]).unwrap_err().is_truncation());

        let mut bytes = sample_image().to_bytes().unwrap();
        bytes[..4].copy_from_slice(&59i32.to_le_bytes());
        assert!(matches!(load_database(&bytes), Err(Error::UnsupportedVersion(59))));
    }

    #[test]
    fn test_old_version_skips_late_sections() {
        // Version 62: no gameshop, conquest or respawn sections in the stream.
        let mut data = Vec::new();
        for v in [62i32, 0, 0, 0, 0, 0, 0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        for _ in 0..5 {
            data.extend_from_slice(&0i32.to_le_bytes());
        }
        data.extend_from_slice(&Dragon::default().to_bytes().unwrap());
        data.extend_from_slice(&0i32.to_le_bytes());

        let report = load_database(&data).unwrap();
        assert!(report.is_clean(), "{:?}", report.errors);
        assert_eq!(report.image.version(), 62);
        assert!(report.image.dragon.is_some());
        assert!(report.image.respawn_timer.is_none());

        let resaved = report.image.to_bytes().unwrap();
        assert_eq!(&resaved[..4], &LATEST_VERSION.to_le_bytes());
        let reloaded = load_database(&resaved).unwrap();
        assert_eq!(reloaded.image.respawn_timer, Some(RespawnTimer::default()));
    }

    #[test]
    fn test_failed_save_writes_nothing() {
        let mut image = sample_image();
        image.items[0].name = "\u{4e2d}".to_string();
        let mut out = Vec::new();
        assert!(save_database(&image, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_open_enriches_from_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut image = sample_image();
        image.quests.push(sample_quest());
        let db_path = tmp.path().join("Server.MirDB");
        image.save(&db_path).unwrap();

        let quest_dir = tmp.path().join("Quests");
        std::fs::create_dir_all(&quest_dir).unwrap();
        std::fs::write(quest_dir.join("WolfHunt.txt"), "[@EXPREWARD]\n250\n").unwrap();

        let plain = DatabaseImage::open(&db_path, &LoadOptions::default()).unwrap();
        assert!(plain.is_clean());
        assert_eq!(plain.image.quests[0].exp_reward, 0);

        let enriched = DatabaseImage::open(&db_path, &LoadOptions::enriched()).unwrap();
        assert_eq!(enriched.image.quests[0].exp_reward, 250);
        let dragon = enriched.image.dragon.unwrap();
        assert!(dragon.drops.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_stats_survive_resave() {
        let mut image = sample_image();
        image.monsters[0].stats.set(Stat::Holy, 3);
        image.maps[0].safe_zones[0].location = Point::new(-1, 7);
        let report = load_database(&image.to_bytes().unwrap()).unwrap();
        assert_eq!(report.image.monsters[0].stats.get(Stat::Holy), 3);
        assert_eq!(report.image.maps[0].safe_zones[0].location, Point::new(-1, 7));
    }
}
