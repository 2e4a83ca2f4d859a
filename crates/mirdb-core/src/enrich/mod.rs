//! Companion text enrichment.
//!
//! Quest descriptions, tasks and rewards, and the dragon drop tables, are not
//! part of the binary database. They come from text files next to it and are
//! attached to an already decoded image. Every pass clears the fields it owns
//! before filling them, so running a pass twice gives the same result.

mod dragon_drops;
mod quest_text;

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::image::{DatabaseImage, ImageIndex};
use crate::records::{Item, Monster, Quest};
use crate::Result;

pub use dragon_drops::enrich_dragon;
pub use quest_text::enrich_quest;

/// Resolves item names used in companion files.
pub trait ItemLookup {
    fn item_by_name(&self, name: &str) -> Option<&Item>;
}

/// Resolves monster names used in companion files.
pub trait MonsterLookup {
    fn monster_by_name(&self, name: &str) -> Option<&Monster>;
}

impl ItemLookup for DatabaseImage {
    fn item_by_name(&self, name: &str) -> Option<&Item> {
        DatabaseImage::item_by_name(self, name)
    }
}

impl MonsterLookup for DatabaseImage {
    fn monster_by_name(&self, name: &str) -> Option<&Monster> {
        DatabaseImage::monster_by_name(self, name)
    }
}

impl ItemLookup for ImageIndex<'_> {
    fn item_by_name(&self, name: &str) -> Option<&Item> {
        ImageIndex::item_by_name(self, name)
    }
}

impl MonsterLookup for ImageIndex<'_> {
    fn monster_by_name(&self, name: &str) -> Option<&Monster> {
        ImageIndex::monster_by_name(self, name)
    }
}

/// Source of companion file lines.
pub trait LineSource: Sync {
    /// Lines of the file at `path`, or `None` when it does not exist.
    fn read_lines(&self, path: &Path) -> io::Result<Option<Vec<String>>>;
}

/// Reads companion files from disk. Invalid UTF-8 is replaced, not rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLineSource;

impl LineSource for FsLineSource {
    fn read_lines(&self, path: &Path) -> io::Result<Option<Vec<String>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(
                String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect(),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Where companion files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichPaths {
    pub quest_dir: PathBuf,
    pub drop_dir: PathBuf,
}

impl EnrichPaths {
    /// The standard `Quests/` and `Drops/` layout under `data_dir`.
    pub fn under(data_dir: &Path) -> Self {
        Self {
            quest_dir: data_dir.join("Quests"),
            drop_dir: data_dir.join("Drops"),
        }
    }

    pub fn quest_file(&self, quest: &Quest) -> PathBuf {
        self.quest_dir.join(format!("{}.txt", quest.file_name))
    }

    pub fn dragon_file(&self) -> PathBuf {
        self.drop_dir.join("DragonItem.txt")
    }
}

fn enrich_quest_file<S, L>(quest: &mut Quest, paths: &EnrichPaths, source: &S, lookup: &L) -> Result<bool>
where
    S: LineSource + ?Sized,
    L: ItemLookup + MonsterLookup + ?Sized,
{
    let path = paths.quest_file(quest);
    match source.read_lines(&path)? {
        Some(lines) => {
            enrich_quest(quest, &lines, lookup);
            Ok(true)
        }
        None => {
            debug!(quest = quest.index, path = %path.display(), "quest file not found");
            quest.clear_details();
            Ok(false)
        }
    }
}

impl DatabaseImage {
    /// Run the quest text pass on every quest and the dragon drop pass.
    ///
    /// Missing files leave the affected fields empty. I/O errors other than
    /// a missing file abort the pass.
    pub fn enrich<S: LineSource + ?Sized>(&mut self, paths: &EnrichPaths, source: &S) -> Result<()> {
        let DatabaseImage {
            maps,
            items,
            monsters,
            quests,
            dragon,
            ..
        } = self;
        let index = ImageIndex::from_parts(&maps[..], &items[..], &monsters[..]);

        #[cfg(feature = "parallel")]
        let found = {
            use rayon::prelude::*;
            let found: Vec<bool> = quests
                .par_iter_mut()
                .map(|quest| enrich_quest_file(quest, paths, source, &index))
                .collect::<Result<_>>()?;
            found.into_iter().filter(|f| *f).count()
        };
        #[cfg(not(feature = "parallel"))]
        let found = {
            let mut found = 0usize;
            for quest in quests.iter_mut() {
                found += usize::from(enrich_quest_file(quest, paths, source, &index)?);
            }
            found
        };
        info!(quests = quests.len(), files = found, "enriched quests");

        if let Some(dragon) = dragon {
            let path = paths.dragon_file();
            match source.read_lines(&path)? {
                Some(lines) => {
                    enrich_dragon(dragon, &lines, &index);
                    let drops: usize = dragon.drops.iter().map(Vec::len).sum();
                    info!(drops, "enriched dragon");
                }
                None => {
                    debug!(path = %path.display(), "dragon drop file not found");
                    dragon.clear_drops();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::samples::{sample_item, sample_monster, sample_quest};
    use crate::records::Dragon;
    use hashbrown::HashMap;

    /// In-memory files keyed by path.
    #[derive(Default)]
    pub(crate) struct MemorySource {
        files: HashMap<PathBuf, Vec<String>>,
    }

    impl MemorySource {
        pub(crate) fn with(mut self, path: impl Into<PathBuf>, text: &str) -> Self {
            self.files.insert(path.into(), text.lines().map(str::to_owned).collect());
            self
        }
    }

    impl LineSource for MemorySource {
        fn read_lines(&self, path: &Path) -> io::Result<Option<Vec<String>>> {
            Ok(self.files.get(path).cloned())
        }
    }

    #[test]
    fn test_paths() {
        let paths = EnrichPaths::under(Path::new("/srv/db"));
        let quest = sample_quest();
        assert_eq!(paths.quest_file(&quest), Path::new("/srv/db/Quests/WolfHunt.txt"));
        assert_eq!(paths.dragon_file(), Path::new("/srv/db/Drops/DragonItem.txt"));
    }

    #[test]
    fn test_image_enrich() {
        let mut image = DatabaseImage::new();
        image.items.push(sample_item());
        image.monsters.push(sample_monster());
        image.quests.push(sample_quest());
        image.quests.push(crate::records::Quest {
            index: 9,
            file_name: "Missing".into(),
            ..sample_quest()
        });
        image.quests[1].description.push("stale".into());
        image.dragon = Some(Dragon::default());

        // Companion files write names without spaces.
        let item_name = image.items[0].name.replace(' ', "");
        let monster_name = image.monsters[0].name.clone();
        let paths = EnrichPaths::under(Path::new("db"));
        let source = MemorySource::default()
            .with(
                "db/Quests/WolfHunt.txt",
                &format!("[@DESCRIPTION]\nHunt.\n[@KILLTASKS]\n{monster_name} 5\n[@EXPREWARD]\n300\n"),
            )
            .with("db/Drops/DragonItem.txt", &format!("01500 {item_name} 2\n01100 Gold 5000 1\n"));

        image.enrich(&paths, &source).unwrap();
        let quest = &image.quests[0];
        assert_eq!(quest.description, vec!["Hunt."]);
        assert_eq!(quest.kill_tasks.len(), 1);
        assert_eq!(quest.kill_tasks[0].count, 5);
        assert_eq!(quest.exp_reward, 300);
        assert!(image.quests[1].description.is_empty());

        let dragon = image.dragon.as_ref().unwrap();
        assert_eq!(dragon.drops[0].len(), 1);
        assert_eq!(dragon.drops[0][0].gold, 5000);
        assert_eq!(dragon.drops[1][0].item_index, Some(image.items[0].index));

        let once = image.clone();
        image.enrich(&paths, &source).unwrap();
        assert_eq!(image, once);
    }
}
