//! Dragon drop table parsing.
//!
//! One drop per line:
//!
//! ```text
//! ; comment
//! 01500 GoldenRing 3
//! 01100 Gold 20000 1
//! ```
//!
//! The first token's first two characters are ignored; the rest is the
//! chance. Then either an item name and level, or `Gold`, an amount and a
//! level. Levels run from 1 to 13.

use tracing::trace;

use super::ItemLookup;
use crate::records::{Dragon, DragonDropInfo, DRAGON_DROP_LEVELS};
use crate::types::WireEnum;

/// Replace `dragon`'s drop tables with those described by `lines`.
///
/// Malformed lines and unknown items are skipped. Each level is ordered gold
/// first, then items by item type.
pub fn enrich_dragon<L: ItemLookup + ?Sized>(dragon: &mut Dragon, lines: &[String], lookup: &L) {
    let mut levels: Vec<Vec<(DragonDropInfo, u32)>> = vec![Vec::new(); DRAGON_DROP_LEVELS];

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        match parse_drop(line, lookup) {
            Some((drop, item_type)) if (1..=DRAGON_DROP_LEVELS).contains(&usize::from(drop.level)) => {
                levels[usize::from(drop.level) - 1].push((drop, item_type));
            }
            _ => trace!(line, "skipping dragon drop"),
        }
    }

    dragon.drops = levels
        .into_iter()
        .map(|mut level| {
            level.sort_by_key(|(drop, item_type)| (drop.gold == 0, *item_type));
            level.into_iter().map(|(drop, _)| drop).collect()
        })
        .collect();
}

/// Parse one line into a drop and the sort key of its item type.
fn parse_drop<L: ItemLookup + ?Sized>(line: &str, lookup: &L) -> Option<(DragonDropInfo, u32)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }
    let chance = parts[0].get(2..)?.parse().ok()?;

    if parts[1].eq_ignore_ascii_case("gold") {
        if parts.len() < 4 {
            return None;
        }
        let drop = DragonDropInfo {
            chance,
            item_index: None,
            gold: parts[2].parse().ok()?,
            level: parts[3].parse().ok()?,
        };
        return Some((drop, 0));
    }

    let item = lookup.item_by_name(parts[1])?;
    let drop = DragonDropInfo {
        chance,
        item_index: Some(item.index),
        gold: 0,
        level: parts[2].parse().ok()?,
    };
    Some((drop, item.item_type.to_wire()))
}
