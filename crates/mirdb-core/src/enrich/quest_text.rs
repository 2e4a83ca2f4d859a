//! Quest text file parsing.

use tracing::trace;

use super::{ItemLookup, MonsterLookup};
use crate::records::{Item, Quest, QuestFlagTask, QuestItemReward, QuestItemTask, QuestKillTask};

const MAX_FLAG_NUMBER: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Description,
    TaskDescription,
    ReturnDescription,
    Completion,
    CarryItems,
    KillTasks,
    ItemTasks,
    FlagTasks,
    FixedRewards,
    SelectRewards,
    ExpReward,
    GoldReward,
    CreditReward,
}

impl Tag {
    const ALL: [(Tag, &'static str); 13] = [
        (Tag::Description, "[@DESCRIPTION]"),
        (Tag::TaskDescription, "[@TASKDESCRIPTION]"),
        (Tag::ReturnDescription, "[@RETURNDESCRIPTION]"),
        (Tag::Completion, "[@COMPLETION]"),
        (Tag::CarryItems, "[@CARRYITEMS]"),
        (Tag::KillTasks, "[@KILLTASKS]"),
        (Tag::ItemTasks, "[@ITEMTASKS]"),
        (Tag::FlagTasks, "[@FLAGTASKS]"),
        (Tag::FixedRewards, "[@FIXEDREWARDS]"),
        (Tag::SelectRewards, "[@SELECTREWARDS]"),
        (Tag::ExpReward, "[@EXPREWARD]"),
        (Tag::GoldReward, "[@GOLDREWARD]"),
        (Tag::CreditReward, "[@CREDITREWARD]"),
    ];

    fn parse(line: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, header)| header.eq_ignore_ascii_case(line))
            .map(|(tag, _)| *tag)
    }
}

/// Replace `quest`'s descriptions, tasks and rewards with those in `lines`.
///
/// A section starts at a `[@TAG]` line (any case) and runs until the next
/// line starting with `[` or `//`. Blank lines are ignored. Lines naming an
/// unknown item or monster are dropped.
pub fn enrich_quest<L>(quest: &mut Quest, lines: &[String], lookup: &L)
where
    L: ItemLookup + MonsterLookup + ?Sized,
{
    quest.clear_details();

    let mut current = None;
    for raw in lines {
        let line = raw.trim();
        if line.starts_with('[') {
            current = Tag::parse(line);
            continue;
        }
        if line.starts_with("//") {
            current = None;
            continue;
        }
        if line.is_empty() {
            continue;
        }
        let Some(tag) = current else {
            continue;
        };

        match tag {
            Tag::Description => quest.description.push(line.to_string()),
            Tag::TaskDescription => quest.task_description.push(line.to_string()),
            Tag::ReturnDescription => quest.return_description.push(line.to_string()),
            Tag::Completion => quest.completion_description.push(line.to_string()),
            Tag::CarryItems => quest.carry_items.extend(parse_item_task(line, lookup)),
            Tag::ItemTasks => quest.item_tasks.extend(parse_item_task(line, lookup)),
            Tag::KillTasks => quest.kill_tasks.extend(parse_kill_task(line, lookup)),
            Tag::FlagTasks => quest.flag_tasks.extend(parse_flag_task(line)),
            Tag::FixedRewards => quest.fixed_rewards.extend(parse_reward(line, lookup)),
            Tag::SelectRewards => quest.select_rewards.extend(parse_reward(line, lookup)),
            Tag::ExpReward => set_amount(&mut quest.exp_reward, line),
            Tag::GoldReward => set_amount(&mut quest.gold_reward, line),
            Tag::CreditReward => set_amount(&mut quest.credit_reward, line),
        }
    }
}

/// Second token as a count, defaulting to 1 when absent or not a number.
fn parse_count(parts: &[&str]) -> u32 {
    parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1)
}

/// Text between the first pair of double quotes.
fn parse_message(line: &str) -> String {
    line.split_once('"')
        .and_then(|(_, rest)| rest.split_once('"'))
        .map(|(message, _)| message.to_string())
        .unwrap_or_default()
}

/// Item names may omit a gendered `(M)`/`(F)` suffix.
fn find_task_item<'a, L: ItemLookup + ?Sized>(lookup: &'a L, name: &str) -> Option<&'a Item> {
    lookup
        .item_by_name(name)
        .or_else(|| lookup.item_by_name(&format!("{name}(M)")))
        .or_else(|| lookup.item_by_name(&format!("{name}(F)")))
}

fn parse_item_task<L: ItemLookup + ?Sized>(line: &str, lookup: &L) -> Option<QuestItemTask> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let name = *parts.first()?;
    let Some(item) = find_task_item(lookup, name) else {
        trace!(name, "unknown quest item");
        return None;
    };
    Some(QuestItemTask {
        item_index: item.index,
        count: parse_count(&parts),
        message: parse_message(line),
    })
}

fn parse_kill_task<L: MonsterLookup + ?Sized>(line: &str, lookup: &L) -> Option<QuestKillTask> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let name = *parts.first()?;
    let Some(monster) = lookup.monster_by_name(name) else {
        trace!(name, "unknown quest monster");
        return None;
    };
    Some(QuestKillTask {
        monster_index: monster.index,
        count: parse_count(&parts),
        message: parse_message(line),
    })
}

fn parse_flag_task(line: &str) -> Option<QuestFlagTask> {
    let number: i32 = line.split_whitespace().next()?.parse().ok()?;
    if !(0..=MAX_FLAG_NUMBER).contains(&number) {
        return None;
    }
    Some(QuestFlagTask {
        number,
        message: parse_message(line),
    })
}

fn parse_reward<L: ItemLookup + ?Sized>(line: &str, lookup: &L) -> Option<QuestItemReward> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let item = lookup.item_by_name(parts.first()?)?;
    Some(QuestItemReward {
        item_index: item.index,
        count: parse_count(&parts),
    })
}

fn set_amount(target: &mut u32, line: &str) {
    match line.parse() {
        Ok(value) => *target = value,
        Err(_) => trace!(line, "ignoring non-numeric reward"),
    }
}
