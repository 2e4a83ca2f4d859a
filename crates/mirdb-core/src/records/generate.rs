//! Seeded record generators for round-trip tests.

use std::fmt::Debug;

use mirdb_common::{BinaryReader, Point};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use super::*;
use crate::codec::Record;
use crate::stat::{Stat, StatTable};
use crate::types::{
    BindMode, ConquestGame, ConquestType, ItemGrade, ItemSet, ItemType, LightSetting, QuestType,
    RequiredClass, RequiredGender, RequiredType, SpecialItemMode, Spell, WeatherSetting, WireEnum,
};
use crate::version::VersionPolicy;

/// Records generated per test.
pub(crate) const CASES: usize = 64;

/// Encode, decode at the latest version and re-encode.
pub(crate) fn assert_roundtrip<T: Record + PartialEq + Debug>(record: &T) {
    let bytes = record.to_bytes().unwrap();
    let mut reader = BinaryReader::new(&bytes);
    let decoded = T::decode(&mut reader, &VersionPolicy::latest()).unwrap();
    assert!(reader.is_empty(), "{} left {} bytes", T::KIND, reader.remaining());
    assert_eq!(&decoded, record);
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

/// Builds records whose every field lies inside its wire domain.
pub(crate) struct RecordGen {
    rng: Pcg64,
}

impl RecordGen {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    fn flag(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn byte(&mut self) -> u8 {
        self.rng.random()
    }

    fn short(&mut self) -> u16 {
        self.rng.random()
    }

    fn int(&mut self) -> i32 {
        self.rng.random()
    }

    fn uint(&mut self) -> u32 {
        self.rng.random()
    }

    fn point(&mut self) -> Point {
        Point::new(self.rng.random_range(-1000..1000), self.rng.random_range(-1000..1000))
    }

    /// Latin-1 text, possibly empty.
    fn text(&mut self) -> String {
        let len = self.rng.random_range(0..12);
        (0..len).map(|_| char::from(self.rng.random_range(0x20u8..=0xFF))).collect()
    }

    /// A float with an exact binary representation.
    fn ratio(&mut self) -> f32 {
        self.rng.random_range(-400..400i32) as f32 / 8.0
    }

    fn pick<T: Copy>(&mut self, all: &[T]) -> T {
        all[self.rng.random_range(0..all.len())]
    }

    fn list<T>(&mut self, max: usize, mut element: impl FnMut(&mut Self) -> T) -> Vec<T> {
        let len = self.rng.random_range(0..=max);
        (0..len).map(|_| element(self)).collect()
    }

    fn stats(&mut self) -> StatTable {
        let known: Vec<Stat> = Stat::ALL.iter().copied().filter(|s| *s != Stat::Unknown).collect();
        let mut table = StatTable::new();
        for _ in 0..self.rng.random_range(0..8) {
            let stat = self.pick(&known);
            let magnitude = self.rng.random_range(1..5000i32);
            table.set(stat, if self.flag() { magnitude } else { -magnitude });
        }
        table
    }

    pub(crate) fn item(&mut self) -> Item {
        Item {
            index: self.int(),
            name: self.text(),
            item_type: self.pick(ItemType::ALL),
            grade: self.pick(ItemGrade::ALL),
            required_type: self.pick(RequiredType::ALL),
            required_class: self.pick(RequiredClass::ALL),
            required_gender: self.pick(RequiredGender::ALL),
            set: self.pick(ItemSet::ALL),
            shape: self.rng.random(),
            weight: self.byte(),
            light: self.byte(),
            required_amount: self.byte(),
            image: self.short(),
            durability: self.short(),
            stack_size: self.short(),
            price: self.uint(),
            start_item: self.flag(),
            effect: self.byte(),
            need_identify: self.flag(),
            show_group_pickup: self.flag(),
            class_based: self.flag(),
            level_based: self.flag(),
            can_mine: self.flag(),
            global_drop_notify: self.flag(),
            bind: BindMode::from_bits_truncate(self.short()),
            unique: SpecialItemMode::from_bits_truncate(u32::from(self.short())),
            random_stats_id: self.byte(),
            can_fast_run: self.flag(),
            can_awakening: self.flag(),
            slots: self.byte(),
            stats: self.stats(),
            tool_tip: self.flag().then(|| self.text()),
        }
    }

    pub(crate) fn monster(&mut self) -> Monster {
        Monster {
            index: self.int(),
            name: self.text(),
            image: self.short(),
            ai: self.byte(),
            effect: self.byte(),
            level: self.short(),
            view_range: self.byte(),
            cool_eye: self.byte(),
            stats: self.stats(),
            light: self.byte(),
            attack_speed: self.short(),
            move_speed: self.short(),
            experience: self.uint(),
            can_push: self.flag(),
            can_tame: self.flag(),
            auto_rev: self.flag(),
            undead: self.flag(),
            drop_path: self.text(),
        }
    }

    pub(crate) fn map(&mut self) -> Map {
        Map {
            index: self.int(),
            file_name: self.text(),
            title: self.text(),
            mini_map: self.short(),
            light: self.pick(LightSetting::ALL).to_wire() as u8,
            big_map: self.short(),
            safe_zones: self.list(3, |g| SafeZone {
                location: g.point(),
                size: g.short(),
                start_point: g.flag(),
            }),
            respawns: self.list(3, |g| RespawnInfo {
                monster_index: g.int(),
                location: g.point(),
                count: g.short(),
                spread: g.short(),
                delay: g.short(),
                direction: g.byte(),
                route_path: g.text(),
                random_delay: g.short(),
                respawn_index: g.int(),
                save_respawn_time: g.flag(),
                respawn_ticks: g.short(),
            }),
            movements: self.list(3, |g| Movement {
                map_index: g.int(),
                source: g.point(),
                destination: g.point(),
                need_hole: g.flag(),
                need_move: g.flag(),
                conquest_index: g.int(),
                show_on_big_map: g.flag(),
                icon: g.int(),
            }),
            no_teleport: self.flag(),
            no_reconnect: self.flag(),
            no_reconnect_map: self.text(),
            no_random: self.flag(),
            no_escape: self.flag(),
            no_recall: self.flag(),
            no_drug: self.flag(),
            no_position: self.flag(),
            no_throw_item: self.flag(),
            no_drop_player: self.flag(),
            no_drop_monster: self.flag(),
            no_names: self.flag(),
            fight: self.flag(),
            fire: self.flag(),
            fire_damage: self.int(),
            lightning: self.flag(),
            lightning_damage: self.int(),
            map_dark_light: self.byte(),
            mine_zones: self.list(3, |g| MineZone {
                location: g.point(),
                size: g.int(),
                mine: g.byte(),
            }),
            mine_index: self.byte(),
            no_mount: self.flag(),
            need_bridle: self.flag(),
            no_fight: self.flag(),
            music: self.short(),
            no_town_teleport: self.flag(),
            no_reincarnation: self.flag(),
            weather_particles: self.pick(WeatherSetting::ALL).to_wire() as u16,
            gt: self.flag(),
            gt_index: self.byte(),
        }
    }

    pub(crate) fn npc(&mut self) -> Npc {
        Npc {
            index: self.int(),
            map_index: self.int(),
            collect_quest_indexes: self.list(4, Self::int),
            finish_quest_indexes: self.list(4, Self::int),
            file_name: self.text(),
            name: self.text(),
            location: self.point(),
            image: self.short(),
            rate: self.short(),
            time_visible: self.flag(),
            hour_start: self.rng.random_range(0..24),
            minute_start: self.rng.random_range(0..60),
            hour_end: self.rng.random_range(0..24),
            minute_end: self.rng.random_range(0..60),
            min_lev: self.rng.random(),
            max_lev: self.rng.random(),
            day_of_week: self.text(),
            class_required: self.text(),
            conquest: self.int(),
            flag_needed: self.int(),
            show_on_big_map: self.flag(),
            big_map_icon: self.int(),
            can_teleport_to: self.flag(),
            conquest_visible: self.flag(),
        }
    }

    /// Only the stored fields; text-file details stay empty.
    pub(crate) fn quest(&mut self) -> Quest {
        Quest {
            index: self.int(),
            name: self.text(),
            group: self.text(),
            file_name: self.text(),
            required_min_level: self.rng.random_range(0..500),
            // Zero is read back as unbounded.
            required_max_level: self.rng.random_range(1..=UNBOUNDED_MAX_LEVEL),
            required_quest: self.int(),
            required_class: self.pick(RequiredClass::ALL),
            quest_type: self.pick(QuestType::ALL),
            goto_message: self.text(),
            kill_message: self.text(),
            item_message: self.text(),
            flag_message: self.text(),
            time_limit_seconds: self.int(),
            ..Quest::default()
        }
    }

    pub(crate) fn dragon(&mut self) -> Dragon {
        Dragon {
            enabled: self.flag(),
            map_file_name: self.text(),
            monster_name: self.text(),
            body_name: self.text(),
            location: self.point(),
            drop_area_top: self.point(),
            drop_area_bottom: self.point(),
            exps: std::array::from_fn(|_| self.rng.random()),
            ..Dragon::default()
        }
    }

    pub(crate) fn magic(&mut self) -> Magic {
        Magic {
            name: self.text(),
            spell: self.pick(Spell::ALL),
            base_cost: self.byte(),
            level_cost: self.byte(),
            icon: self.byte(),
            level1: self.byte(),
            level2: self.byte(),
            level3: self.byte(),
            need1: self.short(),
            need2: self.short(),
            need3: self.short(),
            delay_base: self.uint(),
            delay_reduction: self.uint(),
            power_base: self.short(),
            power_bonus: self.short(),
            mpower_base: self.short(),
            mpower_bonus: self.short(),
            range: self.byte(),
            multiplier_base: self.ratio(),
            multiplier_bonus: self.ratio(),
        }
    }

    pub(crate) fn gameshop_item(&mut self) -> GameShopItem {
        GameShopItem {
            item_index: self.int(),
            g_index: self.int(),
            gold_price: self.uint(),
            credit_price: self.uint(),
            count: self.short(),
            class: self.text(),
            category: self.text(),
            stock: self.int(),
            i_stock: self.flag(),
            deal: self.flag(),
            top_item: self.flag(),
            date: self.rng.random(),
            can_buy_gold: self.flag(),
            can_buy_credit: self.flag(),
        }
    }

    /// A conquest structure; guards carry an unsigned cost.
    pub(crate) fn structure(&mut self, guard: bool) -> ConquestStructure {
        ConquestStructure {
            index: self.int(),
            location: self.point(),
            mob_index: self.int(),
            name: self.text(),
            repair_cost: if guard {
                i64::from(self.uint())
            } else {
                i64::from(self.int())
            },
        }
    }

    pub(crate) fn conquest_flag(&mut self) -> ConquestFlag {
        ConquestFlag {
            index: self.int(),
            location: self.point(),
            name: self.text(),
            file_name: self.text(),
        }
    }

    pub(crate) fn conquest(&mut self) -> Conquest {
        Conquest {
            index: self.int(),
            full_map: self.flag(),
            location: self.point(),
            size: self.short(),
            name: self.text(),
            map_index: self.int(),
            palace_index: self.int(),
            guard_index: self.int(),
            gate_index: self.int(),
            wall_index: self.int(),
            siege_index: self.int(),
            flag_index: self.int(),
            guards: self.list(3, |g| g.structure(true)),
            extra_maps: self.list(3, Self::int),
            gates: self.list(3, |g| g.structure(false)),
            walls: self.list(3, |g| g.structure(false)),
            sieges: self.list(3, |g| g.structure(false)),
            flags: self.list(3, Self::conquest_flag),
            start_hour: self.rng.random_range(0..24),
            war_length: self.int(),
            conquest_type: self.pick(ConquestType::ALL),
            game: self.pick(ConquestGame::ALL),
            monday: self.flag(),
            tuesday: self.flag(),
            wednesday: self.flag(),
            thursday: self.flag(),
            friday: self.flag(),
            saturday: self.flag(),
            sunday: self.flag(),
            king_location: self.point(),
            king_size: self.short(),
            control_point_index: self.int(),
            control_points: self.list(3, Self::conquest_flag),
        }
    }

    pub(crate) fn respawn_timer(&mut self) -> RespawnTimer {
        RespawnTimer {
            base_spawn_rate: self.byte(),
            current_tick_counter: self.rng.random(),
            options: self.list(4, |g| RespawnTickOption {
                user_count: g.int(),
                delay_loss: g.ratio(),
            }),
            current_delay: self.rng.random(),
        }
    }
}
