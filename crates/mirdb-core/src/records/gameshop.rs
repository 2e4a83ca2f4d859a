//! In-game shop listings.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter};
use serde::{Deserialize, Serialize};

use crate::codec::{read_uint, saturate_u16, Record};
use crate::version::{Field, VersionPolicy};
use crate::Result;

/// A shop listing. `item_index` is the listed item's `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameShopItem {
    pub item_index: i32,
    pub g_index: i32,
    pub gold_price: u32,
    pub credit_price: u32,
    pub count: u16,
    pub class: String,
    pub category: String,
    pub stock: i32,
    pub i_stock: bool,
    pub deal: bool,
    pub top_item: bool,
    /// Listing date in .NET `DateTime.ToBinary` form, kept opaque.
    pub date: i64,
    pub can_buy_gold: bool,
    pub can_buy_credit: bool,
}

impl Default for GameShopItem {
    fn default() -> Self {
        Self {
            item_index: 0,
            g_index: 0,
            gold_price: 0,
            credit_price: 0,
            count: 1,
            class: String::new(),
            category: String::new(),
            stock: 0,
            i_stock: false,
            deal: false,
            top_item: false,
            date: 0,
            can_buy_gold: false,
            can_buy_credit: false,
        }
    }
}

impl Record for GameShopItem {
    const KIND: &'static str = "game shop item";

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self> {
        let item_index = reader.read_i32()?;
        let g_index = reader.read_i32()?;
        let gold_price = reader.read_u32()?;
        let credit_price = reader.read_u32()?;
        let count = read_uint(reader, policy.field_width(Field::GameShopCount))?;

        let mut item = GameShopItem {
            item_index,
            g_index,
            gold_price,
            credit_price,
            count: saturate_u16("game shop count", count),
            class: reader.read_string()?,
            category: reader.read_string()?,
            stock: reader.read_i32()?,
            i_stock: reader.read_bool()?,
            deal: reader.read_bool()?,
            top_item: reader.read_bool()?,
            date: reader.read_i64()?,
            ..GameShopItem::default()
        };

        if policy.field_present(Field::GameShopCanBuy) {
            item.can_buy_gold = reader.read_bool()?;
            item.can_buy_credit = reader.read_bool()?;
        }

        Ok(item)
    }

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_i32(self.item_index)?;
        writer.write_i32(self.g_index)?;
        writer.write_u32(self.gold_price)?;
        writer.write_u32(self.credit_price)?;
        writer.write_u16(self.count)?;
        writer.write_string(&self.class)?;
        writer.write_string(&self.category)?;
        writer.write_i32(self.stock)?;
        writer.write_bool(self.i_stock)?;
        writer.write_bool(self.deal)?;
        writer.write_bool(self.top_item)?;
        writer.write_i64(self.date)?;
        writer.write_bool(self.can_buy_gold)?;
        writer.write_bool(self.can_buy_credit)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::generate::{assert_roundtrip, RecordGen, CASES};

    pub(crate) fn sample_gameshop_item() -> GameShopItem {
        GameShopItem {
            item_index: 40,
            g_index: 2,
            gold_price: 15_000,
            credit_price: 30,
            count: 5,
            class: "All".into(),
            category: "Potions".into(),
            stock: 99,
            deal: true,
            date: 0x08D5_0000_0000_0000,
            can_buy_gold: true,
            ..GameShopItem::default()
        }
    }

    #[test]
    fn test_gameshop_roundtrip() {
        let item = sample_gameshop_item();
        let bytes = item.to_bytes().unwrap();
        let decoded = GameShopItem::from_bytes(&bytes, &VersionPolicy::latest()).unwrap();
        assert_eq!(decoded, item);
    }

    fn legacy_bytes(count: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&40i32.to_le_bytes());
        data.extend_from_slice(&2i32.to_le_bytes());
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&7i32.to_le_bytes());
        data.extend_from_slice(&[1, 0, 1]);
        data.extend_from_slice(&0i64.to_le_bytes());
        data
    }

    #[test]
    fn test_wide_count_before_85() {
        let data = legacy_bytes(12);
        let mut reader = BinaryReader::new(&data);
        let item = GameShopItem::decode(&mut reader, &VersionPolicy::new(80).unwrap()).unwrap();
        assert!(reader.is_empty());
        assert_eq!(item.count, 12);
        assert_eq!(item.stock, 7);
        assert!(item.i_stock && item.top_item);
        assert!(!item.can_buy_gold);
    }

    #[test]
    fn test_oversized_legacy_count_saturates() {
        let data = legacy_bytes(70_000);
        let item = GameShopItem::from_bytes(&data, &VersionPolicy::new(80).unwrap()).unwrap();
        assert_eq!(item.count, u16::MAX);
    }

    #[test]
    fn test_generated_gameshop_items_roundtrip() {
        let mut rng = RecordGen::new(106);
        for _ in 0..CASES {
            assert_roundtrip(&rng.gameshop_item());
        }
    }
}
