pub mod card;
pub mod rarity;
pub mod set_info;

pub use card::{CardPrices, CompactCardRecord};
pub use rarity::{Rarity, RarityBucket};
pub use set_info::{SetInfo, SetStats, SetsTable, load_sets_table};
