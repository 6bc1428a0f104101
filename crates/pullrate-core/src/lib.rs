#![deny(warnings)]
pub mod format;
pub mod model;
pub mod probability;

pub use model::{
    CardPrices, CompactCardRecord, Rarity, RarityBucket, SetInfo, SetStats, SetsTable,
    load_sets_table,
};
pub use probability::{
    PACKS_PER_BOX, ProbabilityError, PullOdds, boxes_needed, expected_copies, packs_needed,
    probability_per_pack, pull_probability,
};
