use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::model::rarity::{Rarity, RarityBucket};

/// Per-set population counts of distinct cards, split into five disjoint buckets.
///
/// `total` always equals the sum of the buckets when built through [`SetInfo::record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInfo {
    pub name: String,
    pub total: u32,
    pub common_land: u32,
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub mythic: u32,
}

/// Accumulation-side name for the same shape.
pub type SetStats = SetInfo;

/// Artifact keyed by set code.
pub type SetsTable = BTreeMap<String, SetInfo>;

impl SetInfo {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: 0,
            common_land: 0,
            common: 0,
            uncommon: 0,
            rare: 0,
            mythic: 0,
        }
    }

    /// Counts one distinct card in `bucket`.
    pub fn record(&mut self, bucket: RarityBucket) {
        self.total += 1;
        *self.count_mut(bucket) += 1;
    }

    pub const fn count(&self, bucket: RarityBucket) -> u32 {
        match bucket {
            RarityBucket::CommonLand => self.common_land,
            RarityBucket::Common => self.common,
            RarityBucket::Uncommon => self.uncommon,
            RarityBucket::Rare => self.rare,
            RarityBucket::Mythic => self.mythic,
        }
    }

    fn count_mut(&mut self, bucket: RarityBucket) -> &mut u32 {
        match bucket {
            RarityBucket::CommonLand => &mut self.common_land,
            RarityBucket::Common => &mut self.common,
            RarityBucket::Uncommon => &mut self.uncommon,
            RarityBucket::Rare => &mut self.rare,
            RarityBucket::Mythic => &mut self.mythic,
        }
    }

    /// Number of cards competing for a slot of the given rarity. Basic lands are
    /// excluded from the common population.
    pub const fn population(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Mythic => self.mythic,
        }
    }

    pub fn bucket_sum(&self) -> u64 {
        RarityBucket::ALL
            .iter()
            .map(|bucket| u64::from(self.count(*bucket)))
            .sum()
    }

    pub fn is_consistent(&self) -> bool {
        self.bucket_sum() == u64::from(self.total)
    }
}

/// Decodes a statistics table as written by the ingestion pipeline.
pub fn load_sets_table<R: Read>(reader: R) -> serde_json::Result<SetsTable> {
    serde_json::from_reader(reader)
}
