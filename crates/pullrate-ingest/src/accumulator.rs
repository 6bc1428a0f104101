use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use pullrate_core::{CompactCardRecord, RarityBucket, SetStats};

use crate::raw::{RawCardRecord, non_empty};

/// What aggregation did with one kept record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Counted(RarityBucket),
    /// Identity already counted earlier in the stream for this set.
    Duplicate,
    /// Set code, set name or both ids missing; the record only reaches the card stream.
    Incomplete,
}

/// Deduplicated cards of one set, keyed by dedup identity.
pub type SetCardTable = BTreeMap<String, CompactCardRecord>;

/// Finalized per-set artifacts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetTables {
    pub stats: BTreeMap<String, SetStats>,
    pub cards: BTreeMap<String, SetCardTable>,
}

/// Running per-set state for one pipeline pass.
#[derive(Debug, Default)]
pub struct SetAccumulator {
    stats: BTreeMap<String, SetStats>,
    cards: BTreeMap<String, SetCardTable>,
}

impl SetAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts `card` once per (set, identity); the first occurrence wins.
    pub fn observe(&mut self, raw: &RawCardRecord, card: CompactCardRecord) -> Aggregation {
        let (Some(code), Some(set_name)) = (
            non_empty(raw.set.as_deref()),
            non_empty(raw.set_name.as_deref()),
        ) else {
            return Aggregation::Incomplete;
        };
        let Some(identity) = raw.dedup_identity() else {
            return Aggregation::Incomplete;
        };

        let table = self.cards.entry(code.to_string()).or_default();
        let slot = match table.entry(identity.to_string()) {
            Entry::Occupied(_) => return Aggregation::Duplicate,
            Entry::Vacant(slot) => slot,
        };

        let bucket = RarityBucket::classify(card.rarity, raw.type_line.as_deref());
        slot.insert(card);
        self.stats
            .entry(code.to_string())
            .or_insert_with(|| SetStats::empty(set_name))
            .record(bucket);

        Aggregation::Counted(bucket)
    }

    pub fn set_count(&self) -> usize {
        self.stats.len()
    }

    pub fn finish(self) -> SetTables {
        SetTables {
            stats: self.stats,
            cards: self.cards,
        }
    }
}
