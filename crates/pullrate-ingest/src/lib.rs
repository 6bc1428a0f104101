//! Batch ingestion of a bulk card snapshot into compact per-card records and
//! per-set rarity statistics.
//!
//! - `raw`: serde model of the consumed snapshot fields.
//! - `filter`: booster-eligibility predicate.
//! - `compact`: raw record to [`pullrate_core::CompactCardRecord`].
//! - `accumulator`: per-set deduplication and bucket counting.
//! - `stream`: element-at-a-time decoding of the snapshot array.
//! - `pipeline`: the run itself and its artifacts.

pub mod accumulator;
pub mod compact;
pub mod config;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod raw;
pub mod stream;
