use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use tracing::{Level, event};

use crate::accumulator::{Aggregation, SetAccumulator, SetTables};
use crate::compact::compact_record;
use crate::filter::{CardFilter, SkipReason};
use crate::raw::RawCardRecord;

use super::PipelineError;

/// Running tallies for one pass. Advisory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestCounters {
    pub read: u64,
    pub kept: u64,
    pub skipped: u64,
    pub duplicates: u64,
    pub incomplete: u64,
    pub skip_reasons: BTreeMap<SkipReason, u64>,
}

/// What happened to one array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Skipped(SkipReason),
    Kept(Aggregation),
}

/// Everything a finished pass produced besides the card stream itself.
#[derive(Debug)]
pub struct IngestOutput<W> {
    pub counters: IngestCounters,
    pub tables: SetTables,
    pub writer: W,
}

/// Single-pass filter, compact and aggregate stage.
///
/// Kept records are written to `writer` as NDJSON as soon as they are accepted; set
/// tables stay in memory until [`Ingestor::finish`].
pub struct Ingestor<W: Write> {
    filter: CardFilter,
    accumulator: SetAccumulator,
    writer: W,
    counters: IngestCounters,
    progress_interval: u64,
}

impl<W: Write> Ingestor<W> {
    pub fn new(filter: CardFilter, writer: W, progress_interval: u64) -> Self {
        Self {
            filter,
            accumulator: SetAccumulator::new(),
            writer,
            counters: IngestCounters::default(),
            progress_interval: progress_interval.max(1),
        }
    }

    /// Processes one array element; `None` marks an element that did not decode as a card.
    pub fn ingest(&mut self, record: Option<RawCardRecord>) -> Result<RecordOutcome, PipelineError> {
        self.counters.read += 1;

        let outcome = match record {
            Some(raw) => self.ingest_card(&raw)?,
            None => self.skip(SkipReason::Malformed, None),
        };

        if self.counters.read % self.progress_interval == 0 {
            event!(
                target: "pullrate_ingest::progress",
                Level::INFO,
                read = self.counters.read,
                kept = self.counters.kept,
                skipped = self.counters.skipped,
                sets = self.accumulator.set_count() as u64,
                "ingest progress"
            );
        }

        Ok(outcome)
    }

    fn ingest_card(&mut self, raw: &RawCardRecord) -> Result<RecordOutcome, PipelineError> {
        let kept = match self.filter.evaluate(raw) {
            Ok(kept) => kept,
            Err(reason) => return Ok(self.skip(reason, raw.id.as_deref())),
        };

        let card = compact_record(raw, kept);
        serde_json::to_writer(&mut self.writer, &card)?;
        self.writer.write_all(b"\n")?;
        self.counters.kept += 1;

        let aggregation = self.accumulator.observe(raw, card);
        match aggregation {
            Aggregation::Counted(_) => {}
            Aggregation::Duplicate => self.counters.duplicates += 1,
            Aggregation::Incomplete => {
                self.counters.incomplete += 1;
                event!(
                    target: "pullrate_ingest::filter",
                    Level::DEBUG,
                    id = kept.id.unwrap_or("-"),
                    "kept card lacks set or identity fields; excluded from set tables"
                );
            }
        }

        Ok(RecordOutcome::Kept(aggregation))
    }

    fn skip(&mut self, reason: SkipReason, id: Option<&str>) -> RecordOutcome {
        self.counters.skipped += 1;
        *self.counters.skip_reasons.entry(reason).or_insert(0) += 1;
        event!(
            target: "pullrate_ingest::filter",
            Level::TRACE,
            reason = reason.as_str(),
            id = id.unwrap_or("-"),
            "record skipped"
        );
        RecordOutcome::Skipped(reason)
    }

    pub fn counters(&self) -> &IngestCounters {
        &self.counters
    }

    /// Flushes the card stream and hands back the finalized set tables.
    pub fn finish(mut self) -> Result<IngestOutput<W>, PipelineError> {
        self.writer.flush()?;
        Ok(IngestOutput {
            counters: self.counters,
            tables: self.accumulator.finish(),
            writer: self.writer,
        })
    }
}
