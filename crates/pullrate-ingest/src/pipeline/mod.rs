mod artifacts;
mod ingestor;

use std::fs::{self, File};
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{Level, event};

use crate::config::{IngestConfig, ResolvedOutputs, ValidationError};
use crate::filter::CardFilter;
use crate::stream::{StreamError, for_each_record};

pub use artifacts::{is_safe_set_code, set_file_path, write_set_files, write_sets_table};
pub use ingestor::{IngestCounters, IngestOutput, Ingestor, RecordOutcome};

/// Primary entry point for one ingestion run.
pub struct PipelineRunner {
    config: IngestConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub counters: IngestCounters,
    pub sets: usize,
    pub set_files_written: usize,
    pub cards_path: PathBuf,
    pub sets_path: PathBuf,
    pub sets_dir: PathBuf,
    pub cards_bytes: u64,
    pub sets_bytes: u64,
}

impl PipelineRunner {
    /// Build a runner, validating the configuration first.
    pub fn new(mut config: IngestConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let outputs = config.resolved_outputs();
        Ok(Self { config, outputs })
    }

    pub fn outputs(&self) -> &ResolvedOutputs {
        &self.outputs
    }

    /// Stream the input snapshot and write all three artifacts.
    ///
    /// Not resumable: on failure every artifact this run created is removed and the
    /// run has to start over.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let input = File::open(&self.outputs.input)
            .map_err(|source| PipelineError::file("opening", &self.outputs.input, source))?;

        let mut created = CreatedFiles::default();
        match self.run_with(input, &mut created) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                event!(
                    target: "pullrate_ingest::artifacts",
                    Level::ERROR,
                    error = %err,
                    discarded = created.paths.len() as u64,
                    "ingest failed; discarding partial artifacts"
                );
                created.discard();
                Err(err)
            }
        }
    }

    fn run_with<R: Read>(
        &self,
        input: R,
        created: &mut CreatedFiles,
    ) -> Result<RunSummary, PipelineError> {
        let outputs = &self.outputs;
        ensure_parent(outputs.cards_ndjson.parent())?;
        ensure_parent(outputs.sets_json.parent())?;
        fs::create_dir_all(&outputs.sets_dir)
            .map_err(|source| PipelineError::file("creating", &outputs.sets_dir, source))?;

        created.track(&outputs.cards_ndjson);
        let cards_file = File::create(&outputs.cards_ndjson)
            .map_err(|source| PipelineError::file("creating", &outputs.cards_ndjson, source))?;

        event!(
            target: "pullrate_ingest::progress",
            Level::INFO,
            run_id = %self.config.run_id,
            input = %outputs.input.display(),
            language = %self.config.filter.language,
            "starting ingest"
        );

        let filter = CardFilter::new(self.config.filter.language.clone());
        let mut ingestor = Ingestor::new(
            filter,
            BufWriter::new(cards_file),
            self.config.progress.interval,
        );
        for_each_record(input, |record| ingestor.ingest(record).map(|_| ()))?;
        let IngestOutput {
            counters, tables, ..
        } = ingestor.finish()?;

        if let Some(code) = tables.cards.keys().find(|code| !is_safe_set_code(code)) {
            return Err(PipelineError::UnsafeSetCode { code: code.clone() });
        }

        created.track(&outputs.sets_json);
        write_sets_table(&outputs.sets_json, &tables.stats)?;
        let set_files_written =
            write_set_files(&outputs.sets_dir, &tables.cards, |path| created.track(path))?;

        let summary = RunSummary {
            sets: tables.stats.len(),
            set_files_written,
            cards_bytes: file_size(&outputs.cards_ndjson)?,
            sets_bytes: file_size(&outputs.sets_json)?,
            cards_path: outputs.cards_ndjson.clone(),
            sets_path: outputs.sets_json.clone(),
            sets_dir: outputs.sets_dir.clone(),
            counters,
        };

        event!(
            target: "pullrate_ingest::progress",
            Level::INFO,
            read = summary.counters.read,
            kept = summary.counters.kept,
            skipped = summary.counters.skipped,
            duplicates = summary.counters.duplicates,
            incomplete = summary.counters.incomplete,
            sets = summary.sets as u64,
            "ingest complete"
        );

        Ok(summary)
    }
}

#[derive(Debug, Default)]
struct CreatedFiles {
    paths: Vec<PathBuf>,
}

impl CreatedFiles {
    fn track(&mut self, path: &Path) {
        self.paths.push(path.to_path_buf());
    }

    fn discard(self) {
        for path in self.paths {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => event!(
                    target: "pullrate_ingest::artifacts",
                    Level::WARN,
                    path = %path.display(),
                    error = %err,
                    "could not remove partial artifact"
                ),
            }
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), PipelineError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| PipelineError::file("creating", dir, source))?;
    }
    Ok(())
}

fn file_size(path: &Path) -> Result<u64, PipelineError> {
    fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|source| PipelineError::file("inspecting", path, source))
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{context} {path:?}: {source}")]
    File {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
    #[error("failed to serialize artifact: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// Fatal on purpose: a set code is joined into the per-set file path.
    #[error("set code {code:?} cannot be used as a file name")]
    UnsafeSetCode { code: String },
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
}

impl PipelineError {
    fn file(context: &'static str, path: &Path, source: io::Error) -> Self {
        PipelineError::File {
            context,
            path: path.to_path_buf(),
            source,
        }
    }
}
