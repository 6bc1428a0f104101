use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{Level, event};

use pullrate_core::SetStats;

use crate::accumulator::SetCardTable;

use super::PipelineError;

/// File names are derived from set codes, so a code must be a single plain path component.
pub fn is_safe_set_code(code: &str) -> bool {
    !code.is_empty()
        && code != "."
        && code != ".."
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

pub fn set_file_path(sets_dir: &Path, code: &str) -> PathBuf {
    sets_dir.join(format!("{code}.json"))
}

/// Writes the statistics table as pretty-printed JSON keyed by set code.
pub fn write_sets_table(
    path: &Path,
    stats: &BTreeMap<String, SetStats>,
) -> Result<(), PipelineError> {
    write_pretty_json(path, stats)?;
    event!(
        target: "pullrate_ingest::artifacts",
        Level::INFO,
        path = %path.display(),
        sets = stats.len() as u64,
        "wrote sets table"
    );
    Ok(())
}

/// Writes one deduplicated card table per set into `sets_dir`, calling `on_create`
/// with each path before the file is created. Returns the number of files written.
pub fn write_set_files<F>(
    sets_dir: &Path,
    cards: &BTreeMap<String, SetCardTable>,
    mut on_create: F,
) -> Result<usize, PipelineError>
where
    F: FnMut(&Path),
{
    let mut written = 0usize;
    for (code, table) in cards {
        let path = set_file_path(sets_dir, code);
        on_create(&path);
        write_pretty_json(&path, table)?;
        written += 1;

        if written % 100 == 0 {
            event!(
                target: "pullrate_ingest::artifacts",
                Level::INFO,
                written = written as u64,
                "wrote set files"
            );
        }
    }
    Ok(written)
}

fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|source| PipelineError::file("creating", path, source))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer
        .flush()
        .map_err(|source| PipelineError::file("writing", path, source))?;
    Ok(())
}
