use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_RUN_ID: &str = "default";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root ingestion configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IngestConfig {
    #[serde(default = "default_run_id")]
    pub run_id: String,
    pub input: String,
    #[serde(default)]
    pub filter: FilterConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IngestConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: IngestConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_path("input", &self.run_id, &self.input)?;
        self.filter.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.progress.validate()?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            input: resolve_template(&self.run_id, &self.input),
            cards_ndjson: resolve_template(&self.run_id, &self.outputs.cards_ndjson),
            sets_json: resolve_template(&self.run_id, &self.outputs.sets_json),
            sets_dir: resolve_template(&self.run_id, &self.outputs.sets_dir),
        }
    }
}

fn default_run_id() -> String {
    DEFAULT_RUN_ID.to_string()
}

/// Keep-predicate settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FilterConfig {
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

impl FilterConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.language.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "filter.language".to_string(),
                message: "language code must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub cards_ndjson: String,
    pub sets_json: String,
    pub sets_dir: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.cards_ndjson", &self.cards_ndjson),
            ("outputs.sets_json", &self.sets_json),
            ("outputs.sets_dir", &self.sets_dir),
        ] {
            validate_path(label, run_id, value)?;
        }

        let cards = resolve_template(run_id, &self.cards_ndjson);
        let sets = resolve_template(run_id, &self.sets_json);
        if cards == sets {
            return Err(ValidationError::InvalidField {
                field: "outputs.sets_json".to_string(),
                message: "sets table must not overwrite the card stream".to_string(),
            });
        }
        Ok(())
    }
}

/// Progress reporting cadence.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProgressConfig {
    #[serde(default = "default_progress_interval")]
    pub interval: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ProgressConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.interval == 0 {
            return Err(ValidationError::InvalidField {
                field: "progress.interval".to_string(),
                message: "progress interval must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_progress_interval() -> u64 {
    DEFAULT_PROGRESS_INTERVAL
}

/// Logging configuration defaults to human-readable logs on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_path(label: &str, run_id: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: label.to_string(),
            message: "path must not be empty".to_string(),
        });
    }

    let resolved = resolve_template(run_id, value);
    if resolved.components().count() == 0 {
        return Err(ValidationError::InvalidField {
            field: label.to_string(),
            message: "resolved path is invalid".to_string(),
        });
    }
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved input and output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub input: PathBuf,
    pub cards_ndjson: PathBuf,
    pub sets_json: PathBuf,
    pub sets_dir: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
