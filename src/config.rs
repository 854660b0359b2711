use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::process::record::{GroupKey, DEFAULT_COLUMNS};

/// Granularity of the parsed receipt date, and therefore of the
/// cumulative series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    /// Calendar day; same-day receipts collapse into one series point.
    #[default]
    Day,
    /// Day plus hour and minute.
    Minute,
}

/// Everything one run needs. Missing YAML keys fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub states: Vec<String>,
    pub candidates: Vec<String>,
    /// Columns copied into each record and exported, in order.
    pub columns: Vec<String>,
    /// Receipts strictly below this amount are dropped.
    pub min_amount: Option<f64>,
    pub date_precision: DatePrecision,
    /// Directory holding `<STATE>-<Candidate>.csv` extracts.
    pub data_dir: PathBuf,
    /// Archive expanded into `extract_to` when `data_dir` is missing.
    pub archive: Option<PathBuf>,
    pub extract_to: PathBuf,
    pub workbook_file: PathBuf,
    pub chart_file: PathBuf,
    pub chart_size: (u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            states: ["FL", "GA", "NC", "PA"].map(String::from).to_vec(),
            candidates: ["Trump", "Biden"].map(String::from).to_vec(),
            columns: DEFAULT_COLUMNS.map(String::from).to_vec(),
            min_amount: None,
            date_precision: DatePrecision::Day,
            data_dir: PathBuf::from("data"),
            archive: Some(PathBuf::from("data.zip")),
            extract_to: PathBuf::from("."),
            workbook_file: PathBuf::from("receipts.xlsx"),
            chart_file: PathBuf::from("graph.svg"),
            chart_size: (1280, 720),
        }
    }
}

impl Config {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PipelineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Reads `path` if it exists, otherwise returns [`Config::default`].
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            info!(path = %path.display(), "loading config");
            Self::from_yaml_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(PipelineError::Config("no states configured".into()));
        }
        if self.candidates.is_empty() {
            return Err(PipelineError::Config("no candidates configured".into()));
        }
        if self.columns.is_empty() {
            return Err(PipelineError::Config("no columns configured".into()));
        }
        if let Some(min) = self.min_amount {
            if !min.is_finite() {
                return Err(PipelineError::Config(format!(
                    "min_amount must be finite, got {}",
                    min
                )));
            }
        }
        Ok(())
    }

    /// Candidate-major: every state for the first candidate, then the next.
    pub fn groups(&self) -> Vec<GroupKey> {
        self.candidates
            .iter()
            .flat_map(|c| self.states.iter().map(move |s| GroupKey::new(c, s)))
            .collect()
    }
}
