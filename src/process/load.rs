use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::process::{
    normalize::Normalizer,
    record::{GroupKey, GroupedRecords, NormalizedRecord, RawRow},
};

/// Maps a group to the file holding its rows.
pub trait SourceResolver {
    fn locate(&self, key: &GroupKey) -> PathBuf;
}

impl<F> SourceResolver for F
where
    F: Fn(&GroupKey) -> PathBuf,
{
    fn locate(&self, key: &GroupKey) -> PathBuf {
        self(key)
    }
}

/// `<dir>/<STATE>-<Candidate>.csv`
#[derive(Clone, Debug)]
pub struct DataDir {
    dir: PathBuf,
}

impl DataDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SourceResolver for DataDir {
    fn locate(&self, key: &GroupKey) -> PathBuf {
        self.dir.join(format!("{}-{}.csv", key.state, key.candidate))
    }
}

/// Read every row from `reader`, keep the ones the normalizer accepts and
/// sort them by date. The sort is stable, so same-date rows keep file order.
pub fn load_records<R: Read>(
    reader: R,
    normalizer: &Normalizer<'_>,
    origin: &Path,
) -> Result<Vec<NormalizedRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for result in rdr.deserialize::<RawRow>() {
        let row = result.map_err(|source| PipelineError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        match normalizer.normalize(&row)? {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }
    debug!(kept = records.len(), dropped, "normalized rows");

    records.sort_by_key(|r| r.date);
    Ok(records)
}

/// Load one group's file. A missing file is [`PipelineError::SourceNotFound`].
#[tracing::instrument(level = "info", skip(key, resolver, normalizer), fields(group = %key))]
pub fn load_group(
    key: &GroupKey,
    resolver: &dyn SourceResolver,
    normalizer: &Normalizer<'_>,
) -> Result<Vec<NormalizedRecord>> {
    let path = resolver.locate(key);
    let file = File::open(&path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => PipelineError::SourceNotFound {
            group: key.to_string(),
            path: path.clone(),
        },
        _ => PipelineError::FileRead {
            path: path.clone(),
            source,
        },
    })?;
    load_records(BufReader::new(file), normalizer, &path)
}

/// Load every configured group. The first failure aborts the whole load.
pub fn load_all(config: &Config, resolver: &dyn SourceResolver) -> Result<GroupedRecords> {
    let normalizer = Normalizer::new(&config.columns, config.min_amount, config.date_precision);

    let mut grouped = GroupedRecords::new();
    for key in config.groups() {
        let records = load_group(&key, resolver, &normalizer)?;
        info!(group = %key, records = records.len(), "loaded receipts");
        grouped.insert(key, records);
    }
    Ok(grouped)
}
