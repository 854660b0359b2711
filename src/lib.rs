//! Per-state campaign receipt reports.
//!
//! Loads `<STATE>-<Candidate>.csv` extracts, orders each group's receipts by
//! date, exports them to a workbook and charts each group's running total.

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod process;

use anyhow::Result;
use tracing::info;

pub use config::{Config, DatePrecision};
pub use error::PipelineError;

use process::{DataDir, SourceResolver};

/// Run the whole pipeline with files located under `config.data_dir`.
pub fn run(config: &Config) -> Result<()> {
    run_with(config, &DataDir::new(&config.data_dir))
}

/// Same as [`run`] with a caller supplied file resolver. Every group is
/// loaded before anything is written.
pub fn run_with(config: &Config, resolver: &dyn SourceResolver) -> Result<()> {
    config.validate()?;

    if let Some(archive) = &config.archive {
        fetch::ensure_extracted(archive, &config.extract_to, &config.data_dir)?;
    }

    info!("loading state receipts");
    let groups = process::load_all(config, resolver)?;

    let series = process::aggregate_all(&groups);
    export::draw_chart(&config.chart_file, &series, config.chart_size)?;

    export::write_workbook(&config.workbook_file, &config.columns, &groups)?;

    info!("all done");
    Ok(())
}
