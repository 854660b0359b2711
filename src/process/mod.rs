// src/process/mod.rs
pub mod cumulative;
pub mod date_parser;
pub mod load;
pub mod normalize;
pub mod record;

pub use cumulative::{aggregate_all, cumulative_series, DateTotals};
pub use load::{load_all, load_group, load_records, DataDir, SourceResolver};
pub use normalize::Normalizer;
pub use record::{GroupKey, GroupedRecords, GroupedSeries, NormalizedRecord, TimeSeriesPoint};
