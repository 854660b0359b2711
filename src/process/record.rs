use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::{collections::HashMap, fmt};

pub const RECEIPT_DATE: &str = "contribution_receipt_date";
pub const RECEIPT_AMOUNT: &str = "contribution_receipt_amount";

/// The six columns every input extract carries, in export order.
pub const DEFAULT_COLUMNS: [&str; 6] = [
    RECEIPT_DATE,
    "entity_type_desc",
    "contributor_zip",
    "contributor_employer",
    "contributor_occupation",
    RECEIPT_AMOUNT,
];

/// One CSV line keyed by header name.
pub type RawRow = HashMap<String, String>;

/// A (candidate, state) partition of the dataset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub candidate: String,
    pub state: String,
}

impl GroupKey {
    pub fn new(candidate: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            state: state.into(),
        }
    }

    /// Worksheet title, e.g. `"GA for Biden"`.
    pub fn sheet_name(&self) -> String {
        format!("{} for {}", self.state, self.candidate)
    }

    /// Chart legend label, e.g. `"Biden GA"`.
    pub fn series_label(&self) -> String {
        format!("{} {}", self.candidate, self.state)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sheet_name())
    }
}

/// A contribution with the configured columns copied verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRecord {
    /// Column name → raw value, in configured column order. `None` when the
    /// input file has no such column.
    pub fields: IndexMap<String, Option<String>>,
    /// Parsed receipt date.
    pub date: NaiveDateTime,
    /// Receipt amount, zero when the field is absent or empty.
    pub amount: f64,
}

impl NormalizedRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|v| v.as_deref())
    }
}

/// Cumulative receipts as of `date`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSeriesPoint {
    pub date: NaiveDateTime,
    pub total: f64,
}

/// Ordered records for every group, in load order.
pub type GroupedRecords = IndexMap<GroupKey, Vec<NormalizedRecord>>;

/// Cumulative series for every group, in load order.
pub type GroupedSeries = IndexMap<GroupKey, Vec<TimeSeriesPoint>>;
