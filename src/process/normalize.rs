use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::config::DatePrecision;
use crate::error::{PipelineError, Result};
use crate::process::{
    date_parser,
    record::{NormalizedRecord, RawRow, RECEIPT_AMOUNT, RECEIPT_DATE},
};

/// Turns raw CSV rows into [`NormalizedRecord`]s.
pub struct Normalizer<'a> {
    columns: &'a [String],
    min_amount: Option<f64>,
    precision: DatePrecision,
}

impl<'a> Normalizer<'a> {
    pub fn new(columns: &'a [String], min_amount: Option<f64>, precision: DatePrecision) -> Self {
        Self {
            columns,
            min_amount,
            precision,
        }
    }

    /// Returns `Ok(None)` when the row falls below the minimum amount.
    pub fn normalize(&self, row: &RawRow) -> Result<Option<NormalizedRecord>> {
        let amount = parse_amount(row.get(RECEIPT_AMOUNT).map(String::as_str))?;
        if let Some(min) = self.min_amount {
            if amount < min {
                return Ok(None);
            }
        }

        let fields: IndexMap<String, Option<String>> = self
            .columns
            .iter()
            .map(|column| (column.clone(), row.get(column).cloned()))
            .collect();

        let raw_date = row.get(RECEIPT_DATE).map(String::as_str).unwrap_or("");
        let date = self.parse_date(raw_date)?;

        Ok(Some(NormalizedRecord {
            fields,
            date,
            amount,
        }))
    }

    fn parse_date(&self, s: &str) -> Result<NaiveDateTime> {
        match self.precision {
            DatePrecision::Day => date_parser::parse_date(s),
            DatePrecision::Minute => date_parser::parse_datetime(s),
        }
    }
}

/// Absent or blank amounts count as zero.
fn parse_amount(raw: Option<&str>) -> Result<f64> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(0.0);
    };
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PipelineError::Conversion {
            column: RECEIPT_AMOUNT.to_string(),
            value: s.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::record::DEFAULT_COLUMNS;

    fn columns() -> Vec<String> {
        DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_copies_columns_and_parses_date() {
        let cols = columns();
        let n = Normalizer::new(&cols, None, DatePrecision::Minute);
        let rec = n
            .normalize(&row(&[
                (RECEIPT_DATE, "3/1/20 8:15"),
                ("entity_type_desc", "INDIVIDUAL"),
                ("contributor_zip", "30301"),
                ("contributor_employer", "SELF"),
                ("contributor_occupation", "WRITER"),
                (RECEIPT_AMOUNT, "25.50"),
                ("memo_text", "ignored"),
            ]))
            .unwrap()
            .unwrap();

        assert_eq!(rec.get("contributor_zip"), Some("30301"));
        assert_eq!(rec.get(RECEIPT_DATE), Some("3/1/20 8:15"));
        assert_eq!(rec.amount, 25.5);
        assert_eq!(rec.fields.len(), 6);
        assert!(rec.get("memo_text").is_none());
        assert_eq!(
            rec.date,
            date_parser::parse_datetime("3/1/20 8:15").unwrap()
        );
    }

    #[test]
    fn test_missing_column_is_absent_not_error() {
        let cols = columns();
        let n = Normalizer::new(&cols, None, DatePrecision::Day);
        let rec = n
            .normalize(&row(&[(RECEIPT_DATE, "3/1/20"), (RECEIPT_AMOUNT, "10")]))
            .unwrap()
            .unwrap();
        assert_eq!(rec.fields.get("contributor_employer"), Some(&None));
        assert_eq!(rec.get("contributor_employer"), None);
    }

    #[test]
    fn test_threshold_filters_smaller_amounts() {
        let cols = columns();
        let n = Normalizer::new(&cols, Some(200.0), DatePrecision::Day);
        let kept: Vec<f64> = ["150", "250", "300", "200"]
            .iter()
            .filter_map(|amt| {
                n.normalize(&row(&[(RECEIPT_DATE, "1/5/20"), (RECEIPT_AMOUNT, *amt)]))
                    .unwrap()
            })
            .map(|r| r.amount)
            .collect();
        assert_eq!(kept, vec![250.0, 300.0, 200.0]);
    }

    #[test]
    fn test_blank_amount_counts_as_zero() {
        let cols = columns();
        let open = Normalizer::new(&cols, None, DatePrecision::Day);
        let rec = open
            .normalize(&row(&[(RECEIPT_DATE, "1/5/20"), (RECEIPT_AMOUNT, "")]))
            .unwrap()
            .unwrap();
        assert_eq!(rec.amount, 0.0);

        let zero = Normalizer::new(&cols, Some(0.0), DatePrecision::Day);
        assert!(zero
            .normalize(&row(&[(RECEIPT_DATE, "1/5/20")]))
            .unwrap()
            .is_some());

        let positive = Normalizer::new(&cols, Some(1.0), DatePrecision::Day);
        assert!(positive
            .normalize(&row(&[(RECEIPT_DATE, "1/5/20")]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_bad_amount_is_conversion_error() {
        let cols = columns();
        let n = Normalizer::new(&cols, None, DatePrecision::Day);
        let err = n
            .normalize(&row(&[(RECEIPT_DATE, "1/5/20"), (RECEIPT_AMOUNT, "12abc")]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Conversion { .. }));
    }

    #[test]
    fn test_bad_date_is_format_error() {
        let cols = columns();
        let n = Normalizer::new(&cols, None, DatePrecision::Day);
        let err = n
            .normalize(&row(&[(RECEIPT_DATE, "2020-01-05"), (RECEIPT_AMOUNT, "5")]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Format { .. }));

        let err = n.normalize(&row(&[(RECEIPT_AMOUNT, "5")])).unwrap_err();
        assert!(matches!(err, PipelineError::Format { .. }));
    }

    #[test]
    fn test_day_precision_truncates_time() {
        let cols = columns();
        let n = Normalizer::new(&cols, None, DatePrecision::Day);
        let rec = n
            .normalize(&row(&[(RECEIPT_DATE, "6/9/20 17:42")]))
            .unwrap()
            .unwrap();
        assert_eq!(rec.date, date_parser::parse_datetime("6/9/20").unwrap());
    }
}
