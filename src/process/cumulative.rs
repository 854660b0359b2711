use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::process::record::{GroupedRecords, GroupedSeries, NormalizedRecord, TimeSeriesPoint};

/// Insertion-ordered date → running total map.
///
/// Writing an existing date overwrites its total but keeps its position,
/// so the emitted series follows the order dates were first seen.
#[derive(Debug, Default)]
pub struct DateTotals {
    totals: IndexMap<NaiveDateTime, f64>,
}

impl DateTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, date: NaiveDateTime, total: f64) {
        self.totals.insert(date, total);
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn into_points(self) -> Vec<TimeSeriesPoint> {
        self.totals
            .into_iter()
            .map(|(date, total)| TimeSeriesPoint { date, total })
            .collect()
    }
}

/// Running total of `records` (already sorted by date), one point per
/// distinct date carrying the total after that date's last record.
///
/// Each record adds its own amount. Negative amounts (refunds) are applied
/// as-is, so the total may go down.
pub fn cumulative_series(records: &[NormalizedRecord]) -> Vec<TimeSeriesPoint> {
    let mut totals = DateTotals::new();
    let mut running = 0.0;
    for record in records {
        running += record.amount;
        totals.record(record.date, running);
    }
    totals.into_points()
}

pub fn aggregate_all(groups: &GroupedRecords) -> GroupedSeries {
    groups
        .iter()
        .map(|(key, records)| (key.clone(), cumulative_series(records)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{date_parser::parse_datetime, record::GroupKey};

    fn rec(date: &str, amount: f64) -> NormalizedRecord {
        NormalizedRecord {
            fields: IndexMap::new(),
            date: parse_datetime(date).unwrap(),
            amount,
        }
    }

    fn totals(points: &[TimeSeriesPoint]) -> Vec<f64> {
        points.iter().map(|p| p.total).collect()
    }

    #[test]
    fn test_same_date_collapses_to_final_total() {
        let points = cumulative_series(&[rec("5/1/20", 100.0), rec("5/1/20", 50.0)]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, parse_datetime("5/1/20").unwrap());
        assert_eq!(points[0].total, 150.0);
    }

    #[test]
    fn test_uses_each_records_own_amount() {
        let points = cumulative_series(&[
            rec("5/1/20", 10.0),
            rec("5/2/20", 20.0),
            rec("5/2/20", 5.0),
            rec("5/4/20", 1.0),
        ]);
        assert_eq!(totals(&points), vec![10.0, 35.0, 36.0]);
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_non_negative_amounts_never_decrease() {
        let records: Vec<_> = (1..=28)
            .map(|d| rec(&format!("2/{}/20", d), (d % 5) as f64 * 12.5))
            .collect();
        let points = cumulative_series(&records);
        assert_eq!(points.len(), 28);
        assert!(points.windows(2).all(|w| w[0].total <= w[1].total));
    }

    #[test]
    fn test_refund_lowers_total() {
        let points = cumulative_series(&[rec("5/1/20", 100.0), rec("5/2/20", -40.0)]);
        assert_eq!(totals(&points), vec![100.0, 60.0]);
    }

    #[test]
    fn test_zero_amount_still_emits_point() {
        let points = cumulative_series(&[rec("5/1/20", 0.0)]);
        assert_eq!(totals(&points), vec![0.0]);
        assert!(cumulative_series(&[]).is_empty());
    }

    #[test]
    fn test_date_totals_keeps_first_position() {
        let a = parse_datetime("1/1/20").unwrap();
        let b = parse_datetime("1/2/20").unwrap();
        let mut t = DateTotals::new();
        t.record(a, 1.0);
        t.record(b, 2.0);
        t.record(a, 3.0);
        assert_eq!(t.len(), 2);
        let points = t.into_points();
        assert_eq!(points[0], TimeSeriesPoint { date: a, total: 3.0 });
        assert_eq!(points[1], TimeSeriesPoint { date: b, total: 2.0 });
    }

    #[test]
    fn test_aggregate_all_preserves_group_order() {
        let mut groups = GroupedRecords::new();
        groups.insert(GroupKey::new("Trump", "GA"), vec![rec("1/1/20", 5.0)]);
        groups.insert(GroupKey::new("Biden", "GA"), vec![]);
        let series = aggregate_all(&groups);
        let labels: Vec<String> = series.keys().map(GroupKey::series_label).collect();
        assert_eq!(labels, vec!["Trump GA", "Biden GA"]);
        assert!(series[1].is_empty());
    }
}
