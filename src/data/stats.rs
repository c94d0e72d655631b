use super::error::StatsError;
use super::model::{Column, TelemetryView};

// ---------------------------------------------------------------------------
// Summary statistics over one column of a view
// ---------------------------------------------------------------------------

/// Result of aggregating a column. `NoData` is the defined outcome for an
/// empty view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Summary {
    NoData,
    Stats {
        max: f64,
        average: f64,
        min: f64,
        count: usize,
    },
}

impl Summary {
    pub fn max(&self) -> Option<f64> {
        match self {
            Summary::Stats { max, .. } => Some(*max),
            Summary::NoData => None,
        }
    }

    pub fn average(&self) -> Option<f64> {
        match self {
            Summary::Stats { average, .. } => Some(*average),
            Summary::NoData => None,
        }
    }

    pub fn min(&self) -> Option<f64> {
        match self {
            Summary::Stats { min, .. } => Some(*min),
            Summary::NoData => None,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Summary::Stats { count, .. } => *count,
            Summary::NoData => 0,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Summary::NoData)
    }
}

/// Aggregate a column given by its exact header name.
pub fn summarize(view: &TelemetryView, column_name: &str) -> Result<Summary, StatsError> {
    let column = Column::from_name(column_name)
        .ok_or_else(|| StatsError::UnknownColumn(column_name.to_string()))?;
    if !column.is_numeric() {
        return Err(StatsError::NotNumeric(column_name.to_string()));
    }
    Ok(summarize_column(view, column))
}

/// Aggregate a numeric column. Error Code has no numeric values and always
/// yields `NoData`.
pub fn summarize_column(view: &TelemetryView, column: Column) -> Summary {
    let mut count = 0usize;
    let mut mean = 0.0f64;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    // Running mean with each term scaled first; a plain sum (or `v - mean`)
    // overflows for values near f64::MAX.
    for v in view.column(column) {
        count += 1;
        let n = count as f64;
        mean += v / n - mean / n;
        max = max.max(v);
        min = min.min(v);
    }
    if count == 0 {
        return Summary::NoData;
    }
    // Rounding can push the mean a hair past the extremes of a constant column.
    let average = mean.clamp(min, max);
    Summary::Stats {
        max,
        average,
        min,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_range, full_range};
    use crate::data::model::tests::{record, table};
    use crate::data::model::{TelemetryTable, TimeRange};
    use std::sync::Arc;

    #[test]
    fn max_and_average() {
        let t = Arc::new(
            TelemetryTable::new(vec![record(0.0, 100.0), record(1.0, 300.0), record(2.0, 200.0)])
                .unwrap(),
        );
        let s = summarize(&full_range(&t), "Battery Power").unwrap();
        assert_eq!(s.max(), Some(300.0));
        assert_eq!(s.average(), Some(200.0));
        assert_eq!(s.min(), Some(100.0));
        assert_eq!(s.count(), 3);
    }

    #[test]
    fn max_is_never_below_average() {
        let t = table(2_000);
        for column in Column::METRICS {
            for range in [
                TimeRange::new(0.0, 1_999.0),
                TimeRange::new(13.0, 14.0),
                TimeRange::new(500.0, 500.0),
            ] {
                let s = summarize_column(&filter_range(&t, range), column);
                let (max, avg) = (s.max().unwrap(), s.average().unwrap());
                assert!(max >= avg, "{column}: max {max} < average {avg}");
            }
        }
    }

    #[test]
    fn constant_column_average_equals_value() {
        let values = [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1];
        let records = values
            .iter()
            .enumerate()
            .map(|(i, &p)| record(i as f64, p))
            .collect();
        let t = Arc::new(TelemetryTable::new(records).unwrap());
        let s = summarize_column(&full_range(&t), Column::BatteryPower);
        assert_eq!(s.max(), Some(0.1));
        assert!(s.max().unwrap() >= s.average().unwrap());
    }

    #[test]
    fn average_of_huge_values_does_not_overflow() {
        let powers = [1.7e308, 1.7e308, -1.7e308, -1.7e308];
        let records = powers
            .iter()
            .enumerate()
            .map(|(i, &p)| record(i as f64, p))
            .collect();
        let t = Arc::new(TelemetryTable::new(records).unwrap());
        let s = summarize_column(&full_range(&t), Column::BatteryPower);
        assert_eq!(s.max(), Some(1.7e308));
        assert_eq!(s.min(), Some(-1.7e308));
        let avg = s.average().unwrap();
        assert!(avg.is_finite());
        assert!(avg.abs() < 1e300, "average {avg}");
    }

    #[test]
    fn empty_view_is_no_data() {
        let t = table(10);
        let empty = filter_range(&t, TimeRange::new(100.0, 200.0));
        let s = summarize(&empty, "Battery Power").unwrap();
        assert!(s.is_no_data());
        assert_eq!(s.max(), None);
        assert_eq!(s.average(), None);
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn caller_errors() {
        let t = table(10);
        let view = full_range(&t);
        assert_eq!(
            summarize(&view, "Power"),
            Err(StatsError::UnknownColumn("Power".into()))
        );
        assert_eq!(
            summarize(&view, "Error Code"),
            Err(StatsError::NotNumeric("Error Code".into()))
        );
    }

    #[test]
    fn zero_columns_summarise_to_zero() {
        let t = table(10);
        let s = summarize_column(&full_range(&t), Column::Speed);
        assert_eq!(s.max(), Some(0.0));
        assert_eq!(s.average(), Some(0.0));
    }
}
