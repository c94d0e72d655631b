use std::sync::Arc;

use super::model::{TelemetryTable, TelemetryView, TimeRange};

// ---------------------------------------------------------------------------
// Range filter: rows whose Time lies in a closed interval
// ---------------------------------------------------------------------------

/// Every row of the table, in order.
pub fn full_range(table: &Arc<TelemetryTable>) -> TelemetryView {
    TelemetryView::new(Arc::clone(table), (0..table.len()).collect())
}

/// Rows with `range.start <= Time <= range.end`, order preserved.
///
/// An inverted or NaN range selects nothing; that is an empty view, not an
/// error. Time is sorted, so both ends are found by binary search.
pub fn filter_range(table: &Arc<TelemetryTable>, range: TimeRange) -> TelemetryView {
    if !range.is_valid() {
        return TelemetryView::new(Arc::clone(table), Vec::new());
    }
    let records = table.records();
    let lo = records.partition_point(|r| r.time < range.start);
    let hi = records.partition_point(|r| r.time <= range.end);
    TelemetryView::new(Arc::clone(table), (lo..hi.max(lo)).collect())
}
