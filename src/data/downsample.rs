use std::sync::Arc;

use super::model::TelemetryView;

// ---------------------------------------------------------------------------
// Downsampling for plotting
// ---------------------------------------------------------------------------

/// Reduce `view` to at most `max_rows` rows.
///
/// Views that already fit come back unchanged. Larger views keep exactly
/// `max_rows` rows at evenly spaced positions, always including the first
/// and the last row so the plotted span matches the selected range.
/// `max_rows == 1` keeps only the first row.
pub fn downsample(view: &TelemetryView, max_rows: usize) -> TelemetryView {
    let len = view.len();
    if len <= max_rows {
        return view.clone();
    }
    let rows = view.row_indices();
    let picked = match max_rows {
        0 => Vec::new(),
        1 => vec![rows[0]],
        n => {
            // round(i * (len - 1) / (n - 1)); the step is > 1 so positions
            // are strictly increasing.
            let span = len - 1;
            let denom = n - 1;
            (0..n)
                .map(|i| rows[(i * span + denom / 2) / denom])
                .collect()
        }
    };
    TelemetryView::new(Arc::clone(view.table()), picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_range, full_range};
    use crate::data::model::tests::table;
    use crate::data::model::TimeRange;

    #[test]
    fn small_views_are_returned_unchanged() {
        let t = table(100);
        let view = filter_range(&t, TimeRange::new(10.0, 40.0));
        assert_eq!(downsample(&view, 31), view);
        assert_eq!(downsample(&view, 1000), view);
    }

    #[test]
    fn large_views_keep_exactly_n_rows_with_endpoints() {
        let t = table(10_000);
        let view = full_range(&t);
        for n in [2, 3, 7, 999, 1000, 9_999] {
            let out = downsample(&view, n);
            assert_eq!(out.len(), n, "n = {n}");
            assert_eq!(out.first(), view.first());
            assert_eq!(out.last(), view.last());
            assert!(out.row_indices().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn spacing_is_even() {
        let t = table(1001);
        let out = downsample(&full_range(&t), 11);
        assert_eq!(
            out.row_indices(),
            &[0, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]
        );
    }

    #[test]
    fn works_on_filtered_views() {
        let t = table(10_000);
        let view = filter_range(&t, TimeRange::new(2_500.0, 7_499.0));
        let out = downsample(&view, 500);
        assert_eq!(out.len(), 500);
        assert_eq!(out.first().map(|r| r.time), Some(2_500.0));
        assert_eq!(out.last().map(|r| r.time), Some(7_499.0));
    }

    #[test]
    fn is_deterministic() {
        let t = table(5_000);
        let view = full_range(&t);
        assert_eq!(downsample(&view, 333), downsample(&view, 333));
    }

    #[test]
    fn degenerate_limits() {
        let t = table(10);
        let view = full_range(&t);
        assert!(downsample(&view, 0).is_empty());
        assert_eq!(downsample(&view, 1).row_indices(), &[0]);

        let empty = filter_range(&t, TimeRange::new(50.0, 60.0));
        assert!(downsample(&empty, 0).is_empty());
        assert!(downsample(&empty, 10).is_empty());
    }
}
