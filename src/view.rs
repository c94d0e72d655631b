use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::downsample::downsample;
use crate::data::filter::filter_range;
use crate::data::model::{Column, TelemetryTable, TimeRange};
use crate::data::stats::{Summary, summarize_column};

// ---------------------------------------------------------------------------
// Selection – the only UI state besides the loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub range: TimeRange,
    pub metrics: BTreeSet<Column>,
}

impl Selection {
    /// Full time span of `table` with the given metrics checked.
    pub fn full(table: &TelemetryTable, metrics: impl IntoIterator<Item = Column>) -> Self {
        Selection {
            range: table
                .time_bounds()
                .unwrap_or_else(|| TimeRange::new(0.0, 0.0)),
            metrics: metrics.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Callouts – headline numbers above the charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Max,
    Average,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    pub column: Column,
    pub statistic: Statistic,
    /// `None` when the range holds no rows.
    pub value: Option<f64>,
}

impl Callout {
    /// The three headline figures shown on every dashboard.
    pub const LAYOUT: [(Column, Statistic); 3] = [
        (Column::BatteryPower, Statistic::Max),
        (Column::Speed, Statistic::Average),
        (Column::BatteryVoltage, Statistic::Max),
    ];

    pub fn title(&self) -> String {
        let prefix = match self.statistic {
            Statistic::Max => "Max",
            Statistic::Average => "Average",
        };
        format!("{prefix} {}", self.column.name())
    }

    pub fn display_value(&self) -> String {
        match self.value {
            Some(v) => format!("{v:.2} {}", self.column.unit()),
            None => "no data".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardView – everything one frame needs
// ---------------------------------------------------------------------------

/// One plotted line: `[time, value]` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub column: Column,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub plotted_rows: usize,
    pub callouts: Vec<Callout>,
    /// Per selected metric, computed over every row in range.
    pub summaries: Vec<(Column, Summary)>,
    /// Per selected metric, downsampled for drawing.
    pub series: Vec<Series>,
    /// Selected metrics that are zero throughout the file.
    pub all_zero: Vec<Column>,
}

impl DashboardView {
    /// Run filter → downsample → aggregate for the current selection.
    ///
    /// Pure: the same table and selection always give the same view.
    /// Statistics use the filtered rows so extremes are never lost to
    /// downsampling.
    pub fn build(table: &Arc<TelemetryTable>, selection: &Selection, max_points: usize) -> Self {
        let filtered = filter_range(table, selection.range);
        let plotted = downsample(&filtered, max_points);

        let callouts = Callout::LAYOUT
            .iter()
            .map(|&(column, statistic)| {
                let summary = summarize_column(&filtered, column);
                let value = match statistic {
                    Statistic::Max => summary.max(),
                    Statistic::Average => summary.average(),
                };
                Callout {
                    column,
                    statistic,
                    value,
                }
            })
            .collect();

        let summaries = selection
            .metrics
            .iter()
            .map(|&c| (c, summarize_column(&filtered, c)))
            .collect();

        let series = if plotted.is_empty() {
            Vec::new()
        } else {
            selection
                .metrics
                .iter()
                .map(|&column| Series {
                    column,
                    points: plotted.points(column),
                })
                .collect()
        };

        let all_zero = selection
            .metrics
            .iter()
            .copied()
            .filter(|&c| table.all_zero(c))
            .collect();

        DashboardView {
            total_rows: table.len(),
            filtered_rows: filtered.len(),
            plotted_rows: plotted.len(),
            callouts,
            summaries,
            series,
            all_zero,
        }
    }

    /// No rows fall in the selected range.
    pub fn is_empty(&self) -> bool {
        self.filtered_rows == 0
    }
}
