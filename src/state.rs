use std::path::PathBuf;
use std::sync::Arc;

use crate::color::MetricColors;
use crate::config::DashboardConfig;
use crate::data::cache::TableCache;
use crate::data::model::{Column, TelemetryTable, TimeRange};
use crate::view::{DashboardView, Selection};

// ---------------------------------------------------------------------------
// Control events – everything a widget can ask for
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SetRangeStart(f64),
    SetRangeEnd(f64),
    ResetRange,
    ToggleMetric(Column),
    OpenFile(PathBuf),
    Reload,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded tables, kept for the whole session.
    pub cache: TableCache,

    /// File currently shown.
    pub source: Option<PathBuf>,

    /// Table of `source` (None until a file loads).
    pub table: Option<Arc<TelemetryTable>>,

    /// Current filter selection.
    pub selection: Selection,

    /// Pipeline output for `table` + `selection` (cached).
    pub view: Option<DashboardView>,

    /// Fatal load error shown instead of the dashboard.
    pub load_error: Option<String>,

    pub colors: MetricColors,

    max_points: usize,
    default_metrics: Vec<Column>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            cache: TableCache::new(),
            source: None,
            table: None,
            selection: Selection {
                range: TimeRange::new(0.0, 0.0),
                metrics: Default::default(),
            },
            view: None,
            load_error: None,
            colors: MetricColors::new(),
            max_points: config.max_points.max(1),
            default_metrics: config.default_columns(),
        }
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Time bounds of the loaded table.
    pub fn time_bounds(&self) -> Option<TimeRange> {
        self.table.as_ref().and_then(|t| t.time_bounds())
    }

    /// Load `path` through the cache and reset the selection.
    ///
    /// On failure the previous dashboard is dropped: a broken file never
    /// leaves stale charts on screen.
    pub fn load(&mut self, path: PathBuf) {
        match self.cache.get_or_load(&path) {
            Ok(table) => {
                log::info!(
                    "Showing {} rows from {}",
                    table.len(),
                    path.display()
                );
                self.selection = Selection::full(&table, self.default_metrics.iter().copied());
                self.table = Some(table);
                self.load_error = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.table = None;
                self.load_error = Some(format!("Error: {e}"));
            }
        }
        self.source = Some(path);
        self.recompute();
    }

    /// Apply one control event and recompute the dashboard.
    pub fn apply(&mut self, event: ControlEvent) {
        log::debug!("Control event: {event:?}");
        match event {
            ControlEvent::SetRangeStart(start) => {
                self.selection.range.start = start;
                self.clamp_range();
            }
            ControlEvent::SetRangeEnd(end) => {
                self.selection.range.end = end;
                self.clamp_range();
            }
            ControlEvent::ResetRange => {
                if let Some(bounds) = self.time_bounds() {
                    self.selection.range = bounds;
                }
            }
            ControlEvent::ToggleMetric(column) => {
                if !self.selection.metrics.remove(&column) {
                    self.selection.metrics.insert(column);
                }
            }
            ControlEvent::OpenFile(path) => return self.load(path),
            ControlEvent::Reload => {
                if let Some(path) = self.source.clone() {
                    self.cache.invalidate(&path);
                    return self.load(path);
                }
            }
        }
        self.recompute();
    }

    fn clamp_range(&mut self) {
        if let Some(bounds) = self.time_bounds() {
            self.selection.range = self.selection.range.clamped_to(bounds);
        }
    }

    /// Re-run the pipeline for the current table and selection.
    fn recompute(&mut self) {
        self.view = self
            .table
            .as_ref()
            .map(|t| DashboardView::build(t, &self.selection, self.max_points));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::sample_csv;

    fn loaded(rows: usize) -> (tempfile::TempDir, PathBuf, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        std::fs::write(&path, sample_csv(rows)).unwrap();
        let config = DashboardConfig {
            max_points: 50,
            ..DashboardConfig::default()
        };
        let mut state = AppState::new(&config);
        state.load(path.clone());
        (dir, path, state)
    }

    #[test]
    fn load_selects_full_range_and_default_metrics() {
        let (_dir, _path, state) = loaded(200);
        assert!(state.load_error.is_none());
        // sample_csv spaces rows 0.1 s apart
        let bounds = state.time_bounds().unwrap();
        assert_eq!(state.selection.range, bounds);
        assert_eq!(bounds.start, 0.0);
        assert!(state.selection.metrics.contains(&Column::BatteryPower));

        let view = state.view.as_ref().unwrap();
        assert_eq!(view.filtered_rows, 200);
        assert_eq!(view.plotted_rows, 50);
        assert_eq!(view.series.len(), 3);
    }

    #[test]
    fn range_events_are_clamped_to_the_data() {
        let (_dir, _path, mut state) = loaded(100);
        let bounds = state.time_bounds().unwrap();

        state.apply(ControlEvent::SetRangeStart(-50.0));
        state.apply(ControlEvent::SetRangeEnd(1e9));
        assert_eq!(state.selection.range, bounds);

        state.apply(ControlEvent::SetRangeStart(2.0));
        state.apply(ControlEvent::SetRangeEnd(4.0));
        let view = state.view.as_ref().unwrap();
        assert!(view.filtered_rows > 0 && view.filtered_rows < 100);

        state.apply(ControlEvent::ResetRange);
        assert_eq!(state.selection.range, bounds);
        assert_eq!(state.view.as_ref().unwrap().filtered_rows, 100);
    }

    #[test]
    fn inverted_range_shows_no_data() {
        let (_dir, _path, mut state) = loaded(100);
        state.apply(ControlEvent::SetRangeStart(8.0));
        state.apply(ControlEvent::SetRangeEnd(3.0));
        let view = state.view.as_ref().unwrap();
        assert!(view.is_empty());
        assert!(view.series.is_empty());
    }

    #[test]
    fn toggling_metrics_changes_series() {
        let (_dir, _path, mut state) = loaded(30);
        state.apply(ControlEvent::ToggleMetric(Column::Torque));
        assert!(state.selection.metrics.contains(&Column::Torque));
        assert_eq!(state.view.as_ref().unwrap().series.len(), 4);

        state.apply(ControlEvent::ToggleMetric(Column::Torque));
        state.apply(ControlEvent::ToggleMetric(Column::Speed));
        let columns: Vec<Column> = state
            .view
            .as_ref()
            .unwrap()
            .series
            .iter()
            .map(|s| s.column)
            .collect();
        assert_eq!(columns, vec![Column::BatteryVoltage, Column::BatteryPower]);
    }

    #[test]
    fn failed_load_clears_the_dashboard() {
        let (dir, _path, mut state) = loaded(30);
        assert!(state.view.is_some());

        state.apply(ControlEvent::OpenFile(dir.path().join("missing.csv")));
        assert!(state.table.is_none());
        assert!(state.view.is_none());
        assert!(state.load_error.as_deref().unwrap().contains("file not found"));
    }

    #[test]
    fn reload_picks_up_new_contents() {
        let (_dir, path, mut state) = loaded(30);
        std::fs::write(&path, sample_csv(45)).unwrap();
        state.apply(ControlEvent::Reload);
        assert_eq!(state.view.as_ref().unwrap().total_rows, 45);
        assert_eq!(state.cache.len(), 1);
    }
}
