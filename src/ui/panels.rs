use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Column;
use crate::state::{AppState, ControlEvent};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Changes are pushed to `events`, never
/// applied in place.
pub fn side_panel(ui: &mut Ui, state: &AppState, events: &mut Vec<ControlEvent>) {
    ui.heading("Filter Options");
    ui.label("Adjust the time range and select metrics to display.");
    ui.separator();

    if let Some(notice) = empty_notice(state) {
        ui.label(notice);
        return;
    }
    let (Some(table), Some(bounds)) = (&state.table, state.time_bounds()) else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Time range ----
            ui.strong("Time range (seconds)");
            let mut start = state.selection.range.start;
            let mut end = state.selection.range.end;
            if ui
                .add(
                    egui::Slider::new(&mut start, bounds.start..=bounds.end)
                        .text("start")
                        .suffix(" s"),
                )
                .changed()
            {
                events.push(ControlEvent::SetRangeStart(start));
            }
            if ui
                .add(
                    egui::Slider::new(&mut end, bounds.start..=bounds.end)
                        .text("end")
                        .suffix(" s"),
                )
                .changed()
            {
                events.push(ControlEvent::SetRangeEnd(end));
            }
            if start > end {
                ui.label(RichText::new("Start is after end").color(Color32::YELLOW));
            }
            if ui.small_button("Full range").clicked() {
                events.push(ControlEvent::ResetRange);
            }
            ui.separator();

            // ---- Metric multi-select ----
            ui.strong("Metrics");
            for column in Column::METRICS {
                let mut checked = state.selection.metrics.contains(&column);
                let label = if table.all_zero(column) {
                    format!("{} (all zeros)", column.label())
                } else {
                    column.label()
                };
                let text = RichText::new(label).color(state.colors.color_for(column));
                if ui.checkbox(&mut checked, text).changed() {
                    events.push(ControlEvent::ToggleMetric(column));
                }
            }
        });
}

/// Why the filter widgets are hidden, if they are.
fn empty_notice(state: &AppState) -> Option<&'static str> {
    match &state.table {
        None => Some("No dataset loaded."),
        Some(table) if table.is_empty() => Some("File has no rows."),
        Some(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState, events: &mut Vec<ControlEvent>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = open_file_dialog() {
                    events.push(ControlEvent::OpenFile(path));
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                events.push(ControlEvent::Reload);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} rows loaded, {} in range, {} plotted",
                view.total_rows, view.filtered_rows, view.plotted_rows
            ));
        }

        if let Some(path) = &state.source {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open telemetry data")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::loader::tests::{sample_csv, HEADER};

    fn state_for(contents: Option<String>) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&DashboardConfig::default());
        if let Some(text) = contents {
            let path = dir.path().join("run.csv");
            std::fs::write(&path, text).unwrap();
            state.load(path);
        }
        (dir, state)
    }

    fn render_side_panel(state: &AppState) -> Vec<ControlEvent> {
        let ctx = egui::Context::default();
        let mut events = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::SidePanel::left("filter_panel").show(ctx, |ui| {
                side_panel(ui, state, &mut events);
            });
        });
        events
    }

    #[test]
    fn header_only_file_reports_no_rows() {
        let (_dir, state) = state_for(Some(format!("{HEADER}\n")));
        assert!(state.load_error.is_none());
        assert!(state.table.is_some());
        assert_eq!(empty_notice(&state), Some("File has no rows."));
        assert!(render_side_panel(&state).is_empty());
    }

    #[test]
    fn nothing_loaded_reports_no_dataset() {
        let (_dir, state) = state_for(None);
        assert_eq!(empty_notice(&state), Some("No dataset loaded."));
        assert!(render_side_panel(&state).is_empty());
    }

    #[test]
    fn loaded_table_shows_filters() {
        let (_dir, state) = state_for(Some(sample_csv(40)));
        assert_eq!(empty_notice(&state), None);
        assert!(render_side_panel(&state).is_empty());
    }
}
