use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::AppState;
use crate::ui::metrics;
use crate::view::Series;

const CHART_HEIGHT: f32 = 300.0;

pub const PAGE_TITLE: &str = "PowerPedal Test Results Dashboard";
pub const PAGE_DESCRIPTION: &str =
    "Explore battery and rider performance metrics over time (seconds).";

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render callouts, the summary table and one chart per selected metric.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(err).color(Color32::RED));
        });
        return;
    }

    let view = match &state.view {
        Some(v) => v,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view telemetry  (File → Open…)");
            });
            return;
        }
    };

    ui.heading(PAGE_TITLE);
    ui.label(PAGE_DESCRIPTION);
    ui.add_space(8.0);

    metrics::callouts(ui, view);
    ui.separator();

    if view.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data in selected range");
        });
        return;
    }

    metrics::summary_table(ui, view);

    if !view.all_zero.is_empty() {
        let names: Vec<&str> = view.all_zero.iter().map(|c| c.name()).collect();
        ui.label(
            RichText::new(format!("{} is zero in every sample", names.join(", ")))
                .color(Color32::YELLOW),
        );
    }
    if view.series.is_empty() {
        ui.label("Select metrics in the sidebar to plot them.");
        return;
    }

    ui.add_space(8.0);
    ui.heading("Performance Graphs");

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for pair in view.series.chunks(2) {
                ui.columns(2, |cols: &mut [Ui]| {
                    for (ui, series) in cols.iter_mut().zip(pair) {
                        metric_plot(ui, state, series);
                    }
                });
                ui.add_space(8.0);
            }
        });
}

/// Line chart of one metric against Time.
fn metric_plot(ui: &mut Ui, state: &AppState, series: &Series) {
    let column = series.column;
    ui.strong(format!("{} vs. Time", column.name()));

    let points: PlotPoints = series.points.iter().copied().collect();
    let line = Line::new(points)
        .name(column.label())
        .color(state.colors.color_for(column))
        .width(1.5);

    Plot::new(column.name())
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Time (seconds)")
        .y_axis_label(column.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}
