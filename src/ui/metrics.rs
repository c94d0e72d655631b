use eframe::egui::{RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::stats::Summary;
use crate::view::DashboardView;

// ---------------------------------------------------------------------------
// Headline callouts
// ---------------------------------------------------------------------------

/// Max Battery Power, average Speed and max Battery Voltage side by side.
pub fn callouts(ui: &mut Ui, view: &DashboardView) {
    ui.columns(view.callouts.len().max(1), |cols: &mut [Ui]| {
        for (ui, callout) in cols.iter_mut().zip(&view.callouts) {
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(callout.title()).weak());
                ui.label(RichText::new(callout.display_value()).size(26.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Per-metric summary table
// ---------------------------------------------------------------------------

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"))
}

/// One row per selected metric: max, average, min, sample count.
pub fn summary_table(ui: &mut Ui, view: &DashboardView) {
    if view.summaries.is_empty() {
        return;
    }
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(TableColumn::auto().at_least(160.0))
        .columns(TableColumn::auto().at_least(80.0), 4)
        .header(20.0, |mut header| {
            for title in ["Metric", "Max", "Average", "Min", "Samples"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (column, summary) in &view.summaries {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(column.label());
                    });
                    match summary {
                        Summary::NoData => {
                            row.col(|ui: &mut Ui| {
                                ui.label("no data");
                            });
                            for _ in 0..3 {
                                row.col(|ui: &mut Ui| {
                                    ui.label("–");
                                });
                            }
                        }
                        Summary::Stats { .. } => {
                            for text in [
                                cell(summary.max()),
                                cell(summary.average()),
                                cell(summary.min()),
                                summary.count().to_string(),
                            ] {
                                row.col(|ui: &mut Ui| {
                                    ui.label(text);
                                });
                            }
                        }
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_use_two_decimals() {
        assert_eq!(cell(Some(3.14159)), "3.14");
        assert_eq!(cell(None), "–");
    }
}
