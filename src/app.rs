use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::{AppState, ControlEvent};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PowerPedalApp {
    pub state: AppState,
}

impl PowerPedalApp {
    /// Build the app and load the configured telemetry file.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.load(config.data_path.clone());
        Self { state }
    }
}

impl eframe::App for PowerPedalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Widgets only read the state; their events are applied once the
        // frame is laid out, so every frame sees one consistent view.
        let mut events: Vec<ControlEvent> = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &mut events);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut events);
            });

        // ---- Central panel: callouts and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &self.state);
        });

        if !events.is_empty() {
            for event in events {
                self.state.apply(event);
            }
            ctx.request_repaint();
        }
    }
}
