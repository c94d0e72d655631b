use eframe::egui;
use powerpedal_dashboard::app::PowerPedalApp;
use powerpedal_dashboard::config::DashboardConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load()?;
    log::info!(
        "Starting with {} (max {} points per chart)",
        config.data_path.display(),
        config.max_points
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PowerPedal Test Results Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(PowerPedalApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
