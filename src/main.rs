mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::AirQualityApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Without data there is nothing to show: fail before any window opens.
    let dataset = data::loader::dataset()
        .inspect_err(|e| {
            log::error!("Failed to load dataset: {e}");
            if e.is_not_found() {
                log::error!("Generate a sample with `cargo run --bin generate_sample`");
            }
        })
        .with_context(|| format!("loading {}", config::DATA_PATH))?;

    if dataset.is_empty() {
        log::warn!("{} contains no observations", config::DATA_PATH);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config::WINDOW_SIZE)
            .with_min_inner_size(config::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    log::info!("Starting dashboard with {} observations", dataset.len());
    eframe::run_native(
        config::APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(AirQualityApp::new(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
