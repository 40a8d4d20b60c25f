// Resource Timeline demo
// Main entry point

use anyhow::{anyhow, Result};
use resource_timeline::services::settings::ConfigService;
use resource_timeline::ui_egui::TimelineApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Resource Timeline demo");

    let config_service = match std::env::args().nth(1) {
        Some(path) => ConfigService::new(path),
        None => ConfigService::from_default_location(),
    };
    log::info!("Using config file {}", config_service.path().display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Resource Timeline")
            .with_inner_size([1200.0, 720.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Resource Timeline",
        options,
        Box::new(|cc| Ok(Box::new(TimelineApp::new(cc, config_service)))),
    )
    .map_err(|err| anyhow!("Failed to run the timeline window: {}", err))
}
