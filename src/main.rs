#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use timeline_board::app::TimelineApp;
use timeline_board::config::AppPaths;
use timeline_board::logging;
use tracing::info;

fn main() -> eframe::Result<()> {
    let paths = AppPaths::resolve();
    if let Err(e) = logging::init(&paths.log_file()) {
        eprintln!("Logging disabled: {e}");
    }
    info!(data_dir = %paths.data_dir.display(), "Starting Timeline Board");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Timeline Board"),
        ..Default::default()
    };

    eframe::run_native(
        "Timeline Board",
        options,
        Box::new(|cc| Ok(Box::new(TimelineApp::new(cc, paths)))),
    )
}
