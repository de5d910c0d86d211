use std::path::Path;

use eframe::egui;
use route_pyramid::app::RoutePyramidApp;
use route_pyramid::config::ViewConfig;
use route_pyramid::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::new(ViewConfig::from_env());

    // Optional tick log to open on startup.
    if let Some(path) = std::env::args_os().nth(1) {
        state.load_path(Path::new(&path));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Route Pyramid",
        options,
        Box::new(|_cc| Ok(Box::new(RoutePyramidApp::new(state)))),
    )
}
