use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RoutePyramidApp {
    pub state: AppState,
}

impl RoutePyramidApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// A file dropped on the window is treated like an upload.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        let Some(file) = dropped else {
            return;
        };
        if let Some(path) = &file.path {
            self.state.load_path(path);
        } else if let Some(bytes) = &file.bytes {
            self.state.load_bytes(bytes, &file.name);
        }
    }
}

impl Default for RoutePyramidApp {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl eframe::App for RoutePyramidApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: pyramid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::pyramid_plot(ui, &self.state);
        });
    }
}
