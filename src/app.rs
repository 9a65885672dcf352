use std::path::PathBuf;

use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AutoAnalyzerApp {
    pub state: AppState,
}

impl AutoAnalyzerApp {
    /// Create the app, loading `initial_file` right away if given.
    pub fn new(config: AppConfig, initial_file: Option<PathBuf>) -> Self {
        let mut state = AppState::new(config);
        if let Some(path) = initial_file {
            state.load_path(&path);
        }
        Self { state }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let Some(file) = ctx.input(|i| i.raw.dropped_files.first().cloned()) else {
            return;
        };
        if let Some(bytes) = &file.bytes {
            self.state.ingest(bytes, PathBuf::from(&file.name));
        } else if let Some(path) = &file.path {
            self.state.load_path(path);
        }
    }
}

impl eframe::App for AutoAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: source and chart settings ----
        egui::SidePanel::left("settings_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: report ----
        egui::CentralPanel::default().show(ctx, |ui| {
            report::report_view(ui, &mut self.state);
        });
    }
}
