use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::{REPORT_FILE_NAME, STATISTICS_FILE_NAME};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – source and chart settings
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Source");
    ui.separator();

    match &state.source {
        Some(path) => {
            ui.label(RichText::new(file_name(path)).strong());
            ui.label(RichText::new(path.display().to_string()).small().weak());
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }
    if ui.button("Open…").clicked() {
        open_file_dialog(state);
    }

    ui.add_space(8.0);
    ui.heading("Charts");
    ui.separator();

    let charts = &mut state.config.pipeline.charts;
    let mut changed = ui
        .add(egui::Slider::new(&mut charts.histogram_bins, 1..=100).text("Histogram bins"))
        .changed();

    let mut capped = charts.max_charts_per_kind.is_some();
    if ui.checkbox(&mut capped, "Limit charts per kind").changed() {
        charts.max_charts_per_kind = capped.then_some(10);
        changed = true;
    }
    if let Some(cap) = &mut charts.max_charts_per_kind {
        changed |= ui
            .add(egui::DragValue::new(cap).range(1..=500).prefix("max "))
            .changed();
    }

    if changed {
        state.replan_charts();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let loaded = state.report.is_some();
            ui.add_enabled_ui(loaded, |ui: &mut Ui| {
                if ui.button("Export statistics…").clicked() {
                    save_statistics_dialog(state);
                    ui.close_menu();
                }
                if ui.button("Export report (JSON)…").clicked() {
                    save_report_dialog(state);
                    ui.close_menu();
                }
            });
        });

        ui.separator();

        if state.loading {
            ui.spinner();
        }

        if let Some(report) = &state.report {
            let (rows, columns) = report.table.shape();
            ui.label(format!("{rows} rows × {columns} columns"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open data file")
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_statistics_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export descriptive statistics")
        .set_file_name(STATISTICS_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.save_statistics(&path);
    }
}

pub fn save_report_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export report")
        .set_file_name(REPORT_FILE_NAME)
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.save_report_json(&path);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
