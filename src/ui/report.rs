use std::mem::discriminant;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// Central panel – the report
// ---------------------------------------------------------------------------

/// Render the cached report section by section.
pub fn report_view(ui: &mut Ui, state: &mut AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to get started  (File → Open…, or drop it here)");
        });
        return;
    };

    let mut export_requested = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("1. Dataset Preview");
            tables::preview(ui, &report.table, state.config.preview_rows);
            ui.add_space(12.0);

            ui.heading("2. Basic Info");
            let (rows, columns) = report.table.shape();
            ui.label(format!("Number of Rows: {rows}"));
            ui.label(format!("Number of Columns: {columns}"));
            tables::column_info(ui, &report.table);
            ui.add_space(12.0);

            ui.heading("3. Descriptive Statistics");
            tables::statistics(ui, &report.summaries);
            ui.add_space(12.0);

            ui.heading("4. Visualizations");
            let mut previous = None;
            for (i, spec) in report.charts.iter().enumerate() {
                let group = discriminant(&spec.kind);
                if previous != Some(group) {
                    ui.label(RichText::new(plot::group_heading(spec.kind)).heading());
                    previous = Some(group);
                }
                let fill = state.chart_colors.get(i).copied().unwrap_or(Color32::LIGHT_BLUE);
                plot::chart(ui, report, spec, i, fill);
            }
            if report.charts.is_empty() {
                ui.label("No charts for this table.");
            }
            ui.add_space(12.0);

            ui.heading("5. Download Report");
            if ui.button("Download Descriptive Statistics as CSV").clicked() {
                export_requested = true;
            }
        });

    if export_requested {
        panels::save_statistics_dialog(state);
    }
}
