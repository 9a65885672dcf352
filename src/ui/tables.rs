use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Table;
use crate::data::summary::ColumnSummaries;

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;

/// First `rows` rows of the table, with a row-index column.
pub fn preview(ui: &mut Ui, table: &Table, rows: usize) {
    let rows = rows.min(table.n_rows());
    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(TableColumn::auto())
            .columns(TableColumn::auto().at_least(60.0), table.n_columns())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|_ui| {});
                for column in table.columns() {
                    header.col(|ui| {
                        ui.strong(column.name());
                    });
                }
            })
            .body(|mut body| {
                for r in 0..rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.weak(r.to_string());
                        });
                        for column in table.columns() {
                            row.col(|ui| {
                                ui.label(column.cell(r).to_string());
                            });
                        }
                    });
                }
            });
    });
}

/// Per-column dtype and missing-value count.
pub fn column_info(ui: &mut Ui, table: &Table) {
    ui.push_id("column_info_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(TableColumn::auto().at_least(80.0), 3)
            .header(HEADER_HEIGHT, |mut header| {
                for title in ["column", "dtype", "missing"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for column in table.columns() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(column.name());
                        });
                        row.col(|ui| {
                            ui.label(column.dtype_name());
                        });
                        row.col(|ui| {
                            ui.label(column.missing().to_string());
                        });
                    });
                }
            });
    });
}

/// The describe-style table: statistics down, columns across.
pub fn statistics(ui: &mut Ui, summaries: &ColumnSummaries) {
    let rows = summaries.statistic_rows();
    ui.push_id("statistics_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(TableColumn::auto())
            .columns(TableColumn::auto().at_least(60.0), summaries.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|_ui| {});
                for summary in summaries {
                    header.col(|ui| {
                        ui.strong(summary.name.as_str());
                    });
                }
            })
            .body(|mut body| {
                for stat in rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.strong(stat.label());
                        });
                        for summary in summaries {
                            row.col(|ui| match summary.statistic(stat) {
                                Some(value) => {
                                    ui.label(value);
                                }
                                None => {
                                    ui.weak("NaN");
                                }
                            });
                        }
                    });
                }
            });
    });
}
