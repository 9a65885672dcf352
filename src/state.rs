use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui::Color32;

use crate::color::generate_palette;
use crate::config::AppConfig;
use crate::data::export::export_report_json;
use crate::data::pipeline::Report;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The pipeline runs once per opened file; everything the window draws is
/// read from the cached `report`.
pub struct AppState {
    pub config: AppConfig,

    /// Result for the current file (None until a file loads successfully).
    pub report: Option<Report>,

    /// Where the current report came from.
    pub source: Option<PathBuf>,

    /// One fill colour per planned chart.
    pub chart_colors: Vec<Color32>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            report: None,
            source: None,
            chart_colors: Vec::new(),
            status_message: None,
            loading: false,
        }
    }

    /// Read a file from disk and run the pipeline on it.
    pub fn load_path(&mut self, path: &Path) {
        self.loading = true;
        match std::fs::read(path).with_context(|| format!("reading {}", path.display())) {
            Ok(bytes) => self.ingest(&bytes, path.to_path_buf()),
            Err(e) => self.fail(e),
        }
    }

    /// Run the pipeline on raw bytes. On failure the previous report is kept
    /// and the error is shown.
    pub fn ingest(&mut self, bytes: &[u8], source: PathBuf) {
        match Report::build(bytes, &self.config.pipeline)
            .with_context(|| format!("analysing {}", source.display()))
        {
            Ok(report) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    report.table.n_rows(),
                    report.table.column_names()
                );
                self.set_report(report, source);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Ingest a newly built report.
    pub fn set_report(&mut self, report: Report, source: PathBuf) {
        self.chart_colors = generate_palette(report.charts.len());
        self.report = Some(report);
        self.source = Some(source);
        self.status_message = None;
        self.loading = false;
    }

    /// Re-plan charts after the chart options changed.
    pub fn replan_charts(&mut self) {
        if let Some(report) = &mut self.report {
            report.replan_charts(&self.config.pipeline.charts);
            self.chart_colors = generate_palette(report.charts.len());
        }
    }

    pub fn save_statistics(&mut self, path: &Path) {
        let result = self.write_export(path, |report| Ok(report.export_statistics()?));
        self.report_export(result, path);
    }

    pub fn save_report_json(&mut self, path: &Path) {
        let result = self.write_export(path, |report| Ok(export_report_json(report)?));
        self.report_export(result, path);
    }

    fn write_export(
        &self,
        path: &Path,
        render: impl FnOnce(&Report) -> Result<Vec<u8>>,
    ) -> Result<()> {
        let report = self.report.as_ref().context("no dataset loaded")?;
        let bytes = render(report)?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
    }

    fn report_export(&mut self, result: Result<()>, path: &Path) {
        match result {
            Ok(()) => {
                log::info!("Exported {}", path.display());
                self.status_message = None;
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, e: anyhow::Error) {
        log::error!("{e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
        self.loading = false;
    }
}
