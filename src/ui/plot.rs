use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Plot, PlotPoint, PlotPoints, Points, Polygon,
    Text,
};

use crate::color;
use crate::data::charts::{box_summary, histogram, ChartKind, ChartSpec};
use crate::data::correlation::CorrelationMatrix;
use crate::data::pipeline::Report;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Render one planned chart from the cached report.
pub fn chart(ui: &mut Ui, report: &Report, spec: &ChartSpec, index: usize, fill: Color32) {
    ui.label(RichText::new(&spec.title).strong().size(15.0));

    let Some(column) = spec.columns.first().map(String::as_str) else {
        return;
    };

    match spec.kind {
        ChartKind::Heatmap => match &report.correlation {
            Some(matrix) => heatmap(ui, matrix, index),
            None => {
                ui.label("Not enough numeric columns to correlate.");
            }
        },
        ChartKind::Histogram { bins } => histogram_chart(ui, report, column, bins, index, fill),
        ChartKind::Boxplot => box_chart(ui, report, column, index, fill),
        ChartKind::Bar => bar_chart(ui, report, column, index, fill),
    }
    ui.add_space(12.0);
}

/// Section heading for the group a chart kind belongs to.
pub fn group_heading(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Heatmap => "Correlation Heatmap",
        ChartKind::Histogram { .. } => "Histograms of Numerical Features",
        ChartKind::Boxplot => "Boxplots of Numerical Features",
        ChartKind::Bar => "Bar Charts of Categorical Features",
    }
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix, index: usize) {
    let n = matrix.len();
    let height = CHART_HEIGHT.max(36.0 * n as f32 + 80.0);

    Plot::new(("chart", index))
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for i in 0..n {
                for j in 0..n {
                    // Row 0 at the top.
                    let (x, y) = (j as f64, (n - 1 - i) as f64);
                    let value = matrix.get(i, j);
                    let cell = Polygon::new(PlotPoints::from(vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ]))
                    .fill_color(value.map_or(color::UNDEFINED, color::diverging))
                    .stroke(Stroke::new(1.0, Color32::WHITE));
                    plot_ui.polygon(cell);

                    let label = value.map_or_else(|| "NaN".to_string(), |v| format!("{v:.2}"));
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(label).color(Color32::BLACK),
                    ));
                }
            }

            for (k, label) in matrix.labels().iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(k as f64, -0.6), label.as_str())
                        .anchor(Align2::CENTER_TOP),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(-0.6, (n - 1 - k) as f64), label.as_str())
                        .anchor(Align2::RIGHT_CENTER),
                );
            }
        });
}

fn histogram_chart(
    ui: &mut Ui,
    report: &Report,
    column: &str,
    bins: usize,
    index: usize,
    fill: Color32,
) {
    let Some(values) = report.table.column(column).and_then(|c| c.numeric_values()) else {
        return;
    };

    let bars: Vec<Bar> = histogram(values, bins)
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.3} to {:.3}", bin.start, bin.end))
        })
        .collect();

    Plot::new(("chart", index))
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .x_axis_label(column)
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(fill).name(column));
        });
}

fn box_chart(ui: &mut Ui, report: &Report, column: &str, index: usize, fill: Color32) {
    let summary = report
        .table
        .column(column)
        .and_then(|c| c.numeric_values())
        .and_then(box_summary);
    let Some(summary) = summary else {
        ui.label("No values to plot.");
        return;
    };

    let spread = BoxSpread::new(
        summary.lower_whisker,
        summary.q1,
        summary.median,
        summary.q3,
        summary.upper_whisker,
    );
    let elem = BoxElem::new(0.0, spread)
        .name(column)
        .box_width(0.5)
        .whisker_width(0.3)
        .fill(fill.gamma_multiply(0.4))
        .stroke(Stroke::new(1.5, fill));

    let outliers: Vec<[f64; 2]> = summary.outliers.iter().map(|&v| [0.0, v]).collect();

    Plot::new(("chart", index))
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .y_axis_label(column)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name(column));
            if !outliers.is_empty() {
                plot_ui.points(Points::new(PlotPoints::from(outliers)).radius(3.0).color(fill));
            }
        });
}

fn bar_chart(ui: &mut Ui, report: &Report, column: &str, index: usize, fill: Color32) {
    let Some(stats) = report.summaries.get(column).and_then(|s| s.categorical()) else {
        return;
    };
    if stats.frequencies.is_empty() {
        ui.label("No values to plot.");
        return;
    }

    let bars: Vec<Bar> = stats
        .frequencies
        .iter()
        .enumerate()
        .map(|(i, vc)| Bar::new(i as f64, vc.count as f64).width(0.7).name(&vc.value))
        .collect();

    Plot::new(("chart", index))
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .x_axis_label(column)
        .y_axis_label("Count")
        .show_x(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(fill).name(column));
            for (i, vc) in stats.frequencies.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, 0.0), vc.value.as_str())
                        .anchor(Align2::CENTER_TOP),
                );
            }
        });
}
