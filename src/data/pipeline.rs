use serde::{Deserialize, Serialize};

use super::charts::{plan_charts, plan_charts_with, ChartOptions, ChartSpec};
use super::correlation::{correlate, CorrelationMatrix};
use super::error::{ReportError, Result};
use super::export::export_statistics;
use super::loader::{load, load_delimited};
use super::model::Table;
use super::summary::{summarize, ColumnSummaries};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Field delimiter; must be a single ASCII character.
    pub delimiter: char,
    pub charts: ChartOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            charts: ChartOptions::default(),
        }
    }
}

impl PipelineOptions {
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                ReportError::InvalidOptions(format!(
                    "delimiter {:?} is not a single ASCII character",
                    self.delimiter
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Report – everything derived from one input
// ---------------------------------------------------------------------------

/// The result of one pipeline run. Built once per input and read-only after.
#[derive(Debug, Clone)]
pub struct Report {
    pub table: Table,
    pub summaries: ColumnSummaries,
    pub correlation: Option<CorrelationMatrix>,
    pub charts: Vec<ChartSpec>,
}

impl Report {
    /// Load, summarise, correlate and plan charts. The first failure aborts
    /// the whole run.
    pub fn build(bytes: &[u8], options: &PipelineOptions) -> Result<Self> {
        let table = match options.delimiter_byte()? {
            b',' => load(bytes)?,
            delimiter => load_delimited(bytes, delimiter)?,
        };
        let summaries = summarize(&table)?;
        let correlation = correlate(&table);
        let charts = plan(&table, &options.charts);

        log::info!(
            "Report ready: {} rows × {} columns, {} charts",
            table.n_rows(),
            table.n_columns(),
            charts.len()
        );

        Ok(Report {
            table,
            summaries,
            correlation,
            charts,
        })
    }

    /// Re-plan charts for new options without re-reading the input.
    pub fn replan_charts(&mut self, options: &ChartOptions) {
        self.charts = plan(&self.table, options);
    }

    pub fn export_statistics(&self) -> Result<Vec<u8>> {
        export_statistics(&self.summaries)
    }
}

fn plan(table: &Table, options: &ChartOptions) -> Vec<ChartSpec> {
    if *options == ChartOptions::default() {
        plan_charts(table)
    } else {
        plan_charts_with(table, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::charts::ChartKind;

    fn build(input: &[u8]) -> Result<Report> {
        Report::build(input, &PipelineOptions::default())
    }

    #[test]
    fn test_mixed_table_scenario() {
        let report = build(b"a,b\n1,x\n2,y\n3,x\n").unwrap();
        assert_eq!(report.table.column_names(), vec!["a", "b"]);
        assert!(report.correlation.is_none());

        let kinds: Vec<ChartKind> = report.charts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Histogram { bins: 30 },
                ChartKind::Boxplot,
                ChartKind::Bar
            ]
        );
        assert!(report.charts.iter().all(|c| c.kind != ChartKind::Heatmap));
    }

    #[test]
    fn test_missing_value_scenario() {
        let report = build(b"a\n1\n\n3\n").unwrap();
        let a = report.summaries.get("a").unwrap();
        assert_eq!(a.count, 2);
        assert_eq!(a.missing, 1);
    }

    #[test]
    fn test_header_only_scenario() {
        let report = build(b"a,b\n").unwrap();
        assert!(report.summaries.iter().all(|s| s.count == 0));
        assert_eq!(report.summaries.len(), 2);
        assert!(report.correlation.is_none());
    }

    #[test]
    fn test_export_round_trip_shape() {
        let report = build(b"x,y,z\n1,2,a\n4,,b\n7,9,\n").unwrap();
        let bytes = report.export_statistics().unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 1 + report.summaries.statistic_rows().len());
        assert!(rows.iter().all(|r| r.len() == report.table.n_columns() + 1));
    }

    #[test]
    fn test_failure_aborts_whole_run() {
        assert!(matches!(build(b"a,b\n1,2,3\n"), Err(ReportError::Parse(_))));
        assert!(matches!(
            build(b"a\n1e308\n1e308\n"),
            Err(ReportError::Computation { .. })
        ));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let options = PipelineOptions {
            delimiter: ';',
            ..PipelineOptions::default()
        };
        let report = Report::build(b"a;b\n1;2\n3;5\n", &options).unwrap();
        assert!(report.correlation.is_some());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let options = PipelineOptions {
            delimiter: '¦',
            ..PipelineOptions::default()
        };
        assert!(matches!(
            Report::build(b"a\n1\n", &options),
            Err(ReportError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_replan_applies_cap() {
        let mut report = build(b"a,b,c\n1,2,3\n4,5,7\n").unwrap();
        assert_eq!(report.charts.len(), 7);
        report.replan_charts(&ChartOptions {
            max_charts_per_kind: Some(1),
            ..ChartOptions::default()
        });
        assert_eq!(report.charts.len(), 3);

        report.replan_charts(&ChartOptions::default());
        assert_eq!(report.charts, plan_charts(&report.table));
    }
}
