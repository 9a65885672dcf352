use serde::Serialize;

use super::charts::ChartSpec;
use super::correlation::CorrelationMatrix;
use super::error::{ReportError, Result};
use super::pipeline::Report;
use super::summary::ColumnSummaries;

/// Default file name offered for the statistics download.
pub const STATISTICS_FILE_NAME: &str = "descriptive_statistics.csv";
pub const REPORT_FILE_NAME: &str = "report.json";

// ---------------------------------------------------------------------------
// Descriptive statistics CSV
// ---------------------------------------------------------------------------

/// Serialise the describe-style table as UTF-8 CSV.
///
/// Header row: an empty label cell followed by the column names. Each further
/// row starts with a statistic name; absent statistics are empty cells.
pub fn export_statistics(summaries: &ColumnSummaries) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = std::iter::once("").chain(summaries.iter().map(|s| s.name.as_str()));
    writer.write_record(header).map_err(export_error)?;

    for stat in summaries.statistic_rows() {
        let row: Vec<String> = std::iter::once(stat.label().to_string())
            .chain(summaries.iter().map(|s| s.statistic(stat).unwrap_or_default()))
            .collect();
        writer.write_record(&row).map_err(export_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Export(e.to_string()))
}

fn export_error(e: csv::Error) -> ReportError {
    ReportError::Export(e.to_string())
}

// ---------------------------------------------------------------------------
// Report JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportDocument<'a> {
    rows: usize,
    columns: usize,
    dtypes: Vec<ColumnType<'a>>,
    summaries: &'a ColumnSummaries,
    correlation: Option<&'a CorrelationMatrix>,
    charts: &'a [ChartSpec],
}

#[derive(Serialize)]
struct ColumnType<'a> {
    name: &'a str,
    dtype: &'static str,
}

/// Pretty-printed JSON of everything the report derived, without the raw rows.
pub fn export_report_json(report: &Report) -> Result<Vec<u8>> {
    let (rows, columns) = report.table.shape();
    let document = ReportDocument {
        rows,
        columns,
        dtypes: report
            .table
            .columns()
            .iter()
            .map(|c| ColumnType {
                name: c.name(),
                dtype: c.dtype_name(),
            })
            .collect(),
        summaries: &report.summaries,
        correlation: report.correlation.as_ref(),
        charts: &report.charts,
    };
    serde_json::to_vec_pretty(&document).map_err(|e| ReportError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;
    use crate::data::pipeline::PipelineOptions;
    use crate::data::summary::summarize;

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes);
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_export_shape() {
        let summaries = summarize(&load(b"a,b\n1,x\n2,y\n3,x\n").unwrap()).unwrap();
        let rows = read_back(&export_statistics(&summaries).unwrap());

        assert_eq!(rows.len(), 1 + summaries.statistic_rows().len());
        assert!(rows.iter().all(|r| r.len() == summaries.len() + 1));
        assert_eq!(rows[0], vec!["", "a", "b"]);
    }

    #[test]
    fn test_export_content() {
        let summaries = summarize(&load(b"a,b\n1,x\n2,y\n3,x\n").unwrap()).unwrap();
        let text = String::from_utf8(export_statistics(&summaries).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                ",a,b",
                "count,3.0,3",
                "unique,,2",
                "top,,x",
                "freq,,2",
                "mean,2.0,",
                "std,1.0,",
                "min,1.0,",
                "25%,1.5,",
                "50%,2.0,",
                "75%,2.5,",
                "max,3.0,",
            ]
        );
    }

    #[test]
    fn test_export_header_only_table() {
        let summaries = summarize(&load(b"a,b\n").unwrap()).unwrap();
        let rows = read_back(&export_statistics(&summaries).unwrap());
        assert_eq!(rows[1], vec!["count", "0", "0"]);
        assert_eq!(rows[2], vec!["unique", "", ""]);
    }

    #[test]
    fn test_report_json() {
        let report = Report::build(b"a,b,c\n1,2,x\n3,5,y\n", &PipelineOptions::default()).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&export_report_json(&report).unwrap()).unwrap();

        assert_eq!(json["rows"], 2);
        assert_eq!(json["columns"], 3);
        assert_eq!(json["dtypes"][0]["dtype"], "int64");
        assert_eq!(json["dtypes"][2]["dtype"], "object");
        assert_eq!(json["summaries"][0]["name"], "a");
        assert_eq!(json["summaries"][2]["stats"]["top"], "x");
        assert_eq!(json["correlation"]["labels"][1], "b");
        assert_eq!(json["charts"][0]["kind"], "heatmap");
        assert_eq!(json["charts"][1]["bins"], 30);
    }
}
