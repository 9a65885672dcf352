use thiserror::Error;

/// Result alias used throughout the report pipeline.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Terminal failure of one pipeline invocation. There is no partial report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The input is not a well-formed delimited table.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The input has no columns at all.
    #[error("Empty table: {0}")]
    EmptyTable(String),

    /// A column could not be summarised.
    #[error("Computation failed for column '{column}': {reason}")]
    Computation { column: String, reason: String },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Export failed: {0}")]
    Export(String),
}
