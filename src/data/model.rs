use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// ColumnKind – inferred scalar type of a column
// ---------------------------------------------------------------------------

/// The two column types the pipeline distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    /// Pandas-style dtype label shown in the dataset overview.
    pub fn dtype_name(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "float64",
            ColumnKind::Categorical => "object",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell – a single borrowed value, used for display
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Integer(i64),
    Number(f64),
    Text(&'a str),
    Missing,
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Integer(v) => write!(f, "{v}"),
            Cell::Number(v) => write!(f, "{}", format_number(*v)),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Missing => write!(f, "NaN"),
        }
    }
}

/// Render a float the way a dataframe prints it: integral values keep a
/// trailing `.0`, magnitudes from `1e16` up or below `1e-4` use exponent
/// notation (`1e+16`, `1.5e-05`), everything else uses the shortest
/// round-trip form.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let label = if v > 0.0 { "inf" } else { "-inf" };
        label.to_string()
    } else if v != 0.0 && !(1e-4..1e16).contains(&v.abs()) {
        exponent_form(v)
    } else if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// `1e16` → `1e+16`, `1.5e-7` → `1.5e-07`.
fn exponent_form(v: f64) -> String {
    let raw = format!("{v:e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Typed storage for one column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    data: ColumnData,
    /// Every cell was written as an integer and none is missing.
    #[serde(skip)]
    integral: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Column {
            name: name.into(),
            data,
            integral: false,
        }
    }

    /// A numeric column read from integer literals with no gaps. It shows as
    /// `int64` and its cells print without a fractional part.
    pub fn integer(name: impl Into<String>, values: Vec<i64>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Numeric(values.into_iter().map(|v| Some(v as f64)).collect()),
            integral: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Number of rows, missing cells included.
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    /// Dtype label shown in the dataset overview.
    pub fn dtype_name(&self) -> &'static str {
        if self.integral {
            "int64"
        } else {
            self.kind().dtype_name()
        }
    }

    pub fn missing(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// The raw values if this is a numeric column.
    pub fn numeric_values(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Borrow one cell. Out-of-range rows read as missing.
    pub fn cell(&self, row: usize) -> Cell<'_> {
        match &self.data {
            ColumnData::Numeric(v) => match v.get(row) {
                Some(Some(x)) if self.integral => Cell::Integer(*x as i64),
                Some(Some(x)) => Cell::Number(*x),
                _ => Cell::Missing,
            },
            ColumnData::Categorical(v) => match v.get(row) {
                Some(Some(s)) => Cell::Text(s),
                _ => Cell::Missing,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded file
// ---------------------------------------------------------------------------

/// An immutable, column-oriented table. Every column has `n_rows` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from columns of equal length.
    ///
    /// Returns `None` if the column lengths disagree.
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let n_rows = columns.first().map_or(0, Column::len);
        if columns.iter().any(|c| c.len() != n_rows) {
            return None;
        }
        Some(Table { columns, n_rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Numeric columns, in table order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
    }

    /// Categorical columns, in table order.
    pub fn categorical_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Categorical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new("a", ColumnData::Numeric(vec![Some(1.0), None, Some(2.5)])),
            Column::new(
                "b",
                ColumnData::Categorical(vec![Some("x".into()), Some("y".into()), None]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_kinds() {
        let table = sample();
        assert_eq!(table.shape(), (3, 2));
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.numeric_columns().count(), 1);
        assert_eq!(table.column("b").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(table.column("a").unwrap().missing(), 1);
    }

    #[test]
    fn test_unequal_columns_rejected() {
        let columns = vec![
            Column::new("a", ColumnData::Numeric(vec![Some(1.0)])),
            Column::new("b", ColumnData::Numeric(vec![])),
        ];
        assert!(Table::from_columns(columns).is_none());
    }

    #[test]
    fn test_cell_display() {
        let table = sample();
        let a = table.column("a").unwrap();
        assert_eq!(a.cell(0).to_string(), "1.0");
        assert_eq!(a.cell(1).to_string(), "NaN");
        assert_eq!(a.cell(2).to_string(), "2.5");
        assert_eq!(table.column("b").unwrap().cell(1).to_string(), "y");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3.0");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_format_number_exponent_range() {
        assert_eq!(format_number(1e16), "1e+16");
        assert_eq!(format_number(-2.5e20), "-2.5e+20");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(1.5e-7), "1.5e-07");
        assert_eq!(format_number(1e-300), "1e-300");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(9999999999999998.0), "9999999999999998.0");
        assert_eq!(format_number(0.0), "0.0");
    }

    #[test]
    fn test_integer_column() {
        let ids = Column::integer("id", vec![1, -2, 30]);
        assert_eq!(ids.kind(), ColumnKind::Numeric);
        assert_eq!(ids.dtype_name(), "int64");
        assert_eq!(ids.cell(1).to_string(), "-2");
        assert_eq!(ids.numeric_values().unwrap()[2], Some(30.0));

        let table = sample();
        assert_eq!(table.column("a").unwrap().dtype_name(), "float64");
        assert_eq!(table.column("b").unwrap().dtype_name(), "object");
    }
}
