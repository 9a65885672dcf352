use std::collections::HashMap;

use serde::Serialize;

use super::error::{ReportError, Result};
use super::model::{format_number, Column, ColumnData, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// Descriptive statistics for one column. `count` excludes missing cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub count: usize,
    pub missing: usize,
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SummaryStats {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
}

/// `None` marks a statistic that is undefined for the data, e.g. every field
/// of an empty column, or `std` of a single observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericStats {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoricalStats {
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    /// Value counts, most frequent first; ties keep first-seen order.
    pub frequencies: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Statistic – one row of the describe-style table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Count,
    Unique,
    Top,
    Freq,
    Mean,
    Std,
    Min,
    Q25,
    Median,
    Q75,
    Max,
}

impl Statistic {
    const CATEGORICAL: [Statistic; 3] = [Statistic::Unique, Statistic::Top, Statistic::Freq];
    const NUMERIC: [Statistic; 7] = [
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::Q25,
        Statistic::Median,
        Statistic::Q75,
        Statistic::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Unique => "unique",
            Statistic::Top => "top",
            Statistic::Freq => "freq",
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::Q25 => "25%",
            Statistic::Median => "50%",
            Statistic::Q75 => "75%",
            Statistic::Max => "max",
        }
    }
}

impl ColumnSummary {
    /// The formatted value of one statistic, or `None` if it does not apply to
    /// this column or is undefined.
    pub fn statistic(&self, stat: Statistic) -> Option<String> {
        match (&self.stats, stat) {
            // Numeric counts print as floats, categorical counts as integers.
            (SummaryStats::Numeric(_), Statistic::Count) => {
                Some(format_number(self.count as f64))
            }
            (SummaryStats::Categorical(_), Statistic::Count) => Some(self.count.to_string()),
            (SummaryStats::Categorical(c), Statistic::Unique) => c.unique.map(|u| u.to_string()),
            (SummaryStats::Categorical(c), Statistic::Top) => c.top.clone(),
            (SummaryStats::Categorical(c), Statistic::Freq) => c.freq.map(|f| f.to_string()),
            (SummaryStats::Numeric(n), stat) => {
                let value = match stat {
                    Statistic::Mean => n.mean,
                    Statistic::Std => n.std,
                    Statistic::Min => n.min,
                    Statistic::Q25 => n.q25,
                    Statistic::Median => n.median,
                    Statistic::Q75 => n.q75,
                    Statistic::Max => n.max,
                    _ => None,
                };
                value.map(format_number)
            }
            (SummaryStats::Categorical(_), _) => None,
        }
    }

    pub fn numeric(&self) -> Option<&NumericStats> {
        match &self.stats {
            SummaryStats::Numeric(n) => Some(n),
            SummaryStats::Categorical(_) => None,
        }
    }

    pub fn categorical(&self) -> Option<&CategoricalStats> {
        match &self.stats {
            SummaryStats::Categorical(c) => Some(c),
            SummaryStats::Numeric(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnSummaries – one entry per table column, in table order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnSummaries {
    summaries: Vec<ColumnSummary>,
}

impl ColumnSummaries {
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSummary> {
        self.summaries.iter()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.summaries.iter().find(|s| s.name == name)
    }

    /// Rows of the describe-style table: `count`, then the categorical rows
    /// if any column is categorical, then the numeric rows if any column is
    /// numeric.
    pub fn statistic_rows(&self) -> Vec<Statistic> {
        let has_kind = |kind| self.summaries.iter().any(|s| s.kind == kind);
        let mut rows = vec![Statistic::Count];
        if has_kind(ColumnKind::Categorical) {
            rows.extend(Statistic::CATEGORICAL);
        }
        if has_kind(ColumnKind::Numeric) {
            rows.extend(Statistic::NUMERIC);
        }
        rows
    }
}

impl<'a> IntoIterator for &'a ColumnSummaries {
    type Item = &'a ColumnSummary;
    type IntoIter = std::slice::Iter<'a, ColumnSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.summaries.iter()
    }
}

// ---------------------------------------------------------------------------
// summarize
// ---------------------------------------------------------------------------

/// Summarise every column of the table. Fails as a whole if any column does.
pub fn summarize(table: &Table) -> Result<ColumnSummaries> {
    let summaries = table
        .columns()
        .iter()
        .map(summarize_column)
        .collect::<Result<Vec<_>>>()?;
    Ok(ColumnSummaries { summaries })
}

fn summarize_column(column: &Column) -> Result<ColumnSummary> {
    let missing = column.missing();
    let count = column.len() - missing;

    let stats = match column.data() {
        ColumnData::Numeric(values) => {
            let mut present: Vec<f64> = values.iter().flatten().copied().collect();
            SummaryStats::Numeric(numeric_stats(column.name(), &mut present)?)
        }
        ColumnData::Categorical(values) => SummaryStats::Categorical(categorical_stats(values)),
    };

    Ok(ColumnSummary {
        name: column.name().to_string(),
        kind: column.kind(),
        count,
        missing,
        stats,
    })
}

fn numeric_stats(column: &str, values: &mut [f64]) -> Result<NumericStats> {
    if values.is_empty() {
        return Ok(NumericStats::default());
    }
    values.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.len() > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    if values.iter().all(|v| v.is_finite())
        && (!mean.is_finite() || std.is_some_and(|s| !s.is_finite()))
    {
        return Err(ReportError::Computation {
            column: column.to_string(),
            reason: "floating-point overflow while computing mean/std".into(),
        });
    }

    Ok(NumericStats {
        mean: Some(mean),
        std,
        min: values.first().copied(),
        q25: Some(quantile(values, 0.25)),
        median: Some(quantile(values, 0.5)),
        q75: Some(quantile(values, 0.75)),
        max: values.last().copied(),
    })
}

/// Linearly interpolated quantile of sorted, non-empty data.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    if frac == 0.0 {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

fn categorical_stats(values: &[Option<String>]) -> CategoricalStats {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut frequencies: Vec<ValueCount> = Vec::new();

    for value in values.iter().flatten() {
        match index.get(value.as_str()) {
            Some(&i) => frequencies[i].count += 1,
            None => {
                index.insert(value, frequencies.len());
                frequencies.push(ValueCount {
                    value: value.clone(),
                    count: 1,
                });
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));

    match frequencies.first() {
        None => CategoricalStats::default(),
        Some(top) => CategoricalStats {
            unique: Some(frequencies.len()),
            top: Some(top.value.clone()),
            freq: Some(top.count),
            frequencies,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_one_summary_per_column_in_order() {
        let table = load(b"z,a,m\n1,x,2.5\n2,y,3.5\n").unwrap();
        let summaries = summarize(&table).unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, table.column_names());
    }

    #[test]
    fn test_numeric_describe() {
        let table = load(b"v\n1\n2\n3\n4\n").unwrap();
        let summaries = summarize(&table).unwrap();
        let v = summaries.get("v").unwrap();
        assert_eq!(v.count, 4);
        let n = v.numeric().unwrap();
        assert!(approx(n.mean, 2.5));
        assert!(approx(n.std, 1.2909944487358056));
        assert!(approx(n.min, 1.0));
        assert!(approx(n.q25, 1.75));
        assert!(approx(n.median, 2.5));
        assert!(approx(n.q75, 3.25));
        assert!(approx(n.max, 4.0));
    }

    #[test]
    fn test_missing_values_counted() {
        let table = load(b"a\n1\n\n3\n").unwrap();
        let summaries = summarize(&table).unwrap();
        let a = summaries.get("a").unwrap();
        assert_eq!(a.count, 2);
        assert_eq!(a.missing, 1);
        assert!(approx(a.numeric().unwrap().mean, 2.0));
    }

    #[test]
    fn test_single_value_has_no_std() {
        let table = load(b"a,b\n7,x\n").unwrap();
        let summaries = summarize(&table).unwrap();
        let a = summaries.get("a").unwrap().numeric().unwrap();
        assert_eq!(a.std, None);
        assert!(approx(a.median, 7.0));
    }

    #[test]
    fn test_categorical_describe_ties_keep_first_seen() {
        let table = load(b"c\ny\nx\nx\ny\nz\n").unwrap();
        let summaries = summarize(&table).unwrap();
        let c = summaries.get("c").unwrap().categorical().unwrap();
        assert_eq!(c.unique, Some(3));
        assert_eq!(c.top.as_deref(), Some("y"));
        assert_eq!(c.freq, Some(2));
        let values: Vec<&str> = c.frequencies.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["y", "x", "z"]);
    }

    #[test]
    fn test_empty_columns_have_absent_statistics() {
        let table = load(b"a,b\n").unwrap();
        let summaries = summarize(&table).unwrap();
        assert_eq!(summaries.len(), 2);
        for s in &summaries {
            assert_eq!(s.count, 0);
            assert_eq!(s.missing, 0);
            assert_eq!(s.statistic(Statistic::Count).as_deref(), Some("0"));
            assert_eq!(s.statistic(Statistic::Unique), None);
            assert_eq!(s.statistic(Statistic::Top), None);
            assert_eq!(s.statistic(Statistic::Freq), None);
        }
    }

    #[test]
    fn test_all_missing_numeric_column() {
        let table = load(b"a,b\n,1\n,2\n").unwrap();
        let summaries = summarize(&table).unwrap();
        let a = summaries.get("a").unwrap();
        assert_eq!(a.count, 0);
        assert_eq!(a.missing, 2);
        assert_eq!(a.numeric(), Some(&NumericStats::default()));
        assert_eq!(a.statistic(Statistic::Mean), None);
    }

    #[test]
    fn test_overflow_is_computation_error() {
        let table = load(b"a\n1e308\n1e308\n").unwrap();
        let err = summarize(&table).unwrap_err();
        assert!(matches!(err, ReportError::Computation { ref column, .. } if column == "a"));
    }

    #[test]
    fn test_statistic_rows_follow_column_kinds() {
        let numeric = summarize(&load(b"a\n1\n").unwrap()).unwrap();
        assert_eq!(numeric.statistic_rows().len(), 8);

        let categorical = summarize(&load(b"a\nx\n").unwrap()).unwrap();
        assert_eq!(
            categorical.statistic_rows(),
            vec![
                Statistic::Count,
                Statistic::Unique,
                Statistic::Top,
                Statistic::Freq
            ]
        );

        let mixed = summarize(&load(b"a,b\n1,x\n").unwrap()).unwrap();
        let labels: Vec<&str> = mixed.statistic_rows().iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec!["count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max"]
        );
    }

    #[test]
    fn test_statistic_formatting() {
        let summaries = summarize(&load(b"a,b\n1,x\n2,y\n3,x\n").unwrap()).unwrap();
        let a = summaries.get("a").unwrap();
        assert_eq!(a.statistic(Statistic::Count).as_deref(), Some("3.0"));
        assert_eq!(a.statistic(Statistic::Std).as_deref(), Some("1.0"));
        assert_eq!(a.statistic(Statistic::Top), None);
        let b = summaries.get("b").unwrap();
        assert_eq!(b.statistic(Statistic::Count).as_deref(), Some("3"));
        assert_eq!(b.statistic(Statistic::Top).as_deref(), Some("x"));
        assert_eq!(b.statistic(Statistic::Mean), None);
    }
}
