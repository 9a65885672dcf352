use serde::{Deserialize, Serialize};

use super::model::Table;
use super::summary::quantile;

pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Chart plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartKind {
    Heatmap,
    Histogram { bins: usize },
    Boxplot,
    Bar,
}

/// One chart to render, independent of any plotting library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    #[serde(flatten)]
    pub kind: ChartKind,
    pub columns: Vec<String>,
    pub title: String,
}

/// Knobs for [`plan_charts_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub histogram_bins: usize,
    /// Keep at most this many histograms, boxplots and bar charts each.
    /// `None` plots every column.
    pub max_charts_per_kind: Option<usize>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            max_charts_per_kind: None,
        }
    }
}

/// Plan the default chart set for a table.
pub fn plan_charts(table: &Table) -> Vec<ChartSpec> {
    plan_charts_with(table, &ChartOptions::default())
}

/// Plan charts from the table schema alone.
///
/// Order: the heatmap (only with two or more numeric columns), then one
/// histogram per numeric column, one boxplot per numeric column, and one bar
/// chart per categorical column, each group in table order.
pub fn plan_charts_with(table: &Table, options: &ChartOptions) -> Vec<ChartSpec> {
    let numeric: Vec<&str> = table.numeric_columns().map(|c| c.name()).collect();
    let categorical: Vec<&str> = table.categorical_columns().map(|c| c.name()).collect();
    let cap = options.max_charts_per_kind.unwrap_or(usize::MAX);
    let bins = options.histogram_bins.max(1);

    let mut specs = Vec::new();

    if numeric.len() >= 2 {
        specs.push(ChartSpec {
            kind: ChartKind::Heatmap,
            columns: numeric.iter().map(|c| c.to_string()).collect(),
            title: "Correlation Heatmap".to_string(),
        });
    }

    let single = |kind: ChartKind, title: String, col: &str| ChartSpec {
        kind,
        columns: vec![col.to_string()],
        title,
    };

    specs.extend(numeric.iter().copied().take(cap).map(|col| {
        single(
            ChartKind::Histogram { bins },
            format!("Distribution of {col}"),
            col,
        )
    }));
    specs.extend(
        numeric
            .iter()
            .copied()
            .take(cap)
            .map(|col| single(ChartKind::Boxplot, format!("Boxplot of {col}"), col)),
    );
    specs.extend(
        categorical
            .iter()
            .copied()
            .take(cap)
            .map(|col| single(ChartKind::Bar, format!("Value Counts of {col}"), col)),
    );

    log::debug!("Planned {} charts", specs.len());
    specs
}

// ---------------------------------------------------------------------------
// Chart data – what the renderer draws for each chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins over the finite values. Constant data gets a single bin
/// of width 1 centred on the value.
pub fn histogram(values: &[Option<f64>], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    let Some(&first) = finite.first() else {
        return Vec::new();
    };
    let (min, max) = finite
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if min == max {
        return vec![HistogramBin {
            start: min - 0.5,
            end: max + 0.5,
            count: finite.len(),
        }];
    }

    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Box-and-whisker summary with Tukey fences at 1.5 × IQR.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_summary(values: &[Option<f64>]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let lower_whisker = sorted.iter().copied().find(|v| *v >= lo_fence).unwrap_or(q1);
    let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= hi_fence).unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !(lo_fence..=hi_fence).contains(v))
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;

    #[test]
    fn test_plan_for_mixed_table() {
        let table = load(b"a,b\n1,x\n2,y\n3,x\n").unwrap();
        let specs = plan_charts(&table);
        let kinds: Vec<ChartKind> = specs.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Histogram { bins: DEFAULT_HISTOGRAM_BINS },
                ChartKind::Boxplot,
                ChartKind::Bar
            ]
        );
        assert_eq!(specs[0].columns, vec!["a"]);
        assert_eq!(specs[0].title, "Distribution of a");
        assert_eq!(specs[2].title, "Value Counts of b");
    }

    #[test]
    fn test_plan_groups_in_table_order() {
        let table = load(b"n1,c1,n2,c2\n1,x,2,p\n2,y,3,q\n").unwrap();
        let specs = plan_charts(&table);
        let titles: Vec<&str> = specs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Correlation Heatmap",
                "Distribution of n1",
                "Distribution of n2",
                "Boxplot of n1",
                "Boxplot of n2",
                "Value Counts of c1",
                "Value Counts of c2",
            ]
        );
        assert_eq!(specs[0].columns, vec!["n1", "n2"]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let table = load(b"a,b,c\n1,2,x\n3,4,y\n").unwrap();
        assert_eq!(plan_charts(&table), plan_charts(&table));
    }

    #[test]
    fn test_plan_cap_per_kind() {
        let table = load(b"a,b,c,d\n1,2,3,x\n4,5,6,y\n").unwrap();
        let options = ChartOptions {
            histogram_bins: 10,
            max_charts_per_kind: Some(1),
        };
        let specs = plan_charts_with(&table, &options);
        let kinds: Vec<ChartKind> = specs.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Heatmap,
                ChartKind::Histogram { bins: 10 },
                ChartKind::Boxplot,
                ChartKind::Bar
            ]
        );
    }

    #[test]
    fn test_histogram_bins_cover_range() {
        let values: Vec<Option<f64>> = vec![Some(0.0), Some(1.0), None, Some(2.0), Some(10.0)];
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 1);
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let bins = histogram(&[Some(3.0), Some(3.0)], 30);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].center(), 3.0);
        assert_eq!(bins[0].width(), 1.0);
        assert!(histogram(&[None], 30).is_empty());
    }

    #[test]
    fn test_box_summary_outliers() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 100.0].into_iter().map(Some).collect();
        let b = box_summary(&values).unwrap();
        assert_eq!(b.q1, 2.0);
        assert_eq!(b.median, 3.0);
        assert_eq!(b.q3, 4.0);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 4.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert!(box_summary(&[None, None]).is_none());
    }
}
