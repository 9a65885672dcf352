use serde::Serialize;

use super::model::Table;

/// Pearson correlation over the numeric columns of a table.
///
/// Labels follow table column order. `None` entries are undefined: fewer than
/// two complete pairs, or a column with zero variance over those pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Entry at `(row, col)`, or `None` if undefined or out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

/// Correlate every pair of numeric columns using pairwise-complete rows.
///
/// Returns `None` when the table has fewer than two numeric columns.
pub fn correlate(table: &Table) -> Option<CorrelationMatrix> {
    let numeric: Vec<(&str, &[Option<f64>])> = table
        .numeric_columns()
        .filter_map(|c| Some((c.name(), c.numeric_values()?)))
        .collect();

    if numeric.len() < 2 {
        return None;
    }

    let n = numeric.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = pearson(numeric[i].1, numeric[i].1).map(|_| 1.0);
        for j in (i + 1)..n {
            let r = pearson(numeric[i].1, numeric[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    log::debug!("Correlated {n} numeric columns");

    Some(CorrelationMatrix {
        labels: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    })
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;

    #[test]
    fn test_none_with_fewer_than_two_numeric_columns() {
        assert!(correlate(&load(b"a,b\n1,x\n2,y\n3,x\n").unwrap()).is_none());
        assert!(correlate(&load(b"a,b\n").unwrap()).is_none());
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let table = load(b"a,b,c,d\n1,2,9,x\n2,4,7,y\n3,7,8,z\n4,8,1,x\n").unwrap();
        let m = correlate(&table).unwrap();
        assert_eq!(m.labels(), &["a", "b", "c"]);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
                let r = m.get(i, j).unwrap();
                assert!((-1.0..=1.0).contains(&r));
            }
        }
    }

    #[test]
    fn test_perfect_correlation() {
        let m = correlate(&load(b"a,b,c\n1,2,3\n2,4,2\n3,6,1\n").unwrap()).unwrap();
        assert!((m.get(0, 1).unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get(0, 2).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_observations() {
        // The row with a missing `b` is dropped for (a, b) only.
        let table = load(b"a,b,c\n1,1,5\n2,,3\n3,3,1\n100,2,0\n").unwrap();
        let m = correlate(&table).unwrap();
        let expected = pearson(
            &[Some(1.0), Some(3.0), Some(100.0)],
            &[Some(1.0), Some(3.0), Some(2.0)],
        );
        assert_eq!(m.get(0, 1), expected);
        assert!(m.get(0, 2).is_some());
    }

    #[test]
    fn test_zero_variance_is_undefined() {
        let m = correlate(&load(b"a,b\n1,5\n2,5\n3,5\n").unwrap()).unwrap();
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(1, 1), None);
        assert_eq!(m.get(0, 0), Some(1.0));
    }
}
