use std::collections::HashSet;

use super::error::{ReportError, Result};
use super::model::{Column, ColumnData, Table};

/// Tokens read as missing values, in addition to the empty string.
const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a comma-delimited table.
pub fn load(bytes: &[u8]) -> Result<Table> {
    load_delimited(bytes, b',')
}

/// Load a delimited table: header row followed by data rows.
///
/// Every record must have as many fields as the header. Column types are
/// inferred once all rows are read; see [`infer_column`].
pub fn load_delimited(bytes: &[u8], delimiter: u8) -> Result<Table> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ReportError::Parse(format!(
            "input is not valid UTF-8 (invalid byte at offset {})",
            e.valid_up_to()
        ))
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.trim().is_empty() {
        return Err(ReportError::EmptyTable("no columns to parse".into()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReportError::Parse(format!("reading header row: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();
    let names = unique_names(&headers);
    if names.is_empty() {
        return Err(ReportError::EmptyTable("header row has no columns".into()));
    }

    // The reader skips blank lines. In a one-column file they are missing
    // values, so count the ones it stepped over before each record.
    let keep_blank_rows = names.len() == 1;
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    let mut record = csv::StringRecord::new();
    let mut end_of_previous = reader.position().byte() as usize;

    while reader
        .read_record(&mut record)
        .map_err(|e| ReportError::Parse(e.to_string()))?
    {
        if keep_blank_rows {
            let skipped = blank_lines_at(text.as_bytes(), end_of_previous);
            raw[0].extend(std::iter::repeat(String::new()).take(skipped));
        }
        end_of_previous = reader.position().byte() as usize;

        for (cells, field) in raw.iter_mut().zip(record.iter()) {
            cells.push(field.to_string());
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();

    log::debug!(
        "Parsed {} columns: {:?}",
        columns.len(),
        columns
            .iter()
            .map(|c| format!("{} ({})", c.name(), c.dtype_name()))
            .collect::<Vec<_>>()
    );

    Table::from_columns(columns)
        .ok_or_else(|| ReportError::Parse("columns have different lengths".into()))
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

/// Make header names unique: empty names become `Unnamed: <i>`, repeats get
/// `.1`, `.2`, … suffixes.
fn unique_names(headers: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());

    for (i, header) in headers.iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {i}")
        } else {
            header.clone()
        };
        let mut name = base.clone();
        let mut suffix = 0;
        while taken.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        taken.insert(name.clone());
        names.push(name);
    }
    names
}

/// Number of empty lines starting at byte `offset`, which is where the
/// previous record ended. `\r\n`, `\r` and `\n` each end one line.
///
/// Only called once the next record has been read, so a run of blank lines
/// at the very end of the input is never counted.
fn blank_lines_at(bytes: &[u8], offset: usize) -> usize {
    let mut rest = bytes.get(offset..).unwrap_or_default();
    // The reader may stop between the `\r` and `\n` of the previous
    // record's terminator.
    if offset > 0 && bytes.get(offset - 1) == Some(&b'\r') {
        if let [b'\n', tail @ ..] = rest {
            rest = tail;
        }
    }

    let mut count = 0;
    loop {
        rest = match rest {
            [b'\r', b'\n', tail @ ..] | [b'\r' | b'\n', tail @ ..] => tail,
            _ => return count,
        };
        count += 1;
    }
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

enum Parsed {
    Missing,
    Integer(i64),
    Number(f64),
    Text,
}

fn classify(s: &str) -> Parsed {
    if s.is_empty() || NA_VALUES.contains(&s) {
        return Parsed::Missing;
    }
    let trimmed = s.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Parsed::Integer(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_nan() => Parsed::Missing,
        Ok(v) => Parsed::Number(v),
        Err(_) => Parsed::Text,
    }
}

/// A column is numeric when it has rows and every present cell parses as a
/// float. Anything else, including a column with zero rows, is categorical.
/// Numeric columns made only of integer literals, with nothing missing, keep
/// their integer dtype.
fn infer_column(name: String, cells: Vec<String>) -> Column {
    let parsed: Vec<Parsed> = cells.iter().map(|s| classify(s)).collect();
    let numeric = !cells.is_empty() && parsed.iter().all(|p| !matches!(p, Parsed::Text));

    if numeric {
        let integers: Option<Vec<i64>> = parsed
            .iter()
            .map(|p| match p {
                Parsed::Integer(v) => Some(*v),
                _ => None,
            })
            .collect();
        if let Some(integers) = integers {
            return Column::integer(name, integers);
        }

        let values = parsed
            .into_iter()
            .map(|p| match p {
                Parsed::Integer(v) => Some(v as f64),
                Parsed::Number(v) => Some(v),
                Parsed::Missing | Parsed::Text => None,
            })
            .collect();
        Column::new(name, ColumnData::Numeric(values))
    } else {
        let values = cells
            .into_iter()
            .zip(parsed)
            .map(|(s, p)| match p {
                Parsed::Missing => None,
                _ => Some(s),
            })
            .collect();
        Column::new(name, ColumnData::Categorical(values))
    }
}
