use std::io::Read;
use std::path::Path;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use csv::StringRecord;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{DataError, Result};
use super::model::{
    ColumnDef, ColumnKind, Dataset, Record, Schema, FILTER_COLUMNS, HEADLINE_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a weather dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with column names, one record per line
/// * `.parquet` – flat columns; numeric Arrow types become numeric columns
///
/// Any failure is fatal: there is no partial load.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => read_csv(std::fs::File::open(path)?)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };
    debug!(
        "Parsed {} with {} records and {} columns",
        path.display(),
        dataset.len(),
        dataset.schema().len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read delimited text with a header row.
///
/// A column is numeric when every present cell parses as a finite `f64`.
/// Missing cells (empty, `NA`, `NaN`, `null`, ...) are kept as missing values.
/// The filter columns are always categorical, even when their labels look
/// like numbers. Rows with a different field count than the header are
/// rejected by the CSV reader.
pub fn read_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()?;
    if rows.is_empty() {
        return Err(DataError::Empty);
    }

    let kinds: Vec<ColumnKind> = headers
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let numeric = !FILTER_COLUMNS.contains(&name)
                && rows
                    .iter()
                    .all(|row| parse_cell(row.get(col).unwrap_or("")).is_numeric());
            if numeric {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            }
        })
        .collect();

    check_required(&headers, &kinds, &rows)?;

    let schema = Schema::new(
        headers
            .iter()
            .zip(&kinds)
            .map(|(name, kind)| ColumnDef {
                name: name.to_string(),
                kind: *kind,
            })
            .collect(),
    );

    let records = rows
        .into_iter()
        .map(|row| {
            let numbers = kinds
                .iter()
                .enumerate()
                .map(|(col, kind)| match kind {
                    ColumnKind::Numeric => match parse_cell(row.get(col).unwrap_or("")) {
                        Cell::Number(v) => Some(v),
                        Cell::Missing | Cell::Text => None,
                    },
                    ColumnKind::Categorical => None,
                })
                .collect();
            Record::new(row, numbers)
        })
        .collect();

    finish(schema, headers, records)
}

/// Tokens read as a missing value in a numeric column (the usual pandas set).
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

enum Cell {
    Missing,
    Number(f64),
    /// Anything else, including `inf`.
    Text,
}

impl Cell {
    fn is_numeric(&self) -> bool {
        !matches!(self, Cell::Text)
    }
}

fn parse_cell(cell: &str) -> Cell {
    let cell = cell.trim();
    if MISSING_TOKENS.contains(&cell) {
        return Cell::Missing;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Text,
    }
}

/// Every headline column must exist and be numeric; every filter column must
/// exist.
fn check_required(headers: &StringRecord, kinds: &[ColumnKind], rows: &[StringRecord]) -> Result<()> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::Schema(format!("missing required column '{name}'")))
    };

    for headline in &HEADLINE_COLUMNS {
        let col = position(headline.column)?;
        if kinds[col] != ColumnKind::Numeric {
            // Point at the first offending cell.
            for (row_no, row) in rows.iter().enumerate() {
                let cell = row.get(col).unwrap_or("");
                if !parse_cell(cell).is_numeric() {
                    return Err(DataError::Parse {
                        row: row_no,
                        column: headline.column.to_string(),
                        value: cell.trim().to_string(),
                    });
                }
            }
            return Err(DataError::NotNumeric(headline.column.to_string()));
        }
    }

    for name in FILTER_COLUMNS {
        position(name)?;
    }
    Ok(())
}

fn finish(schema: Schema, headers: StringRecord, records: Vec<Record>) -> Result<Dataset> {
    let dataset = Dataset::new(schema, headers, records);
    if dataset.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the same columns as the CSV layout.
///
/// Integer and floating-point Arrow columns are numeric, with NaN read as
/// missing. Everything else, and the filter columns whatever their type, is
/// rendered to text and treated as categorical.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let arrow_schema = builder.schema().clone();
    let reader = builder.build()?;

    let headers: StringRecord = arrow_schema.fields().iter().map(|f| f.name().as_str()).collect();
    let kinds: Vec<ColumnKind> = arrow_schema
        .fields()
        .iter()
        .map(|f| {
            if f.data_type().is_numeric() && !FILTER_COLUMNS.contains(&f.name().as_str()) {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            }
        })
        .collect();

    let mut rows: Vec<StringRecord> = Vec::new();
    let mut numbers: Vec<Vec<Option<f64>>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let n_rows = batch.num_rows();

        let mut text_cols = Vec::with_capacity(batch.num_columns());
        let mut num_cols = Vec::with_capacity(batch.num_columns());
        for (col, kind) in batch.columns().iter().zip(&kinds) {
            text_cols.push(cast(col, &DataType::Utf8)?);
            num_cols.push(match kind {
                ColumnKind::Numeric => Some(cast(col, &DataType::Float64)?),
                ColumnKind::Categorical => None,
            });
        }

        for row in 0..n_rows {
            let raw: StringRecord = text_cols
                .iter()
                .map(|c| {
                    let s = c.as_string::<i32>();
                    if s.is_null(row) {
                        ""
                    } else {
                        s.value(row)
                    }
                })
                .collect();
            let parsed = num_cols
                .iter()
                .map(|c| {
                    c.as_ref().and_then(|arr| {
                        let f = arr.as_primitive::<Float64Type>();
                        (!f.is_null(row))
                            .then(|| f.value(row))
                            .filter(|v| v.is_finite())
                    })
                })
                .collect();
            rows.push(raw);
            numbers.push(parsed);
        }
    }

    check_required(&headers, &kinds, &rows)?;

    let schema = Schema::new(
        headers
            .iter()
            .zip(&kinds)
            .map(|(name, kind)| ColumnDef {
                name: name.to_string(),
                kind: *kind,
            })
            .collect(),
    );
    let records = rows
        .into_iter()
        .zip(numbers)
        .map(|(raw, parsed)| Record::new(raw, parsed))
        .collect();

    finish(schema, headers, records)
}
