use arrow::error::ArrowError;

/// Errors raised by the data layer.
///
/// Everything raised while loading is fatal for the dashboard. Lookup errors
/// (`UnknownColumn`, `NotNumeric`, `NotCategorical`) mean the caller passed a
/// column name that does not fit the operation.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("schema mismatch: {0}")]
    Schema(String),
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("column '{0}' is not categorical")]
    NotCategorical(String),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("dataset contains no records")]
    Empty,
}

pub type Result<T> = std::result::Result<T, DataError>;
