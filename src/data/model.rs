use std::collections::{BTreeMap, BTreeSet, HashMap};

use csv::StringRecord;
use serde::Serialize;

use super::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Well-known columns
// ---------------------------------------------------------------------------

pub const TEMPERATURE: &str = "Temperature";
pub const HUMIDITY: &str = "Humidity";
pub const WIND_SPEED: &str = "Wind Speed";
pub const UV_INDEX: &str = "UV Index";
pub const WEATHER_TYPE: &str = "Weather Type";
pub const LOCATION: &str = "Location";

/// A headline KPI: one numeric column whose mean is always displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headline {
    pub column: &'static str,
    pub label: &'static str,
    /// Suffix appended to the formatted value (may be empty).
    pub unit: &'static str,
}

pub const HEADLINE_COLUMNS: [Headline; 4] = [
    Headline {
        column: TEMPERATURE,
        label: "Avg Temperature",
        unit: "°C",
    },
    Headline {
        column: HUMIDITY,
        label: "Avg Humidity",
        unit: "%",
    },
    Headline {
        column: WIND_SPEED,
        label: "Avg Wind Speed",
        unit: " km/h",
    },
    Headline {
        column: UV_INDEX,
        label: "Avg UV Index",
        unit: "",
    },
];

/// Categorical columns offered as dashboard filters, in display order.
pub const FILTER_COLUMNS: [&str; 2] = [WEATHER_TYPE, LOCATION];

// ---------------------------------------------------------------------------
// Column registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
}

/// Column registry built once at load time: name → position and kind.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    positions: HashMap<String, usize>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        let positions = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Schema { columns, positions }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.position(name).map(|i| self.columns[i].kind)
    }

    /// Position of `name`, which must be a numeric column.
    pub fn numeric_position(&self, name: &str) -> Result<usize> {
        let idx = self
            .position(name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))?;
        match self.columns[idx].kind {
            ColumnKind::Numeric => Ok(idx),
            ColumnKind::Categorical => Err(DataError::NotNumeric(name.to_string())),
        }
    }

    /// Position of `name`, which must be a categorical column.
    pub fn categorical_position(&self, name: &str) -> Result<usize> {
        let idx = self
            .position(name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))?;
        match self.columns[idx].kind {
            ColumnKind::Categorical => Ok(idx),
            ColumnKind::Numeric => Err(DataError::NotCategorical(name.to_string())),
        }
    }

    /// Numeric columns in file order, as `(position, name)`.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns_of(ColumnKind::Numeric)
    }

    /// Categorical columns in file order, as `(position, name)`.
    pub fn categorical_columns(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns_of(ColumnKind::Categorical)
    }

    fn columns_of(&self, kind: ColumnKind) -> impl Iterator<Item = (usize, &str)> {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.kind == kind)
            .map(|(i, c)| (i, c.name.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the input file
// ---------------------------------------------------------------------------

/// One observation. The raw text fields are kept verbatim so a view can be
/// written back out unchanged; numeric columns are parsed once at load.
#[derive(Debug, Clone)]
pub struct Record {
    raw: StringRecord,
    /// Parsed value per column; `None` for categorical columns and for
    /// missing numeric cells.
    numbers: Vec<Option<f64>>,
}

impl Record {
    pub fn new(raw: StringRecord, numbers: Vec<Option<f64>>) -> Self {
        Record { raw, numbers }
    }

    pub fn raw(&self) -> &StringRecord {
        &self.raw
    }

    pub fn text(&self, idx: usize) -> &str {
        self.raw.get(idx).unwrap_or("")
    }

    pub fn number(&self, idx: usize) -> Option<f64> {
        self.numbers.get(idx).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    headers: StringRecord,
    records: Vec<Record>,
    /// For each categorical column the sorted distinct values.
    categories: BTreeMap<String, Vec<String>>,
}

impl Dataset {
    /// Build the dataset and its per-column category index.
    pub fn new(schema: Schema, headers: StringRecord, records: Vec<Record>) -> Self {
        let categories = schema
            .categorical_columns()
            .map(|(idx, name)| {
                let distinct: BTreeSet<&str> = records.iter().map(|r| r.text(idx)).collect();
                let values = distinct.into_iter().map(str::to_string).collect();
                (name.to_string(), values)
            })
            .collect();

        Dataset {
            schema,
            headers,
            records,
            categories,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Header row exactly as read.
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct values of a categorical column.
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categories.get(column).map(Vec::as_slice)
    }

    /// Whether `value` occurs in the categorical column `column`.
    pub fn is_legal(&self, column: &str, value: &str) -> bool {
        self.categories(column)
            .is_some_and(|vals| vals.binary_search_by(|v| v.as_str().cmp(value)).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Dataset {
        let schema = Schema::new(vec![
            ColumnDef {
                name: "Temperature".into(),
                kind: ColumnKind::Numeric,
            },
            ColumnDef {
                name: "Weather Type".into(),
                kind: ColumnKind::Categorical,
            },
        ]);
        let headers = StringRecord::from(vec!["Temperature", "Weather Type"]);
        let records = vec![
            Record::new(StringRecord::from(vec!["30", "Sunny"]), vec![Some(30.0), None]),
            Record::new(StringRecord::from(vec!["", "Rainy"]), vec![None, None]),
            Record::new(StringRecord::from(vec!["22", "Cloudy"]), vec![Some(22.0), None]),
        ];
        Dataset::new(schema, headers, records)
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let ds = tiny();
        assert_eq!(
            ds.categories("Weather Type").unwrap(),
            &["Cloudy".to_string(), "Rainy".into(), "Sunny".into()]
        );
        assert!(ds.categories("Temperature").is_none());
    }

    #[test]
    fn legality_is_case_sensitive() {
        let ds = tiny();
        assert!(ds.is_legal("Weather Type", "Sunny"));
        assert!(!ds.is_legal("Weather Type", "sunny"));
        assert!(!ds.is_legal("Nope", "Sunny"));
    }

    #[test]
    fn schema_lookups_check_kind() {
        let ds = tiny();
        let schema = ds.schema();
        assert_eq!(schema.numeric_position("Temperature").unwrap(), 0);
        assert!(matches!(
            schema.numeric_position("Weather Type"),
            Err(DataError::NotNumeric(_))
        ));
        assert!(matches!(
            schema.categorical_position("Temperature"),
            Err(DataError::NotCategorical(_))
        ));
        assert!(matches!(
            schema.categorical_position("Missing"),
            Err(DataError::UnknownColumn(_))
        ));
    }

    #[test]
    fn empty_dataset_reports_empty() {
        let schema = tiny().schema().clone();
        let ds = Dataset::new(schema, StringRecord::from(vec!["Temperature", "Weather Type"]), vec![]);
        assert!(ds.is_empty());
        assert!(!tiny().is_empty());
        assert_eq!(ds.categories("Weather Type").unwrap(), &[] as &[String]);
    }

    #[test]
    fn missing_numeric_cells_read_as_none() {
        let ds = tiny();
        assert_eq!(ds.records()[0].number(0), Some(30.0));
        assert_eq!(ds.records()[1].number(0), None);
        assert_eq!(ds.records()[1].text(1), "Rainy");
    }
}
