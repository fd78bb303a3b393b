use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::Serialize;

use super::model::{ColumnKind, Dataset, Record};

/// Label of the "no filter" choice shown first in every selector.
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Filter selection: one equality constraint (or none) per column
// ---------------------------------------------------------------------------

/// The choice made for one column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum Choice {
    /// No constraint on this column.
    #[default]
    All,
    /// Keep only rows whose cell equals this value exactly.
    Value(String),
}

impl Choice {
    /// Interpret a selector label; [`ALL`] maps to [`Choice::All`].
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            Choice::All
        } else {
            Choice::Value(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::All => ALL,
            Choice::Value(v) => v,
        }
    }
}

/// Per-column selections, combined with logical AND.
/// A column absent from the map is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    choices: BTreeMap<String, Choice>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSelection::set`].
    pub fn with(mut self, column: &str, choice: Choice) -> Self {
        self.set(column, choice);
        self
    }

    pub fn set(&mut self, column: &str, choice: Choice) {
        self.choices.insert(column.to_string(), choice);
    }

    /// The choice for `column`; unconstrained columns report [`Choice::All`].
    pub fn get(&self, column: &str) -> &Choice {
        static UNSET: Choice = Choice::All;
        self.choices.get(column).unwrap_or(&UNSET)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Choice)> {
        self.choices.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether every column is unconstrained.
    pub fn is_all(&self) -> bool {
        self.choices.values().all(|c| *c == Choice::All)
    }
}

/// Selector options for `column`: [`ALL`] followed by the column's sorted
/// distinct values. Unknown or numeric columns only offer [`ALL`].
pub fn legal_choices(dataset: &Dataset, column: &str) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(dataset.categories(column).unwrap_or_default().iter().cloned())
        .collect()
}

// ---------------------------------------------------------------------------
// Degradation: a selection entry that was ignored
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DegradeReason {
    /// The value never occurs in the column.
    UnknownValue,
    /// The dataset has no such column.
    UnknownColumn,
    /// The column holds numbers and cannot be filtered by category.
    NotCategorical,
}

/// A selection entry that was treated as [`Choice::All`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degradation {
    pub column: String,
    pub value: String,
    pub reason: DegradeReason,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            DegradeReason::UnknownValue => write!(
                f,
                "'{}' does not occur in '{}'; showing all values",
                self.value, self.column
            ),
            DegradeReason::UnknownColumn => {
                write!(f, "no column named '{}'; filter ignored", self.column)
            }
            DegradeReason::NotCategorical => {
                write!(f, "'{}' is numeric; filter ignored", self.column)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// View: ordered subset of the dataset
// ---------------------------------------------------------------------------

/// Rows of a dataset that passed a filter, in dataset order.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> View<'a> {
    /// Every row of the dataset.
    pub fn all(dataset: &'a Dataset) -> Self {
        View {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices produced by an earlier [`apply`].
    /// Out-of-range indices are dropped.
    pub fn from_indices(dataset: &'a Dataset, mut indices: Vec<usize>) -> Self {
        indices.retain(|&i| i < dataset.len());
        View { dataset, indices }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Row positions in the source dataset, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// The first `n` records of the view.
    pub fn head(&self, n: usize) -> impl Iterator<Item = &'a Record> + '_ {
        self.records().take(n)
    }
}

/// Result of applying a selection: the view plus any entries that were ignored.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub view: View<'a>,
    pub degraded: Vec<Degradation>,
}

impl FilterOutcome<'_> {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Apply `selection` to `dataset` with a single pass over the rows.
///
/// A row passes when, for every constrained column, its cell equals the chosen
/// value exactly. Entries naming an unknown column, a numeric column, or a value
/// that never occurs are ignored (the column behaves as [`Choice::All`]) and
/// reported in [`FilterOutcome::degraded`].
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilterOutcome<'a> {
    let schema = dataset.schema();
    let mut constraints: Vec<(usize, &str)> = Vec::new();
    let mut degraded = Vec::new();

    for (column, choice) in selection.iter() {
        let Choice::Value(value) = choice else {
            continue;
        };
        let reason = match (schema.position(column), schema.kind_of(column)) {
            (Some(idx), Some(ColumnKind::Categorical)) => {
                if dataset.is_legal(column, value) {
                    constraints.push((idx, value.as_str()));
                    continue;
                }
                DegradeReason::UnknownValue
            }
            (Some(_), _) => DegradeReason::NotCategorical,
            (None, _) => DegradeReason::UnknownColumn,
        };
        let degradation = Degradation {
            column: column.to_string(),
            value: value.clone(),
            reason,
        };
        warn!("Filter degraded: {degradation}");
        degraded.push(degradation);
    }

    let view = if constraints.is_empty() {
        View::all(dataset)
    } else {
        let indices = dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, rec)| constraints.iter().all(|&(idx, v)| rec.text(idx) == v))
            .map(|(i, _)| i)
            .collect();
        View { dataset, indices }
    };

    FilterOutcome { view, degraded }
}
