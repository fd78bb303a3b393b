use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;

use crate::color::ColorMap;
use crate::data::export::export_csv;
use crate::data::filter::{apply, legal_choices, Choice, FilterSelection, View};
use crate::data::model::{Dataset, FILTER_COLUMNS, WEATHER_TYPE};
use crate::summary::DashboardSummary;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dataset,
    Visuals,
    Insights,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub dataset: Arc<Dataset>,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Indices of records passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Aggregates for the current view.
    pub summary: DashboardSummary,

    /// Selector options per filter column, `All` first.
    pub choices: Vec<(String, Vec<String>)>,

    /// Weather type colours for charts.
    pub color_map: ColorMap,

    pub tab: Tab,

    /// Number of rows in the dataset preview.
    pub preview_rows: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, selection: FilterSelection, preview_rows: usize) -> Self {
        let choices = FILTER_COLUMNS
            .iter()
            .map(|col| (col.to_string(), legal_choices(&dataset, col)))
            .collect();
        let color_map = ColorMap::new(dataset.categories(WEATHER_TYPE).unwrap_or_default());
        let outcome = apply(&dataset, &selection);
        let summary = DashboardSummary::compute(&selection, &outcome, preview_rows);
        let visible_indices = outcome.view.indices().to_vec();

        AppState {
            dataset,
            selection,
            visible_indices,
            summary,
            choices,
            color_map,
            tab: Tab::default(),
            preview_rows,
            status_message: None,
        }
    }

    /// The current view over the dataset.
    pub fn view(&self) -> View<'_> {
        View::from_indices(&self.dataset, self.visible_indices.clone())
    }

    /// Recompute the view and every aggregate after a selection change.
    pub fn refilter(&mut self) {
        let outcome = apply(&self.dataset, &self.selection);
        debug!(
            "Selection {:?} keeps {} of {} records",
            self.selection,
            outcome.view.len(),
            self.dataset.len()
        );
        self.summary = DashboardSummary::compute(&self.selection, &outcome, self.preview_rows);
        self.visible_indices = outcome.view.indices().to_vec();
    }

    /// Change one column's choice; a no-op when nothing changes.
    pub fn select(&mut self, column: &str, choice: Choice) {
        if *self.selection.get(column) == choice {
            return;
        }
        self.selection.set(column, choice);
        self.refilter();
    }

    /// Set every filter column back to `All`.
    pub fn reset_filters(&mut self) {
        if self.selection.is_all() {
            return;
        }
        self.selection = FilterSelection::new();
        self.refilter();
    }

    /// Write the current view to `path` as CSV.
    pub fn export_view(&mut self, path: &Path) -> Result<()> {
        let view = self.view();
        let rows = view.len();
        export_csv(&view, path).with_context(|| format!("exporting to {}", path.display()))?;
        self.status_message = Some(format!("Saved {rows} records to {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;
    use crate::data::model::LOCATION;

    fn state() -> AppState {
        let csv = "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n\
                   30,40,5,8,Sunny,coastal\n\
                   18,90,12,1,Rainy,inland\n\
                   32,35,4,9,Sunny,inland\n";
        let ds = Arc::new(read_csv(csv.as_bytes()).unwrap());
        AppState::new(ds, FilterSelection::new(), 20)
    }

    #[test]
    fn starts_unfiltered_with_choices() {
        let st = state();
        assert_eq!(st.visible_indices, vec![0, 1, 2]);
        assert_eq!(st.choices[0].0, WEATHER_TYPE);
        assert_eq!(st.choices[0].1, vec!["All", "Rainy", "Sunny"]);
        assert_eq!(st.choices[1].1, vec!["All", "coastal", "inland"]);
    }

    #[test]
    fn select_recomputes_view_and_summary() {
        let mut st = state();
        st.select(LOCATION, Choice::Value("inland".into()));
        assert_eq!(st.visible_indices, vec![1, 2]);
        assert_eq!(st.summary.view_records, 2);
        assert_eq!(st.view().len(), 2);

        st.reset_filters();
        assert_eq!(st.visible_indices, vec![0, 1, 2]);
        assert!(st.selection.is_all());
    }

    #[test]
    fn export_writes_current_view() {
        let mut st = state();
        st.select(WEATHER_TYPE, Choice::Value("Sunny".into()));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sunny.csv");
        st.export_view(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(st.status_message.as_deref().unwrap().starts_with("Saved 2 records"));
    }
}
