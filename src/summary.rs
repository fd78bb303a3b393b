use serde::Serialize;

use crate::data::aggregate::{
    correlation_matrix, count_by_category, describe, headline_kpis, scatter_points, values_of,
    CategoryCount, ColumnSummary, CorrelationMatrix, Histogram, Kpi, ScatterPoint,
};
use crate::data::filter::{Degradation, FilterOutcome, FilterSelection};
use crate::data::insights::{insights, Insight};
use crate::data::model::{HUMIDITY, TEMPERATURE, WEATHER_TYPE};

// ---------------------------------------------------------------------------
// Everything the dashboard shows for one filter selection
// ---------------------------------------------------------------------------

/// Aggregates for the current view, rebuilt from scratch on every filter change.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub selection: FilterSelection,
    pub degraded: Vec<Degradation>,
    pub total_records: usize,
    pub view_records: usize,
    pub kpis: Vec<Kpi>,
    /// First rows of the view, raw text per column.
    pub preview: Vec<Vec<String>>,
    pub describe: Vec<ColumnSummary>,
    pub weather_counts: Vec<CategoryCount>,
    #[serde(skip)]
    pub temperature_values: Vec<f64>,
    pub temperature_histogram: Histogram,
    #[serde(skip)]
    pub scatter: Vec<ScatterPoint>,
    pub correlation: CorrelationMatrix,
    pub insights: Vec<Insight>,
}

impl DashboardSummary {
    pub fn compute(
        selection: &FilterSelection,
        outcome: &FilterOutcome,
        preview_rows: usize,
    ) -> Self {
        let view = &outcome.view;
        let temperature_values = values_of(view, TEMPERATURE).unwrap_or_default();
        let correlation = correlation_matrix(view);

        DashboardSummary {
            selection: selection.clone(),
            degraded: outcome.degraded.clone(),
            total_records: view.dataset().len(),
            view_records: view.len(),
            kpis: headline_kpis(view),
            preview: view
                .head(preview_rows)
                .map(|r| r.raw().iter().map(str::to_string).collect())
                .collect(),
            describe: describe(view),
            weather_counts: count_by_category(view, WEATHER_TYPE).unwrap_or_default(),
            temperature_histogram: Histogram::sturges(&temperature_values),
            temperature_values,
            scatter: scatter_points(view, TEMPERATURE, HUMIDITY, WEATHER_TYPE).unwrap_or_default(),
            insights: insights(view, &correlation),
            correlation,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
