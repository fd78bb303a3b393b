use serde::Serialize;

use super::aggregate::{count_by_category, mean_by_category, CorrelationMatrix};
use super::filter::View;
use super::model::{HUMIDITY, LOCATION, TEMPERATURE, WEATHER_TYPE};

/// One statement about the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub heading: &'static str,
    pub text: String,
}

fn strength(r: f64) -> &'static str {
    match r.abs() {
        a if a >= 0.7 => "strong",
        a if a >= 0.4 => "moderate",
        _ => "weak",
    }
}

/// Derive plain-language findings from the view and its correlation matrix.
pub fn insights(view: &View, corr: &CorrelationMatrix) -> Vec<Insight> {
    if view.is_empty() {
        return vec![Insight {
            heading: "No data",
            text: "No records match the current filters.".to_string(),
        }];
    }

    let mut out = Vec::new();
    out.extend(weather_pattern(view));
    out.extend(correlations(corr));
    out.extend(temperature_by_type(view));
    out.extend(humid_location(view));
    out
}

fn weather_pattern(view: &View) -> Option<Insight> {
    let counts = count_by_category(view, WEATHER_TYPE).ok()?;
    // Ties go to the earliest category.
    let top = counts
        .iter()
        .filter(|c| c.count > 0)
        .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.value.cmp(&a.value)))?;
    let share = 100.0 * top.count as f64 / view.len() as f64;
    Some(Insight {
        heading: "Weather pattern",
        text: format!(
            "{} is the most common weather type ({} of {} records, {share:.1}%).",
            top.value,
            top.count,
            view.len()
        ),
    })
}

fn correlations(corr: &CorrelationMatrix) -> Vec<Insight> {
    let mut out = Vec::new();
    let positive = corr
        .pairs()
        .filter(|(_, _, r)| *r > 0.0)
        .max_by(|a, b| a.2.total_cmp(&b.2));
    let negative = corr
        .pairs()
        .filter(|(_, _, r)| *r < 0.0)
        .min_by(|a, b| a.2.total_cmp(&b.2));

    if let Some((a, b, r)) = positive {
        out.push(Insight {
            heading: "Correlation",
            text: format!(
                "Strongest positive correlation: {a} and {b} (r = {r:.2}, {}).",
                strength(r)
            ),
        });
    }
    if let Some((a, b, r)) = negative {
        out.push(Insight {
            heading: "Correlation",
            text: format!(
                "Strongest negative correlation: {a} and {b} (r = {r:.2}, {}).",
                strength(r)
            ),
        });
    }
    out
}

fn temperature_by_type(view: &View) -> Option<Insight> {
    let means: Vec<(String, f64)> = mean_by_category(view, TEMPERATURE, WEATHER_TYPE)
        .ok()?
        .into_iter()
        .filter_map(|(k, m)| Some((k, m?)))
        .collect();
    let hottest = means.iter().max_by(|a, b| a.1.total_cmp(&b.1))?;
    let coolest = means.iter().min_by(|a, b| a.1.total_cmp(&b.1))?;

    let text = if means.len() < 2 {
        format!(
            "Only {} records are shown; average temperature {:.1}°C.",
            hottest.0, hottest.1
        )
    } else {
        format!(
            "{} is the warmest weather type ({:.1}°C on average); {} the coolest ({:.1}°C).",
            hottest.0, hottest.1, coolest.0, coolest.1
        )
    };
    Some(Insight {
        heading: "Temperature behavior",
        text,
    })
}

fn humid_location(view: &View) -> Option<Insight> {
    let (location, humidity) = mean_by_category(view, HUMIDITY, LOCATION)
        .ok()?
        .into_iter()
        .filter_map(|(k, m)| Some((k, m?)))
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    Some(Insight {
        heading: "Location impact",
        text: format!("{location} has the highest average humidity ({humidity:.1}%)."),
    })
}
