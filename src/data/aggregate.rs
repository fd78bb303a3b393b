//! Descriptive statistics over a [`View`].
//!
//! "No data" is always `None`: a statistic over zero values, a standard
//! deviation over fewer than two, or a correlation involving a constant column.
//! Missing numeric cells are skipped.

use std::collections::HashMap;

use serde::Serialize;

use super::error::Result;
use super::filter::View;
use super::model::HEADLINE_COLUMNS;

// ---------------------------------------------------------------------------
// Column values and means
// ---------------------------------------------------------------------------

/// Non-missing values of a numeric column, in view order.
pub fn values_of(view: &View, column: &str) -> Result<Vec<f64>> {
    let idx = view.dataset().schema().numeric_position(column)?;
    Ok(view.records().filter_map(|r| r.number(idx)).collect())
}

/// Arithmetic mean of a numeric column; `None` when the view holds no values.
pub fn mean_of(view: &View, column: &str) -> Result<Option<f64>> {
    Ok(mean(&values_of(view, column)?))
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (divides by n − 1).
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Percentile `q` (0.0..=1.0) of ascending `sorted`, interpolating linearly
/// between the closest ranks.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Headline KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub column: &'static str,
    pub unit: &'static str,
    pub value: Option<f64>,
}

impl Kpi {
    /// One decimal place plus unit, or `N/A` when there is no data.
    pub fn display(&self) -> String {
        match self.value {
            Some(v) => format!("{v:.1}{}", self.unit),
            None => "N/A".to_string(),
        }
    }
}

/// Means of the four headline columns, in display order.
pub fn headline_kpis(view: &View) -> Vec<Kpi> {
    HEADLINE_COLUMNS
        .iter()
        .map(|h| Kpi {
            label: h.label,
            column: h.column,
            unit: h.unit,
            // Headline columns are checked to be numeric at load.
            value: mean_of(view, h.column).ok().flatten(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// describe()
// ---------------------------------------------------------------------------

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    fn from_values(column: &str, mut values: Vec<f64>) -> Self {
        let std = sample_std(&values);
        let mean = mean(&values);
        values.sort_by(f64::total_cmp);
        ColumnSummary {
            column: column.to_string(),
            count: values.len(),
            mean,
            std,
            min: values.first().copied(),
            q25: percentile(&values, 0.25),
            median: percentile(&values, 0.5),
            q75: percentile(&values, 0.75),
            max: values.last().copied(),
        }
    }
}

/// count, mean, std, min, quartiles and max for every numeric column.
pub fn describe(view: &View) -> Vec<ColumnSummary> {
    view.dataset()
        .schema()
        .numeric_columns()
        .map(|(idx, name)| {
            let values = view.records().filter_map(|r| r.number(idx)).collect();
            ColumnSummary::from_values(name, values)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Occurrences of every legal value of a categorical column within the view.
///
/// Order follows the dataset's sorted category list, and values absent from
/// the view are reported with a zero count so chart axes stay put.
pub fn count_by_category(view: &View, column: &str) -> Result<Vec<CategoryCount>> {
    let dataset = view.dataset();
    let idx = dataset.schema().categorical_position(column)?;
    let legal = dataset.categories(column).unwrap_or_default();

    let mut counts: HashMap<&str, usize> = legal.iter().map(|v| (v.as_str(), 0)).collect();
    for rec in view.records() {
        if let Some(c) = counts.get_mut(rec.text(idx)) {
            *c += 1;
        }
    }

    Ok(legal
        .iter()
        .map(|v| CategoryCount {
            value: v.clone(),
            count: counts[v.as_str()],
        })
        .collect())
}

/// Mean of `numeric` for every legal value of `category`, in legal order.
/// Categories with no values in the view report `None`.
pub fn mean_by_category(
    view: &View,
    numeric: &str,
    category: &str,
) -> Result<Vec<(String, Option<f64>)>> {
    let dataset = view.dataset();
    let ni = dataset.schema().numeric_position(numeric)?;
    let ci = dataset.schema().categorical_position(category)?;
    let legal = dataset.categories(category).unwrap_or_default();

    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for rec in view.records() {
        if let Some(v) = rec.number(ni) {
            groups.entry(rec.text(ci)).or_default().push(v);
        }
    }

    Ok(legal
        .iter()
        .map(|v| (v.clone(), groups.get(v.as_str()).and_then(|g| mean(g))))
        .collect())
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Symmetric Pearson correlation matrix over the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `values[i][j]` correlates `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i)?.get(j).copied().flatten()
    }

    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.get(i, j)
    }

    /// Defined off-diagonal coefficients, each pair once, as `(a, b, r)`.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        (0..self.len()).flat_map(move |i| {
            ((i + 1)..self.len()).filter_map(move |j| {
                self.get(i, j)
                    .map(|r| (self.columns[i].as_str(), self.columns[j].as_str(), r))
            })
        })
    }
}

/// Pairwise Pearson correlation between every pair of numeric columns, using
/// the rows where both cells are present.
pub fn correlation_matrix(view: &View) -> CorrelationMatrix {
    let numeric: Vec<(usize, &str)> = view.dataset().schema().numeric_columns().collect();
    let n = numeric.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        let (a, _) = numeric[i];
        values[i][i] = diagonal(view, a);
        for j in (i + 1)..n {
            let (b, _) = numeric[j];
            let r = pearson(view, a, b);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: numeric.iter().map(|(_, name)| name.to_string()).collect(),
        values,
    }
}

fn diagonal(view: &View, idx: usize) -> Option<f64> {
    let values: Vec<f64> = view.records().filter_map(|r| r.number(idx)).collect();
    let m = mean(&values)?;
    let varies = values.len() >= 2 && values.iter().any(|v| (v - m) != 0.0);
    varies.then_some(1.0)
}

fn pearson(view: &View, a: usize, b: usize) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = view
        .records()
        .filter_map(|r| Some((r.number(a)?, r.number(b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Chart-ready structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram. The last bin includes its upper edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bin count chosen with Sturges' rule.
    pub fn sturges(values: &[f64]) -> Self {
        if values.is_empty() {
            return Histogram::default();
        }
        let k = (values.len() as f64).log2().ceil() as usize + 1;
        Self::with_bins(values, k)
    }

    pub fn with_bins(values: &[f64], bins: usize) -> Self {
        if values.is_empty() || bins == 0 {
            return Histogram::default();
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max - min == 0.0 {
            return Histogram {
                bins: vec![HistogramBin {
                    lower: min - 0.5,
                    upper: max + 0.5,
                    count: values.len(),
                }],
            };
        }

        let width = (max - min) / bins as f64;
        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == bins {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();
        for v in values {
            let slot = (((v - min) / width) as usize).min(bins - 1);
            out[slot].count += 1;
        }
        Histogram { bins: out }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub category: String,
}

/// `(x, y, category)` triples; rows missing either coordinate are skipped.
pub fn scatter_points(view: &View, x: &str, y: &str, hue: &str) -> Result<Vec<ScatterPoint>> {
    let schema = view.dataset().schema();
    let xi = schema.numeric_position(x)?;
    let yi = schema.numeric_position(y)?;
    let hi = schema.categorical_position(hue)?;
    Ok(view
        .records()
        .filter_map(|r| {
            Some(ScatterPoint {
                x: r.number(xi)?,
                y: r.number(yi)?,
                category: r.text(hi).to_string(),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DataError;
    use crate::data::filter::{apply, Choice, FilterSelection};
    use crate::data::loader::read_csv;
    use crate::data::model::{Dataset, HUMIDITY, TEMPERATURE, WEATHER_TYPE};

    fn dataset() -> Dataset {
        let csv = "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n\
                   30,40,5,8,Sunny,coastal\n\
                   18,90,12,1,Rainy,inland\n\
                   32,35,4,9,Sunny,inland\n\
                   22,70,8,3,Cloudy,mountain\n\
                   19,85,15,2,Rainy,coastal\n";
        read_csv(csv.as_bytes()).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mean_of_sunny_temperatures() {
        let ds = dataset();
        let sel = FilterSelection::new().with(WEATHER_TYPE, Choice::Value("Sunny".into()));
        let out = apply(&ds, &sel);
        assert_eq!(mean_of(&out.view, TEMPERATURE).unwrap(), Some(31.0));
    }

    #[test]
    fn mean_of_rejects_bad_columns() {
        let ds = dataset();
        let view = View::all(&ds);
        assert!(matches!(mean_of(&view, WEATHER_TYPE), Err(DataError::NotNumeric(_))));
        assert!(matches!(mean_of(&view, "Dew Point"), Err(DataError::UnknownColumn(_))));
    }

    #[test]
    fn empty_view_yields_no_data() {
        let ds = dataset();
        let view = View::from_indices(&ds, Vec::new());
        assert_eq!(mean_of(&view, TEMPERATURE).unwrap(), None);

        for summary in describe(&view) {
            assert_eq!(summary.count, 0);
            assert_eq!(summary.mean, None);
            assert_eq!(summary.std, None);
            assert_eq!(summary.min, None);
            assert_eq!(summary.q25, None);
            assert_eq!(summary.median, None);
            assert_eq!(summary.q75, None);
            assert_eq!(summary.max, None);
        }

        let kpis = headline_kpis(&view);
        assert!(kpis.iter().all(|k| k.display() == "N/A"));

        let corr = correlation_matrix(&view);
        assert!(corr.values.iter().flatten().all(Option::is_none));
        assert!(Histogram::sturges(&values_of(&view, TEMPERATURE).unwrap()).bins.is_empty());
    }

    #[test]
    fn na_cells_are_skipped_by_every_aggregate() {
        let csv = "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n\
                   NaN,50,3,1,Sunny,coastal\n\
                   20,NA,4,2,Rainy,inland\n\
                   24,70,5,3,Sunny,inland\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        let view = View::all(&ds);

        assert_eq!(mean_of(&view, TEMPERATURE).unwrap(), Some(22.0));
        assert_eq!(headline_kpis(&view)[0].display(), "22.0°C");

        let stats = describe(&view);
        let t = stats.iter().find(|s| s.column == TEMPERATURE).unwrap();
        assert_eq!(t.count, 2);
        assert_eq!(t.max, Some(24.0));
        let h = stats.iter().find(|s| s.column == HUMIDITY).unwrap();
        assert_eq!(h.count, 2);

        let corr = correlation_matrix(&view);
        assert!(corr.values.iter().flatten().flatten().all(|r| r.is_finite()));
    }

    #[test]
    fn describe_matches_linear_quartiles_and_sample_std() {
        let csv = "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n\
                   1,10,0,0,Sunny,a\n\
                   2,10,0,0,Sunny,a\n\
                   3,10,0,0,Sunny,a\n\
                   4,10,0,0,Sunny,a\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        let stats = describe(&View::all(&ds));
        assert_eq!(stats.len(), 4);
        let t = &stats[0];
        assert_eq!(t.column, TEMPERATURE);
        assert_eq!(t.count, 4);
        assert_eq!(t.mean, Some(2.5));
        assert!(close(t.std.unwrap(), 1.290_994_448_735_805_6));
        assert_eq!(t.min, Some(1.0));
        assert_eq!(t.q25, Some(1.75));
        assert_eq!(t.median, Some(2.5));
        assert_eq!(t.q75, Some(3.25));
        assert_eq!(t.max, Some(4.0));
    }

    #[test]
    fn single_row_has_mean_but_no_std() {
        let ds = dataset();
        let view = View::from_indices(&ds, vec![0]);
        let t = &describe(&view)[0];
        assert_eq!(t.count, 1);
        assert_eq!(t.mean, Some(30.0));
        assert_eq!(t.std, None);
        assert_eq!(t.median, Some(30.0));
    }

    #[test]
    fn category_counts_keep_legal_order_and_zeros() {
        let ds = dataset();
        let sel = FilterSelection::new().with(WEATHER_TYPE, Choice::Value("Rainy".into()));
        let out = apply(&ds, &sel);
        let counts = count_by_category(&out.view, WEATHER_TYPE).unwrap();
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("Cloudy", 0), ("Rainy", 2), ("Sunny", 0)]);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), out.view.len());
    }

    #[test]
    fn category_counts_sum_to_view_len() {
        let ds = dataset();
        let view = View::all(&ds);
        let counts = count_by_category(&view, "Location").unwrap();
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), view.len());
        assert!(matches!(
            count_by_category(&view, TEMPERATURE),
            Err(DataError::NotCategorical(_))
        ));
    }

    #[test]
    fn mean_by_category_reports_empty_groups() {
        let ds = dataset();
        let sel = FilterSelection::new().with("Location", Choice::Value("coastal".into()));
        let out = apply(&ds, &sel);
        let means = mean_by_category(&out.view, TEMPERATURE, WEATHER_TYPE).unwrap();
        assert_eq!(
            means,
            vec![
                ("Cloudy".to_string(), None),
                ("Rainy".to_string(), Some(19.0)),
                ("Sunny".to_string(), Some(30.0)),
            ]
        );
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let ds = dataset();
        let corr = correlation_matrix(&View::all(&ds));
        assert_eq!(corr.columns, vec![TEMPERATURE, HUMIDITY, "Wind Speed", "UV Index"]);
        for i in 0..corr.len() {
            assert_eq!(corr.get(i, i), Some(1.0));
            for j in 0..corr.len() {
                assert_eq!(corr.get(i, j), corr.get(j, i));
            }
        }
        // Hot rows are dry in this sample.
        assert!(corr.get_by_name(TEMPERATURE, HUMIDITY).unwrap() < -0.9);
        assert_eq!(corr.pairs().count(), 6);
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        let csv = "Temperature,Humidity,Wind Speed,UV Index,Weather Type,Location\n\
                   1,2,3,5,Sunny,a\n\
                   2,4,2,5,Sunny,a\n\
                   3,6,1,5,Sunny,a\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        let corr = correlation_matrix(&View::all(&ds));
        assert!(close(corr.get_by_name(TEMPERATURE, HUMIDITY).unwrap(), 1.0));
        assert!(close(corr.get_by_name(TEMPERATURE, "Wind Speed").unwrap(), -1.0));
        // UV Index is constant: undefined, never a fault.
        assert_eq!(corr.get_by_name("UV Index", "UV Index"), None);
        assert_eq!(corr.get_by_name(TEMPERATURE, "UV Index"), None);
    }

    #[test]
    fn histogram_covers_every_value() {
        let values = [18.0, 19.0, 22.0, 30.0, 32.0];
        let hist = Histogram::sturges(&values);
        // ceil(log2 5) + 1
        assert_eq!(hist.bins.len(), 4);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.bins[0].lower, 18.0);
        assert_eq!(hist.bins[3].upper, 32.0);
        assert_eq!(hist.bins[3].count, 2);
    }

    #[test]
    fn histogram_of_constant_values_is_one_bin() {
        let hist = Histogram::sturges(&[5.0, 5.0, 5.0]);
        assert_eq!(
            hist.bins,
            vec![HistogramBin {
                lower: 4.5,
                upper: 5.5,
                count: 3
            }]
        );
    }

    #[test]
    fn scatter_points_carry_category() {
        let ds = dataset();
        let points = scatter_points(&View::all(&ds), TEMPERATURE, HUMIDITY, WEATHER_TYPE).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(
            points[0],
            ScatterPoint {
                x: 30.0,
                y: 40.0,
                category: "Sunny".into()
            }
        );
    }

    #[test]
    fn kpis_format_with_units() {
        let ds = dataset();
        let kpis = headline_kpis(&View::all(&ds));
        let shown: Vec<String> = kpis.iter().map(Kpi::display).collect();
        assert_eq!(shown, vec!["24.2°C", "64.0%", "8.8 km/h", "4.6"]);
    }
}
