use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::coolwarm;
use crate::data::aggregate::ColumnSummary;
use crate::data::model::WEATHER_TYPE;
use crate::state::{AppState, Tab};

const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(255, 165, 0);
const PLOT_HEIGHT: f32 = 240.0;

/// Tab selector under the KPI row.
pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Dataset, "📄 Dataset");
        ui.selectable_value(&mut state.tab, Tab::Visuals, "📊 Visual Analysis");
        ui.selectable_value(&mut state.tab, Tab::Insights, "🧠 Insights");
    });
}

/// Render whichever tab is selected.
pub fn active_tab(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Dataset => dataset_tab(ui, state),
            Tab::Visuals => visuals_tab(ui, state),
            Tab::Insights => insights_tab(ui, state),
        });
}

// ---------------------------------------------------------------------------
// Dataset tab
// ---------------------------------------------------------------------------

fn dataset_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Dataset Preview");
    if state.summary.preview.is_empty() {
        ui.label("No records match the current filters.");
    } else {
        ui.push_id("preview_table", |ui: &mut Ui| preview_table(ui, state));
    }

    ui.add_space(12.0);
    ui.heading("Data Summary");
    ui.push_id("describe_table", |ui: &mut Ui| {
        describe_table(ui, &state.summary.describe)
    });
}

fn preview_table(ui: &mut Ui, state: &AppState) {
    let headers: Vec<&str> = state.dataset.headers().iter().collect();
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0), headers.len())
        .header(20.0, |mut header| {
            for name in &headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|mut body| {
            for row in &state.summary.preview {
                body.row(18.0, |mut cells| {
                    for value in row {
                        cells.col(|ui: &mut Ui| {
                            ui.label(value);
                        });
                    }
                });
            }
        });
}

fn fmt_stat(v: Option<f64>) -> String {
    v.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

/// Statistics as rows, numeric columns as table columns.
fn describe_table(ui: &mut Ui, stats: &[ColumnSummary]) {
    type Getter = fn(&ColumnSummary) -> String;
    let rows: [(&str, Getter); 8] = [
        ("count", |s| s.count.to_string()),
        ("mean", |s| fmt_stat(s.mean)),
        ("std", |s| fmt_stat(s.std)),
        ("min", |s| fmt_stat(s.min)),
        ("25%", |s| fmt_stat(s.q25)),
        ("50%", |s| fmt_stat(s.median)),
        ("75%", |s| fmt_stat(s.q75)),
        ("max", |s| fmt_stat(s.max)),
    ];

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(50.0))
        .columns(Column::auto().at_least(80.0), stats.len())
        .header(20.0, |mut header| {
            header.col(|_ui: &mut Ui| {});
            for s in stats {
                header.col(|ui: &mut Ui| {
                    ui.strong(&s.column);
                });
            }
        })
        .body(|mut body| {
            for (name, get) in rows {
                body.row(18.0, |mut cells| {
                    cells.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                    for s in stats {
                        cells.col(|ui: &mut Ui| {
                            ui.label(get(s));
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Visual analysis tab
// ---------------------------------------------------------------------------

fn visuals_tab(ui: &mut Ui, state: &AppState) {
    let summary = &state.summary;

    ui.heading("🌡 Temperature Distribution");
    let bars: Vec<Bar> = summary
        .temperature_histogram
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                .width(b.upper - b.lower)
                .name(format!("{:.1} – {:.1}", b.lower, b.upper))
        })
        .collect();
    Plot::new("temperature_histogram")
        .height(PLOT_HEIGHT)
        .x_axis_label("Temperature (°C)")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Temperature").color(HISTOGRAM_COLOR));
        });

    ui.add_space(8.0);
    ui.heading("☁ Weather Type Count");
    Plot::new("weather_type_count")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            for (i, c) in summary.weather_counts.iter().enumerate() {
                let bar = Bar::new(i as f64, c.count as f64).width(0.7);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(&c.value)
                        .color(state.color_map.color_for(&c.value)),
                );
            }
        });

    ui.add_space(8.0);
    ui.heading("💧 Humidity vs Temperature");
    let categories = state.dataset.categories(WEATHER_TYPE).unwrap_or_default();
    Plot::new("humidity_scatter")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Temperature (°C)")
        .y_axis_label("Humidity (%)")
        .show(ui, |plot_ui| {
            for category in categories {
                let points: Vec<[f64; 2]> = summary
                    .scatter
                    .iter()
                    .filter(|p| p.category == *category)
                    .map(|p| [p.x, p.y])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(category)
                        .color(state.color_map.color_for(category))
                        .radius(3.0),
                );
            }
        });

    ui.add_space(8.0);
    ui.heading("🔥 Correlation Heatmap");
    correlation_grid(ui, state);
}

fn correlation_grid(ui: &mut Ui, state: &AppState) {
    let corr = &state.summary.correlation;
    egui::Grid::new("correlation_grid")
        .spacing([2.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for name in &corr.columns {
                ui.strong(name);
            }
            ui.end_row();

            for (i, name) in corr.columns.iter().enumerate() {
                ui.strong(name);
                for j in 0..corr.len() {
                    let r = corr.get(i, j);
                    let text = r.map_or_else(|| " N/A ".to_string(), |r| format!("{r:+.2}"));
                    ui.label(
                        RichText::new(text)
                            .monospace()
                            .color(Color32::BLACK)
                            .background_color(coolwarm(r)),
                    );
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Insights tab
// ---------------------------------------------------------------------------

fn insights_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("🧠 Key Insights from the Data");
    for insight in &state.summary.insights {
        ui.add_space(4.0);
        ui.strong(insight.heading);
        ui.label(format!("• {}", insight.text));
    }
}
