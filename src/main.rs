mod app;
mod color;
mod data;
mod state;
mod summary;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use app::WeatherDashApp;
use clap::Parser;
use eframe::egui;
use log::info;

use data::cache::DatasetCache;
use data::export::export_csv;
use data::filter::{apply, Choice, FilterSelection};
use data::model::{LOCATION, WEATHER_TYPE};
use state::AppState;
use summary::DashboardSummary;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Weather dataset (.csv or .parquet)
    #[arg(short, long, default_value = "weather_classification_data.csv")]
    data: PathBuf,

    /// Initial Weather Type filter
    #[arg(long, default_value = "All")]
    weather_type: String,

    /// Initial Location filter
    #[arg(long, default_value = "All")]
    location: String,

    /// Write the filtered rows to this CSV file and exit
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the dashboard summary as JSON and exit
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Rows shown in the dataset preview
    #[arg(long, default_value_t = 20)]
    preview_rows: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cache = DatasetCache::new(&args.data);
    let dataset = cache
        .get_or_load()
        .with_context(|| format!("loading {}", cache.path().display()))?;

    let selection = FilterSelection::new()
        .with(WEATHER_TYPE, Choice::from_label(&args.weather_type))
        .with(LOCATION, Choice::from_label(&args.location));

    if args.export.is_some() || args.summary {
        let outcome = apply(&dataset, &selection);
        if let Some(path) = &args.export {
            export_csv(&outcome.view, path)
                .with_context(|| format!("exporting to {}", path.display()))?;
        }
        if args.summary {
            let summary = DashboardSummary::compute(&selection, &outcome, args.preview_rows);
            println!("{}", summary.to_json()?);
        }
        return Ok(());
    }

    let state = AppState::new(dataset, selection, args.preview_rows);
    info!("Opening dashboard with {} visible records", state.visible_indices.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Weather Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(WeatherDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
