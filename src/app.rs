use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WeatherDashApp {
    pub state: AppState,
}

impl WeatherDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for WeatherDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and export ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs and tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Weather Analysis Dashboard");
            ui.separator();
            panels::kpi_row(ui, &self.state);
            ui.separator();
            tabs::tab_bar(ui, &mut self.state);
            ui.separator();
            tabs::active_tab(ui, &self.state);
        });
    }
}
