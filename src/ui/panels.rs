use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::Choice;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone the options so we can mutate state inside the loop.
    let choices = state.choices.clone();

    for (column, options) in &choices {
        ui.strong(format!("Select {column}:"));
        let current = state.selection.get(column).label().to_string();
        egui::ComboBox::from_id_salt(column.as_str())
            .selected_text(&current)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for option in options {
                    if ui.selectable_label(current == *option, option).clicked() {
                        state.select(column, Choice::from_label(option));
                    }
                }
            });
        ui.add_space(6.0);
    }

    if ui.small_button("Reset").clicked() {
        state.reset_filters();
    }

    // Only reachable from a command-line selection; the combo boxes offer legal values.
    for degradation in &state.summary.degraded {
        ui.label(RichText::new(format!("⚠ {degradation}")).color(Color32::YELLOW));
    }

    ui.separator();
    ui.label("Download filtered data");
    if ui.button("Download CSV").clicked() {
        save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export view as CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            if msg.starts_with("Error") {
                ui.label(RichText::new(msg).color(Color32::RED));
            } else {
                ui.label(msg);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Headline KPIs
// ---------------------------------------------------------------------------

/// Four headline means side by side; `N/A` when the view is empty.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    let kpis = &state.summary.kpis;
    ui.columns(kpis.len().max(1), |cols: &mut [Ui]| {
        for (col, kpi) in cols.iter_mut().zip(kpis) {
            col.label(kpi.label);
            col.heading(RichText::new(kpi.display()).strong());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name("filtered_weather_classification_data.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_view(&path) {
            log::error!("Failed to export view: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
