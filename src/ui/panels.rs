use std::path::Path;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::Config;
use crate::data::filter::{FilterMode, SelectionEvent};
use crate::data::model::id_label;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – float / cycle selectors
// ---------------------------------------------------------------------------

/// Render the selector panel. Choices are queued as [`SelectionEvent`]s.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let selected_number = state.selection.selected_number;
    let selected_cycle = state.selection.selected_cycle;

    // ---- Float selector ----
    ui.strong("Float");
    let float_text = selected_number.map_or_else(|| "All floats".to_string(), id_label);
    egui::ComboBox::from_id_salt("Number")
        .width(200.0)
        .selected_text(float_text)
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(selected_number.is_none(), "All floats")
                .clicked()
            {
                state.push_event(SelectionEvent::SetFloat(None));
            }
            for &id in dataset.float_ids() {
                if ui
                    .selectable_label(selected_number == Some(id), id_label(id))
                    .clicked()
                {
                    state.push_event(SelectionEvent::SetFloat(Some(id)));
                }
            }
        });
    ui.add_space(8.0);

    // ---- Cycle selector ----
    ui.strong("Cycle");
    let cycle_text = selected_cycle.map_or_else(|| "All cycles".to_string(), id_label);
    let options = state.cycle_options.clone();
    ui.add_enabled_ui(!options.is_empty(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("cycle")
            .width(200.0)
            .selected_text(cycle_text)
            .show_ui(ui, |ui: &mut Ui| {
                if ui
                    .selectable_label(selected_cycle.is_none(), "All cycles")
                    .clicked()
                {
                    state.push_event(SelectionEvent::SetCycle(None));
                }
                for &cycle in &options {
                    if ui
                        .selectable_label(selected_cycle == Some(cycle), id_label(cycle))
                        .clicked()
                    {
                        state.push_event(SelectionEvent::SetCycle(Some(cycle)));
                    }
                }
            });
    });
    ui.separator();

    let mode = match state.selection.mode() {
        FilterMode::Overview => "Latest position of every float",
        FilterMode::Trajectory => "Track of the selected float",
        FilterMode::Profile => "Single profile",
    };
    ui.label(mode);
    ui.label(format!("{} rows shown", state.visible_indices.len()));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, config: &Config) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded ({} incomplete dropped), {} floats, {} visible",
                ds.len(),
                ds.dropped_rows(),
                ds.float_ids().len(),
                state.visible_indices.len()
            ));
        }

        ui.separator();

        ui.hyperlink_to("Download CSV", &config.csv_download_url);
        ui.hyperlink_to("Download JSON", &config.json_download_url);

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Replace the dataset with one picked by the user. A failed load keeps the
/// current dataset.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open float profiles")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        open_path(state, &path);
    }
}

fn open_path(state: &mut AppState, path: &Path) {
    match crate::data::loader::load_file(path) {
        Ok(dataset) => state.set_dataset(Arc::new(dataset)),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
