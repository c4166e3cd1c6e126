use eframe::egui;

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ArgoExplorerApp {
    pub state: AppState,
    pub config: Config,
}

impl ArgoExplorerApp {
    pub fn new(state: AppState, config: Config) -> Self {
        Self { state, config }
    }
}

impl eframe::App for ArgoExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Selector changes from the previous frame.
        self.state.process_events();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.config);
        });

        // ---- Left side panel: selectors ----
        egui::SidePanel::left("selection_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: visible rows ----
        egui::TopBottomPanel::bottom("rows_panel")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                egui::CollapsingHeader::new("Rows")
                    .default_open(false)
                    .show(ui, |ui| {
                        table::rows_table(ui, &self.state);
                    });
            });

        // ---- Central panel: map above, profiles below ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let map_height = ui.available_height() * 0.5;
            plot::map_plot(ui, &self.state, &self.config, map_height);
            ui.separator();
            plot::profile_row(ui, &self.state, &self.config);
        });

        if self.state.has_pending_events() {
            ctx.request_repaint();
        }
    }
}
