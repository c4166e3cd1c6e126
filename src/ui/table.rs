use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{id_label, MeasurementRow};
use crate::state::AppState;

const HEADERS: [&str; 9] = [
    "fileNumber",
    "cycle_number",
    "latitude",
    "longitude",
    "pres",
    "temp",
    "psal",
    "anomaly_density",
    "speed_of_sound",
];

fn cells(row: &MeasurementRow) -> [String; 9] {
    [
        id_label(row.file_number),
        id_label(row.cycle_number),
        format!("{:.3}", row.latitude),
        format!("{:.3}", row.longitude),
        format!("{:.1}", row.pres),
        format!("{:.3}", row.temp),
        format!("{:.3}", row.psal),
        format!("{:.4}", row.anomaly_density()),
        format!("{:.2}", row.speed_of_sound()),
    ]
}

/// Render the currently visible rows, derived columns included.
pub fn rows_table(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let rows = ds.rows();
    let visible = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(80.0), HEADERS.len())
        .min_scrolled_height(0.0)
        .header(20.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, visible.len(), |mut table_row| {
                let row = &rows[visible[table_row.index()]];
                for text in cells(row) {
                    table_row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::two_float_dataset;

    #[test]
    fn cells_follow_header_order() {
        let ds = two_float_dataset();
        let row = &ds.rows()[0];
        let c = cells(row);
        assert_eq!(c.len(), HEADERS.len());
        assert_eq!(c[0], "1");
        assert_eq!(c[4], "5.0");
        assert_eq!(c[7], format!("{:.4}", row.anomaly_density()));
    }
}
