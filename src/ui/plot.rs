use eframe::egui::{Color32, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points};

use crate::config::Config;
use crate::data::filter::FilterMode;
use crate::data::series::{map_hover_text, ProfileSeries};
use crate::state::AppState;

const TRACK_COLOR: Color32 = Color32::from_gray(140);
const PROFILE_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

/// Plot id salt per selection, so each new view starts auto-fitted.
fn view_id(state: &AppState) -> (Option<u64>, Option<u64>) {
    (
        state.selection.selected_number.map(f64::to_bits),
        state.selection.selected_cycle.map(f64::to_bits),
    )
}

// ---------------------------------------------------------------------------
// Map (top of the central panel)
// ---------------------------------------------------------------------------

/// Render float positions as a longitude / latitude scatter.
pub fn map_plot(ui: &mut Ui, state: &AppState, config: &Config, height: f32) {
    let message = match &state.dataset {
        None => Some("Open a file to view float profiles  (File → Open…)"),
        Some(ds) if ds.is_empty() => Some("The dataset has no complete rows"),
        Some(_) => None,
    };
    if let Some(message) = message {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    }

    let map = &state.map;
    let [center_lon, center_lat] = config.map_center;
    let span = config.map_span;

    let mut plot = Plot::new(("map", view_id(state)))
        .height(height)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(|name, value| map_hover_text(name, value.x, value.y))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if map.mode == FilterMode::Overview {
        plot = plot
            .include_x(center_lon - span)
            .include_x(center_lon + span)
            .include_y(center_lat - span / 2.0)
            .include_y((center_lat + span / 2.0).min(90.0));
    }

    plot.show(ui, |plot_ui| {
        if map.mode != FilterMode::Overview && map.points.len() > 1 {
            let track: PlotPoints = map.track().into();
            plot_ui.line(Line::new(track).color(TRACK_COLOR).width(1.0));
        }

        for (label, positions) in map.groups() {
            let color = state.label_color(&label).unwrap_or(PROFILE_COLOR);
            let points: PlotPoints = positions.into();
            plot_ui.points(
                Points::new(points)
                    .name(label.name())
                    .color(color)
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(config.marker_radius),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Profiles (bottom of the central panel)
// ---------------------------------------------------------------------------

/// Render the four profile charts side by side.
pub fn profile_row(ui: &mut Ui, state: &AppState, config: &Config) {
    if state.profiles.is_empty() {
        return;
    }
    let salt = view_id(state);
    ui.columns(state.profiles.len(), |columns| {
        for (ui, series) in columns.iter_mut().zip(&state.profiles) {
            profile_plot(ui, series, config, salt);
        }
    });
}

/// One measurement against pressure, with pressure increasing downward.
///
/// Points are drawn at `(value, -pres)` and the y ticks print the negated
/// value, so the axis reads as positive decibars.
pub fn profile_plot(
    ui: &mut Ui,
    series: &ProfileSeries,
    config: &Config,
    salt: impl std::hash::Hash,
) {
    let kind = series.kind;
    ui.strong(kind.axis_label());

    Plot::new((kind.id(), salt))
        .x_axis_label(kind.axis_label())
        .y_axis_label("Pressure (dbar)")
        .y_axis_formatter(|mark, _range| format!("{}", 0.0 - mark.value))
        .label_formatter(move |_name, value| {
            format!(
                "{}: {:.3}\npres: {:.1}",
                kind.axis_label(),
                value.x,
                -value.y
            )
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let depth_down: Vec<[f64; 2]> =
                series.points.iter().map(|&[x, p]| [x, 0.0 - p]).collect();

            let line: PlotPoints = depth_down.clone().into();
            plot_ui.line(Line::new(line).color(PROFILE_COLOR).width(1.5));

            if !series.placeholder {
                let markers: PlotPoints = depth_down.into();
                plot_ui.points(
                    Points::new(markers)
                        .color(PROFILE_COLOR)
                        .filled(true)
                        .radius(config.marker_radius),
                );
            }
        });
}
