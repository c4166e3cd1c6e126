use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, valid_cycles, FilterMode, Selection, SelectionEvent};
use crate::data::model::Dataset;
use crate::data::series::{map_series, profile_panels, MapLabel, MapSeries, ProfileSeries};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The state of one dashboard session, independent of rendering.
///
/// The dataset is a shared read-only handle; the selection and every cache
/// derived from it belong to this session alone.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    pub selection: Selection,

    /// Selector changes not yet applied.
    pending: Vec<SelectionEvent>,

    /// Choices for the cycle selector (valid cycles of the selected float).
    pub cycle_options: Vec<f64>,

    /// Indices of rows passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    pub map: MapSeries,
    pub profiles: Vec<ProfileSeries>,

    /// Colours for the map labels of the current mode.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: Selection::default(),
            pending: Vec::new(),
            cycle_options: Vec::new(),
            visible_indices: Vec::new(),
            map: MapSeries {
                mode: FilterMode::Overview,
                points: Vec::new(),
            },
            profiles: Vec::new(),
            color_map: ColorMap::new(&[]),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the selection.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.dataset = Some(dataset);
        self.selection = Selection::default();
        self.pending.clear();
        self.cycle_options.clear();
        self.status_message = None;
        self.refresh();
    }

    /// Queue a selector change; applied on the next [`AppState::process_events`].
    pub fn push_event(&mut self, event: SelectionEvent) {
        self.pending.push(event);
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply queued events in order, then recompute the views once.
    pub fn process_events(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.pending);
        for event in events {
            self.apply(event);
        }
        self.refresh();
    }

    fn apply(&mut self, event: SelectionEvent) {
        log::debug!("Selection event {event:?}");
        self.selection.apply(event);
        if let SelectionEvent::SetFloat(id) = event {
            self.cycle_options = match (&self.dataset, id) {
                (Some(ds), Some(id)) => valid_cycles(ds, id),
                _ => Vec::new(),
            };
        }
    }

    /// Recompute the visible rows, map and profile series.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.selection);
        self.map = map_series(ds.rows(), &self.visible_indices, &self.selection);
        self.profiles = profile_panels(ds.rows(), &self.visible_indices, &self.selection);

        let labels: Vec<f64> = self.map.points.iter().filter_map(|p| p.label.key()).collect();
        self.color_map = ColorMap::new(&labels);

        log::debug!(
            "{:?} view: {} rows visible",
            self.selection.mode(),
            self.visible_indices.len()
        );
    }

    /// Colour of a map label under the current colour map.
    pub fn label_color(&self, label: &MapLabel) -> Option<eframe::egui::Color32> {
        label.key().map(|k| self.color_map.color_for(k))
    }
}
