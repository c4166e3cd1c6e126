use std::collections::HashSet;

use crate::error::DataError;

use super::loader::parse_number;
use super::model::{id_key, Dataset};

// ---------------------------------------------------------------------------
// Selection – the two live selector values
// ---------------------------------------------------------------------------

/// Per-session selector state. `None` means "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Selection {
    pub selected_number: Option<f64>,
    pub selected_cycle: Option<f64>,
}

/// Inbound selector changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    /// Choose a float (or clear it with `None`). Always clears the cycle.
    SetFloat(Option<f64>),
    /// Choose a cycle (or clear it with `None`).
    SetCycle(Option<f64>),
}

impl Selection {
    pub fn apply(&mut self, event: SelectionEvent) {
        match event {
            SelectionEvent::SetFloat(id) => {
                self.selected_number = id;
                self.selected_cycle = None;
            }
            SelectionEvent::SetCycle(cycle) => {
                self.selected_cycle = cycle;
            }
        }
    }

    pub fn mode(&self) -> FilterMode {
        match (self.selected_number, self.selected_cycle) {
            (None, _) => FilterMode::Overview,
            (Some(_), None) => FilterMode::Trajectory,
            (Some(_), Some(_)) => FilterMode::Profile,
        }
    }
}

/// Which view the current selection produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// No float chosen: latest cycle of every float.
    Overview,
    /// A float but no cycle: that float's whole track.
    Trajectory,
    /// Float and cycle: a single profile.
    Profile,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Parse a selector value typed as text, using the same coercion as the
/// loader so `"3"` and `3.0` compare equal.
pub fn coerce_id(text: &str) -> Result<f64, DataError> {
    parse_number(text).ok_or_else(|| DataError::InvalidSelection(text.to_string()))
}

/// Distinct cycle numbers recorded for a float, in first-seen order.
pub fn valid_cycles(dataset: &Dataset, file_number: f64) -> Vec<f64> {
    let mut seen = HashSet::new();
    dataset
        .rows()
        .iter()
        .filter(|r| r.file_number == file_number)
        .map(|r| r.cycle_number)
        .filter(|&c| seen.insert(id_key(c)))
        .collect()
}

/// Indices of the rows to visualise for a selection.
///
/// A float or cycle with no matching rows yields an empty list.
pub fn filtered_indices(dataset: &Dataset, selection: &Selection) -> Vec<usize> {
    let Some(number) = selection.selected_number else {
        return dataset.latest_indices().to_vec();
    };

    dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.file_number == number)
        .filter(|(_, r)| match selection.selected_cycle {
            Some(cycle) => r.cycle_number == cycle,
            None => true,
        })
        .map(|(i, _)| i)
        .collect()
}
