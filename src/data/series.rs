//! Shapes a filtered row subset into the series each chart draws.

use std::collections::HashMap;

use super::filter::{FilterMode, Selection};
use super::model::{id_key, id_label, MeasurementRow};

// ---------------------------------------------------------------------------
// Map series
// ---------------------------------------------------------------------------

/// Hover label attached to a map point; which one depends on the mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapLabel {
    Float(f64),
    Cycle(f64),
    Plain,
}

impl MapLabel {
    pub fn key(&self) -> Option<f64> {
        match self {
            MapLabel::Float(v) | MapLabel::Cycle(v) => Some(*v),
            MapLabel::Plain => None,
        }
    }

    /// Series name shown in the legend and the hover text. Empty for
    /// unlabelled points.
    pub fn name(&self) -> String {
        match self {
            MapLabel::Float(v) => format!("Number: {}", id_label(*v)),
            MapLabel::Cycle(v) => format!("Cycle: {}", id_label(*v)),
            MapLabel::Plain => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub lon: f64,
    pub lat: f64,
    pub label: MapLabel,
}

/// Hover text for a map position: the series name (if any), then
/// latitude and longitude to two decimals.
pub fn map_hover_text(name: &str, lon: f64, lat: f64) -> String {
    let coords = format!("Lat: {lat:.2}\nLon: {lon:.2}");
    if name.is_empty() {
        coords
    } else {
        format!("{name}\n{coords}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSeries {
    pub mode: FilterMode,
    pub points: Vec<MapPoint>,
}

impl MapSeries {
    /// Points grouped by label, groups in first-seen order.
    pub fn groups(&self) -> Vec<(MapLabel, Vec<[f64; 2]>)> {
        let mut slot_of: HashMap<Option<u64>, usize> = HashMap::new();
        let mut groups: Vec<(MapLabel, Vec<[f64; 2]>)> = Vec::new();
        for p in &self.points {
            let key = p.label.key().map(id_key);
            let slot = *slot_of.entry(key).or_insert_with(|| {
                groups.push((p.label, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push([p.lon, p.lat]);
        }
        groups
    }

    /// `[lon, lat]` pairs in row order.
    pub fn track(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.lon, p.lat]).collect()
    }
}

/// Positions of the visible rows, labelled by float in the overview and by
/// cycle while a float is selected.
pub fn map_series(rows: &[MeasurementRow], indices: &[usize], selection: &Selection) -> MapSeries {
    let mode = selection.mode();
    let points = indices
        .iter()
        .map(|&i| {
            let r = &rows[i];
            let label = match mode {
                FilterMode::Overview => MapLabel::Float(r.file_number),
                FilterMode::Trajectory => MapLabel::Cycle(r.cycle_number),
                FilterMode::Profile => MapLabel::Plain,
            };
            MapPoint {
                lon: r.longitude,
                lat: r.latitude,
                label,
            }
        })
        .collect();
    MapSeries { mode, points }
}

// ---------------------------------------------------------------------------
// Profile series
// ---------------------------------------------------------------------------

/// The four measurements drawn against pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Salinity,
    Temperature,
    DensityAnomaly,
    SpeedOfSound,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 4] = [
        ProfileKind::Salinity,
        ProfileKind::Temperature,
        ProfileKind::DensityAnomaly,
        ProfileKind::SpeedOfSound,
    ];

    pub fn value(&self, row: &MeasurementRow) -> f64 {
        match self {
            ProfileKind::Salinity => row.psal,
            ProfileKind::Temperature => row.temp,
            ProfileKind::DensityAnomaly => row.anomaly_density(),
            ProfileKind::SpeedOfSound => row.speed_of_sound(),
        }
    }

    /// Stable widget id.
    pub fn id(&self) -> &'static str {
        match self {
            ProfileKind::Salinity => "PSU_decibar",
            ProfileKind::Temperature => "degrees_decibar",
            ProfileKind::DensityAnomaly => "anomaly_density",
            ProfileKind::SpeedOfSound => "speed_of_sound",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            ProfileKind::Salinity => "Salinity (PSU)",
            ProfileKind::Temperature => "Temperature (°C)",
            ProfileKind::DensityAnomaly => "Density anomaly",
            ProfileKind::SpeedOfSound => "Speed of sound (m/s)",
        }
    }
}

/// `(value, pres)` pairs for one chart.
///
/// Renderers must draw pressure increasing downward.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSeries {
    pub kind: ProfileKind,
    pub points: Vec<[f64; 2]>,
    /// True when `points` is the `(0, 0)` stand-in for "no cycle selected".
    pub placeholder: bool,
}

/// Build one profile chart series.
///
/// Without a complete float + cycle selection the series is the single
/// point `(0, 0)`. An empty subset gives an empty series.
pub fn profile_series(
    rows: &[MeasurementRow],
    indices: &[usize],
    selection: &Selection,
    kind: ProfileKind,
) -> ProfileSeries {
    if selection.mode() != FilterMode::Profile {
        return ProfileSeries {
            kind,
            points: vec![[0.0, 0.0]],
            placeholder: true,
        };
    }

    let points = indices
        .iter()
        .map(|&i| {
            let r = &rows[i];
            [kind.value(r), r.pres]
        })
        .collect();
    ProfileSeries {
        kind,
        points,
        placeholder: false,
    }
}

/// All four profile series in [`ProfileKind::ALL`] order.
pub fn profile_panels(
    rows: &[MeasurementRow],
    indices: &[usize],
    selection: &Selection,
) -> Vec<ProfileSeries> {
    ProfileKind::ALL
        .iter()
        .map(|&kind| profile_series(rows, indices, selection, kind))
        .collect()
}
