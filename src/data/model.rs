use std::collections::HashSet;

use super::{derived, latest};

// ---------------------------------------------------------------------------
// Identifier helpers
// ---------------------------------------------------------------------------

/// Hashable key for a float identifier or cycle number.
///
/// Two keys are equal exactly when the values compare equal with `==`
/// (`-0.0` and `0.0` share a key).
pub fn id_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Display label for a float identifier or cycle number (`6901234`, not `6901234.0`).
pub fn id_label(value: f64) -> String {
    format!("{value}")
}

// ---------------------------------------------------------------------------
// RawRow – one complete source record, before augmentation
// ---------------------------------------------------------------------------

/// The seven source columns of a reading, already coerced to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRow {
    pub file_number: f64,
    pub cycle_number: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub pres: f64,
    pub temp: f64,
    pub psal: f64,
}

// ---------------------------------------------------------------------------
// MeasurementRow – one reading at one depth, one cycle, one float
// ---------------------------------------------------------------------------

/// A source reading plus its derived quantities.
///
/// The derived fields can only be produced by [`derived::augment`], so they
/// always agree with `temp`, `psal` and `pres` of the same row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRow {
    pub file_number: f64,
    pub cycle_number: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Pressure in decibars, used as the depth coordinate.
    pub pres: f64,
    pub temp: f64,
    /// Practical salinity.
    pub psal: f64,
    pub(super) anomaly_density: f64,
    pub(super) speed_of_sound: f64,
}

impl MeasurementRow {
    pub fn anomaly_density(&self) -> f64 {
        self.anomaly_density
    }

    pub fn speed_of_sound(&self) -> f64 {
        self.speed_of_sound
    }

    /// The source columns of this row.
    pub fn raw(&self) -> RawRow {
        RawRow {
            file_number: self.file_number,
            cycle_number: self.cycle_number,
            latitude: self.latitude,
            longitude: self.longitude,
            pres: self.pres,
            temp: self.temp,
            psal: self.psal,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded and augmented dataset
// ---------------------------------------------------------------------------

/// The full dataset, augmented and indexed once; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<MeasurementRow>,
    float_ids: Vec<f64>,
    latest: Vec<usize>,
    dropped_rows: usize,
}

impl Dataset {
    /// Augment the loaded rows and build the float list and latest-cycle index.
    pub fn new(raw: Vec<RawRow>, dropped_rows: usize) -> Self {
        let rows: Vec<MeasurementRow> = raw.into_iter().map(derived::augment).collect();

        let mut seen = HashSet::new();
        let float_ids = rows
            .iter()
            .map(|r| r.file_number)
            .filter(|&id| seen.insert(id_key(id)))
            .collect();

        let latest = latest::latest_cycle_index(&rows);

        Dataset {
            rows,
            float_ids,
            latest,
            dropped_rows,
        }
    }

    /// All rows in source order.
    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    /// Distinct float identifiers in first-seen order.
    pub fn float_ids(&self) -> &[f64] {
        &self.float_ids
    }

    /// Row indices of the latest-cycle index, one per float.
    pub fn latest_indices(&self) -> &[usize] {
        &self.latest
    }

    /// Number of source rows discarded for missing values.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(file_number: f64, cycle_number: f64, pres: f64) -> RawRow {
        RawRow {
            file_number,
            cycle_number,
            latitude: 60.0 + cycle_number * 0.1,
            longitude: 20.0 + cycle_number * 0.2,
            pres,
            temp: 5.0,
            psal: 34.9,
        }
    }

    /// Floats {1.0, 2.0}; float 1.0 has cycles {1,2,3}, float 2.0 has cycles {1,2}.
    pub(crate) fn two_float_dataset() -> Dataset {
        Dataset::new(
            vec![
                raw(1.0, 1.0, 5.0),
                raw(1.0, 1.0, 10.0),
                raw(2.0, 1.0, 5.0),
                raw(1.0, 2.0, 5.0),
                raw(1.0, 2.0, 10.0),
                raw(2.0, 2.0, 5.0),
                raw(1.0, 3.0, 5.0),
            ],
            0,
        )
    }

    #[test]
    fn float_ids_keep_first_seen_order() {
        let ds = Dataset::new(vec![raw(7.0, 1.0, 0.0), raw(3.0, 1.0, 0.0), raw(7.0, 2.0, 0.0)], 2);
        assert_eq!(ds.float_ids(), &[7.0, 3.0]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.dropped_rows(), 2);
    }

    #[test]
    fn rows_are_augmented_on_construction() {
        let ds = Dataset::new(vec![raw(1.0, 1.0, 0.0)], 0);
        let row = ds.rows()[0];
        assert_eq!(row.anomaly_density(), derived::anomaly_density(row.temp, row.psal));
        assert_eq!(
            row.speed_of_sound(),
            derived::speed_of_sound(row.temp, row.pres, row.psal)
        );
        assert_eq!(row.raw(), raw(1.0, 1.0, 0.0));
    }

    #[test]
    fn zero_identifiers_share_a_key() {
        assert_eq!(id_key(0.0), id_key(-0.0));
        assert_ne!(id_key(1.0), id_key(2.0));
        assert_eq!(id_label(6901234.0), "6901234");
        assert_eq!(id_label(12.5), "12.5");
    }
}
