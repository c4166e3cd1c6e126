//! Derived physical quantities of sea water.
//!
//! Both quantities are pure, row-independent functions of the source
//! columns. They are total over finite inputs; non-finite inputs propagate
//! into non-finite outputs without an error.

use super::model::{MeasurementRow, RawRow};

// ---------------------------------------------------------------------------
// Density anomaly (UNESCO simplified)
// ---------------------------------------------------------------------------

/// Density anomaly (sigma) from temperature `t` and practical salinity `s`.
pub fn anomaly_density(t: f64, s: f64) -> f64 {
    28.132 - 0.0734 * t - 0.00469 * t.powi(2) + (0.803 - 0.002 * t) * (s - 35.0)
}

// ---------------------------------------------------------------------------
// Speed of sound (Chen & Millero, UNESCO 1977/1983 coefficients)
// ---------------------------------------------------------------------------

pub const C00: f64 = 1402.388;
pub const C01: f64 = 5.03830;
pub const C02: f64 = -5.81090E-2;
pub const C03: f64 = 3.3432E-4;
pub const C04: f64 = -1.47797E-6;
pub const C05: f64 = 3.1419E-9;
pub const C10: f64 = 0.153563;
pub const C11: f64 = 6.8999E-4;
pub const C12: f64 = -8.1829E-6;
pub const C13: f64 = 1.3632E-7;
pub const C14: f64 = -6.1260E-10;
pub const C20: f64 = 3.1260E-5;
pub const C21: f64 = -1.7111E-6;
pub const C22: f64 = 2.5986E-8;
pub const C23: f64 = -2.5353E-10;
pub const C24: f64 = 1.0415E-12;
pub const C30: f64 = -9.7729E-9;
pub const C31: f64 = 3.8513E-10;
pub const C32: f64 = -2.3654E-12;

pub const A00: f64 = 1.389;
pub const A01: f64 = -1.262E-2;
pub const A02: f64 = 7.166E-5;
pub const A03: f64 = 2.008E-6;
pub const A04: f64 = -3.21E-8;
pub const A10: f64 = 9.4742E-5;
pub const A11: f64 = -1.2583E-5;
pub const A12: f64 = -6.4928E-8;
pub const A13: f64 = 1.0515E-8;
pub const A14: f64 = -2.0142E-10;
pub const A20: f64 = -3.9064E-7;
pub const A21: f64 = 9.1061E-9;
pub const A22: f64 = -1.6009E-10;
pub const A23: f64 = 7.994E-12;
pub const A30: f64 = 1.100E-10;
pub const A31: f64 = 6.651E-12;
pub const A32: f64 = -3.391E-13;

pub const B00: f64 = -1.922E-2;
pub const B01: f64 = -4.42E-5;
pub const B10: f64 = 7.3637E-5;
pub const B11: f64 = 1.7950E-7;

pub const D00: f64 = 1.727E-3;
pub const D10: f64 = -7.9836E-6;

/// `c[0] + c[1]*t + c[2]*t^2 + ...`
fn poly(t: f64, coefficients: &[f64]) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| c * t.powi(i as i32))
        .sum()
}

/// Pure-water term `Cw(T, P)`.
fn cw(t: f64, p: f64) -> f64 {
    poly(t, &[C00, C01, C02, C03, C04, C05])
        + poly(t, &[C10, C11, C12, C13, C14]) * p
        + poly(t, &[C20, C21, C22, C23, C24]) * p.powi(2)
        + poly(t, &[C30, C31, C32]) * p.powi(3)
}

/// Linear salinity coefficient `A(T, P)`.
fn a(t: f64, p: f64) -> f64 {
    poly(t, &[A00, A01, A02, A03, A04])
        + poly(t, &[A10, A11, A12, A13, A14]) * p
        + poly(t, &[A20, A21, A22, A23]) * p.powi(2)
        + poly(t, &[A30, A31, A32]) * p.powi(3)
}

fn b(t: f64, p: f64) -> f64 {
    B00 + B01 * t + (B10 + B11 * t) * p
}

fn d(p: f64) -> f64 {
    D00 + D10 * p
}

/// Speed of sound from temperature `t`, pressure `p` (the `pres` column as
/// stored) and practical salinity `s`.
pub fn speed_of_sound(t: f64, p: f64, s: f64) -> f64 {
    cw(t, p) + a(t, p) * s + b(t, p) * s.powf(1.5) + d(p) * s.powi(2)
}

// ---------------------------------------------------------------------------
// Row augmentation
// ---------------------------------------------------------------------------

/// Attach the derived columns to a source row.
pub fn augment(raw: RawRow) -> MeasurementRow {
    MeasurementRow {
        file_number: raw.file_number,
        cycle_number: raw.cycle_number,
        latitude: raw.latitude,
        longitude: raw.longitude,
        pres: raw.pres,
        temp: raw.temp,
        psal: raw.psal,
        anomaly_density: anomaly_density(raw.temp, raw.psal),
        speed_of_sound: speed_of_sound(raw.temp, raw.pres, raw.psal),
    }
}
