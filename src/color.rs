use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::id_key;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 300.0;
            let hsl = Hsl::new(hue, 0.75, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: float id / cycle number → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct label values of the map markers to distinct colours.
///
/// Values are sorted before colouring, so neighbouring cycles get
/// neighbouring hues.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: HashMap<u64, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup_by_key(|v| id_key(*v));

        let palette = generate_palette(sorted.len());
        let mapping = sorted
            .iter()
            .zip(palette)
            .map(|(v, c)| (id_key(*v), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label value.
    pub fn color_for(&self, value: f64) -> Color32 {
        self.mapping
            .get(&id_key(value))
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn repeated_values_share_a_colour() {
        let cm = ColorMap::new(&[3.0, 1.0, 3.0, 2.0]);
        let expected = generate_palette(3);
        assert_eq!(cm.color_for(1.0), expected[0]);
        assert_eq!(cm.color_for(2.0), expected[1]);
        assert_eq!(cm.color_for(3.0), expected[2]);
        assert_eq!(cm.color_for(99.0), Color32::GRAY);
    }
}
