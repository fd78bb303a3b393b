use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Category → Color32
// ---------------------------------------------------------------------------

/// Stable colours for the values of one categorical column (`Weather Type`
/// in the dashboard).
/// Built from the full dataset so a category keeps its colour across filters.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(categories: &[String]) -> Self {
        let mapping = categories
            .iter()
            .cloned()
            .zip(generate_palette(categories.len()))
            .collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Diverging ramp for correlation cells
// ---------------------------------------------------------------------------

const COOL: [f32; 3] = [59.0, 76.0, 192.0];
const NEUTRAL: [f32; 3] = [221.0, 221.0, 221.0];
const WARM: [f32; 3] = [180.0, 4.0, 38.0];

/// Blue for −1, light grey for 0, red for +1. `None` renders dark grey.
pub fn coolwarm(r: Option<f64>) -> Color32 {
    let Some(r) = r else {
        return Color32::DARK_GRAY;
    };
    let t = r.clamp(-1.0, 1.0) as f32;
    let (from, to, f) = if t < 0.0 {
        (NEUTRAL, COOL, -t)
    } else {
        (NEUTRAL, WARM, t)
    };
    let mix = |i: usize| (from[i] + (to[i] - from[i]) * f).round() as u8;
    Color32::from_rgb(mix(0), mix(1), mix(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_category_uses_default() {
        let cats = vec!["Cloudy".to_string(), "Sunny".to_string()];
        let map = ColorMap::new(&cats);
        assert_ne!(map.color_for("Cloudy"), map.color_for("Sunny"));
        assert_eq!(map.color_for("Blizzard"), Color32::GRAY);
    }

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(Some(-1.0)), Color32::from_rgb(59, 76, 192));
        assert_eq!(coolwarm(Some(0.0)), Color32::from_rgb(221, 221, 221));
        assert_eq!(coolwarm(Some(1.0)), Color32::from_rgb(180, 4, 38));
        assert_eq!(coolwarm(None), Color32::DARK_GRAY);
    }
}
