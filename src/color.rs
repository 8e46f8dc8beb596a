use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lab, Mix, Srgb};

pub const SKY_BLUE: Color32 = Color32::from_rgb(135, 206, 235);
pub const TREND_GREEN: Color32 = Color32::from_rgb(0, 128, 0);
pub const FIT_RED: Color32 = Color32::from_rgb(220, 20, 20);
pub const SCATTER_BLUE: Color32 = Color32::from_rgb(76, 114, 176);

const COOL: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

fn to_color32(rgb: Srgb) -> Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

fn lab((r, g, b): (u8, u8, u8)) -> Lab {
    Srgb::new(r, g, b).into_format::<f32>().into_color()
}

// ---------------------------------------------------------------------------
// Palette generators
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.65);
            to_color32(hsl.into_color())
        })
        .collect()
}

/// `n` colours running from cool blue through light grey to warm red,
/// interpolated in Lab space.
pub fn coolwarm(n: usize) -> Vec<Color32> {
    let (cool, neutral, warm) = (lab(COOL), lab(NEUTRAL), lab(WARM));
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.5 };
            let mixed = if t < 0.5 {
                cool.mix(neutral, t * 2.0)
            } else {
                neutral.mix(warm, (t - 0.5) * 2.0)
            };
            to_color32(mixed.into_color())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: categorical value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column to colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Pair each value with the palette entry at the same position.
    pub fn new<'a>(values: impl IntoIterator<Item = &'a str>, palette: Vec<Color32>) -> Self {
        let mapping = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.to_string(), c))
            .collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Distinct hues, for unordered categories.
    pub fn qualitative(values: &[&str]) -> Self {
        Self::new(values.iter().copied(), generate_palette(values.len()))
    }

    /// Cool-to-warm ramp, in the order the values are given.
    pub fn diverging(values: &[&str]) -> Self {
        Self::new(values.iter().copied(), coolwarm(values.len()))
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_have_requested_length() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(6).len(), 6);
        assert_eq!(coolwarm(4).len(), 4);
    }

    #[test]
    fn coolwarm_runs_from_blue_to_red() {
        let ramp = coolwarm(3);
        let (first, last) = (ramp[0], ramp[2]);
        assert!(first.b() > first.r(), "first colour should be cool: {first:?}");
        assert!(last.r() > last.b(), "last colour should be warm: {last:?}");
        // Midpoint is the neutral grey.
        let mid = ramp[1];
        assert!(mid.r().abs_diff(mid.b()) < 8, "midpoint should be grey: {mid:?}");
    }

    #[test]
    fn qualitative_colours_are_distinct() {
        let palette = generate_palette(4);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_value_falls_back_to_grey() {
        let cm = ColorMap::diverging(&["Spring", "Summer"]);
        assert_ne!(cm.color_for("Spring"), cm.color_for("Summer"));
        assert_eq!(cm.color_for("Monsoon"), Color32::GRAY);
    }
}
