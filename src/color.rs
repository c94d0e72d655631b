use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Column;

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
// Metric colours: Column → Color32
// ---------------------------------------------------------------------------

/// Fixed line colour per metric so a metric keeps its colour while other
/// metrics are toggled.
#[derive(Debug, Clone)]
pub struct MetricColors {
    mapping: BTreeMap<Column, Color32>,
    default_color: Color32,
}

impl Default for MetricColors {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricColors {
    pub fn new() -> Self {
        let fixed = [
            (Column::BatteryPower, Color32::from_rgb(31, 119, 220)),
            (Column::RiderPower, Color32::from_rgb(220, 50, 47)),
            (Column::BatteryVoltage, Color32::from_rgb(44, 160, 44)),
            (Column::Speed, Color32::from_rgb(255, 150, 20)),
        ];
        let rest: Vec<Column> = Column::METRICS
            .iter()
            .copied()
            .filter(|c| fixed.iter().all(|(f, _)| f != c))
            .collect();

        // Offset hues away from the fixed ones above.
        let mut mapping: BTreeMap<Column, Color32> = fixed.into_iter().collect();
        let palette = generate_palette(rest.len() * 2);
        for (column, color) in rest.into_iter().zip(palette.into_iter().skip(1).step_by(2)) {
            mapping.insert(column, color);
        }

        MetricColors {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, column: Column) -> Color32 {
        self.mapping
            .get(&column)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(6).len(), 6);
    }

    #[test]
    fn every_metric_has_a_distinct_colour() {
        let colors = MetricColors::new();
        let mut seen: Vec<Color32> = Column::METRICS.iter().map(|&c| colors.color_for(c)).collect();
        seen.sort_by_key(|c| c.to_array());
        seen.dedup();
        assert_eq!(seen.len(), Column::METRICS.len());
    }

    #[test]
    fn error_code_falls_back_to_default() {
        let colors = MetricColors::new();
        assert_eq!(colors.color_for(Column::ErrorCode), Color32::LIGHT_BLUE);
    }
}
