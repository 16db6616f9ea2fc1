use serde::{Deserialize, Serialize};

use crate::error::{TabularError, TabularResult};

use super::Color;

/// The ten-hue categorical scheme popularized by d3 and matplotlib.
pub const CATEGORY10: [Color; 10] = [
    Color::from_rgb8(0x1f, 0x77, 0xb4),
    Color::from_rgb8(0xff, 0x7f, 0x0e),
    Color::from_rgb8(0x2c, 0xa0, 0x2c),
    Color::from_rgb8(0xd6, 0x27, 0x28),
    Color::from_rgb8(0x94, 0x67, 0xbd),
    Color::from_rgb8(0x8c, 0x56, 0x4b),
    Color::from_rgb8(0xe3, 0x77, 0xc2),
    Color::from_rgb8(0x7f, 0x7f, 0x7f),
    Color::from_rgb8(0xbc, 0xbd, 0x22),
    Color::from_rgb8(0x17, 0xbe, 0xcf),
];

/// Viridis sampled at 0.0, 0.1, ..., 1.0.
pub const VIRIDIS_STOPS: [Color; 11] = [
    Color::from_rgb8(0x44, 0x01, 0x54),
    Color::from_rgb8(0x48, 0x24, 0x75),
    Color::from_rgb8(0x41, 0x44, 0x87),
    Color::from_rgb8(0x35, 0x5f, 0x8d),
    Color::from_rgb8(0x2a, 0x78, 0x8e),
    Color::from_rgb8(0x21, 0x91, 0x8c),
    Color::from_rgb8(0x22, 0xa8, 0x84),
    Color::from_rgb8(0x44, 0xbf, 0x70),
    Color::from_rgb8(0x7a, 0xd1, 0x51),
    Color::from_rgb8(0xbd, 0xdf, 0x26),
    Color::from_rgb8(0xfd, 0xe7, 0x25),
];

/// Discrete palette indexed by series ordinal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalPalette {
    #[default]
    Category10,
    Custom(Vec<Color>),
}

impl CategoricalPalette {
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        match self {
            Self::Category10 => &CATEGORY10,
            Self::Custom(colors) => colors,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors().is_empty()
    }

    pub fn validate(&self) -> TabularResult<()> {
        let colors = self.colors();
        if colors.is_empty() {
            return Err(TabularError::InvalidConfig(
                "categorical palette must contain at least one color".to_owned(),
            ));
        }
        colors.iter().try_for_each(|color| color.validate())
    }
}

/// Continuous palette sampled at a position in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequentialPalette {
    #[default]
    Viridis,
    /// Evenly spaced color stops, linearly blended.
    Custom(Vec<Color>),
}

impl SequentialPalette {
    #[must_use]
    pub fn stops(&self) -> &[Color] {
        match self {
            Self::Viridis => &VIRIDIS_STOPS,
            Self::Custom(stops) => stops,
        }
    }

    pub fn validate(&self) -> TabularResult<()> {
        let stops = self.stops();
        if stops.len() < 2 {
            return Err(TabularError::InvalidConfig(
                "sequential palette needs at least two color stops".to_owned(),
            ));
        }
        stops.iter().try_for_each(|color| color.validate())
    }

    /// Samples the palette; `t` is clamped into `[0, 1]` and NaN maps to 0.
    #[must_use]
    pub fn sample(&self, t: f64) -> Color {
        let stops = self.stops();
        match stops {
            [] => Color::rgb(0.0, 0.0, 0.0),
            [only] => *only,
            _ => {
                let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
                let segments = (stops.len() - 1) as f64;
                let scaled = t * segments;
                let lower = (scaled.floor() as usize).min(stops.len() - 2);
                stops[lower].lerp(stops[lower + 1], scaled - lower as f64)
            }
        }
    }
}
