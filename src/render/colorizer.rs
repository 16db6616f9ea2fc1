use indexmap::IndexMap;
use serde::Serialize;

use crate::error::TabularResult;

use super::{CategoricalPalette, Color, SequentialPalette};

#[derive(Debug, Clone, PartialEq)]
enum ColorizerMode {
    Categorical(CategoricalPalette),
    Sequential {
        palette: SequentialPalette,
        domain_len: usize,
    },
}

/// Pure mapping from a series ordinal to a stroke color.
///
/// Use [`SeriesColorizer::categorical`] for small, fixed series sets and
/// [`SeriesColorizer::sequential`] when the series set is large and only known
/// once the data arrives. Neither mode remembers series identities: the same
/// ordinal always yields the same color.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesColorizer {
    mode: ColorizerMode,
}

impl SeriesColorizer {
    /// Indexes `palette` by ordinal, wrapping past the last color.
    pub fn categorical(palette: CategoricalPalette) -> TabularResult<Self> {
        palette.validate()?;
        Ok(Self {
            mode: ColorizerMode::Categorical(palette),
        })
    }

    #[must_use]
    pub fn category10() -> Self {
        Self {
            mode: ColorizerMode::Categorical(CategoricalPalette::Category10),
        }
    }

    /// Samples `palette` at evenly spaced positions over `[0, domain_len - 1]`.
    ///
    /// A one-position (or empty) domain samples the palette midpoint; ordinals
    /// past the domain clamp to the palette end.
    pub fn sequential(palette: SequentialPalette, domain_len: usize) -> TabularResult<Self> {
        palette.validate()?;
        Ok(Self {
            mode: ColorizerMode::Sequential {
                palette,
                domain_len,
            },
        })
    }

    #[must_use]
    pub fn viridis(domain_len: usize) -> Self {
        Self {
            mode: ColorizerMode::Sequential {
                palette: SequentialPalette::Viridis,
                domain_len,
            },
        }
    }

    #[must_use]
    pub fn is_sequential(&self) -> bool {
        matches!(self.mode, ColorizerMode::Sequential { .. })
    }

    #[must_use]
    pub fn color_at(&self, ordinal: usize) -> Color {
        match &self.mode {
            ColorizerMode::Categorical(palette) => {
                let colors = palette.colors();
                colors[ordinal % colors.len()]
            }
            ColorizerMode::Sequential {
                palette,
                domain_len,
            } => palette.sample(domain_position(ordinal as f64, *domain_len)),
        }
    }

    /// Colors `series_ids` by their position in the slice.
    #[must_use]
    pub fn assign<S: AsRef<str>>(&self, series_ids: &[S]) -> SeriesColors {
        let mut colors = IndexMap::with_capacity(series_ids.len());
        for (ordinal, id) in series_ids.iter().enumerate() {
            colors
                .entry(id.as_ref().to_owned())
                .or_insert_with(|| self.color_at(ordinal));
        }
        SeriesColors { colors }
    }
}

fn domain_position(position: f64, domain_len: usize) -> f64 {
    if domain_len <= 1 {
        return 0.5;
    }
    position / (domain_len - 1) as f64
}

/// Series identifier to color, in series order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SeriesColors {
    colors: IndexMap<String, Color>,
}

impl SeriesColors {
    #[must_use]
    pub fn color_of(&self, series_id: &str) -> Option<Color> {
        self.colors.get(series_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.colors.iter().map(|(id, color)| (id.as_str(), *color))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
