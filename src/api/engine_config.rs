use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_PAGE_SIZE, PivotSpec};
use crate::error::{TabularError, TabularResult};
use crate::render::{CategoricalPalette, SequentialPalette};

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load dashboard
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rows per grid page, used for both slicing and page count.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_pivot_key")]
    pub pivot_key: String,
    #[serde(default = "default_series_key")]
    pub series_key: String,
    #[serde(default = "default_measure_field")]
    pub measure_field: String,
    #[serde(default)]
    pub categorical_palette: CategoricalPalette,
    #[serde(default)]
    pub sequential_palette: SequentialPalette,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            pivot_key: default_pivot_key(),
            series_key: default_series_key(),
            measure_field: default_measure_field(),
            categorical_palette: CategoricalPalette::default(),
            sequential_palette: SequentialPalette::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the pivot/series/measure fields used for price charts.
    #[must_use]
    pub fn with_pivot_spec(mut self, spec: PivotSpec) -> Self {
        self.pivot_key = spec.pivot_key;
        self.series_key = spec.series_key;
        self.measure_field = spec.measure_field;
        self
    }

    #[must_use]
    pub fn with_categorical_palette(mut self, palette: CategoricalPalette) -> Self {
        self.categorical_palette = palette;
        self
    }

    #[must_use]
    pub fn with_sequential_palette(mut self, palette: SequentialPalette) -> Self {
        self.sequential_palette = palette;
        self
    }

    #[must_use]
    pub fn pivot_spec(&self) -> PivotSpec {
        PivotSpec::new(&self.pivot_key, &self.series_key, &self.measure_field)
    }

    pub fn validate(&self) -> TabularResult<()> {
        if self.page_size == 0 {
            return Err(TabularError::InvalidConfig(
                "page size must be > 0".to_owned(),
            ));
        }
        for (value, name) in [
            (&self.pivot_key, "pivot_key"),
            (&self.series_key, "series_key"),
            (&self.measure_field, "measure_field"),
        ] {
            if value.is_empty() {
                return Err(TabularError::InvalidConfig(format!(
                    "`{name}` must not be empty"
                )));
            }
        }
        if self.pivot_key == self.series_key {
            return Err(TabularError::InvalidConfig(
                "pivot key and series key must differ".to_owned(),
            ));
        }
        self.categorical_palette.validate()?;
        self.sequential_palette.validate()
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> TabularResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TabularError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> TabularResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| TabularError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_pivot_key() -> String {
    "date".to_owned()
}

fn default_series_key() -> String {
    "ticker".to_owned()
}

fn default_measure_field() -> String {
    "price".to_owned()
}
