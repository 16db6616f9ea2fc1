use indexmap::IndexSet;

use crate::core::{FlatRecord, PivotTable, ScalarValue, series_keys_from_first_record};
use crate::render::{Color, SeriesColorizer, SeriesColors};

use super::{ChartSeriesEntry, ChartSnapshot};

/// How the series of a pivoted chart are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeriesOrder {
    /// Order of first appearance in the input rows.
    #[default]
    FirstSeen,
    /// Caller-provided order; series missing from the data still get a slot.
    Fixed(Vec<String>),
}

impl SeriesOrder {
    /// Distinct series in display order; a repeated name keeps its first slot.
    #[must_use]
    pub fn resolve(&self, seen: &[String]) -> Vec<String> {
        let ordered = match self {
            Self::FirstSeen => seen,
            Self::Fixed(fixed) => fixed.as_slice(),
        };
        distinct(ordered.iter().cloned())
    }
}

fn distinct(series: impl IntoIterator<Item = String>) -> Vec<String> {
    series
        .into_iter()
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Chart-ready rows plus the colored series drawn from them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    x_key: String,
    rows: Vec<FlatRecord>,
    series: Vec<String>,
    colors: SeriesColors,
}

impl ChartData {
    /// Builds chart data from a long-to-wide reshape.
    #[must_use]
    pub fn from_pivot(table: PivotTable, order: SeriesOrder, colorizer: &SeriesColorizer) -> Self {
        let x_key = table.pivot_key().to_owned();
        let (records, seen) = table.into_parts();
        let series = order.resolve(&seen);
        let rows = records.into_iter().map(|record| record.into_record()).collect();
        Self::from_wide_rows(rows, x_key, series, colorizer)
    }

    /// Builds chart data from rows that are already one-per-x.
    ///
    /// Repeated series names are collapsed onto their first occurrence.
    #[must_use]
    pub fn from_wide_rows(
        rows: Vec<FlatRecord>,
        x_key: impl Into<String>,
        series: Vec<String>,
        colorizer: &SeriesColorizer,
    ) -> Self {
        let series = distinct(series);
        let colors = colorizer.assign(&series);
        Self {
            x_key: x_key.into(),
            rows,
            series,
            colors,
        }
    }

    /// Like [`ChartData::from_wide_rows`], taking the series from the keys of
    /// the first row.
    #[must_use]
    pub fn from_wide_rows_inferred(
        rows: Vec<FlatRecord>,
        x_key: impl Into<String>,
        colorizer: &SeriesColorizer,
    ) -> Self {
        let x_key = x_key.into();
        let series = series_keys_from_first_record(&rows, &x_key);
        Self::from_wide_rows(rows, x_key, series, colorizer)
    }

    #[must_use]
    pub fn x_key(&self) -> &str {
        &self.x_key
    }

    #[must_use]
    pub fn rows(&self) -> &[FlatRecord] {
        &self.rows
    }

    #[must_use]
    pub fn series(&self) -> &[String] {
        &self.series
    }

    #[must_use]
    pub fn colors(&self) -> &SeriesColors {
        &self.colors
    }

    #[must_use]
    pub fn color_of(&self, series: &str) -> Option<Color> {
        self.colors.color_of(series)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (x, y) pairs of one series, skipping rows where it has no number.
    pub fn points<'a>(
        &'a self,
        series: &'a str,
    ) -> impl Iterator<Item = (&'a ScalarValue, f64)> + 'a {
        self.rows.iter().filter_map(move |row| {
            let x = row.get(&self.x_key)?;
            let y = row.value_f64(series)?;
            Some((x, y))
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            x_key: self.x_key.clone(),
            records: self.rows.clone(),
            series: self
                .colors
                .iter()
                .map(|(key, color)| ChartSeriesEntry {
                    key: key.to_owned(),
                    color,
                })
                .collect(),
        }
    }
}
