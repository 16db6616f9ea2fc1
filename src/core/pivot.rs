use std::collections::HashMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{FlatRecord, PivotKey, ScalarValue};

/// Field roles of a long-to-wide reshape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotSpec {
    /// Output row discriminator, usually a date.
    pub pivot_key: String,
    /// Output column discriminator, usually an entity identifier.
    pub series_key: String,
    /// Value placed at each (pivot, series) intersection.
    pub measure_field: String,
}

impl PivotSpec {
    #[must_use]
    pub fn new(
        pivot_key: impl Into<String>,
        series_key: impl Into<String>,
        measure_field: impl Into<String>,
    ) -> Self {
        Self {
            pivot_key: pivot_key.into(),
            series_key: series_key.into(),
            measure_field: measure_field.into(),
        }
    }
}

impl Default for PivotSpec {
    fn default() -> Self {
        Self::new("date", "ticker", "price")
    }
}

/// One chart-ready row: the pivot value followed by one number per series.
///
/// Series without a value for this pivot are absent, never zero or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WideRecord {
    fields: FlatRecord,
}

impl WideRecord {
    fn new(pivot_key: &str, pivot_value: ScalarValue) -> Self {
        let mut fields = FlatRecord::with_capacity(4);
        fields.insert(pivot_key, pivot_value);
        Self { fields }
    }

    #[must_use]
    pub fn pivot_value(&self) -> &ScalarValue {
        self.fields
            .first()
            .map_or(&ScalarValue::Null, |(_, value)| value)
    }

    #[must_use]
    pub fn value(&self, series: &str) -> Option<f64> {
        self.series_values()
            .find(|(key, _)| *key == series)
            .map(|(_, value)| value)
    }

    /// Series values in the order they were first written for this pivot.
    pub fn series_values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields
            .iter()
            .skip(1)
            .filter_map(|(key, value)| value.as_f64().map(|value| (key, value)))
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.fields.len().saturating_sub(1)
    }

    #[must_use]
    pub fn as_record(&self) -> &FlatRecord {
        &self.fields
    }

    #[must_use]
    pub fn into_record(self) -> FlatRecord {
        self.fields
    }
}

/// Result of a long-to-wide reshape.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pivot_key: String,
    records: Vec<WideRecord>,
    series: Vec<String>,
    skipped: usize,
}

impl PivotTable {
    #[must_use]
    pub fn pivot_key(&self) -> &str {
        &self.pivot_key
    }

    /// Wide records in first-seen order of their pivot value.
    #[must_use]
    pub fn records(&self) -> &[WideRecord] {
        &self.records
    }

    /// Distinct series identifiers in first-seen order.
    #[must_use]
    pub fn series(&self) -> &[String] {
        &self.series
    }

    /// Input records dropped because a key field was absent or null.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<WideRecord>, Vec<String>) {
        (self.records, self.series)
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<FlatRecord> {
        self.records
            .into_iter()
            .map(WideRecord::into_record)
            .collect()
    }
}

/// Reshapes long per-entity rows into one wide row per pivot value.
///
/// Single pass over `records`. Output rows keep the first-seen order of pivot
/// values; a repeated (pivot, series) pair overwrites the earlier value. A
/// null or non-numeric measure clears the pair but still registers the row
/// and the series.
#[must_use]
pub fn pivot_long_to_wide(records: &[FlatRecord], spec: &PivotSpec) -> PivotTable {
    let mut slots: HashMap<PivotKey, usize> = HashMap::new();
    let mut wide: Vec<WideRecord> = Vec::new();
    let mut series: IndexSet<String> = IndexSet::new();
    let mut skipped = 0_usize;

    for record in records {
        let Some((pivot_value, pivot)) = keyed_field(record, &spec.pivot_key) else {
            skipped += 1;
            continue;
        };
        let Some((_, series_id)) = keyed_field(record, &spec.series_key) else {
            skipped += 1;
            continue;
        };
        let series_name = series_id.field_name();
        if series_name == spec.pivot_key {
            warn!(
                series = %series_name,
                "skipping record whose series value collides with the pivot key"
            );
            skipped += 1;
            continue;
        }

        let slot = *slots.entry(pivot).or_insert_with(|| {
            wide.push(WideRecord::new(&spec.pivot_key, pivot_value.clone()));
            wide.len() - 1
        });
        let target = &mut wide[slot].fields;
        match record.value_f64(&spec.measure_field) {
            Some(measure) => target.insert(series_name.as_str(), measure),
            None => {
                target.remove(&series_name);
            }
        }
        series.insert(series_name);
    }

    debug!(
        input_count = records.len(),
        wide_count = wide.len(),
        series_count = series.len(),
        skipped,
        pivot_key = %spec.pivot_key,
        "pivoted long records to wide"
    );

    PivotTable {
        pivot_key: spec.pivot_key.clone(),
        records: wide,
        series: series.into_iter().collect(),
        skipped,
    }
}

fn keyed_field<'a>(record: &'a FlatRecord, field: &str) -> Option<(&'a ScalarValue, PivotKey)> {
    let value = record.get(field)?;
    PivotKey::from_scalar(value).map(|key| (value, key))
}

/// Series names of a payload that is already wide: every key of the first
/// record except the x-axis key, in order.
#[must_use]
pub fn series_keys_from_first_record(records: &[FlatRecord], x_key: &str) -> Vec<String> {
    records
        .first()
        .map(|first| {
            first
                .keys()
                .filter(|key| *key != x_key)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
