use chrono::NaiveDate;

use crate::core::{FlatRecord, scalar_to_date};

/// Returns records whose `date_field` falls inside an inclusive date window.
///
/// Either bound may be open. Records without a readable date are dropped when
/// any bound is set, and kept when the window is fully open.
#[must_use]
pub fn records_in_date_window(
    records: &[FlatRecord],
    date_field: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<FlatRecord> {
    if start.is_none() && end.is_none() {
        return records.to_vec();
    }
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if s > e => (Some(e), Some(s)),
        bounds => bounds,
    };

    records
        .iter()
        .filter(|record| {
            let Some(date) = record.get(date_field).and_then(scalar_to_date) else {
                return false;
            };
            start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
        })
        .cloned()
        .collect()
}

/// Keeps records whose `entity_field` text matches one of `entities`.
#[must_use]
pub fn records_for_entities(
    records: Vec<FlatRecord>,
    entity_field: &str,
    entities: &[String],
) -> Vec<FlatRecord> {
    if entities.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| {
            record
                .get(entity_field)
                .and_then(|value| value.as_str())
                .is_some_and(|entity| entities.iter().any(|wanted| wanted == entity))
        })
        .collect()
}

/// Stable sort by the date in `date_field`; rows without one sort first.
pub fn sort_by_date(records: &mut [FlatRecord], date_field: &str) {
    records.sort_by(|a, b| {
        let left = a.get(date_field).and_then(scalar_to_date);
        let right = b.get(date_field).and_then(scalar_to_date);
        left.cmp(&right)
    });
}
