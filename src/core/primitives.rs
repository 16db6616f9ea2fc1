use chrono::NaiveDate;
use ordered_float::OrderedFloat;

use crate::core::ScalarValue;
use crate::core::types::format_number;
use crate::error::{TabularError, TabularResult};

/// Hashable identity of a scalar used as a grouping key.
///
/// Text and numbers stay distinct so `"1"` and `1` never collapse into the
/// same group. Null has no key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PivotKey {
    Text(String),
    Number(OrderedFloat<f64>),
    Bool(bool),
}

impl PivotKey {
    #[must_use]
    pub fn from_scalar(value: &ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Null => None,
            ScalarValue::Bool(value) => Some(Self::Bool(*value)),
            ScalarValue::Number(value) if value.is_nan() => None,
            ScalarValue::Number(value) => Some(Self::Number(OrderedFloat(*value))),
            ScalarValue::Text(text) => Some(Self::Text(text.clone())),
        }
    }

    /// Field name used when the key becomes a column of a wide record.
    #[must_use]
    pub fn field_name(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => format_number(value.0),
            Self::Bool(value) => value.to_string(),
        }
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-mm-dd` calendar date.
pub fn parse_date(text: &str, field_name: &str) -> TabularResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        TabularError::InvalidRequest(format!(
            "{field_name} `{text}` is not a YYYY-mm-dd date: {e}"
        ))
    })
}

/// Reads a record's date cell leniently.
///
/// Accepts `YYYY-mm-dd`, an ISO timestamp starting with a date, or a bare
/// `YYYY-mm` month (taken as the first of the month).
#[must_use]
pub fn scalar_to_date(value: &ScalarValue) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    let date_part = text.get(..10).unwrap_or(text);
    if let Ok(date) = NaiveDate::parse_from_str(date_part, DATE_FORMAT) {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("{text}-01"), DATE_FORMAT).ok()
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
