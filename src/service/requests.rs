use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{FlatRecord, parse_date};
use crate::error::{TabularError, TabularResult};

/// Tables exposed by the data view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTable {
    EomPrices,
    FactorScores,
    MonthlyConstituents,
}

impl DataTable {
    pub const ALL: [Self; 3] = [
        Self::EomPrices,
        Self::FactorScores,
        Self::MonthlyConstituents,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EomPrices => "eom_prices",
            Self::FactorScores => "factor_scores",
            Self::MonthlyConstituents => "monthly_constituents",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::EomPrices => "End-of-month prices",
            Self::FactorScores => "Factor scores",
            Self::MonthlyConstituents => "Monthly constituents",
        }
    }
}

impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bulk row fetch over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRequest {
    pub table_name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub tickers: Option<Vec<String>>,
}

impl DataRequest {
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            start_date: None,
            end_date: None,
            tickers: None,
        }
    }

    #[must_use]
    pub fn for_table(table: DataTable) -> Self {
        Self::new(table.as_str())
    }

    #[must_use]
    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    #[must_use]
    pub fn with_tickers<I, T>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tickers = Some(tickers.into_iter().map(Into::into).collect());
        self
    }

    /// Ticker filter, treating an empty list as no filter.
    #[must_use]
    pub fn ticker_filter(&self) -> &[String] {
        self.tickers.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> TabularResult<()> {
        let name = self.table_name.as_str();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(TabularError::InvalidRequest(format!(
                "table name `{name}` must be a non-empty identifier"
            )));
        }
        validate_optional_range(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// Alpha factors the backtest model can combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Factor {
    Momentum,
    Evebitda,
    Evebit,
    Ps,
    Pb,
    Pe,
}

impl Factor {
    pub const ALL: [Self; 6] = [
        Self::Momentum,
        Self::Evebitda,
        Self::Evebit,
        Self::Ps,
        Self::Pb,
        Self::Pe,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Momentum => "MOMENTUM",
            Self::Evebitda => "EVEBITDA",
            Self::Evebit => "EVEBIT",
            Self::Ps => "P/S",
            Self::Pb => "P/B",
            Self::Pe => "P/E",
        }
    }
}

/// Parameters of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub start_date: String,
    pub end_date: String,
    /// Lookback window in months.
    pub lookback: u32,
    pub factors: Vec<Factor>,
    /// Long/short overlay weight; 0.6 means a 30/30 overlay.
    pub overlay_weight: f64,
    pub transaction_costs: f64,
}

impl BacktestRequest {
    /// Creates a request with every factor enabled and no overlay or costs.
    #[must_use]
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>, lookback: u32) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            lookback,
            factors: Factor::ALL.to_vec(),
            overlay_weight: 0.0,
            transaction_costs: 0.0,
        }
    }

    #[must_use]
    pub fn with_overlay_weight(mut self, overlay_weight: f64) -> Self {
        self.overlay_weight = overlay_weight;
        self
    }

    #[must_use]
    pub fn with_transaction_costs(mut self, transaction_costs: f64) -> Self {
        self.transaction_costs = transaction_costs;
        self
    }

    #[must_use]
    pub fn with_factor(mut self, factor: Factor, enabled: bool) -> Self {
        self.set_factor(factor, enabled);
        self
    }

    /// Toggles one factor, keeping the others in their current order.
    pub fn set_factor(&mut self, factor: Factor, enabled: bool) {
        if enabled {
            if !self.factors.contains(&factor) {
                self.factors.push(factor);
            }
        } else {
            self.factors.retain(|current| *current != factor);
        }
    }

    pub fn validate(&self) -> TabularResult<()> {
        validate_required_range(&self.start_date, &self.end_date)?;
        validate_model_parameters(self.lookback, &self.factors, self.overlay_weight)?;
        if !self.transaction_costs.is_finite() || self.transaction_costs < 0.0 {
            return Err(TabularError::InvalidRequest(
                "transaction costs must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Identifier and initial cumulative-performance series of a finished backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRun {
    pub backtest_id: String,
    pub results: Vec<FlatRecord>,
}

/// Analytics computable for a cached backtest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsKind {
    BetaExposure,
    FactorExposure,
}

impl AnalyticsKind {
    pub const ALL: [Self; 2] = [Self::BetaExposure, Self::FactorExposure];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BetaExposure => "beta_exposure",
            Self::FactorExposure => "factor_exposure",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BetaExposure => "Beta exposure",
            Self::FactorExposure => "Factor exposure",
        }
    }
}

impl fmt::Display for AnalyticsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model weights for one end-of-month date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsRequest {
    pub date: String,
    pub factors: Vec<Factor>,
    pub overlay_weight: f64,
    pub lookback: u32,
}

impl WeightsRequest {
    #[must_use]
    pub fn new(date: impl Into<String>, lookback: u32) -> Self {
        Self {
            date: date.into(),
            factors: Factor::ALL.to_vec(),
            overlay_weight: 0.0,
            lookback,
        }
    }

    #[must_use]
    pub fn with_overlay_weight(mut self, overlay_weight: f64) -> Self {
        self.overlay_weight = overlay_weight;
        self
    }

    pub fn validate(&self) -> TabularResult<()> {
        parse_date(&self.date, "date")?;
        validate_model_parameters(self.lookback, &self.factors, self.overlay_weight)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightsResponse {
    #[serde(default)]
    pub portfolio_weights: FlatRecord,
    #[serde(default)]
    pub model_coef: FlatRecord,
    /// Long and short weight totals per sector.
    #[serde(default)]
    pub sector_weights: IndexMap<String, SectorExposure>,
}

/// Summed long (positive) and short (negative) portfolio weights of a sector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectorExposure {
    #[serde(default)]
    pub long: f64,
    #[serde(default)]
    pub short: f64,
}

impl SectorExposure {
    #[must_use]
    pub fn new(long: f64, short: f64) -> Self {
        Self { long, short }
    }

    /// Long plus short, i.e. the sector's net weight.
    #[must_use]
    pub fn net(self) -> f64 {
        self.long + self.short
    }
}

/// Structured error body returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorPayload {
    pub code: u16,
    pub message: String,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailPayload {
    detail: serde_json::Value,
}

/// Maps a non-success response body onto [`TabularError::Service`].
#[must_use]
pub fn decode_service_error(status: u16, body: &str) -> TabularError {
    if let Ok(payload) = serde_json::from_str::<ServiceErrorPayload>(body) {
        let message = match payload.details {
            Some(details) => format!("{}: {details}", payload.message),
            None => payload.message,
        };
        return TabularError::Service { status, message };
    }
    if let Ok(payload) = serde_json::from_str::<DetailPayload>(body) {
        let message = match payload.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        };
        return TabularError::Service { status, message };
    }
    let message = if body.trim().is_empty() {
        "empty error body".to_owned()
    } else {
        body.trim().to_owned()
    };
    TabularError::Service { status, message }
}

fn validate_optional_range(start: Option<&str>, end: Option<&str>) -> TabularResult<()> {
    let start = start.map(|text| parse_date(text, "start_date")).transpose()?;
    let end = end.map(|text| parse_date(text, "end_date")).transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(TabularError::InvalidRequest(format!(
                "start_date {start} must not be after end_date {end}"
            )));
        }
    }
    Ok(())
}

fn validate_required_range(start: &str, end: &str) -> TabularResult<()> {
    validate_optional_range(Some(start), Some(end))
}

fn validate_model_parameters(
    lookback: u32,
    factors: &[Factor],
    overlay_weight: f64,
) -> TabularResult<()> {
    if lookback == 0 {
        return Err(TabularError::InvalidRequest(
            "lookback must be > 0".to_owned(),
        ));
    }
    if factors.is_empty() {
        return Err(TabularError::InvalidRequest(
            "at least one factor must be enabled".to_owned(),
        ));
    }
    if !overlay_weight.is_finite() {
        return Err(TabularError::InvalidRequest(
            "overlay weight must be finite".to_owned(),
        ));
    }
    Ok(())
}
