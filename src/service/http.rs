use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::FlatRecord;
use crate::error::{TabularError, TabularResult};

use super::{
    AnalyticsKind, AnalyticsService, BacktestRequest, BacktestRun, DataRequest, WeightsRequest,
    WeightsResponse, decode_service_error,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const BASE_URL_ENV: &str = "TABULAR_BACKEND_API";

/// Connection settings of the HTTP service client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpServiceConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }

    /// Reads the base URL from `TABULAR_BACKEND_API`, falling back to localhost.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| default_base_url());
        Self::new(base_url)
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self::new(default_base_url())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    concat!("tabular-rs/", env!("CARGO_PKG_VERSION")).to_owned()
}

/// Blocking JSON client for the analytics service REST API.
#[derive(Debug, Clone)]
pub struct HttpAnalyticsService {
    base_url: Url,
    http: Client,
}

impl HttpAnalyticsService {
    pub fn new(config: HttpServiceConfig) -> TabularResult<Self> {
        if config.timeout_ms == 0 {
            return Err(TabularError::InvalidConfig(
                "http timeout must be > 0 ms".to_owned(),
            ));
        }
        let mut base = config.base_url.trim().to_owned();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            TabularError::InvalidConfig(format!("invalid base url `{}`: {e}", config.base_url))
        })?;
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TabularError::InvalidConfig(format!("failed to build http client: {e}")))?;
        Ok(Self { base_url, http })
    }

    pub fn from_env() -> TabularResult<Self> {
        Self::new(HttpServiceConfig::from_env())
    }

    /// Absolute URL of an API path such as `v1/data/pull_between_dates`.
    pub fn endpoint(&self, path: &str) -> TabularResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TabularError::InvalidRequest(format!("invalid endpoint `{path}`: {e}")))
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> TabularResult<T> {
        let response = request
            .send()
            .map_err(|e| TabularError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TabularError::Transport(format!("failed to read response body: {e}")))?;
        if !status.is_success() {
            let error = decode_service_error(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %error, "service returned an error");
            return Err(error);
        }
        debug!(status = status.as_u16(), bytes = body.len(), "service response");
        serde_json::from_str(&body)
            .map_err(|e| TabularError::InvalidData(format!("failed to parse service payload: {e}")))
    }
}

impl AnalyticsService for HttpAnalyticsService {
    fn fetch_rows(&mut self, request: &DataRequest) -> TabularResult<Vec<FlatRecord>> {
        request.validate()?;
        let url = self.endpoint("v1/data/pull_between_dates")?;
        self.send_json(self.http.post(url).json(request))
    }

    fn run_backtest(&mut self, request: &BacktestRequest) -> TabularResult<BacktestRun> {
        request.validate()?;
        let url = self.endpoint("v1/backtest/backtest_between_dates")?;
        self.send_json(self.http.post(url).json(request))
    }

    fn fetch_analytics(
        &mut self,
        backtest_id: &str,
        kind: AnalyticsKind,
    ) -> TabularResult<Vec<FlatRecord>> {
        let url = self.endpoint(&format!("v1/backtest/analytics/{}", kind.as_str()))?;
        self.send_json(self.http.get(url).query(&[("backtest_id", backtest_id)]))
    }

    fn fetch_weights(&mut self, request: &WeightsRequest) -> TabularResult<WeightsResponse> {
        request.validate()?;
        let url = self.endpoint("v1/model/weights_on_date")?;
        self.send_json(self.http.post(url).json(request))
    }
}
