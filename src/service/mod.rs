//! Contract of the remote data/analytics service consumed by the engine.

#[cfg(feature = "http-client")]
mod http;
mod memory;
mod requests;

#[cfg(feature = "http-client")]
pub use http::{HttpAnalyticsService, HttpServiceConfig};
pub use memory::InMemoryService;
pub use requests::{
    AnalyticsKind, BacktestRequest, BacktestRun, DataRequest, DataTable, Factor,
    SectorExposure, ServiceErrorPayload, WeightsRequest, WeightsResponse, decode_service_error,
};

use crate::core::FlatRecord;
use crate::error::TabularResult;

/// Backend the dashboard fetches rows and backtests from.
///
/// Calls are synchronous from the engine's point of view; timeouts and
/// transport concerns belong to the implementation.
pub trait AnalyticsService {
    /// Rows of `request.table_name`, ordered by date.
    fn fetch_rows(&mut self, request: &DataRequest) -> TabularResult<Vec<FlatRecord>>;

    fn run_backtest(&mut self, request: &BacktestRequest) -> TabularResult<BacktestRun>;

    /// Date-keyed analytic series of a backtest returned by `run_backtest`.
    fn fetch_analytics(
        &mut self,
        backtest_id: &str,
        kind: AnalyticsKind,
    ) -> TabularResult<Vec<FlatRecord>>;

    fn fetch_weights(&mut self, request: &WeightsRequest) -> TabularResult<WeightsResponse>;
}
