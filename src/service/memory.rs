use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{
    FlatRecord, parse_date, records_for_entities, records_in_date_window, sort_by_date,
};
use crate::error::{TabularError, TabularResult};

use super::{
    AnalyticsKind, AnalyticsService, BacktestRequest, BacktestRun, DataRequest, WeightsRequest,
    WeightsResponse,
};

const DATE_FIELD: &str = "date";
const TICKER_FIELD: &str = "ticker";

/// Service backed by in-process tables.
///
/// Used by tests and headless hosts. Rows are filtered and ordered the same
/// way the remote service does it, and failures can be injected to exercise
/// the degraded paths of a view.
#[derive(Debug, Default)]
pub struct InMemoryService {
    tables: IndexMap<String, Vec<FlatRecord>>,
    backtest_results: Vec<FlatRecord>,
    analytics: IndexMap<AnalyticsKind, Vec<FlatRecord>>,
    weights: WeightsResponse,
    backtests: IndexMap<String, BacktestRequest>,
    pending_failure: Option<TabularError>,
    call_count: usize,
}

impl InMemoryService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<FlatRecord>) -> Self {
        self.tables.insert(name.into(), rows);
        self
    }

    /// Cumulative-performance rows returned by every backtest run.
    #[must_use]
    pub fn with_backtest_results(mut self, rows: Vec<FlatRecord>) -> Self {
        self.backtest_results = rows;
        self
    }

    #[must_use]
    pub fn with_analytics(mut self, kind: AnalyticsKind, rows: Vec<FlatRecord>) -> Self {
        self.analytics.insert(kind, rows);
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: WeightsResponse) -> Self {
        self.weights = weights;
        self
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&mut self, error: TabularError) {
        self.pending_failure = Some(error);
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count
    }

    /// Requests of the backtests run so far, by id.
    #[must_use]
    pub fn backtests(&self) -> &IndexMap<String, BacktestRequest> {
        &self.backtests
    }

    fn begin_call(&mut self) -> TabularResult<()> {
        self.call_count += 1;
        match self.pending_failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AnalyticsService for InMemoryService {
    fn fetch_rows(&mut self, request: &DataRequest) -> TabularResult<Vec<FlatRecord>> {
        self.begin_call()?;
        request.validate()?;
        let table = self
            .tables
            .get(&request.table_name)
            .ok_or_else(|| TabularError::Service {
                status: 400,
                message: format!(
                    "An error occurred while pulling data: unknown table `{}`",
                    request.table_name
                ),
            })?;

        let start = request
            .start_date
            .as_deref()
            .map(|text| parse_date(text, "start_date"))
            .transpose()?;
        let end = request
            .end_date
            .as_deref()
            .map(|text| parse_date(text, "end_date"))
            .transpose()?;
        let windowed = records_in_date_window(table, DATE_FIELD, start, end);
        let mut rows = records_for_entities(windowed, TICKER_FIELD, request.ticker_filter());
        sort_by_date(&mut rows, DATE_FIELD);

        debug!(
            table = %request.table_name,
            row_count = rows.len(),
            "served rows from in-memory table"
        );
        Ok(rows)
    }

    fn run_backtest(&mut self, request: &BacktestRequest) -> TabularResult<BacktestRun> {
        self.begin_call()?;
        request.validate()?;
        let start = parse_date(&request.start_date, "start_date")?;
        let end = parse_date(&request.end_date, "end_date")?;

        let backtest_id = format!("backtest-{}", self.backtests.len() + 1);
        self.backtests.insert(backtest_id.clone(), request.clone());
        let results =
            records_in_date_window(&self.backtest_results, DATE_FIELD, Some(start), Some(end));
        trace!(backtest_id = %backtest_id, row_count = results.len(), "ran in-memory backtest");
        Ok(BacktestRun {
            backtest_id,
            results,
        })
    }

    fn fetch_analytics(
        &mut self,
        backtest_id: &str,
        kind: AnalyticsKind,
    ) -> TabularResult<Vec<FlatRecord>> {
        self.begin_call()?;
        if !self.backtests.contains_key(backtest_id) {
            return Err(TabularError::Service {
                status: 400,
                message: format!("Backtest {backtest_id} does not exist in cache."),
            });
        }
        Ok(self.analytics.get(&kind).cloned().unwrap_or_default())
    }

    fn fetch_weights(&mut self, request: &WeightsRequest) -> TabularResult<WeightsResponse> {
        self.begin_call()?;
        request.validate()?;
        Ok(self.weights.clone())
    }
}
