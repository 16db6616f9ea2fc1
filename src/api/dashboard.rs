use tracing::{debug, warn};

use crate::core::{FlatRecord, pivot_long_to_wide};
use crate::error::{TabularError, TabularResult};
use crate::render::SeriesColorizer;
use crate::service::{
    AnalyticsKind, AnalyticsService, BacktestRequest, BacktestRun, DataRequest, WeightsRequest,
    WeightsResponse,
};

use super::{
    ChartData, EngineConfig, FetchOutcome, FetchSequencer, GridView, RequestTicket, SeriesOrder,
};

/// X-axis field of backtest and analytics payloads.
pub const BACKTEST_X_KEY: &str = "date";
/// Output series of a backtest run, in legend order.
pub const BACKTEST_SERIES: [&str; 2] = ["cum_portfolio", "cum_passive"];

/// Backtest whose id later analytics requests refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestView {
    pub backtest_id: String,
    pub chart: ChartData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub backtest_id: String,
    pub kind: AnalyticsKind,
    pub chart: ChartData,
}

/// Main orchestration facade consumed by host applications.
///
/// Owns the service and four independent view states: the data grid, the
/// price chart, the backtest chart and the analytics chart. Each state is
/// only replaced by a completion of its own latest fetch.
pub struct Dashboard<S: AnalyticsService> {
    service: S,
    config: EngineConfig,
    data_grid: GridView,
    data_grid_fetches: FetchSequencer,
    price_chart: Option<ChartData>,
    price_chart_fetches: FetchSequencer,
    backtest: Option<BacktestView>,
    backtest_fetches: FetchSequencer,
    analytics: Option<AnalyticsView>,
    analytics_fetches: FetchSequencer,
}

impl<S: AnalyticsService> Dashboard<S> {
    pub fn new(service: S, config: EngineConfig) -> TabularResult<Self> {
        config.validate()?;
        Ok(Self {
            service,
            data_grid: GridView::new(config.page_size)?,
            config,
            data_grid_fetches: FetchSequencer::new(),
            price_chart: None,
            price_chart_fetches: FetchSequencer::new(),
            backtest: None,
            backtest_fetches: FetchSequencer::new(),
            analytics: None,
            analytics_fetches: FetchSequencer::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    #[must_use]
    pub fn into_service(self) -> S {
        self.service
    }

    #[must_use]
    pub fn data_grid(&self) -> &GridView {
        &self.data_grid
    }

    /// Mutable grid access for page navigation.
    pub fn data_grid_mut(&mut self) -> &mut GridView {
        &mut self.data_grid
    }

    #[must_use]
    pub fn price_chart(&self) -> Option<&ChartData> {
        self.price_chart.as_ref()
    }

    #[must_use]
    pub fn backtest(&self) -> Option<&BacktestView> {
        self.backtest.as_ref()
    }

    #[must_use]
    pub fn analytics(&self) -> Option<&AnalyticsView> {
        self.analytics.as_ref()
    }

    // Data grid.

    pub fn fetch_table(&mut self, request: &DataRequest) -> FetchOutcome {
        let ticket = self.begin_table_fetch();
        let result = request
            .validate()
            .and_then(|()| self.service.fetch_rows(request));
        self.complete_table_fetch(ticket, result)
    }

    pub fn begin_table_fetch(&mut self) -> RequestTicket {
        self.data_grid_fetches.begin()
    }

    pub fn complete_table_fetch(
        &mut self,
        ticket: RequestTicket,
        result: TabularResult<Vec<FlatRecord>>,
    ) -> FetchOutcome {
        let rows = match settle(&mut self.data_grid_fetches, ticket, result, "data_grid") {
            Ok(rows) => rows,
            Err(outcome) => return outcome,
        };
        let row_count = rows.len();
        self.data_grid.set_rows(rows);
        FetchOutcome::Applied { row_count }
    }

    // Price chart.

    /// Fetches long price rows and pivots them into one row per date.
    ///
    /// With a ticker filter the legend follows the requested ticker order;
    /// otherwise series appear in first-seen order.
    pub fn fetch_price_chart(&mut self, request: &DataRequest) -> FetchOutcome {
        let order = match request.ticker_filter() {
            [] => SeriesOrder::FirstSeen,
            tickers => SeriesOrder::Fixed(tickers.to_vec()),
        };
        let ticket = self.begin_price_chart_fetch();
        let result = request
            .validate()
            .and_then(|()| self.service.fetch_rows(request));
        self.complete_price_chart_fetch(ticket, result, order)
    }

    pub fn begin_price_chart_fetch(&mut self) -> RequestTicket {
        self.price_chart_fetches.begin()
    }

    pub fn complete_price_chart_fetch(
        &mut self,
        ticket: RequestTicket,
        result: TabularResult<Vec<FlatRecord>>,
        order: SeriesOrder,
    ) -> FetchOutcome {
        let rows = match settle(&mut self.price_chart_fetches, ticket, result, "price_chart") {
            Ok(rows) => rows,
            Err(outcome) => return outcome,
        };
        let table = pivot_long_to_wide(&rows, &self.config.pivot_spec());
        let domain_len = order.resolve(table.series()).len();
        let colorizer = match SeriesColorizer::sequential(
            self.config.sequential_palette.clone(),
            domain_len,
        ) {
            Ok(colorizer) => colorizer,
            Err(err) => return failed(err, "price_chart"),
        };
        let chart = ChartData::from_pivot(table, order, &colorizer);
        let row_count = chart.rows().len();
        self.price_chart = Some(chart);
        FetchOutcome::Applied { row_count }
    }

    // Backtest.

    pub fn run_backtest(&mut self, request: &BacktestRequest) -> FetchOutcome {
        let ticket = self.begin_backtest();
        let result = request
            .validate()
            .and_then(|()| self.service.run_backtest(request));
        self.complete_backtest(ticket, result)
    }

    pub fn begin_backtest(&mut self) -> RequestTicket {
        self.backtest_fetches.begin()
    }

    pub fn complete_backtest(
        &mut self,
        ticket: RequestTicket,
        result: TabularResult<BacktestRun>,
    ) -> FetchOutcome {
        let run = match settle(&mut self.backtest_fetches, ticket, result, "backtest") {
            Ok(run) => run,
            Err(outcome) => return outcome,
        };
        let colorizer = match self.categorical_colorizer() {
            Ok(colorizer) => colorizer,
            Err(err) => return failed(err, "backtest"),
        };
        let series = BACKTEST_SERIES.iter().map(|name| (*name).to_owned()).collect();
        let chart = ChartData::from_wide_rows(run.results, BACKTEST_X_KEY, series, &colorizer);
        let row_count = chart.rows().len();
        debug!(backtest_id = %run.backtest_id, row_count, "backtest applied");
        self.backtest = Some(BacktestView {
            backtest_id: run.backtest_id,
            chart,
        });
        FetchOutcome::Applied { row_count }
    }

    // Backtest analytics.

    /// Fetches analytics of the current backtest.
    pub fn fetch_analytics(&mut self, kind: AnalyticsKind) -> FetchOutcome {
        let ticket = self.begin_analytics_fetch();
        let Some(backtest_id) = self.backtest.as_ref().map(|view| view.backtest_id.clone()) else {
            let result = Err(TabularError::NoBacktest);
            return self.complete_analytics_fetch(ticket, String::new(), kind, result);
        };
        let result = self.service.fetch_analytics(&backtest_id, kind);
        self.complete_analytics_fetch(ticket, backtest_id, kind, result)
    }

    pub fn begin_analytics_fetch(&mut self) -> RequestTicket {
        self.analytics_fetches.begin()
    }

    pub fn complete_analytics_fetch(
        &mut self,
        ticket: RequestTicket,
        backtest_id: String,
        kind: AnalyticsKind,
        result: TabularResult<Vec<FlatRecord>>,
    ) -> FetchOutcome {
        let rows = match settle(&mut self.analytics_fetches, ticket, result, "analytics") {
            Ok(rows) => rows,
            Err(outcome) => return outcome,
        };
        let colorizer = match self.categorical_colorizer() {
            Ok(colorizer) => colorizer,
            Err(err) => return failed(err, "analytics"),
        };
        let chart = ChartData::from_wide_rows_inferred(rows, BACKTEST_X_KEY, &colorizer);
        let row_count = chart.rows().len();
        self.analytics = Some(AnalyticsView {
            backtest_id,
            kind,
            chart,
        });
        FetchOutcome::Applied { row_count }
    }

    // Model weights.

    /// Fetches model weights; no view state is kept for them.
    pub fn fetch_weights(&mut self, request: &WeightsRequest) -> TabularResult<WeightsResponse> {
        self.service.fetch_weights(request).inspect_err(|err| {
            warn!(error = %err, view = "weights", "fetch failed");
        })
    }

    fn categorical_colorizer(&self) -> TabularResult<SeriesColorizer> {
        SeriesColorizer::categorical(self.config.categorical_palette.clone())
    }
}

/// Resolves a completion against its sequencer.
///
/// Returns the payload when it may be applied, or the outcome to report.
fn settle<T>(
    fetches: &mut FetchSequencer,
    ticket: RequestTicket,
    result: TabularResult<T>,
    view: &'static str,
) -> Result<T, FetchOutcome> {
    if !fetches.complete(ticket) {
        let latest = fetches.latest().unwrap_or(ticket);
        debug!(view, %ticket, %latest, "dropping superseded fetch result");
        return Err(FetchOutcome::Superseded { ticket, latest });
    }
    result.map_err(|err| failed(err, view))
}

fn failed(error: TabularError, view: &'static str) -> FetchOutcome {
    warn!(error = %error, view, "fetch failed; keeping previous data");
    FetchOutcome::Failed(error)
}
