//! Host-facing layer: view states, the dashboard facade, configuration and
//! JSON contracts handed to the presentation layer.

mod chart_view;
mod dashboard;
mod engine_config;
mod fetch_sequencer;
mod grid_view;
mod json_contract;

pub use chart_view::{ChartData, SeriesOrder};
pub use dashboard::{AnalyticsView, BACKTEST_SERIES, BACKTEST_X_KEY, BacktestView, Dashboard};
pub use engine_config::EngineConfig;
pub use fetch_sequencer::{FetchOutcome, FetchSequencer, RequestTicket};
pub use grid_view::GridView;
pub use json_contract::{
    CHART_JSON_SCHEMA_V1, ChartJsonContractV1, ChartSeriesEntry, ChartSnapshot,
    GRID_PAGE_JSON_SCHEMA_V1, GridPageJsonContractV1, GridPageSnapshot,
};
