use tabular_rs::api::FetchOutcome;
use tabular_rs::core::{FlatRecord, ScalarValue};
use tabular_rs::service::{
    AnalyticsKind, BacktestRequest, DataRequest, DataTable, InMemoryService,
};
use tabular_rs::{Dashboard, EngineConfig};

fn row(date: &str, ticker: &str, price: f64) -> FlatRecord {
    [
        ("date", ScalarValue::from(date)),
        ("ticker", ScalarValue::from(ticker)),
        ("price", ScalarValue::from(price)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn dashboard_smoke_flow() {
    let prices: Vec<FlatRecord> = (1..=12)
        .flat_map(|month| {
            let date = format!("2020-{month:02}-28");
            vec![
                row(&date, "AAPL", 100.0 + f64::from(month)),
                row(&date, "MSFT", 200.0 - f64::from(month)),
                row(&date, "GOOG", 300.0),
            ]
        })
        .collect();
    let cumulative: Vec<FlatRecord> = (1..=12)
        .map(|month| {
            [
                ("date", ScalarValue::from(format!("2020-{month:02}-28"))),
                ("cum_portfolio", ScalarValue::from(1.0 + f64::from(month) / 100.0)),
                ("cum_passive", ScalarValue::from(1.0 + f64::from(month) / 200.0)),
            ]
            .into_iter()
            .collect()
        })
        .collect();
    let beta: Vec<FlatRecord> = vec![
        [("date", ScalarValue::from("2020-01-28")), ("beta", ScalarValue::from(0.95))]
            .into_iter()
            .collect(),
    ];
    let service = InMemoryService::new()
        .with_table(DataTable::EomPrices.as_str(), prices)
        .with_backtest_results(cumulative)
        .with_analytics(AnalyticsKind::BetaExposure, beta);
    let mut dashboard = Dashboard::new(service, EngineConfig::default()).expect("dashboard init");

    let table_request = DataRequest::for_table(DataTable::EomPrices)
        .with_date_range("2020-01-01", "2020-12-31");
    assert!(matches!(
        dashboard.fetch_table(&table_request),
        FetchOutcome::Applied { row_count: 36 }
    ));
    dashboard.data_grid_mut().next();
    let page = dashboard.data_grid().snapshot();
    assert_eq!(page.page_index, 1);
    assert_eq!(page.rows.len(), 11);
    assert!(!page.can_go_next);

    let chart_request = table_request.clone().with_tickers(["MSFT", "AAPL"]);
    assert!(dashboard.fetch_price_chart(&chart_request).is_applied());
    let chart = dashboard.price_chart().expect("price chart").snapshot();
    assert_eq!(chart.records.len(), 12);
    let keys: Vec<&str> = chart.series.iter().map(|entry| entry.key.as_str()).collect();
    assert_eq!(keys, vec!["MSFT", "AAPL"]);

    let backtest = BacktestRequest::new("2020-01-01", "2020-12-31", 12).with_overlay_weight(0.6);
    assert!(dashboard.run_backtest(&backtest).is_applied());
    assert!(dashboard.fetch_analytics(AnalyticsKind::BetaExposure).is_applied());

    let analytics = dashboard.analytics().expect("analytics");
    assert_eq!(analytics.chart.series(), ["beta"]);
    assert_eq!(dashboard.service().call_count(), 4);

    let service = dashboard.into_service();
    assert_eq!(service.backtests().len(), 1);
}
