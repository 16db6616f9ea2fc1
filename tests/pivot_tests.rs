use serde_json::json;
use tabular_rs::core::{
    FlatRecord, PivotSpec, ScalarValue, pivot_long_to_wide, series_keys_from_first_record,
};

fn record(fields: &[(&str, ScalarValue)]) -> FlatRecord {
    fields.iter().cloned().collect()
}

fn price(date: &str, ticker: &str, price: f64) -> FlatRecord {
    record(&[
        ("date", date.into()),
        ("ticker", ticker.into()),
        ("price", price.into()),
    ])
}

#[test]
fn long_rows_pivot_into_one_wide_row_per_date() {
    let rows = vec![
        price("2020-01", "A", 10.0),
        price("2020-01", "B", 20.0),
        price("2020-02", "A", 11.0),
    ];

    let table = pivot_long_to_wide(&rows, &PivotSpec::new("date", "ticker", "price"));

    assert_eq!(
        serde_json::to_value(table.records()).expect("serialize wide rows"),
        json!([
            {"date": "2020-01", "A": 10, "B": 20},
            {"date": "2020-02", "A": 11}
        ])
    );
    assert_eq!(table.series(), ["A", "B"]);
    assert_eq!(table.skipped(), 0);
}

#[test]
fn missing_combinations_are_absent_not_zero() {
    let rows = vec![price("2020-01", "A", 10.0), price("2020-02", "B", 5.0)];
    let table = pivot_long_to_wide(&rows, &PivotSpec::default());

    let first = &table.records()[0];
    assert_eq!(first.value("A"), Some(10.0));
    assert_eq!(first.value("B"), None);
    assert!(!first.as_record().contains_key("B"));
    assert_eq!(first.series_count(), 1);
}

#[test]
fn output_rows_keep_first_seen_order_instead_of_sorting() {
    let rows = vec![
        price("2020-03", "A", 3.0),
        price("2020-01", "A", 1.0),
        price("2020-02", "A", 2.0),
        price("2020-01", "B", 9.0),
    ];
    let table = pivot_long_to_wide(&rows, &PivotSpec::default());

    let dates: Vec<String> = table
        .records()
        .iter()
        .map(|row| row.pivot_value().display_text())
        .collect();
    assert_eq!(dates, vec!["2020-03", "2020-01", "2020-02"]);
}

#[test]
fn duplicate_pivot_series_pair_keeps_last_value() {
    let rows = vec![
        price("2020-01", "A", 10.0),
        price("2020-01", "A", 12.0),
        price("2020-01", "A", 15.0),
    ];
    let table = pivot_long_to_wide(&rows, &PivotSpec::default());

    assert_eq!(table.records().len(), 1);
    assert_eq!(table.records()[0].value("A"), Some(15.0));
}

#[test]
fn rows_with_null_or_missing_keys_are_skipped() {
    let rows = vec![
        price("2020-01", "A", 10.0),
        record(&[("ticker", "B".into()), ("price", 1.0.into())]),
        record(&[
            ("date", ScalarValue::Null),
            ("ticker", "C".into()),
            ("price", 2.0.into()),
        ]),
        record(&[
            ("date", "2020-01".into()),
            ("ticker", ScalarValue::Null),
            ("price", 3.0.into()),
        ]),
    ];
    let table = pivot_long_to_wide(&rows, &PivotSpec::default());

    assert_eq!(table.records().len(), 1);
    assert_eq!(table.series(), ["A"]);
    assert_eq!(table.skipped(), 3);
}

#[test]
fn numeric_looking_text_measures_are_coerced() {
    let rows = vec![record(&[
        ("date", "2020-01".into()),
        ("ticker", "A".into()),
        ("price", " 12.5 ".into()),
    ])];
    let table = pivot_long_to_wide(&rows, &PivotSpec::default());

    assert_eq!(table.records()[0].value("A"), Some(12.5));
}

#[test]
fn null_measure_clears_earlier_value_but_registers_row_and_series() {
    let rows = vec![
        price("2020-01", "A", 10.0),
        record(&[
            ("date", "2020-01".into()),
            ("ticker", "A".into()),
            ("price", ScalarValue::Null),
        ]),
        record(&[
            ("date", "2020-02".into()),
            ("ticker", "B".into()),
            ("price", "n/a".into()),
        ]),
    ];
    let table = pivot_long_to_wide(&rows, &PivotSpec::default());

    assert_eq!(table.records().len(), 2);
    assert_eq!(table.records()[0].value("A"), None);
    assert_eq!(table.records()[1].series_count(), 0);
    assert_eq!(table.series(), ["A", "B"]);
}

#[test]
fn numeric_series_keys_become_field_names() {
    let rows = vec![record(&[
        ("date", "2020-01".into()),
        ("sector", 45.into()),
        ("weight", 0.25.into()),
    ])];
    let table = pivot_long_to_wide(&rows, &PivotSpec::new("date", "sector", "weight"));

    assert_eq!(table.series(), ["45"]);
    assert_eq!(table.records()[0].value("45"), Some(0.25));
}

#[test]
fn text_and_numeric_pivot_values_stay_distinct() {
    let rows = vec![
        record(&[("period", "1".into()), ("ticker", "A".into()), ("price", 1.0.into())]),
        record(&[("period", 1.into()), ("ticker", "A".into()), ("price", 2.0.into())]),
    ];
    let table = pivot_long_to_wide(&rows, &PivotSpec::new("period", "ticker", "price"));

    assert_eq!(table.records().len(), 2);
}

#[test]
fn series_value_equal_to_pivot_key_is_skipped() {
    let rows = vec![
        price("2020-01", "A", 1.0),
        price("2020-01", "date", 2.0),
    ];
    let table = pivot_long_to_wide(&rows, &PivotSpec::default());

    assert_eq!(table.records()[0].pivot_value(), &ScalarValue::from("2020-01"));
    assert_eq!(table.series(), ["A"]);
    assert_eq!(table.skipped(), 1);
}

#[test]
fn empty_input_yields_no_wide_records() {
    let table = pivot_long_to_wide(&[], &PivotSpec::default());
    assert!(table.is_empty());
    assert!(table.series().is_empty());
    assert!(table.into_rows().is_empty());
}

#[test]
fn wide_payload_series_exclude_the_x_key() {
    let rows = vec![record(&[
        ("date", "2020-01-31".into()),
        ("MOMENTUM", 0.4.into()),
        ("PE", (-0.1).into()),
    ])];

    assert_eq!(
        series_keys_from_first_record(&rows, "date"),
        vec!["MOMENTUM".to_owned(), "PE".to_owned()]
    );
    assert!(series_keys_from_first_record(&[], "date").is_empty());
}
