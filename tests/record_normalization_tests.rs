use chrono::NaiveDate;
use tabular_rs::core::{
    FlatRecord, PivotKey, ScalarValue, format_date, parse_date, records_in_date_window,
    scalar_to_date,
};

#[test]
fn scalars_deserialize_by_json_token_type() {
    let record: FlatRecord = serde_json::from_str(
        r#"{"date":"2020-01-31","price":10.5,"volume":1200,"delisted":false,"note":null,"code":"007"}"#,
    )
    .expect("record parse");

    assert_eq!(record.get("date"), Some(&ScalarValue::Text("2020-01-31".to_owned())));
    assert_eq!(record.get("price"), Some(&ScalarValue::Number(10.5)));
    assert_eq!(record.get("volume"), Some(&ScalarValue::Number(1200.0)));
    assert_eq!(record.get("delisted"), Some(&ScalarValue::Bool(false)));
    assert_eq!(record.get("note"), Some(&ScalarValue::Null));
    assert_eq!(record.get("code"), Some(&ScalarValue::Text("007".to_owned())));
}

#[test]
fn integral_numbers_serialize_without_fraction() {
    let record: FlatRecord = [
        ("a", ScalarValue::from(10.0)),
        ("b", ScalarValue::from(10.25)),
        ("c", ScalarValue::Null),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        serde_json::to_string(&record).expect("serialize"),
        r#"{"a":10,"b":10.25,"c":null}"#
    );
}

#[test]
fn numeric_coercion_trims_text_and_rejects_non_finite() {
    assert_eq!(ScalarValue::from(" 12.5 ").as_f64(), Some(12.5));
    assert_eq!(ScalarValue::from("-3").as_f64(), Some(-3.0));
    assert_eq!(ScalarValue::from(7.0).as_f64(), Some(7.0));
    assert_eq!(ScalarValue::from("abc").as_f64(), None);
    assert_eq!(ScalarValue::from("NaN").as_f64(), None);
    assert_eq!(ScalarValue::from("inf").as_f64(), None);
    assert_eq!(ScalarValue::Null.as_f64(), None);
    assert_eq!(ScalarValue::Bool(true).as_f64(), None);
}

#[test]
fn display_text_renders_cells() {
    assert_eq!(ScalarValue::Null.display_text(), "");
    assert_eq!(ScalarValue::from(42.0).display_text(), "42");
    assert_eq!(ScalarValue::from(0.125).display_text(), "0.125");
    assert_eq!(ScalarValue::from(true).display_text(), "true");
    assert_eq!(ScalarValue::from("AAPL").to_string(), "AAPL");
    assert_eq!(ScalarValue::from(None::<f64>), ScalarValue::Null);
}

#[test]
fn record_helpers_read_missing_fields_as_no_value() {
    let mut record = FlatRecord::new();
    record.insert("price", "101.5");
    record.insert("ticker", "MSFT");

    assert_eq!(record.value_f64("price"), Some(101.5));
    assert_eq!(record.value_f64("missing"), None);
    assert_eq!(record.display_text("missing"), "");
    assert_eq!(record.first().map(|(key, _)| key), Some("price"));

    record.insert("price", 99.0);
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["price", "ticker"]);
    assert_eq!(record.remove("price"), Some(ScalarValue::Number(99.0)));
    assert_eq!(record.len(), 1);
}

#[test]
fn pivot_keys_distinguish_text_from_numbers_and_drop_nulls() {
    let text = PivotKey::from_scalar(&ScalarValue::from("1")).expect("text key");
    let number = PivotKey::from_scalar(&ScalarValue::from(1.0)).expect("number key");

    assert_ne!(text, number);
    assert_eq!(text.field_name(), "1");
    assert_eq!(number.field_name(), "1");
    assert_eq!(PivotKey::from_scalar(&ScalarValue::Null), None);
    assert_eq!(PivotKey::from_scalar(&ScalarValue::Number(f64::NAN)), None);
}

#[test]
fn date_cells_are_read_leniently() {
    let expected = NaiveDate::from_ymd_opt(2020, 1, 31).expect("date");
    assert_eq!(scalar_to_date(&"2020-01-31".into()), Some(expected));
    assert_eq!(scalar_to_date(&"2020-01-31T00:00:00".into()), Some(expected));
    assert_eq!(
        scalar_to_date(&"2020-02".into()),
        NaiveDate::from_ymd_opt(2020, 2, 1)
    );
    assert_eq!(scalar_to_date(&"not a date".into()), None);
    assert_eq!(scalar_to_date(&ScalarValue::from(20200131.0)), None);

    assert_eq!(format_date(expected), "2020-01-31");
    assert!(parse_date("31/01/2020", "start_date").is_err());
}

#[test]
fn date_window_is_inclusive_and_order_tolerant() {
    let rows: Vec<FlatRecord> = ["2020-01-31", "2020-02-29", "2020-03-31", "bad"]
        .into_iter()
        .map(|date| [("date", ScalarValue::from(date))].into_iter().collect())
        .collect();
    let start = NaiveDate::from_ymd_opt(2020, 2, 29);
    let end = NaiveDate::from_ymd_opt(2020, 3, 31);

    let window = records_in_date_window(&rows, "date", start, end);
    assert_eq!(window.len(), 2);

    let swapped = records_in_date_window(&rows, "date", end, start);
    assert_eq!(swapped, window);

    let open = records_in_date_window(&rows, "date", None, None);
    assert_eq!(open.len(), 4);

    let from_start = records_in_date_window(&rows, "date", start, None);
    assert_eq!(from_start.len(), 2);
}
