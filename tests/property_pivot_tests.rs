use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use tabular_rs::core::{FlatRecord, PivotSpec, ScalarValue, pivot_long_to_wide};

fn long_row_strategy() -> impl Strategy<Value = (u8, u8, i32)> {
    (0u8..8, 0u8..5, -10_000i32..10_000)
}

fn to_record((date, ticker, price): (u8, u8, i32)) -> FlatRecord {
    [
        ("date", ScalarValue::from(format!("2020-{:02}", date + 1))),
        ("ticker", ScalarValue::from(format!("T{ticker}"))),
        ("price", ScalarValue::from(f64::from(price) / 100.0)),
    ]
    .into_iter()
    .collect()
}

proptest! {
    #[test]
    fn wide_rows_match_distinct_pivot_values_in_first_seen_order(
        raw in prop::collection::vec(long_row_strategy(), 0..200)
    ) {
        let rows: Vec<FlatRecord> = raw.iter().copied().map(to_record).collect();
        let table = pivot_long_to_wide(&rows, &PivotSpec::default());

        let mut seen = HashSet::new();
        let expected_order: Vec<String> = rows
            .iter()
            .map(|row| row.display_text("date"))
            .filter(|date| seen.insert(date.clone()))
            .collect();
        let actual_order: Vec<String> = table
            .records()
            .iter()
            .map(|row| row.pivot_value().display_text())
            .collect();
        prop_assert_eq!(actual_order, expected_order);
    }

    #[test]
    fn every_attribute_is_the_last_value_seen_for_its_pair(
        raw in prop::collection::vec(long_row_strategy(), 0..200)
    ) {
        let rows: Vec<FlatRecord> = raw.iter().copied().map(to_record).collect();
        let table = pivot_long_to_wide(&rows, &PivotSpec::default());

        let mut last: HashMap<(String, String), f64> = HashMap::new();
        for row in &rows {
            let key = (row.display_text("date"), row.display_text("ticker"));
            last.insert(key, row.value_f64("price").expect("numeric price"));
        }

        let mut attribute_count = 0;
        for wide in table.records() {
            let date = wide.pivot_value().display_text();
            for (series, value) in wide.series_values() {
                attribute_count += 1;
                let expected = last.get(&(date.clone(), series.to_owned()));
                prop_assert_eq!(expected.copied(), Some(value));
            }
        }
        prop_assert_eq!(attribute_count, last.len());
    }

    #[test]
    fn series_are_listed_once_in_first_seen_order(
        raw in prop::collection::vec(long_row_strategy(), 0..200)
    ) {
        let rows: Vec<FlatRecord> = raw.iter().copied().map(to_record).collect();
        let table = pivot_long_to_wide(&rows, &PivotSpec::default());

        let mut seen = HashSet::new();
        let expected: Vec<String> = rows
            .iter()
            .map(|row| row.display_text("ticker"))
            .filter(|ticker| seen.insert(ticker.clone()))
            .collect();
        prop_assert_eq!(table.series(), expected.as_slice());
    }
}
