use tabular_rs::telemetry::{DEFAULT_FILTER, init_default_tracing, init_tracing_with_fallback};

#[test]
fn tracing_installs_at_most_once() {
    let first = init_default_tracing();
    let second = init_tracing_with_fallback("tabular_rs=debug");

    assert!(!second);
    if cfg!(not(feature = "telemetry")) {
        assert!(!first);
    }
    assert!(DEFAULT_FILTER.contains("tabular_rs"));
}
