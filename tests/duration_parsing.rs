// tests/duration_parsing.rs

use std::time::Duration;

use snapctl::types::parse_duration;

#[test]
fn single_units() {
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
    assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
    assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
}

#[test]
fn bare_number_is_seconds() {
    assert_eq!(parse_duration(" 45 ").unwrap(), Duration::from_secs(45));
    assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
}

#[test]
fn compound_durations_add_up() {
    assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
    assert_eq!(
        parse_duration("1h1m1s500ms").unwrap(),
        Duration::from_millis(3_661_500)
    );
}

#[test]
fn malformed_durations_are_rejected() {
    for bad in ["", "   ", "soon", "10x", "s30", "1m30"] {
        assert!(parse_duration(bad).is_err(), "{bad:?} should be rejected");
    }
}
