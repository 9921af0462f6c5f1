use chrono::{DateTime, TimeZone, Utc};
use gittrail::error::TrailError;
use gittrail::window::resolve_window;
use pretty_assertions::assert_eq;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap()
}

#[test]
fn months_subtract_calendar_months_not_30_day_blocks() {
    let w = resolve_window(Some(1), None, None, now()).unwrap();
    assert_eq!(w.end, now());
    // March 31 minus one calendar month clamps to February 28
    assert_eq!(w.start, Utc.with_ymd_and_hms(2026, 2, 28, 12, 0, 0).unwrap());
}

#[test]
fn explicit_range_overrides_months_entirely() {
    let explicit = resolve_window(None, Some("2026-01-01"), Some("2026-02-01"), now()).unwrap();
    let both = resolve_window(Some(2), Some("2026-01-01"), Some("2026-02-01"), now()).unwrap();
    assert_eq!(both, explicit);
}

#[test]
fn since_only_ends_at_now() {
    let w = resolve_window(None, Some("2026-01-01"), None, now()).unwrap();
    assert_eq!(w.end, now());
    assert!(w.start < w.end);
}

#[test]
fn until_alone_is_a_configuration_error() {
    let err = resolve_window(None, None, Some("2026-02-01"), now()).unwrap_err();
    assert!(matches!(err, TrailError::Config(_)));
}

#[test]
fn months_with_until_is_a_configuration_error() {
    let err = resolve_window(Some(2), None, Some("2026-02-01"), now()).unwrap_err();
    assert!(matches!(err, TrailError::Config(_)));
}

#[test]
fn no_window_at_all_is_a_configuration_error() {
    let err = resolve_window(None, None, None, now()).unwrap_err();
    assert!(matches!(err, TrailError::Config(_)));
}

#[test]
fn inverted_range_is_a_configuration_error() {
    let err = resolve_window(None, Some("2026-03-01"), Some("2026-01-01"), now()).unwrap_err();
    assert!(matches!(err, TrailError::Config(_)));
}

#[test]
fn unparseable_date_is_an_invalid_date_error() {
    let err = resolve_window(None, Some("first of may"), None, now()).unwrap_err();
    assert!(matches!(err, TrailError::InvalidDate(_)));
}

#[test]
fn far_future_until_clamps_to_now() {
    let w = resolve_window(None, Some("2026-01-01"), Some("2030-01-01"), now()).unwrap();
    assert_eq!(w.end, now());
}

#[test]
fn until_date_is_inclusive() {
    // a single-day range spans that whole local day (within DST tolerance)
    let w = resolve_window(None, Some("2026-01-10"), Some("2026-01-10"), now()).unwrap();
    let hours = (w.end - w.start).num_hours();
    assert!((23..=25).contains(&hours), "window spans {hours} hours");
}

#[test]
fn slash_separated_dates_are_accepted() {
    let slashes = resolve_window(None, Some("2026/01/01"), Some("2026/02/01"), now()).unwrap();
    let dashes = resolve_window(None, Some("2026-01-01"), Some("2026-02-01"), now()).unwrap();
    assert_eq!(slashes, dashes);
}
