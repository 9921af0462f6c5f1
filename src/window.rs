use crate::error::{Result, TrailError};
use crate::model::TimeWindow;
use chrono::{DateTime, Local, Months, NaiveDate, Utc};

/// Resolve the effective `[start, end)` window from either a relative month
/// count or an explicit date range. `now` is injected so callers (and tests)
/// control the clock; only the CLI passes `Utc::now()`.
///
/// An explicit `--since`/`--until` range takes precedence entirely over
/// `--months`. `--until` without `--since` is always an error: a window start
/// must come from the explicit range once one is given.
pub fn resolve_window(
    months: Option<u32>,
    since: Option<&str>,
    until: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TimeWindow> {
    let window = match (since, months) {
        (Some(since), _) => {
            let start = day_start(parse_date(since)?)?;
            let end = match until {
                Some(until) => day_end(parse_date(until)?, now)?,
                None => now,
            };
            TimeWindow { start, end }
        }
        (None, Some(months)) => {
            if until.is_some() {
                return Err(TrailError::Config(
                    "--until requires --since; pass an explicit range or --months alone".into(),
                ));
            }
            let start = now
                .checked_sub_months(Months::new(months))
                .ok_or_else(|| TrailError::InvalidDate(format!("cannot go back {months} months")))?;
            TimeWindow { start, end: now }
        }
        (None, None) => {
            let msg = if until.is_some() {
                "--until requires --since; no window start can be derived"
            } else {
                "no time window given; pass --months or --since/--until"
            };
            return Err(TrailError::Config(msg.into()));
        }
    };

    if window.start >= window.end {
        return Err(TrailError::Config(format!(
            "window start ({}) is not before its end ({})",
            window.start, window.end
        )));
    }

    Ok(window)
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    let normalized = input.replace('/', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .map_err(|err| TrailError::InvalidDate(format!("'{input}' is not a YYYY-MM-DD date: {err}")))
}

/// Local start-of-day, converted to a UTC instant.
fn day_start(date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TrailError::InvalidDate(format!("no midnight on {date}")))?;
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TrailError::InvalidDate(format!("{date} does not exist in the local timezone")))
}

/// Exclusive end instant for an inclusive end date: the local start of the
/// following day, clamped to `now` so the window never reaches the future.
fn day_end(date: NaiveDate, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let next = date
        .succ_opt()
        .ok_or_else(|| TrailError::InvalidDate(format!("no day after {date}")))?;
    Ok(day_start(next)?.min(now))
}
