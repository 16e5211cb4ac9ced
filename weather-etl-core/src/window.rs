//! Observation window calculation.
//!
//! Providers finalize a day's observed values with some delay, so the window
//! ends yesterday and reaches back a full week. Consecutive runs overlap, which
//! the keyed upsert absorbs.

use chrono::{Days, Local, NaiveDate};

use crate::model::DateRange;

/// Days between "today" and the first day of the window.
pub const LOOKBACK_DAYS: u64 = 7;

/// Days between the last day of the window and "today".
pub const TRAILING_DAYS: u64 = 1;

/// Window for the given anchor date: `today - 7 ..= today - 1`.
pub fn observation_window(today: NaiveDate) -> DateRange {
    let start = today - Days::new(LOOKBACK_DAYS);
    let end = today - Days::new(TRAILING_DAYS);
    DateRange::new(start, end)
}

/// The local calendar date the window is anchored on.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
