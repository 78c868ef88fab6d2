use chrono::{NaiveDate, Utc};

/// Current calendar date. All streak arithmetic is done in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole days between the streak start and `today`. Never negative: a start
/// date in the future counts as zero days.
pub fn elapsed_days(streak_start: NaiveDate, today: NaiveDate) -> i64 {
    (today - streak_start).num_days().max(0)
}
