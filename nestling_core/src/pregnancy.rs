//! Pregnancy date calculator.
//!
//! Converts a due date into progress indicators:
//! - Progress percentage (0-100)
//! - Current week (1-40)
//! - Trimester
//!
//! All functions take "now" explicitly and never fail. An absent due date
//! yields the display fallbacks (0%, week 1) instead of an error.

use crate::{PregnancyStatus, Trimester};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

/// Pregnancy duration from conception to due date
pub const PREGNANCY_DURATION_DAYS: i64 = 280;

/// Number of weeks in a full-term pregnancy
pub const PREGNANCY_WEEKS: u8 = 40;

const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;

/// Parse a due date from user input
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (the date part is used).
/// Returns `None` for empty or unparseable input.
pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(input)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

/// Conception date: due date minus 280 days
///
/// `None` when that date falls outside the representable calendar.
pub fn conception_date(due_date: NaiveDate) -> Option<NaiveDate> {
    due_date.checked_sub_days(Days::new(PREGNANCY_DURATION_DAYS as u64))
}

/// Whole days elapsed since conception, truncated toward zero
///
/// Negative before conception. `None` when the conception date cannot be
/// represented; callers treat that like an absent due date.
pub fn days_elapsed(due_date: NaiveDate, now: DateTime<Utc>) -> Option<i64> {
    let conception = start_of_day(conception_date(due_date)?);
    Some((now - conception).num_days())
}

/// Pregnancy progress as a percentage in `[0, 100]`
pub fn calculate_progress(due_date: Option<NaiveDate>, now: DateTime<Utc>) -> u8 {
    let Some(days) = due_date.and_then(|d| days_elapsed(d, now)) else {
        return 0;
    };

    // round(days / 280 * 100), halves rounding up
    let percent = (days * 100 + PREGNANCY_DURATION_DAYS / 2).div_euclid(PREGNANCY_DURATION_DAYS);

    percent.clamp(0, 100) as u8
}

/// Current pregnancy week in `[1, 40]`
///
/// Before conception this still reports week 1; overdue reports week 40.
pub fn calculate_week(due_date: Option<NaiveDate>, now: DateTime<Utc>) -> u8 {
    let Some(days) = due_date.and_then(|d| days_elapsed(d, now)) else {
        return 1;
    };

    let week = (days + 6).div_euclid(7);

    week.clamp(1, PREGNANCY_WEEKS as i64) as u8
}

/// Trimester for a pregnancy week
pub fn trimester_for_week(week: u8) -> Trimester {
    match week {
        0..=13 => Trimester::First,
        14..=26 => Trimester::Second,
        _ => Trimester::Third,
    }
}

/// Whole weeks remaining until the due date, never negative
pub fn weeks_until_due(due_date: Option<NaiveDate>, now: DateTime<Utc>) -> i64 {
    let Some(due_date) = due_date else {
        return 0;
    };

    let remaining = start_of_day(due_date) - now;
    remaining.num_seconds().div_euclid(SECONDS_PER_WEEK).max(0)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl PregnancyStatus {
    /// Compute all progress indicators for `due_date` as of `now`
    pub fn compute(due_date: Option<NaiveDate>, now: DateTime<Utc>) -> Self {
        let current_week = calculate_week(due_date, now);
        let status = Self {
            progress_percent: calculate_progress(due_date, now),
            current_week,
            trimester: trimester_for_week(current_week),
            weeks_until_due: weeks_until_due(due_date, now),
        };

        tracing::debug!(
            ?due_date,
            progress = status.progress_percent,
            week = status.current_week,
            "Computed pregnancy status"
        );

        status
    }
}
