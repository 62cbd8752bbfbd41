//! Age calculations for profile setup
//!
//! Ages are whole years elapsed: a birthday that has not yet happened this
//! year does not count.

use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Largest age a window may name
pub const MAX_AGE_YEARS: u32 = 150;

/// Inclusive range of accepted ages, in whole years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeWindow {
    pub min_years: u32,
    pub max_years: u32,
}

impl Default for AgeWindow {
    fn default() -> Self {
        Self {
            min_years: 13,
            max_years: 100,
        }
    }
}

impl AgeWindow {
    /// Whether `dob` falls within `[today - max_years, today - min_years]`
    ///
    /// When the shifted day does not exist (Feb 29 in a common year) the
    /// bound is clamped to the last day of that month. A window too wide to
    /// express in months contains nothing.
    pub fn contains(&self, dob: NaiveDate, today: NaiveDate) -> bool {
        let latest = years_before(today, self.min_years);
        let earliest = years_before(today, self.max_years);
        match (earliest, latest) {
            (Some(earliest), Some(latest)) => earliest <= dob && dob <= latest,
            _ => false,
        }
    }
}

fn years_before(today: NaiveDate, years: u32) -> Option<NaiveDate> {
    let months = years.checked_mul(12)?;
    today.checked_sub_months(Months::new(months))
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Full years elapsed between `dob` and today
pub fn calculate_age(dob: NaiveDate) -> i32 {
    calculate_age_on(dob, today())
}

/// Full years elapsed between `dob` and `today`
pub fn calculate_age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Build a birth date from day / month / year form inputs
///
/// Month is 1-indexed. Returns `None` for blank, non-numeric or impossible
/// dates.
///
/// Impossible dates are rejected rather than rolled over. JavaScript's
/// `new Date(2000, 1, 31)` silently becomes 2 March 2000; here `31/02/2000`
/// yields `None`, so the age checks built on this return `false` for it.
pub fn parse_birth_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether the form inputs describe someone aged 13 to 100, as of today
pub fn is_at_least_13_at_most_100(day: &str, month: &str, year: &str) -> bool {
    is_at_least_13_at_most_100_on(day, month, year, today())
}

/// Whether the form inputs describe someone aged 13 to 100, as of `today`
pub fn is_at_least_13_at_most_100_on(day: &str, month: &str, year: &str, today: NaiveDate) -> bool {
    is_within_age_window(day, month, year, AgeWindow::default(), today)
}

/// Whether the form inputs describe a birth date inside `window`
pub fn is_within_age_window(
    day: &str,
    month: &str,
    year: &str,
    window: AgeWindow,
    today: NaiveDate,
) -> bool {
    parse_birth_date(day, month, year)
        .map(|dob| window.contains(dob, today))
        .unwrap_or(false)
}
