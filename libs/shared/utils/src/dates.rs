use chrono::{Duration, NaiveDate};

/// Days added to a caller-supplied `date_to` before it is used as an exclusive
/// upper bound. Date-range listings (appointments, medical records) have always
/// widened the range this way and clients rely on it.
pub const DATE_TO_WIDENING_DAYS: i64 = 2;

/// `dd-mm-yyyy`, the format used in user-facing booking messages.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Exclusive upper bound for a `date_to` filter: `date_to + 2 days`.
pub fn widened_upper_bound(date_to: NaiveDate) -> NaiveDate {
    date_to
        .checked_add_signed(Duration::days(DATE_TO_WIDENING_DAYS))
        .unwrap_or(NaiveDate::MAX)
}
