use chrono::{Datelike, NaiveDate};

/// Quarter label for a date, e.g. "Q3 2025"
pub fn current_period(date: NaiveDate) -> String {
    let quarter = (date.month() - 1) / 3 + 1;
    format!("Q{} {}", quarter, date.year())
}
