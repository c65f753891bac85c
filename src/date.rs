//! Date parsing for form input.

use crate::{Error, Result};
use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, Utc};

const DATE: &str = "%Y-%m-%d";
const DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Normalize a date, a date time or an RFC 3339 timestamp to `YYYY-MM-DD`.
/// Input in any other form is returned unchanged.
pub fn normalize_date(s: &str) -> String {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return t.date_naive().format(DATE).to_string();
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, DATE_TIME) {
        return t.date().format(DATE).to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE) {
        return d.format(DATE).to_string();
    }
    s.to_owned()
}

/// Parse a form date, rejecting anything `normalize_date` does not understand.
pub fn parse_date(field: &str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&normalize_date(s), DATE)
        .map_err(|_| Error::Validation(format!("Format tanggal {} tidak valid: {}", field, s)))
}

/// Parse a form date or time to unix seconds. Plain dates mean midnight UTC.
pub fn parse_timestamp(field: &str, s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.timestamp());
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, DATE_TIME) {
        return Ok(t.and_utc().timestamp());
    }
    let date = parse_date(field, s)?;
    Ok(date.and_time(Default::default()).and_utc().timestamp())
}

/// Due date of a contract starting at `start`: one calendar month later,
/// clamped to the end of shorter months.
pub fn add_month(start: NaiveDate) -> NaiveDate {
    start.checked_add_months(Months::new(1)).unwrap_or(start)
}

/// Last day of the due-soon window starting at `today`.
pub fn due_soon_until(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(7)).unwrap_or(today)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
