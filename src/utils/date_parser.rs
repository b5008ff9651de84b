use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::normalizer::RawValue;

/// dd-mm-yyyy or dd/mm/yyyy
static DAY_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").expect("valid regex"));

/// yyyy-mm-dd or yyyy/mm/dd
static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})$").expect("valid regex"));

/// yyyy-mm or yyyy/mm, first of the month
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[/-](\d{1,2})$").expect("valid regex"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%Y %B %d",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%d %b %y",
];

/// Month and year only. Parsed with a leading day of 1.
const MONTH_YEAR_FORMATS: &[&str] = &["%d %B %Y", "%d %B, %Y", "%d %b-%Y", "%d %b-%y"];

// chrono's %Y is variable width, so "March 2024" would otherwise read as
// day 20 of year 24.
const MIN_YEAR: i32 = 1000;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Spreadsheet serial day number -> calendar date.
///
/// Day 0 is 1899-12-30, which absorbs the 1900 leap-year bug for every
/// serial after February 1900. Fractions are a time of day and are dropped.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let offset = Duration::try_milliseconds((serial * MILLIS_PER_DAY).round() as i64)?;
    epoch.checked_add_signed(offset).map(|dt| dt.date())
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    (date.year() >= MIN_YEAR).then_some(date)
}

fn parse_loose(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok().map(|dt| dt.date()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok().and_then(plausible))
        })
        .or_else(|| {
            let padded = format!("1 {}", s);
            MONTH_YEAR_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(&padded, f).ok().and_then(plausible))
        })
        .and_then(plausible)
}

fn parse_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(c) = DAY_FIRST.captures(s) {
        return ymd(&c[3], &c[2], &c[1]);
    }

    if let Some(c) = YEAR_FIRST.captures(s) {
        return ymd(&c[1], &c[2], &c[3]);
    }

    if let Some(c) = YEAR_MONTH.captures(s) {
        return ymd(&c[1], &c[2], "1");
    }

    parse_loose(s)
}

/// Best-effort calendar date from a loosely-typed cell. Never fails: anything
/// unrecognised (or a pattern naming an impossible day) yields `None`.
pub fn parse_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Empty | RawValue::Bool(false) => None,
        RawValue::Number(n) if *n == 0.0 || n.is_nan() => None,
        RawValue::Date(d) => Some(*d),
        RawValue::Number(n) => serial_to_date(*n),
        RawValue::Text(s) => parse_text(s),
        RawValue::Bool(true) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn day_first_and_iso_strings() {
        assert_eq!(parse_date(&text("15-03-2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("15/03/2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("2024-03-15")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("2024/3/5")), date(2024, 3, 5));
        assert_eq!(parse_date(&text(" 5-3-2024 ")), date(2024, 3, 5));
    }

    #[test]
    fn day_first_wins_over_month_first() {
        // 03/04 is the 3rd of April, not March 4th.
        assert_eq!(parse_date(&text("03/04/2024")), date(2024, 4, 3));
    }

    #[test]
    fn empty_and_garbage_yield_none() {
        assert_eq!(parse_date(&text("")), None);
        assert_eq!(parse_date(&text("   ")), None);
        assert_eq!(parse_date(&RawValue::Empty), None);
        assert_eq!(parse_date(&text("not a date")), None);
        assert_eq!(parse_date(&RawValue::Bool(false)), None);
        assert_eq!(parse_date(&RawValue::Bool(true)), None);
        assert_eq!(parse_date(&RawValue::Number(0.0)), None);
        assert_eq!(parse_date(&RawValue::Number(f64::NAN)), None);
    }

    #[test]
    fn impossible_days_yield_none() {
        assert_eq!(parse_date(&text("31-02-2024")), None);
        assert_eq!(parse_date(&text("2024-13-01")), None);
    }

    #[test]
    fn serial_numbers_count_from_1899_12_30() {
        assert_eq!(parse_date(&RawValue::Number(1.0)), date(1899, 12, 31));
        assert_eq!(parse_date(&RawValue::Number(2.0)), date(1900, 1, 1));
        assert_eq!(parse_date(&RawValue::Number(45000.0)), date(2023, 3, 15));
        assert_eq!(parse_date(&RawValue::Number(45366.75)), date(2024, 3, 15));
        assert_eq!(parse_date(&RawValue::Number(-1.0)), date(1899, 12, 29));
        assert_eq!(parse_date(&RawValue::Number(f64::INFINITY)), None);
        assert_eq!(parse_date(&RawValue::Number(1e300)), None);
    }

    #[test]
    fn native_dates_pass_through() {
        let d = NaiveDate::from_ymd_opt(2022, 11, 30).unwrap();
        assert_eq!(parse_date(&RawValue::Date(d)), Some(d));
    }

    #[test]
    fn loose_formats_fall_back() {
        assert_eq!(parse_date(&text("2024-03-15T10:30:00Z")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("2024-03-15 08:00:00")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("March 15, 2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("15 March 2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("Fri, 15 Mar 2024 10:00:00 +0000")), date(2024, 3, 15));
    }

    #[test]
    fn month_and_year_resolve_to_the_first() {
        assert_eq!(parse_date(&text("March 2024")), date(2024, 3, 1));
        assert_eq!(parse_date(&text("Mar 2024")), date(2024, 3, 1));
        assert_eq!(parse_date(&text("2024-03")), date(2024, 3, 1));
        assert_eq!(parse_date(&text("2024/3")), date(2024, 3, 1));
        assert_eq!(parse_date(&text("2024-13")), None);
    }

    #[test]
    fn abbreviated_month_with_dashes() {
        assert_eq!(parse_date(&text("15-Mar-2024")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("15-Mar-24")), date(2024, 3, 15));
        assert_eq!(parse_date(&text("15 Mar 24")), date(2024, 3, 15));
    }

    #[test]
    fn short_years_from_text_are_rejected() {
        assert_eq!(parse_date(&text("March 20 24")), None);
        assert_eq!(parse_date(&text("15 March 24")), None);
    }
}
