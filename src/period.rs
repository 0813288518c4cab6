//! 15th-to-15th billing periods.
//!
//! A period starts on the 15th of one month (inclusive) and ends on the 15th
//! of the next month (exclusive). It is identified by the short label
//! `YYYY-MM` of its start month, or by the range label
//! `YYYY-MM-15 to YYYY-MM-15`.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::{LedgerError, Result};

/// day of month every period starts on
pub const PERIOD_START_DAY: u32 = 15;

const RANGE_SEPARATOR: &str = " to ";

/// billing period, keyed by its start month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    // always falls on PERIOD_START_DAY
    start: NaiveDate,
}

impl Period {
    /// period starting on the 15th of the given month
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, PERIOD_START_DAY)
            .map(|start| Period { start })
            .ok_or_else(|| {
                LedgerError::invalid_period(&format!("{:04}-{:02}", year, month), "month out of range")
            })
    }

    /// period containing the given calendar date
    pub fn containing(date: NaiveDate) -> Self {
        let day = date.day();
        let start = if day >= PERIOD_START_DAY {
            date - Days::new(u64::from(day - PERIOD_START_DAY))
        } else {
            // step back to the last day of the previous month, then down to its 15th
            let prev_month_end = date - Days::new(u64::from(day));
            prev_month_end - Days::new(u64::from(prev_month_end.day() - PERIOD_START_DAY))
        };
        Period { start }
    }

    /// period containing the utc calendar date of `now`
    pub fn current(now: DateTime<Utc>) -> Self {
        Self::containing(now.date_naive())
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// first day of the period (inclusive)
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// first day of the following period (exclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.start + Months::new(1)
    }

    pub fn next(&self) -> Self {
        Period { start: self.end_date() }
    }

    pub fn prev(&self) -> Self {
        Period { start: self.start - Months::new(1) }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end_date()
    }

    /// `YYYY-MM`
    pub fn short_label(&self) -> String {
        self.to_string()
    }

    /// `YYYY-MM-15 to YYYY-MM-15`
    pub fn range_label(&self) -> String {
        format!(
            "{}{}{}",
            self.start.format("%Y-%m-%d"),
            RANGE_SEPARATOR,
            self.end_date().format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        parse_period(s)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_period(&raw).map_err(serde::de::Error::custom)
    }
}

/// short label of the period containing `now`
pub fn period_label(now: DateTime<Utc>) -> String {
    Period::current(now).short_label()
}

/// range label of the period containing `now`
pub fn period_range_label(now: DateTime<Utc>) -> String {
    Period::current(now).range_label()
}

/// normalize a short label, range label or bare iso date to the short label
pub fn parse_period_label(input: &str) -> Result<String> {
    parse_period(input).map(|p| p.short_label())
}

/// parse any of the three accepted period forms
pub fn parse_period(input: &str) -> Result<Period> {
    let text = input.trim();

    if let Some((from, to)) = text.split_once(RANGE_SEPARATOR) {
        let start = parse_iso_date(from.trim())
            .ok_or_else(|| LedgerError::invalid_period(input, "malformed range start"))?;
        let end = parse_iso_date(to.trim())
            .ok_or_else(|| LedgerError::invalid_period(input, "malformed range end"))?;
        if start.day() != PERIOD_START_DAY || end.day() != PERIOD_START_DAY {
            return Err(LedgerError::invalid_period(input, "range must run 15th to 15th"));
        }
        let period = Period { start };
        if period.end_date() != end {
            return Err(LedgerError::invalid_period(input, "range must span exactly one month"));
        }
        return Ok(period);
    }

    match text.len() {
        7 => {
            let (year, month) = parse_year_month(text)
                .ok_or_else(|| LedgerError::invalid_period(input, "expected YYYY-MM"))?;
            Period::new(year, month).map_err(|_| LedgerError::invalid_period(input, "month out of range"))
        }
        10 => parse_iso_date(text)
            .map(Period::containing)
            .ok_or_else(|| LedgerError::invalid_period(input, "expected YYYY-MM-DD")),
        _ => Err(LedgerError::invalid_period(
            input,
            "expected YYYY-MM, YYYY-MM-DD or a 15th-to-15th range",
        )),
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
        return None;
    }
    Some((year.parse().ok()?, month.parse().ok()?))
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 || !s.is_ascii() || s.as_bytes()[7] != b'-' {
        return None;
    }
    let (year, month) = parse_year_month(&s[..7])?;
    let day = &s[8..];
    if !all_digits(day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_before_15th_belongs_to_previous_month() {
        assert_eq!(Period::containing(date(2025, 7, 1)).short_label(), "2025-06");
        assert_eq!(Period::containing(date(2025, 7, 14)).short_label(), "2025-06");
        assert_eq!(Period::containing(date(2025, 3, 10)).short_label(), "2025-02");
    }

    #[test]
    fn test_from_15th_belongs_to_own_month() {
        assert_eq!(Period::containing(date(2025, 7, 15)).short_label(), "2025-07");
        assert_eq!(Period::containing(date(2025, 7, 31)).short_label(), "2025-07");
        assert_eq!(Period::containing(date(2024, 2, 29)).short_label(), "2024-02");
    }

    #[test]
    fn test_year_rollover() {
        let jan = Period::containing(date(2025, 1, 3));
        assert_eq!(jan.short_label(), "2024-12");
        assert_eq!(jan.range_label(), "2024-12-15 to 2025-01-15");

        let dec = Period::containing(date(2024, 12, 20));
        assert_eq!(dec.range_label(), "2024-12-15 to 2025-01-15");
        assert_eq!(dec.next().short_label(), "2025-01");
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn test_every_day_of_a_year() {
        let mut d = date(2023, 1, 1);
        while d.year() == 2023 {
            let period = Period::containing(d);
            assert!(period.contains(d), "{} not in {}", d, period.range_label());
            if d.day() < 15 {
                assert_eq!(period, Period::containing(date(2023, d.month(), 15)).prev());
            } else {
                assert_eq!((period.year(), period.month()), (2023, d.month()));
            }
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_current_uses_utc_date() {
        let now = Utc.with_ymd_and_hms(2025, 8, 14, 23, 59, 59).unwrap();
        assert_eq!(period_label(now), "2025-07");
        assert_eq!(period_range_label(now), "2025-07-15 to 2025-08-15");

        let now = Utc.with_ymd_and_hms(2025, 8, 15, 0, 0, 0).unwrap();
        assert_eq!(period_label(now), "2025-08");
    }

    #[test]
    fn test_parse_accepts_all_three_forms() {
        assert_eq!(parse_period_label("2025-07").unwrap(), "2025-07");
        assert_eq!(parse_period_label("2025-07-15 to 2025-08-15").unwrap(), "2025-07");
        assert_eq!(parse_period_label("2025-07-20").unwrap(), "2025-07");
        assert_eq!(parse_period_label("2025-07-03").unwrap(), "2025-06");
        assert_eq!(parse_period_label("  2025-12-15 to 2026-01-15 ").unwrap(), "2025-12");
    }

    #[test]
    fn test_parse_inverts_range_label() {
        let mut period = Period::new(2023, 1).unwrap();
        for _ in 0..36 {
            assert_eq!(parse_period(&period.range_label()).unwrap(), period);
            assert_eq!(parse_period(&period.short_label()).unwrap(), period);
            period = period.next();
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in [
            "",
            "2025",
            "2025-13",
            "2025-00",
            "2025-7",
            "25-07",
            "2025/07",
            "2025-02-30",
            "2025-07-01 to 2025-08-01",
            "2025-07-15 to 2025-09-15",
            "2025-07-15 to",
            "July 2025",
        ] {
            let err = parse_period_label(bad).unwrap_err();
            assert_eq!(err.code(), "INVALID_PERIOD", "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_serde_normalizes_to_short_label() {
        let period = Period::new(2025, 7).unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"2025-07\"");

        let legacy: Period = serde_json::from_str("\"2025-07-15 to 2025-08-15\"").unwrap();
        assert_eq!(legacy, period);
    }
}
