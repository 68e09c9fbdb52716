//! Naive calendar ordering: dates are calendar days, times are 24-hour
//! time-of-day values. No timezone conversion anywhere.

use core::cmp::Ordering;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::errors::CoreError;

/* -------------------------------------------------------------------------- */
/*                               Stable ordering                              */
/* -------------------------------------------------------------------------- */

#[inline]
pub fn compare_dates(a: &NaiveDate, b: &NaiveDate) -> Ordering {
    a.cmp(b)
}

#[inline]
pub fn compare_times(a: &NaiveTime, b: &NaiveTime) -> Ordering {
    a.cmp(b)
}

/// Inclusive on both ends. An inverted range contains nothing.
#[inline]
pub fn within_range(date: &NaiveDate, start: &NaiveDate, end: &NaiveDate) -> bool {
    compare_dates(start, date) != Ordering::Greater && compare_dates(date, end) != Ordering::Greater
}

/* -------------------------------------------------------------------------- */
/*                                   Parsing                                  */
/* -------------------------------------------------------------------------- */

/// `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| CoreError::InvalidDate)
}

/// `HH:MM`, with `HH:MM:SS` also accepted.
pub fn parse_time(s: &str) -> Result<NaiveTime, CoreError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| CoreError::InvalidTime)
}

/* -------------------------------------------------------------------------- */
/*                                  Display                                   */
/* -------------------------------------------------------------------------- */

const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];
const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Date rendering style, always passed explicitly by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DateFormat {
    /// `2024-05-01`
    #[default]
    Iso,
    /// `1 Mei 2024`
    LongId,
    /// `1 May 2024`
    LongEn,
}

pub fn format_date(date: &NaiveDate, style: DateFormat) -> String {
    let m = date.month0() as usize;
    match style {
        DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
        DateFormat::LongId => format!("{} {} {}", date.day(), MONTHS_ID[m], date.year()),
        DateFormat::LongEn => format!("{} {} {}", date.day(), MONTHS_EN[m], date.year()),
    }
}

/// Weekday name in the language of `style` (ISO falls back to English).
pub fn weekday_name(date: &NaiveDate, style: DateFormat) -> &'static str {
    let wd = date.weekday();
    match style {
        DateFormat::LongId => match wd {
            Weekday::Mon => "Senin",
            Weekday::Tue => "Selasa",
            Weekday::Wed => "Rabu",
            Weekday::Thu => "Kamis",
            Weekday::Fri => "Jumat",
            Weekday::Sat => "Sabtu",
            Weekday::Sun => "Minggu",
        },
        DateFormat::Iso | DateFormat::LongEn => match wd {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        },
    }
}

#[inline]
pub fn format_time(t: &NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Serde adapter keeping time-of-day on the wire as `HH:MM`, or `HH:MM:SS`
/// when the seconds are non-zero so a save/load cycle is lossless.
#[cfg(feature = "serde")]
pub mod hm_format {
    use chrono::{NaiveTime, Timelike};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        if t.second() == 0 {
            s.serialize_str(&super::format_time(t))
        } else {
            s.serialize_str(&t.format("%H:%M:%S").to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).map_err(D::Error::custom)
    }
}
