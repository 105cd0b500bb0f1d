//! Appointment dates as rendered by the booking page.
//!
//! The page shows dates as a weekday abbreviation followed by a day-first
//! numeric date, e.g. `Tu. 01.10.2024`. The abbreviation depends on the page
//! locale (`Di.`, `Ma.`, `Lu.` ...) and carries no information we need, so it
//! is matched but discarded.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use crate::error::MalformedDateError;

/// Exactly one prefix token followed by `DD.MM.YYYY`, nothing else.
static STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{L}{2,3}\.\s*([0-9]{2})\.([0-9]{2})\.([0-9]{4})$").expect("strict date pattern is valid")
});

/// The same token anywhere in a larger text, bounded so that neither the
/// prefix nor the year can be a fragment of a longer word or number.
static EMBEDDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}])\p{L}{2,3}\.\s*([0-9]{2})\.([0-9]{2})\.([0-9]{4})(?:$|[^0-9.]|\.(?:$|[^0-9]))")
        .expect("embedded date pattern is valid")
});

/// A calendar date without time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppointmentDate(NaiveDate);

impl AppointmentDate {
    /// Build a date from its components, `None` if it is not a calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for AppointmentDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for AppointmentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Turns rendered date text into [`AppointmentDate`]s.
pub struct DateParser;

impl DateParser {
    /// Parse text that consists of exactly `<Wd>. DD.MM.YYYY`.
    ///
    /// Leading and trailing whitespace is ignored; anything else around the
    /// date is rejected.
    pub fn parse(raw: &str) -> Result<AppointmentDate, MalformedDateError> {
        let text = raw.trim();
        let caps = STRICT
            .captures(text)
            .ok_or_else(|| MalformedDateError::NoMatch(text.to_string()))?;
        Self::from_captures(&caps)
    }

    /// Find the first `<Wd>. DD.MM.YYYY` token inside arbitrary text, such as
    /// `"Date: Th. 28.08.2025, 09:30"`.
    pub fn extract(text: &str) -> Result<AppointmentDate, MalformedDateError> {
        let caps = EMBEDDED
            .captures(text)
            .ok_or_else(|| MalformedDateError::NoMatch(text.trim().to_string()))?;
        Self::from_captures(&caps)
    }

    fn from_captures(caps: &Captures<'_>) -> Result<AppointmentDate, MalformedDateError> {
        let day: u32 = Self::number(caps, 1)?;
        let month: u32 = Self::number(caps, 2)?;
        let year: i32 = Self::number(caps, 3)?;

        AppointmentDate::from_ymd(year, month, day)
            .ok_or(MalformedDateError::InvalidCalendarDate { day, month, year })
    }

    fn number<T: FromStr>(caps: &Captures<'_>, group: usize) -> Result<T, MalformedDateError> {
        caps[group]
            .parse()
            .map_err(|_| MalformedDateError::NoMatch(caps[0].trim().to_string()))
    }
}
