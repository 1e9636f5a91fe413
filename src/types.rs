use crate::ParseError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_DAY, MAX_LUNAR_DAY, MAX_MONTH, MAX_ORDINAL, MAX_WEEKDAY, MAX_YEAR,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use std::num::NonZeroU8;

/// A year value guaranteed to be in the range `1..=MAX_YEAR` (1..=9999).
/// Year 1 doubles as the sentinel for year-independent recurring dates.
/// Uses `NonZeroU16` internally, so 0 is not a valid year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's non-zero and <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, ParseError> {
        let non_zero = NonZeroU16::new(value).ok_or(ParseError::InvalidYear(value))?;
        if value > MAX_YEAR {
            return Err(ParseError::InvalidYear(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12).
/// Used for both Gregorian and lunar months (same domain).
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day-of-month value in the range `1..=MAX_DAY` (1..=31).
///
/// Only the range is checked here. Whether the day actually exists in its
/// month and year (Feb 30, Apr 31) is checked when the date is resolved
/// against an anchor year, since feasibility can depend on leap years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's in `1..=MAX_DAY`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or > `MAX_DAY`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidDay(value))?;
        if value > MAX_DAY {
            return Err(ParseError::InvalidDay(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lunar day-of-month value in the range `1..=MAX_LUNAR_DAY` (1..=30).
///
/// Short lunar months have 29 days; whether day 30 exists in a given lunar
/// month is only known at resolution time, from the lunar table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LunarDay(NonZeroU8);

impl LunarDay {
    /// Creates a new LunarDay, validating that it's in `1..=MAX_LUNAR_DAY`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidLunarDay` if the value is 0 or > `MAX_LUNAR_DAY`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidLunarDay(value))?;
        if value > MAX_LUNAR_DAY {
            return Err(ParseError::InvalidLunarDay(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the lunar day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for LunarDay {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LunarDay> for u8 {
    fn from(day: LunarDay) -> Self {
        day.0.get()
    }
}

impl fmt::Display for LunarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A weekday index in the range `0..=MAX_WEEKDAY`, 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Weekday(u8);

impl Weekday {
    /// Creates a new Weekday, validating that it's <= `MAX_WEEKDAY`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidWeekday` if the value is > `MAX_WEEKDAY`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        if value > MAX_WEEKDAY {
            return Err(ParseError::InvalidWeekday(value));
        }
        Ok(Self(value))
    }

    /// Returns the weekday index as u8 (0 = Sunday)
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Weekday {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weekday> for u8 {
    fn from(weekday: Weekday) -> Self {
        weekday.0
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordinal occurrence of a weekday within a month, in `1..=MAX_ORDINAL`
/// ("3rd Sunday" has ordinal 3). Whether the occurrence exists in a given
/// month is only known at resolution time.
/// Uses `NonZeroU8` internally, so 0 is not a valid ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Ordinal(NonZeroU8);

impl Ordinal {
    /// Creates a new Ordinal, validating that it's non-zero and <= `MAX_ORDINAL`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidOrdinal` if the value is 0 or > `MAX_ORDINAL`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidOrdinal(value))?;
        if value > MAX_ORDINAL {
            return Err(ParseError::InvalidOrdinal(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the ordinal value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Ordinal {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ordinal> for u8 {
    fn from(ordinal: Ordinal) -> Self {
        ordinal.0.get()
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
/// Standard civil-from-days arithmetic (Howard Hinnant's algorithm).
pub(crate) const fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (month as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719_468
}

/// Inverse of `days_from_civil`: (year, month, day) for a day number.
pub(crate) const fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

/// Weekday index (0 = Sunday) of a Gregorian date.
pub const fn weekday_of(year: u16, month: u8, day: u8) -> u8 {
    // 1970-01-01 was a Thursday (index 4)
    let z = days_from_civil(year as i64, month, day);
    (z + 4).rem_euclid(7) as u8
}
