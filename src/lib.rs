mod chinese;
mod consts;
mod lunar;
mod prelude;
mod types;

pub use consts::*;
pub use lunar::LunarTable;
pub use types::{Day, LunarDay, Month, Ordinal, Weekday, Year};

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use types::{days_in_month, weekday_of};

/// The day-encoding variant carried by a [`UniversalDate`]: a fixed Gregorian
/// month/day, a floating nth-weekday-of-month, or a Chinese lunar date.
///
/// Each variant has its own canonical key grammar, distinguished by delimiter
/// and field count so parsing needs no external type hint:
/// `"M-D"` (month-day), `"M-D-L"` (lunar, `L` ∈ {0,1} marks a leap month),
/// `"M/W/O"` (nth-weekday: month, weekday 0..=6 with 0 = Sunday, ordinal).
///
/// Equality is structural (field for field); resolution-based equality lives
/// on [`UniversalDate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Specifier {
    /// Fixed Gregorian month and day, e.g. "February 1st"
    #[display(fmt = "{}-{}", "month.get()", "day.get()")]
    MonthDay { month: Month, day: Day },
    /// Nth occurrence of a weekday within a month, e.g. "3rd Sunday of June"
    #[display(fmt = "{}/{}/{}", "month.get()", "weekday.get()", "ordinal.get()")]
    MonthWeekday {
        month: Month,
        weekday: Weekday,
        ordinal: Ordinal,
    },
    /// Chinese lunar month and day; `leap` selects the leap counterpart
    /// of the month in years that have one
    #[display(fmt = "{}-{}-{}", "month.get()", "day.get()", "u8::from(*leap)")]
    Lunar {
        month: Month,
        day: LunarDay,
        leap: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day: {} (must be 1-{})", "_0", MAX_DAY)]
    InvalidDay(u8),
    #[display(fmt = "Invalid lunar day: {} (must be 1-{})", "_0", MAX_LUNAR_DAY)]
    InvalidLunarDay(u8),
    #[display(fmt = "Invalid weekday: {} (must be 0-{})", "_0", MAX_WEEKDAY)]
    InvalidWeekday(u8),
    #[display(fmt = "Invalid ordinal: {} (must be 1-{})", "_0", MAX_ORDINAL)]
    InvalidOrdinal(u8),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Error type for resolving a specifier to an absolute calendar day.
///
/// Specifiers are range-checked at construction but may still name a day
/// that does not exist in a given anchor year; every such case surfaces
/// here instead of being clamped to a nearby date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The Gregorian day does not exist in that month and year (Feb 30).
    #[error("No such day: {year}-{month:02}-{day:02}")]
    NoSuchDay { year: u16, month: u8, day: u8 },

    /// The month has fewer occurrences of the weekday than requested.
    #[error("No occurrence {ordinal} of weekday {weekday} in {year}-{month:02}")]
    NoNthWeekday {
        year: u16,
        month: u8,
        ordinal: u8,
        weekday: u8,
    },

    /// The lunar year has no leap counterpart of the requested month.
    #[error("Lunar year {year} has no leap month {month}")]
    NoLeapMonth { year: u16, month: u8 },

    /// The lunar month is shorter than the requested day.
    #[error("Lunar month {year}-{month:02} (leap: {leap}) has no day {day}")]
    DayOutOfLunarMonth {
        year: u16,
        month: u8,
        day: u8,
        leap: bool,
    },

    /// The year is outside the lunar table's coverage.
    #[error("Year {0} is outside the lunar table range")]
    YearOutOfTable(u16),

    /// A resolved component fell outside its field range.
    #[error(transparent)]
    Field(#[from] ParseError),
}

impl FromStr for Specifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // Strictly enforce delimiters: DATE_SEPARATOR for month-day and
        // lunar keys, WEEKDAY_SEPARATOR for nth-weekday keys
        let has_hyphen = trimmed.contains(DATE_SEPARATOR);
        let has_slash = trimmed.contains(WEEKDAY_SEPARATOR);

        if has_hyphen && has_slash {
            return Err(ParseError::InvalidFormat(format!(
                "Mixed delimiters ({} and {})",
                DATE_SEPARATOR, WEEKDAY_SEPARATOR
            )));
        }

        if has_hyphen {
            // M-D (month-day) or M-D-L (lunar)
            let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
            match parts.len() {
                2 => Self::parse_month_day(&parts),
                3 => Self::parse_lunar(&parts),
                _ => Err(ParseError::InvalidFormat(format!(
                    "Too many {} separators: expected 1-2, found {}",
                    DATE_SEPARATOR,
                    parts.len() - 1
                ))),
            }
        } else if has_slash {
            // M/W/O (nth weekday)
            let parts: Vec<&str> = trimmed.split(WEEKDAY_SEPARATOR).map(str::trim).collect();
            match parts.len() {
                3 => Self::parse_month_weekday(&parts),
                _ => Err(ParseError::InvalidFormat(format!(
                    "Expected 2 {} separators, found {}",
                    WEEKDAY_SEPARATOR,
                    parts.len() - 1
                ))),
            }
        } else {
            Err(ParseError::InvalidFormat(trimmed.to_owned()))
        }
    }
}

impl Specifier {
    /// Helper to parse u8 with better error messages
    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    fn parse_month_day(parts: &[&str]) -> Result<Self, ParseError> {
        let month = Month::new(Self::parse_u8(parts[0])?)?;
        let day = Day::new(Self::parse_u8(parts[1])?)?;
        Ok(Self::MonthDay { month, day })
    }

    fn parse_lunar(parts: &[&str]) -> Result<Self, ParseError> {
        let month = Month::new(Self::parse_u8(parts[0])?)?;
        let day = LunarDay::new(Self::parse_u8(parts[1])?)?;
        let leap = match parts[2] {
            "0" => false,
            "1" => true,
            other => return Err(ParseError::InvalidFormat(other.to_owned())),
        };
        Ok(Self::Lunar { month, day, leap })
    }

    fn parse_month_weekday(parts: &[&str]) -> Result<Self, ParseError> {
        let month = Month::new(Self::parse_u8(parts[0])?)?;
        let weekday = Weekday::new(Self::parse_u8(parts[1])?)?;
        let ordinal = Ordinal::new(Self::parse_u8(parts[2])?)?;
        Ok(Self::MonthWeekday {
            month,
            weekday,
            ordinal,
        })
    }

    /// Canonical string key for this specifier. Round-trips through
    /// [`Specifier::from_str`] bit-for-bit.
    pub fn raw_key(&self) -> String {
        self.to_string()
    }

    /// Chinese rendering, e.g. "2月1日", "闰二月十五", "6月第3个星期日".
    /// Presentational only; never used for parsing.
    pub fn to_chinese_string(&self) -> String {
        chinese::to_chinese_string(self)
    }
}

impl serde::Serialize for Specifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Specifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A calendar day anchored to a year, carried as one of three specifier
/// kinds. Immutable value type; conversions produce new instances.
///
/// Construction never checks calendar feasibility (Feb 30 is constructible);
/// any operation that needs an absolute day resolves the specifier against
/// the anchor year and fails with [`ResolveError`] when the day does not
/// exist, rather than substituting a nearby date.
///
/// Two values are equal when they resolve to the same Gregorian day against
/// the built-in lunar table, regardless of specifier kind. Ordering is by
/// resolved day, year first; unresolvable values sort after all resolvable
/// days of their anchor year.
///
/// Serializes as the wire shape `{ "year": u16, "md_date": "<canonical>" }`.
#[derive(Debug, Clone, Copy, Display, Serialize, Deserialize)]
#[display(fmt = "{year}:{spec}")]
#[serde(try_from = "DateDto", into = "DateDto")]
pub struct UniversalDate {
    year: Year,
    spec: Specifier,
}

/// Wire shape for `UniversalDate`: the `md_date` column plus its year.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DateDto {
    year: u16,
    md_date: String,
}

impl From<UniversalDate> for DateDto {
    fn from(date: UniversalDate) -> Self {
        Self {
            year: date.year.get(),
            md_date: date.raw_key(),
        }
    }
}

impl TryFrom<DateDto> for UniversalDate {
    type Error = ParseError;

    fn try_from(dto: DateDto) -> Result<Self, Self::Error> {
        Self::from_columns(dto.year, &dto.md_date)
    }
}

impl UniversalDate {
    /// Creates a date from an anchor year and a specifier.
    /// No feasibility check happens here; see the type-level docs.
    pub const fn new(year: Year, spec: Specifier) -> Self {
        Self { year, spec }
    }

    /// Decodes a canonical string key against an anchor year.
    ///
    /// # Errors
    /// Returns `ParseError` on malformed or out-of-range input. Malformed
    /// input is an expected, recoverable condition.
    pub fn parse(year: Year, raw: &str) -> Result<Self, ParseError> {
        Ok(Self {
            year,
            spec: raw.parse()?,
        })
    }

    /// Returns the anchor year
    pub const fn year(&self) -> Year {
        self.year
    }

    /// Returns the specifier
    pub const fn specifier(&self) -> Specifier {
        self.spec
    }

    /// Canonical string key (the persisted `md_date` value)
    pub fn raw_key(&self) -> String {
        self.spec.to_string()
    }

    /// Converts to database columns: (year, `md_date`)
    pub fn to_columns(&self) -> (u16, String) {
        (self.year.get(), self.raw_key())
    }

    /// Creates from database columns: (year, `md_date`)
    ///
    /// # Errors
    /// Returns `ParseError` when the year or key is invalid.
    pub fn from_columns(year: u16, md_date: &str) -> Result<Self, ParseError> {
        Self::parse(Year::new(year)?, md_date)
    }

    /// Chinese rendering of the specifier; see [`Specifier::to_chinese_string`]
    pub fn to_chinese_string(&self) -> String {
        self.spec.to_chinese_string()
    }

    /// Resolves the specifier to the absolute Gregorian day it denotes
    /// within the anchor year. Lunar dates late in their lunar year may
    /// resolve into the following Gregorian year.
    fn resolve_with(&self, table: &LunarTable) -> Result<(Year, Month, Day), ResolveError> {
        match self.spec {
            Specifier::MonthDay { month, day } => {
                let (y, m, d) = (self.year.get(), month.get(), day.get());
                if d > days_in_month(y, m) {
                    return Err(ResolveError::NoSuchDay {
                        year: y,
                        month: m,
                        day: d,
                    });
                }
                Ok((self.year, month, day))
            }
            Specifier::MonthWeekday {
                month,
                weekday,
                ordinal,
            } => {
                let (y, m) = (self.year.get(), month.get());
                let first = weekday_of(y, m, MIN_DAY);
                let first_match = MIN_DAY + (weekday.get() + DAYS_PER_WEEK - first) % DAYS_PER_WEEK;
                let day = first_match + DAYS_PER_WEEK * (ordinal.get() - 1);
                if day > days_in_month(y, m) {
                    return Err(ResolveError::NoNthWeekday {
                        year: y,
                        month: m,
                        ordinal: ordinal.get(),
                        weekday: weekday.get(),
                    });
                }
                Ok((self.year, month, Day::new(day)?))
            }
            Specifier::Lunar { month, day, leap } => {
                let (y, m, d) =
                    table.lunar_to_solar(self.year.get(), month.get(), day.get(), leap)?;
                Ok((Year::new(y)?, Month::new(m)?, Day::new(d)?))
            }
        }
    }

    /// Resolves to a fixed Gregorian month-day date, using `table` for
    /// lunar conversion.
    ///
    /// # Errors
    /// Returns `ResolveError` when the specifier names no day in the
    /// anchor year.
    pub fn as_month_day_with(&self, table: &LunarTable) -> Result<Self, ResolveError> {
        let (year, month, day) = self.resolve_with(table)?;
        Ok(Self {
            year,
            spec: Specifier::MonthDay { month, day },
        })
    }

    /// [`Self::as_month_day_with`] against the built-in lunar table.
    ///
    /// # Errors
    /// Returns `ResolveError` when the specifier names no day in the
    /// anchor year.
    pub fn as_month_day(&self) -> Result<Self, ResolveError> {
        self.as_month_day_with(LunarTable::global())
    }

    /// Resolves to the ordinal-weekday slot the day falls into within
    /// its month, using `table` for lunar conversion.
    ///
    /// # Errors
    /// Returns `ResolveError` when the specifier names no day in the
    /// anchor year.
    pub fn as_month_weekday_with(&self, table: &LunarTable) -> Result<Self, ResolveError> {
        let (year, month, day) = self.resolve_with(table)?;
        let weekday = Weekday::new(weekday_of(year.get(), month.get(), day.get()))?;
        let ordinal = Ordinal::new((day.get() - MIN_DAY) / DAYS_PER_WEEK + 1)?;
        Ok(Self {
            year,
            spec: Specifier::MonthWeekday {
                month,
                weekday,
                ordinal,
            },
        })
    }

    /// [`Self::as_month_weekday_with`] against the built-in lunar table.
    ///
    /// # Errors
    /// Returns `ResolveError` when the specifier names no day in the
    /// anchor year.
    pub fn as_month_weekday(&self) -> Result<Self, ResolveError> {
        self.as_month_weekday_with(LunarTable::global())
    }

    /// Resolves to the lunar date of the same real-world day, using `table`
    /// for both directions of lunar conversion.
    ///
    /// # Errors
    /// Returns `ResolveError` when the specifier names no day in the
    /// anchor year or the day falls outside the table's coverage.
    pub fn as_lunar_date_with(&self, table: &LunarTable) -> Result<Self, ResolveError> {
        let (year, month, day) = self.resolve_with(table)?;
        let (ly, lm, ld, leap) = table.solar_to_lunar(year.get(), month.get(), day.get())?;
        Ok(Self {
            year: Year::new(ly)?,
            spec: Specifier::Lunar {
                month: Month::new(lm)?,
                day: LunarDay::new(ld)?,
                leap,
            },
        })
    }

    /// [`Self::as_lunar_date_with`] against the built-in lunar table.
    ///
    /// # Errors
    /// Returns `ResolveError` when the specifier names no day in the
    /// anchor year or the day falls outside the table's coverage.
    pub fn as_lunar_date(&self) -> Result<Self, ResolveError> {
        self.as_lunar_date_with(LunarTable::global())
    }

    /// Rank used for ordering unresolvable values of the same anchor year:
    /// MonthDay < MonthWeekday < Lunar.
    #[inline]
    fn kind_rank(&self) -> u8 {
        match self.spec {
            Specifier::MonthDay { .. } => 0,
            Specifier::MonthWeekday { .. } => 1,
            Specifier::Lunar { .. } => 2,
        }
    }

    /// Total-order key. Resolvable values key on their resolved Gregorian
    /// day; unresolvable ones sort after every real day of their anchor
    /// year (month slot 13), tie-broken by kind and raw fields so the
    /// order stays deterministic and `Hash` stays consistent with `Eq`.
    fn order_key(&self) -> (u16, u8, u8, u8, u8, u8) {
        match self.resolve_with(LunarTable::global()) {
            Ok((year, month, day)) => (year.get(), month.get(), day.get(), 0, 0, 0),
            Err(_) => {
                let (a, b, c) = match self.spec {
                    Specifier::MonthDay { month, day } => (month.get(), day.get(), 0),
                    Specifier::MonthWeekday {
                        month,
                        weekday,
                        ordinal,
                    } => (month.get(), weekday.get(), ordinal.get()),
                    Specifier::Lunar { month, day, leap } => {
                        (month.get(), day.get(), u8::from(leap))
                    }
                };
                (self.year.get(), MAX_MONTH + 1, self.kind_rank(), a, b, c)
            }
        }
    }
}

impl PartialEq for UniversalDate {
    fn eq(&self, other: &Self) -> bool {
        self.order_key() == other.order_key()
    }
}

impl Eq for UniversalDate {}

impl Hash for UniversalDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order_key().hash(state);
    }
}

impl PartialOrd for UniversalDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UniversalDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}
