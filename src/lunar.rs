//! Chinese lunar calendar table and solar/lunar conversion.
//!
//! Each year is one packed `u32` in the widely used encoding: the low nibble
//! is the leap-month number (0 = no leap month), bit `0x10000` is set when
//! the leap month is long (30 days), and bit `0x8000 >> (m - 1)` is set when
//! regular month `m` is long. The built-in table covers 1900..=2100, with the
//! lunar new year of 1900 falling on 1900-01-31.
//!
//! The table is immutable once constructed. Callers normally use
//! [`LunarTable::global`]; tests can build a smaller fixture with
//! [`LunarTable::new`].

use std::borrow::Cow;

use crate::ResolveError;
use crate::types::{civil_from_days, days_from_civil, days_in_month};

/// Low nibble: leap-month number, 0 when the year has none
const LEAP_MONTH_MASK: u32 = 0xf;
/// Set when the leap month is long (30 days)
const LEAP_LONG_MASK: u32 = 0x1_0000;
/// Bit for regular month 1; month m uses `MONTH_LONG_BASE >> (m - 1)`
const MONTH_LONG_BASE: u32 = 0x8000;

/// Minimum days in a lunar year: twelve 29-day months
const BASE_YEAR_DAYS: u16 = 348;
const SHORT_MONTH_DAYS: u8 = 29;
const LONG_MONTH_DAYS: u8 = 30;

/// First year covered by the built-in table
const FIRST_YEAR: u16 = 1900;
/// Gregorian date of the lunar new year of `FIRST_YEAR`
const FIRST_NEW_YEAR: (u8, u8) = (1, 31);

/// Read-only lunar-calendar lookup table.
///
/// Holds one packed entry per lunar year, starting at `first_year`, plus the
/// day number of that year's lunar new year. All conversions fail with
/// [`ResolveError::YearOutOfTable`] outside the covered range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LunarTable {
    first_year: u16,
    epoch_days: i64,
    entries: Cow<'static, [u32]>,
}

static GLOBAL: LunarTable = LunarTable {
    first_year: FIRST_YEAR,
    epoch_days: days_from_civil(FIRST_YEAR as i64, FIRST_NEW_YEAR.0, FIRST_NEW_YEAR.1),
    entries: Cow::Borrowed(&LUNAR_INFO),
};

impl LunarTable {
    /// Builds a table from packed entries. `new_year` is the Gregorian
    /// (month, day) of the lunar new year of `first_year`.
    pub fn new(
        first_year: u16,
        new_year: (u8, u8),
        entries: impl Into<Cow<'static, [u32]>>,
    ) -> Self {
        Self {
            first_year,
            epoch_days: days_from_civil(first_year as i64, new_year.0, new_year.1),
            entries: entries.into(),
        }
    }

    /// The built-in table covering lunar years 1900..=2100.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// First lunar year covered by this table
    pub const fn first_year(&self) -> u16 {
        self.first_year
    }

    /// Last lunar year covered by this table (inclusive)
    pub fn last_year(&self) -> u16 {
        self.first_year + self.entries.len() as u16 - 1
    }

    fn entry(&self, year: u16) -> Result<u32, ResolveError> {
        if year < self.first_year {
            return Err(ResolveError::YearOutOfTable(year));
        }
        self.entries
            .get((year - self.first_year) as usize)
            .copied()
            .ok_or(ResolveError::YearOutOfTable(year))
    }

    /// Leap-month number of a lunar year, 0 when the year has none.
    ///
    /// # Errors
    /// Returns `ResolveError::YearOutOfTable` outside the covered range.
    pub fn leap_month(&self, year: u16) -> Result<u8, ResolveError> {
        Ok((self.entry(year)? & LEAP_MONTH_MASK) as u8)
    }

    /// Days in the leap month of a lunar year, 0 when the year has none.
    ///
    /// # Errors
    /// Returns `ResolveError::YearOutOfTable` outside the covered range.
    pub fn days_in_leap_month(&self, year: u16) -> Result<u8, ResolveError> {
        let info = self.entry(year)?;
        if info & LEAP_MONTH_MASK == 0 {
            Ok(0)
        } else if info & LEAP_LONG_MASK != 0 {
            Ok(LONG_MONTH_DAYS)
        } else {
            Ok(SHORT_MONTH_DAYS)
        }
    }

    /// Days in regular lunar month `month` (1..=12) of a lunar year.
    ///
    /// # Errors
    /// Returns `ResolveError::YearOutOfTable` outside the covered range.
    pub fn days_in_lunar_month(&self, year: u16, month: u8) -> Result<u8, ResolveError> {
        debug_assert!(month != 0 && month <= 12);
        let info = self.entry(year)?;
        if info & (MONTH_LONG_BASE >> (month - 1)) != 0 {
            Ok(LONG_MONTH_DAYS)
        } else {
            Ok(SHORT_MONTH_DAYS)
        }
    }

    /// Total days in a lunar year, including its leap month if any.
    ///
    /// # Errors
    /// Returns `ResolveError::YearOutOfTable` outside the covered range.
    pub fn days_in_lunar_year(&self, year: u16) -> Result<u16, ResolveError> {
        let info = self.entry(year)?;
        let mut days = BASE_YEAR_DAYS;
        let mut bit = MONTH_LONG_BASE;
        for _ in 0..12 {
            if info & bit != 0 {
                days += 1;
            }
            bit >>= 1;
        }
        Ok(days + u16::from(self.days_in_leap_month(year)?))
    }

    /// Converts a lunar date to its Gregorian (year, month, day).
    ///
    /// `leap` selects the leap counterpart of `month`; the conversion fails
    /// when that lunar year has no such leap month, or when `day` exceeds the
    /// month's actual length.
    ///
    /// # Errors
    /// `NoLeapMonth`, `DayOutOfLunarMonth`, or `YearOutOfTable`.
    pub fn lunar_to_solar(
        &self,
        year: u16,
        month: u8,
        day: u8,
        leap: bool,
    ) -> Result<(u16, u8, u8), ResolveError> {
        let leap_month = self.leap_month(year)?;
        if leap && leap_month != month {
            return Err(ResolveError::NoLeapMonth { year, month });
        }
        let month_len = if leap {
            self.days_in_leap_month(year)?
        } else {
            self.days_in_lunar_month(year, month)?
        };
        if day == 0 || day > month_len {
            return Err(ResolveError::DayOutOfLunarMonth {
                year,
                month,
                day,
                leap,
            });
        }

        let mut offset: i64 = 0;
        for y in self.first_year..year {
            offset += i64::from(self.days_in_lunar_year(y)?);
        }
        for m in 1..month {
            offset += i64::from(self.days_in_lunar_month(year, m)?);
        }
        if leap {
            // the leap month follows its regular counterpart
            offset += i64::from(self.days_in_lunar_month(year, month)?);
        } else if leap_month != 0 && leap_month < month {
            offset += i64::from(self.days_in_leap_month(year)?);
        }
        offset += i64::from(day) - 1;

        let (sy, sm, sd) = civil_from_days(self.epoch_days + offset);
        Ok((sy as u16, sm, sd))
    }

    /// Converts a Gregorian date to its lunar (year, month, day, leap).
    ///
    /// # Errors
    /// `NoSuchDay` when the Gregorian date does not exist, `YearOutOfTable`
    /// when it falls outside the covered lunar years.
    pub fn solar_to_lunar(
        &self,
        year: u16,
        month: u8,
        day: u8,
    ) -> Result<(u16, u8, u8, bool), ResolveError> {
        if day == 0 || month == 0 || month > 12 || day > days_in_month(year, month) {
            return Err(ResolveError::NoSuchDay { year, month, day });
        }

        let mut offset = days_from_civil(i64::from(year), month, day) - self.epoch_days;
        if offset < 0 {
            return Err(ResolveError::YearOutOfTable(year));
        }

        let mut lunar_year = self.first_year;
        loop {
            let year_days = i64::from(self.days_in_lunar_year(lunar_year)?);
            if offset < year_days {
                break;
            }
            offset -= year_days;
            lunar_year += 1;
        }

        let leap_month = self.leap_month(lunar_year)?;
        let mut lunar_month = 1u8;
        let mut leap = false;
        loop {
            let month_days = i64::from(if leap {
                self.days_in_leap_month(lunar_year)?
            } else {
                self.days_in_lunar_month(lunar_year, lunar_month)?
            });
            if offset < month_days {
                break;
            }
            offset -= month_days;
            if leap {
                leap = false;
                lunar_month += 1;
            } else if lunar_month == leap_month {
                leap = true;
            } else {
                lunar_month += 1;
            }
        }

        Ok((lunar_year, lunar_month, (offset + 1) as u8, leap))
    }
}

/// Packed lunar-year data for 1900..=2100.
#[rustfmt::skip]
static LUNAR_INFO: [u32; 201] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900-1909
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910-1919
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920-1929
    0x06566, 0x0d4a0, 0x0ea50, 0x06e95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930-1939
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940-1949
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950-1959
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960-1969
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b5a0, 0x195a6, // 1970-1979
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980-1989
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x055c0, 0x0ab60, 0x096d5, 0x092e0, // 1990-1999
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000-2009
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010-2019
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020-2029
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030-2039
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040-2049
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0, // 2050-2059
    0x0a2e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060-2069
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070-2079
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080-2089
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090-2099
    0x0d520, // 2100
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_table_range() {
        let table = LunarTable::global();
        assert_eq!(table.first_year(), 1900);
        assert_eq!(table.last_year(), 2100);
    }

    #[test]
    fn test_leap_months() {
        let table = LunarTable::global();
        // 1900 had leap month 8
        assert_eq!(table.leap_month(1900).unwrap(), 8);
        // 2017 had leap month 6
        assert_eq!(table.leap_month(2017).unwrap(), 6);
        // 2020 had leap month 4
        assert_eq!(table.leap_month(2020).unwrap(), 4);
        // 2023 had leap month 2
        assert_eq!(table.leap_month(2023).unwrap(), 2);
        // 2024 had none
        assert_eq!(table.leap_month(2024).unwrap(), 0);
        assert_eq!(table.days_in_leap_month(2024).unwrap(), 0);
    }

    #[test]
    fn test_year_out_of_table() {
        let table = LunarTable::global();
        assert!(matches!(
            table.leap_month(1899),
            Err(ResolveError::YearOutOfTable(1899))
        ));
        assert!(matches!(
            table.leap_month(2101),
            Err(ResolveError::YearOutOfTable(2101))
        ));
    }

    #[test]
    fn test_month_lengths_1900() {
        let table = LunarTable::global();
        // lunar 1900 month 1 ran 1900-01-31 .. 1900-02-28 (29 days)
        assert_eq!(table.days_in_lunar_month(1900, 1).unwrap(), 29);
        // 1900's leap month 8 was short
        assert_eq!(table.days_in_leap_month(1900).unwrap(), 29);
        // 355 regular days + 29 leap days
        assert_eq!(table.days_in_lunar_year(1900).unwrap(), 384);
    }

    #[test]
    fn test_new_year_boundary_2023() {
        let table = LunarTable::global();
        // 2023-01-22 was the lunar new year of 2023
        assert_eq!(
            table.solar_to_lunar(2023, 1, 22).unwrap(),
            (2023, 1, 1, false)
        );
        // the day before was the 30th of the 12th month of lunar 2022
        assert_eq!(
            table.solar_to_lunar(2023, 1, 21).unwrap(),
            (2022, 12, 30, false)
        );
        assert_eq!(table.lunar_to_solar(2023, 1, 1, false).unwrap(), (2023, 1, 22));
        assert_eq!(table.lunar_to_solar(2022, 12, 30, false).unwrap(), (2023, 1, 21));
    }

    #[test]
    fn test_spec_anchor_2023_02_01() {
        let table = LunarTable::global();
        assert_eq!(
            table.solar_to_lunar(2023, 2, 1).unwrap(),
            (2023, 1, 11, false)
        );
        assert_eq!(table.lunar_to_solar(2023, 1, 11, false).unwrap(), (2023, 2, 1));
    }

    #[test]
    fn test_leap_month_2023() {
        let table = LunarTable::global();
        // regular month 2 of 2023 began 2023-02-20 and was long
        assert_eq!(table.days_in_lunar_month(2023, 2).unwrap(), 30);
        assert_eq!(table.lunar_to_solar(2023, 2, 1, false).unwrap(), (2023, 2, 20));
        // leap month 2 followed on 2023-03-22
        assert_eq!(table.lunar_to_solar(2023, 2, 1, true).unwrap(), (2023, 3, 22));
        assert_eq!(
            table.solar_to_lunar(2023, 3, 22).unwrap(),
            (2023, 2, 1, true)
        );
    }

    #[test]
    fn test_no_leap_month_rejected() {
        let table = LunarTable::global();
        assert!(matches!(
            table.lunar_to_solar(2024, 2, 1, true),
            Err(ResolveError::NoLeapMonth { year: 2024, month: 2 })
        ));
    }

    #[test]
    fn test_day_out_of_lunar_month() {
        let table = LunarTable::global();
        // lunar 2023 month 1 is short (29 days)
        assert_eq!(table.days_in_lunar_month(2023, 1).unwrap(), 29);
        assert!(matches!(
            table.lunar_to_solar(2023, 1, 30, false),
            Err(ResolveError::DayOutOfLunarMonth { day: 30, .. })
        ));
    }

    #[test]
    fn test_solar_lunar_round_trip() {
        let table = LunarTable::global();
        let cases = [
            (1900, 1, 31),
            (1984, 2, 2),
            (2000, 2, 5),
            (2023, 2, 1),
            (2023, 4, 1),
            (2033, 12, 31),
            (2100, 2, 9),
        ];
        for (y, m, d) in cases {
            let (ly, lm, ld, leap) = table.solar_to_lunar(y, m, d).unwrap();
            assert_eq!(
                table.lunar_to_solar(ly, lm, ld, leap).unwrap(),
                (y, m, d),
                "round trip for {y}-{m}-{d}"
            );
        }
    }

    #[test]
    fn test_solar_before_epoch_rejected() {
        let table = LunarTable::global();
        assert!(matches!(
            table.solar_to_lunar(1900, 1, 30),
            Err(ResolveError::YearOutOfTable(1900))
        ));
    }

    #[test]
    fn test_infeasible_solar_day_rejected() {
        let table = LunarTable::global();
        assert!(matches!(
            table.solar_to_lunar(2023, 2, 30),
            Err(ResolveError::NoSuchDay { .. })
        ));
    }

    #[test]
    fn test_fixture_table() {
        // two-year fixture: lunar 2023 and 2024 only
        let table = LunarTable::new(2023, (1, 22), vec![0x05b52, 0x04b60]);
        assert_eq!(
            table.solar_to_lunar(2023, 2, 1).unwrap(),
            (2023, 1, 11, false)
        );
        assert_eq!(table.leap_month(2023).unwrap(), 2);
        assert_eq!(table.leap_month(2024).unwrap(), 0);
        assert!(matches!(
            table.leap_month(2022),
            Err(ResolveError::YearOutOfTable(2022))
        ));
        // past the fixture's coverage
        assert!(matches!(
            table.solar_to_lunar(2026, 6, 1),
            Err(ResolveError::YearOutOfTable(_))
        ));
    }
}
