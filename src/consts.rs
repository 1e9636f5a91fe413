/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Sentinel year for year-independent recurring dates
pub const RECURRING_YEAR: u16 = 1;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Maximum day a Gregorian month-day specifier may carry
pub const MAX_DAY: u8 = 31;

/// Maximum day of a lunar month (long months have 30 days, short ones 29)
pub const MAX_LUNAR_DAY: u8 = 30;

/// Maximum weekday index (0 = Sunday .. 6 = Saturday)
pub const MAX_WEEKDAY: u8 = 6;

/// Maximum ordinal occurrence of a weekday within one month
pub const MAX_ORDINAL: u8 = 5;

/// Days per week, used for nth-weekday arithmetic
pub const DAYS_PER_WEEK: u8 = 7;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Field separator for month-day and lunar canonical keys
pub const DATE_SEPARATOR: char = '-';
/// Field separator for nth-weekday canonical keys
pub const WEEKDAY_SEPARATOR: char = '/';
