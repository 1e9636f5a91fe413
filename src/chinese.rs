//! Chinese renderings of specifiers, for display only.
//!
//! These strings are presentational and never parsed back; the canonical
//! key format lives in `lib.rs`.

use crate::Specifier;

/// Lunar month names, 1-indexed via `month - 1`
const LUNAR_MONTH_NAMES: [&str; 12] = [
    "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "冬", "腊",
];

/// Weekday names, 0 = Sunday
const WEEKDAY_NAMES: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];

const DIGIT_NAMES: [&str; 10] = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

/// Marker prefixed to leap lunar months
const LEAP_MARKER: &str = "闰";

/// Name of a lunar day 1..=30 (初一 .. 三十).
fn lunar_day_name(day: u8) -> String {
    debug_assert!(day != 0 && day <= 30);
    match day {
        1..=10 => format!("初{}", DIGIT_NAMES[(day - 1) as usize]),
        11..=19 => format!("十{}", DIGIT_NAMES[(day - 11) as usize]),
        20 => "二十".to_owned(),
        21..=29 => format!("廿{}", DIGIT_NAMES[(day - 21) as usize]),
        _ => "三十".to_owned(),
    }
}

pub(crate) fn to_chinese_string(spec: &Specifier) -> String {
    match *spec {
        Specifier::MonthDay { month, day } => format!("{month}月{day}日"),
        Specifier::MonthWeekday {
            month,
            weekday,
            ordinal,
        } => format!(
            "{month}月第{ordinal}个星期{}",
            WEEKDAY_NAMES[weekday.get() as usize]
        ),
        Specifier::Lunar { month, day, leap } => {
            let marker = if leap { LEAP_MARKER } else { "" };
            format!(
                "{marker}{}月{}",
                LUNAR_MONTH_NAMES[(month.get() - 1) as usize],
                lunar_day_name(day.get())
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Day, LunarDay, Month, Ordinal, Weekday};

    fn month_day(month: u8, day: u8) -> Specifier {
        Specifier::MonthDay {
            month: Month::new(month).unwrap(),
            day: Day::new(day).unwrap(),
        }
    }

    fn lunar(month: u8, day: u8, leap: bool) -> Specifier {
        Specifier::Lunar {
            month: Month::new(month).unwrap(),
            day: LunarDay::new(day).unwrap(),
            leap,
        }
    }

    #[test]
    fn test_month_day_rendering() {
        assert_eq!(to_chinese_string(&month_day(2, 1)), "2月1日");
        assert_eq!(to_chinese_string(&month_day(12, 31)), "12月31日");
    }

    #[test]
    fn test_month_weekday_rendering() {
        let spec = Specifier::MonthWeekday {
            month: Month::new(6).unwrap(),
            weekday: Weekday::new(0).unwrap(),
            ordinal: Ordinal::new(3).unwrap(),
        };
        assert_eq!(to_chinese_string(&spec), "6月第3个星期日");

        let spec = Specifier::MonthWeekday {
            month: Month::new(11).unwrap(),
            weekday: Weekday::new(6).unwrap(),
            ordinal: Ordinal::new(1).unwrap(),
        };
        assert_eq!(to_chinese_string(&spec), "11月第1个星期六");
    }

    #[test]
    fn test_lunar_rendering() {
        assert_eq!(to_chinese_string(&lunar(1, 1, false)), "正月初一");
        assert_eq!(to_chinese_string(&lunar(1, 11, false)), "正月十一");
        assert_eq!(to_chinese_string(&lunar(11, 21, false)), "冬月廿一");
        assert_eq!(to_chinese_string(&lunar(12, 30, false)), "腊月三十");
        assert_eq!(to_chinese_string(&lunar(12, 20, false)), "腊月二十");
    }

    #[test]
    fn test_lunar_leap_marker() {
        assert_eq!(to_chinese_string(&lunar(2, 15, true)), "闰二月十五");
        assert_eq!(to_chinese_string(&lunar(2, 15, false)), "二月十五");
    }
}
