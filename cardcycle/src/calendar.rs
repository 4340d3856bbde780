//! Календарная арифметика: длина месяца и "прижатие" номинального дня
//! месяца к реальной длине конкретного месяца.
//!
//! Месяцы нумеруются с единицы (январь = 1).

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Високосный ли год (григорианский календарь).
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Количество дней в месяце.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Разрешает номинальный день месяца (1-31) в конкретную дату.
///
/// Если день больше длины месяца, берется последний день месяца:
/// 31 февраля 2024 превращается в 29 февраля, а не в 2 марта.
/// День 0 трактуется как 1, месяц вне 1-12 прижимается к границам.
pub fn clamp_day(year: i32, month: u32, day: u32) -> NaiveDate {
    let month = month.clamp(1, 12);
    let day = day.clamp(1, days_in_month(year, month));

    // За пределами диапазона chrono насыщаемся на границе.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Календарный месяц конкретного года.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// Год (например, 2024).
    pub year: i32,
    /// Месяц (1-12).
    pub month: u32,
}

impl YearMonth {
    /// Создает месяц, проверяя диапазон 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Parse(format!("Месяц вне диапазона 1-12: {}", month)));
        }
        Ok(Self { year, month })
    }

    /// Месяц, в который попадает дата.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Сдвигает месяц на `delta` (может быть отрицательным).
    pub fn add_months(self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn next(self) -> Self {
        self.add_months(1)
    }

    pub fn prev(self) -> Self {
        self.add_months(-1)
    }

    /// Номинальный день, прижатый к длине этого месяца.
    pub fn day(self, day: u32) -> NaiveDate {
        clamp_day(self.year, self.month, day)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Разбирает ключ вида `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| Error::Parse(format!("Ожидается YYYY-MM: {}", s)))?;

        let digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(year, 4) || !digits(month, 2) {
            return Err(Error::Parse(format!("Ожидается YYYY-MM: {}", s)));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| Error::Parse(format!("Некорректный год: {}", year)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| Error::Parse(format!("Некорректный месяц: {}", month)))?;

        Self::new(year, month)
    }
}
