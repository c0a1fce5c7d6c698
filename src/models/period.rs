use chrono::{Datelike, Months, NaiveDate};
use std::str::FromStr;

use crate::error::{StoreError, StoreResult};

/// A calendar month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> StoreResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(StoreError::invalid(format!("invalid month {year}-{month}")));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Self {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map(Self::from_date)
            .unwrap_or(*self)
    }

    pub fn prev(&self) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(1))
            .map(Self::from_date)
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for YearMonth {
    type Err = StoreError;

    /// Accepts `YYYY-MM` (and `YYYY-M`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || StoreError::invalid(format!("invalid period '{s}', expected YYYY-MM"));
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        if y.len() != 4 || m.is_empty() || m.len() > 2 {
            return Err(bad());
        }
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        Self::new(year, month).map_err(|_| bad())
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> StoreResult<Self> {
        if start > end {
            return Err(StoreError::invalid(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// From the first of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: YearMonth::from_date(today).first_day(),
            end: today,
        }
    }

    pub fn month(period: YearMonth) -> Self {
        Self {
            start: period.first_day(),
            end: period.last_day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| StoreError::invalid(format!("invalid date '{s}', expected YYYY-MM-DD")))
}
