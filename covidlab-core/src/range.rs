//! Inclusive date windows over a daily series.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::error::DataError;
use crate::series::DailyRecord;

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, DataError> {
    let trimmed = input.trim();
    if trimmed.len() != 10 {
        return Err(DataError::invalid_date(input, "expected YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| DataError::invalid_date(input, e.to_string()))
}

/// An inclusive range `[from, to]` with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DataError> {
        if from > to {
            return Err(DataError::invalid_date(
                &format!("{from}..{to}"),
                format!("start date {from} is after end date {to}"),
            ));
        }
        Ok(Self { from, to })
    }

    /// Parse both bounds; either failing or `from > to` is [`DataError::InvalidDate`].
    pub fn parse(from: &str, to: &str) -> Result<Self, DataError> {
        Self::new(parse_date(from)?, parse_date(to)?)
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// The contiguous run of `records` inside the window.
    ///
    /// `records` must be ascending by date. Returns an empty slice when
    /// nothing falls inside.
    pub fn select<'a>(&self, records: &'a [DailyRecord]) -> &'a [DailyRecord] {
        let start = records.partition_point(|r| r.date < self.from);
        let end = records.partition_point(|r| r.date <= self.to);
        &records[start..end.max(start)]
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}
