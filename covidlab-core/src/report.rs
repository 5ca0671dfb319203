//! Summary report: pure functions over daily records.
//!
//! Every metric is a pure function: records in, scalar out. The report is
//! built once over the full series and once over the selected window.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::error::DataError;
use crate::series::{DailyRecord, Metric};

/// A single report value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    Count(i64),
    Date(NaiveDate),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Count(n) => write!(f, "{n}"),
            ReportValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub label: String,
    pub value: ReportValue,
}

/// The fixed, ordered 15-metric report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

// ─── Individual metric functions ────────────────────────────────────

/// Sum of a metric over the records.
pub fn total(records: &[DailyRecord], metric: Metric) -> i64 {
    records.iter().map(|r| metric.value(r)).sum()
}

/// Largest single-day value and the earliest date it occurs on.
pub fn peak(records: &[DailyRecord], metric: Metric) -> Option<(i64, NaiveDate)> {
    records.iter().fold(None, |best, r| {
        let v = metric.value(r);
        match best {
            Some((max, _)) if v <= max => best,
            _ => Some((v, r.date)),
        }
    })
}

impl Report {
    /// Build the report over the full series and the window subsequence.
    ///
    /// Either slice being empty is [`DataError::EmptyData`]: no peak is defined.
    pub fn build(full: &[DailyRecord], window: &[DailyRecord]) -> Result<Self, DataError> {
        if full.is_empty() {
            return Err(DataError::EmptyData {
                context: "the series has no daily records".into(),
            });
        }
        if window.is_empty() {
            return Err(DataError::EmptyData {
                context: "the selected range matches no days".into(),
            });
        }

        let mut entries = Vec::with_capacity(15);
        let mut push = |label: String, value: ReportValue| {
            entries.push(ReportEntry { label, value });
        };

        for m in Metric::ALL {
            push(format!("Total {m}"), ReportValue::Count(total(full, m)));
        }

        for m in Metric::ALL {
            // non-empty input always has a peak
            let (max, day) = peak(full, m).ok_or_else(|| DataError::EmptyData {
                context: format!("no peak for {m}"),
            })?;
            push(format!("Max {m} in a Day"), ReportValue::Count(max));
            push(format!("Day of Max {m}"), ReportValue::Date(day));
        }

        for m in Metric::ALL {
            push(
                format!("Sum of {m} in Selected Range"),
                ReportValue::Count(total(window, m)),
            );
        }

        for m in Metric::ALL {
            let (max, _) = peak(window, m).ok_or_else(|| DataError::EmptyData {
                context: format!("no peak for {m} in range"),
            })?;
            push(format!("Max {m} in Selected Range"), ReportValue::Count(max));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a value by its label.
    pub fn get(&self, label: &str) -> Option<ReportValue> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value)
    }
}
