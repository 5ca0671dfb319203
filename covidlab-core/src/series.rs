//! Domain types: the three source series, daily records, and plottable metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three cumulative source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Cases,
    Deaths,
    Recovered,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Cases, SeriesKind::Deaths, SeriesKind::Recovered];

    /// File stem used by the JHU CSSE repository.
    pub fn file_stem(self) -> &'static str {
        match self {
            SeriesKind::Cases => "time_series_covid19_confirmed_global",
            SeriesKind::Deaths => "time_series_covid19_deaths_global",
            SeriesKind::Recovered => "time_series_covid19_recovered_global",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Cases => "cases",
            SeriesKind::Deaths => "deaths",
            SeriesKind::Recovered => "recovered",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day-over-day increase for one country.
///
/// Values are signed: a downstream correction of the cumulative source
/// shows up as a negative delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub cases: i64,
    pub deaths: i64,
    pub recovered: i64,
}

/// The selectable column of a [`DailyRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cases,
    Deaths,
    Recovered,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Cases, Metric::Deaths, Metric::Recovered];

    pub fn value(self, record: &DailyRecord) -> i64 {
        match self {
            Metric::Cases => record.cases,
            Metric::Deaths => record.deaths,
            Metric::Recovered => record.recovered,
        }
    }

    /// Capitalized display name ("Cases", "Deaths", "Recovered").
    pub fn label(self) -> &'static str {
        match self {
            Metric::Cases => "Cases",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
        }
    }

    pub fn next(self) -> Metric {
        match self {
            Metric::Cases => Metric::Deaths,
            Metric::Deaths => Metric::Recovered,
            Metric::Recovered => Metric::Cases,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cases" => Ok(Metric::Cases),
            "deaths" => Ok(Metric::Deaths),
            // the upstream dashboard spelled it this way
            "recovered" | "recoverd" => Ok(Metric::Recovered),
            other => Err(format!(
                "unknown metric '{other}'. Valid: cases, deaths, recovered"
            )),
        }
    }
}

/// Daily records for one country, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    /// Country name as spelled in the source data.
    pub entity: String,
    pub records: Vec<DailyRecord>,
    /// BLAKE3 over the raw source bytes the series was derived from.
    pub dataset_hash: String,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Records most-recent-first, as the table view shows them.
    pub fn newest_first(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.iter().rev()
    }
}
