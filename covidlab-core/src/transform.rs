//! Wide cumulative tables → per-day deltas for one country.
//!
//! Pipeline per country:
//! 1. parse each CSV into a [`RawTable`] (one row per region, one column per date)
//! 2. select the rows whose `Country/Region` matches, summing sub-regions
//! 3. inner-join the three cumulative columns on date
//! 4. first difference, dropping the first day

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::DataError;
use crate::series::{DailyRecord, DailySeries, SeriesKind};

const REGION_COLUMN: &str = "Country/Region";
const PROVINCE_COLUMN: &str = "Province/State";
const METADATA_COLUMNS: [&str; 5] = [PROVINCE_COLUMN, REGION_COLUMN, "Lat", "Long", "Long_"];

/// One region row of a wide source table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub province: String,
    pub region: String,
    /// Cumulative counts, aligned with [`RawTable::dates`].
    pub counts: Vec<i64>,
}

/// A parsed wide table: metadata columns dropped, date headers parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub kind: SeriesKind,
    /// Strictly increasing.
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Distinct region names, sorted.
    pub fn regions(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// The three raw tables from one fetch.
#[derive(Debug, Clone)]
pub struct SourceSnapshot {
    pub cases: RawTable,
    pub deaths: RawTable,
    pub recovered: RawTable,
    pub dataset_hash: String,
}

impl SourceSnapshot {
    /// Parse the three CSV bodies and fingerprint them.
    pub fn from_csv(cases: &str, deaths: &str, recovered: &str) -> Result<Self, DataError> {
        let mut hasher = blake3::Hasher::new();
        for text in [cases, deaths, recovered] {
            hasher.update(text.as_bytes());
        }
        Ok(Self {
            cases: parse_table(SeriesKind::Cases, cases)?,
            deaths: parse_table(SeriesKind::Deaths, deaths)?,
            recovered: parse_table(SeriesKind::Recovered, recovered)?,
            dataset_hash: hasher.finalize().to_hex().to_string(),
        })
    }

    pub fn table(&self, kind: SeriesKind) -> &RawTable {
        match kind {
            SeriesKind::Cases => &self.cases,
            SeriesKind::Deaths => &self.deaths,
            SeriesKind::Recovered => &self.recovered,
        }
    }
}

/// Cumulative counts for one country on one date, after the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumulativeRow {
    pub date: NaiveDate,
    pub cases: i64,
    pub deaths: i64,
    pub recovered: i64,
}

/// One country's summed cumulative column from a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityColumn {
    /// Region name as spelled in the source.
    pub region: String,
    pub points: Vec<(NaiveDate, i64)>,
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse a wide JHU-style CSV.
///
/// Every column other than the metadata columns must be a date header
/// (`M/D/YY`, or `YYYY-MM-DD`). Blank cells count as zero.
pub fn parse_table(kind: SeriesKind, text: &str) -> Result<RawTable, DataError> {
    let malformed = |msg: String| DataError::Malformed(format!("{kind} table: {msg}"));

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| malformed(format!("unreadable header: {e}")))?
        .clone();

    let region_idx = headers
        .iter()
        .position(|h| h.trim() == REGION_COLUMN)
        .ok_or_else(|| malformed(format!("missing '{REGION_COLUMN}' column")))?;
    let province_idx = headers.iter().position(|h| h.trim() == PROVINCE_COLUMN);

    let mut date_cols: Vec<(usize, NaiveDate)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let header = header.trim();
        if METADATA_COLUMNS.contains(&header) {
            continue;
        }
        let date = parse_header_date(header)
            .ok_or_else(|| malformed(format!("column '{header}' is not a date")))?;
        date_cols.push((idx, date));
    }

    if let Some(pair) = date_cols.windows(2).find(|w| w[0].1 >= w[1].1) {
        return Err(malformed(format!(
            "date columns out of order at {} → {}",
            pair[0].1, pair[1].1
        )));
    }

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| malformed(format!("row {}: {e}", line + 1)))?;
        let region = record.get(region_idx).unwrap_or_default().trim().to_string();
        let province = province_idx
            .and_then(|i| record.get(i))
            .unwrap_or_default()
            .trim()
            .to_string();

        let mut counts = Vec::with_capacity(date_cols.len());
        for (idx, date) in &date_cols {
            let cell = record.get(*idx).unwrap_or_default();
            let value = parse_count(cell).ok_or_else(|| {
                malformed(format!(
                    "row {} ({region}), {date}: '{cell}' is not a count",
                    line + 1
                ))
            })?;
            counts.push(value);
        }

        rows.push(RawRow {
            province,
            region,
            counts,
        });
    }

    debug!(%kind, rows = rows.len(), dates = date_cols.len(), "parsed source table");

    Ok(RawTable {
        kind,
        dates: date_cols.into_iter().map(|(_, d)| d).collect(),
        rows,
    })
}

fn parse_header_date(header: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(header, "%m/%d/%y")
        .or_else(|_| NaiveDate::parse_from_str(header, "%Y-%m-%d"))
        .ok()
}

fn parse_count(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0);
    }
    if let Ok(v) = cell.parse::<i64>() {
        return Some(v);
    }
    // some mirrors write integral floats ("12.0"); i64::MAX as f64 rounds up to 2^63
    match cell.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
            Some(v as i64)
        }
        _ => None,
    }
}

// ── Entity selection ────────────────────────────────────────────────

/// Python `str.title()`: upper-case the first letter of each run of letters,
/// lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Sum every row whose region matches `entity` after title-casing both sides.
///
/// No fuzzy matching: zero matches is [`DataError::NotFound`].
pub fn select_entity(table: &RawTable, entity: &str) -> Result<EntityColumn, DataError> {
    let key = title_case(entity.trim());
    let mut matched = table
        .rows
        .iter()
        .filter(|row| title_case(&row.region) == key)
        .peekable();

    let region = match matched.peek() {
        Some(row) => row.region.clone(),
        None => {
            return Err(DataError::NotFound {
                entity: entity.trim().to_string(),
            })
        }
    };

    let mut sums = vec![0i64; table.dates.len()];
    let mut row_count = 0usize;
    for row in matched {
        for ((sum, v), date) in sums.iter_mut().zip(&row.counts).zip(&table.dates) {
            *sum = sum.checked_add(*v).ok_or_else(|| {
                DataError::Malformed(format!(
                    "{} table: sum of {region} rows overflows on {date}",
                    table.kind
                ))
            })?;
        }
        row_count += 1;
    }

    if row_count > 1 {
        debug!(kind = %table.kind, %region, row_count, "summed sub-regions");
    }

    Ok(EntityColumn {
        region,
        points: table.dates.iter().copied().zip(sums).collect(),
    })
}

// ── Join + differencing ─────────────────────────────────────────────

/// Inner join of the three cumulative columns on date, ascending.
///
/// Dates missing from any column are dropped. An empty intersection is
/// malformed input.
pub fn join_on_date(
    cases: &EntityColumn,
    deaths: &EntityColumn,
    recovered: &EntityColumn,
) -> Result<Vec<CumulativeRow>, DataError> {
    let deaths_by_date: HashMap<NaiveDate, i64> = deaths.points.iter().copied().collect();
    let recovered_by_date: HashMap<NaiveDate, i64> = recovered.points.iter().copied().collect();

    let rows: Vec<CumulativeRow> = cases
        .points
        .iter()
        .filter_map(|&(date, c)| {
            let d = deaths_by_date.get(&date)?;
            let r = recovered_by_date.get(&date)?;
            Some(CumulativeRow {
                date,
                cases: c,
                deaths: *d,
                recovered: *r,
            })
        })
        .collect();

    let kept = rows.len();
    let dropped = [
        (SeriesKind::Cases, cases.points.len() - kept),
        (SeriesKind::Deaths, deaths.points.len().saturating_sub(kept)),
        (SeriesKind::Recovered, recovered.points.len().saturating_sub(kept)),
    ];
    for (kind, n) in dropped {
        if n > 0 {
            warn!(%kind, dropped = n, region = %cases.region, "dates missing from other series dropped");
        }
    }

    if rows.is_empty() {
        return Err(DataError::Malformed(format!(
            "the three series for {} share no dates",
            cases.region
        )));
    }

    Ok(rows)
}

/// First difference per column; the first row has no predecessor and is dropped.
///
/// A delta that does not fit in an `i64` is [`DataError::Malformed`].
pub fn difference(region: &str, rows: &[CumulativeRow]) -> Result<Vec<DailyRecord>, DataError> {
    rows.windows(2)
        .map(|w| -> Result<DailyRecord, DataError> {
            let (prev, cur) = (&w[0], &w[1]);
            let delta = |kind: SeriesKind, a: i64, b: i64| {
                a.checked_sub(b).ok_or_else(|| {
                    DataError::Malformed(format!(
                        "{kind} of {region} on {}: daily change overflows",
                        cur.date
                    ))
                })
            };
            Ok(DailyRecord {
                date: cur.date,
                cases: delta(SeriesKind::Cases, cur.cases, prev.cases)?,
                deaths: delta(SeriesKind::Deaths, cur.deaths, prev.deaths)?,
                recovered: delta(SeriesKind::Recovered, cur.recovered, prev.recovered)?,
            })
        })
        .collect()
}

/// Derive the daily series for one country.
pub fn to_daily(snapshot: &SourceSnapshot, entity: &str) -> Result<DailySeries, DataError> {
    let cases = select_entity(&snapshot.cases, entity)?;
    let deaths = select_entity(&snapshot.deaths, entity)?;
    let recovered = select_entity(&snapshot.recovered, entity)?;

    let cumulative = join_on_date(&cases, &deaths, &recovered)?;
    let records = difference(&cases.region, &cumulative)?;

    Ok(DailySeries {
        entity: cases.region,
        records,
        dataset_hash: snapshot.dataset_hash.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &str = "\
Province/State,Country/Region,Lat,Long,1/1/20,1/2/20,1/3/20,1/4/20
,Egypt,26.8,30.8,10,15,15,20
Ontario,Canada,51.2,-85.3,1,2,4,8
Quebec,Canada,52.9,-73.5,0,1,1,3
,\"Korea, South\",35.9,127.7,5,5,6,6
";

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
    }

    #[test]
    fn parses_wide_table() {
        let t = parse_table(SeriesKind::Cases, CASES).unwrap();
        assert_eq!(t.dates, vec![d(1), d(2), d(3), d(4)]);
        assert_eq!(t.rows.len(), 4);
        assert_eq!(t.rows[1].province, "Ontario");
        assert_eq!(t.rows[3].region, "Korea, South");
        assert_eq!(t.rows[0].counts, vec![10, 15, 15, 20]);
        assert_eq!(t.regions(), vec!["Canada", "Egypt", "Korea, South"]);
    }

    #[test]
    fn blank_cells_read_as_zero() {
        let csv = "Country/Region,1/1/20,1/2/20\nEgypt,,4\n";
        let t = parse_table(SeriesKind::Deaths, csv).unwrap();
        assert_eq!(t.rows[0].counts, vec![0, 4]);
    }

    #[test]
    fn rejects_non_numeric_cell() {
        let csv = "Country/Region,1/1/20\nEgypt,lots\n";
        let err = parse_table(SeriesKind::Cases, csv).unwrap_err();
        assert!(matches!(err, DataError::Malformed(ref m) if m.contains("lots")));
    }

    #[test]
    fn rejects_unknown_header() {
        let csv = "Country/Region,Population,1/1/20\nEgypt,100,1\n";
        assert!(matches!(
            parse_table(SeriesKind::Cases, csv),
            Err(DataError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_missing_region_column() {
        let csv = "Country,1/1/20\nEgypt,1\n";
        assert!(matches!(
            parse_table(SeriesKind::Cases, csv),
            Err(DataError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let csv = "Country/Region,1/2/20,1/1/20\nEgypt,1,2\n";
        assert!(matches!(
            parse_table(SeriesKind::Cases, csv),
            Err(DataError::Malformed(_))
        ));
    }

    #[test]
    fn title_case_matches_python() {
        assert_eq!(title_case("united kingdom"), "United Kingdom");
        assert_eq!(title_case("US"), "Us");
        assert_eq!(title_case("guinea-bissau"), "Guinea-Bissau");
        assert_eq!(title_case("korea, south"), "Korea, South");
        assert_eq!(title_case("cote d'ivoire"), "Cote D'Ivoire");
    }

    #[test]
    fn select_is_case_insensitive_and_sums_subregions() {
        let t = parse_table(SeriesKind::Cases, CASES).unwrap();
        let col = select_entity(&t, "  canada ").unwrap();
        assert_eq!(col.region, "Canada");
        let counts: Vec<i64> = col.points.iter().map(|p| p.1).collect();
        assert_eq!(counts, vec![1, 3, 5, 11]);
    }

    #[test]
    fn select_unknown_is_not_found() {
        let t = parse_table(SeriesKind::Cases, CASES).unwrap();
        let err = select_entity(&t, "Atlantis").unwrap_err();
        assert!(matches!(err, DataError::NotFound { ref entity } if entity == "Atlantis"));
    }

    #[test]
    fn select_does_not_fuzzy_match() {
        let t = parse_table(SeriesKind::Cases, CASES).unwrap();
        assert!(select_entity(&t, "Egyp").is_err());
        assert!(select_entity(&t, "Korea").is_err());
    }

    #[test]
    fn worked_example_from_cumulative() {
        let rows: Vec<CumulativeRow> = [10, 15, 15, 20]
            .iter()
            .enumerate()
            .map(|(i, &c)| CumulativeRow {
                date: d(i as u32 + 1),
                cases: c,
                deaths: 0,
                recovered: 0,
            })
            .collect();
        let daily = difference("Egypt", &rows).unwrap();
        let got: Vec<(NaiveDate, i64)> = daily.iter().map(|r| (r.date, r.cases)).collect();
        assert_eq!(got, vec![(d(2), 5), (d(3), 0), (d(4), 5)]);
    }

    #[test]
    fn negative_deltas_pass_through() {
        let rows = vec![
            CumulativeRow { date: d(1), cases: 10, deaths: 5, recovered: 2 },
            CumulativeRow { date: d(2), cases: 8, deaths: 5, recovered: 1 },
        ];
        let daily = difference("Egypt", &rows).unwrap();
        assert_eq!(daily[0].cases, -2);
        assert_eq!(daily[0].recovered, -1);
    }

    #[test]
    fn difference_of_single_row_is_empty() {
        let rows = vec![CumulativeRow { date: d(1), cases: 1, deaths: 1, recovered: 1 }];
        assert!(difference("Egypt", &rows).unwrap().is_empty());
    }

    #[test]
    fn rejects_float_cells_outside_i64() {
        let csv = "Country/Region,1/1/20,1/2/20\nEgypt,12.0,1e30\n";
        let err = parse_table(SeriesKind::Cases, csv).unwrap_err();
        assert!(matches!(err, DataError::Malformed(ref m) if m.contains("1e30")));

        let t = parse_table(SeriesKind::Cases, "Country/Region,1/1/20\nEgypt,12.0\n").unwrap();
        assert_eq!(t.rows[0].counts, vec![12]);
    }

    #[test]
    fn overflowing_subregion_sum_is_malformed() {
        let csv = "\
Province/State,Country/Region,1/1/20,1/2/20
Ontario,Canada,1,5000000000000000000
Quebec,Canada,1,5000000000000000000
";
        let t = parse_table(SeriesKind::Cases, csv).unwrap();
        let err = select_entity(&t, "Canada").unwrap_err();
        assert!(matches!(
            err,
            DataError::Malformed(ref m) if m.contains("Canada") && m.contains("2020-01-02")
        ));
    }

    #[test]
    fn overflowing_daily_change_is_malformed() {
        let rows = vec![
            CumulativeRow { date: d(1), cases: -9_000_000_000_000_000_000, deaths: 0, recovered: 0 },
            CumulativeRow { date: d(2), cases: 9_000_000_000_000_000_000, deaths: 0, recovered: 0 },
        ];
        let err = difference("Egypt", &rows).unwrap_err();
        assert!(matches!(
            err,
            DataError::Malformed(ref m) if m.contains("Egypt") && m.contains("2020-01-02")
        ));
    }

    #[test]
    fn join_drops_dates_missing_from_any_series() {
        let col = |points: Vec<(NaiveDate, i64)>| EntityColumn {
            region: "Egypt".into(),
            points,
        };
        let cases = col(vec![(d(1), 1), (d(2), 2), (d(3), 3)]);
        let deaths = col(vec![(d(1), 0), (d(2), 1), (d(3), 1)]);
        let recovered = col(vec![(d(1), 0), (d(2), 0)]);
        let rows = join_on_date(&cases, &deaths, &recovered).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], CumulativeRow { date: d(2), cases: 2, deaths: 1, recovered: 0 });
    }

    #[test]
    fn join_without_common_dates_is_malformed() {
        let col = |points: Vec<(NaiveDate, i64)>| EntityColumn {
            region: "Egypt".into(),
            points,
        };
        let err = join_on_date(
            &col(vec![(d(1), 1)]),
            &col(vec![(d(2), 1)]),
            &col(vec![(d(1), 1)]),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
    }

    #[test]
    fn to_daily_uses_source_spelling() {
        let deaths = CASES.replace("10,15,15,20", "0,1,1,2");
        let snapshot = SourceSnapshot::from_csv(CASES, &deaths, CASES).unwrap();
        let series = to_daily(&snapshot, "KOREA, SOUTH").unwrap();
        assert_eq!(series.entity, "Korea, South");
        assert_eq!(series.len(), 3);
        assert_eq!(series.dataset_hash.len(), 64);
    }
}
