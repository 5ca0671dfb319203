//! Export: CSV tables, TXT/JSON reports, and named download payloads.
//!
//! Three downloads exist per country, mirroring the dashboard's sections:
//! - **Table**: the full daily series as CSV
//! - **Report**: the 15-metric report as aligned text
//! - **Range**: the window-scoped daily series as CSV

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::DataError;
use crate::range::DateWindow;
use crate::report::Report;
use crate::series::DailyRecord;

/// A ready-to-save file: name, media type, and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

// ─── Serializers ────────────────────────────────────────────────────

/// Daily records as CSV: `date,cases,deaths,recovered`, in the given order.
pub fn records_csv(records: &[DailyRecord]) -> Result<Vec<u8>, DataError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let csv_err = |e: csv::Error| DataError::Export(format!("CSV write: {e}"));

    wtr.write_record(["date", "cases", "deaths", "recovered"])
        .map_err(csv_err)?;
    for r in records {
        wtr.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.cases.to_string(),
            r.deaths.to_string(),
            r.recovered.to_string(),
        ])
        .map_err(csv_err)?;
    }

    wtr.into_inner()
        .map_err(|e| DataError::Export(format!("failed to flush CSV writer: {e}")))
}

/// Report as numbered `label  value` lines under a `Data  Number` header.
pub fn report_txt(report: &Report) -> Vec<u8> {
    let width = report
        .entries
        .iter()
        .map(|e| e.label.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::with_capacity(64 * (report.len() + 1));
    out.push_str(&format!("{:>3}  {:<width$}  {}\n", "", "Data", "Number"));
    for (i, entry) in report.entries.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<width$}  {}\n",
            i + 1,
            entry.label,
            entry.value
        ));
    }
    out.into_bytes()
}

/// Report as pretty JSON (label → value objects, in order).
pub fn report_json(report: &Report) -> Result<String, DataError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| DataError::Export(format!("failed to serialize report: {e}")))
}

// ─── Named downloads ────────────────────────────────────────────────

pub fn table_download(entity: &str, records: &[DailyRecord]) -> Result<Download, DataError> {
    Ok(Download {
        file_name: format!("Covid-19 Table of {entity}.csv"),
        mime: "text/csv",
        bytes: records_csv(records)?,
    })
}

pub fn report_download(entity: &str, report: &Report) -> Download {
    Download {
        file_name: format!("Covid-19 Report of {entity}.txt"),
        mime: "text/plain",
        bytes: report_txt(report),
    }
}

pub fn range_download(
    entity: &str,
    window: &DateWindow,
    records: &[DailyRecord],
) -> Result<Download, DataError> {
    Ok(Download {
        file_name: format!(
            "Covid-19 Data of range {} to {} of {entity}.csv",
            window.from(),
            window.to()
        ),
        mime: "text/csv",
        bytes: records_csv(records)?,
    })
}

/// Write a download into `dir`, creating the directory if needed.
pub fn save(download: &Download, dir: &Path) -> Result<PathBuf, DataError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| DataError::Export(format!("create {}: {e}", dir.display())))?;
    let path = dir.join(sanitize_file_name(&download.file_name));
    std::fs::write(&path, &download.bytes)
        .map_err(|e| DataError::Export(format!("write {}: {e}", path.display())))?;
    info!(path = %path.display(), bytes = download.bytes.len(), "saved export");
    Ok(path)
}

/// Replace path separators and other characters most filesystems reject.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportEntry, ReportValue};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 8, day).unwrap()
    }

    fn recs() -> Vec<DailyRecord> {
        vec![
            DailyRecord { date: d(3), cases: 120, deaths: 9, recovered: -2 },
            DailyRecord { date: d(4), cases: 98, deaths: 11, recovered: 40 },
        ]
    }

    #[test]
    fn csv_has_header_and_rows() {
        let bytes = records_csv(&recs()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "date,cases,deaths,recovered\n2020-08-03,120,9,-2\n2020-08-04,98,11,40\n"
        );
    }

    #[test]
    fn csv_of_empty_is_header_only() {
        let text = String::from_utf8(records_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "date,cases,deaths,recovered\n");
    }

    #[test]
    fn txt_report_is_numbered_and_aligned() {
        let report = Report {
            entries: vec![
                ReportEntry { label: "Total Cases".into(), value: ReportValue::Count(218) },
                ReportEntry { label: "Day of Max Cases".into(), value: ReportValue::Date(d(3)) },
            ],
        };
        let text = String::from_utf8(report_txt(&report)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Data") && lines[0].contains("Number"));
        assert_eq!(lines[1], "  1  Total Cases       218");
        assert_eq!(lines[2], "  2  Day of Max Cases  2020-08-03");
    }

    #[test]
    fn json_report_keeps_order() {
        let report = Report {
            entries: vec![
                ReportEntry { label: "Total Cases".into(), value: ReportValue::Count(1) },
                ReportEntry { label: "Day of Max Cases".into(), value: ReportValue::Date(d(4)) },
            ],
        };
        let json = report_json(&report).unwrap();
        let first = json.find("Total Cases").unwrap();
        let second = json.find("Day of Max Cases").unwrap();
        assert!(first < second);
        assert!(json.contains("\"2020-08-04\""));
    }

    #[test]
    fn download_names_carry_entity_and_kind() {
        let table = table_download("Egypt", &recs()).unwrap();
        assert_eq!(table.file_name, "Covid-19 Table of Egypt.csv");
        assert_eq!(table.mime, "text/csv");

        let window = DateWindow::new(d(3), d(30)).unwrap();
        let range = range_download("Egypt", &window, &recs()[..1]).unwrap();
        assert_eq!(
            range.file_name,
            "Covid-19 Data of range 2020-08-03 to 2020-08-30 of Egypt.csv"
        );
        assert_eq!(String::from_utf8(range.bytes).unwrap().lines().count(), 2);

        let report = report_download("Egypt", &Report { entries: vec![] });
        assert_eq!(report.file_name, "Covid-19 Report of Egypt.txt");
        assert_eq!(report.mime, "text/plain");
    }

    #[test]
    fn sanitizes_separators() {
        assert_eq!(sanitize_file_name("a/b\\c:d.csv"), "a_b_c_d.csv");
    }
}
