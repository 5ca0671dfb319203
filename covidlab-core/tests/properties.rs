//! Property tests for the transform, range, and report stages.

use chrono::NaiveDate;
use proptest::prelude::*;

use covidlab_core::report::{peak, total};
use covidlab_core::transform::{difference, CumulativeRow};
use covidlab_core::{DailyRecord, DateWindow, Metric, Report, ReportValue};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 22).unwrap() + chrono::Duration::days(offset)
}

fn cumulative(values: &[(i64, i64, i64)]) -> Vec<CumulativeRow> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(cases, deaths, recovered))| CumulativeRow {
            date: day(i as i64),
            cases,
            deaths,
            recovered,
        })
        .collect()
}

fn records(values: &[(i64, i64, i64)]) -> Vec<DailyRecord> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(cases, deaths, recovered))| DailyRecord {
            date: day(i as i64),
            cases,
            deaths,
            recovered,
        })
        .collect()
}

fn counts() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
    prop::collection::vec(
        (-1_000i64..1_000_000, -1_000i64..100_000, -1_000i64..500_000),
        1..120,
    )
}

#[test]
fn worked_differencing_example() {
    let rows = cumulative(&[(10, 0, 0), (15, 0, 0), (15, 0, 0), (20, 0, 0)]);
    let daily: Vec<i64> = difference("Egypt", &rows)
        .unwrap()
        .iter()
        .map(|r| r.cases)
        .collect();
    assert_eq!(daily, vec![5, 0, 5]);
}

proptest! {
    #[test]
    fn differencing_is_consistent(values in counts()) {
        let rows = cumulative(&values);
        let daily = difference("Egypt", &rows).unwrap();

        prop_assert_eq!(daily.len(), rows.len() - 1);
        for (i, rec) in daily.iter().enumerate() {
            prop_assert_eq!(rec.date, rows[i + 1].date);
            prop_assert_eq!(rec.cases, rows[i + 1].cases - rows[i].cases);
            prop_assert_eq!(rec.deaths, rows[i + 1].deaths - rows[i].deaths);
            prop_assert_eq!(rec.recovered, rows[i + 1].recovered - rows[i].recovered);
        }

        // telescoping sum
        if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
            prop_assert_eq!(total(&daily, Metric::Cases), last.cases - first.cases);
        }
    }

    #[test]
    fn window_selection_is_idempotent_and_monotonic(
        values in counts(),
        a in 0i64..150,
        b in 0i64..150,
        widen_lo in 0i64..30,
        widen_hi in 0i64..30,
    ) {
        let recs = records(&values);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let inner = DateWindow::new(day(lo), day(hi)).unwrap();
        let outer = DateWindow::new(day(lo - widen_lo), day(hi + widen_hi)).unwrap();

        let once = inner.select(&recs);
        prop_assert_eq!(inner.select(once), once);
        prop_assert!(once.iter().all(|r| inner.contains(r.date)));

        let wide = outer.select(&recs);
        prop_assert!(once.iter().all(|r| wide.contains(r)));
        prop_assert!(once.len() <= wide.len());
    }

    #[test]
    fn report_totals_match_column_sums(values in counts(), lo in 0usize..120, len in 1usize..120) {
        let recs = records(&values);
        let start = lo.min(recs.len() - 1);
        let end = (start + len).min(recs.len());
        let window = &recs[start..end];

        let report = Report::build(&recs, window).unwrap();
        prop_assert_eq!(report.len(), 15);

        let sum = |slice: &[DailyRecord], f: fn(&DailyRecord) -> i64| slice.iter().map(f).sum::<i64>();
        prop_assert_eq!(report.get("Total Cases"), Some(ReportValue::Count(sum(&recs, |r| r.cases))));
        prop_assert_eq!(report.get("Total Deaths"), Some(ReportValue::Count(sum(&recs, |r| r.deaths))));
        prop_assert_eq!(
            report.get("Sum of Recovered in Selected Range"),
            Some(ReportValue::Count(sum(window, |r| r.recovered)))
        );
    }

    #[test]
    fn peak_is_earliest_maximum(values in counts()) {
        let recs = records(&values);
        for metric in Metric::ALL {
            let (max, date) = peak(&recs, metric).unwrap();
            let expected_max = recs.iter().map(|r| metric.value(r)).max().unwrap();
            prop_assert_eq!(max, expected_max);

            let first = recs.iter().find(|r| metric.value(r) == expected_max).unwrap();
            prop_assert_eq!(date, first.date);
        }
    }
}
