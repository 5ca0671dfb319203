//! Pipeline orchestration: load a country's series, then derive every
//! dashboard section from the current inputs.
//!
//! [`Dashboard`] owns the source and the per-country cache. [`DashboardView`]
//! is recomputed on each input change and is cheap: it only slices and sums
//! the already-loaded series.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::cache::SeriesCache;
use crate::config::DashboardConfig;
use crate::error::DataError;
use crate::range::DateWindow;
use crate::report::Report;
use crate::series::{DailyRecord, DailySeries, Metric};
use crate::source::{self, FetchProgress, SeriesSource};
use crate::transform::{self, SourceSnapshot};

pub struct Dashboard {
    source: Box<dyn SeriesSource>,
    cache: SeriesCache,
}

impl Dashboard {
    pub fn new(source: Box<dyn SeriesSource>) -> Self {
        Self {
            source,
            cache: SeriesCache::new(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, DataError> {
        Ok(Self::new(source::from_config(&config.sources)?))
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Daily series for `entity`, from cache or via fetch + transform.
    ///
    /// Failures are returned and never cached.
    pub fn load(
        &mut self,
        entity: &str,
        progress: &dyn FetchProgress,
    ) -> Result<Arc<DailySeries>, DataError> {
        if let Some(series) = self.cache.get(entity) {
            debug!(entity, "series cache hit");
            return Ok(series);
        }

        let snapshot = self.fetch_snapshot(progress)?;
        let series = transform::to_daily(&snapshot, entity)?;
        info!(
            entity = %series.entity,
            days = series.len(),
            "derived daily series"
        );
        Ok(self.cache.insert(entity, series))
    }

    /// Drop any cached series for `entity` and load it again.
    pub fn reload(
        &mut self,
        entity: &str,
        progress: &dyn FetchProgress,
    ) -> Result<Arc<DailySeries>, DataError> {
        if self.cache.invalidate(entity) {
            debug!(entity, "invalidated cached series");
        }
        self.load(entity, progress)
    }

    pub fn invalidate(&mut self, entity: &str) -> bool {
        self.cache.invalidate(entity)
    }

    /// Fetch and parse the raw tables, bypassing the cache.
    pub fn fetch_snapshot(&self, progress: &dyn FetchProgress) -> Result<SourceSnapshot, DataError> {
        source::fetch_snapshot(self.source.as_ref(), progress)
    }
}

/// Every section of the dashboard for one set of inputs.
///
/// Sections fail independently: a bad date leaves `table` intact, and an
/// empty window only affects `report`.
#[derive(Debug)]
pub struct DashboardView {
    pub entity: String,
    pub metric: Metric,
    /// Full series, newest first.
    pub table: Vec<DailyRecord>,
    pub window: Result<DateWindow, DataError>,
    /// Records inside the window, ascending. Empty when the window is invalid.
    pub in_window: Vec<DailyRecord>,
    /// `(date, value)` of the metric over the window.
    pub chart: Vec<(NaiveDate, i64)>,
    pub report: Result<Report, DataError>,
}

impl DashboardView {
    pub fn compute(series: &DailySeries, from: &str, to: &str, metric: Metric) -> Self {
        let table: Vec<DailyRecord> = series.newest_first().copied().collect();
        let window = DateWindow::parse(from, to);

        let (in_window, report) = match &window {
            Ok(w) => {
                let selected = w.select(&series.records);
                (selected.to_vec(), Report::build(&series.records, selected))
            }
            Err(e) => (Vec::new(), Err(e.clone())),
        };

        let chart = in_window
            .iter()
            .map(|r| (r.date, metric.value(r)))
            .collect();

        Self {
            entity: series.entity.clone(),
            metric,
            table,
            window,
            in_window,
            chart,
            report,
        }
    }

    /// Recompute only the chart after a metric change.
    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
        self.chart = self
            .in_window
            .iter()
            .map(|r| (r.date, metric.value(r)))
            .collect();
    }
}
