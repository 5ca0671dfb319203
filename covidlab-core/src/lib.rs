//! covidlab core: the data pipeline behind the dashboard.
//!
//! This crate owns everything that is not rendering:
//! - Fetching the three JHU CSSE time-series CSVs (HTTP or local files)
//! - Reshaping wide cumulative tables into per-day deltas for one country
//! - Selecting an inclusive date window
//! - Building the 15-metric summary report
//! - Serializing tables and reports for export
//! - Memoizing fetch + transform per country

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod range;
pub mod report;
pub mod series;
pub mod source;
pub mod transform;

pub use cache::SeriesCache;
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, DashboardView};
pub use error::DataError;
pub use range::DateWindow;
pub use report::{Report, ReportEntry, ReportValue};
pub use series::{DailyRecord, DailySeries, Metric, SeriesKind};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across the TUI worker channel are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<DailySeries>();
        require_sync::<DailySeries>();
        require_send::<DataError>();
        require_sync::<DataError>();
        require_send::<Report>();
        require_sync::<Report>();
        require_send::<Dashboard>();
        require_send::<DashboardConfig>();
        require_sync::<DashboardConfig>();
    }
}
