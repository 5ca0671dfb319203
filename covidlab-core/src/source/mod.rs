//! Series sources and the fetch step.
//!
//! A [`SeriesSource`] hands back the raw CSV text of one series. Sources know
//! nothing about parsing or caching; [`fetch_snapshot`] pulls all three and
//! parses them, and the cache sits above that in the dashboard.

mod file;
mod http;

pub use file::FileSource;
pub use http::HttpSource;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::error::DataError;
use crate::series::SeriesKind;
use crate::transform::SourceSnapshot;

/// Anything that can produce the raw CSV for a series.
///
/// Implementations must not retry; a failed fetch is reported as-is.
pub trait SeriesSource: Send + Sync {
    /// Human-readable name for logs and status lines.
    fn name(&self) -> &str;

    /// Raw CSV text of one series.
    fn fetch(&self, kind: SeriesKind) -> Result<String, DataError>;
}

/// Progress callbacks for the three-series fetch.
pub trait FetchProgress: Send {
    fn on_start(&self, kind: SeriesKind, index: usize, total: usize);

    fn on_complete(
        &self,
        kind: SeriesKind,
        index: usize,
        total: usize,
        result: Result<(), &DataError>,
    );

    fn on_done(&self, fetched: usize, total: usize);
}

/// Prints each step to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, kind: SeriesKind, index: usize, total: usize) {
        println!("[{}/{}] Fetching {kind} series...", index + 1, total);
    }

    fn on_complete(
        &self,
        kind: SeriesKind,
        _index: usize,
        _total: usize,
        result: Result<(), &DataError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {kind}"),
            Err(e) => println!("  FAIL: {kind}: {e}"),
        }
    }

    fn on_done(&self, fetched: usize, total: usize) {
        println!("Fetched {fetched}/{total} series");
    }
}

/// Silent progress, for tests and the TUI worker.
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn on_start(&self, _kind: SeriesKind, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _kind: SeriesKind,
        _index: usize,
        _total: usize,
        _result: Result<(), &DataError>,
    ) {
    }

    fn on_done(&self, _fetched: usize, _total: usize) {}
}

/// Fetch and parse all three series. The first failure aborts the fetch.
pub fn fetch_snapshot(
    source: &dyn SeriesSource,
    progress: &dyn FetchProgress,
) -> Result<SourceSnapshot, DataError> {
    let total = SeriesKind::ALL.len();
    let mut texts = Vec::with_capacity(total);

    for (i, kind) in SeriesKind::ALL.into_iter().enumerate() {
        progress.on_start(kind, i, total);
        match source.fetch(kind) {
            Ok(text) => {
                debug!(source = source.name(), %kind, bytes = text.len(), "fetched series");
                progress.on_complete(kind, i, total, Ok(()));
                texts.push(text);
            }
            Err(e) => {
                progress.on_complete(kind, i, total, Err(&e));
                progress.on_done(i, total);
                return Err(e);
            }
        }
    }
    progress.on_done(total, total);

    let snapshot = SourceSnapshot::from_csv(&texts[0], &texts[1], &texts[2])?;
    info!(
        source = source.name(),
        dates = snapshot.cases.dates.len(),
        hash = %snapshot.dataset_hash,
        "parsed source snapshot"
    );
    Ok(snapshot)
}

/// Where one configured location points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Location {
    Url(String),
    Path(PathBuf),
}

pub(crate) fn classify(location: &str) -> Location {
    let location = location.trim();
    if let Some(path) = location.strip_prefix("file://") {
        Location::Path(PathBuf::from(path))
    } else if location.starts_with("http://") || location.starts_with("https://") {
        Location::Url(location.to_string())
    } else {
        Location::Path(PathBuf::from(location))
    }
}

/// Build the source described by the config.
///
/// All-URL configs get an [`HttpSource`], all-path configs a [`FileSource`].
/// A mix of the two is rejected.
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn SeriesSource>, DataError> {
    let locations = SeriesKind::ALL.map(|k| classify(config.location(k)));

    match locations {
        [Location::Url(cases), Location::Url(deaths), Location::Url(recovered)] => {
            let source = HttpSource::new(
                [cases, deaths, recovered],
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Box::new(source))
        }
        [Location::Path(cases), Location::Path(deaths), Location::Path(recovered)] => {
            Ok(Box::new(FileSource::new([cases, deaths, recovered])))
        }
        _ => Err(DataError::Malformed(
            "sources must be all URLs or all local files".into(),
        )),
    }
}
