//! HTTP source for the published JHU CSSE CSVs.
//!
//! One GET per series. A non-success status or transport error is a
//! [`DataError::Fetch`]; nothing is retried.

use std::time::Duration;

use tracing::debug;

use super::SeriesSource;
use crate::error::DataError;
use crate::series::SeriesKind;

pub struct HttpSource {
    client: reqwest::blocking::Client,
    urls: [String; 3],
}

impl HttpSource {
    /// `urls` are ordered cases, deaths, recovered.
    pub fn new(urls: [String; 3], timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("covidlab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::Malformed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, urls })
    }

    fn url(&self, kind: SeriesKind) -> &str {
        match kind {
            SeriesKind::Cases => &self.urls[0],
            SeriesKind::Deaths => &self.urls[1],
            SeriesKind::Recovered => &self.urls[2],
        }
    }
}

impl SeriesSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, kind: SeriesKind) -> Result<String, DataError> {
        let url = self.url(kind);
        let fetch_err = |reason: String| DataError::Fetch {
            kind,
            url: url.to_string(),
            reason,
        };

        debug!(%kind, url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }

        resp.text()
            .map_err(|e| fetch_err(format!("failed to read body: {e}")))
    }
}
