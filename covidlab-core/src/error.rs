//! Structured error types for the data pipeline.
//!
//! Displayable in both CLI and TUI contexts. Every dashboard section catches
//! its own failure and shows [`DataError::user_message`] in place of its
//! output, so no variant is fatal to the process.

use crate::series::SeriesKind;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DataError {
    #[error("country not found in source data: {entity}")]
    NotFound { entity: String },

    #[error("invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("no data to summarize: {context}")]
    EmptyData { context: String },

    #[error("failed to fetch {kind} series from {url}: {reason}")]
    Fetch {
        kind: SeriesKind,
        url: String,
        reason: String,
    },

    #[error("malformed source data: {0}")]
    Malformed(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl DataError {
    /// Short informational text shown in place of a failed section.
    pub fn user_message(&self) -> String {
        match self {
            DataError::NotFound { entity } => format!("No data for {entity}"),
            DataError::InvalidDate { .. } => {
                "Invalid Date Input, please input a date in the form \"YYYY-MM-DD\", e.g. 2017-12-10"
                    .to_string()
            }
            DataError::EmptyData { .. } => "No data in the selected range".to_string(),
            DataError::Fetch { kind, .. } => {
                format!("Could not download the {kind} data, check your connection and reload")
            }
            DataError::Malformed(_) => "Source data could not be read".to_string(),
            DataError::Export(msg) => format!("Export failed: {msg}"),
        }
    }

    pub(crate) fn invalid_date(input: &str, reason: impl Into<String>) -> Self {
        DataError::InvalidDate {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
