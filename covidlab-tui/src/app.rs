//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread owns the `Dashboard` and
//! talks to this struct through channels; the view is recomputed here on
//! every input change.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use covidlab_core::export::{self, Download};
use covidlab_core::{DailySeries, DashboardConfig, DashboardView, DataError, Metric, SeriesKind};

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Table,
    Chart,
    Report,
    Help,
}

impl Panel {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            Panel::Table => 0,
            Panel::Chart => 1,
            Panel::Report => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Table),
            1 => Some(Panel::Chart),
            2 => Some(Panel::Report),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Table => "Table",
            Panel::Chart => "Chart",
            Panel::Report => "Report",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        match self {
            Panel::Table => Panel::Chart,
            Panel::Chart => Panel::Report,
            Panel::Report => Panel::Help,
            Panel::Help => Panel::Table,
        }
    }

    pub fn prev(self) -> Panel {
        match self {
            Panel::Table => Panel::Help,
            Panel::Chart => Panel::Table,
            Panel::Report => Panel::Chart,
            Panel::Help => Panel::Report,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Input,
    Export,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 4] = [
        ErrorCategory::Network,
        ErrorCategory::Data,
        ErrorCategory::Input,
        ErrorCategory::Export,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Input => "INPUT",
            ErrorCategory::Export => "IO",
        }
    }

    pub fn of(err: &DataError) -> Self {
        match err {
            DataError::Fetch { .. } => ErrorCategory::Network,
            DataError::Malformed(_) | DataError::EmptyData { .. } => ErrorCategory::Data,
            DataError::NotFound { .. } | DataError::InvalidDate { .. } => ErrorCategory::Input,
            DataError::Export(_) => ErrorCategory::Export,
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// A text input the user can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Country,
    From,
    To,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Country => "Country",
            Field::From => "From (YYYY-MM-DD)",
            Field::To => "To (YYYY-MM-DD)",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Edit(Field),
    ErrorHistory,
}

/// The dashboard inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub country: String,
    pub from: String,
    pub to: String,
    pub metric: Metric,
}

/// Fetch progress shown while the worker is loading.
#[derive(Debug, Clone, Default)]
pub struct LoadState {
    pub in_progress: bool,
    pub current: Option<SeriesKind>,
    pub done: usize,
    pub total: usize,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Dashboard
    pub inputs: Inputs,
    pub series: Option<Arc<DailySeries>>,
    pub view: Option<DashboardView>,
    pub show_report: bool,
    pub table_scroll: usize,
    pub load: LoadState,
    /// Id of the newest load request; older responses are ignored.
    pub request_id: u64,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub edit_input: String,

    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        config: &DashboardConfig,
    ) -> Self {
        let defaults = &config.defaults;
        Self {
            active_panel: Panel::Table,
            running: true,
            inputs: Inputs {
                country: defaults.entity.clone(),
                from: defaults.from.clone(),
                to: defaults.to.clone(),
                metric: defaults.metric,
            },
            series: None,
            view: None,
            show_report: false,
            table_scroll: 0,
            load: LoadState::default(),
            request_id: 0,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            edit_input: String::new(),
            export_dir: config.export.resolved_dir(),
        }
    }

    /// Ask the worker for the current country. `reload` bypasses its cache.
    pub fn request_load(&mut self, reload: bool) {
        self.request_id += 1;
        let entity = self.inputs.country.trim().to_string();
        let cmd = if reload {
            WorkerCommand::Reload {
                id: self.request_id,
                entity: entity.clone(),
            }
        } else {
            WorkerCommand::Load {
                id: self.request_id,
                entity: entity.clone(),
            }
        };

        self.load = LoadState {
            in_progress: true,
            current: None,
            done: 0,
            total: SeriesKind::ALL.len(),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.load.in_progress = false;
            self.set_error_status("Worker is not running");
            return;
        }
        self.set_status(format!("Loading {entity}..."));
    }

    /// Rebuild every section from the loaded series and current inputs.
    pub fn recompute(&mut self) {
        let Some(series) = &self.series else {
            self.view = None;
            return;
        };
        let view = DashboardView::compute(
            series,
            &self.inputs.from,
            &self.inputs.to,
            self.inputs.metric,
        );
        if let Err(e) = &view.window {
            self.set_warning(e.user_message());
        }
        self.view = Some(view);
        self.table_scroll = self.table_scroll.min(self.table_len().saturating_sub(1));
    }

    pub fn table_len(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.table.len())
    }

    pub fn cycle_metric(&mut self) {
        self.inputs.metric = self.inputs.metric.next();
        if let Some(view) = &mut self.view {
            view.set_metric(self.inputs.metric);
        }
        self.set_status(format!("Metric: {}", self.inputs.metric));
    }

    pub fn open_edit(&mut self, field: Field) {
        self.edit_input = match field {
            Field::Country => self.inputs.country.clone(),
            Field::From => self.inputs.from.clone(),
            Field::To => self.inputs.to.clone(),
        };
        self.overlay = Overlay::Edit(field);
    }

    /// Commit the edit buffer into `field`.
    pub fn apply_edit(&mut self, field: Field) {
        let value = self.edit_input.trim().to_string();
        self.overlay = Overlay::None;
        self.edit_input.clear();

        match field {
            Field::Country => {
                let unchanged = value == self.inputs.country && self.series.is_some();
                if value.is_empty() || unchanged {
                    return;
                }
                self.inputs.country = value;
                self.table_scroll = 0;
                self.request_load(false);
            }
            Field::From => {
                self.inputs.from = value;
                self.recompute();
            }
            Field::To => {
                self.inputs.to = value;
                self.recompute();
            }
        }
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::FetchStarted { id, kind, index, total } => {
                if id == self.request_id {
                    self.load.current = Some(kind);
                    self.load.done = index;
                    self.load.total = total;
                }
            }
            WorkerResponse::FetchFinished { id, kind, error } => {
                if id != self.request_id {
                    return;
                }
                match error {
                    None => self.load.done += 1,
                    // LoadFailed follows and records it
                    Some(message) => debug!(id, %kind, %message, "fetch failed"),
                }
            }
            WorkerResponse::Loaded { id, series, cached } => {
                if id != self.request_id {
                    debug!(id, latest = self.request_id, "dropping stale load");
                    return;
                }
                self.load.in_progress = false;
                self.load.current = None;
                self.set_status(format!(
                    "{}: {} days{}",
                    series.entity,
                    series.len(),
                    if cached { " (cached)" } else { "" }
                ));
                self.series = Some(series);
                self.recompute();
            }
            WorkerResponse::LoadFailed { id, entity, error } => {
                if id != self.request_id {
                    return;
                }
                self.load.in_progress = false;
                self.load.current = None;
                self.series = None;
                self.view = None;
                self.push_data_error(&error, format!("loading {entity}"));
            }
        }
    }

    /// Write the table, report, and range downloads for the current view.
    pub fn export_current(&mut self) {
        let built = match (&self.series, &self.view) {
            (Some(series), Some(view)) => Some(build_downloads(series, view)),
            _ => None,
        };
        let downloads = match built {
            None => {
                self.set_warning("Nothing to export yet");
                return;
            }
            Some(Err(e)) => {
                self.push_data_error(&e, "building exports".into());
                return;
            }
            Some(Ok(downloads)) => downloads,
        };

        let dir = self.export_dir.clone();
        for download in &downloads {
            if let Err(e) = export::save(download, &dir) {
                self.push_data_error(&e, format!("writing {}", download.file_name));
                return;
            }
        }
        self.set_status(format!(
            "Exported {} file(s) to {}",
            downloads.len(),
            dir.display()
        ));
    }

    pub fn push_data_error(&mut self, err: &DataError, context: String) {
        warn!(%err, %context, "dashboard error");
        self.push_error(ErrorCategory::of(err), err.user_message(), context);
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    fn set_error_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

/// Table always; report and range only when their sections have output.
fn build_downloads(series: &DailySeries, view: &DashboardView) -> Result<Vec<Download>, DataError> {
    let mut downloads = vec![export::table_download(&series.entity, &series.records)?];
    if let Ok(report) = &view.report {
        downloads.push(export::report_download(&series.entity, report));
    }
    if let Ok(window) = &view.window {
        downloads.push(export::range_download(&series.entity, window, &view.in_window)?);
    }
    Ok(downloads)
}
