//! Background worker thread: owns the `Dashboard` and runs every fetch.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Requests
//! carry an id so the main thread can drop responses it no longer wants.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use covidlab_core::source::FetchProgress;
use covidlab_core::{DailySeries, Dashboard, DataError, SeriesKind};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Load { id: u64, entity: String },
    /// Invalidate the cached entry first.
    Reload { id: u64, entity: String },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    FetchStarted {
        id: u64,
        kind: SeriesKind,
        index: usize,
        total: usize,
    },
    FetchFinished {
        id: u64,
        kind: SeriesKind,
        error: Option<String>,
    },
    Loaded {
        id: u64,
        series: Arc<DailySeries>,
        cached: bool,
    },
    LoadFailed {
        id: u64,
        entity: String,
        error: DataError,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    dashboard: Dashboard,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("covidlab-worker".into())
        .spawn(move || worker_loop(rx, tx, dashboard))
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, mut dashboard: Dashboard) {
    info!(source = dashboard.source_name(), "worker started");
    while let Ok(cmd) = rx.recv() {
        match cmd {
            WorkerCommand::Load { id, entity } => {
                handle_load(&mut dashboard, id, &entity, false, &tx)
            }
            WorkerCommand::Reload { id, entity } => {
                handle_load(&mut dashboard, id, &entity, true, &tx)
            }
            WorkerCommand::Shutdown => break,
        }
    }
    debug!("worker stopped");
}

fn handle_load(
    dashboard: &mut Dashboard,
    id: u64,
    entity: &str,
    reload: bool,
    tx: &Sender<WorkerResponse>,
) {
    let progress = ChannelProgress { id, tx: tx.clone() };
    let cached = !reload && dashboard.cache().get(entity).is_some();

    let result = if reload {
        dashboard.reload(entity, &progress)
    } else {
        dashboard.load(entity, &progress)
    };

    let resp = match result {
        Ok(series) => WorkerResponse::Loaded { id, series, cached },
        Err(error) => WorkerResponse::LoadFailed {
            id,
            entity: entity.to_string(),
            error,
        },
    };
    let _ = tx.send(resp);
}

/// FetchProgress implementation that sends messages through a channel.
struct ChannelProgress {
    id: u64,
    tx: Sender<WorkerResponse>,
}

impl FetchProgress for ChannelProgress {
    fn on_start(&self, kind: SeriesKind, index: usize, total: usize) {
        let _ = self.tx.send(WorkerResponse::FetchStarted {
            id: self.id,
            kind,
            index,
            total,
        });
    }

    fn on_complete(
        &self,
        kind: SeriesKind,
        _index: usize,
        _total: usize,
        result: Result<(), &DataError>,
    ) {
        let _ = self.tx.send(WorkerResponse::FetchFinished {
            id: self.id,
            kind,
            error: result.err().map(|e| e.to_string()),
        });
    }

    fn on_done(&self, _fetched: usize, _total: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use covidlab_core::source::SeriesSource;
    use std::sync::mpsc;
    use std::time::Duration;

    struct Fixture;

    impl SeriesSource for Fixture {
        fn name(&self) -> &str {
            "fixture"
        }

        fn fetch(&self, _kind: SeriesKind) -> Result<String, DataError> {
            Ok("Province/State,Country/Region,Lat,Long,1/1/20,1/2/20,1/3/20\n,Egypt,0,0,1,4,9\n".into())
        }
    }

    fn start() -> (Sender<WorkerCommand>, Receiver<WorkerResponse>, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(cmd_rx, resp_tx, Dashboard::new(Box::new(Fixture))).unwrap();
        (cmd_tx, resp_rx, handle)
    }

    /// Skip progress messages until the final response for a load.
    fn final_response(rx: &Receiver<WorkerResponse>) -> WorkerResponse {
        loop {
            let resp = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            if matches!(resp, WorkerResponse::Loaded { .. } | WorkerResponse::LoadFailed { .. }) {
                return resp;
            }
        }
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, _resp_rx, handle) = start();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn load_then_cached_load() {
        let (cmd_tx, resp_rx, handle) = start();

        cmd_tx.send(WorkerCommand::Load { id: 1, entity: "egypt".into() }).unwrap();
        match final_response(&resp_rx) {
            WorkerResponse::Loaded { id, series, cached } => {
                assert_eq!(id, 1);
                assert!(!cached);
                assert_eq!(series.records.len(), 2);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }

        cmd_tx.send(WorkerCommand::Load { id: 2, entity: "EGYPT".into() }).unwrap();
        assert!(matches!(
            final_response(&resp_rx),
            WorkerResponse::Loaded { id: 2, cached: true, .. }
        ));

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn unknown_country_fails() {
        let (cmd_tx, resp_rx, handle) = start();
        cmd_tx.send(WorkerCommand::Reload { id: 7, entity: "Atlantis".into() }).unwrap();
        assert!(matches!(
            final_response(&resp_rx),
            WorkerResponse::LoadFailed { id: 7, error: DataError::NotFound { .. }, .. }
        ));
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
