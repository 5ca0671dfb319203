//! covidlab TUI: four-panel terminal dashboard.
//!
//! Panels:
//! 1. Table: the country's daily series, newest first
//! 2. Chart: the selected metric over the date range
//! 3. Report: the 15-metric summary
//! 4. Help: keyboard shortcuts

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use covidlab_core::{Dashboard, DashboardConfig};

use crate::app::AppState;
use crate::worker::WorkerCommand;

#[derive(Parser)]
#[command(
    name = "covidlab-tui",
    version,
    about = "covidlab: terminal dashboard for daily COVID-19 series"
)]
struct Args {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file. Defaults to covidlab-tui.log in the temp directory.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = args
        .log_file
        .unwrap_or_else(|| std::env::temp_dir().join("covidlab-tui.log"));
    init_logging(&log_path)?;

    let config = DashboardConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    let dashboard = Dashboard::from_config(&config)?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, dashboard)?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, &config);
    app.request_load(false);
    info!(log = %log_path.display(), "tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker. An in-flight fetch finishes first.
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
