//! covidlab CLI: daily COVID-19 series for one country.
//!
//! Commands:
//! - `show`: reverse-chronological table followed by the summary report
//! - `report`: the 15-metric report, as text or JSON
//! - `export`: write the table, report, and range files to a directory
//! - `countries`: list the country names the source knows
//! - `config`: print the effective configuration as TOML

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use covidlab_core::export;
use covidlab_core::source::{FetchProgress, NoProgress, StdoutProgress};
use covidlab_core::{Dashboard, DashboardConfig, DashboardView, DailySeries, Metric};

#[derive(Parser)]
#[command(
    name = "covidlab",
    version,
    about = "covidlab: daily COVID-19 cases, deaths and recoveries per country"
)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the daily table (newest first) and the summary report.
    Show {
        /// Country name, matched case-insensitively (e.g. egypt, "korea, south").
        country: Option<String>,

        /// Start of the report range (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,

        /// End of the report range (YYYY-MM-DD), inclusive.
        #[arg(long)]
        to: Option<String>,

        /// Metric summarized under the table: cases, deaths, recovered.
        #[arg(long)]
        metric: Option<Metric>,

        /// Number of table rows to print.
        #[arg(long, default_value_t = 15)]
        limit: usize,
    },
    /// Print the 15-metric summary report.
    Report {
        country: Option<String>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        /// Emit JSON instead of aligned text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the table, report, and range downloads to a directory.
    Export {
        country: Option<String>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        /// Output directory. Defaults to the configured export dir.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// List every country present in the source data.
    Countries,
    /// Print the effective configuration as TOML.
    Config,
}

/// Inputs shared by the per-country commands, after config defaults.
struct Inputs {
    country: String,
    from: String,
    to: String,
}

impl Inputs {
    fn resolve(
        config: &DashboardConfig,
        country: Option<String>,
        from: Option<String>,
        to: Option<String>,
    ) -> Self {
        Self {
            country: country.unwrap_or_else(|| config.defaults.entity.clone()),
            from: from.unwrap_or_else(|| config.defaults.from.clone()),
            to: to.unwrap_or_else(|| config.defaults.to.clone()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = DashboardConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Show {
            country,
            from,
            to,
            metric,
            limit,
        } => {
            let inputs = Inputs::resolve(&config, country, from, to);
            let metric = metric.unwrap_or(config.defaults.metric);
            run_show(&config, &inputs, metric, limit)
        }
        Commands::Report {
            country,
            from,
            to,
            json,
        } => run_report(&config, &Inputs::resolve(&config, country, from, to), json),
        Commands::Export {
            country,
            from,
            to,
            out_dir,
        } => {
            let inputs = Inputs::resolve(&config, country, from, to);
            let dir = out_dir.unwrap_or_else(|| config.export.resolved_dir());
            run_export(&config, &inputs, &dir)
        }
        Commands::Countries => run_countries(&config),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_series(
    config: &DashboardConfig,
    country: &str,
    progress: &dyn FetchProgress,
) -> Result<std::sync::Arc<DailySeries>, covidlab_core::DataError> {
    let mut dashboard = Dashboard::from_config(config)?;
    info!(source = dashboard.source_name(), country, "loading series");
    dashboard.load(country, progress)
}

fn run_show(config: &DashboardConfig, inputs: &Inputs, metric: Metric, limit: usize) -> Result<()> {
    let series = match load_series(config, &inputs.country, &StdoutProgress) {
        Ok(s) => s,
        Err(e) => {
            println!("{}", e.user_message());
            return Ok(());
        }
    };
    let view = DashboardView::compute(&series, &inputs.from, &inputs.to, metric);

    println!();
    println!("=== Covid-19 data of {} ===", view.entity);
    println!("Days:    {}", series.len());
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        println!("Period:  {first} to {last}");
    }
    println!("Dataset: {}", &series.dataset_hash[..12.min(series.dataset_hash.len())]);
    println!();

    println!("{:<12} {:>10} {:>10} {:>10}", "Date", "Cases", "Deaths", "Recovered");
    println!("{}", "-".repeat(45));
    for r in view.table.iter().take(limit) {
        println!(
            "{:<12} {:>10} {:>10} {:>10}",
            r.date.format("%Y-%m-%d"),
            r.cases,
            r.deaths,
            r.recovered
        );
    }
    if view.table.len() > limit {
        println!("... {} more rows", view.table.len() - limit);
    }
    println!();

    match &view.window {
        Ok(window) => {
            println!("--- {} from {window} ---", view.metric);
            if view.chart.is_empty() {
                println!("No data in the selected range");
            } else {
                let peak = view.chart.iter().map(|&(_, v)| v).max().unwrap_or(0);
                let sum: i64 = view.chart.iter().map(|&(_, v)| v).sum();
                println!("Days: {}  Sum: {sum}  Peak: {peak}", view.chart.len());
            }
        }
        Err(e) => println!("{}", e.user_message()),
    }
    println!();

    println!("--- Report ---");
    match &view.report {
        Ok(report) => print!("{}", String::from_utf8_lossy(&export::report_txt(report))),
        Err(e) => println!("{}", e.user_message()),
    }
    Ok(())
}

fn run_report(config: &DashboardConfig, inputs: &Inputs, json: bool) -> Result<()> {
    // JSON goes to stdout, so stay quiet while fetching
    let progress: &dyn FetchProgress = if json { &NoProgress } else { &StdoutProgress };

    let series = match load_series(config, &inputs.country, progress) {
        Ok(s) => s,
        Err(e) if json => bail!("{e}"),
        Err(e) => {
            println!("{}", e.user_message());
            return Ok(());
        }
    };

    let view = DashboardView::compute(&series, &inputs.from, &inputs.to, Metric::default());
    match (view.report, json) {
        (Ok(report), true) => println!("{}", export::report_json(&report)?),
        (Ok(report), false) => {
            println!();
            println!("Report of {} ({} to {})", view.entity, inputs.from, inputs.to);
            print!("{}", String::from_utf8_lossy(&export::report_txt(&report)));
        }
        (Err(e), true) => bail!("{e}"),
        (Err(e), false) => println!("{}", e.user_message()),
    }
    Ok(())
}

fn run_export(config: &DashboardConfig, inputs: &Inputs, dir: &Path) -> Result<()> {
    let series = load_series(config, &inputs.country, &StdoutProgress)?;
    let view = DashboardView::compute(&series, &inputs.from, &inputs.to, Metric::default());

    let window = view.window.as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;
    let report = view.report.as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;

    let downloads = [
        export::table_download(&series.entity, &series.records)?,
        export::report_download(&series.entity, report),
        export::range_download(&series.entity, window, &view.in_window)?,
    ];

    println!();
    for download in &downloads {
        let path = export::save(download, dir)?;
        println!("Wrote {} ({} bytes)", path.display(), download.bytes.len());
    }
    Ok(())
}

fn run_countries(config: &DashboardConfig) -> Result<()> {
    let dashboard = Dashboard::from_config(config)?;
    let snapshot = dashboard.fetch_snapshot(&StdoutProgress)?;
    let regions = snapshot.cases.regions();

    println!();
    for region in &regions {
        println!("{region}");
    }
    println!();
    println!("{} countries", regions.len());
    Ok(())
}
