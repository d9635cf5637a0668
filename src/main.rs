//! CLI entry point for the 5S audit command center.
//!
//! Provides subcommands for rendering the executive report once, keeping it
//! refreshed on an interval, listing filter choices, and logging metrics.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fives_dashboard::config::DashboardConfig;
use fives_dashboard::filter::{AuditFilter, FilterOptions, Selection};
use fives_dashboard::output::{self, RadarMode, ReportOptions};
use fives_dashboard::pipeline::Pipeline;
use fives_dashboard::services::{AuditSource, CachedSource, source_from_arg};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fives_dashboard")]
#[command(about = "5S audit scoring and executive report generator", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Published sheet id, CSV URL or local CSV path (defaults to the configured sheet)
    #[arg(short, long)]
    source: Option<String>,
}

#[derive(Args, Clone)]
struct ViewArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Area to show ("Todos" for every area)
    #[arg(short, long, default_value = "Todos")]
    area: Selection,

    /// Machine to show ("Todos" for every machine)
    #[arg(short, long, default_value = "Todos")]
    machine: Selection,

    /// Radar chart layout
    #[arg(long, value_enum, default_value_t = RadarMode::Stages)]
    radar: RadarMode,

    /// Disable traffic-light coloring
    #[arg(long, default_value_t = false)]
    no_semaphore: bool,

    /// Logo image embedded at the top of the report
    #[arg(long)]
    logo: Option<PathBuf>,
}

impl ViewArgs {
    fn filter(&self) -> AuditFilter {
        AuditFilter::new(self.area.clone(), self.machine.clone())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the HTML executive report once
    Report {
        #[command(flatten)]
        view: ViewArgs,

        /// Report file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the summary as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Re-run the pipeline on an interval and keep the report file current
    Watch {
        #[command(flatten)]
        view: ViewArgs,

        /// Report file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seconds between refreshes
        #[arg(short, long)]
        interval: Option<u64>,

        /// Number of refreshes (0 = until Ctrl+C)
        #[arg(short = 'n', long, default_value_t = 0)]
        runs: usize,
    },
    /// List the area and machine filter choices
    Options {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Log the dashboard metrics without writing a report
    Summary {
        #[command(flatten)]
        view: ViewArgs,

        /// Print the summary as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging();
    let cli = Cli::parse();

    let result = run(cli).await;
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "System error");
    }
    result
}

/// Colored stderr plus a JSON daily-rolling log file.
fn init_logging() -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fives_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fives_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}

async fn run(cli: Cli) -> Result<()> {
    let config = DashboardConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Report { view, output, json } => {
            let source = open_source(&config, &view.source)?;
            let pipeline = pipeline_for(&config, &view);
            let result = pipeline.refresh(&source, &view.filter()).await?;

            output::log_summary(&result.summary);
            output::print_pretty(&result.summary);
            if json {
                output::print_json(&result.summary)?;
            }

            let path = output.unwrap_or_else(|| config.output.clone());
            output::write_report(&path, &result.report_html)?;
            info!(path = %path.display(), "Report written");
        }
        Commands::Watch {
            view,
            output,
            interval,
            runs,
        } => {
            let source = open_source(&config, &view.source)?;
            let pipeline = pipeline_for(&config, &view);
            let path = output.unwrap_or_else(|| config.output.clone());
            let every = interval
                .map(|s| Duration::from_secs(s.max(1)))
                .unwrap_or_else(|| config.refresh_interval());

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "Failed to listen for Ctrl+C");
                    std::future::pending::<()>().await;
                }
            };
            pipeline
                .watch(&source, &view.filter(), &path, every, runs, shutdown)
                .await;
        }
        Commands::Options { source } => {
            let source = open_source(&config, &source)?;
            let options = FilterOptions::from_table(&source.snapshot().await?);

            for area in options.area_choices() {
                info!(area = %area, "Area");
            }
            for machine in options.machine_choices() {
                info!(machine = %machine, "Machine");
            }
            info!(
                areas = options.areas.len(),
                machines = options.machines.len(),
                "Filter options"
            );
        }
        Commands::Summary { view, json } => {
            let source = open_source(&config, &view.source)?;
            let result = pipeline_for(&config, &view)
                .refresh(&source, &view.filter())
                .await?;

            output::log_summary(&result.summary);
            if json {
                output::print_json(&result.summary)?;
            }
        }
    }

    Ok(())
}

fn open_source(
    config: &DashboardConfig,
    args: &SourceArgs,
) -> Result<CachedSource<Box<dyn AuditSource>>> {
    let arg = args.source.as_deref().unwrap_or(&config.sheet_id);
    let source = source_from_arg(arg)?;
    info!(source = %source.describe(), ttl_secs = config.cache_ttl_secs, "Audit source ready");
    Ok(CachedSource::new(source, config.cache_ttl()))
}

fn pipeline_for(config: &DashboardConfig, view: &ViewArgs) -> Pipeline {
    Pipeline::new(
        config.score_map(),
        ReportOptions {
            radar: view.radar,
            semaphore: !view.no_semaphore,
            logo: view.logo.clone().or_else(|| config.logo.clone()),
        },
    )
}
