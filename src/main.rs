//! CLI entry point for the HKN attendance tracker.
//!
//! Downloads the responses and events spreadsheets, counts per-person
//! attendance for each activity category and writes the consolidated report.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use hkn_attendance::config::Config;
use hkn_attendance::fetch::BasicClient;
use hkn_attendance::output::write_report;
use hkn_attendance::pipeline::{RunOptions, compute_report, lookup, run};
use hkn_attendance::summary::{progress_json, render_progress};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Parser)]
#[command(name = "hkn_attendance")]
#[command(about = "Tracks HKN event attendance from form responses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download both spreadsheets and rebuild the attendance report
    Run {
        /// Responses export URL or path [default: RESPONSES_URL]
        #[arg(long, value_name = "URL_OR_FILE")]
        responses: Option<String>,

        /// Events export URL or path [default: EVENTS_URL]
        #[arg(long, value_name = "URL_OR_FILE")]
        events: Option<String>,

        /// Directory for the raw downloads [default: DATA_DIR]
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Do not keep raw copies of the downloads
        #[arg(long, default_value_t = false)]
        no_raw: bool,

        /// Report file to write [default: ATTENDANCE_PATH]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Category to track; repeat for several [default: ATTENDANCE_CATEGORIES]
        #[arg(short, long = "category", value_name = "LABEL")]
        categories: Vec<String>,
    },
    /// Build the report from local CSV exports without touching the network
    Compute {
        /// Responses CSV file
        #[arg(long)]
        responses: PathBuf,

        /// Events CSV file
        #[arg(long)]
        events: PathBuf,

        /// Report file to write [default: ATTENDANCE_PATH]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Category to track; repeat for several [default: ATTENDANCE_CATEGORIES]
        #[arg(short, long = "category", value_name = "LABEL")]
        categories: Vec<String>,
    },
    /// Show one person's progress, refreshing the report if it is stale
    Lookup {
        /// HKN handle to look up
        handle: String,

        /// Reuse the cached report if it is younger than this many days
        #[arg(long, default_value_t = 7)]
        max_age_days: u64,

        /// Report file to read or refresh [default: ATTENDANCE_PATH]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print JSON instead of the message text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env();
    let _log_guard = init_logging(&config.log_dir)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            responses,
            events,
            data_dir,
            no_raw,
            output,
            categories,
        } => {
            let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
            let output = output.unwrap_or_else(|| config.attendance_path.clone());
            let categories = or_configured(categories, &config);

            let opts = RunOptions {
                responses_source: responses.as_deref().unwrap_or(&config.responses_url),
                events_source: events.as_deref().unwrap_or(&config.events_url),
                raw_dir: (!no_raw).then_some(data_dir.as_path()),
                output: &output,
                categories: &categories,
            };

            let client = BasicClient::new()?;
            let report = run(&client, &opts).await?;
            info!(people = report.rows.len(), "Attendance run complete");
        }
        Commands::Compute {
            responses,
            events,
            output,
            categories,
        } => {
            let output = output.unwrap_or_else(|| config.attendance_path.clone());
            let categories = or_configured(categories, &config);

            let responses_csv = read_local(&responses)?;
            let events_csv = read_local(&events)?;

            let report = compute_report(&responses_csv, &events_csv, &categories)?;
            write_report(&output, &report)?;
            info!(people = report.rows.len(), "Attendance computed from local files");
        }
        Commands::Lookup {
            handle,
            max_age_days,
            output,
            json,
        } => {
            let output = output.unwrap_or_else(|| config.attendance_path.clone());
            let opts = RunOptions {
                responses_source: &config.responses_url,
                events_source: &config.events_url,
                raw_dir: Some(config.data_dir.as_path()),
                output: &output,
                categories: &config.categories,
            };
            let max_age = Duration::from_secs(max_age_days.saturating_mul(SECONDS_PER_DAY));

            let client = BasicClient::new()?;
            let progress = lookup(&client, &opts, &handle, max_age).await?;

            if json {
                println!("{}", progress_json(&progress)?);
            } else {
                println!("{}", render_progress(&progress));
            }
        }
    }

    Ok(())
}

/// Colored stderr logging plus a JSON log file per run.
///
/// The returned guard flushes the file writer on drop and must be held until exit.
fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let ts = Local::now().format("%Y-%m-%dT%H-%M-%S");
    let file_appender =
        tracing_appender::rolling::never(log_dir, format!("attendance-tracker-{ts}.log"));
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

fn or_configured(categories: Vec<String>, config: &Config) -> Vec<String> {
    if categories.is_empty() {
        config.categories.clone()
    } else {
        categories
    }
}

fn read_local(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
