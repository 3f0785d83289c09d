//! End-to-end batch: fetch → normalize → count → write.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::attendance::normalize::{normalize_events, normalize_responses};
use crate::attendance::{AttendanceReport, aggregate_all};
use crate::fetch::{HttpClient, load_source};
use crate::output::{is_fresh, read_report, save_raw, write_report};
use crate::parser::{parse_events, parse_responses};
use crate::summary::{PersonProgress, find_person};

/// File names of the raw downloads inside `RunOptions::raw_dir`.
pub const RAW_RESPONSES_FILE: &str = "responses.csv";
pub const RAW_EVENTS_FILE: &str = "events.csv";

/// Inputs of one batch run.
#[derive(Debug, Clone)]
pub struct RunOptions<'a> {
    /// URL or local path of the responses export.
    pub responses_source: &'a str,
    /// URL or local path of the events export.
    pub events_source: &'a str,
    /// Where to keep raw copies of the downloads. `None` skips saving.
    pub raw_dir: Option<&'a Path>,
    pub output: &'a Path,
    pub categories: &'a [String],
}

/// Parses both exports, normalizes identifiers and aggregates every category.
pub fn compute_report(
    responses_csv: &[u8],
    events_csv: &[u8],
    categories: &[String],
) -> Result<AttendanceReport> {
    info!("Reading data into tables");
    let mut responses = parse_responses(responses_csv).context("failed to parse responses")?;
    let mut events = parse_events(events_csv).context("failed to parse events")?;

    normalize_responses(&mut responses);
    normalize_events(&mut events);

    info!(
        responses = responses.len(),
        events = events.len(),
        categories = categories.len(),
        "Calculating attendance"
    );
    Ok(aggregate_all(&responses, &events, categories)?)
}

/// Runs the whole batch and writes the report. Nothing is written to
/// `opts.output` unless every step before it succeeded.
#[tracing::instrument(skip_all, fields(output = %opts.output.display()))]
pub async fn run<C: HttpClient>(client: &C, opts: &RunOptions<'_>) -> Result<AttendanceReport> {
    info!("Fetching latest HKN attendance data");
    let responses_csv = load_source(client, opts.responses_source).await?;
    let events_csv = load_source(client, opts.events_source).await?;

    if let Some(dir) = opts.raw_dir {
        save_raw(&dir.join(RAW_RESPONSES_FILE), &responses_csv)?;
        save_raw(&dir.join(RAW_EVENTS_FILE), &events_csv)?;
    }

    let report = compute_report(&responses_csv, &events_csv, opts.categories)?;

    info!(path = %opts.output.display(), "Saving attendance file");
    write_report(opts.output, &report)?;
    Ok(report)
}

/// Returns one person's progress, re-running the batch first when the report
/// at `opts.output` is missing or older than `max_age`.
#[tracing::instrument(skip(client, opts), fields(max_age_secs = max_age.as_secs()))]
pub async fn lookup<C: HttpClient>(
    client: &C,
    opts: &RunOptions<'_>,
    handle: &str,
    max_age: Duration,
) -> Result<PersonProgress> {
    let report = if is_fresh(opts.output, max_age) {
        info!(path = %opts.output.display(), "Using cached attendance report");
        read_report(opts.output)
            .with_context(|| format!("failed to read {}", opts.output.display()))?
    } else {
        info!("Attendance report missing or stale, refreshing");
        run(client, opts).await?
    };

    Ok(find_person(&report, handle)?)
}
