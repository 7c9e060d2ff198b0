//! casetriage-ingest - Case export triage
//!
//! Reads one case export, classifies every case note into a ticket
//! reference and prints the batch as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use casetriage_common::config::{load_config, resolve_config_path, resolve_input_path};
use casetriage_ingest::models::{CaseRecord, IngestWarning, ReferenceGroup, TriageSummary};
use casetriage_ingest::services::{
    cases_for_reference, summarize, DefaultLocationSource, FileSource, Grouping, PathSource,
    ReferenceAggregator, SourceRequest, StatusFilter,
};
use casetriage_ingest::{IngestConfig, IngestedBatch, Pipeline};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for casetriage-ingest
#[derive(Parser, Debug)]
#[command(name = "casetriage-ingest")]
#[command(about = "Classify case notes into SR/Incident references")]
#[command(version)]
struct Args {
    /// Case export to ingest (defaults to $CASETRIAGE_INPUT, then the config file)
    input: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for the casetriage crates (overridden by RUST_LOG)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Records to include in the report
    #[arg(short, long, value_enum, default_value_t = StatusArg::All)]
    status: StatusArg,

    /// Group by reference kind as well as number
    #[arg(long)]
    group_by_kind: bool,

    /// Only list the cases linked to this reference number
    #[arg(short, long)]
    reference: Option<String>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    All,
    NotTriaged,
    Pending,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::NotTriaged => StatusFilter::NotTriaged,
            StatusArg::Pending => StatusFilter::Pending,
        }
    }
}

/// JSON hand-off to a presentation layer
#[derive(Serialize)]
struct TriageReport<'a> {
    encoding: &'a str,
    content_hash: &'a str,
    dropped_rows: usize,
    warnings: &'a [IngestWarning],
    summary: TriageSummary,
    records: Vec<&'a CaseRecord>,
    groups: Vec<ReferenceGroup>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let toml_config = load_config(config_path.as_deref());

    let level = args.log_level.clone().unwrap_or_else(|| {
        toml_config
            .as_ref()
            .map(|c| c.logging.level.clone())
            .unwrap_or_else(|_| "info".to_string())
    });

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if level.contains('=') {
                    level.as_str().into()
                } else {
                    format!("casetriage_ingest={level},casetriage_common={level}").into()
                }
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let toml_config = toml_config.context("Failed to load configuration")?;
    info!(
        config = ?config_path,
        version = env!("CARGO_PKG_VERSION"),
        "Starting casetriage-ingest"
    );

    let ingest_config = IngestConfig::from_toml(&toml_config);

    let (source, request): (Box<dyn FileSource + Send>, SourceRequest) =
        match resolve_input_path(args.input.as_deref(), &toml_config) {
            Some(path) => {
                info!(path = %path.display(), "Input file");
                (Box::new(PathSource::new(path)), SourceRequest::any())
            }
            None => {
                info!(candidates = toml_config.search_paths.len(), "Probing default input locations");
                (
                    Box::new(DefaultLocationSource::new(toml_config.search_paths.clone())),
                    SourceRequest::csv(),
                )
            }
        };

    let pipeline_config = ingest_config.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        Pipeline::new(pipeline_config).ingest_from(source.as_ref(), &request)
    })
    .await
    .context("Ingestion task failed")?;

    let batch = match outcome {
        Ok(batch) if !batch.is_empty() => batch,
        Ok(batch) => {
            warn!(dropped = batch.report.rows_dropped, "No valid rows in input");
            anyhow::bail!("No valid data: please provide valid input");
        }
        Err(e) => {
            error!(code = e.code(), error = %e, "Ingestion failed");
            anyhow::bail!("{e}: please provide valid input");
        }
    };

    let report = build_report(&batch, &ingest_config, &args);
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;

    println!("{json}");
    info!(
        records = report.records.len(),
        groups = report.groups.len(),
        "Report written"
    );
    Ok(())
}

fn build_report<'a>(batch: &'a IngestedBatch, config: &IngestConfig, args: &Args) -> TriageReport<'a> {
    let filter = StatusFilter::from(args.status);
    let selected: Vec<CaseRecord> = filter.apply(&batch.records).into_iter().cloned().collect();

    let grouping = if args.group_by_kind {
        Grouping::KindAndNumber
    } else {
        Grouping::Number
    };
    let groups = ReferenceAggregator::new(config).aggregate_by(&selected, grouping);
    let summary = summarize(&selected);

    let records: Vec<&CaseRecord> = match &args.reference {
        Some(reference) => cases_for_reference(&batch.records, reference)
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect(),
        None => filter.apply(&batch.records),
    };

    TriageReport {
        encoding: batch.encoding,
        content_hash: &batch.content_hash,
        dropped_rows: batch.report.rows_dropped,
        warnings: &batch.report.warnings,
        summary,
        records,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_defaults() {
        let args = Args::parse_from(["casetriage-ingest"]);
        assert!(args.input.is_none());
        assert_eq!(args.status, StatusArg::All);
        assert!(!args.group_by_kind);
    }

    #[test]
    fn test_args_parse_status_and_reference() {
        let args = Args::parse_from([
            "casetriage-ingest",
            "cases.csv",
            "--status",
            "not-triaged",
            "--reference",
            "14321",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("cases.csv")));
        assert_eq!(StatusFilter::from(args.status), StatusFilter::NotTriaged);
        assert_eq!(args.reference.as_deref(), Some("14321"));
    }

    #[test]
    fn test_report_for_pending_filter() {
        let csv = "Case Id,Current User Id,Case Start Date,Sub Category,Last Note\n\
                   C1,u1,01/02/2024,Billing,SR 14321\n\
                   C2,u2,02/02/2024,Network,nothing yet\n\
                   C3,u3,03/02/2024,Billing,sr 14321 again\n";
        let batch = Pipeline::default().ingest(csv.as_bytes()).unwrap();
        let args = Args::parse_from(["casetriage-ingest", "--status", "pending"]);

        let report = build_report(&batch, &IngestConfig::default(), &args);

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.summary.pending, 2);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].case_count, 2);
        assert_eq!(report.groups[0].assignees, "u1, u3");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"][0]["status"], "Pending SR 14321");
        assert_eq!(json["records"][0]["reference_number"], "14321");
    }
}
