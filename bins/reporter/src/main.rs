//! Tally report builder
//!
//! Loads a JSON ledger, builds a report grouped by type, category or spending
//! plan, and prints it as JSON on stdout. Logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::ledger::{SpendingPlan, Transaction};
use tally_core::{ReportKind, ReportOptions, ReportService};
use tally_shared::config::LogConfig;
use tally_shared::types::SortOrder;
use tally_shared::{AppConfig, AppError};

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Build income, category and spending plan reports from a JSON ledger"
)]
struct Cli {
    /// Report kind: by-type, by-category or by-plan
    kind: String,

    /// JSON file holding an array of transactions
    #[arg(short, long, env = "TALLY_TRANSACTIONS")]
    transactions: PathBuf,

    /// JSON file holding an array of spending plans (required for by-plan)
    #[arg(short, long)]
    plans: Option<PathBuf>,

    /// Year and month ordering (asc or desc), overrides configuration
    #[arg(short, long)]
    order: Option<SortOrder>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load().map_err(AppError::from)?;
    init_tracing(&config.log);

    let kind = ReportKind::from_str(&cli.kind).map_err(AppError::from)?;

    let transactions: Vec<Transaction> = read_json(&cli.transactions)?;
    let plans = cli
        .plans
        .as_deref()
        .map(read_json::<Vec<SpendingPlan>>)
        .transpose()?;

    let mut options = ReportOptions::from(&config.report);
    if let Some(order) = cli.order {
        options.sort_order = order;
    }

    let report =
        ReportService::build_report_with(&transactions, kind, plans.as_deref(), &options)
            .map_err(AppError::from)?;

    info!(
        kind = %kind,
        transactions = transactions.len(),
        years = report.details.len(),
        "Report ready"
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
