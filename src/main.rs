//! CLI entry point for the route demand analyzer.
//!
//! Loads a sample table from a file or URL and runs the route ranking,
//! trend, seasonality, and anomaly analyzers over it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use route_demand::analyzers::anomaly::detect_anomalies;
use route_demand::analyzers::routes::rank_routes;
use route_demand::analyzers::{analyze, analyze_parallel};
use route_demand::config::AnalysisConfig;
use route_demand::error::SampleError;
use route_demand::fetch::{BasicClient, BearerToken, fetch_bytes};
use route_demand::output::{append_rankings, print_json, print_pretty, write_json};
use route_demand::parser::parse_samples;
use route_demand::sample::SampleTable;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "route_demand")]
#[command(about = "Rank travel routes and flag demand anomalies from search-interest samples", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every analyzer and report the results
    Analyze {
        /// Path to a sample CSV or URL to fetch it from
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// JSON file overriding analysis defaults
        #[arg(short, long)]
        config: Option<String>,

        /// Write the full report as JSON to this path
        #[arg(long)]
        json_out: Option<String>,

        /// Append the route ranking to this CSV file
        #[arg(long)]
        rankings_csv: Option<String>,

        /// Run the analyzers concurrently
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Show the highest-demand routes
    Rank {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Number of routes to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        #[arg(short, long)]
        config: Option<String>,
    },
    /// List demand spikes and drops
    Anomalies {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Only analyze this route, e.g. "Sydney→Melbourne"
        #[arg(short, long)]
        route: Option<String>,

        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/route_demand.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("route_demand.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("RUST_LOG")
                .from_env_lossy(),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .with_env_var("RUST_LOG_JSON")
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            config,
            json_out,
            rankings_csv,
            parallel,
        } => {
            let config = AnalysisConfig::load_or_default(config.as_deref())?;
            let Some(table) = load_table(&source).await? else {
                return Ok(());
            };

            let report = if parallel {
                analyze_parallel(Arc::new(table), config).await?
            } else {
                analyze(&table, &config)
            };

            print_pretty(&report);
            match json_out {
                Some(path) => write_json(&path, &report)?,
                None => print_json(&report)?,
            }
            if let Some(path) = rankings_csv {
                append_rankings(&path, &report.routes)?;
            }
        }
        Commands::Rank {
            source,
            limit,
            config,
        } => {
            let config = AnalysisConfig::load_or_default(config.as_deref())?;
            let Some(table) = load_table(&source).await? else {
                return Ok(());
            };

            let ranking = rank_routes(&table, &config);
            info!(total = ranking.len(), "Route ranking");
            for (rank, summary) in ranking.iter().take(limit).enumerate() {
                info!(
                    rank = rank + 1,
                    route = %summary.route,
                    demand_score = ?summary.demand_score,
                    avg_trend = ?summary.avg_trend,
                    peak_trend = ?summary.peak_trend,
                    volatility = ?summary.volatility,
                    data_points = summary.data_points,
                    "Route"
                );
            }
        }
        Commands::Anomalies {
            source,
            route,
            config,
        } => {
            let config = AnalysisConfig::load_or_default(config.as_deref())?;
            let Some(mut table) = load_table(&source).await? else {
                return Ok(());
            };
            if let Some(route) = route.as_deref() {
                table = table.filter_route(route);
                if table.is_empty() {
                    warn!(route, "No samples for route");
                    return Ok(());
                }
            }

            let anomalies = detect_anomalies(&table, &config);
            if anomalies.is_empty() {
                info!(rows = table.len(), "No anomalies detected");
            }
            for anomaly in &anomalies {
                info!(
                    date = %anomaly.date,
                    route = %anomaly.route,
                    trend_score = anomaly.trend_score,
                    kind = ?anomaly.kind,
                    "Anomaly"
                );
            }
        }
    }

    Ok(())
}

/// Loads a sample table from a local file path or fetches it over HTTP.
///
/// Returns `None` after logging when the table holds no samples, so callers
/// can stop without treating "no data" as a failure.
#[tracing::instrument(skip_all, fields(source = %source))]
async fn load_table(source: &str) -> Result<Option<SampleTable>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new()?;
        let fetched = match std::env::var("SAMPLE_SOURCE_TOKEN") {
            Ok(token) => fetch_bytes(&BearerToken::new(client, &token)?, source).await,
            Err(_) => fetch_bytes(&client, source).await,
        };
        match fetched {
            Ok(bytes) => bytes,
            Err(e @ SampleError::Upstream { .. }) => {
                error!(error = %e, "Sample source unavailable");
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        std::fs::read(source)?
    };

    let table = parse_samples(&bytes)?;
    if table.is_empty() {
        info!("No data available");
        return Ok(None);
    }

    info!(
        rows = table.len(),
        routes = table.routes().len(),
        "Sample table loaded"
    );
    Ok(Some(table))
}
