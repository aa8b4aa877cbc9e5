use crate::analyzers::anomaly::detect_anomalies;
use crate::analyzers::routes::rank_routes;
use crate::analyzers::seasonality::seasonal_patterns;
use crate::analyzers::temporal::trend_over_time;
use crate::analyzers::types::AnalysisReport;
use crate::config::AnalysisConfig;
use crate::sample::SampleTable;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Runs all four analyzers one after another.
pub fn analyze(table: &SampleTable, config: &AnalysisConfig) -> AnalysisReport {
    let report = AnalysisReport {
        generated_at: Utc::now(),
        total_samples: table.len(),
        date_range: table.date_range(),
        routes: rank_routes(table, config),
        trend: trend_over_time(table, config),
        seasonal_patterns: seasonal_patterns(table),
        anomalies: detect_anomalies(table, config),
    };
    log_summary(&report);
    report
}

/// Runs the four analyzers concurrently on blocking tasks.
///
/// The analyzers share nothing but the read-only table, so the result is the
/// same as [`analyze`] apart from `generated_at`.
pub async fn analyze_parallel(
    table: Arc<SampleTable>,
    config: AnalysisConfig,
) -> Result<AnalysisReport> {
    let config = Arc::new(config);

    let routes = {
        let (table, config) = (table.clone(), config.clone());
        tokio::task::spawn_blocking(move || rank_routes(&table, &config))
    };
    let trend = {
        let (table, config) = (table.clone(), config.clone());
        tokio::task::spawn_blocking(move || trend_over_time(&table, &config))
    };
    let seasonal = {
        let table = table.clone();
        tokio::task::spawn_blocking(move || seasonal_patterns(&table))
    };
    let anomalies = {
        let (table, config) = (table.clone(), config.clone());
        tokio::task::spawn_blocking(move || detect_anomalies(&table, &config))
    };

    let (routes, trend, seasonal_patterns, anomalies) =
        tokio::try_join!(routes, trend, seasonal, anomalies)?;

    let report = AnalysisReport {
        generated_at: Utc::now(),
        total_samples: table.len(),
        date_range: table.date_range(),
        routes,
        trend,
        seasonal_patterns,
        anomalies,
    };
    log_summary(&report);
    Ok(report)
}

fn log_summary(report: &AnalysisReport) {
    info!(
        samples = report.total_samples,
        routes = report.routes.len(),
        trend_points = report.trend.len(),
        seasonal = report.seasonal_patterns.is_some(),
        anomalies = report.anomalies.len(),
        "Analysis complete"
    );
}
