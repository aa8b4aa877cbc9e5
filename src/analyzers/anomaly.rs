//! Rolling-baseline anomaly detection.
//!
//! Each score is compared against the mean and sample standard deviation of
//! the trailing window ending at (and including) that row. A score further
//! than `anomaly_sigma` deviations from the window mean is flagged.

use crate::analyzers::types::{Anomaly, AnomalyKind};
use crate::analyzers::utility::window_stats;
use crate::config::{AnalysisConfig, AnomalyBaseline};
use crate::sample::SampleTable;
use std::collections::BTreeMap;
use tracing::debug;

/// Flags spikes and drops in `table`, returned in table row order.
///
/// Tables shorter than `anomaly_min_rows` yield nothing. With
/// [`AnomalyBaseline::PerRoute`] every route is windowed on its own
/// date-ordered series; with [`AnomalyBaseline::TableOrder`] a single window
/// slides over the rows exactly as supplied, so interleaved routes share a
/// baseline.
pub fn detect_anomalies(table: &SampleTable, config: &AnalysisConfig) -> Vec<Anomaly> {
    if table.len() < config.anomaly_min_rows {
        debug!(
            rows = table.len(),
            min_rows = config.anomaly_min_rows,
            "Too few rows for anomaly detection"
        );
        return Vec::new();
    }

    let mut anomalies = match config.anomaly_baseline {
        AnomalyBaseline::TableOrder => {
            let order: Vec<usize> = (0..table.len()).collect();
            scan_series(table, &order, config)
        }
        AnomalyBaseline::PerRoute => partition_by_route(table)
            .values()
            .flat_map(|order| scan_series(table, order, config))
            .collect(),
    };

    anomalies.sort_by_key(|a| a.row);
    debug!(anomalies = anomalies.len(), baseline = ?config.anomaly_baseline, "Anomaly scan complete");
    anomalies
}

/// Row indices per route, each stably sorted by date.
fn partition_by_route(table: &SampleTable) -> BTreeMap<&str, Vec<usize>> {
    let rows = table.rows();
    let mut partitions: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, sample) in rows.iter().enumerate() {
        partitions.entry(sample.route.as_str()).or_default().push(i);
    }
    for order in partitions.values_mut() {
        order.sort_by_key(|&i| rows[i].date);
    }
    partitions
}

/// Walks one series, given as row indices into `table`.
fn scan_series(table: &SampleTable, order: &[usize], config: &AnalysisConfig) -> Vec<Anomaly> {
    let rows = table.rows();
    let size = config.anomaly_window;
    let scores: Vec<Option<f64>> = order.iter().map(|&i| rows[i].trend_score).collect();

    let mut found = Vec::new();
    for (pos, &row) in order.iter().enumerate() {
        if pos + 1 < size {
            continue;
        }
        let Some(score) = scores[pos] else {
            continue;
        };
        let Some((mean, sd)) = window_stats(&scores[pos + 1 - size..=pos], size) else {
            continue;
        };

        if (score - mean).abs() > config.anomaly_sigma * sd {
            let sample = &rows[row];
            found.push(Anomaly {
                date: sample.date,
                route: sample.route.clone(),
                trend_score: score,
                kind: if score > mean {
                    AnomalyKind::Spike
                } else {
                    AnomalyKind::Drop
                },
                row,
            });
        }
    }
    found
}
