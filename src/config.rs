//! Tunables for the analyzers.
//!
//! Stored as a JSON object on disk; every field is optional and falls back
//! to the defaults below:
//! ```json
//! {
//!   "demand_weights": { "avg": 0.7, "peak": 0.2, "stability": 0.1 },
//!   "anomaly_sigma": 2.0,
//!   "sparse_volatility": "as_stable",
//!   "anomaly_baseline": "table_order"
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SampleResult;

/// Blend of the three signals making up a route's demand score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandWeights {
    pub avg: f64,
    pub peak: f64,
    pub stability: f64,
}

impl Default for DemandWeights {
    fn default() -> Self {
        Self {
            avg: 0.7,
            peak: 0.2,
            stability: 0.1,
        }
    }
}

/// How a route with too few samples for a standard deviation is scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SparseVolatility {
    /// Score as volatility 0. Matches historical rankings.
    #[default]
    AsStable,
    /// Score as maximally volatile, so the stability term contributes nothing.
    AsUnstable,
}

/// Which rows share a rolling baseline during anomaly detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyBaseline {
    /// One window slides over the whole table in row order.
    #[default]
    TableOrder,
    /// Each route is its own date-ordered series.
    PerRoute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub demand_weights: DemandWeights,
    /// Volatility at or above which the stability term reaches zero.
    pub stability_ceiling: f64,
    pub moving_average_window: usize,
    pub anomaly_window: usize,
    /// Tables shorter than this never produce anomalies.
    pub anomaly_min_rows: usize,
    pub anomaly_sigma: f64,
    pub sparse_volatility: SparseVolatility,
    pub anomaly_baseline: AnomalyBaseline,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            demand_weights: DemandWeights::default(),
            stability_ceiling: 100.0,
            moving_average_window: 7,
            anomaly_window: 7,
            anomaly_min_rows: 14,
            anomaly_sigma: 2.0,
            sparse_volatility: SparseVolatility::default(),
            anomaly_baseline: AnomalyBaseline::default(),
        }
    }
}

impl AnalysisConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> SampleResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        debug!(path, ?config, "Loaded analysis config");
        Ok(config)
    }

    /// Loads from `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&str>) -> SampleResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_defaults_match_reference_formula() {
        let config = AnalysisConfig::default();
        assert_eq!(config.demand_weights.avg, 0.7);
        assert_eq!(config.demand_weights.peak, 0.2);
        assert_eq!(config.demand_weights.stability, 0.1);
        assert_eq!(config.anomaly_min_rows, 14);
        assert_eq!(config.anomaly_window, 7);
        assert_eq!(config.moving_average_window, 7);
        assert_eq!(config.anomaly_baseline, AnomalyBaseline::TableOrder);
        assert_eq!(config.sparse_volatility, SparseVolatility::AsStable);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"anomaly_sigma": 3.0, "anomaly_baseline": "per_route"}"#)
                .unwrap();
        assert_eq!(config.anomaly_sigma, 3.0);
        assert_eq!(config.anomaly_baseline, AnomalyBaseline::PerRoute);
        assert_eq!(config.sparse_volatility, SparseVolatility::AsStable);
        assert_eq!(config.stability_ceiling, 100.0);
    }

    #[test]
    fn test_nested_weights_partial() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"demand_weights": {"peak": 0.5}}"#).unwrap();
        assert_eq!(config.demand_weights.peak, 0.5);
        assert_eq!(config.demand_weights.avg, 0.7);
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_path("route_demand_test_config.json");
        fs::write(&path, r#"{"sparse_volatility": "as_unstable"}"#).unwrap();

        let config = AnalysisConfig::load(&path).unwrap();
        assert_eq!(config.sparse_volatility, SparseVolatility::AsUnstable);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(
            AnalysisConfig::load_or_default(None).unwrap(),
            AnalysisConfig::default()
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = AnalysisConfig::load("/nonexistent/route_demand.json");
        assert!(matches!(result, Err(crate::error::SampleError::Io(_))));
    }
}
