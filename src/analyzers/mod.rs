//! Route demand analytics.
//!
//! Four independent analyzers read the same sample table: route ranking,
//! the per-date trend series, seasonal patterns, and rolling-baseline
//! anomaly detection. [`analyzer`] runs them together.

pub mod analyzer;
pub mod anomaly;
pub mod routes;
pub mod seasonality;
pub mod temporal;
pub mod types;
pub mod utility;

pub use analyzer::{analyze, analyze_parallel};
pub use types::{AnalysisReport, Anomaly, AnomalyKind, RouteSummary, SeasonalPattern, TrendPoint};
