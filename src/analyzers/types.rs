//! Data types produced by the analyzers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Spread of a route's trend scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Volatility {
    /// Sample standard deviation, rounded to 2 decimals.
    Measured(f64),
    /// Fewer than two scored samples.
    Insufficient,
}

impl Volatility {
    pub fn measured(&self) -> Option<f64> {
        match self {
            Volatility::Measured(v) => Some(*v),
            Volatility::Insufficient => None,
        }
    }
}

/// Ranking row for a single route.
///
/// A route whose samples all lack a score has `data_points == 0` and no
/// average, peak, or demand score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub route: String,
    pub avg_trend: Option<f64>,
    pub peak_trend: Option<f64>,
    pub volatility: Volatility,
    pub data_points: usize,
    pub demand_score: Option<f64>,
}

/// Flat view of [`RouteSummary`] for CSV output.
#[derive(Debug, Serialize)]
pub struct RouteSummaryRow<'a> {
    pub route: &'a str,
    pub avg_trend: Option<f64>,
    pub peak_trend: Option<f64>,
    pub volatility: Option<f64>,
    pub data_points: usize,
    pub demand_score: Option<f64>,
}

impl<'a> From<&'a RouteSummary> for RouteSummaryRow<'a> {
    fn from(s: &'a RouteSummary) -> Self {
        Self {
            route: &s.route,
            avg_trend: s.avg_trend,
            peak_trend: s.peak_trend,
            volatility: s.volatility.measured(),
            data_points: s.data_points,
            demand_score: s.demand_score,
        }
    }
}

/// Per-date aggregate across all routes.
///
/// A date present only through missing scores has `active_routes == 0` and
/// no average or peak.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub avg_trend: Option<f64>,
    pub peak_trend: Option<f64>,
    pub active_routes: usize,
    pub trend_7d_ma: Option<f64>,
}

/// Mean trend score split by weekday and weekend.
///
/// Keyed `true` / `false` on the wire for "is weekday".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSplit {
    #[serde(rename = "true", skip_serializing_if = "Option::is_none")]
    pub weekday: Option<f64>,
    #[serde(rename = "false", skip_serializing_if = "Option::is_none")]
    pub weekend: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalPattern {
    pub peak_day: String,
    pub peak_month: String,
    pub weekend_vs_weekday: WeekSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    pub route: String,
    pub trend_score: f64,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,

    /// Position of the flagged row in the input table.
    #[serde(skip)]
    pub row: usize,
}

/// Everything the analyzers produce for one sample table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub total_samples: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub routes: Vec<RouteSummary>,
    pub trend: Vec<TrendPoint>,
    pub seasonal_patterns: Option<SeasonalPattern>,
    pub anomalies: Vec<Anomaly>,
}

impl AnalysisReport {
    /// `true` when the input held no samples at all.
    pub fn is_empty(&self) -> bool {
        self.total_samples == 0
    }
}
