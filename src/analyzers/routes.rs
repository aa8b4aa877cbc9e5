use crate::analyzers::types::{RouteSummary, Volatility};
use crate::analyzers::utility::{max, mean, round2, sample_stddev};
use crate::config::{AnalysisConfig, SparseVolatility};
use crate::sample::SampleTable;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Ranks every route in `table` by demand score, highest first.
///
/// Statistics are rounded to 2 decimals before the score is computed.
/// Routes tie-break on route key. A route whose samples all lack a score is
/// still listed, with zero data points and no score, after every scored route.
pub fn rank_routes(table: &SampleTable, config: &AnalysisConfig) -> Vec<RouteSummary> {
    if table.is_empty() {
        return Vec::new();
    }

    let mut series: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for sample in table.rows() {
        let entry = series.entry(sample.route.as_str()).or_default();
        if let Some(score) = sample.trend_score {
            entry.push(score);
        }
    }

    let mut summaries: Vec<RouteSummary> = series
        .into_iter()
        .map(|(route, scores)| {
            let volatility = match sample_stddev(&scores, mean(&scores)) {
                Some(sd) => Volatility::Measured(round2(sd)),
                None => Volatility::Insufficient,
            };
            let avg_trend = (!scores.is_empty()).then(|| round2(mean(&scores)));
            let peak_trend = max(&scores).map(round2);
            let demand_score = avg_trend
                .zip(peak_trend)
                .map(|(avg, peak)| demand_score(avg, peak, volatility, config));

            RouteSummary {
                route: route.to_string(),
                avg_trend,
                peak_trend,
                volatility,
                data_points: scores.len(),
                demand_score,
            }
        })
        .collect();

    // sort_by is stable, so equal scores keep route-key order
    summaries.sort_by(|a, b| match (a.demand_score, b.demand_score) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    debug!(routes = summaries.len(), "Ranked routes");
    summaries
}

/// Weighted blend of central tendency, peak, and stability.
pub fn demand_score(
    avg_trend: f64,
    peak_trend: f64,
    volatility: Volatility,
    config: &AnalysisConfig,
) -> f64 {
    let weights = &config.demand_weights;
    let volatility = match (volatility, config.sparse_volatility) {
        (Volatility::Measured(v), _) => v,
        (Volatility::Insufficient, SparseVolatility::AsStable) => 0.0,
        (Volatility::Insufficient, SparseVolatility::AsUnstable) => config.stability_ceiling,
    };

    avg_trend * weights.avg
        + peak_trend * weights.peak
        + (config.stability_ceiling - volatility) * weights.stability
}
