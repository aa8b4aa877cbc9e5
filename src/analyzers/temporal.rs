use crate::analyzers::types::TrendPoint;
use crate::analyzers::utility::{max, mean, rolling_mean};
use crate::config::AnalysisConfig;
use crate::sample::SampleTable;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Aggregates samples per date, in chronological order, with a trailing
/// moving average of the per-date mean.
///
/// The window counts points, not calendar days: a gap in the dates neither
/// advances the window nor gets filled. A date whose scores are all missing
/// still occupies a point, with no mean, and leaves every window covering it
/// undefined.
pub fn trend_over_time(table: &SampleTable, config: &AnalysisConfig) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for sample in table.rows() {
        let scores = by_date.entry(sample.date).or_default();
        if let Some(score) = sample.trend_score {
            scores.push(score);
        }
    }

    let averages: Vec<Option<f64>> = by_date
        .values()
        .map(|scores| (!scores.is_empty()).then(|| mean(scores)))
        .collect();
    let smoothed = rolling_mean(&averages, config.moving_average_window);

    by_date
        .into_iter()
        .zip(averages)
        .zip(smoothed)
        .map(|(((date, scores), avg_trend), trend_7d_ma)| TrendPoint {
            date,
            avg_trend,
            peak_trend: max(&scores),
            active_routes: scores.len(),
            trend_7d_ma,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use chrono::Duration;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() + Duration::days(offset)
    }

    #[test]
    fn test_empty_table() {
        assert!(trend_over_time(&SampleTable::default(), &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_three_dates_have_no_moving_average() {
        let table = SampleTable::new(vec![
            Sample::new(day(2), "Sydney", "Perth", Some(30.0)),
            Sample::new(day(0), "Sydney", "Perth", Some(10.0)),
            Sample::new(day(1), "Sydney", "Perth", Some(20.0)),
            Sample::new(day(0), "Perth", "Sydney", Some(50.0)),
        ]);
        let trend = trend_over_time(&table, &AnalysisConfig::default());

        assert_eq!(trend.len(), 3);
        assert!(trend.iter().all(|p| p.trend_7d_ma.is_none()));
        assert_eq!(trend[0].date, day(0));
        assert_eq!(trend[0].avg_trend, Some(30.0));
        assert_eq!(trend[0].peak_trend, Some(50.0));
        assert_eq!(trend[0].active_routes, 2);
    }

    #[test]
    fn test_moving_average_defined_from_seventh_point() {
        let rows: Vec<Sample> = (0..10)
            .map(|i| Sample::new(day(i), "Sydney", "Perth", Some(i as f64)))
            .collect();
        let trend = trend_over_time(&SampleTable::new(rows), &AnalysisConfig::default());

        for point in &trend[..6] {
            assert_eq!(point.trend_7d_ma, None);
        }
        // mean of 0..=6, then 1..=7, ...
        assert_eq!(trend[6].trend_7d_ma, Some(3.0));
        assert_eq!(trend[7].trend_7d_ma, Some(4.0));
        assert_eq!(trend[9].trend_7d_ma, Some(6.0));
    }

    #[test]
    fn test_gaps_do_not_advance_window() {
        // seven points spread over three weeks
        let rows: Vec<Sample> = (0..7)
            .map(|i| Sample::new(day(i * 3), "Sydney", "Perth", Some(7.0)))
            .collect();
        let trend = trend_over_time(&SampleTable::new(rows), &AnalysisConfig::default());

        assert_eq!(trend.len(), 7);
        assert_eq!(trend[6].trend_7d_ma, Some(7.0));
    }

    #[test]
    fn test_unscored_date_is_zero_count_point() {
        let table = SampleTable::new(vec![
            Sample::new(day(0), "Sydney", "Perth", Some(10.0)),
            Sample::new(day(0), "Perth", "Sydney", None),
            Sample::new(day(1), "Perth", "Sydney", None),
        ]);
        let trend = trend_over_time(&table, &AnalysisConfig::default());

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].active_routes, 1);
        assert_eq!(trend[0].avg_trend, Some(10.0));
        assert_eq!(trend[1].date, day(1));
        assert_eq!(trend[1].active_routes, 0);
        assert_eq!(trend[1].avg_trend, None);
        assert_eq!(trend[1].peak_trend, None);
    }

    #[test]
    fn test_unscored_date_leaves_covering_windows_undefined() {
        let rows: Vec<Sample> = (0..14)
            .map(|i| {
                let score = if i == 3 { None } else { Some(10.0) };
                Sample::new(day(i), "Sydney", "Perth", score)
            })
            .collect();
        let trend = trend_over_time(&SampleTable::new(rows), &AnalysisConfig::default());

        assert_eq!(trend.len(), 14);
        // windows ending on days 6..=9 all cover day 3
        for point in &trend[..10] {
            assert_eq!(point.trend_7d_ma, None);
        }
        assert_eq!(trend[10].trend_7d_ma, Some(10.0));
        assert_eq!(trend[13].trend_7d_ma, Some(10.0));
    }
}
