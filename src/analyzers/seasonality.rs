use crate::analyzers::types::{SeasonalPattern, WeekSplit};
use crate::analyzers::utility::mean;
use crate::sample::SampleTable;
use chrono::{Datelike, Month, Weekday};
use std::collections::BTreeMap;

/// Finds the day of week and month with the highest mean trend score, and
/// contrasts weekday against weekend demand.
///
/// Returns `None` when there is no scored sample to derive a pattern from.
/// Labels are compared in name order and the first maximum wins a tie.
pub fn seasonal_patterns(table: &SampleTable) -> Option<SeasonalPattern> {
    let mut by_day: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
    let mut by_month: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
    let mut weekday = Vec::new();
    let mut weekend = Vec::new();

    for sample in table.rows() {
        let Some(score) = sample.trend_score else {
            continue;
        };
        let dow = sample.date.weekday();

        by_day.entry(day_name(dow)).or_default().push(score);
        by_month.entry(month_name(sample.date.month())).or_default().push(score);

        if dow.num_days_from_monday() < 5 {
            weekday.push(score);
        } else {
            weekend.push(score);
        }
    }

    Some(SeasonalPattern {
        peak_day: peak_label(&by_day)?.to_string(),
        peak_month: peak_label(&by_month)?.to_string(),
        weekend_vs_weekday: WeekSplit {
            weekday: (!weekday.is_empty()).then(|| mean(&weekday)),
            weekend: (!weekend.is_empty()).then(|| mean(&weekend)),
        },
    })
}

fn peak_label(groups: &BTreeMap<&'static str, Vec<f64>>) -> Option<&'static str> {
    let mut best: Option<(&'static str, f64)> = None;
    for (&label, scores) in groups {
        let avg = mean(scores);
        match best {
            Some((_, top)) if avg <= top => {}
            _ => best = Some((label, avg)),
        }
    }
    best.map(|(label, _)| label)
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn month_name(month: u32) -> &'static str {
    Month::try_from(month as u8)
        .map(|m| m.name())
        .unwrap_or("Unknown")
}
