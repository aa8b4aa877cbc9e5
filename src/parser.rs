//! CSV parser for sample tables.
//!
//! Expected headers: `date`, `trend_score`, `origin`, `destination`, and an
//! optional `route`. Column order does not matter.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{SampleError, SampleResult};
use crate::sample::{Sample, SampleTable, route_key};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    trend_score: Option<String>,
    origin: String,
    destination: String,
    #[serde(default)]
    route: Option<String>,
}

/// Decodes CSV bytes into a [`SampleTable`], preserving row order.
///
/// # Errors
///
/// Returns [`SampleError::Malformed`] for an unparseable date or a negative
/// or non-numeric score, and [`SampleError::Csv`] for structural CSV errors.
pub fn parse_samples(bytes: &[u8]) -> SampleResult<SampleTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let raw = result?;
        // quoted fields may span lines, so ask the reader where the record began
        let line = raw.position().map_or(0, |pos| pos.line());
        let record: CsvRow = raw.deserialize(Some(&headers))?;

        if record.origin == record.destination {
            warn!(line, origin = %record.origin, "Skipping same-city route");
            skipped += 1;
            continue;
        }

        let date = parse_date(&record.date).ok_or_else(|| SampleError::Malformed {
            line,
            reason: format!("invalid date '{}'", record.date),
        })?;

        let trend_score = match record.trend_score.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_score(raw).ok_or_else(|| SampleError::Malformed {
                line,
                reason: format!("invalid trend_score '{raw}'"),
            })?),
        };

        let route = match record.route {
            Some(route) if !route.is_empty() => route,
            _ => route_key(&record.origin, &record.destination),
        };

        rows.push(Sample {
            date,
            origin: record.origin,
            destination: record.destination,
            route,
            trend_score,
        });
    }

    debug!(rows = rows.len(), skipped, "Parsed sample table");
    Ok(SampleTable::new(rows))
}

/// Accepts a bare date or a timestamp whose date part comes first.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_score(raw: &str) -> Option<f64> {
    let value: f64 = raw.parse().ok()?;
    // NaN fails the comparison
    (value >= 0.0 && value.is_finite()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input_returns_empty_table() {
        let table = parse_samples(b"date,trend_score,origin,destination,route\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_derives_missing_route() {
        let csv = "date,trend_score,origin,destination\n2024-01-01,55,Sydney,Perth\n";
        let table = parse_samples(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].route, "Sydney→Perth");
        assert_eq!(table.rows()[0].trend_score, Some(55.0));
    }

    #[test]
    fn test_parse_blank_score_is_missing() {
        let csv = "date,trend_score,origin,destination,route\n\
                   2024-01-01,,Sydney,Perth,Sydney→Perth\n";
        let table = parse_samples(csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].trend_score, None);
    }

    #[test]
    fn test_parse_accepts_timestamp_dates() {
        let csv = "date,trend_score,origin,destination\n2024-02-03 00:00:00,10,Perth,Adelaide\n";
        let table = parse_samples(csv.as_bytes()).unwrap();
        assert_eq!(
            table.rows()[0].date,
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()
        );
    }

    #[test]
    fn test_parse_skips_same_city_pairs() {
        let csv = "date,trend_score,origin,destination\n\
                   2024-01-01,10,Perth,Perth\n\
                   2024-01-01,20,Perth,Sydney\n";
        let table = parse_samples(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].destination, "Sydney");
    }

    #[test]
    fn test_parse_invalid_date_reports_line() {
        let csv = "date,trend_score,origin,destination\n\
                   2024-01-01,10,Perth,Sydney\n\
                   not-a-date,20,Perth,Sydney\n";
        let err = parse_samples(csv.as_bytes()).unwrap_err();
        match err {
            SampleError::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_line_follows_multiline_field() {
        let csv = "date,trend_score,origin,destination\n\
                   2024-01-01,10,\"Perth\nWest\",Sydney\n\
                   not-a-date,20,Perth,Sydney\n";
        match parse_samples(csv.as_bytes()).unwrap_err() {
            SampleError::Malformed { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_line_counts_skipped_rows() {
        let csv = "date,trend_score,origin,destination\n\
                   2024-01-01,10,Perth,Perth\n\
                   2024-01-02,-1,Perth,Sydney\n";
        match parse_samples(csv.as_bytes()).unwrap_err() {
            SampleError::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_negative_score_is_malformed() {
        let csv = "date,trend_score,origin,destination\n2024-01-01,-4,Perth,Sydney\n";
        assert!(matches!(
            parse_samples(csv.as_bytes()),
            Err(SampleError::Malformed { .. })
        ));
    }
}
