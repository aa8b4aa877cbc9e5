//! The raw sample table consumed by every analyzer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Separator between origin and destination in a route key.
pub const ROUTE_SEPARATOR: char = '→';

/// Builds the route key for an origin-destination pair.
pub fn route_key(origin: &str, destination: &str) -> String {
    format!("{origin}{ROUTE_SEPARATOR}{destination}")
}

/// One search-interest observation for a route on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub route: String,

    /// `None` when the producer had no value for this date.
    pub trend_score: Option<f64>,
}

impl Sample {
    pub fn new(date: NaiveDate, origin: &str, destination: &str, trend_score: Option<f64>) -> Self {
        Sample {
            date,
            origin: origin.to_string(),
            destination: destination.to_string(),
            route: route_key(origin, destination),
            trend_score,
        }
    }
}

/// Ordered collection of samples. Row order is the order the producer
/// supplied and is significant for table-order anomaly detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    rows: Vec<Sample>,
}

impl SampleTable {
    pub fn new(rows: Vec<Sample>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Sample] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest date present, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|s| s.date).min()?;
        let last = self.rows.iter().map(|s| s.date).max()?;
        Some((first, last))
    }

    /// Distinct route keys in first-seen order.
    pub fn routes(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for sample in &self.rows {
            if !seen.contains(&sample.route.as_str()) {
                seen.push(&sample.route);
            }
        }
        seen
    }

    /// Copy of the table restricted to a single route, row order preserved.
    pub fn filter_route(&self, route: &str) -> SampleTable {
        SampleTable {
            rows: self
                .rows
                .iter()
                .filter(|s| s.route == route)
                .cloned()
                .collect(),
        }
    }
}

impl From<Vec<Sample>> for SampleTable {
    fn from(rows: Vec<Sample>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Sample> for SampleTable {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
