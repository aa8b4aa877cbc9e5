//! Failure kinds at the loading and output boundaries.
//!
//! The analyzers themselves never fail; empty or sparse input degrades to
//! empty results. Everything that can go wrong happens before a
//! [`SampleTable`](crate::sample::SampleTable) exists or after a report does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    /// The remote producer could not be reached or answered with an error.
    #[error("upstream fetch failed for {url}: {reason}")]
    Upstream { url: String, reason: String },

    /// A row was readable but its values are not a valid sample.
    #[error("malformed sample on line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SampleResult<T> = Result<T, SampleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_includes_line() {
        let err = SampleError::Malformed {
            line: 7,
            reason: "bad date".into(),
        };
        assert_eq!(err.to_string(), "malformed sample on line 7: bad date");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SampleError = io.into();
        assert!(matches!(err, SampleError::Io(_)));
    }
}
