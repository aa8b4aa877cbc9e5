//! Remote sample acquisition.
//!
//! The analyzers only ever see a parsed [`SampleTable`](crate::sample::SampleTable);
//! this module moves the raw CSV bytes from a producer endpoint to the parser.

mod auth;
mod basic;
mod client;

pub use auth::BearerToken;
pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::{SampleError, SampleResult};
use tracing::debug;

/// GETs `url` and returns the body, mapping transport failures and
/// non-success statuses to [`SampleError::Upstream`].
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> SampleResult<Vec<u8>> {
    let upstream = |reason: String| SampleError::Upstream {
        url: url.to_string(),
        reason,
    };

    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| upstream(format!("invalid url: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| upstream(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(upstream(format!("status {status}")));
    }

    let body = resp.bytes().await.map_err(|e| upstream(e.to_string()))?;
    debug!(url, bytes = body.len(), "Fetched sample payload");
    Ok(body.to_vec())
}
