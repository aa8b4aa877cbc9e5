use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue, InvalidHeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>` with
/// every request, for sample producers behind an API gateway.
pub struct BearerToken<C> {
    inner: C,
    value: HeaderValue,
}

impl<C> BearerToken<C> {
    pub fn new(inner: C, token: &str) -> Result<Self, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BearerToken<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}
