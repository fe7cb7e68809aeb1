//! Blocking HTTP price provider.
//!
//! POSTs `code` and `year` as form fields to the configured endpoint and
//! returns the response body as raw text. One attempt per call; the client
//! carries a request timeout and a browser user-agent (the upstream service
//! rejects the default one).

use super::provider::{FetchError, PriceProvider};
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0 Safari/537.36";

pub struct HttpPriceProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpPriceProvider {
    /// Build a provider for `endpoint` with the given request timeout.
    ///
    /// Client construction only fails on TLS backend misconfiguration, which
    /// is unrecoverable at startup.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl PriceProvider for HttpPriceProvider {
    fn fetch_year(&self, code: &str, year: u16) -> Result<String, FetchError> {
        let year_field = year.to_string();
        let params = [("code", code), ("year", year_field.as_str())];

        let resp = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .map_err(|e| FetchError::Request {
                code: code.to_string(),
                year,
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: code.to_string(),
                year,
                status: status.as_u16(),
            });
        }

        resp.text().map_err(|e| FetchError::Request {
            code: code.to_string(),
            year,
            reason: e.to_string(),
        })
    }
}
