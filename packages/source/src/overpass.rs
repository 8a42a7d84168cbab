//! Shared Overpass API interpreter client.
//!
//! Both Overpass-backed sources (population places, buildings/amenities)
//! POST their query text to the same interpreter endpoint and get JSON
//! back. The interpreter is a shared third-party service and can hang
//! under load, so every request carries an explicit client-side timeout in
//! addition to the server-side `[timeout:..]` directive each query
//! declares.

use std::time::Duration;

use crate::SourceError;

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Client-side ceiling on any single interpreter request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A reusable Overpass interpreter client.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
}

impl OverpassClient {
    /// Creates a client against the public interpreter, honoring the
    /// `OVERPASS_URL` environment variable when set.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed (TLS
    /// backend initialization failure).
    #[must_use]
    pub fn new() -> Self {
        let base_url =
            std::env::var("OVERPASS_URL").unwrap_or_else(|_| DEFAULT_OVERPASS_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Creates a client against a specific interpreter URL.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build Overpass HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// POSTs a query to the interpreter and parses the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails, times out, the server
    /// answers with a non-success status, or the body is not valid JSON.
    pub async fn query(&self, query: &str) -> Result<serde_json::Value, SourceError> {
        log::debug!("Overpass query against {}", self.base_url);

        let response = self
            .client
            .post(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(query.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::parse(format!(
                "Overpass interpreter returned HTTP {status}"
            )));
        }

        Ok(response.json().await?)
    }
}

impl Default for OverpassClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the `elements` array every Overpass JSON response carries.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the field is missing or not an array.
pub fn elements(body: &serde_json::Value) -> Result<&Vec<serde_json::Value>, SourceError> {
    body["elements"]
        .as_array()
        .ok_or_else(|| SourceError::parse("missing elements array in Overpass response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_requires_an_array() {
        let body = serde_json::json!({ "elements": [{ "type": "node" }] });
        assert_eq!(elements(&body).unwrap().len(), 1);

        let bad = serde_json::json!({ "remark": "runtime error" });
        assert!(elements(&bad).is_err());
    }
}
