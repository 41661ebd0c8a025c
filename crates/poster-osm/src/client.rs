//! Ordered-failover HTTP client for area queries.

use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info, instrument, warn};

use poster_common::{Feature, GeoPoint, PosterError, PosterResult};

use crate::elements;
use crate::query;

/// Public mirrors with identical query semantics, tried in order.
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.nchc.org.tw/api/interpreter",
];

/// Total per-attempt budget. The query itself carries a 180 s server-side
/// timeout, so the client allows slightly more before giving up.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(190);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches features for a render area, failing over across an ordered list
/// of equivalent endpoints.
///
/// Failover is endpoint-to-endpoint only: each endpoint gets at most one
/// attempt per request and there is no backoff. A transient failure on one
/// mirror must not abort the render when another mirror answers.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    endpoints: Vec<String>,
}

impl OverpassClient {
    /// Client over the default public mirrors.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_endpoints(DEFAULT_ENDPOINTS)
    }

    /// Client over a caller-supplied endpoint list (tried in the given
    /// order). The list must not be empty.
    pub fn with_endpoints<I, S>(endpoints: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let endpoints: Vec<String> = endpoints.into_iter().map(Into::into).collect();
        if endpoints.is_empty() {
            anyhow::bail!("at least one acquisition endpoint is required");
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoints })
    }

    /// Fetch every road, water, and park feature within `radius_m` meters
    /// of `center`.
    ///
    /// The first endpoint that answers with a parseable document wins and
    /// the remaining endpoints are never contacted. If every endpoint
    /// fails, the error carries the last endpoint's failure text.
    #[instrument(skip(self))]
    pub async fn fetch_features(
        &self,
        center: GeoPoint,
        radius_m: f64,
    ) -> PosterResult<Vec<Feature>> {
        let ql = query::area_query(center, radius_m);
        let mut last_error: Option<(String, String)> = None;

        for endpoint in &self.endpoints {
            match self.try_endpoint(endpoint, &ql).await {
                Ok(features) => {
                    info!(endpoint = %endpoint, count = features.len(), "acquired features");
                    return Ok(features);
                }
                Err(cause) => {
                    warn!(endpoint = %endpoint, error = %cause, "endpoint failed, trying next");
                    last_error = Some((endpoint.clone(), cause));
                }
            }
        }

        match last_error {
            Some((endpoint, cause)) => Err(PosterError::DataUnavailable { endpoint, cause }),
            // Unreachable: construction rejects an empty endpoint list.
            None => Err(PosterError::DataUnavailable {
                endpoint: String::new(),
                cause: "no endpoints configured".to_string(),
            }),
        }
    }

    async fn try_endpoint(&self, endpoint: &str, ql: &str) -> Result<Vec<Feature>, String> {
        debug!(endpoint = %endpoint, "posting area query");

        let response = self
            .client
            .post(endpoint)
            .form(&[("data", ql)])
            .send()
            .await
            .map_err(|e| format!("transport error: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status.as_u16(), head(&body, 200)));
        }

        let raw = response
            .bytes()
            .await
            .map_err(|e| format!("body read error: {}", e))?;

        elements::parse_features(&raw).map_err(|e| format!("malformed element document: {}", e))
    }
}

/// First `max_chars` characters of an upstream error body; mirrors can
/// answer with whole HTML pages.
fn head(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints_are_ordered_and_distinct() {
        assert_eq!(DEFAULT_ENDPOINTS.len(), 3);
        let mut sorted = DEFAULT_ENDPOINTS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        for endpoint in DEFAULT_ENDPOINTS {
            assert!(endpoint.starts_with("https://"));
            assert!(endpoint.ends_with("/api/interpreter"));
        }
    }

    #[test]
    fn test_empty_endpoint_list_rejected() {
        assert!(OverpassClient::with_endpoints(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_head_truncates_long_bodies() {
        let long = "x".repeat(500);
        assert_eq!(head(&long, 200).len(), 200);
        assert_eq!(head("short", 200), "short");
    }
}
