//! Place lookup: forward and reverse geocoding behind an async trait.
//!
//! The engine treats name resolution as a black box. The production
//! implementation talks to the public Nominatim API; tests substitute
//! in-process stubs.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use poster_common::{GeoPoint, PosterError, PosterResult};

/// Resolved names for the place a point falls in.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub city: String,
    pub country: String,
}

/// Resolves place names to coordinates and back.
///
/// Misses and transport failures are both `InputInvalid`: from the
/// caller's point of view they mean "this location cannot be resolved",
/// and changing the request is the only fix.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Resolve a city/country pair to a point.
    async fn geocode(&self, city: &str, country: &str) -> PosterResult<GeoPoint>;

    /// Resolve a point to the city and country it falls in.
    async fn reverse(&self, point: GeoPoint) -> PosterResult<Place>;
}

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

/// Courtesy delay before every call, per the public instance usage policy
/// (absolute maximum of one request per second).
const COURTESY_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Lookup over the public Nominatim API.
///
/// The attribution contact rides in the User-Agent so the operator can
/// reach whoever is sending the traffic.
#[derive(Debug, Clone)]
pub struct NominatimLookup {
    client: reqwest::Client,
    base_url: String,
}

/// One row of a `/search` response. Nominatim serializes coordinates as
/// strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseDoc {
    #[serde(default)]
    address: ReverseAddress,
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    country: Option<String>,
}

impl NominatimLookup {
    /// Lookup against the public instance.
    pub fn new(attribution: &str) -> anyhow::Result<Self> {
        Self::with_base_url(NOMINATIM_BASE, attribution)
    }

    /// Lookup against a caller-supplied base URL. Tests point this at a
    /// local stub server.
    pub fn with_base_url(base_url: impl Into<String>, attribution: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("map-poster/1.0 ({})", attribution))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> PosterResult<T> {
        tokio::time::sleep(COURTESY_DELAY).await;

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| PosterError::InputInvalid(format!("place lookup unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterError::InputInvalid(format!(
                "place lookup failed: HTTP {}",
                status.as_u16()
            )));
        }

        response.json::<T>().await.map_err(|e| {
            PosterError::InputInvalid(format!("place lookup answered with malformed JSON: {}", e))
        })
    }
}

#[async_trait]
impl PlaceLookup for NominatimLookup {
    #[instrument(skip(self))]
    async fn geocode(&self, city: &str, country: &str) -> PosterResult<GeoPoint> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("city", city),
                ("country", country),
                ("format", "json"),
                ("limit", "1"),
            ]);

        let hits: Vec<SearchHit> = self.send_json(request).await?;
        let top = hits.into_iter().next().ok_or_else(|| {
            PosterError::InputInvalid(format!("no location found for {}, {}", city, country))
        })?;

        let parse = |field: &str, value: &str| -> PosterResult<f64> {
            value.parse::<f64>().map_err(|_| {
                PosterError::InputInvalid(format!(
                    "place lookup answered with non-numeric {}: {:?}",
                    field, value
                ))
            })
        };
        let point = GeoPoint::new(parse("lat", &top.lat)?, parse("lon", &top.lon)?)?;
        debug!(lat = point.lat, lon = point.lon, "geocoded place");
        Ok(point)
    }

    #[instrument(skip(self))]
    async fn reverse(&self, point: GeoPoint) -> PosterResult<Place> {
        let request = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", point.lat.to_string()),
                ("lon", point.lon.to_string()),
                ("format", "jsonv2".to_string()),
            ]);

        let doc: ReverseDoc = self.send_json(request).await?;

        // Settlements come back under different keys by size; fall through
        // to the free-form display name when none is present.
        let city = [
            doc.address.city,
            doc.address.town,
            doc.address.village,
            doc.address.hamlet,
        ]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .unwrap_or(doc.display_name);

        if city.is_empty() {
            return Err(PosterError::InputInvalid(format!(
                "no place name found at {}, {}",
                point.lat, point.lon
            )));
        }

        let country = doc
            .address
            .country
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                PosterError::InputInvalid(format!(
                    "no country found at {}, {}",
                    point.lat, point.lon
                ))
            })?;

        debug!(city = %city, country = %country, "reverse geocoded point");
        Ok(Place { city, country })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_doc_fallback_fields_parse() {
        // Only a hamlet and a country, the common rural answer.
        let doc: ReverseDoc = serde_json::from_str(
            r#"{
                "display_name": "Somewhere remote",
                "address": { "hamlet": "Le Petit Lieu", "country": "France" }
            }"#,
        )
        .unwrap();
        assert_eq!(doc.address.hamlet.as_deref(), Some("Le Petit Lieu"));
        assert!(doc.address.city.is_none());
    }

    #[test]
    fn test_reverse_doc_tolerates_missing_address() {
        let doc: ReverseDoc = serde_json::from_str(r#"{"display_name": "Mid-ocean"}"#).unwrap();
        assert!(doc.address.country.is_none());
        assert_eq!(doc.display_name, "Mid-ocean");
    }

    #[test]
    fn test_search_hit_keeps_string_coordinates() {
        let hits: Vec<SearchHit> =
            serde_json::from_str(r#"[{"lat": "48.8566", "lon": "2.3522", "class": "place"}]"#)
                .unwrap();
        assert_eq!(hits[0].lat, "48.8566");
    }
}
