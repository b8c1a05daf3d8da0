//! Geocoding client: resolves a postal code to coordinates through a
//! Nominatim-style provider configured by GEOCODER_URL / GEOCODER_API_KEY.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config;

pub const EARTH_RADIUS_MILES: f64 = 3963.0;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No geocoding match for '{0}'")]
    NoMatch(String),

    #[error("Geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed geocoder response")]
    Malformed,
}

// Every outbound call is bounded by a deadline; a hung provider fails the
// request instead of hanging it.
static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("geocoder http client")
});

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// Resolve a zipcode to `(lat, lng)`.
pub async fn geocode_zipcode(zipcode: &str) -> Result<(f64, f64), GeocodeError> {
    let geocoder = &config::config().geocoder;

    let mut request = CLIENT
        .get(&geocoder.url)
        .query(&[("postalcode", zipcode), ("format", "json"), ("limit", "1")]);
    if !geocoder.api_key.is_empty() {
        request = request.query(&[("key", geocoder.api_key.as_str())]);
    }

    let hits: Vec<GeocodeHit> = request.send().await?.error_for_status()?.json().await?;

    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoMatch(zipcode.to_string()))?;

    let lat = hit.lat.parse::<f64>().map_err(|_| GeocodeError::Malformed)?;
    let lng = hit.lon.parse::<f64>().map_err(|_| GeocodeError::Malformed)?;
    Ok((lat, lng))
}
