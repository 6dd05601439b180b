//! Nominatim-compatible geocoding client

use async_trait::async_trait;
use eyre::{Result, bail};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use tripstore::Stop;

use super::Language;
use crate::config::SearchConfig;

/// Minimum trimmed query length before a request is worth making
const MIN_QUERY_CHARS: usize = 2;

/// A geocoding candidate
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceMatch {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl PlaceMatch {
    /// Convert a selected match into a trip stop
    pub fn to_stop(&self) -> Stop {
        Stop::new(self.id.clone(), self.name.clone(), self.lat, self.lng)
    }
}

/// Seam for the geocoding collaborator
#[async_trait]
pub trait GeocodeClient: Send + Sync {
    /// Free-text search, country-restricted and language-tagged
    async fn search(&self, query: &str, language: Language) -> Result<Vec<PlaceMatch>>;
}

/// HTTP client for a Nominatim-compatible search endpoint
pub struct NominatimClient {
    base_url: String,
    country_codes: String,
    limit: u32,
    http: Client,
}

impl NominatimClient {
    /// Create a client from configuration
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            country_codes: config.country_codes.clone(),
            limit: config.limit,
            http,
        })
    }
}

#[async_trait]
impl GeocodeClient for NominatimClient {
    async fn search(&self, query: &str, language: Language) -> Result<Vec<PlaceMatch>> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        debug!(query = %trimmed, language = language.as_tag(), "search: called");
        let limit = self.limit.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
                ("countrycodes", self.country_codes.as_str()),
                ("accept-language", language.as_tag()),
                ("q", trimmed),
            ])
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            bail!("geocoding service returned status {}", status.as_u16());
        }

        let results: Vec<NominatimResult> = response.json().await?;
        debug!(count = results.len(), "search: success");
        Ok(results.iter().filter_map(NominatimResult::to_match).collect())
    }
}

// Nominatim response types

#[derive(Debug, Deserialize)]
struct NominatimResult {
    /// Numeric in practice but documented loosely; accept either
    place_id: serde_json::Value,
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimResult {
    /// Convert to a match, dropping entries with unusable coordinates
    fn to_match(&self) -> Option<PlaceMatch> {
        let id = match &self.place_id {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let lat = self.lat.parse().ok()?;
        let lng = self.lon.parse().ok()?;

        Some(PlaceMatch {
            id,
            name: self.display_name.clone(),
            lat,
            lng,
        })
    }
}
