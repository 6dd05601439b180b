//! Overpass-compatible nearby-points-of-interest client
//!
//! Queries map features around a stop and classifies raw tags into a
//! fixed category taxonomy. Distance from the originating stop is
//! great-circle; results come back sorted by distance ascending, capped
//! per stop.

use std::collections::HashMap;

use async_trait::async_trait;
use eyre::{Result, bail};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use tripstore::Stop;

use super::Language;
use crate::config::NearbyConfig;
use crate::geo::haversine_km;

/// Fixed category taxonomy for nearby places
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Attraction,
    Museum,
    Viewpoint,
    Heritage,
    Temple,
    Park,
    Beach,
    Waterfall,
}

impl Category {
    /// Classify raw OSM tags. Natural features win over tourism tags,
    /// mirroring the query's tag groups; anything unrecognized is a
    /// generic attraction.
    pub fn classify(tags: &HashMap<String, String>) -> Self {
        match tags.get("natural").map(String::as_str) {
            Some("beach") => return Category::Beach,
            Some("waterfall") => return Category::Waterfall,
            Some("peak") => return Category::Viewpoint,
            _ => {}
        }
        match tags.get("tourism").map(String::as_str) {
            Some("museum") => return Category::Museum,
            Some("viewpoint") => return Category::Viewpoint,
            _ => {}
        }
        if tags.contains_key("historic") {
            return Category::Heritage;
        }
        if tags.get("amenity").map(String::as_str) == Some("place_of_worship") {
            return Category::Temple;
        }
        if tags.get("leisure").map(String::as_str) == Some("park") {
            return Category::Park;
        }
        Category::Attraction
    }
}

/// A classified nearby place
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlace {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub distance_km: f64,
    pub lat: f64,
    pub lng: f64,
}

impl NearbyPlace {
    /// Convert into a trip stop when the user adds it
    pub fn to_stop(&self) -> Stop {
        Stop::new(self.id.clone(), self.name.clone(), self.lat, self.lng)
    }
}

/// Seam for the nearby-discovery collaborator
#[async_trait]
pub trait NearbyClient: Send + Sync {
    /// Nearby places within `radius_meters` of the stop, sorted by
    /// distance ascending and capped per stop
    async fn nearby(&self, stop: &Stop, radius_meters: u32, language: Language) -> Result<Vec<NearbyPlace>>;
}

/// HTTP client for an Overpass-compatible interpreter endpoint
pub struct OverpassClient {
    base_url: String,
    limit_per_stop: usize,
    http: Client,
}

impl OverpassClient {
    /// Create a client from configuration
    pub fn from_config(config: &NearbyConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            limit_per_stop: config.limit_per_stop,
            http,
        })
    }
}

/// Overpass QL query covering the category taxonomy's tag groups
fn build_query(stop: &Stop, radius_meters: u32) -> String {
    let around = format!("around:{},{},{}", radius_meters, stop.lat, stop.lng);
    let mut query = String::from("[out:json][timeout:25];\n(\n");
    for selector in [
        "[\"tourism\"~\"attraction|museum|viewpoint\"]",
        "[\"historic\"]",
        "[\"leisure\"=\"park\"]",
        "[\"natural\"~\"peak|waterfall|beach\"]",
        "[\"amenity\"=\"place_of_worship\"]",
    ] {
        for kind in ["node", "way", "relation"] {
            query.push_str(&format!("  {kind}({around}){selector};\n"));
        }
    }
    query.push_str(");\nout center 20;\n");
    query
}

/// Pick a display name for the requested language, falling back to the
/// generic `name` tag
fn pick_name(tags: &HashMap<String, String>, language: Language) -> Option<String> {
    let localized = match language {
        Language::En => tags.get("name:en"),
        Language::Si => tags.get("name:si"),
        Language::Ta => tags.get("name:ta"),
    };
    localized.or_else(|| tags.get("name")).cloned()
}

/// Map raw elements to classified places: resolve coordinates, pick a
/// name, classify, measure, sort, cap
fn collect_places(
    elements: &[OverpassElement],
    origin: &Stop,
    language: Language,
    limit: usize,
) -> Vec<NearbyPlace> {
    let mut places: Vec<NearbyPlace> = elements
        .iter()
        .filter_map(|element| {
            let (lat, lng) = element.coordinates()?;
            let name = pick_name(&element.tags, language)?;
            Some(NearbyPlace {
                id: format!("{}-{}", element.kind, element.id),
                name,
                category: Category::classify(&element.tags),
                distance_km: haversine_km(origin.lat, origin.lng, lat, lng),
                lat,
                lng,
            })
        })
        .collect();

    places.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    places.truncate(limit);
    places
}

#[async_trait]
impl NearbyClient for OverpassClient {
    async fn nearby(&self, stop: &Stop, radius_meters: u32, language: Language) -> Result<Vec<NearbyPlace>> {
        debug!(stop_id = %stop.id, radius_meters, "nearby: called");
        let response = self
            .http
            .post(&self.base_url)
            .form(&[("data", build_query(stop, radius_meters))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            bail!("nearby service returned status {}", status.as_u16());
        }

        let payload: OverpassResponse = response.json().await?;
        let places = collect_places(&payload.elements, stop, language, self.limit_per_stop);
        debug!(count = places.len(), "nearby: success");
        Ok(places)
    }
}

// Overpass response types

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    /// Node coordinates directly, else the way/relation center
    fn coordinates(&self) -> Option<(f64, f64)> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some((lat, lon));
        }
        self.center.as_ref().map(|c| (c.lat, c.lon))
    }
}
