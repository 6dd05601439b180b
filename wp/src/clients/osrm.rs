//! OSRM-compatible routing client
//!
//! One call per ordered coordinate sequence, driving profile, returning
//! raw per-leg durations (seconds) and distances (meters). The buffer
//! multiplier is applied downstream by the resolver, not here.

use async_trait::async_trait;
use eyre::{Result, bail};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use tripstore::Stop;

use crate::config::RoutingConfig;

/// Raw per-leg figures exactly as the routing engine reported them
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLegs {
    /// Seconds per consecutive-pair leg
    pub durations_seconds: Vec<f64>,
    /// Meters per consecutive-pair leg
    pub distances_meters: Vec<f64>,
}

/// Seam for the routing collaborator
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Fetch per-leg durations and distances for the ordered stops
    async fn route(&self, stops: &[Stop]) -> Result<RouteLegs>;
}

/// HTTP client for an OSRM-compatible `route/v1/driving` endpoint
pub struct OsrmClient {
    base_url: String,
    http: Client,
}

impl OsrmClient {
    /// Create a client from configuration
    pub fn from_config(config: &RoutingConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build the request URL: `lng,lat` pairs joined by `;`
    fn build_url(&self, stops: &[Stop]) -> String {
        let coordinates = stops
            .iter()
            .map(|s| format!("{},{}", s.lng, s.lat))
            .collect::<Vec<_>>()
            .join(";");
        format!("{}/{}?overview=false&steps=false", self.base_url, coordinates)
    }
}

#[async_trait]
impl RoutingClient for OsrmClient {
    async fn route(&self, stops: &[Stop]) -> Result<RouteLegs> {
        debug!(stop_count = stops.len(), "route: called");
        let url = self.build_url(stops);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            bail!("routing service returned status {}", status.as_u16());
        }

        let payload: OsrmResponse = response.json().await?;
        let legs = payload
            .routes
            .into_iter()
            .next()
            .map(|r| r.legs)
            .unwrap_or_default();

        if legs.is_empty() {
            bail!("routing response contained no legs");
        }

        debug!(leg_count = legs.len(), "route: success");
        Ok(RouteLegs {
            durations_seconds: legs.iter().map(|l| l.duration).collect(),
            distances_meters: legs.iter().map(|l| l.distance).collect(),
        })
    }
}

// OSRM response types

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    duration: f64,
    distance: f64,
}
