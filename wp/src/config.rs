//! Wayplan configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Wayplan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Duration constants used by the timeline builder and leg resolver
    pub durations: DurationPolicy,

    /// Plan suggestion service configuration
    pub suggest: SuggestConfig,

    /// Routing service configuration
    pub routing: RoutingConfig,

    /// Geocoding search configuration
    pub search: SearchConfig,

    /// Nearby-points-of-interest configuration
    pub nearby: NearbyConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .wayplan.yml
        let local_config = PathBuf::from(".wayplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/wayplan/wayplan.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("wayplan").join("wayplan.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Fixed durations and the travel buffer multiplier.
///
/// Pure constants with no side effects; overridable through configuration
/// so tests and deployments can tighten them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationPolicy {
    /// Minutes assumed at a stop that has no visit estimate
    #[serde(rename = "default-visit-minutes")]
    pub default_visit_minutes: i64,

    /// Interim per-leg placeholder before real leg data resolves
    #[serde(rename = "default-travel-minutes")]
    pub default_travel_minutes: i64,

    /// Fixed meal durations
    #[serde(rename = "meal-durations")]
    pub meal_durations: MealDurations,

    /// Multiplier applied to raw routing durations before conversion
    #[serde(rename = "travel-buffer")]
    pub travel_buffer: f64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            default_visit_minutes: 60,
            default_travel_minutes: 45,
            meal_durations: MealDurations::default(),
            travel_buffer: 1.3,
        }
    }
}

/// Minutes reserved for each meal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MealDurations {
    pub breakfast: i64,
    pub lunch: i64,
    pub dinner: i64,
}

impl Default for MealDurations {
    fn default() -> Self {
        Self {
            breakfast: 30,
            lunch: 45,
            dinner: 60,
        }
    }
}

impl MealDurations {
    /// Fixed total across the three meals
    pub fn total(&self) -> i64 {
        self.breakfast + self.lunch + self.dinner
    }
}

/// Plan suggestion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Endpoint URL for the suggestion backend
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/suggest".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Routing service configuration (OSRM-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Base URL for the driving profile
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org/route/v1/driving".to_string(),
            timeout_ms: 15_000,
        }
    }
}

/// Geocoding search configuration (Nominatim-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// ISO country code restriction
    #[serde(rename = "country-codes")]
    pub country_codes: String,

    /// Maximum results per query
    pub limit: u32,

    /// Debounce window between keystroke and request, in milliseconds
    #[serde(rename = "debounce-ms")]
    pub debounce_ms: u64,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            country_codes: "lk".to_string(),
            limit: 5,
            debounce_ms: 350,
            timeout_ms: 10_000,
        }
    }
}

/// Nearby-points-of-interest configuration (Overpass-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NearbyConfig {
    /// Interpreter endpoint
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum results kept per stop
    #[serde(rename = "limit-per-stop")]
    pub limit_per_stop: usize,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de/api/interpreter".to_string(),
            limit_per_stop: 4,
            timeout_ms: 25_000,
        }
    }
}
