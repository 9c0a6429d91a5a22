#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Runtime configuration for the site scouting engine.
//!
//! A [`ScoutConfig`] is built once (defaults, then an optional TOML file,
//! then environment overrides) and passed by reference into every
//! operation. Nothing in the engine reads configuration from global state.
//!
//! ```toml
//! [places]
//! api_key = "..."
//! search_radius_m = 3000
//!
//! [grid]
//! radius_m = 2000
//! step_m = 1000
//!
//! [trends]
//! page_delay_ms = 2000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable pointing at an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "SITE_SCOUT_CONFIG";

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ScoutConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Environment variable name.
        key: String,
        /// The rejected raw value.
        value: String,
    },
}

/// Top-level configuration, one section per component.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Place provider access.
    pub places: PlacesConfig,
    /// Grid sampling and density probing.
    pub grid: GridConfig,
    /// Review pipeline.
    pub reviews: ReviewConfig,
    /// Category trend aggregation.
    pub trends: TrendConfig,
}

/// Place provider access settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// Provider API key.
    pub api_key: String,
    /// Base URL of the JSON web services.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Retries for transient HTTP failures.
    pub max_retries: u32,
    /// Radius in meters for competitor, heatmap, and trend searches.
    pub search_radius_m: f64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            request_timeout_ms: 10_000,
            max_retries: 2,
            search_radius_m: 3000.0,
        }
    }
}

impl PlacesConfig {
    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Grid sampling and density probe settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Half-width of the sampling grid in meters.
    pub radius_m: f64,
    /// Spacing between grid points in meters.
    pub step_m: f64,
    /// Search radius of each density probe in meters.
    pub probe_radius_m: f64,
    /// Number of zones to suggest.
    pub zone_count: usize,
    /// Maximum probes in flight at once.
    pub probe_concurrency: usize,
    /// Timeout for a single probe or reverse geocode, in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            radius_m: 2000.0,
            step_m: 1000.0,
            probe_radius_m: 500.0,
            zone_count: 5,
            probe_concurrency: 8,
            probe_timeout_ms: 10_000,
        }
    }
}

impl GridConfig {
    /// Timeout applied to each probe and name lookup.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Review pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Reviews considered per place.
    pub max_reviews: usize,
    /// Reviews kept in each sentiment group.
    pub group_size: usize,
    /// Places whose reviews are fetched at once.
    pub fetch_concurrency: usize,
    /// Timeout for one place's review fetch, in milliseconds.
    pub fetch_timeout_ms: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_reviews: 5,
            group_size: 5,
            fetch_concurrency: 4,
            fetch_timeout_ms: 10_000,
        }
    }
}

impl ReviewConfig {
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Category trend aggregation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Place type searched when collecting category tags.
    pub place_type: String,
    /// Politeness delay between page fetches, in milliseconds.
    pub page_delay_ms: u64,
    /// Upper bound on pages fetched per aggregation.
    pub max_pages: u32,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            place_type: "establishment".to_string(),
            page_delay_ms: 2000,
            max_pages: 5,
        }
    }
}

impl TrendConfig {
    /// Delay between consecutive page fetches.
    #[must_use]
    pub const fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Sets the politeness delay (tests use zero).
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

impl ScoutConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the effective configuration.
    ///
    /// Starts from `path` (or the file named by [`CONFIG_PATH_ENV`], or the
    /// defaults when neither is set) and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file or an override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let path = path.or_else(|| env_path.as_deref().map(Path::new));

        let mut config = match path {
            Some(p) => {
                log::debug!("Loading config from {}", p.display());
                Self::from_file(p)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides from a key lookup (normally the process
    /// environment).
    ///
    /// Recognised keys: `GOOGLE_MAPS_API_KEY`, `SITE_SCOUT_PLACES_BASE_URL`,
    /// `MAPS_RADIUS`, `SITE_SCOUT_PAGE_DELAY_MS`,
    /// `SITE_SCOUT_PROBE_CONCURRENCY`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a numeric override does not
    /// parse.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(key) = lookup("GOOGLE_MAPS_API_KEY") {
            self.places.api_key = key;
        }
        if let Some(url) = lookup("SITE_SCOUT_PLACES_BASE_URL") {
            self.places.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(radius) = parse_override(&lookup, "MAPS_RADIUS")? {
            self.places.search_radius_m = radius;
        }
        if let Some(delay) = parse_override(&lookup, "SITE_SCOUT_PAGE_DELAY_MS")? {
            self.trends.page_delay_ms = delay;
        }
        if let Some(concurrency) = parse_override::<usize>(&lookup, "SITE_SCOUT_PROBE_CONCURRENCY")? {
            self.grid.probe_concurrency = concurrency.max(1);
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                })
        })
        .transpose()
}
