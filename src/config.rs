//! Runtime configuration
//!
//! Credentials come from the environment (optionally through a `.env` file);
//! everything else has a default that the CLI may override.

use crate::PlannerError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";
pub const DEFAULT_HOTEL_BATCH_SIZE: usize = 10;
pub const DEFAULT_INPUT_FILE: &str = "input.txt";
pub const DEFAULT_LISTING_FILE: &str = "hotel_offers_response.json";

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Hotel ids per hotel-offers request
    pub hotel_batch_size: usize,
    pub hotel_radius_km: u32,
    pub activity_radius_km: u32,
    pub request_timeout: Duration,
    /// Hand-off file holding the `Budget: $...` line
    pub input_file: PathBuf,
    /// Hand-off file holding the raw hotel listing
    pub listing_file: PathBuf,
    /// Where raw API responses are dumped for debugging, if anywhere
    pub dump_dir: Option<PathBuf>,
    /// Listen address of the input relay
    pub relay_addr: SocketAddr,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            hotel_batch_size: DEFAULT_HOTEL_BATCH_SIZE,
            hotel_radius_km: 10,
            activity_radius_km: 1,
            request_timeout: Duration::from_secs(30),
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            listing_file: PathBuf::from(DEFAULT_LISTING_FILE),
            dump_dir: None,
            relay_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

impl PlannerConfig {
    /// Load credentials from `.env` and the process environment
    pub fn from_env() -> Result<Self, PlannerError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(PlannerError::ConfigError(format!("Failed to read .env: {}", e))),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlannerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PlannerError::ConfigError(format!("{} is not set", key)))
        };

        let mut config = Self {
            client_id: required("AMADEUS_CLIENT_ID")?,
            client_secret: required("AMADEUS_CLIENT_SECRET")?,
            ..Self::default()
        };

        if let Some(base_url) = lookup("AMADEUS_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    pub fn with_input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = path.into();
        self
    }

    pub fn with_listing_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.listing_file = path.into();
        self
    }

    pub fn with_dump_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dump_dir = dir;
        self
    }

    /// Override the relay address; `None` keeps the current one
    pub fn with_relay_addr(mut self, addr: Option<SocketAddr>) -> Self {
        if let Some(addr) = addr {
            self.relay_addr = addr;
        }
        self
    }
}
