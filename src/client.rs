//! HTTP client for the Amadeus self-service travel API

use crate::config::PlannerConfig;
use crate::{FlightQuery, PlannerError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Source of raw offer records
///
/// Each call returns the API's `data` array untouched; flattening happens in
/// [`crate::normalize`].
#[async_trait]
pub trait TravelSource: Send + Sync {
    async fn flight_offers(&self, query: &FlightQuery) -> Result<Vec<Value>, PlannerError>;

    async fn hotels_by_city(&self, city_code: &str) -> Result<Vec<Value>, PlannerError>;

    async fn hotel_offers(&self, hotel_ids: &[String]) -> Result<Vec<Value>, PlannerError>;

    async fn activities(&self, latitude: f64, longitude: f64, radius_km: u32) -> Result<Vec<Value>, PlannerError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Amadeus client using OAuth2 client credentials
pub struct AmadeusClient {
    http_client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    hotel_radius_km: u32,
    token: Mutex<Option<AccessToken>>,
}

impl AmadeusClient {
    /// Create a new client from configuration
    pub fn new(config: &PlannerConfig) -> Result<Self, PlannerError> {
        debug!(base_url = %config.base_url, "Creating new Amadeus client");
        let http_client = Client::builder()
            .user_agent(concat!("vacation-planner/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            hotel_radius_km: config.hotel_radius_km,
            token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Cached bearer token, refreshed once it has expired
    async fn access_token(&self) -> Result<String, PlannerError> {
        let mut token = self.token.lock().await;
        if let Some(cached) = token.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.value.clone());
            }
            debug!("Access token expired, requesting a new one");
        }

        info!("Requesting Amadeus access token");
        let response = self
            .http_client
            .post(self.url("/v1/security/oauth2/token"))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Failed to get access token");
            return Err(PlannerError::AuthError(format!("{}: {}", status, body)));
        }

        let parsed: TokenResponse = response.json().await?;
        // Refresh a little early so a token never expires mid-request
        let lifetime = Duration::from_secs(parsed.expires_in.saturating_sub(30));
        *token = Some(AccessToken {
            value: parsed.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        info!(expires_in = parsed.expires_in, "Access token obtained");
        Ok(parsed.access_token)
    }

    async fn get_data(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>, PlannerError> {
        let token = self.access_token().await?;
        let url = self.url(path);

        let start_time = Instant::now();
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        info!(
            url = %url,
            status = %response.status(),
            duration_ms = start_time.elapsed().as_millis(),
            "HTTP request completed"
        );

        let envelope = parse_envelope(response).await?;
        debug!(records = envelope.data.len(), "Parsed response data");
        Ok(envelope.data)
    }
}

async fn parse_envelope(response: Response) -> Result<DataEnvelope, PlannerError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        error!(status = %status, "Travel API request failed");
        return Err(PlannerError::ServiceError {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

/// Query string for the flight-offers endpoint
pub fn flight_offer_params(query: &FlightQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("originLocationCode", query.origin.clone()),
        ("destinationLocationCode", query.destination.clone()),
        ("departureDate", query.departure_date.format("%Y-%m-%d").to_string()),
        ("adults", query.adults.to_string()),
    ];
    if query.children > 0 {
        params.push(("children", query.children.to_string()));
    }
    params
}

#[async_trait]
impl TravelSource for AmadeusClient {
    #[instrument(level = "info", skip(self, query), fields(origin = %query.origin, destination = %query.destination))]
    async fn flight_offers(&self, query: &FlightQuery) -> Result<Vec<Value>, PlannerError> {
        info!("Searching flight offers");
        self.get_data("/v2/shopping/flight-offers", &flight_offer_params(query)).await
    }

    #[instrument(level = "info", skip(self))]
    async fn hotels_by_city(&self, city_code: &str) -> Result<Vec<Value>, PlannerError> {
        info!("Searching hotels by city");
        let params = [
            ("cityCode", city_code.to_string()),
            ("radius", self.hotel_radius_km.to_string()),
            ("radiusUnit", "KM".to_string()),
            ("ratings", "1,2,3,4,5".to_string()),
        ];
        self.get_data("/v1/reference-data/locations/hotels/by-city", &params).await
    }

    #[instrument(level = "info", skip(self, hotel_ids), fields(hotels = hotel_ids.len()))]
    async fn hotel_offers(&self, hotel_ids: &[String]) -> Result<Vec<Value>, PlannerError> {
        info!("Fetching hotel offers");
        self.get_data("/v3/shopping/hotel-offers", &[("hotelIds", hotel_ids.join(","))]).await
    }

    #[instrument(level = "info", skip(self))]
    async fn activities(&self, latitude: f64, longitude: f64, radius_km: u32) -> Result<Vec<Value>, PlannerError> {
        info!("Searching activities");
        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("radius", radius_km.to_string()),
        ];
        self.get_data("/v1/shopping/activities", &params).await
    }
}
