//! # Vacation Planner Library
//!
//! Searches the Amadeus travel API for flights, hotels and activities, flattens
//! the JSON responses into display records and picks a representative offer
//! (by default the median-priced one) for a trip within a budget.

pub mod budget;
pub mod client;
pub mod config;
pub mod handoff;
pub mod normalize;
pub mod planner;
pub mod relay;
pub mod report;
pub mod selection;
pub mod session;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Re-export main types for convenience
pub use budget::{extract_budget_amount, remaining_budget, BudgetBreakdown};
pub use client::{AmadeusClient, TravelSource};
pub use config::PlannerConfig;
pub use normalize::{normalize, normalize_activity, normalize_flight, normalize_hotel, normalize_hotel_offer};
pub use planner::{TripPlan, TripRequest, VacationPlanner};
pub use selection::{
    choose_activity, price_index, select_activity_within_budget, select_by_plan, select_median,
    ActivityChoice,
};

/// Sentinel used for hotel and activity fields the API left out
pub const NOT_AVAILABLE: &str = "N/A";

/// Error types for the vacation planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Travel API returned {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("No offers available to select from")]
    NoOffersAvailable,

    #[error("No '$' budget marker found in: {0}")]
    BudgetMarkerNotFound(String),

    #[error("Invalid budget amount: {0}")]
    InvalidBudgetAmount(String),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InputError(String),

    #[error("Invalid date format: {0}")]
    DateParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parsing failed: {0}")]
    ParseError(String),
}

impl PlannerError {
    /// Errors raised by the travel API or the network in front of it
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            PlannerError::HttpError(_) | PlannerError::ServiceError { .. } | PlannerError::AuthError(_)
        )
    }
}

/// Kind of offer a raw API record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferKind {
    Flight,
    Hotel,
}

/// Selection tier used to pick one offer out of a priced list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelPlan {
    /// Cheapest offer
    Economic,
    /// Median-priced offer
    #[default]
    Business,
    /// Most expensive offer
    Luxury,
}

impl FromStr for TravelPlan {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "economic" | "economy" => Ok(TravelPlan::Economic),
            "business" | "median" => Ok(TravelPlan::Business),
            "luxury" => Ok(TravelPlan::Luxury),
            _ => Err(PlannerError::ParseError(format!("Invalid travel plan: {}", s))),
        }
    }
}

impl fmt::Display for TravelPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TravelPlan::Economic => "economic",
            TravelPlan::Business => "business",
            TravelPlan::Luxury => "luxury",
        };
        f.write_str(name)
    }
}

/// Flight offer search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub origin: String,          // IATA location code
    pub destination: String,     // IATA location code
    pub departure_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
}

impl FlightQuery {
    /// Build a query from raw user input, validating the codes, date and traveler count
    pub fn new(origin: &str, destination: &str, departure_date: &str, adults: u32) -> Result<Self, PlannerError> {
        let origin = origin.trim().to_uppercase();
        let destination = destination.trim().to_uppercase();
        if origin.is_empty() || destination.is_empty() {
            return Err(PlannerError::InputError(
                "origin and destination location codes are required".to_string()
            ));
        }
        if adults == 0 {
            return Err(PlannerError::InputError(
                "at least one adult passenger is required".to_string()
            ));
        }

        let departure_date = NaiveDate::parse_from_str(departure_date.trim(), "%Y-%m-%d")
            .map_err(|_| PlannerError::DateParseError(format!(
                "expected YYYY-MM-DD, got {}", departure_date.trim()
            )))?;

        Ok(Self {
            origin,
            destination,
            departure_date,
            adults,
            children: 0,
        })
    }
}

/// Flattened flight offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub airline: String,
    pub departure_city: String,
    pub departure_airport: String,
    pub arrival_city: String,
    pub arrival_airport: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: Decimal,
    pub currency: String,
}

/// Flattened hotel listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub name: String,
    pub address_line: String,
    pub city_name: String,
    pub rating: String,
    pub hotel_id: String,
    pub coordinates: Option<(f64, f64)>, // (latitude, longitude)
}

/// Hotel with the price of its first available offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    pub hotel: HotelRecord,
    pub price: Decimal,
    pub currency: String,
}

/// Flattened tour or activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub currency: String,
}

/// Display projection of a single offer
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRecord {
    Flight(FlightRecord),
    Hotel(HotelRecord),
}

impl DisplayRecord {
    pub fn kind(&self) -> OfferKind {
        match self {
            DisplayRecord::Flight(_) => OfferKind::Flight,
            DisplayRecord::Hotel(_) => OfferKind::Hotel,
        }
    }
}

/// Anything that carries a single comparable price
pub trait Priced {
    fn price(&self) -> Decimal;
}

impl Priced for FlightRecord {
    fn price(&self) -> Decimal {
        self.price
    }
}

impl Priced for HotelOffer {
    fn price(&self) -> Decimal {
        self.price
    }
}

impl Priced for ActivityRecord {
    fn price(&self) -> Decimal {
        self.price
    }
}

/// Plan a whole trip against the live Amadeus API
///
/// # Example
/// ```no_run
/// use vacation_planner::{plan_trip, FlightQuery, PlannerConfig, TravelPlan, TripRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PlannerConfig::from_env()?;
/// let request = TripRequest {
///     query: FlightQuery::new("MAD", "ATH", "2025-11-01", 1)?,
///     plan: TravelPlan::Business,
///     budget: Some(1500),
/// };
///
/// let plan = plan_trip(config, request).await?;
/// println!("Remaining budget: {}", plan.budget.remaining_budget);
/// # Ok(())
/// # }
/// ```
pub async fn plan_trip(config: PlannerConfig, request: TripRequest) -> Result<TripPlan, PlannerError> {
    let client = AmadeusClient::new(&config)?;
    let planner = VacationPlanner::new(client, config);
    Ok(planner.plan_trip(&request).await)
}
