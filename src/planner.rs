//! Trip planning workflow on top of a [`TravelSource`]
//!
//! Every external call is awaited before the next one starts. Failures from the
//! travel API are logged here and turned into empty results, so callers only
//! ever check for "nothing found".

use crate::budget::BudgetBreakdown;
use crate::client::TravelSource;
use crate::config::PlannerConfig;
use crate::handoff;
use crate::normalize::{normalize_activity, normalize_flights, normalize_hotel_offer, normalize_hotels};
use crate::selection::{choose_activity, price_index, select_by_plan, ActivityChoice};
use crate::{ActivityRecord, FlightQuery, FlightRecord, HotelOffer, HotelRecord, TravelPlan, NOT_AVAILABLE};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Everything needed for a non-interactive plan
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub query: FlightQuery,
    pub plan: TravelPlan,
    pub budget: Option<u64>,
}

/// Outcome of a full planning run
#[derive(Debug, Clone)]
pub struct TripPlan {
    pub plan: TravelPlan,
    pub flights: Vec<FlightRecord>,
    pub flight: Option<FlightRecord>,
    pub hotels: Vec<HotelRecord>,
    pub hotel_offers: Vec<HotelOffer>,
    pub hotel: Option<HotelOffer>,
    pub activities: Vec<ActivityRecord>,
    pub activity: Option<ActivityChoice<ActivityRecord>>,
    pub budget: BudgetBreakdown,
}

pub struct VacationPlanner<S> {
    source: S,
    config: PlannerConfig,
}

impl<S: TravelSource> VacationPlanner<S> {
    pub fn new(source: S, config: PlannerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Flight offers for the query, flattened; empty when the API call fails
    #[instrument(level = "info", skip(self, query), fields(origin = %query.origin, destination = %query.destination))]
    pub async fn search_flights(&self, query: &FlightQuery) -> Vec<FlightRecord> {
        let raw = match self.source.flight_offers(query).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, external = e.is_external(), "Error fetching flight offers");
                return Vec::new();
            }
        };

        self.dump("flight_offers_response.json", &raw);
        let flights = normalize_flights(&raw);
        info!(offers = raw.len(), flights = flights.len(), "Flight search completed");
        flights
    }

    /// Hotel listing for a city as (raw records, flattened records); empty on failure
    #[instrument(level = "info", skip(self))]
    pub async fn search_hotels(&self, city_code: &str) -> (Vec<Value>, Vec<HotelRecord>) {
        match self.source.hotels_by_city(city_code).await {
            Ok(raw) => {
                let hotels = normalize_hotels(&raw);
                info!(hotels = hotels.len(), "Hotel search completed");
                (raw, hotels)
            }
            Err(e) => {
                error!(error = %e, external = e.is_external(), "Error fetching hotel list");
                (Vec::new(), Vec::new())
            }
        }
    }

    /// Priced offers for the given hotels, fetched in sequential batches
    ///
    /// A failing batch is logged and skipped; the remaining batches still run.
    #[instrument(level = "info", skip(self, hotel_ids), fields(hotels = hotel_ids.len()))]
    pub async fn fetch_hotel_prices(&self, hotel_ids: &[String]) -> Vec<HotelOffer> {
        let batch_size = self.config.hotel_batch_size.max(1);
        let mut offers = Vec::new();

        for (batch_index, batch) in hotel_ids.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;
            debug!(offset, ids = %batch.join(","), "Fetching prices for hotel batch");

            let raw = match self.source.hotel_offers(batch).await {
                Ok(raw) => raw,
                Err(e) => {
                    error!(offset, error = %e, external = e.is_external(), "Hotel price batch failed, skipping");
                    continue;
                }
            };

            self.dump(&format!("hotel_offers_price_batch_{}.json", offset), &raw);

            if raw.is_empty() {
                info!(offset, "No hotel price data available for this batch");
                continue;
            }

            offers.extend(raw.iter().filter_map(normalize_hotel_offer));
        }

        info!(priced_hotels = offers.len(), "Hotel price lookup completed");
        offers
    }

    /// Activities around a point; empty on failure
    #[instrument(level = "info", skip(self))]
    pub async fn search_activities(&self, latitude: f64, longitude: f64) -> Vec<ActivityRecord> {
        match self
            .source
            .activities(latitude, longitude, self.config.activity_radius_km)
            .await
        {
            Ok(raw) => raw.iter().map(normalize_activity).collect(),
            Err(e) => {
                error!(error = %e, external = e.is_external(), "Error fetching activities");
                Vec::new()
            }
        }
    }

    /// Run the whole workflow: flights, hotels, prices, activity, budget
    pub async fn plan_trip(&self, request: &TripRequest) -> TripPlan {
        let plan = request.plan;

        let flights = self.search_flights(&request.query).await;
        let flight = select_flight(&flights, plan);

        let (raw_hotels, hotels) = self.search_hotels(&request.query.destination).await;
        if !raw_hotels.is_empty() {
            if let Err(e) = handoff::save_hotel_listing(&self.config.listing_file, &raw_hotels) {
                warn!(error = %e, "Could not save hotel listing");
            }
        }

        let hotel_offers = self.fetch_hotel_prices(&hotel_ids(&hotels)).await;
        let hotel = select_hotel(&hotel_offers, &hotels, plan);

        let flight_cost = flight.as_ref().map(|f| f.price);
        let hotel_cost = hotel.as_ref().map(|h| h.price);

        let mut activities = Vec::new();
        let mut activity = None;
        if let Some((latitude, longitude)) = activity_location(hotel.as_ref(), &hotels) {
            activities = self.search_activities(latitude, longitude).await;
            let remaining = request.budget.map(|budget| {
                Decimal::from(budget)
                    - flight_cost.unwrap_or(Decimal::ZERO)
                    - hotel_cost.unwrap_or(Decimal::ZERO)
            });
            activity = choose_activity(&priced_activities(&activities), remaining, plan);
        } else {
            debug!("No hotel coordinates found, skipping activities");
        }

        let budget = BudgetBreakdown::calculate(
            request.budget,
            flight_cost,
            hotel_cost,
            activity.as_ref().map(|a| a.price),
        );

        info!(
            flights = flights.len(),
            hotels = hotel_offers.len(),
            activities = activities.len(),
            remaining = %budget.remaining_budget,
            "Trip planning completed"
        );

        TripPlan {
            plan,
            flights,
            flight,
            hotels,
            hotel_offers,
            hotel,
            activities,
            activity,
            budget,
        }
    }

    fn dump(&self, file_name: &str, raw: &[Value]) {
        if let Some(dir) = &self.config.dump_dir {
            let path = dir.join(file_name);
            match handoff::dump_json(&path, raw) {
                Ok(()) => info!(path = %path.display(), "Response saved"),
                Err(e) => warn!(path = %path.display(), error = %e, "Could not save response dump"),
            }
        }
    }
}

/// Ids of listed hotels, skipping the ones without an id
pub fn hotel_ids(hotels: &[HotelRecord]) -> Vec<String> {
    hotels
        .iter()
        .map(|h| h.hotel_id.clone())
        .filter(|id| id != NOT_AVAILABLE && !id.is_empty())
        .collect()
}

pub fn select_flight(flights: &[FlightRecord], plan: TravelPlan) -> Option<FlightRecord> {
    select_by_plan(price_index(flights), plan)
        .ok()
        .map(|(flight, _)| flight.clone())
}

/// Pick a hotel offer and fill in listing details the offer itself lacks
pub fn select_hotel(offers: &[HotelOffer], listing: &[HotelRecord], plan: TravelPlan) -> Option<HotelOffer> {
    let (offer, _) = select_by_plan(price_index(offers), plan).ok()?;
    let mut offer = offer.clone();

    if let Some(listed) = listing.iter().find(|h| h.hotel_id == offer.hotel.hotel_id) {
        let hotel = &mut offer.hotel;
        if hotel.address_line == NOT_AVAILABLE {
            hotel.address_line = listed.address_line.clone();
        }
        if hotel.city_name == NOT_AVAILABLE {
            hotel.city_name = listed.city_name.clone();
        }
        if hotel.rating == NOT_AVAILABLE {
            hotel.rating = listed.rating.clone();
        }
        if hotel.coordinates.is_none() {
            hotel.coordinates = listed.coordinates;
        }
    }

    Some(offer)
}

/// Coordinates of the selected hotel, else of the first listed hotel that has some
pub fn activity_location(selected: Option<&HotelOffer>, listing: &[HotelRecord]) -> Option<(f64, f64)> {
    selected
        .and_then(|offer| offer.hotel.coordinates)
        .or_else(|| listing.iter().find_map(|h| h.coordinates))
}

pub fn priced_activities(activities: &[ActivityRecord]) -> Vec<(ActivityRecord, Decimal)> {
    activities.iter().map(|a| (a.clone(), a.price)).collect()
}
