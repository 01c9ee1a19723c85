//! Flattening of raw travel API records into display records
//!
//! Flight offers are expected to be complete and fail on any missing field.
//! Hotel and activity records are read defensively and fall back to sentinels.

use crate::{
    ActivityRecord, DisplayRecord, FlightRecord, HotelOffer, HotelRecord, OfferKind, PlannerError,
    NOT_AVAILABLE,
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

/// Normalize one raw record of the given kind
pub fn normalize(raw: &Value, kind: OfferKind) -> Result<DisplayRecord, PlannerError> {
    match kind {
        OfferKind::Flight => normalize_flight(raw).map(DisplayRecord::Flight),
        OfferKind::Hotel => Ok(DisplayRecord::Hotel(normalize_hotel(raw))),
    }
}

/// Normalize a flight offer from its first itinerary
pub fn normalize_flight(raw: &Value) -> Result<FlightRecord, PlannerError> {
    let itinerary = required(raw, "/itineraries/0")?;
    let segments = required(itinerary, "/segments")?
        .as_array()
        .ok_or_else(|| PlannerError::MissingField("itineraries/0/segments".to_string()))?;

    let first = segments
        .first()
        .ok_or_else(|| PlannerError::MissingField("itineraries/0/segments/0".to_string()))?;
    // Direct flights have a single segment
    let last = segments.last().unwrap_or(first);

    let departure_code = required_str(first, "/departure/iataCode")?;
    let arrival_code = required_str(last, "/arrival/iataCode")?;
    let price_text = required_str(raw, "/price/grandTotal")?;

    Ok(FlightRecord {
        airline: required_str(first, "/carrierCode")?,
        departure_city: departure_code.clone(),
        departure_airport: departure_code,
        arrival_city: arrival_code.clone(),
        arrival_airport: arrival_code,
        departure_time: required_str(first, "/departure/at")?,
        arrival_time: required_str(last, "/arrival/at")?,
        duration: required_str(itinerary, "/duration")?,
        price: parse_price(&price_text)?,
        currency: required_str(raw, "/price/currency")?,
    })
}

/// Normalize every flight offer, skipping the ones that are incomplete
pub fn normalize_flights(raw: &[Value]) -> Vec<FlightRecord> {
    raw.iter()
        .enumerate()
        .filter_map(|(i, offer)| match normalize_flight(offer) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = i, error = %e, "Skipping incomplete flight offer");
                None
            }
        })
        .collect()
}

/// Normalize a hotel listing entry; absent fields become "N/A"
pub fn normalize_hotel(raw: &Value) -> HotelRecord {
    let address = raw.get("address");

    let address_line = address
        .and_then(|a| a.pointer("/lines/0"))
        .and_then(scalar_to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let city_name = address
        .and_then(|a| a.get("cityName"))
        .and_then(scalar_to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let coordinates = raw.get("geoCode").and_then(|geo| {
        let latitude = geo.get("latitude")?.as_f64()?;
        let longitude = geo.get("longitude")?.as_f64()?;
        Some((latitude, longitude))
    });

    HotelRecord {
        name: optional_str(raw, "name"),
        address_line,
        city_name,
        rating: optional_str(raw, "rating"),
        hotel_id: optional_str(raw, "hotelId"),
        coordinates,
    }
}

pub fn normalize_hotels(raw: &[Value]) -> Vec<HotelRecord> {
    raw.iter().map(normalize_hotel).collect()
}

/// Normalize a hotel-offers entry to the hotel and its first offer's price
///
/// Returns `None` when the hotel has no offers or the first offer has no usable total.
pub fn normalize_hotel_offer(raw: &Value) -> Option<HotelOffer> {
    let hotel = raw
        .get("hotel")
        .map(normalize_hotel)
        .unwrap_or_else(|| normalize_hotel(&Value::Null));

    let first_offer = match raw.pointer("/offers/0") {
        Some(offer) => offer,
        None => {
            debug!(hotel = %hotel.name, "Hotel has no offers");
            return None;
        }
    };

    let total = match first_offer.pointer("/price/total").and_then(scalar_to_string) {
        Some(total) => total,
        None => {
            warn!(hotel = %hotel.name, "Missing price data for hotel");
            return None;
        }
    };

    let price = match parse_price(&total) {
        Ok(price) => price,
        Err(e) => {
            warn!(hotel = %hotel.name, error = %e, "Unreadable price for hotel");
            return None;
        }
    };

    let currency = first_offer
        .pointer("/price/currency")
        .and_then(scalar_to_string)
        .unwrap_or_else(|| "USD".to_string());

    Some(HotelOffer { hotel, price, currency })
}

/// Normalize an activity; absent fields get descriptive defaults
pub fn normalize_activity(raw: &Value) -> ActivityRecord {
    let price = raw
        .pointer("/price/amount")
        .and_then(scalar_to_string)
        .and_then(|amount| parse_price(&amount).ok())
        .unwrap_or(Decimal::ZERO);

    ActivityRecord {
        name: raw
            .get("name")
            .and_then(scalar_to_string)
            .unwrap_or_else(|| "Unknown Activity".to_string()),
        description: raw
            .get("shortDescription")
            .or_else(|| raw.get("description"))
            .and_then(scalar_to_string)
            .unwrap_or_else(|| "No description available".to_string()),
        price,
        currency: raw
            .pointer("/price/currencyCode")
            .and_then(scalar_to_string)
            .unwrap_or_else(|| "USD".to_string()),
    }
}

/// Parse an API decimal string such as "546.70"
pub fn parse_price(text: &str) -> Result<Decimal, PlannerError> {
    Decimal::from_str(text.trim()).map_err(|_| PlannerError::InvalidPrice(text.to_string()))
}

fn required<'a>(value: &'a Value, pointer: &str) -> Result<&'a Value, PlannerError> {
    value
        .pointer(pointer)
        .filter(|v| !v.is_null())
        .ok_or_else(|| PlannerError::MissingField(pointer.trim_start_matches('/').to_string()))
}

fn required_str(value: &Value, pointer: &str) -> Result<String, PlannerError> {
    required(value, pointer).and_then(|v| {
        scalar_to_string(v)
            .ok_or_else(|| PlannerError::MissingField(pointer.trim_start_matches('/').to_string()))
    })
}

fn optional_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(scalar_to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn flight_offer() -> Value {
        json!({
            "id": "1",
            "itineraries": [{
                "duration": "PT5H10M",
                "segments": [
                    {
                        "carrierCode": "IB",
                        "departure": { "iataCode": "MAD", "at": "2025-11-01T07:00:00" },
                        "arrival": { "iataCode": "BCN", "at": "2025-11-01T08:20:00" }
                    },
                    {
                        "carrierCode": "VY",
                        "departure": { "iataCode": "BCN", "at": "2025-11-01T09:30:00" },
                        "arrival": { "iataCode": "ATH", "at": "2025-11-01T13:10:00" }
                    }
                ]
            }],
            "price": { "currency": "EUR", "grandTotal": "546.70" }
        })
    }

    #[test]
    fn test_normalize_flight_uses_first_and_last_segment() {
        let record = normalize_flight(&flight_offer()).unwrap();
        assert_eq!(record.airline, "IB");
        assert_eq!(record.departure_city, "MAD");
        assert_eq!(record.departure_airport, "MAD");
        assert_eq!(record.arrival_city, "ATH");
        assert_eq!(record.arrival_airport, "ATH");
        assert_eq!(record.departure_time, "2025-11-01T07:00:00");
        assert_eq!(record.arrival_time, "2025-11-01T13:10:00");
        assert_eq!(record.duration, "PT5H10M");
        assert_eq!(record.price, dec!(546.70));
        assert_eq!(record.currency, "EUR");
    }

    #[test]
    fn test_normalize_flight_missing_segment_field() {
        let mut offer = flight_offer();
        offer["itineraries"][0]["segments"][1]["arrival"]
            .as_object_mut()
            .unwrap()
            .remove("at");

        match normalize_flight(&offer) {
            Err(PlannerError::MissingField(field)) => assert_eq!(field, "arrival/at"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_flight_without_itineraries() {
        let offer = json!({ "price": { "currency": "EUR", "grandTotal": "10.00" } });
        assert!(matches!(normalize_flight(&offer), Err(PlannerError::MissingField(_))));
    }

    #[test]
    fn test_normalize_flight_bad_price() {
        let mut offer = flight_offer();
        offer["price"]["grandTotal"] = json!("about 500");
        assert!(matches!(normalize_flight(&offer), Err(PlannerError::InvalidPrice(_))));
    }

    #[test]
    fn test_normalize_flights_skips_incomplete() {
        let offers = vec![flight_offer(), json!({ "id": "broken" }), flight_offer()];
        assert_eq!(normalize_flights(&offers).len(), 2);
    }

    #[test]
    fn test_normalize_hotel_without_address() {
        let hotel = normalize_hotel(&json!({ "name": "HOTEL ATHENS", "hotelId": "HLATH001" }));
        assert_eq!(hotel.name, "HOTEL ATHENS");
        assert_eq!(hotel.address_line, NOT_AVAILABLE);
        assert_eq!(hotel.city_name, NOT_AVAILABLE);
        assert_eq!(hotel.rating, NOT_AVAILABLE);
        assert_eq!(hotel.hotel_id, "HLATH001");
        assert_eq!(hotel.coordinates, None);
    }

    #[test]
    fn test_normalize_hotel_full_record() {
        let hotel = normalize_hotel(&json!({
            "name": "ACROPOLIS VIEW",
            "hotelId": "HLATH002",
            "rating": 4,
            "address": { "lines": ["10 WEBSTER ST"], "cityName": "ATHENS", "countryCode": "GR" },
            "geoCode": { "latitude": 37.9715, "longitude": 23.7257 }
        }));
        assert_eq!(hotel.address_line, "10 WEBSTER ST");
        assert_eq!(hotel.city_name, "ATHENS");
        assert_eq!(hotel.rating, "4");
        assert_eq!(hotel.coordinates, Some((37.9715, 23.7257)));
    }

    #[test]
    fn test_normalize_hotel_address_without_lines() {
        let hotel = normalize_hotel(&json!({ "address": { "cityName": "ATHENS" } }));
        assert_eq!(hotel.name, NOT_AVAILABLE);
        assert_eq!(hotel.address_line, NOT_AVAILABLE);
        assert_eq!(hotel.city_name, "ATHENS");
    }

    #[test]
    fn test_normalize_hotel_offer() {
        let offer = normalize_hotel_offer(&json!({
            "hotel": { "hotelId": "HLATH001", "name": "HOTEL ATHENS" },
            "offers": [
                { "price": { "currency": "EUR", "total": "210.50" } },
                { "price": { "currency": "EUR", "total": "99.00" } }
            ]
        }))
        .unwrap();
        assert_eq!(offer.hotel.name, "HOTEL ATHENS");
        assert_eq!(offer.price, dec!(210.50));
        assert_eq!(offer.currency, "EUR");
    }

    #[test]
    fn test_normalize_hotel_offer_without_price() {
        assert!(normalize_hotel_offer(&json!({ "hotel": { "name": "EMPTY" }, "offers": [] })).is_none());
        assert!(normalize_hotel_offer(&json!({
            "hotel": { "name": "NO TOTAL" },
            "offers": [{ "price": { "currency": "EUR" } }]
        }))
        .is_none());
    }

    #[test]
    fn test_normalize_activity_defaults() {
        let activity = normalize_activity(&json!({}));
        assert_eq!(activity.name, "Unknown Activity");
        assert_eq!(activity.description, "No description available");
        assert_eq!(activity.price, Decimal::ZERO);
        assert_eq!(activity.currency, "USD");

        let activity = normalize_activity(&json!({
            "name": "Acropolis tour",
            "shortDescription": "Guided walk",
            "price": { "amount": "45.00", "currencyCode": "EUR" }
        }));
        assert_eq!(activity.name, "Acropolis tour");
        assert_eq!(activity.description, "Guided walk");
        assert_eq!(activity.price, dec!(45.00));
        assert_eq!(activity.currency, "EUR");
    }

    #[test]
    fn test_normalize_dispatch() {
        let record = normalize(&json!({ "name": "X" }), OfferKind::Hotel).unwrap();
        assert_eq!(record.kind(), OfferKind::Hotel);
        assert!(normalize(&json!({}), OfferKind::Flight).is_err());
    }
}
