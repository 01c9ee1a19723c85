//! Plain-text console blocks for flights, hotels, activities and budgets

use crate::budget::BudgetBreakdown;
use crate::selection::ActivityChoice;
use crate::{ActivityRecord, DisplayRecord, FlightRecord, HotelOffer, HotelRecord};

fn separator() -> String {
    "-".repeat(50)
}

/// Header, indented detail lines, then the separator
fn block(header: &str, lines: Vec<String>) -> String {
    let mut out = format!("{}\n", header);
    for line in lines {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&separator());
    out.push('\n');
    out
}

fn flight_block(header: &str, flight: &FlightRecord) -> String {
    block(
        header,
        vec![
            format!("Airline: {}", flight.airline),
            format!("Departure: {} ({})", flight.departure_city, flight.departure_airport),
            format!("Destination: {} ({})", flight.arrival_city, flight.arrival_airport),
            format!("Departure Time: {}", flight.departure_time),
            format!("Arrival Time: {}", flight.arrival_time),
            format!("Duration: {}", flight.duration),
            format!("Price: {} {}", flight.price, flight.currency),
        ],
    )
}

fn hotel_block(header: &str, hotel: &HotelRecord, with_id: bool) -> String {
    let mut lines = vec![
        format!("Name: {}", hotel.name),
        format!("Address: {}, {}", hotel.address_line, hotel.city_name),
        format!("Rating: {}", hotel.rating),
    ];
    if with_id {
        lines.push(format!("Hotel ID: {}", hotel.hotel_id));
    }
    block(header, lines)
}

fn activity_lines(activity: &ActivityRecord) -> Vec<String> {
    vec![
        format!("Name: {}", activity.name),
        format!("Description: {}", activity.description),
        format!("Price: {} {}", activity.price, activity.currency),
    ]
}

pub fn format_flights(flights: &[FlightRecord]) -> String {
    flights
        .iter()
        .enumerate()
        .map(|(i, flight)| flight_block(&format!("Flight {}:", i + 1), flight))
        .collect()
}

pub fn format_selected_flight(flight: &FlightRecord) -> String {
    flight_block("Selected Flight:", flight)
}

pub fn format_hotels(hotels: &[HotelRecord]) -> String {
    hotels
        .iter()
        .enumerate()
        .map(|(i, hotel)| hotel_block(&format!("Hotel {}:", i + 1), hotel, true))
        .collect()
}

pub fn format_selected_hotel(hotel: &HotelRecord) -> String {
    hotel_block("Selected Hotel:", hotel, false)
}

/// One line per priced hotel
pub fn format_hotel_prices(offers: &[HotelOffer]) -> String {
    offers
        .iter()
        .map(|offer| format!("Hotel {} - Price: ${}\n", offer.hotel.name, offer.price))
        .collect()
}

pub fn format_activity(header: &str, activity: &ActivityRecord) -> String {
    block(header, activity_lines(activity))
}

pub fn format_activity_choice(choice: &ActivityChoice<ActivityRecord>) -> String {
    let mut lines = activity_lines(&choice.activity);
    if choice.budget_exceeded {
        lines.push(format!("Exceeds remaining budget by ${:.2}", choice.exceed_amount));
    }
    block("Selected Activity:", lines)
}

pub fn format_budget(breakdown: &BudgetBreakdown) -> String {
    let mut lines = vec![
        format!("Budget: ${}.00", breakdown.budget),
        format!("Flight: ${:.2}", breakdown.flight_cost),
        format!("Hotel: ${:.2}", breakdown.hotel_cost),
        format!("Activity: ${:.2}", breakdown.activity_cost),
        format!("Total: ${:.2}", breakdown.total_cost),
        format!("Remaining: ${:.2}", breakdown.remaining_budget),
    ];
    if breakdown.budget_exceeded {
        lines.push(format!("Over budget by ${:.2}", breakdown.exceed_amount));
    }
    block("Budget Breakdown:", lines)
}

/// Render a mixed list, numbering flights and hotels separately
pub fn render(records: &[DisplayRecord]) -> String {
    let mut flights = 0;
    let mut hotels = 0;
    records
        .iter()
        .map(|record| match record {
            DisplayRecord::Flight(flight) => {
                flights += 1;
                flight_block(&format!("Flight {}:", flights), flight)
            }
            DisplayRecord::Hotel(hotel) => {
                hotels += 1;
                hotel_block(&format!("Hotel {}:", hotels), hotel, true)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NOT_AVAILABLE;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn flight() -> FlightRecord {
        FlightRecord {
            airline: "IB".to_string(),
            departure_city: "MAD".to_string(),
            departure_airport: "MAD".to_string(),
            arrival_city: "ATH".to_string(),
            arrival_airport: "ATH".to_string(),
            departure_time: "2025-11-01T07:00:00".to_string(),
            arrival_time: "2025-11-01T13:10:00".to_string(),
            duration: "PT5H10M".to_string(),
            price: dec!(546.70),
            currency: "EUR".to_string(),
        }
    }

    fn hotel() -> HotelRecord {
        HotelRecord {
            name: "HOTEL ATHENS".to_string(),
            address_line: NOT_AVAILABLE.to_string(),
            city_name: NOT_AVAILABLE.to_string(),
            rating: "3".to_string(),
            hotel_id: "HLATH001".to_string(),
            coordinates: None,
        }
    }

    #[test]
    fn test_format_flights() {
        let text = format_flights(&[flight(), flight()]);
        let expected_block = "  Airline: IB\n\
                              \x20 Departure: MAD (MAD)\n\
                              \x20 Destination: ATH (ATH)\n\
                              \x20 Departure Time: 2025-11-01T07:00:00\n\
                              \x20 Arrival Time: 2025-11-01T13:10:00\n\
                              \x20 Duration: PT5H10M\n\
                              \x20 Price: 546.70 EUR\n";
        assert!(text.starts_with("Flight 1:\n"));
        assert!(text.contains(&format!("Flight 2:\n{}", expected_block)));
        assert_eq!(text.matches(&separator()).count(), 2);
        assert!(text.ends_with(&format!("{}\n", "-".repeat(50))));
    }

    #[test]
    fn test_format_selected_flight() {
        let text = format_selected_flight(&flight());
        assert!(text.starts_with("Selected Flight:\n  Airline: IB\n"));
    }

    #[test]
    fn test_format_hotels_with_defaults() {
        let text = format_hotels(&[hotel()]);
        assert_eq!(
            text,
            format!(
                "Hotel 1:\n  Name: HOTEL ATHENS\n  Address: N/A, N/A\n  Rating: 3\n  Hotel ID: HLATH001\n{}\n",
                "-".repeat(50)
            )
        );
    }

    #[test]
    fn test_format_selected_hotel_has_no_id() {
        let text = format_selected_hotel(&hotel());
        assert!(text.starts_with("Selected Hotel:\n"));
        assert!(!text.contains("Hotel ID"));
    }

    #[test]
    fn test_format_hotel_prices() {
        let offers = vec![HotelOffer { hotel: hotel(), price: dec!(210.50), currency: "EUR".to_string() }];
        assert_eq!(format_hotel_prices(&offers), "Hotel HOTEL ATHENS - Price: $210.50\n");
    }

    #[test]
    fn test_format_budget() {
        let breakdown = BudgetBreakdown::calculate(Some(1500), Some(dec!(300)), Some(dec!(200)), None);
        let text = format_budget(&breakdown);
        assert!(text.contains("  Budget: $1500.00\n"));
        assert!(text.contains("  Remaining: $1000.00\n"));
        assert!(!text.contains("Over budget"));
        assert!(text.ends_with(&format!("{}\n", separator())));
    }

    #[test]
    fn test_format_activity_choice_over_budget() {
        let choice = ActivityChoice {
            activity: ActivityRecord {
                name: "Boat trip".to_string(),
                description: "Sunset cruise".to_string(),
                price: dec!(150),
                currency: "EUR".to_string(),
            },
            price: dec!(150),
            budget_exceeded: true,
            exceed_amount: dec!(40),
        };
        let text = format_activity_choice(&choice);
        assert!(text.starts_with("Selected Activity:\n  Name: Boat trip\n"));
        assert!(text.contains("  Price: 150 EUR\n  Exceeds remaining budget by $40.00\n"));
        assert!(text.ends_with(&format!("{}\n", separator())));
    }

    #[test]
    fn test_format_activity_choice_within_budget() {
        let choice = ActivityChoice {
            activity: ActivityRecord {
                name: "Museum".to_string(),
                description: "Acropolis Museum".to_string(),
                price: dec!(20),
                currency: "EUR".to_string(),
            },
            price: dec!(20),
            budget_exceeded: false,
            exceed_amount: Decimal::ZERO,
        };
        let text = format_activity_choice(&choice);
        assert!(!text.contains("Exceeds"));
        assert!(text.ends_with(&format!("  Price: 20 EUR\n{}\n", separator())));
    }

    #[test]
    fn test_render_mixed() {
        let text = render(&[DisplayRecord::Hotel(hotel()), DisplayRecord::Flight(flight())]);
        assert!(text.starts_with("Hotel 1:\n"));
        assert!(text.contains("Flight 1:\n"));
    }
}
