//! Interactive prompt-driven planning session

use crate::budget::{extract_budget_amount, remaining_budget, BudgetBreakdown};
use crate::client::TravelSource;
use crate::handoff;
use crate::planner::{
    activity_location, hotel_ids, priced_activities, select_flight, select_hotel, VacationPlanner,
};
use crate::report;
use crate::selection::choose_activity;
use crate::{FlightQuery, PlannerError, TravelPlan};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every step ran
    Completed,
    /// The traveler declined to continue after the flights
    Quit,
    /// The budget step could not run
    NoBudget,
}

pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, text: &str) -> Result<(), PlannerError> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    /// Print `message` and read one trimmed answer
    pub fn prompt(&mut self, message: &str) -> Result<String, PlannerError> {
        self.say(message)?;
        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(PlannerError::InputError("unexpected end of input".to_string()));
        }
        Ok(answer.trim().to_string())
    }

    /// Ask for origin, destination, date and number of adults
    pub fn read_flight_query(&mut self) -> Result<FlightQuery, PlannerError> {
        let origin = self.prompt("Please enter an origin location code: ")?;
        let destination = self.prompt("Please enter a destination location code: ")?;
        let departure_date = self.prompt("Please enter a departure date in the YYYY-MM-DD format: ")?;
        let adults_text = self.prompt("The number of adult passengers with age 12 or older: ")?;

        let adults = adults_text.parse::<u32>().map_err(|_| {
            PlannerError::InputError(format!("number of adults must be a whole number, got '{}'", adults_text))
        })?;

        FlightQuery::new(&origin, &destination, &departure_date, adults)
    }

    /// Yes/no question; only `y` or `yes` count as yes
    pub fn confirm(&mut self, message: &str) -> Result<bool, PlannerError> {
        let answer = self.prompt(message)?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    /// Run the full interactive flow against `planner`
    pub async fn run<S: TravelSource>(
        &mut self,
        planner: &VacationPlanner<S>,
        plan: TravelPlan,
    ) -> Result<SessionOutcome, PlannerError> {
        self.say("Welcome to the Vacation Planner!\n")?;

        let query = self.read_flight_query()?;
        info!(origin = %query.origin, destination = %query.destination, date = %query.departure_date, "Planning trip");

        // Flights
        let flights = planner.search_flights(&query).await;
        if flights.is_empty() {
            self.say("No flights found.\n")?;
        } else {
            self.say(&report::format_flights(&flights))?;
        }
        let flight = select_flight(&flights, plan);
        if let Some(flight) = &flight {
            self.say(&report::format_selected_flight(flight))?;
        }

        if !self.confirm("Do you want to continue to get the hotel results: \nIf yes, enter 'Y', else, enter 'N' to quit.")? {
            self.say("Program has quit.\n")?;
            return Ok(SessionOutcome::Quit);
        }

        // Hotels
        let (raw_hotels, hotels) = planner.search_hotels(&query.destination).await;
        if hotels.is_empty() {
            self.say("No hotels found.\n")?;
        } else {
            self.say(&report::format_hotels(&hotels))?;
            if let Err(e) = handoff::save_hotel_listing(&planner.config().listing_file, &raw_hotels) {
                warn!(error = %e, "Could not save hotel listing");
            }
        }

        let offers = planner.fetch_hotel_prices(&hotel_ids(&hotels)).await;
        self.say(&report::format_hotel_prices(&offers))?;
        let hotel = select_hotel(&offers, &hotels, plan);
        match &hotel {
            Some(hotel) => self.say(&report::format_selected_hotel(&hotel.hotel))?,
            None => self.say("No hotel prices available.\n")?,
        }

        // Budget
        let input_file = planner.config().input_file.clone();
        let budget_line = match handoff::read_line_starting_with(&input_file, "Budget") {
            Ok(Some(line)) => line,
            Ok(None) => {
                self.say(&format!("No budget found in {}.\n", input_file.display()))?;
                return Ok(SessionOutcome::NoBudget);
            }
            Err(e) => {
                self.say(&format!("Error: could not read {}: {}\n", input_file.display(), e))?;
                return Ok(SessionOutcome::NoBudget);
            }
        };

        let budget = match extract_budget_amount(&budget_line) {
            Ok(amount) => amount,
            Err(e) => {
                self.say(&format!("Error: {}\n", e))?;
                return Ok(SessionOutcome::NoBudget);
            }
        };

        let flight_cost = flight.as_ref().map(|f| f.price).unwrap_or(Decimal::ZERO);
        let hotel_cost = hotel.as_ref().map(|h| h.price).unwrap_or(Decimal::ZERO);
        let remaining = remaining_budget(budget, flight_cost, hotel_cost);

        self.say(&format!("Budget: ${}.00\n", budget))?;
        self.say(&format!(
            "Remaining budget after deducting flight and hotel costs: ${:.2}\n",
            remaining
        ))?;

        // Activities
        let mut activity = None;
        if let Some((latitude, longitude)) = activity_location(hotel.as_ref(), &hotels) {
            let activities = planner.search_activities(latitude, longitude).await;
            activity = choose_activity(&priced_activities(&activities), Some(remaining), plan);
            if let Some(choice) = &activity {
                self.say(&report::format_activity_choice(choice))?;
            }
        }

        let breakdown = BudgetBreakdown::calculate(
            Some(budget),
            flight.as_ref().map(|f| f.price),
            hotel.as_ref().map(|h| h.price),
            activity.as_ref().map(|a| a.price),
        );
        self.say(&report::format_budget(&breakdown))?;

        Ok(SessionOutcome::Completed)
    }
}
