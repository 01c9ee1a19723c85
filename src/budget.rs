//! Budget extraction and remaining-budget arithmetic

use crate::PlannerError;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static AMOUNT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)").expect("amount token pattern is valid")
});

/// Extract the whole-dollar amount that follows the last `$` in a line
///
/// `"Budget: $1500"` and `"Budget: $1,500"` both yield `1500`. Amounts with
/// cents or any other trailing characters are rejected.
pub fn extract_budget_amount(line: &str) -> Result<u64, PlannerError> {
    let marker = line
        .rfind('$')
        .ok_or_else(|| PlannerError::BudgetMarkerNotFound(line.to_string()))?;

    let token = AMOUNT_TOKEN
        .captures(&line[marker + 1..])
        .and_then(|c| c.get(1))
        .ok_or_else(|| PlannerError::InvalidBudgetAmount(line.to_string()))?;

    let digits = token.as_str().replace(',', "");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PlannerError::InvalidBudgetAmount(line.to_string()));
    }

    digits
        .parse::<u64>()
        .map_err(|e| PlannerError::InvalidBudgetAmount(format!("{}: {}", line, e)))
}

/// Budget left after paying for the flight and the hotel
pub fn remaining_budget(budget: u64, flight_price: Decimal, hotel_price: Decimal) -> Decimal {
    Decimal::from(budget) - flight_price - hotel_price
}

/// Cost summary of the picked flight, hotel and activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub budget: u64,
    pub flight_cost: Decimal,
    pub hotel_cost: Decimal,
    pub activity_cost: Decimal,
    pub total_cost: Decimal,
    pub remaining_budget: Decimal,
    pub budget_exceeded: bool,
    pub exceed_amount: Decimal,
}

impl BudgetBreakdown {
    /// Missing selections cost nothing; a zero budget is never "exceeded"
    pub fn calculate(
        budget: Option<u64>,
        flight: Option<Decimal>,
        hotel: Option<Decimal>,
        activity: Option<Decimal>,
    ) -> Self {
        let flight_cost = flight.unwrap_or(Decimal::ZERO);
        let hotel_cost = hotel.unwrap_or(Decimal::ZERO);
        let activity_cost = activity.unwrap_or(Decimal::ZERO);
        let total_cost = flight_cost + hotel_cost + activity_cost;

        let budget = budget.unwrap_or(0);
        let user_budget = Decimal::from(budget);
        let budget_exceeded = total_cost > user_budget && budget > 0;

        Self {
            budget,
            flight_cost,
            hotel_cost,
            activity_cost,
            total_cost,
            remaining_budget: user_budget - total_cost,
            budget_exceeded,
            exceed_amount: if budget_exceeded { total_cost - user_budget } else { Decimal::ZERO },
        }
    }
}
