//! Picking a representative offer out of a priced list

use crate::{PlannerError, Priced, TravelPlan};
use rust_decimal::Decimal;

/// Pair every item with its price, keeping fetch order
pub fn price_index<T: Priced>(items: &[T]) -> Vec<(&T, Decimal)> {
    items.iter().map(|item| (item, item.price())).collect()
}

/// Return the offer at sorted rank n/2 (upper median for even n)
///
/// The sort is stable, so offers with equal prices keep their fetch order.
pub fn select_median<T>(offers: Vec<(T, Decimal)>) -> Result<(T, Decimal), PlannerError> {
    select_by_plan(offers, TravelPlan::Business)
}

/// Return the cheapest, median or most expensive offer depending on the plan
pub fn select_by_plan<T>(mut offers: Vec<(T, Decimal)>, plan: TravelPlan) -> Result<(T, Decimal), PlannerError> {
    if offers.is_empty() {
        return Err(PlannerError::NoOffersAvailable);
    }

    offers.sort_by(|a, b| a.1.cmp(&b.1));

    let index = match plan {
        TravelPlan::Economic => 0,
        TravelPlan::Business => offers.len() / 2,
        TravelPlan::Luxury => offers.len() - 1,
    };

    Ok(offers.swap_remove(index))
}

/// Activity picked against whatever budget is left
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityChoice<T> {
    pub activity: T,
    pub price: Decimal,
    pub budget_exceeded: bool,
    pub exceed_amount: Decimal,
}

/// Pick an activity, preferring the ones that still fit in `remaining`
///
/// When nothing fits, the plan pick over all activities is returned together
/// with how far it overshoots.
pub fn select_activity_within_budget<T: Clone>(
    activities: &[(T, Decimal)],
    remaining: Decimal,
    plan: TravelPlan,
) -> Option<ActivityChoice<T>> {
    let affordable: Vec<(T, Decimal)> = activities
        .iter()
        .filter(|(_, price)| *price <= remaining)
        .cloned()
        .collect();

    if !affordable.is_empty() {
        let (activity, price) = select_by_plan(affordable, plan).ok()?;
        return Some(ActivityChoice {
            activity,
            price,
            budget_exceeded: false,
            exceed_amount: Decimal::ZERO,
        });
    }

    let (activity, price) = select_by_plan(activities.to_vec(), plan).ok()?;
    let exceed_amount = (price - remaining).max(Decimal::ZERO);

    Some(ActivityChoice {
        activity,
        price,
        budget_exceeded: exceed_amount > Decimal::ZERO,
        exceed_amount,
    })
}

/// Pick an activity against an optional remaining budget
///
/// Only a positive remaining budget constrains the pick; without one, or once it
/// is used up, the plan pick is taken as is and never flagged as exceeding.
pub fn choose_activity<T: Clone>(
    activities: &[(T, Decimal)],
    remaining: Option<Decimal>,
    plan: TravelPlan,
) -> Option<ActivityChoice<T>> {
    match remaining {
        Some(remaining) if remaining > Decimal::ZERO => {
            select_activity_within_budget(activities, remaining, plan)
        }
        _ => {
            let (activity, price) = select_by_plan(activities.to_vec(), plan).ok()?;
            Some(ActivityChoice {
                activity,
                price,
                budget_exceeded: false,
                exceed_amount: Decimal::ZERO,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn labelled(prices: &[(&'static str, Decimal)]) -> Vec<(&'static str, Decimal)> {
        prices.to_vec()
    }

    #[test]
    fn test_median_of_three() {
        let offers = labelled(&[("a", dec!(10)), ("b", dec!(30)), ("c", dec!(20))]);
        let (label, price) = select_median(offers).unwrap();
        assert_eq!(label, "c");
        assert_eq!(price, dec!(20));
    }

    #[test]
    fn test_median_single_offer() {
        let (label, price) = select_median(labelled(&[("only", dec!(999.99))])).unwrap();
        assert_eq!(label, "only");
        assert_eq!(price, dec!(999.99));
    }

    #[test]
    fn test_median_empty() {
        let offers: Vec<(&str, Decimal)> = Vec::new();
        assert!(matches!(select_median(offers), Err(PlannerError::NoOffersAvailable)));
    }

    #[test]
    fn test_median_even_count_takes_upper() {
        let offers = labelled(&[("a", dec!(40)), ("b", dec!(10)), ("c", dec!(30)), ("d", dec!(20))]);
        let (label, price) = select_median(offers).unwrap();
        assert_eq!(label, "c");
        assert_eq!(price, dec!(30));
    }

    #[test]
    fn test_median_keeps_duplicate_labels() {
        // Same hotel name at different prices: both entries take part in the ranking
        let offers = labelled(&[("Ibis", dec!(80)), ("Ibis", dec!(120)), ("Hilton", dec!(300))]);
        let (label, price) = select_median(offers).unwrap();
        assert_eq!(label, "Ibis");
        assert_eq!(price, dec!(120));
    }

    #[test]
    fn test_median_ties_keep_fetch_order() {
        let offers = labelled(&[("first", dec!(50)), ("second", dec!(50)), ("third", dec!(50))]);
        let (label, _) = select_median(offers).unwrap();
        assert_eq!(label, "second");
    }

    #[test]
    fn test_select_by_plan() {
        let offers = labelled(&[("mid", dec!(20)), ("low", dec!(10)), ("high", dec!(30))]);
        assert_eq!(select_by_plan(offers.clone(), TravelPlan::Economic).unwrap().0, "low");
        assert_eq!(select_by_plan(offers.clone(), TravelPlan::Business).unwrap().0, "mid");
        assert_eq!(select_by_plan(offers, TravelPlan::Luxury).unwrap().0, "high");
    }

    #[test]
    fn test_activity_within_budget() {
        let activities = labelled(&[("museum", dec!(20)), ("boat", dec!(150)), ("walk", dec!(5))]);

        let choice = select_activity_within_budget(&activities, dec!(100), TravelPlan::Luxury).unwrap();
        assert_eq!(choice.activity, "museum");
        assert!(!choice.budget_exceeded);
        assert_eq!(choice.exceed_amount, Decimal::ZERO);
    }

    #[test]
    fn test_activity_over_budget() {
        let activities = labelled(&[("boat", dec!(150)), ("dinner", dec!(90))]);

        let choice = select_activity_within_budget(&activities, dec!(50), TravelPlan::Economic).unwrap();
        assert_eq!(choice.activity, "dinner");
        assert!(choice.budget_exceeded);
        assert_eq!(choice.exceed_amount, dec!(40));
    }

    #[test]
    fn test_activity_none_available() {
        let activities: Vec<(&str, Decimal)> = Vec::new();
        assert!(select_activity_within_budget(&activities, dec!(50), TravelPlan::Business).is_none());
    }

    #[test]
    fn test_choose_activity_with_exhausted_budget() {
        let activities = labelled(&[("boat", dec!(150)), ("dinner", dec!(90)), ("walk", dec!(5))]);

        for remaining in [Some(Decimal::ZERO), Some(dec!(-120)), None] {
            let choice = choose_activity(&activities, remaining, TravelPlan::Business).unwrap();
            assert_eq!(choice.activity, "dinner");
            assert!(!choice.budget_exceeded);
            assert_eq!(choice.exceed_amount, Decimal::ZERO);
        }
    }

    #[test]
    fn test_choose_activity_with_positive_budget() {
        let activities = labelled(&[("boat", dec!(150)), ("dinner", dec!(90))]);

        let choice = choose_activity(&activities, Some(dec!(50)), TravelPlan::Economic).unwrap();
        assert_eq!(choice.activity, "dinner");
        assert!(choice.budget_exceeded);
        assert_eq!(choice.exceed_amount, dec!(40));
    }
}
