//! Property-based tests for the generation gate.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use super::gate::{generable_period, is_generable};
use super::types::MonthPeriod;

fn arb_reference_date() -> impl Strategy<Value = NaiveDate> {
    (2001i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Exactly one (month, year) in the surrounding three years is generable.
    #[test]
    fn prop_exactly_one_period_is_generable(reference in arb_reference_date()) {
        let year = reference.year();
        let count = (year - 1..=year + 1)
            .flat_map(|y| (1u32..=12).map(move |m| (m, y)))
            .filter(|&(m, y)| is_generable(m, y, reference))
            .count();
        prop_assert_eq!(count, 1);
    }

    /// The generable period is always the one right before the reference month.
    #[test]
    fn prop_generable_period_precedes_reference_month(reference in arb_reference_date()) {
        let eligible = generable_period(reference);
        prop_assert_eq!(eligible.next(), MonthPeriod::containing(reference));
        prop_assert!(eligible.first_day() < reference);
    }

    /// previous() and next() are inverses.
    #[test]
    fn prop_previous_next_round_trip(month in 1u32..=12, year in 2001i32..2100) {
        let period = MonthPeriod::new(month, year).unwrap();
        prop_assert_eq!(period.previous().next(), period);
        prop_assert_eq!(period.next().previous(), period);
    }
}
