//! Period eligibility gate.
//!
//! Generation is permitted for exactly one period per reference date: the
//! calendar month immediately before the reference date's month. The
//! still-open current month and anything older are rejected.

use chrono::NaiveDate;

use super::types::MonthPeriod;

/// The single period that may be generated on `reference`.
#[must_use]
pub fn generable_period(reference: NaiveDate) -> MonthPeriod {
    MonthPeriod::containing(reference).previous()
}

/// Returns true iff (`month`, `year`) is the month immediately preceding
/// `reference`'s month.
#[must_use]
pub fn is_generable(month: u32, year: i32, reference: NaiveDate) -> bool {
    let eligible = generable_period(reference);
    eligible.month() == month && eligible.year() == year
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_january_reference_allows_previous_december() {
        let reference = date(2026, 1, 15);
        assert!(is_generable(12, 2025, reference));
        assert_eq!(generable_period(reference), MonthPeriod::new(12, 2025).unwrap());
    }

    #[test]
    fn test_current_month_is_not_generable() {
        assert!(!is_generable(1, 2026, date(2026, 1, 15)));
    }

    #[test]
    fn test_older_months_are_not_generable() {
        let reference = date(2026, 4, 2);
        assert!(is_generable(3, 2026, reference));
        assert!(!is_generable(2, 2026, reference));
        assert!(!is_generable(3, 2025, reference));
    }

    #[test]
    fn test_future_months_are_not_generable() {
        assert!(!is_generable(5, 2026, date(2026, 4, 30)));
    }

    #[test]
    fn test_first_and_last_day_of_reference_month_agree() {
        assert!(is_generable(2, 2026, date(2026, 3, 1)));
        assert!(is_generable(2, 2026, date(2026, 3, 31)));
    }

    #[test]
    fn test_invalid_month_numbers_are_never_generable() {
        assert!(!is_generable(0, 2026, date(2026, 1, 15)));
        assert!(!is_generable(13, 2025, date(2026, 1, 15)));
    }
}
