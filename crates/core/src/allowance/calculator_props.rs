//! Property tests for allowance aggregation.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use stipend_shared::types::{DocumentId, StudentId};

use crate::allowance::calculator::{AllowanceCalculator, BOOK_ALLOWANCE_CAP};
use crate::allowance::types::Baseline;
use crate::document::{Document, DocumentCategory, DocumentWindow};
use crate::period::{DocumentPeriod, MonthPeriod, PeriodCalendar};

/// Two-decimal peso amounts up to PHP 100,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000).prop_map(|centavos| Decimal::new(centavos, 2))
}

fn arb_category() -> impl Strategy<Value = DocumentCategory> {
    prop::sample::select(DocumentCategory::ALL.to_vec())
}

fn arb_documents() -> impl Strategy<Value = Vec<(DocumentCategory, Decimal, i64)>> {
    // Offsets in hours from 1 March 2026 UTC; up to ~100 days so some fall past cutoff.
    prop::collection::vec((arb_category(), arb_amount(), 0i64..2400), 0..12)
}

fn build(specs: &[(DocumentCategory, Decimal, i64)]) -> Vec<Document> {
    let period = MonthPeriod::new(3, 2026).unwrap();
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    specs
        .iter()
        .map(|(category, amount, hours)| Document {
            id: DocumentId::new(),
            student_id: StudentId::new(),
            category: *category,
            claimed_amount: Some(*amount),
            period: DocumentPeriod::Monthly(period),
            created_at: start + Duration::hours(*hours),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The total always equals the exact sum of the four effective components.
    #[test]
    fn prop_total_is_sum_of_components(
        monthly in arb_amount(),
        book in prop::option::of(arb_amount()),
        misc in prop::option::of(arb_amount()),
        thesis in prop::option::of(arb_amount()),
        specs in arb_documents(),
    ) {
        let baseline = Baseline { monthly, book, misc, thesis };
        let docs = build(&specs);
        let window = DocumentWindow::for_period(&PeriodCalendar::default(), MonthPeriod::new(3, 2026).unwrap());
        let result = AllowanceCalculator::compute(&baseline, &docs, window).unwrap();

        prop_assert_eq!(result.total, result.monthly + result.book + result.misc + result.thesis);
        prop_assert!(result.total.scale() <= 2);
    }

    /// The effective book component never exceeds the ceiling and equals
    /// the raw sum whenever the raw sum is under it.
    #[test]
    fn prop_book_is_capped(
        book in prop::option::of(arb_amount()),
        specs in arb_documents(),
    ) {
        let baseline = Baseline { monthly: Decimal::ZERO, book, misc: None, thesis: None };
        let docs = build(&specs);
        let window = DocumentWindow::for_period(&PeriodCalendar::default(), MonthPeriod::new(3, 2026).unwrap());
        let result = AllowanceCalculator::compute(&baseline, &docs, window).unwrap();

        prop_assert!(result.book <= BOOK_ALLOWANCE_CAP);
        prop_assert_eq!(result.book, result.raw_book.min(BOOK_ALLOWANCE_CAP));
        prop_assert_eq!(result.book_capped, result.raw_book > BOOK_ALLOWANCE_CAP);
        prop_assert_eq!(result.misc, result.misc_from_documents);
    }

    /// Every document is either counted or excluded, never both.
    #[test]
    fn prop_documents_partitioned(specs in arb_documents()) {
        let docs = build(&specs);
        let window = DocumentWindow::for_period(&PeriodCalendar::default(), MonthPeriod::new(3, 2026).unwrap());
        let result = AllowanceCalculator::compute(&Baseline::monthly(Decimal::ZERO), &docs, window).unwrap();

        prop_assert_eq!(result.counted_documents.len() + result.excluded_documents.len(), docs.len());
        for id in &result.counted_documents {
            prop_assert!(!result.excluded_documents.contains(id));
        }
    }
}
