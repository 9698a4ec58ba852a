//! Allowance aggregation and the book ceiling.

use rust_decimal::Decimal;

use super::error::AllowanceError;
use super::types::{AllowanceBreakdown, Baseline};
use crate::document::{Document, DocumentCategory, DocumentWindow};
use crate::money;

/// Fixed per-period ceiling on the effective book allowance (PHP 2,000.00),
/// independent of how many documents back it.
pub const BOOK_ALLOWANCE_CAP: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);

/// Pure aggregation of documents and baseline into allowance components.
pub struct AllowanceCalculator;

impl AllowanceCalculator {
    /// Computes the allowance components for `window`'s period.
    ///
    /// Only documents admitted by `window` count. Book-allowance documents
    /// add to the book component, which is capped at [`BOOK_ALLOWANCE_CAP`];
    /// miscellaneous documents add to the uncapped misc component.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a component or the total exceeds
    /// [`money::MAX_AMOUNT`].
    pub fn compute(
        baseline: &Baseline,
        documents: &[Document],
        window: DocumentWindow,
    ) -> Result<AllowanceBreakdown, AllowanceError> {
        let (counted, excluded_documents) = window.partition(documents);

        let book_from_documents =
            Self::sum_category(&counted, DocumentCategory::BookAllowance, "book documents")?;
        let misc_from_documents = Self::sum_category(
            &counted,
            DocumentCategory::MiscellaneousAllowance,
            "miscellaneous documents",
        )?;

        let raw_book = bounded_sum(
            "book",
            [baseline.book.unwrap_or(Decimal::ZERO), book_from_documents],
        )?;
        let book = Self::apply_book_cap(raw_book);
        let misc = bounded_sum(
            "misc",
            [baseline.misc.unwrap_or(Decimal::ZERO), misc_from_documents],
        )?;
        let thesis = baseline.thesis.unwrap_or(Decimal::ZERO);
        let total = bounded_sum("total", [baseline.monthly, book, misc, thesis])?;

        Ok(AllowanceBreakdown {
            monthly: baseline.monthly,
            book_from_documents,
            misc_from_documents,
            raw_book,
            book,
            misc,
            thesis,
            total,
            book_capped: book < raw_book,
            counted_documents: counted.iter().map(|d| d.id).collect(),
            excluded_documents,
        })
    }

    /// `min(raw_book, BOOK_ALLOWANCE_CAP)`.
    #[must_use]
    pub fn apply_book_cap(raw_book: Decimal) -> Decimal {
        raw_book.min(BOOK_ALLOWANCE_CAP)
    }

    fn sum_category(
        documents: &[&Document],
        category: DocumentCategory,
        field: &str,
    ) -> Result<Decimal, AllowanceError> {
        bounded_sum(
            field,
            documents
                .iter()
                .filter(|d| d.category == category)
                .map(|d| d.amount_or_zero()),
        )
    }
}

/// Exact sum that must stay within [`money::MAX_AMOUNT`].
fn bounded_sum<I>(field: &str, amounts: I) -> Result<Decimal, AllowanceError>
where
    I: IntoIterator<Item = Decimal>,
{
    money::checked_sum(amounts)
        .filter(|sum| *sum <= money::MAX_AMOUNT)
        .ok_or_else(|| {
            AllowanceError::Validation(format!("{field} cannot exceed {}", money::MAX_AMOUNT))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{DocumentPeriod, MonthPeriod, PeriodCalendar};
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use stipend_shared::types::{DocumentId, StudentId};

    fn march() -> MonthPeriod {
        MonthPeriod::new(3, 2026).unwrap()
    }

    fn window() -> DocumentWindow {
        DocumentWindow::for_period(&PeriodCalendar::default(), march())
    }

    fn on_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 2, 0, 0).unwrap()
    }

    fn doc(category: DocumentCategory, amount: Decimal, created_at: DateTime<Utc>) -> Document {
        Document {
            id: DocumentId::new(),
            student_id: StudentId::new(),
            category,
            claimed_amount: Some(amount),
            period: DocumentPeriod::Monthly(march()),
            created_at,
        }
    }

    fn baseline(book: Option<Decimal>, misc: Option<Decimal>) -> Baseline {
        Baseline {
            monthly: dec!(5000),
            book,
            misc,
            thesis: None,
        }
    }

    #[test]
    fn test_book_capped_at_ceiling() {
        let docs = vec![doc(DocumentCategory::BookAllowance, dec!(1000), on_time())];
        let result =
            AllowanceCalculator::compute(&baseline(Some(dec!(1500)), None), &docs, window()).unwrap();
        assert_eq!(result.raw_book, dec!(2500));
        assert_eq!(result.book, dec!(2000));
        assert!(result.book_capped);
    }

    #[test]
    fn test_book_below_ceiling_uncapped() {
        let docs = vec![doc(DocumentCategory::BookAllowance, dec!(800), on_time())];
        let result =
            AllowanceCalculator::compute(&baseline(Some(dec!(500)), None), &docs, window()).unwrap();
        assert_eq!(result.book, dec!(1300));
        assert!(!result.book_capped);
    }

    #[test]
    fn test_misc_never_capped() {
        let docs = vec![doc(
            DocumentCategory::MiscellaneousAllowance,
            dec!(5000),
            on_time(),
        )];
        let result =
            AllowanceCalculator::compute(&baseline(None, Some(dec!(5000))), &docs, window()).unwrap();
        assert_eq!(result.misc, dec!(10000));
        assert_eq!(result.total, dec!(15000));
    }

    #[test]
    fn test_scenario_book_receipt_plus_baseline() {
        // PHP 1,200 receipt in March with a PHP 900 baseline caps from 2,100.
        let docs = vec![doc(DocumentCategory::BookAllowance, dec!(1200), on_time())];
        let result =
            AllowanceCalculator::compute(&baseline(Some(dec!(900)), None), &docs, window()).unwrap();
        assert_eq!(result.raw_book, dec!(2100));
        assert_eq!(result.book, dec!(2000));
        assert_eq!(result.total, dec!(7000));
    }

    #[test]
    fn test_other_categories_ignored() {
        let docs = vec![
            doc(DocumentCategory::Receipt, dec!(300), on_time()),
            doc(DocumentCategory::NarrativeReport, dec!(0), on_time()),
        ];
        let result = AllowanceCalculator::compute(&baseline(None, None), &docs, window()).unwrap();
        assert_eq!(result.book, Decimal::ZERO);
        assert_eq!(result.misc, Decimal::ZERO);
        assert_eq!(result.total, dec!(5000));
        assert_eq!(result.counted_documents.len(), 2);
    }

    #[test]
    fn test_late_documents_excluded_unless_extended() {
        let late_at = Utc.with_ymd_and_hms(2026, 5, 4, 0, 0, 0).unwrap();
        let late = doc(DocumentCategory::BookAllowance, dec!(700), late_at);
        let docs = vec![late.clone()];

        let normal = AllowanceCalculator::compute(&baseline(None, None), &docs, window()).unwrap();
        assert_eq!(normal.book, Decimal::ZERO);
        assert_eq!(normal.excluded_documents, vec![late.id]);

        let extended = window().extended_to(Utc.with_ymd_and_hms(2026, 5, 10, 0, 0, 0).unwrap());
        let result = AllowanceCalculator::compute(&baseline(None, None), &docs, extended).unwrap();
        assert_eq!(result.book, dec!(700));
        assert_eq!(result.counted_documents, vec![late.id]);
    }

    #[test]
    fn test_total_is_exact_with_centavos() {
        let docs = vec![
            doc(DocumentCategory::MiscellaneousAllowance, dec!(0.10), on_time()),
            doc(DocumentCategory::MiscellaneousAllowance, dec!(0.20), on_time()),
        ];
        let base = Baseline {
            monthly: dec!(4999.70),
            book: Some(dec!(0.01)),
            misc: None,
            thesis: Some(dec!(1000.99)),
        };
        let result = AllowanceCalculator::compute(&base, &docs, window()).unwrap();
        assert_eq!(result.misc, dec!(0.30));
        assert_eq!(result.total, dec!(6001.00));
    }

    #[test]
    fn test_missing_claimed_amount_counts_as_zero() {
        let mut d = doc(DocumentCategory::BookAllowance, dec!(0), on_time());
        d.claimed_amount = None;
        let result =
            AllowanceCalculator::compute(&baseline(Some(dec!(100)), None), &[d], window()).unwrap();
        assert_eq!(result.book, dec!(100));
    }

    #[test]
    fn test_oversized_baseline_is_a_validation_error() {
        let base = Baseline {
            monthly: Decimal::MAX,
            book: None,
            misc: Some(Decimal::MAX),
            thesis: None,
        };
        let result = AllowanceCalculator::compute(&base, &[], window());
        assert!(matches!(result, Err(AllowanceError::Validation(_))));
    }

    #[test]
    fn test_total_beyond_storage_is_a_validation_error() {
        let base = Baseline {
            monthly: money::MAX_AMOUNT,
            book: None,
            misc: None,
            thesis: Some(dec!(0.01)),
        };
        let result = AllowanceCalculator::compute(&base, &[], window());
        assert!(matches!(result, Err(AllowanceError::Validation(msg)) if msg.starts_with("total")));
    }
}
