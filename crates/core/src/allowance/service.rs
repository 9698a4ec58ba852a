//! Generation rules shared by `generate` and `preview`.

use chrono::{DateTime, Utc};

use super::calculator::AllowanceCalculator;
use super::error::AllowanceError;
use super::types::{AllowanceBreakdown, AllowancePeriod, AllowancePreview, GenerateAllowanceInput};
use crate::document::{Document, DocumentWindow};
use crate::period::{MonthPeriod, PeriodCalendar};

/// Stateless allowance generation rules.
pub struct AllowanceService;

impl AllowanceService {
    /// Rejects any period other than the one generable at `now`.
    ///
    /// # Errors
    ///
    /// Returns `NotGenerableYet` naming both the requested and the eligible period.
    pub fn ensure_generable(
        calendar: &PeriodCalendar,
        period: MonthPeriod,
        now: DateTime<Utc>,
    ) -> Result<(), AllowanceError> {
        let eligible = calendar.generable_period(now);
        if period == eligible {
            Ok(())
        } else {
            Err(AllowanceError::NotGenerableYet {
                requested: period,
                eligible,
            })
        }
    }

    /// The document window for `period`, extended to `open_until` when an
    /// approved late-submission request exists.
    #[must_use]
    pub fn window(
        calendar: &PeriodCalendar,
        period: MonthPeriod,
        open_until: Option<DateTime<Utc>>,
    ) -> DocumentWindow {
        let window = DocumentWindow::for_period(calendar, period);
        match open_until {
            Some(until) => window.extended_to(until),
            None => window,
        }
    }

    /// Computes the breakdown for a validated input.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the amounts overflow the storable range.
    pub fn compute(
        input: &GenerateAllowanceInput,
        period: &AllowancePeriod,
        calendar: &PeriodCalendar,
        documents: &[Document],
        open_until: Option<DateTime<Utc>>,
    ) -> Result<AllowanceBreakdown, AllowanceError> {
        let window = Self::window(calendar, period.period, open_until);
        AllowanceCalculator::compute(&input.baseline, documents, window)
    }

    /// Builds a preview. Does not enforce the generation gate; reports it.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the input is malformed.
    pub fn preview(
        input: &GenerateAllowanceInput,
        calendar: &PeriodCalendar,
        documents: &[Document],
        open_until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<AllowancePreview, AllowanceError> {
        let period = input.validate()?;
        let breakdown = Self::compute(input, &period, calendar, documents, open_until)?;
        let eligible_period = calendar.generable_period(now);
        Ok(AllowancePreview {
            student_id: input.student_id,
            period,
            breakdown,
            generable: period.period == eligible_period,
            eligible_period,
        })
    }
}
