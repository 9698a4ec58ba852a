//! Which documents count toward a period.
//!
//! A monthly document counts toward its period if it was created before the
//! period's cutoff (local midnight starting the first day of the month after
//! the following month) or, when an approved late-submission request exists
//! for the same student and period, no later than that request's `open_until`.

use chrono::{DateTime, Utc};
use stipend_shared::types::DocumentId;

use super::types::Document;
use crate::late_submission::LateSubmissionRequest;
use crate::period::{MonthPeriod, PeriodCalendar};

/// The effective open window for one monthly period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentWindow {
    period: MonthPeriod,
    closes_at: DateTime<Utc>,
    extended_until: Option<DateTime<Utc>>,
}

impl DocumentWindow {
    /// A window closing (exclusive) at `closes_at`.
    #[must_use]
    pub const fn new(period: MonthPeriod, closes_at: DateTime<Utc>) -> Self {
        Self {
            period,
            closes_at,
            extended_until: None,
        }
    }

    /// The normal window for `period` in the calendar's zone.
    #[must_use]
    pub fn for_period(calendar: &PeriodCalendar, period: MonthPeriod) -> Self {
        Self::new(period, calendar.cutoff(period))
    }

    /// Extends the window up to and including `open_until`.
    ///
    /// An earlier extension than one already applied is ignored.
    #[must_use]
    pub fn extended_to(self, open_until: DateTime<Utc>) -> Self {
        let extended_until = match self.extended_until {
            Some(current) if current >= open_until => current,
            _ => open_until,
        };
        Self {
            extended_until: Some(extended_until),
            ..self
        }
    }

    /// Applies a late-submission request if it is approved and for this period.
    #[must_use]
    pub fn with_late_submission(self, request: &LateSubmissionRequest) -> Self {
        if request.period != self.period {
            return self;
        }
        match request.extends_window_until() {
            Some(open_until) => self.extended_to(open_until),
            None => self,
        }
    }

    /// Target period.
    #[must_use]
    pub const fn period(&self) -> MonthPeriod {
        self.period
    }

    /// Normal cutoff (exclusive).
    #[must_use]
    pub const fn closes_at(&self) -> DateTime<Utc> {
        self.closes_at
    }

    /// Late-submission extension (inclusive), if any.
    #[must_use]
    pub const fn extended_until(&self) -> Option<DateTime<Utc>> {
        self.extended_until
    }

    /// Returns true if `document` counts toward this window's period.
    #[must_use]
    pub fn admits(&self, document: &Document) -> bool {
        is_document_eligible(document, *self, None)
    }

    /// Splits documents into those counted and the ids of those excluded.
    #[must_use]
    pub fn partition<'a>(
        &self,
        documents: &'a [Document],
    ) -> (Vec<&'a Document>, Vec<DocumentId>) {
        let mut counted = Vec::new();
        let mut excluded = Vec::new();
        for document in documents {
            if self.admits(document) {
                counted.push(document);
            } else {
                excluded.push(document.id);
            }
        }
        (counted, excluded)
    }
}

/// Returns true if `document` counts toward `window`'s period, taking an
/// optional late-submission request into account.
///
/// The request only applies when it belongs to the document's owner.
#[must_use]
pub fn is_document_eligible(
    document: &Document,
    window: DocumentWindow,
    late_submission: Option<&LateSubmissionRequest>,
) -> bool {
    let window = match late_submission {
        Some(request) if request.student_id == document.student_id => {
            window.with_late_submission(request)
        }
        _ => window,
    };
    if document.period.month_period() != Some(window.period) {
        return false;
    }
    document.created_at < window.closes_at
        || window
            .extended_until
            .is_some_and(|until| document.created_at <= until)
}
