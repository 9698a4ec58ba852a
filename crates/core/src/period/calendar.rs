//! Time-zone aware period calendar.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::PeriodError;
use super::gate::generable_period;
use super::types::MonthPeriod;

/// Upper bound on a skipped stretch of local time, in minutes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Resolves "today" and period boundaries in the scholarship office's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCalendar {
    tz: Tz,
}

impl Default for PeriodCalendar {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Manila)
    }
}

impl PeriodCalendar {
    /// Creates a calendar for the given zone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a calendar from an IANA zone name.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::UnknownTimezone` for unrecognised names.
    pub fn from_name(name: &str) -> Result<Self, PeriodError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| PeriodError::UnknownTimezone(name.to_string()))
    }

    /// The configured zone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Local calendar date at `now`.
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// Instant `date` begins locally: midnight, or the end of the DST gap
    /// when midnight is skipped.
    #[must_use]
    pub fn start_of(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        (0..=MAX_GAP_MINUTES)
            .map(|minutes| midnight + TimeDelta::minutes(minutes))
            .find_map(|local| self.tz.from_local_datetime(&local).earliest())
            .map_or_else(|| midnight.and_utc(), |start| start.with_timezone(&Utc))
    }

    /// Instant the period begins.
    #[must_use]
    pub fn period_start(&self, period: MonthPeriod) -> DateTime<Utc> {
        self.start_of(period.first_day())
    }

    /// Instant the normal document window for `period` closes (exclusive).
    #[must_use]
    pub fn cutoff(&self, period: MonthPeriod) -> DateTime<Utc> {
        self.start_of(period.cutoff_date())
    }

    /// The period generable at `now`.
    #[must_use]
    pub fn generable_period(&self, now: DateTime<Utc>) -> MonthPeriod {
        generable_period(self.today(now))
    }

    /// Returns true if `period` may be generated at `now`.
    #[must_use]
    pub fn is_generable(&self, period: MonthPeriod, now: DateTime<Utc>) -> bool {
        self.generable_period(now) == period
    }
}
