//! Period value types.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::PeriodError;

/// Earliest year accepted from callers.
pub const MIN_YEAR: i32 = 2000;
/// Latest year accepted from callers.
pub const MAX_YEAR: i32 = 2100;

/// A calendar month, the unit of allowance generation.
///
/// Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "MonthPeriodRepr", into = "MonthPeriodRepr")]
pub struct MonthPeriod {
    first_day: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct MonthPeriodRepr {
    month: u32,
    year: i32,
}

impl TryFrom<MonthPeriodRepr> for MonthPeriod {
    type Error = PeriodError;

    fn try_from(repr: MonthPeriodRepr) -> Result<Self, Self::Error> {
        Self::new(repr.month, repr.year)
    }
}

impl From<MonthPeriod> for MonthPeriodRepr {
    fn from(period: MonthPeriod) -> Self {
        Self {
            month: period.month(),
            year: period.year(),
        }
    }
}

impl MonthPeriod {
    /// Builds a period from caller input.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` or `PeriodError::YearOutOfRange`.
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::YearOutOfRange(year));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or(PeriodError::InvalidMonth(month))
    }

    /// The period a calendar date falls in.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }

    /// Month number, 1-12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// First day of the period.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The period immediately before this one.
    #[must_use]
    pub fn previous(&self) -> Self {
        Self {
            first_day: self.first_day - Months::new(1),
        }
    }

    /// The period immediately after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            first_day: self.first_day + Months::new(1),
        }
    }

    /// First day after the normal document window.
    ///
    /// Documents for this period count when created strictly before the
    /// start of this date, i.e. through the end of the following month.
    #[must_use]
    pub fn cutoff_date(&self) -> NaiveDate {
        self.first_day + Months::new(2)
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Academic term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    /// First semester.
    First,
    /// Second semester.
    Second,
    /// Summer term.
    Summer,
}

impl Semester {
    /// Returns the string representation of the semester.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Summer => "summer",
        }
    }

    /// Parses a semester from a string.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::UnknownSemester` for unrecognised names.
    pub fn parse(s: &str) -> Result<Self, PeriodError> {
        match s.to_lowercase().as_str() {
            "first" | "1st" => Ok(Self::First),
            "second" | "2nd" => Ok(Self::Second),
            "summer" => Ok(Self::Summer),
            _ => Err(PeriodError::UnknownSemester(s.to_string())),
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A school-year semester, e.g. first semester of 2025-2026.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemesterPeriod {
    /// School year in `YYYY-YYYY` form.
    pub school_year: String,
    /// Term within the school year.
    pub semester: Semester,
}

impl SemesterPeriod {
    /// Builds a semestral period, validating the school year.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidSchoolYear` if the school year is malformed.
    pub fn new(school_year: &str, semester: Semester) -> Result<Self, PeriodError> {
        let school_year = school_year.trim();
        let invalid = || PeriodError::InvalidSchoolYear(school_year.to_string());

        let (start, end) = school_year.split_once('-').ok_or_else(invalid)?;
        if start.len() != 4 || end.len() != 4 {
            return Err(invalid());
        }
        let start: i32 = start.parse().map_err(|_| invalid())?;
        let end: i32 = end.parse().map_err(|_| invalid())?;
        if end != start + 1 || !(MIN_YEAR..=MAX_YEAR).contains(&start) {
            return Err(invalid());
        }

        Ok(Self {
            school_year: school_year.to_string(),
            semester,
        })
    }
}

/// The period a document is stamped with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentPeriod {
    /// Monthly document, counted toward a monthly allowance.
    Monthly(MonthPeriod),
    /// Semester-scoped document; never part of a monthly aggregate.
    Semestral(SemesterPeriod),
}

impl DocumentPeriod {
    /// Returns true for monthly documents.
    #[must_use]
    pub const fn is_monthly(&self) -> bool {
        matches!(self, Self::Monthly(_))
    }

    /// The monthly period, if any.
    #[must_use]
    pub const fn month_period(&self) -> Option<MonthPeriod> {
        match self {
            Self::Monthly(period) => Some(*period),
            Self::Semestral(_) => None,
        }
    }
}
