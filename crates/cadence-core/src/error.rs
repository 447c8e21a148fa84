use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ParseRecurrenceKindError, ParseTimeOfDayError};

/// Errors surfaced while ingesting room schedule input.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid recurrence rule")]
    Validation(#[from] RuleValidationError),

    #[error("Invalid recurrence kind")]
    Kind(#[from] ParseRecurrenceKindError),

    #[error("Invalid time of day")]
    TimeOfDay(#[from] ParseTimeOfDayError),

    #[error("Invalid active range date")]
    Date(#[from] chrono::ParseError),
}

/// Structural problems in a recurrence rule, reported by
/// [`RecurrenceRule::validate`](crate::models::RecurrenceRule::validate).
///
/// These are the checks a rule's owner runs before storing it. The engine
/// itself never raises them: an invalid rule simply produces no occurrences.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuleValidationError {
    #[error("weekdays are required for weekly recurrence")]
    MissingWeekdays,

    #[error("weekly weekdays must be integers between 0 and 6, got {0}")]
    WeekdayOutOfRange(u8),

    #[error("days_of_month are required for monthly recurrence")]
    MissingMonthDays,

    #[error("monthly days must be integers between 1 and 31, got {0}")]
    MonthDayOutOfRange(u8),

    #[error("active range starts {from} but ends {until}")]
    InvertedActiveRange { from: NaiveDate, until: NaiveDate },
}
