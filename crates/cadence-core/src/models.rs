use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{CoreError, RuleValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomCategory {
    Study,
    Build,
    Read,
    Cowork,
    Focus,
    Other,
}

impl fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomCategory::Study => write!(f, "study"),
            RoomCategory::Build => write!(f, "build"),
            RoomCategory::Read => write!(f, "read"),
            RoomCategory::Cowork => write!(f, "cowork"),
            RoomCategory::Focus => write!(f, "focus"),
            RoomCategory::Other => write!(f, "other"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid room category: {0}")]
pub struct ParseRoomCategoryError(String);

impl FromStr for RoomCategory {
    type Err = ParseRoomCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "study" => Ok(RoomCategory::Study),
            "build" => Ok(RoomCategory::Build),
            "read" => Ok(RoomCategory::Read),
            "cowork" => Ok(RoomCategory::Cowork),
            "focus" => Ok(RoomCategory::Focus),
            "other" => Ok(RoomCategory::Other),
            _ => Err(ParseRoomCategoryError(s.to_string())),
        }
    }
}

/// How often a room's event repeats. Exactly one kind per rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceKind::Daily => write!(f, "daily"),
            RecurrenceKind::Weekly => write!(f, "weekly"),
            RecurrenceKind::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence kind: {0}")]
pub struct ParseRecurrenceKindError(String);

impl FromStr for RecurrenceKind {
    type Err = ParseRecurrenceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            _ => Err(ParseRecurrenceKindError(s.to_string())),
        }
    }
}

/// Wall-clock time within a calendar day at which a room's event fires.
///
/// Exchanged as the zero-padded `"HH:MM"` string the rest of the system uses;
/// out-of-range values are unrepresentable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ParseTimeOfDayError> {
        if hour > 23 || minute > 59 {
            return Err(ParseTimeOfDayError(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self { hour: 0, minute: 0 }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid time of day: {0}")]
pub struct ParseTimeOfDayError(String);

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTimeOfDayError(s.to_string());
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseTimeOfDayError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// Declarative description of when a room's repeating event occurs.
///
/// The engine treats a rule as untrusted state: day numbers that can never
/// match a real calendar day are ignored, and a rule whose required day set
/// is empty produces no occurrences rather than an error. Owners that want
/// structured diagnostics run [`RecurrenceRule::validate`] before storing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub kind: RecurrenceKind,
    pub time_of_day: TimeOfDay,
    /// Weekday numbers 0-6, 0 = Sunday. Required for weekly rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<u8>,
    /// Days of month 1-31. Required for monthly rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_month: Vec<u8>,
    /// Inclusive first calendar day on which the rule is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_from: Option<NaiveDate>,
    /// Inclusive last calendar day on which the rule is active (through
    /// 23:59:59 of that date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_until: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn daily(time_of_day: TimeOfDay) -> Self {
        Self {
            kind: RecurrenceKind::Daily,
            time_of_day,
            weekdays: Vec::new(),
            days_of_month: Vec::new(),
            active_from: None,
            active_until: None,
        }
    }

    pub fn weekly(time_of_day: TimeOfDay, weekdays: Vec<u8>) -> Self {
        Self {
            kind: RecurrenceKind::Weekly,
            time_of_day,
            weekdays,
            days_of_month: Vec::new(),
            active_from: None,
            active_until: None,
        }
    }

    pub fn monthly(time_of_day: TimeOfDay, days_of_month: Vec<u8>) -> Self {
        Self {
            kind: RecurrenceKind::Monthly,
            time_of_day,
            weekdays: Vec::new(),
            days_of_month,
            active_from: None,
            active_until: None,
        }
    }

    /// Builds and validates a rule from the wire-shaped fields the room
    /// ingestion layer receives: a kind name, an `"HH:MM"` time, the day
    /// numbers for the kind, and optional ISO `YYYY-MM-DD` range bounds.
    ///
    /// Daily rules ignore `days`; weekly and monthly rules take them as
    /// their weekday / day-of-month set.
    pub fn from_parts(
        kind: &str,
        time_of_day: &str,
        days: &[u8],
        active_from: Option<&str>,
        active_until: Option<&str>,
    ) -> Result<Self, CoreError> {
        let kind: RecurrenceKind = kind.parse()?;
        let time_of_day: TimeOfDay = time_of_day.parse()?;
        let active_from = active_from.map(|s| s.parse::<NaiveDate>()).transpose()?;
        let active_until = active_until.map(|s| s.parse::<NaiveDate>()).transpose()?;

        let rule = Self {
            kind,
            time_of_day,
            weekdays: match kind {
                RecurrenceKind::Weekly => days.to_vec(),
                _ => Vec::new(),
            },
            days_of_month: match kind {
                RecurrenceKind::Monthly => days.to_vec(),
                _ => Vec::new(),
            },
            active_from,
            active_until,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Checks the structural invariants a rule's owner is expected to hold.
    ///
    /// The engine never requires this: an invalid rule fed to evaluation
    /// yields no occurrences instead of failing.
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        match self.kind {
            RecurrenceKind::Daily => {}
            RecurrenceKind::Weekly => {
                if self.weekdays.is_empty() {
                    return Err(RuleValidationError::MissingWeekdays);
                }
                if let Some(&day) = self.weekdays.iter().find(|day| **day > 6) {
                    return Err(RuleValidationError::WeekdayOutOfRange(day));
                }
            }
            RecurrenceKind::Monthly => {
                if self.days_of_month.is_empty() {
                    return Err(RuleValidationError::MissingMonthDays);
                }
                if let Some(&day) = self
                    .days_of_month
                    .iter()
                    .find(|day| **day < 1 || **day > 31)
                {
                    return Err(RuleValidationError::MonthDayOutOfRange(day));
                }
            }
        }

        if let (Some(from), Some(until)) = (self.active_from, self.active_until) {
            if from > until {
                return Err(RuleValidationError::InvertedActiveRange { from, until });
            }
        }
        Ok(())
    }
}

/// A room whose schedule the engine evaluates.
///
/// Display fields (name, category, link, image) pass through occurrence
/// records untouched; only `rule` participates in evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: RoomCategory,
    pub meet_link: String,
    pub image_url: Option<String>,
    pub rule: RecurrenceRule,
    pub created_at: DateTime<Utc>,
}

impl Default for Room {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            name: "".to_string(),
            description: None,
            category: RoomCategory::Other,
            meet_link: "".to_string(),
            image_url: None,
            rule: RecurrenceRule::daily(TimeOfDay::default()),
            created_at: Utc::now(),
        }
    }
}

/// One concrete future instant at which a room's rule fires.
/// Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub room_id: Uuid,
    pub starts_at: DateTime<Utc>,
}

/// An occurrence decorated with its room's display fields, ready for
/// feed-style consumers (upcoming-events lists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub room_id: Uuid,
    pub room_name: String,
    pub category: RoomCategory,
    pub starts_at: DateTime<Utc>,
    pub meet_link: String,
}

/// Per-room dashboard digest: the single next meeting of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextMeeting {
    pub room_id: Uuid,
    pub room_name: String,
    pub category: RoomCategory,
    pub meet_link: String,
    pub time_of_day: TimeOfDay,
    pub next_at: DateTime<Utc>,
}

/// Configuration for upcoming-event enumeration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Enumeration window in days from the reference instant.
    pub window_days: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { window_days: 30 }
    }
}
