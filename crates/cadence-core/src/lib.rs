//! # Cadence Core Library
//!
//! Recurrence scheduling core for the Cadence room scheduler: given each
//! room's recurrence rule, computes the single next meeting strictly after a
//! reference instant and enumerates merged, time-ordered upcoming events
//! across many rooms for dashboards and feeds.
//!
//! ## Features
//!
//! - **Three Recurrence Kinds**: daily, weekly (weekday sets with wraparound)
//!   and monthly (day-of-month sets; nonexistent days are skipped, never
//!   clamped)
//! - **Strict Futurity**: "next" always means strictly after the reference
//!   instant, so an event never re-triggers at the moment it starts
//! - **Bounded Evaluation**: every path terminates — windows bound the feed
//!   walk, and monthly scans stop at a named 24-month horizon
//! - **Deterministic Output**: one UTC clock domain, ascending ordering with
//!   an explicit room-id tie-break, no hidden state, no clock reads
//! - **Defensive by Construction**: malformed rules produce no occurrences
//!   instead of errors; validation is a separate, optional surface
//!
//! ## Core Modules
//!
//! - [`models`]: Rooms, recurrence rules and the occurrence/feed records
//! - [`recurrence`]: The rule evaluator ([`recurrence::next_occurrence`])
//! - [`feed`]: The occurrence enumerator and dashboard digest
//! - [`error`]: Ingestion and validation error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cadence_core::feed;
//! use cadence_core::models::{FeedConfig, RecurrenceRule, Room, RoomCategory, TimeOfDay};
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> Result<(), cadence_core::models::ParseTimeOfDayError> {
//! let time = "18:30".parse::<TimeOfDay>()?;
//! let room = Room {
//!     name: "Evening book club".to_string(),
//!     category: RoomCategory::Read,
//!     meet_link: "https://meet.example.com/book-club".to_string(),
//!     rule: RecurrenceRule::weekly(time, vec![2, 4]), // Tuesdays and Thursdays
//!     ..Room::default()
//! };
//!
//! let reference = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
//! let next = cadence_core::recurrence::next_occurrence(&room.rule, reference);
//! assert_eq!(next, Some(Utc.with_ymd_and_hms(2024, 1, 2, 18, 30, 0).unwrap()));
//!
//! let events = feed::upcoming_events(&[room], &FeedConfig::default(), reference);
//! assert_eq!(events.len(), 9); // Tue/Thu slots inside the 30-day window
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod feed;
pub mod models;
pub mod recurrence;
