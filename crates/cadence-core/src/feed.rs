use chrono::{DateTime, Duration, Utc};

use crate::models::{FeedConfig, NextMeeting, Occurrence, Room, UpcomingEvent};
use crate::recurrence::next_occurrence;

/// Enumerates every occurrence across `rooms` inside the feed window.
///
/// # Arguments
/// * `rooms` - Rooms whose rules are expanded; rules are read-only
/// * `config` - Window length; [`FeedConfig::default`] gives 30 days
/// * `from` - Reference instant opening the window
///
/// # Returns
/// * `Vec<Occurrence>` - Every occurrence in `[from, from + window_days]`,
///   ascending by instant with room id as the tie-break
///
/// # Behavior
/// - Each room's walk advances strictly after the previous occurrence, so a
///   room's own occurrences are strictly increasing
/// - A room's `active_until` bounds its walk when tighter than the window end
/// - A room whose rule yields no first occurrence contributes nothing
/// - Stateless: re-invoking with a new reference restarts from scratch
pub fn upcoming_occurrences(
    rooms: &[Room],
    config: &FeedConfig,
    from: DateTime<Utc>,
) -> Vec<Occurrence> {
    let window_end = from + Duration::days(i64::from(config.window_days));
    let mut occurrences = Vec::new();

    for room in rooms {
        for starts_at in room_occurrences(room, from, window_end) {
            occurrences.push(Occurrence {
                room_id: room.id,
                starts_at,
            });
        }
    }

    occurrences.sort_by(|a, b| {
        a.starts_at
            .cmp(&b.starts_at)
            .then_with(|| a.room_id.cmp(&b.room_id))
    });
    occurrences
}

/// Same walk as [`upcoming_occurrences`], decorated with each room's display
/// fields for feed consumers. The engine copies those fields through
/// untouched.
pub fn upcoming_events(
    rooms: &[Room],
    config: &FeedConfig,
    from: DateTime<Utc>,
) -> Vec<UpcomingEvent> {
    let window_end = from + Duration::days(i64::from(config.window_days));
    let mut events = Vec::new();

    for room in rooms {
        for starts_at in room_occurrences(room, from, window_end) {
            events.push(UpcomingEvent {
                room_id: room.id,
                room_name: room.name.clone(),
                category: room.category,
                starts_at,
                meet_link: room.meet_link.clone(),
            });
        }
    }

    events.sort_by(|a, b| {
        a.starts_at
            .cmp(&b.starts_at)
            .then_with(|| a.room_id.cmp(&b.room_id))
    });
    events
}

/// Dashboard digest: each room's single next meeting after `from`.
///
/// Rooms with no next occurrence are dropped; the rest sort ascending by
/// `next_at`, room id breaking ties.
pub fn next_meetings(rooms: &[Room], from: DateTime<Utc>) -> Vec<NextMeeting> {
    let mut meetings: Vec<NextMeeting> = rooms
        .iter()
        .filter_map(|room| {
            next_occurrence(&room.rule, from).map(|next_at| NextMeeting {
                room_id: room.id,
                room_name: room.name.clone(),
                category: room.category,
                meet_link: room.meet_link.clone(),
                time_of_day: room.rule.time_of_day,
                next_at,
            })
        })
        .collect();

    meetings.sort_by(|a, b| {
        a.next_at
            .cmp(&b.next_at)
            .then_with(|| a.room_id.cmp(&b.room_id))
    });
    meetings
}

/// Walks one room's cursor through the window: each step asks for the
/// occurrence strictly after the previous one, never after the original
/// reference, so the walk always moves forward.
fn room_occurrences(
    room: &Room,
    from: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let mut instants = Vec::new();
    let mut cursor = next_occurrence(&room.rule, from);

    while let Some(starts_at) = cursor {
        if starts_at > window_end {
            break;
        }
        instants.push(starts_at);
        cursor = next_occurrence(&room.rule, starts_at);
    }
    instants
}
