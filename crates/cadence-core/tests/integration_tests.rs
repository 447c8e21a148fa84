use cadence_core::error::RuleValidationError;
use cadence_core::feed;
use cadence_core::models::{
    FeedConfig, RecurrenceKind, RecurrenceRule, Room, RoomCategory, TimeOfDay,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

fn tod(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

fn room(name: &str, rule: RecurrenceRule) -> Room {
    Room {
        name: name.to_string(),
        category: RoomCategory::Study,
        meet_link: format!("https://meet.example.com/{name}"),
        rule,
        ..Room::default()
    }
}

#[test]
fn feed_collects_every_daily_slot_in_the_window() {
    let rooms = [room("daily", RecurrenceRule::daily(tod(9, 0)))];
    let config = FeedConfig { window_days: 5 };
    let from = at(2024, 1, 1, 0, 0);

    let occurrences = feed::upcoming_occurrences(&rooms, &config, from);

    let expected: Vec<DateTime<Utc>> = (1..=5).map(|day| at(2024, 1, day, 9, 0)).collect();
    let starts: Vec<DateTime<Utc>> = occurrences.iter().map(|o| o.starts_at).collect();
    assert_eq!(starts, expected);
}

#[test]
fn feed_merges_rooms_in_time_order() {
    let early = room("early", RecurrenceRule::daily(tod(8, 0)));
    let late = room("late", RecurrenceRule::daily(tod(9, 0)));
    let config = FeedConfig { window_days: 2 };
    let from = at(2024, 1, 1, 0, 0);

    let occurrences = feed::upcoming_occurrences(&[late.clone(), early.clone()], &config, from);

    let starts: Vec<DateTime<Utc>> = occurrences.iter().map(|o| o.starts_at).collect();
    assert_eq!(
        starts,
        vec![
            at(2024, 1, 1, 8, 0),
            at(2024, 1, 1, 9, 0),
            at(2024, 1, 2, 8, 0),
            at(2024, 1, 2, 9, 0),
        ]
    );
    assert_eq!(occurrences[0].room_id, early.id);
    assert_eq!(occurrences[1].room_id, late.id);
}

#[test]
fn feed_breaks_same_instant_ties_by_room_id() {
    let a = room("alpha", RecurrenceRule::daily(tod(9, 0)));
    let b = room("beta", RecurrenceRule::daily(tod(9, 0)));
    let config = FeedConfig { window_days: 2 };
    let from = at(2024, 1, 1, 0, 0);

    let occurrences = feed::upcoming_occurrences(&[b.clone(), a.clone()], &config, from);

    assert_eq!(occurrences.len(), 4);
    let (first, second) = if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
    assert_eq!(occurrences[0].starts_at, occurrences[1].starts_at);
    assert_eq!(occurrences[0].room_id, first);
    assert_eq!(occurrences[1].room_id, second);
}

#[test]
fn feed_honors_a_rooms_active_until_inside_the_window() {
    let bounded = Room {
        rule: RecurrenceRule {
            active_until: Some(date(2024, 1, 3)),
            ..RecurrenceRule::daily(tod(9, 0))
        },
        ..room("bounded", RecurrenceRule::daily(tod(9, 0)))
    };
    let config = FeedConfig::default();
    let from = at(2024, 1, 1, 0, 0);

    let occurrences = feed::upcoming_occurrences(&[bounded], &config, from);

    assert_eq!(
        occurrences.iter().map(|o| o.starts_at).collect::<Vec<_>>(),
        vec![
            at(2024, 1, 1, 9, 0),
            at(2024, 1, 2, 9, 0),
            at(2024, 1, 3, 9, 0),
        ]
    );
}

#[test]
fn feed_skips_rooms_that_never_fire() {
    let dead = room("dead", RecurrenceRule::weekly(tod(9, 0), vec![]));
    let live = room("live", RecurrenceRule::daily(tod(9, 0)));
    let config = FeedConfig { window_days: 1 };
    let from = at(2024, 1, 1, 0, 0);

    let occurrences = feed::upcoming_occurrences(&[dead, live.clone()], &config, from);

    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].room_id, live.id);
}

#[test]
fn feed_is_restartable_and_deterministic() {
    let rooms = [
        room("weekly", RecurrenceRule::weekly(tod(14, 0), vec![1, 3, 5])),
        room("monthly", RecurrenceRule::monthly(tod(10, 0), vec![1, 15, 31])),
    ];
    let config = FeedConfig::default();
    let from = at(2024, 1, 5, 15, 0);

    assert_eq!(
        feed::upcoming_occurrences(&rooms, &config, from),
        feed::upcoming_occurrences(&rooms, &config, from)
    );
}

#[test]
fn upcoming_events_carry_room_display_fields() {
    let book_club = Room {
        category: RoomCategory::Read,
        ..room("book-club", RecurrenceRule::weekly(tod(18, 30), vec![2]))
    };
    let config = FeedConfig { window_days: 7 };
    let from = at(2024, 1, 1, 0, 0); // a Monday

    let events = feed::upcoming_events(&[book_club.clone()], &config, from);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].room_id, book_club.id);
    assert_eq!(events[0].room_name, "book-club");
    assert_eq!(events[0].category, RoomCategory::Read);
    assert_eq!(events[0].meet_link, "https://meet.example.com/book-club");
    assert_eq!(events[0].starts_at, at(2024, 1, 2, 18, 30));
}

#[test]
fn next_meetings_sorts_rooms_and_drops_dead_ones() {
    let nine = room("nine", RecurrenceRule::daily(tod(9, 0)));
    let eight = room("eight", RecurrenceRule::daily(tod(8, 0)));
    let dead = room("dead", RecurrenceRule::monthly(tod(9, 0), vec![]));
    let from = at(2024, 1, 1, 0, 0);

    let meetings = feed::next_meetings(&[nine.clone(), dead, eight.clone()], from);

    assert_eq!(meetings.len(), 2);
    assert_eq!(meetings[0].room_id, eight.id);
    assert_eq!(meetings[0].next_at, at(2024, 1, 1, 8, 0));
    assert_eq!(meetings[0].time_of_day, tod(8, 0));
    assert_eq!(meetings[1].room_id, nine.id);
    assert_eq!(meetings[1].next_at, at(2024, 1, 1, 9, 0));
}

#[test]
fn time_of_day_round_trips_as_hh_mm() {
    let time = tod(18, 30);
    assert_eq!(serde_json::to_value(time).unwrap(), serde_json::json!("18:30"));

    let parsed: TimeOfDay = serde_json::from_value(serde_json::json!("18:30")).unwrap();
    assert_eq!(parsed, time);

    assert!("7:30".parse::<TimeOfDay>().is_err());
    assert!("24:00".parse::<TimeOfDay>().is_err());
    assert!("09:60".parse::<TimeOfDay>().is_err());
    assert!("0930".parse::<TimeOfDay>().is_err());
}

#[test]
fn rule_json_omits_irrelevant_day_sets() {
    let rule = RecurrenceRule::weekly(tod(14, 0), vec![1, 3, 5]);

    assert_eq!(
        serde_json::to_value(&rule).unwrap(),
        serde_json::json!({
            "kind": "weekly",
            "time_of_day": "14:00",
            "weekdays": [1, 3, 5],
        })
    );

    let minimal: RecurrenceRule =
        serde_json::from_value(serde_json::json!({ "kind": "daily", "time_of_day": "09:00" }))
            .unwrap();
    assert_eq!(minimal, RecurrenceRule::daily(tod(9, 0)));
}

#[test]
fn from_parts_builds_a_validated_rule() {
    let rule = RecurrenceRule::from_parts(
        "weekly",
        "14:00",
        &[1, 3, 5],
        Some("2024-01-01"),
        Some("2024-06-30"),
    )
    .unwrap();

    assert_eq!(rule.kind, RecurrenceKind::Weekly);
    assert_eq!(rule.time_of_day, tod(14, 0));
    assert_eq!(rule.weekdays, vec![1, 3, 5]);
    assert!(rule.days_of_month.is_empty());
    assert_eq!(rule.active_from, Some(date(2024, 1, 1)));
    assert_eq!(rule.active_until, Some(date(2024, 6, 30)));
}

#[test]
fn from_parts_rejects_malformed_input() {
    assert!(RecurrenceRule::from_parts("yearly", "14:00", &[1], None, None).is_err());
    assert!(RecurrenceRule::from_parts("weekly", "25:00", &[1], None, None).is_err());
    assert!(RecurrenceRule::from_parts("weekly", "14:00", &[], None, None).is_err());
    assert!(RecurrenceRule::from_parts("monthly", "14:00", &[0], None, None).is_err());
    assert!(RecurrenceRule::from_parts("daily", "14:00", &[], Some("01/02/2024"), None).is_err());
    assert!(
        RecurrenceRule::from_parts("daily", "14:00", &[], Some("2024-06-30"), Some("2024-01-01"))
            .is_err()
    );
}

#[test]
fn validate_reports_structured_reasons() {
    assert_eq!(
        RecurrenceRule::weekly(tod(14, 0), vec![]).validate(),
        Err(RuleValidationError::MissingWeekdays)
    );
    assert_eq!(
        RecurrenceRule::weekly(tod(14, 0), vec![7]).validate(),
        Err(RuleValidationError::WeekdayOutOfRange(7))
    );
    assert_eq!(
        RecurrenceRule::monthly(tod(14, 0), vec![]).validate(),
        Err(RuleValidationError::MissingMonthDays)
    );
    assert_eq!(
        RecurrenceRule::monthly(tod(14, 0), vec![32]).validate(),
        Err(RuleValidationError::MonthDayOutOfRange(32))
    );
    assert_eq!(
        RecurrenceRule {
            active_from: Some(date(2024, 6, 30)),
            active_until: Some(date(2024, 1, 1)),
            ..RecurrenceRule::daily(tod(9, 0))
        }
        .validate(),
        Err(RuleValidationError::InvertedActiveRange {
            from: date(2024, 6, 30),
            until: date(2024, 1, 1),
        })
    );
    assert_eq!(RecurrenceRule::daily(tod(9, 0)).validate(), Ok(()));
}

fn arb_time() -> impl Strategy<Value = TimeOfDay> {
    (0u8..24, 0u8..60).prop_map(|(hour, minute)| TimeOfDay::new(hour, minute).unwrap())
}

fn arb_rule() -> impl Strategy<Value = RecurrenceRule> {
    prop_oneof![
        arb_time().prop_map(RecurrenceRule::daily),
        (arb_time(), proptest::collection::vec(0u8..7, 1..4))
            .prop_map(|(time, days)| RecurrenceRule::weekly(time, days)),
        (arb_time(), proptest::collection::vec(1u8..32, 1..4))
            .prop_map(|(time, days)| RecurrenceRule::monthly(time, days)),
    ]
}

fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    // 2020-01-01 .. 2030-01-01
    (1_577_836_800i64..1_893_456_000i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #[test]
    fn feed_is_sorted_and_window_bounded(
        rules in proptest::collection::vec(arb_rule(), 1..5),
        reference in arb_instant(),
    ) {
        let rooms: Vec<Room> = rules.into_iter().map(|rule| room("prop", rule)).collect();
        let config = FeedConfig::default();

        let occurrences = feed::upcoming_occurrences(&rooms, &config, reference);

        let window_end = reference + Duration::days(i64::from(config.window_days));
        for pair in occurrences.windows(2) {
            prop_assert!(pair[0].starts_at <= pair[1].starts_at);
        }
        for occurrence in &occurrences {
            prop_assert!(occurrence.starts_at > reference);
            prop_assert!(occurrence.starts_at <= window_end);
        }
    }

    #[test]
    fn single_room_walk_is_strictly_increasing(
        rule in arb_rule(),
        reference in arb_instant(),
    ) {
        let rooms = [room("solo", rule)];

        let occurrences = feed::upcoming_occurrences(&rooms, &FeedConfig::default(), reference);

        for pair in occurrences.windows(2) {
            prop_assert!(pair[0].starts_at < pair[1].starts_at);
        }
    }
}
