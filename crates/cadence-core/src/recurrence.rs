use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};

use crate::models::{RecurrenceKind, RecurrenceRule, TimeOfDay};

/// Upper bound on the month-by-month scan for monthly rules.
///
/// A monthly rule whose day set never lands within this many months of the
/// reference yields no occurrence instead of scanning an unbounded horizon.
pub const MONTHLY_SCAN_HORIZON_MONTHS: u32 = 24;

/// Finds the next occurrence of a rule, strictly after a reference instant.
///
/// All calendar arithmetic runs in a single UTC clock domain: the candidate
/// day is the `date_naive()` of the UTC instant, `active_from` opens at UTC
/// midnight and `active_until` closes at 23:59:59 UTC of its date.
///
/// # Arguments
/// * `rule` - The recurrence rule to evaluate (read-only, untrusted)
/// * `after` - Reference instant; "next" means strictly later than this
///
/// # Returns
/// * `Option<DateTime<Utc>>` - Earliest satisfying instant, or `None` if the
///   rule is expired, unsatisfiable, or malformed
///
/// # Behavior
/// - A candidate equal to `after` is never returned; "next" is strict future
/// - `active_from` clamps the effective reference forward to its start of day
///   before any per-kind logic runs
/// - Daily: today at the rule's time of day, else tomorrow
/// - Weekly: scan the current week day-by-day (today inclusive) in ascending
///   modulo-7 order, then wrap to the earliest set weekday next week
/// - Monthly: scan up to [`MONTHLY_SCAN_HORIZON_MONTHS`] months; a day the
///   month does not have is skipped for that month, never clamped
/// - Malformed rules (empty required day set) yield `None`, not an error
pub fn next_occurrence(rule: &RecurrenceRule, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let reference = clamp_to_active_start(rule, after);
    let deadline = active_deadline(rule);

    match rule.kind {
        RecurrenceKind::Daily => next_daily(rule.time_of_day, reference, deadline),
        RecurrenceKind::Weekly => next_weekly(rule, reference, deadline),
        RecurrenceKind::Monthly => next_monthly(rule, reference, deadline),
    }
}

/// Combines a calendar day with a rule's time of day into a UTC instant.
fn at_time_of_day(date: NaiveDate, time: TimeOfDay) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)?;
    Some(date.and_time(time).and_utc())
}

/// References before the rule's `active_from` are moved to its start of day.
fn clamp_to_active_start(rule: &RecurrenceRule, after: DateTime<Utc>) -> DateTime<Utc> {
    match rule.active_from {
        Some(from) => {
            let opens = from.and_time(NaiveTime::MIN).and_utc();
            if after < opens {
                opens
            } else {
                after
            }
        }
        None => after,
    }
}

/// Last instant the rule may fire: 23:59:59 of `active_until`, if set.
fn active_deadline(rule: &RecurrenceRule) -> Option<DateTime<Utc>> {
    rule.active_until
        .and_then(|until| until.and_hms_opt(23, 59, 59))
        .map(|closing| closing.and_utc())
}

fn within_deadline(candidate: DateTime<Utc>, deadline: Option<DateTime<Utc>>) -> bool {
    deadline.map_or(true, |deadline| candidate <= deadline)
}

fn next_daily(
    time: TimeOfDay,
    reference: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let today = at_time_of_day(reference.date_naive(), time)?;
    let candidate = if today > reference {
        today
    } else {
        at_time_of_day(reference.date_naive() + Duration::days(1), time)?
    };
    within_deadline(candidate, deadline).then_some(candidate)
}

fn next_weekly(
    rule: &RecurrenceRule,
    reference: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let weekdays = normalized_weekdays(&rule.weekdays);
    if weekdays.is_empty() {
        return None;
    }

    let start = reference.date_naive();
    // 0 = Sunday, matching the stored weekday numbering.
    let current = start.weekday().num_days_from_sunday() as u8;

    // Scan the current week, today inclusive.
    for offset in 0..7u8 {
        let weekday = (current + offset) % 7;
        if !weekdays.contains(&weekday) {
            continue;
        }
        let candidate = at_time_of_day(start + Duration::days(i64::from(offset)), rule.time_of_day)?;
        if candidate > reference && within_deadline(candidate, deadline) {
            return Some(candidate);
        }
    }

    // Nothing acceptable this week; wrap to the earliest weekday in the set.
    let earliest = weekdays[0];
    let mut gap = i64::from((7 + earliest - current) % 7);
    if gap == 0 {
        gap = 7;
    }
    let candidate = at_time_of_day(start + Duration::days(gap), rule.time_of_day)?;
    within_deadline(candidate, deadline).then_some(candidate)
}

fn next_monthly(
    rule: &RecurrenceRule,
    reference: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let mut days = rule.days_of_month.clone();
    days.sort_unstable();
    days.dedup();
    if days.is_empty() {
        return None;
    }

    let anchor = reference.date_naive().with_day(1)?;
    for months_ahead in 0..MONTHLY_SCAN_HORIZON_MONTHS {
        let month = anchor.checked_add_months(Months::new(months_ahead))?;
        for &day in &days {
            // A day the month does not have is skipped outright, never
            // clamped to the month's last day.
            if let Some(date) = NaiveDate::from_ymd_opt(month.year(), month.month(), u32::from(day))
            {
                let candidate = at_time_of_day(date, rule.time_of_day)?;
                if candidate > reference && within_deadline(candidate, deadline) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

/// Drops weekday numbers outside 0-6, then sorts ascending and dedups so the
/// set is evaluated deterministically.
fn normalized_weekdays(raw: &[u8]) -> Vec<u8> {
    let mut weekdays: Vec<u8> = raw.iter().copied().filter(|day| *day <= 6).collect();
    weekdays.sort_unstable();
    weekdays.dedup();
    weekdays
}
