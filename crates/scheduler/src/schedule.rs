//! Next-occurrence computation and week-window math.
//!
//! All schedule arithmetic happens in the user's IANA timezone and converts
//! back to UTC at the edges; the stored instants are absolute.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use database::models::{User, Week};
use database::validation::{parse_reflection_time, parse_timezone, validate_weekday};

use crate::error::{Result, SchedulerError};

/// Compute the next instant, strictly after `now`, whose local weekday and
/// time-of-day in `tz` match the preference.
///
/// Walks forward one day at a time from `now`'s local date; the weekday
/// matches exactly once per 7 days, so this terminates within 8 iterations
/// (the extra day absorbs a today-but-already-past match).
pub fn next_occurrence(
    weekday: i64,
    time: &str,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    validate_weekday(weekday)?;
    let (hour, minute) = parse_reflection_time(time)?;

    let local_now = now.with_timezone(&tz);

    for offset in 0..=7u64 {
        let date = local_now
            .date_naive()
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| SchedulerError::Schedule("date overflow".to_string()))?;

        if i64::from(date.weekday().num_days_from_sunday()) != weekday {
            continue;
        }

        let candidate = resolve_local(date, hour, minute, tz)?;
        if candidate > now {
            return Ok(candidate);
        }
    }

    // Unreachable: a matching weekday strictly ahead of now always exists
    // within the window above.
    Err(SchedulerError::Schedule(format!(
        "no occurrence of weekday {} at {} found near {}",
        weekday, time, now
    )))
}

/// [`next_occurrence`] using the preference stored on a user record.
pub fn next_occurrence_for(user: &User, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let tz = parse_timezone(&user.timezone)?;
    next_occurrence(user.reflection_weekday, &user.reflection_time, tz, now)
}

/// The recording window for a week reflecting at `reflection_at`: local start
/// of day six days earlier through local end of the reflection day.
pub fn week_window(reflection_at: DateTime<Utc>, tz: Tz) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let local_date = reflection_at.with_timezone(&tz).date_naive();

    let start_date = local_date
        .checked_sub_days(Days::new(6))
        .ok_or_else(|| SchedulerError::Schedule("date underflow".to_string()))?;

    let start = resolve_local(start_date, 0, 0, tz)?;
    let end = tz
        .from_local_datetime(&local_date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap()))
        .latest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| SchedulerError::Schedule(format!("unresolvable end of day {}", local_date)))?;

    Ok((start, end))
}

/// The `(year, week_number)` identity of a week: the ISO week-year and week
/// number of the reflection date's local calendar day.
pub fn week_period(reflection_at: DateTime<Utc>, tz: Tz) -> (i64, i64) {
    let iso = reflection_at.with_timezone(&tz).date_naive().iso_week();
    (i64::from(iso.year()), i64::from(iso.week()))
}

/// Build a fresh recording week for `user_id` reflecting at `reflection_at`.
pub fn new_week(user_id: &str, reflection_at: DateTime<Utc>, tz: Tz) -> Result<Week> {
    let (year, week_number) = week_period(reflection_at, tz);
    let (week_start, week_end) = week_window(reflection_at, tz)?;

    Ok(Week::new(
        user_id,
        year,
        week_number,
        week_start,
        week_end,
        reflection_at,
    ))
}

/// Resolve a local date + time in `tz`, skipping forward through a DST gap.
fn resolve_local(date: NaiveDate, hour: u32, minute: u32, tz: Tz) -> Result<DateTime<Utc>> {
    let mut naive = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| SchedulerError::Schedule(format!("invalid time {}:{}", hour, minute)))?;

    // A spring-forward gap makes a local time nonexistent; step forward in
    // 15-minute increments until it resolves (gaps are at most a few hours).
    for _ in 0..16 {
        if let Some(resolved) = tz.from_local_datetime(&naive).earliest() {
            return Ok(resolved.with_timezone(&Utc));
        }
        naive += chrono::Duration::minutes(15);
    }

    Err(SchedulerError::Schedule(format!(
        "unresolvable local time {} in {}",
        naive, tz
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    fn ny_instant(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        New_York
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_tuesday_resolves_to_upcoming_sunday() {
        // Tuesday 2025-06-03 10:00 New York; Sunday 18:00 preference.
        let now = ny_instant(2025, 6, 3, 10, 0);
        let next = next_occurrence(0, "18:00", New_York, now).unwrap();

        assert_eq!(next, ny_instant(2025, 6, 8, 18, 0));
        assert!(next > now);
    }

    #[test]
    fn test_later_today_counts() {
        // Sunday morning, Sunday-evening preference: today still qualifies.
        let now = ny_instant(2025, 6, 8, 9, 0);
        let next = next_occurrence(0, "18:00", New_York, now).unwrap();
        assert_eq!(next, ny_instant(2025, 6, 8, 18, 0));
    }

    #[test]
    fn test_exact_instant_rolls_a_full_week() {
        // Strictly after: now == the scheduled instant pushes to next week.
        let now = ny_instant(2025, 6, 8, 18, 0);
        let next = next_occurrence(0, "18:00", New_York, now).unwrap();
        assert_eq!(next, ny_instant(2025, 6, 15, 18, 0));
    }

    #[test]
    fn test_rejects_bad_preference() {
        let now = Utc::now();
        assert!(next_occurrence(7, "18:00", New_York, now).is_err());
        assert!(next_occurrence(0, "6pm", New_York, now).is_err());
    }

    #[test]
    fn test_week_window_spans_seven_local_days() {
        let reflection = ny_instant(2025, 6, 8, 18, 0);
        let (start, end) = week_window(reflection, New_York).unwrap();

        assert_eq!(start, ny_instant(2025, 6, 2, 0, 0));
        assert_eq!(
            end,
            New_York
                .with_ymd_and_hms(2025, 6, 8, 23, 59, 59)
                .unwrap()
                .with_timezone(&Utc)
        );
        assert!(start < reflection && reflection < end);
    }

    #[test]
    fn test_week_period_uses_iso_week_year() {
        // Monday 2025-12-29 falls in ISO week 1 of 2026.
        let reflection = ny_instant(2025, 12, 29, 18, 0);
        assert_eq!(week_period(reflection, New_York), (2026, 1));
    }

    #[test]
    fn test_new_week_starts_recording_with_consistent_window() {
        let reflection = ny_instant(2025, 6, 8, 18, 0);
        let week = new_week("u1", reflection, New_York).unwrap();

        assert_eq!(week.year, 2025);
        assert_eq!(week.week_number, 23);
        assert_eq!(week.reflection_date, reflection);
        assert_eq!(week.week_start, ny_instant(2025, 6, 2, 0, 0));
    }
}
