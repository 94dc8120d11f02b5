//! Local wall-clock helpers and calendar arithmetic.

use std::sync::OnceLock;

use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// The local UTC offset, captured on first use.
///
/// The offset can only be queried soundly while the process is single-threaded, so `main` calls
/// this before starting the runtime. Falls back to UTC when it cannot be determined.
pub fn local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

/// Current local wall-clock time, truncated to whole seconds like every persisted timestamp.
pub fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc().to_offset(local_offset());
    let time = now.time() - Duration::nanoseconds(i64::from(now.nanosecond()));
    PrimitiveDateTime::new(now.date(), time)
}

/// Monday and Sunday of the week containing `date`.
pub fn week_window(date: Date) -> (Date, Date) {
    // Monday = 1 ... Sunday = 7, so the window never starts on a Sunday.
    let day_of_week = date.weekday().number_from_monday() as i64;
    let monday = date - Duration::days(day_of_week - 1);
    let sunday = monday + Duration::days(6);
    (monday, sunday)
}

/// Seconds elapsed between `since` and `now`, never negative.
pub fn elapsed_seconds(since: PrimitiveDateTime, now: PrimitiveDateTime) -> u64 {
    (now - since).whole_seconds().max(0) as u64
}

/// "just now", "5 minutes ago", "2 hours ago", "3 days ago".
pub fn humanize_since(since: PrimitiveDateTime, now: PrimitiveDateTime) -> String {
    let seconds = elapsed_seconds(since, now);

    let (count, unit) = match seconds {
        0..=59 => return "just now".to_string(),
        60..=3599 => (seconds / 60, "minute"),
        3600..=86_399 => (seconds / 3600, "hour"),
        _ => (seconds / 86_400, "day"),
    };

    if count == 1 {
        let article = if unit == "hour" { "an" } else { "a" };
        format!("{} {} ago", article, unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
