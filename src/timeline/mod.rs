//! Calendar math shared by the planner board and the tracker timeline.
//!
//! Timestamps arrive as strings in a handful of backend formats. Parsing is
//! lenient about format but never invents data: a raw value that matches no
//! known format yields `None`, and the caller decides where the owning item
//! goes.

pub mod heatmap;
pub mod planner;
pub mod tracker;

use once_cell::sync::Lazy;
use time::format_description::well_known::Rfc3339;
use time::format_description::{self, BorrowedFormatItem};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::model::ContentItem;

static SQL_DATETIME: Lazy<Vec<BorrowedFormatItem<'static>>> = Lazy::new(|| {
    format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
        .expect("static format description")
});

static DAY_KEY: Lazy<Vec<BorrowedFormatItem<'static>>> =
    Lazy::new(|| format_description::parse("[year]-[month]-[day]").expect("static format description"));

/// Parse a backend timestamp. Accepted formats, in order:
/// RFC 3339, `YYYY-MM-DD HH:MM:SS` (read as UTC), and a bare date (midnight
/// UTC).
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(raw, &SQL_DATETIME) {
        return Some(parsed.assume_utc());
    }
    if let Ok(parsed) = Date::parse(raw, &DAY_KEY) {
        return Some(parsed.midnight().assume_utc());
    }
    None
}

/// Calendar day a raw timestamp falls on, in the viewer's offset.
pub fn day_key(raw: &str, offset: UtcOffset) -> Option<Date> {
    parse_timestamp(raw).map(|ts| ts.to_offset(offset).date())
}

pub fn format_day_key(date: Date) -> String {
    date.format(&DAY_KEY).expect("date formats with static description")
}

pub fn parse_day_key(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), &DAY_KEY).ok()
}

pub fn start_of_day(date: Date, offset: UtcOffset) -> OffsetDateTime {
    date.midnight().assume_offset(offset)
}

/// Last representable instant of `date` in `offset`.
pub fn end_of_day(date: Date, offset: UtcOffset) -> OffsetDateTime {
    match date.next_day() {
        Some(next) => next.midnight().assume_offset(offset) - Duration::nanoseconds(1),
        None => PrimitiveDateTime::new(date, Time::MIDNIGHT)
            .assume_offset(offset)
            .replace_time(Time::from_hms_nano(23, 59, 59, 999_999_999).expect("valid wall time")),
    }
}

pub fn add_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(Duration::days(days))
}

/// The instant an item is ordered by: its schedule, falling back to creation
/// and then last update. The first field that is present wins, even when it
/// fails to parse; a claimed schedule never silently defers to `created_at`.
pub fn primary_timestamp(item: &ContentItem) -> Option<OffsetDateTime> {
    let raw = [&item.scheduled_at, &item.created_at, &item.updated_at]
        .into_iter()
        .flatten()
        .find(|raw| !raw.trim().is_empty())?;
    parse_timestamp(raw)
}

/// Recency of an item's last edit, used to order backlog and past sections.
pub fn updated_timestamp(item: &ContentItem) -> Option<OffsetDateTime> {
    item.updated_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| item.created_at.as_deref().and_then(parse_timestamp))
}
