//! Forward-looking planner board: a fixed day window plus a backlog.

use std::cmp::Reverse;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::{Date, OffsetDateTime};

use crate::classify::PlanStatus;
use crate::model::ContentItem;
use crate::timeline::{self, heatmap};

/// Length of the planner window, anchored at today.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "kebab-case")]
pub enum WindowLength {
    Week,
    Fortnight,
    Month,
}

impl WindowLength {
    pub fn days(self) -> u16 {
        match self {
            WindowLength::Week => 7,
            WindowLength::Fortnight => 14,
            WindowLength::Month => 30,
        }
    }
}

impl Default for WindowLength {
    fn default() -> Self {
        WindowLength::Week
    }
}

/// Aggregate counts shown in the board header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlannerStats {
    pub total: usize,
    pub today: usize,
    pub scheduled_in_range: usize,
    pub posted_in_range: usize,
    pub backlog: usize,
    pub ideas: usize,
    pub drafts: usize,
}

/// The planner view of a set of items at a given instant.
///
/// Every item in the input lands in exactly one place: a day bucket inside
/// the window, the backlog, or `out_of_range`. Nothing is dropped.
#[derive(Debug, Clone)]
pub struct PlannerBoard {
    pub start: Date,
    pub window: WindowLength,
    /// One entry per window day, in calendar order, present even when empty.
    pub days: IndexMap<Date, Vec<ContentItem>>,
    /// Items without a usable schedule: absent, blank, or unparseable.
    /// Ordered by recency of last edit, newest first.
    pub backlog: Vec<ContentItem>,
    /// Scheduled items whose day falls outside the window, past or future.
    pub out_of_range: Vec<ContentItem>,
}

impl PlannerBoard {
    pub fn build(items: &[ContentItem], window: WindowLength, now: OffsetDateTime) -> Self {
        let offset = now.offset();
        let start = now.date();

        let mut days: IndexMap<Date, Vec<ContentItem>> = IndexMap::new();
        let mut cursor = start;
        for _ in 0..window.days() {
            days.insert(cursor, Vec::new());
            match timeline::add_days(cursor, 1) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        let mut backlog = Vec::new();
        let mut out_of_range = Vec::new();
        for item in items {
            if !item.has_schedule() {
                backlog.push(item.clone());
                continue;
            }
            let raw = item.scheduled_at.as_deref().unwrap_or_default();
            match timeline::day_key(raw, offset) {
                Some(day) => match days.get_mut(&day) {
                    Some(bucket) => bucket.push(item.clone()),
                    None => out_of_range.push(item.clone()),
                },
                None => backlog.push(item.clone()),
            }
        }

        for bucket in days.values_mut() {
            bucket.sort_by_key(timeline::primary_timestamp);
        }
        backlog.sort_by_key(|item| Reverse(timeline::updated_timestamp(item)));
        out_of_range.sort_by_key(timeline::primary_timestamp);

        PlannerBoard {
            start,
            window,
            days,
            backlog,
            out_of_range,
        }
    }

    pub fn total(&self) -> usize {
        self.days.values().map(Vec::len).sum::<usize>()
            + self.backlog.len()
            + self.out_of_range.len()
    }

    /// Density level per window day, same order as `days`.
    pub fn heat(&self) -> IndexMap<Date, u8> {
        self.days
            .iter()
            .map(|(day, bucket)| (*day, heatmap::density_level(bucket.len())))
            .collect()
    }

    pub fn stats(&self) -> PlannerStats {
        let mut stats = PlannerStats {
            total: self.total(),
            today: self.days.get(&self.start).map(Vec::len).unwrap_or(0),
            backlog: self.backlog.len(),
            ..PlannerStats::default()
        };
        for item in self.days.values().flatten() {
            match item.plan_status() {
                PlanStatus::Scheduled => stats.scheduled_in_range += 1,
                PlanStatus::Posted => stats.posted_in_range += 1,
                _ => {}
            }
        }
        for item in self
            .days
            .values()
            .flatten()
            .chain(&self.backlog)
            .chain(&self.out_of_range)
        {
            match item.plan_status() {
                PlanStatus::Idea => stats.ideas += 1,
                PlanStatus::Draft => stats.drafts += 1,
                _ => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn item(id: i64, scheduled: Option<&str>) -> ContentItem {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("item {id}"),
            "status": "Scheduled",
            "scheduled_at": scheduled,
        }))
        .expect("test item")
    }

    fn item_updated(id: i64, updated: &str) -> ContentItem {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "status": "Draft",
            "updated_at": updated,
        }))
        .expect("test item")
    }

    const NOW: OffsetDateTime = datetime!(2026-08-24 12:00:00 UTC);

    #[test]
    fn window_days_are_seeded_even_when_empty() {
        let board = PlannerBoard::build(&[], WindowLength::Week, NOW);
        assert_eq!(board.days.len(), 7);
        assert!(board.days.values().all(Vec::is_empty));
        let keys: Vec<_> = board.days.keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[0], NOW.date());
    }

    #[test]
    fn every_item_lands_in_exactly_one_place() {
        let items = vec![
            item(1, Some("2026-08-24T09:00:00Z")),
            item(2, Some("2026-08-26T09:00:00Z")),
            item(3, Some("2026-09-20T09:00:00Z")),
            item(4, Some("2026-08-20T09:00:00Z")),
            item(5, None),
            item(6, Some("whenever")),
        ];
        let board = PlannerBoard::build(&items, WindowLength::Week, NOW);
        assert_eq!(board.total(), items.len());
        assert_eq!(board.backlog.len(), 2);
        assert_eq!(board.out_of_range.len(), 2);
    }

    #[test]
    fn malformed_schedule_routes_to_backlog() {
        let items = vec![item(1, Some("not a date")), item(2, Some(""))];
        let board = PlannerBoard::build(&items, WindowLength::Week, NOW);
        assert_eq!(board.backlog.len(), 2);
        assert_eq!(board.out_of_range.len(), 0);
    }

    #[test]
    fn day_buckets_sort_by_schedule_ascending() {
        let items = vec![
            item(1, Some("2026-08-24T18:00:00Z")),
            item(2, Some("2026-08-24T06:00:00Z")),
            item(3, Some("2026-08-24T12:00:00Z")),
        ];
        let board = PlannerBoard::build(&items, WindowLength::Week, NOW);
        let today = &board.days[&NOW.date()];
        let order: Vec<_> = today.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["2", "3", "1"]);
    }

    #[test]
    fn backlog_sorts_newest_edit_first() {
        let items = vec![
            item_updated(1, "2026-08-01T00:00:00Z"),
            item_updated(2, "2026-08-15T00:00:00Z"),
            item_updated(3, "2026-08-10T00:00:00Z"),
        ];
        let board = PlannerBoard::build(&items, WindowLength::Week, NOW);
        let order: Vec<_> = board.backlog.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["2", "3", "1"]);
    }

    #[test]
    fn fortnight_and_month_extend_the_window() {
        let far = item(1, Some("2026-09-05T09:00:00Z"));
        let week = PlannerBoard::build(std::slice::from_ref(&far), WindowLength::Week, NOW);
        assert_eq!(week.out_of_range.len(), 1);
        let month = PlannerBoard::build(std::slice::from_ref(&far), WindowLength::Month, NOW);
        assert_eq!(month.out_of_range.len(), 0);
        assert_eq!(month.days.len(), 30);
    }

    #[test]
    fn yesterday_is_out_of_range_not_backlog() {
        let board = PlannerBoard::build(
            &[item(1, Some("2026-08-23T09:00:00Z"))],
            WindowLength::Week,
            NOW,
        );
        assert_eq!(board.out_of_range.len(), 1);
        assert!(board.backlog.is_empty());
    }

    #[test]
    fn heat_matches_bucket_counts() {
        let items = vec![
            item(1, Some("2026-08-24T09:00:00Z")),
            item(2, Some("2026-08-24T10:00:00Z")),
            item(3, Some("2026-08-24T11:00:00Z")),
            item(4, Some("2026-08-25T09:00:00Z")),
        ];
        let board = PlannerBoard::build(&items, WindowLength::Week, NOW);
        let heat = board.heat();
        assert_eq!(heat[&NOW.date()], 2);
        assert_eq!(heat[&timeline::add_days(NOW.date(), 1).unwrap()], 1);
        assert_eq!(heat[&timeline::add_days(NOW.date(), 2).unwrap()], 0);
    }

    #[test]
    fn stats_count_statuses_in_range() {
        let mut posted = item(1, Some("2026-08-25T09:00:00Z"));
        posted.status = "Posted".into();
        let items = vec![
            item(2, Some("2026-08-24T09:00:00Z")),
            posted,
            item_updated(3, "2026-08-01T00:00:00Z"),
        ];
        let board = PlannerBoard::build(&items, WindowLength::Week, NOW);
        let stats = board.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.today, 1);
        assert_eq!(stats.scheduled_in_range, 1);
        assert_eq!(stats.posted_in_range, 1);
        assert_eq!(stats.backlog, 1);
        assert_eq!(stats.drafts, 1);
    }
}
