//! Delivery tracker: the same items partitioned around the current day.

use std::cmp::Reverse;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use time::{Date, OffsetDateTime};

use crate::model::ContentItem;
use crate::timeline;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TrackerSection {
    Today,
    Upcoming,
    Past,
    Unknown,
}

/// Tracker view of a set of items at a given instant.
///
/// Partitioning is by calendar day in the viewer's offset, so a post at
/// 00:05 today is `Today` even though it is hours in the past. Items whose
/// ordering timestamp is missing or unparseable go to `unknown` in input
/// order instead of being dropped.
#[derive(Debug, Clone)]
pub struct TrackerTimeline {
    pub anchor: Date,
    /// Today's items, soonest first.
    pub today: Vec<ContentItem>,
    /// Future days in calendar order, each day's items soonest first.
    pub upcoming: IndexMap<Date, Vec<ContentItem>>,
    /// Past days, most recent day first; within a day, latest edit first.
    pub past: IndexMap<Date, Vec<ContentItem>>,
    pub unknown: Vec<ContentItem>,
}

impl TrackerTimeline {
    pub fn build(items: &[ContentItem], now: OffsetDateTime) -> Self {
        let offset = now.offset();
        let anchor = now.date();

        let mut today = Vec::new();
        let mut upcoming: IndexMap<Date, Vec<ContentItem>> = IndexMap::new();
        let mut past: IndexMap<Date, Vec<ContentItem>> = IndexMap::new();
        let mut unknown = Vec::new();

        for item in items {
            match timeline::primary_timestamp(item) {
                None => unknown.push(item.clone()),
                Some(ts) => {
                    let day = ts.to_offset(offset).date();
                    if day == anchor {
                        today.push(item.clone());
                    } else if day > anchor {
                        upcoming.entry(day).or_default().push(item.clone());
                    } else {
                        past.entry(day).or_default().push(item.clone());
                    }
                }
            }
        }

        today.sort_by_key(timeline::primary_timestamp);
        upcoming.sort_keys();
        for bucket in upcoming.values_mut() {
            bucket.sort_by_key(timeline::primary_timestamp);
        }
        past.sort_by(|a, _, b, _| b.cmp(a));
        for bucket in past.values_mut() {
            bucket.sort_by_key(|item| Reverse(timeline::updated_timestamp(item)));
        }

        TrackerTimeline {
            anchor,
            today,
            upcoming,
            past,
            unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.today.len()
            + self.upcoming.values().map(Vec::len).sum::<usize>()
            + self.past.values().map(Vec::len).sum::<usize>()
            + self.unknown.len()
    }

    pub fn section_len(&self, section: TrackerSection) -> usize {
        match section {
            TrackerSection::Today => self.today.len(),
            TrackerSection::Upcoming => self.upcoming.values().map(Vec::len).sum(),
            TrackerSection::Past => self.past.values().map(Vec::len).sum(),
            TrackerSection::Unknown => self.unknown.len(),
        }
    }

    /// Items of one section, flattened in that section's display order.
    pub fn section_items(&self, section: TrackerSection) -> Vec<&ContentItem> {
        match section {
            TrackerSection::Today => self.today.iter().collect(),
            TrackerSection::Upcoming => self.upcoming.values().flatten().collect(),
            TrackerSection::Past => self.past.values().flatten().collect(),
            TrackerSection::Unknown => self.unknown.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    const NOW: OffsetDateTime = datetime!(2026-08-24 12:00:00 UTC);

    fn item(id: i64, scheduled: Option<&str>, updated: Option<&str>) -> ContentItem {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "status": "scheduled",
            "scheduled_at": scheduled,
            "updated_at": updated,
        }))
        .expect("test item")
    }

    #[test]
    fn partition_conserves_every_item() {
        let items = vec![
            item(1, Some("2026-08-24T00:05:00Z"), None),
            item(2, Some("2026-08-26T09:00:00Z"), None),
            item(3, Some("2026-08-20T09:00:00Z"), None),
            item(4, None, None),
            item(5, Some("sometime"), None),
        ];
        let timeline = TrackerTimeline::build(&items, NOW);
        assert_eq!(timeline.total(), items.len());
        assert_eq!(timeline.section_len(TrackerSection::Today), 1);
        assert_eq!(timeline.section_len(TrackerSection::Upcoming), 1);
        assert_eq!(timeline.section_len(TrackerSection::Past), 1);
        assert_eq!(timeline.section_len(TrackerSection::Unknown), 2);
    }

    #[test]
    fn early_morning_today_is_today_not_past() {
        let timeline =
            TrackerTimeline::build(&[item(1, Some("2026-08-24T00:05:00Z"), None)], NOW);
        assert_eq!(timeline.today.len(), 1);
        assert!(timeline.past.is_empty());
    }

    #[test]
    fn upcoming_days_ascend_and_items_sort_soonest_first() {
        let items = vec![
            item(1, Some("2026-08-27T09:00:00Z"), None),
            item(2, Some("2026-08-25T18:00:00Z"), None),
            item(3, Some("2026-08-25T06:00:00Z"), None),
        ];
        let timeline = TrackerTimeline::build(&items, NOW);
        let days: Vec<_> = timeline.upcoming.keys().copied().collect();
        assert_eq!(days, vec![date!(2026-08-25), date!(2026-08-27)]);
        let first_day: Vec<_> = timeline.upcoming[&date!(2026-08-25)]
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(first_day, vec!["3", "2"]);
    }

    #[test]
    fn past_days_descend_and_items_sort_latest_edit_first() {
        let items = vec![
            item(1, Some("2026-08-20T09:00:00Z"), Some("2026-08-21T00:00:00Z")),
            item(2, Some("2026-08-20T10:00:00Z"), Some("2026-08-23T00:00:00Z")),
            item(3, Some("2026-08-10T09:00:00Z"), None),
        ];
        let timeline = TrackerTimeline::build(&items, NOW);
        let days: Vec<_> = timeline.past.keys().copied().collect();
        assert_eq!(days, vec![date!(2026-08-20), date!(2026-08-10)]);
        let recent: Vec<_> = timeline.past[&date!(2026-08-20)]
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(recent, vec!["2", "1"]);
    }

    #[test]
    fn unknown_keeps_input_order() {
        let items = vec![item(9, None, None), item(4, Some("???"), None)];
        let timeline = TrackerTimeline::build(&items, NOW);
        let order: Vec<_> = timeline.unknown.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["9", "4"]);
    }

    #[test]
    fn items_without_schedule_fall_back_to_created_at() {
        let created: ContentItem = serde_json::from_value(serde_json::json!({
            "id": 7,
            "created_at": "2026-08-18T09:00:00Z",
        }))
        .expect("test item");
        let timeline = TrackerTimeline::build(std::slice::from_ref(&created), NOW);
        assert_eq!(timeline.section_len(TrackerSection::Past), 1);
    }
}
