//! Sequential bulk operations over a selection.
//!
//! Batches run one request at a time, in selection order, and keep going
//! past failures: the backend rate-limits aggressively and a parallel burst
//! of patches has taken shops down before. Every per-item failure is
//! collected into the outcome instead of aborting the batch.

use time::format_description::well_known::Rfc3339;
use time::Time;
use tracing::warn;

use crate::classify::PlanStatus;
use crate::model::{ContentItem, ItemId, ItemPatch, ShopId};
use crate::remote::{ApiError, ContentApi};
use crate::timeline;

/// What happened to each item of a batch.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    /// Items the batch actually sent a request for. Ineligible items, for
    /// example unscheduled rows in a reschedule, are not counted.
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<(ItemId, ApiError)>,
}

impl BulkOutcome {
    fn record(&mut self, id: &ItemId, result: Result<(), ApiError>) {
        self.attempted += 1;
        match result {
            Ok(()) => self.succeeded += 1,
            Err(err) => {
                warn!(id = %id, %err, "bulk step failed, continuing");
                self.failed.push((id.clone(), err));
            }
        }
    }

    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.all_ok() {
            format!("{} item(s) updated", self.succeeded)
        } else {
            format!(
                "{} of {} item(s) updated, {} failed",
                self.succeeded,
                self.attempted,
                self.failed.len()
            )
        }
    }
}

pub struct BulkCoordinator<'a> {
    api: &'a dyn ContentApi,
    shop: ShopId,
}

impl<'a> BulkCoordinator<'a> {
    pub fn new(api: &'a dyn ContentApi, shop: ShopId) -> Self {
        Self { api, shop }
    }

    /// Apply one patch per id, sequentially, in the given order.
    pub async fn patch_each(&self, targets: Vec<(ItemId, ItemPatch)>) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for (id, patch) in targets {
            let result = self.api.mutate(&id, &patch).await.map(|_| ());
            outcome.record(&id, result);
        }
        outcome
    }

    /// Move every selected item currently at `from` to `to`. Items at any
    /// other status are left untouched and not counted.
    pub async fn promote_status(
        &self,
        items: &[&ContentItem],
        from: PlanStatus,
        to: PlanStatus,
    ) -> BulkOutcome {
        let targets = items
            .iter()
            .filter(|item| item.plan_status() == from)
            .map(|item| (item.id.clone(), ItemPatch::status(to, &self.shop)))
            .collect();
        self.patch_each(targets).await
    }

    /// Reschedule every selected item to the same wall-clock time, keeping
    /// each item's date and offset. Items without a parseable schedule are
    /// skipped; there is no date to anchor the new time to.
    pub async fn set_time_of_day(
        &self,
        items: &[&ContentItem],
        hour: u8,
        minute: u8,
    ) -> Result<BulkOutcome, ApiError> {
        let wall_time = Time::from_hms(hour, minute, 0)
            .map_err(|_| ApiError::Validation(format!("{hour:02}:{minute:02} is not a valid time")))?;
        let mut targets = Vec::new();
        for item in items {
            let Some(raw) = item.scheduled_at.as_deref() else {
                continue;
            };
            let Some(current) = timeline::parse_timestamp(raw) else {
                continue;
            };
            let moved = current.replace_time(wall_time);
            let formatted = moved
                .format(&Rfc3339)
                .map_err(|err| ApiError::Validation(format!("cannot format schedule: {err}")))?;
            targets.push((item.id.clone(), ItemPatch::schedule(formatted, &self.shop)));
        }
        Ok(self.patch_each(targets).await)
    }

    /// Delete every selected item, sequentially, continuing past failures.
    pub async fn delete_all(&self, items: &[&ContentItem]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for item in items {
            let result = self.api.delete(&item.id, &self.shop).await;
            outcome.record(&item.id, result);
        }
        outcome
    }

    /// Fresh listing after a batch, so the caller can rebuild its views.
    pub async fn reload(&self) -> Result<Vec<ContentItem>, ApiError> {
        self.api.list(&self.shop).await
    }
}

/// Plain-text digest of a selection, for pasting into chat or a brief.
pub fn export_text(items: &[&ContentItem]) -> String {
    let mut out = String::new();
    for item in items {
        let when = item
            .scheduled_at
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or("unscheduled");
        out.push_str(&format!(
            "• [{}] [{}] {}\n{}\n",
            item.platform(),
            item.plan_status(),
            when,
            item.title
        ));
        if !item.body.trim().is_empty() {
            out.push_str(&item.body);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Parse an `HH:MM` argument.
pub fn parse_hhmm(raw: &str) -> Option<(u8, u8)> {
    let (hour, minute) = raw.trim().split_once(':')?;
    let hour: u8 = hour.parse().ok()?;
    let minute: u8 = minute.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::InMemoryContentApi;
    use assert_matches::assert_matches;

    fn item(id: i64, status: &str, scheduled: Option<&str>) -> ContentItem {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("item {id}"),
            "status": status,
            "scheduled_at": scheduled,
        }))
        .expect("test item")
    }

    #[tokio::test]
    async fn set_time_skips_unscheduled_items_and_keeps_order() {
        let rows = vec![
            item(1, "Scheduled", Some("2026-08-24T09:00:00Z")),
            item(2, "Draft", None),
            item(3, "Scheduled", Some("2026-08-26T15:30:00Z")),
        ];
        let api = InMemoryContentApi::with_items(rows.clone());
        let coordinator = BulkCoordinator::new(&api, ShopId::from("s1"));
        let selected: Vec<&ContentItem> = rows.iter().collect();

        let outcome = coordinator
            .set_time_of_day(&selected, 20, 0)
            .await
            .expect("valid time");

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(api.mutation_log(), vec![ItemId::from(1), ItemId::from(3)]);
        let after = api.items();
        assert_eq!(after[0].scheduled_at.as_deref(), Some("2026-08-24T20:00:00Z"));
        assert_eq!(after[1].scheduled_at, None);
        assert_eq!(after[2].scheduled_at.as_deref(), Some("2026-08-26T20:00:00Z"));
    }

    #[tokio::test]
    async fn set_time_preserves_each_items_offset() {
        let rows = vec![item(1, "Scheduled", Some("2026-08-24T09:00:00+07:00"))];
        let api = InMemoryContentApi::with_items(rows.clone());
        let coordinator = BulkCoordinator::new(&api, ShopId::from("s1"));
        let selected: Vec<&ContentItem> = rows.iter().collect();

        coordinator
            .set_time_of_day(&selected, 18, 45)
            .await
            .expect("valid time");

        assert_eq!(
            api.items()[0].scheduled_at.as_deref(),
            Some("2026-08-24T18:45:00+07:00")
        );
    }

    #[tokio::test]
    async fn invalid_time_is_rejected_before_any_request() {
        let rows = vec![item(1, "Scheduled", Some("2026-08-24T09:00:00Z"))];
        let api = InMemoryContentApi::with_items(rows.clone());
        let coordinator = BulkCoordinator::new(&api, ShopId::from("s1"));
        let selected: Vec<&ContentItem> = rows.iter().collect();

        let result = coordinator.set_time_of_day(&selected, 25, 0).await;
        assert_matches!(result, Err(ApiError::Validation(_)));
        assert!(api.mutation_log().is_empty());
    }

    #[tokio::test]
    async fn promote_only_touches_items_at_the_source_status() {
        let rows = vec![
            item(1, "Draft", None),
            item(2, "Idea", None),
            item(3, "Draft", None),
        ];
        let api = InMemoryContentApi::with_items(rows.clone());
        let coordinator = BulkCoordinator::new(&api, ShopId::from("s1"));
        let selected: Vec<&ContentItem> = rows.iter().collect();

        let outcome = coordinator
            .promote_status(&selected, PlanStatus::Draft, PlanStatus::Scheduled)
            .await;

        assert_eq!(outcome.attempted, 2);
        assert_eq!(api.mutation_log(), vec![ItemId::from(1), ItemId::from(3)]);
        assert_eq!(api.items()[1].status, "Idea");
    }

    #[tokio::test]
    async fn batch_continues_past_a_failing_item() {
        let rows = vec![
            item(1, "Draft", None),
            item(2, "Draft", None),
            item(3, "Draft", None),
        ];
        let api = InMemoryContentApi::with_items(rows.clone());
        api.fail_on(ItemId::from(2));
        let coordinator = BulkCoordinator::new(&api, ShopId::from("s1"));
        let selected: Vec<&ContentItem> = rows.iter().collect();

        let outcome = coordinator
            .promote_status(&selected, PlanStatus::Draft, PlanStatus::Posted)
            .await;

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, ItemId::from(2));
        // Item 3 was still processed after item 2 failed.
        assert_eq!(api.items()[2].status, "Posted");
        assert!(!outcome.all_ok());
    }

    #[tokio::test]
    async fn delete_all_reports_partial_failure() {
        let rows = vec![item(1, "Draft", None), item(2, "Draft", None)];
        let api = InMemoryContentApi::with_items(rows.clone());
        api.fail_on(ItemId::from(1));
        let coordinator = BulkCoordinator::new(&api, ShopId::from("s1"));
        let selected: Vec<&ContentItem> = rows.iter().collect();

        let outcome = coordinator.delete_all(&selected).await;
        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(api.items().len(), 1);
        assert_eq!(api.items()[0].id, ItemId::from(1));
    }

    #[test]
    fn export_lists_platform_status_and_schedule() {
        let rows = vec![
            item(1, "Scheduled", Some("2026-08-24T09:00:00Z")),
            item(2, "Idea", None),
        ];
        let selected: Vec<&ContentItem> = rows.iter().collect();
        let text = export_text(&selected);
        assert!(text.contains("• [unknown] [Scheduled] 2026-08-24T09:00:00Z"));
        assert!(text.contains("• [unknown] [Idea] unscheduled"));
        assert!(text.contains("item 1"));
    }

    #[test]
    fn hhmm_parser_accepts_valid_and_rejects_invalid() {
        assert_eq!(parse_hhmm("20:00"), Some((20, 0)));
        assert_eq!(parse_hhmm(" 7:05 "), Some((7, 5)));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("12:60"), None);
        assert_eq!(parse_hhmm("noon"), None);
        assert_eq!(parse_hhmm("12"), None);
    }
}
