//! Application state: the loaded item set, the active view, the selection,
//! and the operations the command layer drives.

pub mod filter;

use std::sync::Arc;

use time::{Date, OffsetDateTime};

use crate::bulk::{self, BulkCoordinator, BulkOutcome};
use crate::classify::PlanStatus;
use crate::model::{ContentItem, CreateItem, ItemId, ShopId};
use crate::remote::{ApiError, ContentApi};
use crate::selection::SelectionSet;
use crate::timeline::planner::{PlannerBoard, WindowLength};
use crate::timeline::tracker::{TrackerSection, TrackerTimeline};
use crate::workflow;

pub use filter::ItemFilter;

/// Which slice of the item set the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    /// One planner day.
    Day(Date),
    /// The backlog of unscheduled items.
    Inbox,
    /// One tracker section.
    Tracker(TrackerSection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// One-shot status-line message, consumed by `take_notice`.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct PlannerApp {
    api: Arc<dyn ContentApi>,
    shop: ShopId,
    items: Vec<ContentItem>,
    pub selection: SelectionSet,
    view: ActiveView,
    pub filter: ItemFilter,
    pub window: WindowLength,
    notice: Option<Notice>,
}

impl PlannerApp {
    pub fn new(api: Arc<dyn ContentApi>, shop: ShopId, window: WindowLength) -> Self {
        Self {
            api,
            shop,
            items: Vec::new(),
            selection: SelectionSet::new(),
            view: ActiveView::Inbox,
            filter: ItemFilter::default(),
            window,
            notice: None,
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn shop(&self) -> &ShopId {
        &self.shop
    }

    pub fn view(&self) -> ActiveView {
        self.view
    }

    /// Switching views clears the selection: the old selection would be
    /// invisible in the new view and bulk actions must only touch what the
    /// user can see.
    pub fn set_view(&mut self, view: ActiveView) {
        if self.view != view {
            self.view = view;
            self.selection.clear();
        }
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub async fn reload(&mut self) -> Result<(), ApiError> {
        self.items = self.api.list(&self.shop).await?;
        self.selection.prune(&self.items);
        Ok(())
    }

    fn filtered(&self) -> Vec<ContentItem> {
        self.filter.apply(&self.items)
    }

    pub fn board(&self, now: OffsetDateTime) -> PlannerBoard {
        PlannerBoard::build(&self.filtered(), self.window, now)
    }

    pub fn tracker(&self, now: OffsetDateTime) -> TrackerTimeline {
        TrackerTimeline::build(&self.filtered(), now)
    }

    /// Items shown by the active view, in display order.
    pub fn visible(&self, now: OffsetDateTime) -> Vec<ContentItem> {
        match self.view {
            ActiveView::Day(day) => {
                let board = self.board(now);
                board.days.get(&day).cloned().unwrap_or_default()
            }
            ActiveView::Inbox => self.board(now).backlog,
            ActiveView::Tracker(section) => {
                let timeline = self.tracker(now);
                timeline
                    .section_items(section)
                    .into_iter()
                    .cloned()
                    .collect()
            }
        }
    }

    pub fn toggle_select(&mut self, id: ItemId) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_visible(&mut self, now: OffsetDateTime) {
        let visible = self.visible(now);
        self.selection.select_all(&visible);
    }

    /// Cycle one item to the next planner status. Local state changes only
    /// when the backend accepted the move.
    pub async fn quick_status(&mut self, id: &ItemId) {
        let next = match self.items.iter().find(|item| &item.id == id) {
            Some(item) => workflow::next_status(item.plan_status()),
            None => {
                self.notice = Some(Notice::warn(format!("no item {id}")));
                return;
            }
        };
        self.set_status(id, next).await;
    }

    /// Move one item to an explicit planner status.
    pub async fn set_status(&mut self, id: &ItemId, next: PlanStatus) {
        let Some(current) = self.items.iter().find(|item| &item.id == id).cloned() else {
            self.notice = Some(Notice::warn(format!("no item {id}")));
            return;
        };
        match workflow::quick_transition(self.api.as_ref(), &current, next, &self.shop).await {
            Ok(updated) => {
                if let Some(slot) = self.items.iter_mut().find(|item| &item.id == id) {
                    *slot = updated;
                }
                self.notice = Some(Notice::info(format!("{id} is now {next}")));
            }
            Err(err) => self.notice = Some(Notice::error(err.to_string())),
        }
    }

    /// Validate and create a new item. Validation failures never reach the
    /// network; the missing field is reported in the notice.
    pub async fn create(&mut self, draft: CreateItem) -> Result<ContentItem, ApiError> {
        if let Some(field) = draft.first_missing_field() {
            let message = format!("{field} is required");
            self.notice = Some(Notice::warn(message.clone()));
            return Err(ApiError::Validation(message));
        }
        let created = self.api.create(&draft).await?;
        self.items.push(created.clone());
        self.notice = Some(Notice::info(format!("created {}", created.id)));
        Ok(created)
    }

    pub async fn delete(&mut self, id: &ItemId) -> Result<(), ApiError> {
        self.api.delete(id, &self.shop).await?;
        self.items.retain(|item| &item.id != id);
        self.selection.remove(id);
        Ok(())
    }

    pub async fn bulk_promote(
        &mut self,
        from: PlanStatus,
        to: PlanStatus,
    ) -> Result<BulkOutcome, ApiError> {
        let api = Arc::clone(&self.api);
        let coordinator = BulkCoordinator::new(api.as_ref(), self.shop.clone());
        let selected = self.selection.resolve(&self.items);
        let outcome = coordinator.promote_status(&selected, from, to).await;
        self.finish_bulk(&coordinator, outcome).await
    }

    pub async fn bulk_set_time(&mut self, hour: u8, minute: u8) -> Result<BulkOutcome, ApiError> {
        let api = Arc::clone(&self.api);
        let coordinator = BulkCoordinator::new(api.as_ref(), self.shop.clone());
        let selected = self.selection.resolve(&self.items);
        let outcome = coordinator.set_time_of_day(&selected, hour, minute).await?;
        self.finish_bulk(&coordinator, outcome).await
    }

    pub async fn bulk_delete(&mut self) -> Result<BulkOutcome, ApiError> {
        let api = Arc::clone(&self.api);
        let coordinator = BulkCoordinator::new(api.as_ref(), self.shop.clone());
        let selected = self.selection.resolve(&self.items);
        let outcome = coordinator.delete_all(&selected).await;
        self.finish_bulk(&coordinator, outcome).await
    }

    /// Plain-text digest of the current selection, in selection order.
    pub fn export_selection(&self) -> String {
        bulk::export_text(&self.selection.resolve(&self.items))
    }

    async fn finish_bulk(
        &mut self,
        coordinator: &BulkCoordinator<'_>,
        outcome: BulkOutcome,
    ) -> Result<BulkOutcome, ApiError> {
        self.items = coordinator.reload().await?;
        self.selection.prune(&self.items);
        self.notice = Some(if outcome.all_ok() {
            Notice::info(outcome.summary())
        } else {
            Notice::warn(outcome.summary())
        });
        Ok(outcome)
    }
}
