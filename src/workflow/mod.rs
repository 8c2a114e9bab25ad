//! Planner status workflow.

use strum::IntoEnumIterator;

use crate::classify::PlanStatus;
use crate::model::{ContentItem, ItemPatch, ShopId};
use crate::remote::{ApiError, ContentApi};

/// Cycle order used by the quick-status keybinding: Idea, Draft, Scheduled,
/// Posted, then back to Idea.
pub fn plan_statuses() -> impl Iterator<Item = PlanStatus> {
    PlanStatus::iter()
}

/// Whether moving an item from `from` to `to` is permitted.
///
/// The workflow is deliberately open: operators routinely pull posted items
/// back to draft after a takedown, or jump an idea straight to scheduled.
/// Gating lives in the backend if anywhere; the engine never blocks a move.
pub fn transition_allowed(_from: PlanStatus, _to: PlanStatus) -> bool {
    true
}

pub fn next_status(current: PlanStatus) -> PlanStatus {
    let all: Vec<PlanStatus> = PlanStatus::iter().collect();
    let index = all.iter().position(|s| *s == current).unwrap_or(0);
    all[(index + 1) % all.len()]
}

/// Move one item to `next` remotely and return the row to show.
///
/// When the backend echoes the updated row that row wins; otherwise the
/// patch is merged locally. On error the caller keeps its current row, so a
/// failed transition never corrupts local state.
pub async fn quick_transition(
    api: &dyn ContentApi,
    item: &ContentItem,
    next: PlanStatus,
    shop: &ShopId,
) -> Result<ContentItem, ApiError> {
    let patch = ItemPatch::status(next, shop);
    let fresh = api.mutate(&item.id, &patch).await?;
    Ok(fresh.unwrap_or_else(|| patch.apply_to(item)))
}
