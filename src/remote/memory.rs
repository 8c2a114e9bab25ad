//! In-memory `ContentApi` used to exercise the engine without a backend.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::model::{ContentItem, CreateItem, ItemId, ItemPatch, ShopId};
use crate::remote::{ApiError, ContentApi};

/// A `ContentApi` over a plain vector.
///
/// Mutations are recorded in call order so tests can assert that batch
/// operations run sequentially and touch only the rows they should. Ids in
/// `fail_ids` make `mutate` and `delete` return a rejection, for exercising
/// partial-failure paths.
#[derive(Default)]
pub struct InMemoryContentApi {
    items: Mutex<Vec<ContentItem>>,
    fail_ids: Mutex<HashSet<ItemId>>,
    mutation_log: Mutex<Vec<ItemId>>,
    next_id: AtomicI64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryContentApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    pub fn with_items(items: Vec<ContentItem>) -> Self {
        let api = Self::new();
        *lock(&api.items) = items;
        api
    }

    /// Make every future `mutate`/`delete` of `id` fail with a rejection.
    pub fn fail_on(&self, id: ItemId) {
        lock(&self.fail_ids).insert(id);
    }

    pub fn items(&self) -> Vec<ContentItem> {
        lock(&self.items).clone()
    }

    /// Ids mutated or deleted so far, in call order.
    pub fn mutation_log(&self) -> Vec<ItemId> {
        lock(&self.mutation_log).clone()
    }

    fn check_failure(&self, id: &ItemId) -> Result<(), ApiError> {
        if lock(&self.fail_ids).contains(id) {
            return Err(ApiError::Rejected {
                status: 500,
                message: format!("injected failure for {id}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContentApi for InMemoryContentApi {
    async fn list(&self, shop: &ShopId) -> Result<Vec<ContentItem>, ApiError> {
        Ok(lock(&self.items)
            .iter()
            .filter(|item| item.shop_id.as_ref().map(|s| s == shop).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn create(&self, payload: &CreateItem) -> Result<ContentItem, ApiError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let item = ContentItem {
            id: ItemId::from(id),
            title: payload.title.clone(),
            body: payload.body.clone(),
            platform: payload.platform.clone(),
            status: payload.status.clone(),
            scheduled_at: payload.scheduled_at.clone(),
            channel_id: payload.channel_id,
            shop_id: Some(payload.shop_id.clone()),
            created_at: None,
            updated_at: None,
        };
        lock(&self.items).push(item.clone());
        Ok(item)
    }

    async fn mutate(
        &self,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> Result<Option<ContentItem>, ApiError> {
        self.check_failure(id)?;
        lock(&self.mutation_log).push(id.clone());
        let mut items = lock(&self.items);
        let Some(slot) = items.iter_mut().find(|item| &item.id == id) else {
            return Err(ApiError::Rejected {
                status: 404,
                message: format!("no item {id}"),
            });
        };
        *slot = patch.apply_to(slot);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &ItemId, _shop: &ShopId) -> Result<(), ApiError> {
        self.check_failure(id)?;
        lock(&self.mutation_log).push(id.clone());
        let mut items = lock(&self.items);
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Err(ApiError::Rejected {
                status: 404,
                message: format!("no item {id}"),
            });
        }
        Ok(())
    }
}
