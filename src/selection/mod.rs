//! Multi-select over visible items.
//!
//! Selection order is meaningful: bulk operations run in the order items
//! were selected, so the set preserves insertion order rather than sorting.

use indexmap::IndexSet;

use crate::model::{ContentItem, ItemId};

#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: IndexSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns true when the id is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.shift_remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Replace the selection with every visible item, in list order.
    pub fn select_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a ContentItem>) {
        self.ids = visible.into_iter().map(|item| item.id.clone()).collect();
    }

    pub fn remove(&mut self, id: &ItemId) -> bool {
        self.ids.shift_remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }

    /// Drop selected ids that no longer appear in `items`. Called after a
    /// reload so stale selections cannot target deleted rows.
    pub fn prune(&mut self, items: &[ContentItem]) {
        self.ids.retain(|id| items.iter().any(|item| &item.id == id));
    }

    /// Selected items in selection order. Ids that match nothing in `items`
    /// are skipped.
    pub fn resolve<'a>(&self, items: &'a [ContentItem]) -> Vec<&'a ContentItem> {
        self.ids
            .iter()
            .filter_map(|id| items.iter().find(|item| &item.id == id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64) -> ContentItem {
        serde_json::from_value(serde_json::json!({"id": id})).expect("test item")
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle(ItemId::from(1)));
        assert!(selection.contains(&ItemId::from(1)));
        assert!(!selection.toggle(ItemId::from(1)));
        assert!(selection.is_empty());
    }

    #[test]
    fn resolve_returns_items_in_selection_order() {
        let items = vec![item(1), item(2), item(3)];
        let mut selection = SelectionSet::new();
        selection.toggle(ItemId::from(3));
        selection.toggle(ItemId::from(1));
        let resolved: Vec<_> = selection
            .resolve(&items)
            .into_iter()
            .map(|i| i.id.as_str().to_string())
            .collect();
        assert_eq!(resolved, vec!["3", "1"]);
    }

    #[test]
    fn resolve_skips_stale_ids() {
        let items = vec![item(1)];
        let mut selection = SelectionSet::new();
        selection.toggle(ItemId::from(1));
        selection.toggle(ItemId::from(99));
        assert_eq!(selection.resolve(&items).len(), 1);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn select_all_replaces_in_list_order() {
        let items = vec![item(5), item(2), item(9)];
        let mut selection = SelectionSet::new();
        selection.toggle(ItemId::from(2));
        selection.select_all(&items);
        let order: Vec<_> = selection.ids().map(|id| id.as_str().to_string()).collect();
        assert_eq!(order, vec!["5", "2", "9"]);
    }

    #[test]
    fn prune_drops_ids_missing_from_the_reload() {
        let mut selection = SelectionSet::new();
        selection.toggle(ItemId::from(1));
        selection.toggle(ItemId::from(2));
        selection.prune(&[item(2)]);
        assert!(!selection.contains(&ItemId::from(1)));
        assert!(selection.contains(&ItemId::from(2)));
    }

    #[test]
    fn toggle_after_remove_keeps_later_ids_in_place() {
        let mut selection = SelectionSet::new();
        for id in [1, 2, 3] {
            selection.toggle(ItemId::from(id));
        }
        selection.remove(&ItemId::from(1));
        let order: Vec<_> = selection.ids().map(|id| id.as_str().to_string()).collect();
        assert_eq!(order, vec!["2", "3"]);
    }
}
