//! Item filtering shared by every view.

use crate::classify::{PlanStatus, Platform};
use crate::model::ContentItem;

/// Conjunctive filter: an item must satisfy every set field.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring over id, title and body.
    pub query: Option<String>,
    pub status: Option<PlanStatus>,
    pub platform: Option<Platform>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.status.is_none() && self.platform.is_none()
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        if let Some(query) = &self.query {
            let needle = query.to_lowercase();
            let haystack =
                format!("{} {} {}", item.id, item.title, item.body).to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if item.plan_status() != status {
                return false;
            }
        }
        if let Some(platform) = self.platform {
            if item.platform() != platform {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }
}
