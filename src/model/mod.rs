use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::classify::{normalize_plan_status, normalize_platform, normalize_post_status};
use crate::classify::{PlanStatus, Platform, PostStatus};

/// Opaque content-item identifier. The backend is inconsistent about whether
/// ids arrive as JSON numbers or strings, so everything is stringified on the
/// way in and compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        ItemId(raw.to_string())
    }
}

impl From<String> for ItemId {
    fn from(raw: String) -> Self {
        ItemId(raw)
    }
}

impl From<i64> for ItemId {
    fn from(raw: i64) -> Self {
        ItemId(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        scalar_string(deserializer, "item id").map(ItemId)
    }
}

/// Owning shop scope. The engine never mixes items across scopes; every
/// remote call carries the scope explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShopId(String);

impl ShopId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShopId {
    fn from(raw: &str) -> Self {
        ShopId(raw.to_string())
    }
}

impl From<String> for ShopId {
    fn from(raw: String) -> Self {
        ShopId(raw)
    }
}

impl<'de> Deserialize<'de> for ShopId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        scalar_string(deserializer, "shop id").map(ShopId)
    }
}

fn scalar_string<'de, D>(deserializer: D, what: &str) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number {what}, got {other}"
        ))),
    }
}

/// The unit scheduled and tracked by the engine.
///
/// `status`, `platform` and the timestamps are kept as the raw wire strings:
/// the planner and tracker views read different closed vocabularies out of
/// the same stored item, and a malformed `scheduled_at` must survive intact
/// so the owning item routes to backlog instead of being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    /// Free-text body. The backend uses `idea` on planner rows and
    /// `content`/`message` on scheduled posts.
    #[serde(default, alias = "idea", alias = "content", alias = "message")]
    pub body: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub status: String,
    /// Independent of `status`: an item may claim "Scheduled" while carrying
    /// no timestamp, and it then belongs in the backlog.
    #[serde(default, alias = "scheduled_time")]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub channel_id: Option<i64>,
    #[serde(default)]
    pub shop_id: Option<ShopId>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ContentItem {
    /// Planner-view status, total over any raw string.
    pub fn plan_status(&self) -> PlanStatus {
        normalize_plan_status(&self.status)
    }

    /// Tracker-view status, total over any raw string.
    pub fn post_status(&self) -> PostStatus {
        normalize_post_status(&self.status)
    }

    pub fn platform(&self) -> Platform {
        normalize_platform(&self.platform)
    }

    pub fn has_schedule(&self) -> bool {
        self.scheduled_at
            .as_deref()
            .map(|raw| !raw.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Payload for the remote `create` operation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateItem {
    pub shop_id: ShopId,
    pub title: String,
    #[serde(rename = "idea")]
    pub body: String,
    pub platform: String,
    pub status: String,
    pub scheduled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
}

impl CreateItem {
    /// First required field missing from the payload, if any. The create
    /// flow requires a title, a platform and a schedule; validation happens
    /// locally, before any network round-trip.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            return Some("title");
        }
        if self.platform.trim().is_empty() {
            return Some("platform");
        }
        match self.scheduled_at.as_deref() {
            Some(raw) if !raw.trim().is_empty() => None,
            _ => Some("scheduled_at"),
        }
    }
}

/// Sparse patch for the remote `mutate` operation. `None` fields are left
/// untouched by the backend; the shop scope rides along with every patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "idea", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<ShopId>,
}

impl ItemPatch {
    pub fn status(next: PlanStatus, shop: &ShopId) -> Self {
        Self {
            status: Some(next.to_string()),
            shop_id: Some(shop.clone()),
            ..Self::default()
        }
    }

    pub fn schedule(scheduled_at: String, shop: &ShopId) -> Self {
        Self {
            scheduled_at: Some(scheduled_at),
            shop_id: Some(shop.clone()),
            ..Self::default()
        }
    }

    /// Local fallback merge for backends that acknowledge a mutation without
    /// echoing the updated row.
    pub fn apply_to(&self, item: &ContentItem) -> ContentItem {
        let mut next = item.clone();
        if let Some(status) = &self.status {
            next.status = status.clone();
        }
        if let Some(scheduled_at) = &self.scheduled_at {
            next.scheduled_at = Some(scheduled_at.clone());
        }
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(body) = &self.body {
            next.body = body.clone();
        }
        if let Some(platform) = &self.platform {
            next.platform = platform.clone();
        }
        if let Some(channel_id) = self.channel_id {
            next.channel_id = Some(channel_id);
        }
        next
    }
}
