//! Closed vocabularies over the free-form strings the backend stores.
//!
//! Every normalizer here is total: any input string, including empty and
//! non-ASCII, maps to some variant. Items are never dropped for carrying a
//! vocabulary the engine does not know.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Planner-side lifecycle of an item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum PlanStatus {
    Idea,
    Draft,
    Scheduled,
    Posted,
}

/// Tracker-side delivery state of a scheduled post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Scheduled,
    Processing,
    Retrying,
    Posted,
    Failed,
    Dead,
    Cancelled,
    Unknown,
}

/// Publishing destination. Short-form aliases used by operators are folded
/// into the canonical names; anything else is `Unknown`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[strum(serialize = "facebook", serialize = "fb")]
    Facebook,
    #[strum(serialize = "instagram", serialize = "ig")]
    Instagram,
    #[strum(serialize = "tiktok", serialize = "tt")]
    Tiktok,
    #[strum(serialize = "youtube", serialize = "yt")]
    Youtube,
    Zalo,
    Threads,
    #[strum(to_string = "x", serialize = "twitter")]
    X,
    Unknown,
}

/// Unrecognized planner statuses read as `Draft`. The backend has shipped
/// rows with casing drift and one-off labels, and the board must still show
/// them somewhere editable.
pub fn normalize_plan_status(raw: &str) -> PlanStatus {
    raw.trim().parse().unwrap_or(PlanStatus::Draft)
}

/// Unrecognized delivery states read as `Unknown` rather than guessing a
/// terminal state.
pub fn normalize_post_status(raw: &str) -> PostStatus {
    raw.trim().parse().unwrap_or(PostStatus::Unknown)
}

pub fn normalize_platform(raw: &str) -> Platform {
    raw.trim().parse().unwrap_or(Platform::Unknown)
}
