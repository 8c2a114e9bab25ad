pub mod app;
pub mod bulk;
pub mod classify;
pub mod cli;
pub mod config;
pub mod model;
pub mod remote;
pub mod selection;
pub mod timeline;
pub mod workflow;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use model::{ContentItem, ItemId, ShopId};
