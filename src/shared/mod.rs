//! Shared Module
//!
//! Platform-agnostic types used by the client: configuration, wire models,
//! list normalization and the Brazilian-format input helpers. Nothing here
//! touches the network or the UI.

/// Application configuration
pub mod config;

/// Shared error types
pub mod error;

/// Input masks and date conversions
pub mod format;

/// Wire models for the compliance API
pub mod models;

/// Page normalization and paging cursor
pub mod pagination;

pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use models::{ChecklistItem, DocumentRecord, ItemId, Role, UserRecord};
pub use pagination::{Page, Pagination};
