//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Scripted in-memory API and fixtures
//! - Mock server helpers
//! - Custom assertion macros

pub mod fixtures;
pub mod scripted;

// Re-export commonly used utilities
pub use fixtures::*;
pub use mock_server::*;
pub use scripted::ScriptedClient;
