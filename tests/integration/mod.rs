//! Integration tests
//!
//! Screens driven through the scripted client, and the reqwest client
//! against a mock HTTP server.

mod auth_test;
mod checklist_toggle_test;
mod http_client_test;
mod users_test;
