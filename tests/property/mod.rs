//! Property-based tests

mod format_proptest;
mod pagination_proptest;
mod toggle_proptest;
