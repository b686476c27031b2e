//! Test suite for the LGPD client
//!
//! This module organizes all tests

pub mod common;
pub mod integration;
pub mod property;
