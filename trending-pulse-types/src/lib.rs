//! Shared wire and domain types for Trending Pulse.

mod base64_serde;

pub mod catalog;
pub mod config;
pub mod content;
pub mod enums;
pub mod models;
pub mod response;
pub mod schema;
