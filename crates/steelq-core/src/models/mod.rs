//! Data models for configuration and extracted records.

pub mod config;
pub mod record;
