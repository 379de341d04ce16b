//! Data models for extracted documents and configuration.

pub mod config;
pub mod record;
