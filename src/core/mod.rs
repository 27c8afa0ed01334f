// src/core/mod.rs
//! Shared services: configuration, persistence, caching and export

pub mod cache;
pub mod config_manager;
pub mod database;
pub mod export;

pub use cache::SearchCache;
pub use config_manager::ConfigManager;
pub use database::{Database, LeadService};
