//! Infrastructure layer: storage backends, config and service wiring.

pub mod audit_store;
pub mod config;
pub mod db;
pub mod permission_store;
pub mod services;

pub use config::{ConfigError, StorageBackend, StorageConfig};
pub use services::Services;

#[cfg(test)]
mod integration_tests;
