//! Builders
//!
//! Fluent builder for NetSuite configuration.

pub mod config;

pub use config::{netsuite_config, NetSuiteConfigBuilder};
