//! RESTlet Actions
//!
//! One client method per RESTlet action:
//!
//! - **Reads** (GET): reference data and demo record listings, with cached
//!   variants for the lookups that rarely change
//! - **Writes** (POST): record creation, demo setup and cleanup

pub mod reads;
pub mod writes;

pub use reads::DEFAULT_DEMO_PREFIX;
