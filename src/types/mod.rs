//! NetSuite Types
//!
//! Configuration, action parameters and the uniform call result.

pub mod actions;
pub mod config;
pub mod result;

pub use actions::*;
pub use config::*;
pub use result::*;
