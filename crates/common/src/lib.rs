//! Subdrawer Common Utilities
//!
//! Shared infrastructure for all Subdrawer crates:
//! - Error taxonomy and result alias
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
