//! Photobooth Common Utilities
//!
//! Shared infrastructure for all Photobooth crates:
//! - Error types and result aliases
//! - Session and wall clocks
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
