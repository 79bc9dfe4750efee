//! Utility modules for the decorator buildpack
//!
//! Currently just structured logging setup.

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
