//! Shared types for hot-water plant fault detection: the time-indexed
//! telemetry table, column semantic types, errors and process config.

pub mod column;
pub mod config;
pub mod error;
pub mod table;

pub use column::*;
pub use config::Config;
pub use error::*;
pub use table::*;
