//! Fault detection rules for hot-water heating plants.
//!
//! This crate provides:
//! - Semantic column validation (fractional percentages, binary status, stages)
//! - A NaN-safe predicate evaluator with AND/OR composition
//! - Hourly transition counting for cycling rules
//! - The 14 fault conditions (fc1–fc14) behind one [`faults::FaultRule`] contract
//! - YAML rule-set documents, a filesystem loader, and a batch [`registry::RuleSet`]

pub mod cycling;
pub mod diagnostics;
pub mod evaluator;
pub mod faults;
pub mod loader;
pub mod registry;
pub mod schema;
pub mod summary;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use faults::{FaultCondition, FaultRule};
pub use registry::{RuleSet, RunReport};
