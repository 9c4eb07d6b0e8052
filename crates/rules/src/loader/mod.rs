//! Filesystem loader for `FaultRuleSet` YAML documents.
//!
//! Documents are parsed in two passes: the raw YAML tree is checked for the
//! envelope (`apiVersion`, `kind`) and for parameter sanity, then the whole
//! document is deserialized into [`RuleSetDocument`](crate::schema::RuleSetDocument).

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::{load_file, parse_str, RuleLoader};
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
