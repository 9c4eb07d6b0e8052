//! YAML schema for rule-set documents.

mod metadata;
mod rule_set;

pub use metadata::*;
pub use rule_set::*;
