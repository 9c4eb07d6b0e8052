use thiserror::Error;

use crate::column::{ColumnType, SemanticType};

#[derive(Error, Debug)]
pub enum FaultError {
    /// Column storage type does not match the rule's declared semantic type.
    #[error("column '{column}' failed a {expected} check: expected {} data, found {found}", .expected.storage())]
    TypeMismatch {
        column: String,
        expected: SemanticType,
        found: ColumnType,
    },

    /// Column values exceed the semantic type's upper bound.
    #[error("column '{column}' failed a {expected} check: max observed value {observed} exceeds {bound}")]
    RangeViolation {
        column: String,
        expected: SemanticType,
        bound: f64,
        observed: f64,
    },

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Table error: {0}")]
    Table(String),
}

impl FaultError {
    /// Name of the offending column, for validation failures.
    pub fn column(&self) -> Option<&str> {
        match self {
            FaultError::TypeMismatch { column, .. }
            | FaultError::RangeViolation { column, .. }
            | FaultError::MissingColumn(column) => Some(column),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FaultError>;
