//! Column validation: storage type and value bound per semantic type.
//!
//! A rule declares which of its input columns carry a semantic type
//! (status bits, percentage commands, stage numbers) and every one of them
//! is checked before the rule computes anything. Columns a rule reads
//! without declaring (raw temperatures, pressures) are not checked.

use hwplant_core::{FaultError, Result, SemanticType, TelemetryTable};

/// One column a rule requires to have a given semantic type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCheck {
    pub column: String,
    pub semantic: SemanticType,
}

impl ColumnCheck {
    pub fn new(column: impl Into<String>, semantic: SemanticType) -> Self {
        Self {
            column: column.into(),
            semantic,
        }
    }

    pub fn binary_status(column: impl Into<String>) -> Self {
        Self::new(column, SemanticType::BinaryStatus)
    }

    pub fn fractional_percentage(column: impl Into<String>) -> Self {
        Self::new(column, SemanticType::FractionalPercentage)
    }

    pub fn stage_integer(column: impl Into<String>) -> Self {
        Self::new(column, SemanticType::StageInteger)
    }
}

/// Check one column's storage type, then its upper bound across every row.
///
/// NaN readings are ignored when taking the maximum.
pub fn validate_column(table: &TelemetryTable, column: &str, expected: SemanticType) -> Result<()> {
    let data = table.column(column)?;

    let found = data.column_type();
    if found != expected.storage() {
        return Err(FaultError::TypeMismatch {
            column: column.to_string(),
            expected,
            found,
        });
    }

    if let (Some(bound), Some(observed)) = (expected.upper_bound(), data.max()) {
        if observed > bound {
            return Err(FaultError::RangeViolation {
                column: column.to_string(),
                expected,
                bound,
                observed,
            });
        }
    }

    Ok(())
}

/// Run every check in order, failing on the first violation.
pub fn validate_columns(table: &TelemetryTable, checks: &[ColumnCheck]) -> Result<()> {
    for check in checks {
        validate_column(table, &check.column, check.semantic)?;
    }
    Ok(())
}
