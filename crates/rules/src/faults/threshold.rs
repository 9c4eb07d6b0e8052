//! Shared driver for row-granular threshold rules (fc1–fc11).

use hwplant_core::{Result, TelemetryTable};
use tracing::{debug, info};

use crate::evaluator::{evaluate_predicates, Predicate};
use crate::validation::{validate_columns, ColumnCheck};

/// A rule whose flag is the row-wise AND of its predicates.
pub(crate) trait ThresholdFault {
    fn column_checks(&self) -> Vec<ColumnCheck>;
    fn predicates(&self) -> Vec<Predicate>;
    fn troubleshoot(&self) -> bool;
}

pub(super) fn apply(
    id: u8,
    rule: &dyn ThresholdFault,
    table: &TelemetryTable,
) -> Result<TelemetryTable> {
    let flag_column = super::flag_column(id);
    validate_columns(table, &rule.column_checks())?;

    let predicates = rule.predicates();
    debug!(
        rule = id,
        predicates = predicates.len(),
        rows = table.len(),
        "evaluating threshold rule"
    );
    let conditions = evaluate_predicates(&predicates, table)?;
    let flag = conditions.all();

    let mut out = table.clone();
    conditions
        .into_diagnostics()
        .finish(&mut out, &flag_column, &flag, rule.troubleshoot())?;

    info!(
        rule = id,
        flag = %flag_column,
        rows = flag.len(),
        flagged = flag.iter().filter(|&&f| f).count(),
        "fault rule applied"
    );
    Ok(out)
}
