//! Threshold predicate evaluation.
//!
//! A threshold rule is a list of named [`Predicate`]s, each an elementwise
//! comparison between two [`Operand`]s. Evaluating them yields one boolean
//! column per predicate ([`Conditions`]); the rule's flag is their row-wise
//! AND.
//!
//! Comparisons are NaN-safe: a row where either operand is missing, or where
//! a normalization divisor is zero, evaluates to `false` for that predicate.

mod composition;
mod operand;

use std::fmt;

use hwplant_core::{Column, Result, TelemetryTable};
use tracing::debug;

use crate::diagnostics::Diagnostics;

pub use composition::{combine_all, combine_any};
pub use operand::{Cell, Operand, UndefinedValue};

// ── Comparison operators ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
}

impl CompareOp {
    pub fn check(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Lte => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Gte => lhs >= rhs,
            CompareOp::Eq => lhs == rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Eq => "==",
        }
    }
}

// ── Predicates ──────────────────────────────────────────────────────

/// A named per-row condition, e.g. `pump_check: pump_status == 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub name: &'static str,
    pub lhs: Operand,
    pub op: CompareOp,
    pub rhs: Operand,
}

impl Predicate {
    pub fn new(name: &'static str, lhs: Operand, op: CompareOp, rhs: Operand) -> Self {
        Self { name, lhs, op, rhs }
    }

    /// `column == value`, the usual status-bit check.
    pub fn equals(name: &'static str, column: &str, value: f64) -> Self {
        Self::new(name, Operand::column(column), CompareOp::Eq, Operand::scalar(value))
    }

    /// Evaluate for every row. Undefined rows are `false`.
    pub fn evaluate(&self, table: &TelemetryTable) -> Result<Vec<bool>> {
        let lhs = self.lhs.evaluate(table)?;
        let rhs = self.rhs.evaluate(table)?;

        let mut missing = 0usize;
        let mut division_undefined = 0usize;
        let values: Vec<bool> = lhs
            .into_iter()
            .zip(rhs)
            .map(|cells| match cells {
                (Ok(l), Ok(r)) => self.op.check(l, r),
                (Err(e), _) | (_, Err(e)) => {
                    match e {
                        UndefinedValue::Missing => missing += 1,
                        UndefinedValue::DivisionUndefined => division_undefined += 1,
                    }
                    false
                }
            })
            .collect();

        debug!(
            predicate = self.name,
            expr = %self,
            rows = values.len(),
            true_rows = values.iter().filter(|&&v| v).count(),
            missing,
            division_undefined,
            "evaluated predicate"
        );
        Ok(values)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

// ── Evaluated conditions ────────────────────────────────────────────

/// Intermediate boolean columns of one rule, in predicate order.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    rows: usize,
    entries: Vec<(&'static str, Vec<bool>)>,
}

impl Conditions {
    pub fn get(&self, name: &str) -> Option<&[bool]> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    /// Row-wise AND of every condition.
    pub fn all(&self) -> Vec<bool> {
        let columns: Vec<&[bool]> = self.entries.iter().map(|(_, v)| v.as_slice()).collect();
        combine_all(&columns, self.rows)
    }

    /// Hand the intermediate columns over as 0/1 diagnostics columns.
    pub fn into_diagnostics(self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for (name, values) in self.entries {
            diagnostics.push(name, Column::from_flags(&values));
        }
        diagnostics
    }
}

/// Evaluate every predicate against `table`.
pub fn evaluate_predicates(predicates: &[Predicate], table: &TelemetryTable) -> Result<Conditions> {
    let mut conditions = Conditions {
        rows: table.len(),
        entries: Vec::with_capacity(predicates.len()),
    };
    for predicate in predicates {
        let values = predicate.evaluate(table)?;
        conditions.entries.push((predicate.name, values));
    }
    Ok(conditions)
}

// ── Tests ───────────────────────────────────────────────────────────
