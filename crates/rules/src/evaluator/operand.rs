//! Comparison operands and their per-row evaluation.

use std::fmt;

use hwplant_core::{Result, TelemetryTable};

/// Why a row has no usable operand value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndefinedValue {
    /// A source reading is NaN.
    Missing,
    /// A normalization divisor is zero for this row.
    DivisionUndefined,
}

/// Per-row operand value.
pub type Cell = std::result::Result<f64, UndefinedValue>;

/// One side of a comparison: a column, a setpoint, or an expression over them.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(String),
    Scalar(f64),
    /// `base + delta`
    Offset(Box<Operand>, f64),
    /// `base * factor`
    Scaled(Box<Operand>, f64),
    /// `(flow * value) / flow`, undefined where `flow` is zero.
    FlowWeighted { flow: String, value: String },
    /// `|lhs - rhs|`
    AbsDiff(Box<Operand>, Box<Operand>),
}

impl Operand {
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }

    pub fn scalar(value: f64) -> Self {
        Operand::Scalar(value)
    }

    pub fn plus(self, delta: f64) -> Self {
        Operand::Offset(Box::new(self), delta)
    }

    pub fn minus(self, delta: f64) -> Self {
        Operand::Offset(Box::new(self), -delta)
    }

    pub fn times(self, factor: f64) -> Self {
        Operand::Scaled(Box::new(self), factor)
    }

    pub fn flow_weighted(flow: impl Into<String>, value: impl Into<String>) -> Self {
        Operand::FlowWeighted {
            flow: flow.into(),
            value: value.into(),
        }
    }

    pub fn abs_diff(self, other: Operand) -> Self {
        Operand::AbsDiff(Box::new(self), Box::new(other))
    }

    /// Evaluate for every row of `table`.
    ///
    /// Fails only when a referenced column does not exist. NaN readings and
    /// zero divisors come back as per-row [`UndefinedValue`]s.
    pub fn evaluate(&self, table: &TelemetryTable) -> Result<Vec<Cell>> {
        match self {
            Operand::Column(name) => Ok(table
                .column(name)?
                .to_f64()
                .into_iter()
                .map(defined)
                .collect()),
            Operand::Scalar(v) => Ok(vec![defined(*v); table.len()]),
            Operand::Offset(base, delta) => Ok(base
                .evaluate(table)?
                .into_iter()
                .map(|c| c.map(|x| x + delta))
                .collect()),
            Operand::Scaled(base, factor) => Ok(base
                .evaluate(table)?
                .into_iter()
                .map(|c| c.map(|x| x * factor))
                .collect()),
            Operand::FlowWeighted { flow, value } => {
                let flows = table.column(flow)?.to_f64();
                let values = table.column(value)?.to_f64();
                Ok(flows
                    .into_iter()
                    .zip(values)
                    .map(|(f, v)| flow_weighted(f, v))
                    .collect())
            }
            Operand::AbsDiff(lhs, rhs) => {
                let lhs = lhs.evaluate(table)?;
                let rhs = rhs.evaluate(table)?;
                Ok(lhs
                    .into_iter()
                    .zip(rhs)
                    .map(|(l, r)| -> Cell { Ok((l? - r?).abs()) })
                    .collect())
            }
        }
    }
}

fn defined(x: f64) -> Cell {
    if x.is_nan() {
        Err(UndefinedValue::Missing)
    } else {
        Ok(x)
    }
}

/// `(flow * value) / flow`. Algebraically `value` for any nonzero flow.
fn flow_weighted(flow: f64, value: f64) -> Cell {
    let flow = defined(flow)?;
    let value = defined(value)?;
    if flow == 0.0 {
        return Err(UndefinedValue::DivisionUndefined);
    }
    defined(flow * value / flow)
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(name) => write!(f, "{name}"),
            Operand::Scalar(v) => write!(f, "{v}"),
            Operand::Offset(base, delta) if *delta < 0.0 => write!(f, "({base} - {})", -delta),
            Operand::Offset(base, delta) => write!(f, "({base} + {delta})"),
            Operand::Scaled(base, factor) => write!(f, "({base} * {factor})"),
            Operand::FlowWeighted { flow, value } => write!(f, "({flow} * {value} / {flow})"),
            Operand::AbsDiff(lhs, rhs) => write!(f, "|{lhs} - {rhs}|"),
        }
    }
}
