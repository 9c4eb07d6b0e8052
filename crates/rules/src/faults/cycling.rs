//! Excessive cycling and staging rules: fc12, fc13, fc14.
//!
//! These rules collapse the input to one row per hour. Each rule derives
//! one or more on/off series from a state column, counts off→on
//! transitions per hour, and flags an hour when any series exceeds the
//! configured maximum.

use hwplant_core::{Column, Result, TelemetryTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cycling::{bucket_starts, count_transitions, hourly};
use crate::diagnostics::Diagnostics;
use crate::validation::{validate_columns, ColumnCheck};

/// A rule that flags hours with too many state transitions.
pub(crate) trait CyclingFault {
    fn column_checks(&self) -> Vec<ColumnCheck>;
    /// Named on/off series, one value per input row.
    fn tracked_states(&self, table: &TelemetryTable) -> Result<Vec<(&'static str, Vec<bool>)>>;
    fn max_per_hour(&self) -> u32;
    fn troubleshoot(&self) -> bool;
}

pub(super) fn apply(
    id: u8,
    rule: &dyn CyclingFault,
    table: &TelemetryTable,
) -> Result<TelemetryTable> {
    let flag_column = super::flag_column(id);
    validate_columns(table, &rule.column_checks())?;

    let width = hourly();
    let mut out = TelemetryTable::with_index(bucket_starts(table.index(), width)?)?;
    let max = rule.max_per_hour();
    let mut flag = vec![false; out.len()];
    let mut diagnostics = Diagnostics::new();

    for (name, states) in rule.tracked_states(table)? {
        let samples: Vec<_> = table.index().iter().copied().zip(states).collect();
        let counts = count_transitions(&samples, width)?;
        debug!(
            rule = id,
            series = name,
            buckets = counts.len(),
            peak = counts.iter().map(|c| c.transitions).max().unwrap_or(0),
            "counted transitions"
        );
        for (f, bucket) in flag.iter_mut().zip(&counts) {
            *f |= bucket.transitions > max;
        }
        diagnostics.push(
            name,
            Column::Int(counts.iter().map(|c| i64::from(c.transitions)).collect()),
        );
    }

    diagnostics.finish(&mut out, &flag_column, &flag, rule.troubleshoot())?;
    info!(
        rule = id,
        flag = %flag_column,
        hours = flag.len(),
        flagged = flag.iter().filter(|&&f| f).count(),
        "fault rule applied"
    );
    Ok(out)
}

fn default_on_deadband() -> f64 {
    0.01
}

/// fc12: the whole plant cycling, seen as loop pumps starting and stopping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExcessivePlantCycling {
    pub plant_os_max: u32,
    pub pump_vfd_speed_col: String,
    /// Speed above which the pumps count as on.
    #[serde(default = "default_on_deadband")]
    pub pump_on_deadband: f64,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl CyclingFault for ExcessivePlantCycling {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::fractional_percentage(&self.pump_vfd_speed_col)]
    }

    fn tracked_states(&self, table: &TelemetryTable) -> Result<Vec<(&'static str, Vec<bool>)>> {
        let speed = table.column(&self.pump_vfd_speed_col)?.to_f64();
        let on: Vec<bool> = speed.iter().map(|&s| s > self.pump_on_deadband).collect();
        let off: Vec<bool> = speed.iter().map(|&s| s == 0.0).collect();
        Ok(vec![("loop_pumps_on_mode", on), ("loop_pumps_off_mode", off)])
    }

    fn max_per_hour(&self) -> u32 {
        self.plant_os_max
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

/// fc13: an individual boiler (or its circulation pump) cycling on and off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExcessiveBoilerCycling {
    pub boiler_os_max: u32,
    pub boiler_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl CyclingFault for ExcessiveBoilerCycling {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.boiler_status_bool_col)]
    }

    fn tracked_states(&self, table: &TelemetryTable) -> Result<Vec<(&'static str, Vec<bool>)>> {
        let status = table.column(&self.boiler_status_bool_col)?.to_f64();
        let on: Vec<bool> = status.iter().map(|&s| s == 1.0).collect();
        let off: Vec<bool> = status.iter().map(|&s| s == 0.0).collect();
        Ok(vec![("boiler_on_mode", on), ("boiler_off_mode", off)])
    }

    fn max_per_hour(&self) -> u32 {
        self.boiler_os_max
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

/// fc14: a staged boiler changing stage too often.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExcessiveBoilerStaging {
    pub boiler_stage_os_max: u32,
    pub boiler_stage_int_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl CyclingFault for ExcessiveBoilerStaging {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::stage_integer(&self.boiler_stage_int_col)]
    }

    fn tracked_states(&self, table: &TelemetryTable) -> Result<Vec<(&'static str, Vec<bool>)>> {
        let stage = table.column(&self.boiler_stage_int_col)?.to_f64();
        // First row has no predecessor and is never a change.
        let changed: Vec<bool> = stage
            .iter()
            .enumerate()
            .map(|(i, &s)| i > 0 && (s - stage[i - 1]).abs() != 0.0)
            .collect();
        Ok(vec![("boiler_stage_change", changed)])
    }

    fn max_per_hour(&self) -> u32 {
        self.boiler_stage_os_max
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}
