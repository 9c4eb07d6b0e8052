//! Per-rule summaries of a flag column.

use chrono::{DateTime, Utc};
use hwplant_core::{Result, TelemetryTable};
use serde::{Deserialize, Serialize};

use crate::faults::{flag_column, rule_info, Granularity};

/// How often, and when, one rule's flag was raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultSummary {
    pub rule_id: u8,
    pub flag_column: String,
    pub description: String,
    pub granularity: Granularity,
    /// Rows (or hour buckets) the flag covers.
    pub total: usize,
    pub flagged: usize,
    /// `flagged / total * 100`, 0 for an empty table.
    pub percent_flagged: f64,
    pub first_flagged: Option<DateTime<Utc>>,
    pub last_flagged: Option<DateTime<Utc>>,
}

impl FaultSummary {
    /// Summarize `fc<rule_id>_flag` in `table`.
    pub fn from_flags(rule_id: u8, table: &TelemetryTable) -> Result<Self> {
        let column = flag_column(rule_id);
        let flags = table.flags(&column)?;

        let flagged_at: Vec<DateTime<Utc>> = table
            .index()
            .iter()
            .zip(&flags)
            .filter(|(_, &f)| f)
            .map(|(ts, _)| *ts)
            .collect();

        let total = flags.len();
        let flagged = flagged_at.len();
        let percent_flagged = if total == 0 {
            0.0
        } else {
            flagged as f64 / total as f64 * 100.0
        };

        let (description, granularity) = match rule_info(rule_id) {
            Some(info) => (info.description.to_string(), info.granularity),
            None => (String::new(), Granularity::Row),
        };

        Ok(Self {
            rule_id,
            flag_column: column,
            description,
            granularity,
            total,
            flagged,
            percent_flagged,
            first_flagged: flagged_at.first().copied(),
            last_flagged: flagged_at.last().copied(),
        })
    }
}
