//! Rule registry: a configured set of fault rules run as one batch.
//!
//! Every rule is applied to the same input table independently, so one
//! rule's output or failure never affects another. Row-granular results
//! are merged into a single table; hourly results stay separate.

use hwplant_core::{FaultError, Result, TelemetryTable};
use tracing::{info, warn};

use crate::faults::{FaultCondition, FaultRule, Granularity};
use crate::summary::FaultSummary;

/// Ordered collection of configured fault rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<FaultCondition>,
}

/// Hourly output of one cycling rule.
#[derive(Debug, Clone)]
pub struct HourlyFlags {
    pub rule_id: u8,
    pub table: TelemetryTable,
}

/// A rule that failed validation or evaluation.
#[derive(Debug)]
pub struct RuleFailure {
    pub rule_id: u8,
    pub error: FaultError,
}

/// Result of running a [`RuleSet`] over one table.
#[derive(Debug)]
pub struct RunReport {
    /// Input columns plus every row-granular flag (and kept helper columns).
    pub flags: TelemetryTable,
    pub hourly: Vec<HourlyFlags>,
    pub failures: Vec<RuleFailure>,
    pub summaries: Vec<FaultSummary>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl RuleSet {
    pub fn new(rules: Vec<FaultCondition>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FaultCondition] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First configured rule with the given id.
    pub fn get(&self, id: u8) -> Option<&FaultCondition> {
        self.rules.iter().find(|r| r.id() == id)
    }

    /// Keep only the rules whose id is listed. An empty list keeps all.
    pub fn retain_ids(&mut self, ids: &[u8]) {
        if !ids.is_empty() {
            self.rules.retain(|r| ids.contains(&r.id()));
        }
    }

    /// Apply every rule to `table` independently.
    pub fn run(&self, table: &TelemetryTable) -> RunReport {
        let mut report = RunReport {
            flags: table.clone(),
            hourly: Vec::new(),
            failures: Vec::new(),
            summaries: Vec::new(),
        };

        for rule in &self.rules {
            let rule_id = rule.id();
            let outcome = rule
                .apply(table)
                .and_then(|out| collect_output(rule, out, &mut report));
            if let Err(error) = outcome {
                warn!(rule = rule_id, error = %error, "fault rule failed");
                report.failures.push(RuleFailure { rule_id, error });
            }
        }

        info!(
            rules = self.rules.len(),
            failed = report.failures.len(),
            hourly = report.hourly.len(),
            "rule set run complete"
        );
        report
    }
}

/// Row rules replace any same-named input column, so a table that already
/// carries `fc<N>_flag` from an earlier run gets the fresh flag.
fn collect_output(
    rule: &FaultCondition,
    out: TelemetryTable,
    report: &mut RunReport,
) -> Result<()> {
    let rule_id = rule.id();
    report.summaries.push(FaultSummary::from_flags(rule_id, &out)?);

    match rule.granularity() {
        Granularity::Row => {
            for name in rule.written_columns() {
                report.flags.insert_column(name.as_str(), out.column(&name)?.clone())?;
            }
        }
        Granularity::Hourly => report.hourly.push(HourlyFlags { rule_id, table: out }),
    }
    Ok(())
}
