//! The 14 hot-water plant fault conditions.
//!
//! Each condition is a plain configuration struct (thresholds, column
//! names, a `troubleshoot` toggle). [`FaultCondition`] wraps them as one
//! serde-tagged enum and implements the uniform [`FaultRule`] contract:
//! validate the declared input columns, compute the flag, return a new
//! table carrying `fc<N>_flag`.
//!
//! Rules 1–11 are threshold rules and keep the input's row granularity.
//! Rules 12–14 count on/off transitions and return one row per hour.

mod cycling;
mod flow;
mod header;
mod pressure;
mod temperature;
mod threshold;

use std::fmt;

use hwplant_core::{Result, TelemetryTable};
use serde::{Deserialize, Serialize};

use crate::validation::ColumnCheck;

pub use cycling::*;
pub use flow::*;
pub use header::*;
pub use pressure::*;
pub use temperature::*;

use cycling::CyclingFault;
use threshold::ThresholdFault;

/// Name of the flag column rule `id` adds.
pub fn flag_column(id: u8) -> String {
    format!("fc{id}_flag")
}

/// Uniform contract shared by every fault rule.
pub trait FaultRule {
    /// Fixed identifier, 1–14.
    fn id(&self) -> u8;

    /// Whether helper columns are kept in the output.
    fn troubleshoot(&self) -> bool;

    /// Columns whose semantic type is checked before computing.
    fn column_checks(&self) -> Vec<ColumnCheck>;

    /// Validate inputs and compute the flag.
    ///
    /// The input is only read. The returned table holds the input's columns
    /// plus `fc<N>_flag` (threshold rules), or one row per hour with the flag
    /// (cycling rules).
    fn apply(&self, table: &TelemetryTable) -> Result<TelemetryTable>;

    fn flag_column(&self) -> String {
        flag_column(self.id())
    }

    fn info(&self) -> &'static RuleInfo {
        rule_info(self.id()).unwrap_or(&UNKNOWN_RULE)
    }
}

// ── Catalog ─────────────────────────────────────────────────────────

/// Plant operating state a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingState {
    /// OS1: plant off, pumps off.
    Os1,
    /// OS2: plant on, boilers firing.
    Os2,
    /// OS3: plant on, heat recovery or secondary only.
    Os3,
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingState::Os1 => write!(f, "OS1"),
            OperatingState::Os2 => write!(f, "OS2"),
            OperatingState::Os3 => write!(f, "OS3"),
        }
    }
}

/// Output row granularity of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One flag per input row.
    Row,
    /// One flag per hour bucket.
    Hourly,
}

/// Static description of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo {
    pub id: u8,
    pub description: &'static str,
    pub states: &'static [OperatingState],
    pub granularity: Granularity,
}

use Granularity::{Hourly, Row};
use OperatingState::{Os1, Os2, Os3};

const CATALOG: [RuleInfo; 14] = [
    RuleInfo {
        id: 1,
        description: "Diff pressure too high with pumps off",
        states: &[Os1],
        granularity: Row,
    },
    RuleInfo {
        id: 2,
        description: "Flow meter reads flow with primary pumps off",
        states: &[Os1],
        granularity: Row,
    },
    RuleInfo {
        id: 3,
        description: "Flow meter reads flow with secondary pumps off",
        states: &[Os1],
        granularity: Row,
    },
    RuleInfo {
        id: 4,
        description: "Pumps not making diff pressure setpoint",
        states: &[Os2, Os3],
        granularity: Row,
    },
    RuleInfo {
        id: 5,
        description: "Flow below minimum with bypass valve open",
        states: &[Os2, Os3],
        granularity: Row,
    },
    RuleInfo {
        id: 6,
        description: "Hot water supply not meeting setpoint",
        states: &[Os2, Os3],
        granularity: Row,
    },
    RuleInfo {
        id: 7,
        description: "Hot water system static pressure low",
        states: &[Os1, Os2, Os3],
        granularity: Row,
    },
    RuleInfo {
        id: 8,
        description: "Return temp too high for condensing boiler efficiency",
        states: &[Os2, Os3],
        granularity: Row,
    },
    RuleInfo {
        id: 9,
        description: "Return temp too low for non-condensing boiler",
        states: &[Os2, Os3],
        granularity: Row,
    },
    RuleInfo {
        id: 10,
        description: "Boiler leaving temp and supply header temp mismatch",
        states: &[Os2],
        granularity: Row,
    },
    RuleInfo {
        id: 11,
        description: "Boiler entering temp and return header temp mismatch",
        states: &[Os2],
        granularity: Row,
    },
    RuleInfo {
        id: 12,
        description: "Excessive plant cycling",
        states: &[Os1, Os2, Os3],
        granularity: Hourly,
    },
    RuleInfo {
        id: 13,
        description: "Excessive boiler on/off cycling",
        states: &[Os2, Os3],
        granularity: Hourly,
    },
    RuleInfo {
        id: 14,
        description: "Excessive boiler staging",
        states: &[Os1, Os2, Os3],
        granularity: Hourly,
    },
];

const UNKNOWN_RULE: RuleInfo = RuleInfo {
    id: 0,
    description: "Unknown rule",
    states: &[],
    granularity: Row,
};

/// Catalog entry for rule `id`.
pub fn rule_info(id: u8) -> Option<&'static RuleInfo> {
    CATALOG.iter().find(|info| info.id == id)
}

/// Every catalog entry, in id order.
pub fn catalog() -> &'static [RuleInfo] {
    &CATALOG
}

// ── Registry enum ───────────────────────────────────────────────────

/// One configured fault rule, tagged by `rule: fc<N>` in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FaultCondition {
    Fc1(DiffPressureWithPumpsOff),
    Fc2(FlowWithPumpsOff),
    Fc3(FlowWithPumpsOff),
    Fc4(DiffPressureSetpointNotMet),
    Fc5(LowFlowWithBypassOpen),
    Fc6(SupplyTempSetpointNotMet),
    Fc7(LowStaticPressure),
    Fc8(CondensingReturnTempHigh),
    Fc9(NonCondensingReturnTempLow),
    Fc10(BoilerLeavingHeaderMismatch),
    Fc11(BoilerEnteringHeaderMismatch),
    Fc12(ExcessivePlantCycling),
    Fc13(ExcessiveBoilerCycling),
    Fc14(ExcessiveBoilerStaging),
}

/// Which driver computes a condition's flag.
enum Kind<'a> {
    Threshold(&'a dyn ThresholdFault),
    Cycling(&'a dyn CyclingFault),
}

impl FaultCondition {
    fn kind(&self) -> Kind<'_> {
        match self {
            FaultCondition::Fc1(c) => Kind::Threshold(c),
            FaultCondition::Fc2(c) | FaultCondition::Fc3(c) => Kind::Threshold(c),
            FaultCondition::Fc4(c) => Kind::Threshold(c),
            FaultCondition::Fc5(c) => Kind::Threshold(c),
            FaultCondition::Fc6(c) => Kind::Threshold(c),
            FaultCondition::Fc7(c) => Kind::Threshold(c),
            FaultCondition::Fc8(c) => Kind::Threshold(c),
            FaultCondition::Fc9(c) => Kind::Threshold(c),
            FaultCondition::Fc10(c) => Kind::Threshold(c),
            FaultCondition::Fc11(c) => Kind::Threshold(c),
            FaultCondition::Fc12(c) => Kind::Cycling(c),
            FaultCondition::Fc13(c) => Kind::Cycling(c),
            FaultCondition::Fc14(c) => Kind::Cycling(c),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self.kind() {
            Kind::Threshold(_) => Row,
            Kind::Cycling(_) => Hourly,
        }
    }

    /// Columns a row-granular rule writes onto its input: the helper
    /// columns in troubleshoot mode, then the flag. Hourly rules build a
    /// fresh table and report only the flag.
    pub fn written_columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        if let Kind::Threshold(t) = self.kind() {
            if t.troubleshoot() {
                columns.extend(t.predicates().iter().map(|p| p.name.to_string()));
            }
        }
        columns.push(self.flag_column());
        columns
    }
}

impl FaultRule for FaultCondition {
    fn id(&self) -> u8 {
        match self {
            FaultCondition::Fc1(_) => 1,
            FaultCondition::Fc2(_) => 2,
            FaultCondition::Fc3(_) => 3,
            FaultCondition::Fc4(_) => 4,
            FaultCondition::Fc5(_) => 5,
            FaultCondition::Fc6(_) => 6,
            FaultCondition::Fc7(_) => 7,
            FaultCondition::Fc8(_) => 8,
            FaultCondition::Fc9(_) => 9,
            FaultCondition::Fc10(_) => 10,
            FaultCondition::Fc11(_) => 11,
            FaultCondition::Fc12(_) => 12,
            FaultCondition::Fc13(_) => 13,
            FaultCondition::Fc14(_) => 14,
        }
    }

    fn troubleshoot(&self) -> bool {
        match self.kind() {
            Kind::Threshold(t) => t.troubleshoot(),
            Kind::Cycling(c) => c.troubleshoot(),
        }
    }

    fn column_checks(&self) -> Vec<ColumnCheck> {
        match self.kind() {
            Kind::Threshold(t) => t.column_checks(),
            Kind::Cycling(c) => c.column_checks(),
        }
    }

    fn apply(&self, table: &TelemetryTable) -> Result<TelemetryTable> {
        match self.kind() {
            Kind::Threshold(t) => threshold::apply(self.id(), t, table),
            Kind::Cycling(c) => cycling::apply(self.id(), c, table),
        }
    }
}
