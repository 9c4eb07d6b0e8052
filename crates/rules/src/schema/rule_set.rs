//! Root rule-set document.

use serde::{Deserialize, Serialize};

use crate::faults::FaultCondition;
use crate::registry::RuleSet;

use super::CommonMetadata;

pub const API_VERSION: &str = "v1";
pub const RULE_SET_KIND: &str = "FaultRuleSet";

/// A YAML document configuring the fault rules for one plant.
///
/// ```yaml
/// apiVersion: v1
/// kind: FaultRuleSet
/// metadata:
///   id: main-plant
///   name: Main hot water plant
/// rules:
///   - rule: fc2
///     flow_meter_err_thres: 5.0
///     flow_meter_col: hw_primary_flow
///     pump_status_bool_col: hw_primary_pump_status
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDocument {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub rules: Vec<FaultCondition>,
}

impl RuleSetDocument {
    pub fn into_rule_set(self) -> RuleSet {
        RuleSet::new(self.rules)
    }
}
