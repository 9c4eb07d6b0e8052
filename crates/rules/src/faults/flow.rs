//! Flow meter rules: fc2, fc3, fc5.

use serde::{Deserialize, Serialize};

use crate::evaluator::{CompareOp, Operand, Predicate};
use crate::validation::ColumnCheck;

use super::threshold::ThresholdFault;

/// Bypass valve command treated as fully open.
const BYPASS_FULLY_OPEN: f64 = 0.99;

/// fc2 / fc3: flow meter reads flow while its pumps are off.
///
/// fc2 watches the primary loop, fc3 the secondary; the configuration is
/// the same shape for both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FlowWithPumpsOff {
    pub flow_meter_err_thres: f64,
    pub flow_meter_col: String,
    pub pump_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for FlowWithPumpsOff {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.pump_status_bool_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::new(
                "flow_meter_check",
                Operand::column(&self.flow_meter_col),
                CompareOp::Gt,
                Operand::scalar(self.flow_meter_err_thres),
            ),
            Predicate::equals("pump_check", &self.pump_status_bool_col, 0.0),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

/// fc5: flow below the minimum flow setpoint while the bypass valve is wide
/// open and the pumps run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LowFlowWithBypassOpen {
    pub flow_meter_err_thres: f64,
    pub hot_water_min_flow_stp: f64,
    pub hot_water_bypass_vlv_err_thres: f64,
    pub flow_meter_col: String,
    pub hot_water_bypass_vlv_cmd_col: String,
    pub pump_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for LowFlowWithBypassOpen {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![
            ColumnCheck::binary_status(&self.pump_status_bool_col),
            ColumnCheck::fractional_percentage(&self.hot_water_bypass_vlv_cmd_col),
        ]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::new(
                "flowmeter_check",
                Operand::column(&self.flow_meter_col),
                CompareOp::Lt,
                Operand::scalar(self.hot_water_min_flow_stp - self.flow_meter_err_thres),
            ),
            Predicate::new(
                "bypass_vlv_check",
                Operand::column(&self.hot_water_bypass_vlv_cmd_col),
                CompareOp::Gte,
                Operand::scalar(BYPASS_FULLY_OPEN - self.hot_water_bypass_vlv_err_thres),
            ),
            Predicate::equals("pump_check", &self.pump_status_bool_col, 1.0),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}
