//! Differential and static pressure rules: fc1, fc4, fc7.

use serde::{Deserialize, Serialize};

use crate::evaluator::{CompareOp, Operand, Predicate};
use crate::validation::ColumnCheck;

use super::threshold::ThresholdFault;

/// Static pressure setpoints are checked against 90% of the expansion tank pressure.
const STATIC_PRESSURE_FRACTION: f64 = 0.9;

/// fc1: loop diff pressure below setpoint while the pumps are off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiffPressureWithPumpsOff {
    pub pump_diff_press_err_thres: f64,
    pub pump_diff_press_col: String,
    pub pump_status_bool_col: String,
    pub pump_diff_press_setpoint_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for DiffPressureWithPumpsOff {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.pump_status_bool_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::new(
                "pump_diff_press_check",
                Operand::column(&self.pump_diff_press_col),
                CompareOp::Lt,
                Operand::column(&self.pump_diff_press_setpoint_col)
                    .minus(self.pump_diff_press_err_thres),
            ),
            Predicate::equals("pump_check", &self.pump_status_bool_col, 0.0),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

/// fc4: diff pressure below setpoint with the pump VFD at (near) full speed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiffPressureSetpointNotMet {
    pub vfd_speed_percent_err_thres: f64,
    pub vfd_speed_percent_max: f64,
    pub pump_diff_press_err_thres: f64,
    pub pump_diff_press_col: String,
    pub pump_vfd_speed_col: String,
    pub pump_diff_press_setpoint_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for DiffPressureSetpointNotMet {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::fractional_percentage(&self.pump_vfd_speed_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::new(
                "pump_diff_press_check",
                Operand::column(&self.pump_diff_press_col),
                CompareOp::Lt,
                Operand::column(&self.pump_diff_press_setpoint_col)
                    .minus(self.pump_diff_press_err_thres),
            ),
            Predicate::new(
                "pump_check",
                Operand::column(&self.pump_vfd_speed_col),
                CompareOp::Gte,
                Operand::scalar(self.vfd_speed_percent_max - self.vfd_speed_percent_err_thres),
            ),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

/// fc7: system gauge pressure below 90% of the expansion tank setpoint with pumps running.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LowStaticPressure {
    pub expansion_tank_press_stp: f64,
    pub hot_water_sys_gauge_pres_col: String,
    pub pump_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for LowStaticPressure {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.pump_status_bool_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::new(
                "hw_sys_static_press_check",
                Operand::column(&self.hot_water_sys_gauge_pres_col),
                CompareOp::Lt,
                Operand::scalar(self.expansion_tank_press_stp).times(STATIC_PRESSURE_FRACTION),
            ),
            Predicate::equals("pump_check", &self.pump_status_bool_col, 1.0),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}
