//! Supply and return temperature rules: fc6, fc8, fc9.

use serde::{Deserialize, Serialize};

use crate::evaluator::{CompareOp, Operand, Predicate};
use crate::validation::ColumnCheck;

use super::threshold::ThresholdFault;

/// fc6: hot water supply temperature below its setpoint with pumps running.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SupplyTempSetpointNotMet {
    pub hot_water_temp_err_thres: f64,
    pub hot_water_supply_temp_col: String,
    pub hot_water_supply_temp_spt_col: String,
    pub pump_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for SupplyTempSetpointNotMet {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.pump_status_bool_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::new(
                "hw_spt_check",
                Operand::column(&self.hot_water_supply_temp_col)
                    .plus(self.hot_water_temp_err_thres),
                CompareOp::Lt,
                Operand::column(&self.hot_water_supply_temp_spt_col),
            ),
            Predicate::equals("pump_check", &self.pump_status_bool_col, 1.0),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

/// fc8: return water too hot for a condensing boiler to condense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CondensingReturnTempHigh {
    pub hot_water_temp_err_thres: f64,
    pub boiler_condensing_temp: f64,
    pub hot_water_return_temp_col: String,
    pub pump_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for CondensingReturnTempHigh {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.pump_status_bool_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::new(
                "boiler_condensing_check",
                Operand::column(&self.hot_water_return_temp_col)
                    .minus(self.hot_water_temp_err_thres),
                CompareOp::Gt,
                Operand::scalar(self.boiler_condensing_temp),
            ),
            Predicate::equals("pump_check", &self.pump_status_bool_col, 1.0),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

/// fc9: return water cold enough to condense in a non-condensing boiler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NonCondensingReturnTempLow {
    pub hot_water_temp_err_thres: f64,
    pub boiler_condensing_temp: f64,
    pub hot_water_return_temp_col: String,
    pub pump_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for NonCondensingReturnTempLow {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.pump_status_bool_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::new(
                "boiler_condensing_check",
                Operand::column(&self.hot_water_return_temp_col)
                    .plus(self.hot_water_temp_err_thres),
                CompareOp::Lt,
                Operand::scalar(self.boiler_condensing_temp),
            ),
            Predicate::equals("pump_check", &self.pump_status_bool_col, 1.0),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faults::{FaultCondition, FaultRule};
    use crate::test_support::{only_all_true, table, truth_table, Toggle};
    use hwplant_core::{Column, TelemetryTable};

    #[test]
    fn fc6_supply_below_setpoint() {
        let rule = FaultCondition::Fc6(SupplyTempSetpointNotMet {
            hot_water_temp_err_thres: 5.0,
            hot_water_supply_temp_col: "hws".into(),
            hot_water_supply_temp_spt_col: "hws_spt".into(),
            pump_status_bool_col: "pump_status".into(),
            troubleshoot: false,
        });
        let t = table(vec![
            ("hws", Column::Float(vec![130.0, 140.0, 130.0])),
            ("hws_spt", Column::Float(vec![140.0, 140.0, 140.0])),
            ("pump_status", Column::Int(vec![1, 1, 0])),
        ]);
        let out = rule.apply(&t).unwrap();
        assert_eq!(out.flags("fc6_flag").unwrap(), vec![true, false, false]);
    }

    #[test]
    fn fc8_and_fc9_bracket_the_condensing_temp() {
        let t = table(vec![
            ("hwr", Column::Float(vec![140.0, 130.0, 120.0])),
            ("pump_status", Column::Int(vec![1, 1, 1])),
        ]);
        let fc8 = FaultCondition::Fc8(CondensingReturnTempHigh {
            hot_water_temp_err_thres: 2.0,
            boiler_condensing_temp: 130.0,
            hot_water_return_temp_col: "hwr".into(),
            pump_status_bool_col: "pump_status".into(),
            troubleshoot: false,
        });
        let fc9 = FaultCondition::Fc9(NonCondensingReturnTempLow {
            hot_water_temp_err_thres: 2.0,
            boiler_condensing_temp: 130.0,
            hot_water_return_temp_col: "hwr".into(),
            pump_status_bool_col: "pump_status".into(),
            troubleshoot: false,
        });
        assert_eq!(
            fc8.apply(&t).unwrap().flags("fc8_flag").unwrap(),
            vec![true, false, false]
        );
        assert_eq!(
            fc9.apply(&t).unwrap().flags("fc9_flag").unwrap(),
            vec![false, false, true]
        );
    }

    fn pump_gated(return_temp: Toggle) -> TelemetryTable {
        truth_table(
            &[
                ("hwr", return_temp),
                ("pump_status", Toggle::Int { on: 1, off: 0 }),
            ],
            &[],
        )
    }

    #[test]
    fn fc6_truth_table() {
        let rule = FaultCondition::Fc6(SupplyTempSetpointNotMet {
            hot_water_temp_err_thres: 5.0,
            hot_water_supply_temp_col: "hws".into(),
            hot_water_supply_temp_spt_col: "hws_spt".into(),
            pump_status_bool_col: "pump_status".into(),
            troubleshoot: false,
        });
        let t = truth_table(
            &[
                ("hws", Toggle::Float { on: 130.0, off: 140.0 }),
                ("pump_status", Toggle::Int { on: 1, off: 0 }),
            ],
            &[("hws_spt", 140.0)],
        );
        let out = rule.apply(&t).unwrap();
        assert_eq!(out.flags("fc6_flag").unwrap(), only_all_true(2));
    }

    #[test]
    fn fc8_truth_table() {
        let rule = FaultCondition::Fc8(CondensingReturnTempHigh {
            hot_water_temp_err_thres: 2.0,
            boiler_condensing_temp: 130.0,
            hot_water_return_temp_col: "hwr".into(),
            pump_status_bool_col: "pump_status".into(),
            troubleshoot: true,
        });
        let out = rule
            .apply(&pump_gated(Toggle::Float { on: 140.0, off: 120.0 }))
            .unwrap();
        assert_eq!(out.flags("pump_check").unwrap(), vec![false, false, true, true]);
        assert_eq!(out.flags("fc8_flag").unwrap(), only_all_true(2));
    }

    #[test]
    fn fc9_truth_table() {
        let rule = FaultCondition::Fc9(NonCondensingReturnTempLow {
            hot_water_temp_err_thres: 2.0,
            boiler_condensing_temp: 130.0,
            hot_water_return_temp_col: "hwr".into(),
            pump_status_bool_col: "pump_status".into(),
            troubleshoot: false,
        });
        let out = rule
            .apply(&pump_gated(Toggle::Float { on: 120.0, off: 140.0 }))
            .unwrap();
        assert_eq!(out.flags("fc9_flag").unwrap(), only_all_true(2));
    }
}
