//! Boiler vs. common header temperature mismatch: fc10, fc11.
//!
//! The boiler side is normalized as `(flow * temp) / flow` before it is
//! compared to the header temperature. For nonzero flow that is just
//! `temp`; rows with zero flow have no defined value and never flag.
// TODO: confirm with the plant engineers whether a flow-weighted mix
// temperature was intended here. Until then the ratio stays literal.

use serde::{Deserialize, Serialize};

use crate::evaluator::{CompareOp, Operand, Predicate};
use crate::validation::ColumnCheck;

use super::threshold::ThresholdFault;

fn header_mismatch(flow: &str, boiler_temp: &str, header_temp: &str, thres: f64) -> Predicate {
    Predicate::new(
        "boiler_vs_header_check",
        Operand::flow_weighted(flow, boiler_temp).abs_diff(Operand::column(header_temp)),
        CompareOp::Gt,
        Operand::scalar(thres),
    )
}

/// fc10: boiler leaving temperature disagrees with the supply header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BoilerLeavingHeaderMismatch {
    pub hot_water_temp_err_thres: f64,
    pub flow_meter_col: String,
    pub boiler_leaving_temp_col: String,
    pub hot_water_supply_temp_col: String,
    pub boiler_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for BoilerLeavingHeaderMismatch {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.boiler_status_bool_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            header_mismatch(
                &self.flow_meter_col,
                &self.boiler_leaving_temp_col,
                &self.hot_water_supply_temp_col,
                self.hot_water_temp_err_thres,
            ),
            Predicate::equals("boiler_check", &self.boiler_status_bool_col, 1.0),
        ]
    }

    fn troubleshoot(&self) -> bool {
        self.troubleshoot
    }
}

/// fc11: boiler entering temperature disagrees with the return header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BoilerEnteringHeaderMismatch {
    pub hot_water_temp_err_thres: f64,
    pub flow_meter_col: String,
    pub boiler_enter_temp_col: String,
    pub hot_water_return_temp_col: String,
    pub boiler_status_bool_col: String,
    #[serde(default)]
    pub troubleshoot: bool,
}

impl ThresholdFault for BoilerEnteringHeaderMismatch {
    fn column_checks(&self) -> Vec<ColumnCheck> {
        vec![ColumnCheck::binary_status(&self.boiler_status_bool_col)]
    }

    fn predicates(&self) -> Vec<Predicate> {
        vec![
            header_mismatch(
                &self.flow_meter_col,
                &self.boiler_enter_temp_col,
                &self.hot_water_return_temp_col,
                self.hot_water_temp_err_thres,
            ),
            Predicate::equals("boiler_check", &self.boiler_status_bool_col, 1.0),
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
    use hwplant_core::Column;

    fn fc10(troubleshoot: bool) -> FaultCondition {
        FaultCondition::Fc10(BoilerLeavingHeaderMismatch {
            hot_water_temp_err_thres: 3.0,
            flow_meter_col: "flow".into(),
            boiler_leaving_temp_col: "blt".into(),
            hot_water_supply_temp_col: "hws".into(),
            boiler_status_bool_col: "boiler_status".into(),
            troubleshoot,
        })
    }

    #[test]
    fn fc10_flags_mismatch_with_boiler_on() {
        let t = table(vec![
            ("flow", Column::Float(vec![100.0, 100.0, 100.0, 100.0])),
            ("blt", Column::Float(vec![160.0, 160.0, 141.0, 160.0])),
            ("hws", Column::Float(vec![150.0, 158.0, 150.0, 150.0])),
            ("boiler_status", Column::Int(vec![1, 1, 1, 0])),
        ]);
        let out = fc10(false).apply(&t).unwrap();
        assert_eq!(out.flags("fc10_flag").unwrap(), vec![true, false, true, false]);
    }

    #[test]
    fn fc10_zero_flow_row_is_not_flagged() {
        let t = table(vec![
            ("flow", Column::Float(vec![0.0, 100.0])),
            ("blt", Column::Float(vec![160.0, 160.0])),
            ("hws", Column::Float(vec![150.0, 150.0])),
            ("boiler_status", Column::Int(vec![1, 1])),
        ]);
        let out = fc10(true).apply(&t).unwrap();
        assert_eq!(out.flags("boiler_vs_header_check").unwrap(), vec![false, true]);
        assert_eq!(out.flags("fc10_flag").unwrap(), vec![false, true]);
    }

    #[test]
    fn fc11_compares_entering_to_return_header() {
        let rule = FaultCondition::Fc11(BoilerEnteringHeaderMismatch {
            hot_water_temp_err_thres: 3.0,
            flow_meter_col: "flow".into(),
            boiler_enter_temp_col: "bet".into(),
            hot_water_return_temp_col: "hwr".into(),
            boiler_status_bool_col: "boiler_status".into(),
            troubleshoot: false,
        });
        let t = table(vec![
            ("flow", Column::Float(vec![50.0, 50.0, f64::NAN])),
            ("bet", Column::Float(vec![120.0, 121.0, 100.0])),
            ("hwr", Column::Float(vec![130.0, 122.0, 130.0])),
            ("boiler_status", Column::Int(vec![1, 1, 1])),
        ]);
        let out = rule.apply(&t).unwrap();
        assert_eq!(out.flags("fc11_flag").unwrap(), vec![true, false, false]);
    }

    #[test]
    fn fc10_truth_table() {
        let t = truth_table(
            &[
                ("blt", Toggle::Float { on: 160.0, off: 151.0 }),
                ("boiler_status", Toggle::Int { on: 1, off: 0 }),
            ],
            &[("flow", 100.0), ("hws", 150.0)],
        );
        let out = fc10(false).apply(&t).unwrap();
        assert_eq!(out.flags("fc10_flag").unwrap(), only_all_true(2));
    }

    #[test]
    fn fc11_truth_table() {
        let rule = FaultCondition::Fc11(BoilerEnteringHeaderMismatch {
            hot_water_temp_err_thres: 3.0,
            flow_meter_col: "flow".into(),
            boiler_enter_temp_col: "bet".into(),
            hot_water_return_temp_col: "hwr".into(),
            boiler_status_bool_col: "boiler_status".into(),
            troubleshoot: true,
        });
        let t = truth_table(
            &[
                ("bet", Toggle::Float { on: 120.0, off: 129.0 }),
                ("boiler_status", Toggle::Int { on: 1, off: 0 }),
            ],
            &[("flow", 50.0), ("hwr", 130.0)],
        );
        let out = rule.apply(&t).unwrap();
        assert_eq!(out.flags("boiler_check").unwrap(), vec![false, false, true, true]);
        assert_eq!(out.flags("fc11_flag").unwrap(), only_all_true(2));
    }
}
