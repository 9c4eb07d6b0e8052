//! Tests for the rule-set loader.

use std::fs;

use tempfile::TempDir;

use super::*;
use crate::faults::{FaultCondition, FaultRule};

const VALID_RULE_SET_YAML: &str = r#"
apiVersion: v1
kind: FaultRuleSet
metadata:
  id: test-plant
  name: Test Plant
rules:
  - rule: fc1
    pump_diff_press_err_thres: 2.0
    pump_diff_press_col: hw_dp
    pump_status_bool_col: hw_pump_status
    pump_diff_press_setpoint_col: hw_dp_spt
  - rule: fc13
    boiler_os_max: 4
    boiler_status_bool_col: boiler_status
    troubleshoot: true
"#;

fn with_rules(rules: &str) -> String {
    format!(
        "apiVersion: v1\nkind: FaultRuleSet\nmetadata:\n  id: p\n  name: P\nrules:\n{rules}"
    )
}

fn validation_message(yaml: &str) -> String {
    match parse_str(yaml) {
        Err(RuleError::Validation(msg)) => msg,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn parse_valid_rule_set() {
    let doc = parse_str(VALID_RULE_SET_YAML).unwrap();
    assert_eq!(doc.metadata.id, "test-plant");
    assert_eq!(doc.rules.len(), 2);
    assert!(matches!(doc.rules[0], FaultCondition::Fc1(_)));
    assert!(doc.rules[1].troubleshoot());

    let set = doc.into_rule_set();
    assert_eq!(set.rules().iter().map(|r| r.id()).collect::<Vec<_>>(), vec![1, 13]);
}

#[test]
fn load_file_reads_from_disk() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("plant.yml");
    fs::write(&path, VALID_RULE_SET_YAML).unwrap();

    let doc = load_file(&path).unwrap();
    assert_eq!(doc.metadata.name, "Test Plant");
}

#[test]
fn load_file_missing_is_io_error() {
    let dir = TempDir::new().expect("create tempdir");
    let err = load_file(&dir.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err, RuleError::Io(_)));
}

#[test]
fn wrong_kind_is_rejected() {
    let yaml = VALID_RULE_SET_YAML.replace("kind: FaultRuleSet", "kind: AnomalyRule");
    assert!(validation_message(&yaml).contains("unsupported kind"));
}

#[test]
fn wrong_api_version_is_rejected() {
    let yaml = VALID_RULE_SET_YAML.replace("apiVersion: v1", "apiVersion: v2");
    assert!(validation_message(&yaml).contains("apiVersion"));
}

#[test]
fn empty_rule_list_is_rejected() {
    let yaml = "apiVersion: v1\nkind: FaultRuleSet\nmetadata:\n  id: p\n  name: P\nrules: []\n";
    assert!(validation_message(yaml).contains("no rules"));
}

#[test]
fn duplicate_rule_is_rejected() {
    let yaml = with_rules(
        "  - rule: fc13\n    boiler_os_max: 4\n    boiler_status_bool_col: a\n  - rule: fc13\n    boiler_os_max: 2\n    boiler_status_bool_col: b\n",
    );
    assert!(validation_message(&yaml).contains("fc13 more than once"));
}

#[test]
fn fc2_and_fc3_may_share_a_shape() {
    let yaml = with_rules(
        "  - rule: fc2\n    flow_meter_err_thres: 5.0\n    flow_meter_col: f1\n    pump_status_bool_col: p1\n  - rule: fc3\n    flow_meter_err_thres: 5.0\n    flow_meter_col: f2\n    pump_status_bool_col: p2\n",
    );
    assert_eq!(parse_str(&yaml).unwrap().rules.len(), 2);
}

#[test]
fn negative_threshold_is_rejected() {
    let yaml = with_rules(
        "  - rule: fc2\n    flow_meter_err_thres: -1.0\n    flow_meter_col: f\n    pump_status_bool_col: p\n",
    );
    assert!(validation_message(&yaml).contains("flow_meter_err_thres"));
}

#[test]
fn negative_deadband_is_rejected() {
    let yaml = with_rules(
        "  - rule: fc12\n    plant_os_max: 4\n    pump_vfd_speed_col: s\n    pump_on_deadband: -0.01\n",
    );
    assert!(validation_message(&yaml).contains("pump_on_deadband"));

    let yaml = with_rules(
        "  - rule: fc12\n    plant_os_max: 4\n    pump_vfd_speed_col: s\n    pump_on_deadband: 0.0\n",
    );
    assert_eq!(parse_str(&yaml).unwrap().rules.len(), 1);
}

#[test]
fn non_finite_parameter_is_rejected() {
    let yaml = with_rules(
        "  - rule: fc7\n    expansion_tank_press_stp: .nan\n    hot_water_sys_gauge_pres_col: g\n    pump_status_bool_col: p\n",
    );
    assert!(validation_message(&yaml).contains("finite"));
}

#[test]
fn blank_column_name_is_rejected() {
    let yaml = with_rules(
        "  - rule: fc13\n    boiler_os_max: 4\n    boiler_status_bool_col: \"\"\n",
    );
    assert!(validation_message(&yaml).contains("boiler_status_bool_col"));
}

#[test]
fn unknown_rule_tag_is_a_parse_error() {
    let yaml = with_rules("  - rule: fc15\n    foo_col: x\n");
    assert!(matches!(parse_str(&yaml).unwrap_err(), RuleError::Parse(_)));
}

#[test]
fn load_all_skips_dotfiles_and_non_yaml() {
    let dir = TempDir::new().expect("create tempdir");
    fs::write(dir.path().join("plant.yml"), VALID_RULE_SET_YAML).unwrap();
    fs::write(dir.path().join(".hidden.yml"), VALID_RULE_SET_YAML).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a rule set").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(
        dir.path().join("nested").join("other.yaml"),
        VALID_RULE_SET_YAML.replace("id: test-plant", "id: other-plant"),
    )
    .unwrap();

    let mut loader = RuleLoader::new(dir.path());
    let results = loader.load_all().unwrap();

    let loaded = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Loaded { .. }))
        .count();
    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();
    assert_eq!(loaded, 2);
    assert_eq!(skipped, 2);
    assert_eq!(
        loader.documents().keys().collect::<Vec<_>>(),
        vec!["other-plant", "test-plant"]
    );
}

#[test]
fn load_all_reports_bad_file_and_keeps_going() {
    let dir = TempDir::new().expect("create tempdir");
    fs::write(dir.path().join("a-bad.yml"), "apiVersion: v1\nkind: [").unwrap();
    fs::write(dir.path().join("b-good.yml"), VALID_RULE_SET_YAML).unwrap();
    fs::write(dir.path().join("c-dup.yml"), VALID_RULE_SET_YAML).unwrap();

    let mut loader = RuleLoader::new(dir.path());
    let results = loader.load_all().unwrap();

    assert!(matches!(results[0].status, LoadStatus::Failed { .. }));
    assert!(matches!(results[1].status, LoadStatus::Loaded { rules: 2, .. }));
    match &results[2].status {
        LoadStatus::Failed { error } => assert!(error.contains("already loaded")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(loader.get("test-plant").is_some());
}
