//! Rule-set parsing, validation, and the directory-backed [`RuleLoader`].

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, info, warn};

use crate::faults::FaultRule;
use crate::schema::{RuleSetDocument, API_VERSION, RULE_SET_KIND};

use super::error::{LoadResult, LoadStatus, Result, RuleError};

/// Read and validate one rule-set file.
pub fn load_file(path: &Path) -> Result<RuleSetDocument> {
    let contents = fs::read_to_string(path)?;
    let doc = parse_str(&contents)?;
    debug!(
        path = %path.display(),
        rule_set = %doc.metadata.id,
        rules = doc.rules.len(),
        "parsed rule set"
    );
    Ok(doc)
}

/// Parse and validate a rule-set document from YAML text.
///
/// First pass: check the envelope on the raw YAML tree so a wrong `kind`
/// is reported as such rather than as a field error.
/// Second pass: deserialize into [`RuleSetDocument`] and check parameters.
pub fn parse_str(contents: &str) -> Result<RuleSetDocument> {
    let raw: Value = serde_yaml::from_str(contents)?;
    check_envelope(&raw)?;

    let doc: RuleSetDocument = serde_yaml::from_value(raw)?;
    validate_document(&doc)?;
    Ok(doc)
}

fn check_envelope(raw: &Value) -> Result<()> {
    let Value::Mapping(map) = raw else {
        return Err(RuleError::Validation(
            "rule set must be a YAML mapping".to_string(),
        ));
    };

    let api_version = map.get("apiVersion").and_then(Value::as_str);
    if api_version != Some(API_VERSION) {
        return Err(RuleError::Validation(format!(
            "unsupported apiVersion {:?}, expected '{API_VERSION}'",
            api_version.unwrap_or("<missing>")
        )));
    }

    let kind = map.get("kind").and_then(Value::as_str);
    if kind != Some(RULE_SET_KIND) {
        return Err(RuleError::Validation(format!(
            "unsupported kind {:?}, expected '{RULE_SET_KIND}'",
            kind.unwrap_or("<missing>")
        )));
    }
    Ok(())
}

fn validate_document(doc: &RuleSetDocument) -> Result<()> {
    if doc.metadata.id.trim().is_empty() {
        return Err(RuleError::Validation(
            "rule set metadata.id must not be empty".to_string(),
        ));
    }
    if doc.rules.is_empty() {
        return Err(RuleError::Validation(format!(
            "rule set '{}' has no rules",
            doc.metadata.id
        )));
    }

    let mut seen = HashSet::new();
    for rule in &doc.rules {
        let id = rule.id();
        if !seen.insert(id) {
            return Err(RuleError::Validation(format!(
                "rule set '{}' configures fc{id} more than once",
                doc.metadata.id
            )));
        }
        check_parameters(id, &serde_yaml::to_value(rule)?)?;
    }
    Ok(())
}

/// Column names must be non-empty, numbers finite, thresholds and
/// deadbands non-negative.
fn check_parameters(id: u8, rule: &Value) -> Result<()> {
    let Value::Mapping(fields) = rule else {
        return Ok(());
    };

    for (key, value) in fields {
        let Some(key) = key.as_str() else { continue };
        match value {
            Value::String(s) if key.ends_with("_col") && s.trim().is_empty() => {
                return Err(RuleError::Validation(format!("fc{id}: {key} must not be empty")));
            }
            Value::Number(n) => {
                let Some(v) = n.as_f64() else { continue };
                if !v.is_finite() {
                    return Err(RuleError::Validation(format!(
                        "fc{id}: {key} must be finite, got {v}"
                    )));
                }
                if (key.ends_with("_thres") || key.ends_with("_deadband")) && v < 0.0 {
                    return Err(RuleError::Validation(format!(
                        "fc{id}: {key} must not be negative, got {v}"
                    )));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Loads every rule-set file under a directory, keyed by `metadata.id`.
pub struct RuleLoader {
    rules_dir: PathBuf,
    documents: BTreeMap<String, RuleSetDocument>,
}

impl RuleLoader {
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
            documents: BTreeMap::new(),
        }
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles and non-YAML files are skipped. Parse errors are reported
    /// per file and do not abort the scan. A second file with an already
    /// loaded `metadata.id` is reported as failed.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let root = self.rules_dir.clone();
        self.scan_dir_recursive(&root, &mut results)?;
        Ok(results)
    }

    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let mut paths = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false);
            if !is_yaml {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            let status = match self.load_one(&path) {
                Ok((rule_set_id, rules)) => {
                    info!(
                        rule_set = %rule_set_id,
                        rules,
                        path = %path.display(),
                        "loaded rule set"
                    );
                    LoadStatus::Loaded { rule_set_id, rules }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule set");
                    LoadStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            results.push(LoadResult { path, status });
        }
        Ok(())
    }

    fn load_one(&mut self, path: &Path) -> Result<(String, usize)> {
        let doc = load_file(path)?;
        let id = doc.metadata.id.clone();
        if self.documents.contains_key(&id) {
            return Err(RuleError::Validation(format!(
                "rule set id '{id}' is already loaded"
            )));
        }
        let rules = doc.rules.len();
        self.documents.insert(id.clone(), doc);
        Ok((id, rules))
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Loaded documents in id order.
    pub fn documents(&self) -> &BTreeMap<String, RuleSetDocument> {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&RuleSetDocument> {
        self.documents.get(id)
    }
}
