//! fault-runner: apply a fault rule set to one telemetry table.
//!
//! Reads a `FaultRuleSet` YAML document and a JSON telemetry table, runs
//! every configured rule, and writes:
//! - `flags.json`: the input plus every row-granular `fc<N>_flag`
//! - `fc<N>_hourly.json`: one table per cycling rule
//! - `summary.json`: flagged counts per rule

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};

use hwplant_core::config::load_dotenv;
use hwplant_core::{Config, TelemetryTable};
use hwplant_rules::loader;

// ── CLI ─────────────────────────────────────────────────────────────

/// Run hot-water plant fault rules over a telemetry table.
#[derive(Parser, Debug)]
#[command(name = "fault-runner", version, about)]
struct Cli {
    /// Telemetry table as JSON (`{"index": [...], "columns": {...}}`).
    #[arg(long, env = "INPUT_FILE")]
    input: PathBuf,

    /// Rule-set YAML. Defaults to `RULES_FILE` from the active profile.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Output directory. Defaults to `OUTPUT_DIR` from the active profile.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Only run these rule ids (repeatable, e.g. `--rule 1 --rule 13`).
    #[arg(long = "rule")]
    rules_filter: Vec<u8>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote output");
    Ok(())
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    load_dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();
    config.log_summary();

    let cli = Cli::parse();
    let rules_path = cli.rules.unwrap_or_else(|| config.rules_file.clone());
    let output_dir = cli.output_dir.unwrap_or_else(|| config.output_dir.clone());

    let doc = loader::load_file(&rules_path)
        .with_context(|| format!("failed to load rule set {}", rules_path.display()))?;
    info!(rule_set = %doc.metadata.id, rules = doc.rules.len(), "loaded rule set");
    let mut rule_set = doc.into_rule_set();
    rule_set.retain_ids(&cli.rules_filter);
    if rule_set.is_empty() {
        warn!(filter = ?cli.rules_filter, "no configured rule matches the filter");
    }

    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let table: TelemetryTable = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse telemetry table {}", cli.input.display()))?;
    info!(rows = table.len(), columns = table.column_names().count(), "loaded telemetry");

    let report = rule_set.run(&table);

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    write_json(&output_dir.join("flags.json"), &report.flags)?;
    for hourly in &report.hourly {
        write_json(
            &output_dir.join(format!("fc{}_hourly.json", hourly.rule_id)),
            &hourly.table,
        )?;
    }
    write_json(&output_dir.join("summary.json"), &report.summaries)?;

    for s in &report.summaries {
        info!(
            rule = s.rule_id,
            flagged = s.flagged,
            total = s.total,
            percent = s.percent_flagged,
            "{}",
            s.description
        );
    }
    for failure in &report.failures {
        error!(rule = failure.rule_id, error = %failure.error, "rule did not run");
    }

    if !report.is_clean() {
        anyhow::bail!("{} of {} rules failed", report.failures.len(), rule_set.len());
    }
    info!("fault-runner finished");
    Ok(())
}
