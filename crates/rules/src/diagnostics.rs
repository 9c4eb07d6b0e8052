//! Troubleshoot mode: keep a rule's helper columns in its output.
//!
//! Every rule builds its helper columns (predicate booleans, per-bucket
//! transition counts) in a [`Diagnostics`] set rather than on the output
//! table. When the rule finishes, the set is either written next to the
//! flag column or dropped.

use hwplant_core::{Column, Result, TelemetryTable};
use indexmap::IndexMap;
use tracing::info;

/// Named helper columns produced while computing one flag.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    columns: IndexMap<String, Column>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a helper column. A repeated name replaces the earlier column.
    pub fn push(&mut self, name: impl Into<String>, column: Column) {
        self.columns.insert(name.into(), column);
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Write the flag column to `table`, preceded by the helper columns
    /// when `troubleshoot` is set.
    pub fn finish(
        self,
        table: &mut TelemetryTable,
        flag_column: &str,
        flag: &[bool],
        troubleshoot: bool,
    ) -> Result<()> {
        if troubleshoot {
            info!(
                flag = flag_column,
                helpers = ?self.columns.keys().collect::<Vec<_>>(),
                "troubleshoot mode enabled - keeping helper columns"
            );
            for (name, column) in self.columns {
                table.insert_column(name, column)?;
            }
        }
        table.insert_column(flag_column, Column::from_flags(flag))
    }
}
