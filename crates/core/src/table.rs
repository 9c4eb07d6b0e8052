use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::column::ColumnType;
use crate::error::{FaultError, Result};

/// One typed column of telemetry. Missing float readings are NaN.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<f64>),
    Int(Vec<i64>),
}

impl Column {
    /// Build a 0/1 int column from per-row booleans.
    pub fn from_flags(flags: &[bool]) -> Self {
        Column::Int(flags.iter().map(|&f| i64::from(f)).collect())
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Float(_) => ColumnType::Float,
            Column::Int(_) => ColumnType::Int,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row` widened to f64. Out-of-range rows read as NaN.
    pub fn value_f64(&self, row: usize) -> f64 {
        match self {
            Column::Float(v) => v.get(row).copied().unwrap_or(f64::NAN),
            Column::Int(v) => v.get(row).map(|&x| x as f64).unwrap_or(f64::NAN),
        }
    }

    /// All values widened to f64.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Column::Float(v) => v.clone(),
            Column::Int(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }

    /// Largest observed value, skipping NaN. `None` for an empty or all-NaN column.
    pub fn max(&self) -> Option<f64> {
        match self {
            Column::Float(v) => v
                .iter()
                .copied()
                .filter(|x| !x.is_nan())
                .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |m| m.max(x)))),
            Column::Int(v) => v.iter().max().map(|&x| x as f64),
        }
    }

    pub fn as_int(&self) -> Option<&[i64]> {
        match self {
            Column::Int(v) => Some(v),
            Column::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            Column::Float(v) => Some(v),
            Column::Int(_) => None,
        }
    }
}

/// Time-indexed table of named numeric columns.
///
/// The index is non-decreasing and every column has exactly one value per
/// index entry. Column order is insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableWire", into = "TableWire")]
pub struct TelemetryTable {
    index: Vec<DateTime<Utc>>,
    columns: IndexMap<String, Column>,
}

impl TelemetryTable {
    /// Build a table, checking index order and column lengths.
    pub fn new(index: Vec<DateTime<Utc>>, columns: IndexMap<String, Column>) -> Result<Self> {
        if let Some(pos) = index.windows(2).position(|w| w[1] < w[0]) {
            return Err(FaultError::Table(format!(
                "index is not sorted: {} follows {}",
                index[pos + 1],
                index[pos]
            )));
        }
        let mut table = Self {
            index,
            columns: IndexMap::with_capacity(columns.len()),
        };
        for (name, column) in columns {
            table.insert_column(name, column)?;
        }
        Ok(table)
    }

    /// Table with the given index and no columns.
    pub fn with_index(index: Vec<DateTime<Utc>>) -> Result<Self> {
        Self::new(index, IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| FaultError::MissingColumn(name.to_string()))
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add or replace a column. The column must match the index length.
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if column.len() != self.index.len() {
            return Err(FaultError::Table(format!(
                "column '{}' has {} values but the index has {} rows",
                name,
                column.len(),
                self.index.len()
            )));
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Remove a column, keeping the order of the remaining ones.
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        self.columns.shift_remove(name)
    }

    /// Read an int flag column (such as `fc1_flag`) as booleans.
    pub fn flags(&self, name: &str) -> Result<Vec<bool>> {
        let column = self.column(name)?;
        match column.as_int() {
            Some(values) => Ok(values.iter().map(|&v| v != 0).collect()),
            None => Err(FaultError::Table(format!(
                "column '{}' is {} typed, flags are int",
                name,
                column.column_type()
            ))),
        }
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct TableWire {
    index: Vec<DateTime<Utc>>,
    #[serde(default)]
    columns: IndexMap<String, ColumnWire>,
}

/// JSON has no NaN, so missing float readings travel as `null`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ColumnWire {
    Float(Vec<Option<f64>>),
    Int(Vec<i64>),
}

impl TryFrom<TableWire> for TelemetryTable {
    type Error = FaultError;

    fn try_from(wire: TableWire) -> Result<Self> {
        let columns = wire
            .columns
            .into_iter()
            .map(|(name, col)| {
                let col = match col {
                    ColumnWire::Float(v) => {
                        Column::Float(v.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect())
                    }
                    ColumnWire::Int(v) => Column::Int(v),
                };
                (name, col)
            })
            .collect();
        TelemetryTable::new(wire.index, columns)
    }
}

impl From<TelemetryTable> for TableWire {
    fn from(table: TelemetryTable) -> Self {
        let columns = table
            .columns
            .into_iter()
            .map(|(name, col)| {
                let col = match col {
                    Column::Float(v) => ColumnWire::Float(
                        v.into_iter().map(|x| (!x.is_nan()).then_some(x)).collect(),
                    ),
                    Column::Int(v) => ColumnWire::Int(v),
                };
                (name, col)
            })
            .collect();
        TableWire {
            index: table.index,
            columns,
        }
    }
}
