//! Table builders shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};
use hwplant_core::{Column, TelemetryTable};

pub(crate) fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
}

/// Table with one row per minute starting at midnight.
pub(crate) fn table(columns: Vec<(&str, Column)>) -> TelemetryTable {
    let rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
    let index = (0..rows as u32).map(|m| at(m / 60, m % 60)).collect();
    let mut t = TelemetryTable::with_index(index).unwrap();
    for (name, column) in columns {
        t.insert_column(name, column).unwrap();
    }
    t
}

/// Single-column table at the given `(hour, minute)` timestamps.
pub(crate) fn hourly_table(times: &[(u32, u32)], name: &str, column: Column) -> TelemetryTable {
    let index = times.iter().map(|&(h, m)| at(h, m)).collect();
    let mut t = TelemetryTable::with_index(index).unwrap();
    t.insert_column(name, column).unwrap();
    t
}

/// Values one truth-table input column takes when its condition holds or not.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Toggle {
    Float { on: f64, off: f64 },
    Int { on: i64, off: i64 },
}

/// Table with one row per combination of `conditions`.
///
/// Condition `i` holds on row `r` when bit `i` of `r` is set, so only the
/// last row has every condition true. `constants` are float columns with
/// the same value on every row.
pub(crate) fn truth_table(
    conditions: &[(&str, Toggle)],
    constants: &[(&str, f64)],
) -> TelemetryTable {
    let rows = 1usize << conditions.len();
    let mut columns = Vec::with_capacity(conditions.len() + constants.len());
    for (bit, &(name, toggle)) in conditions.iter().enumerate() {
        let holds = (0..rows).map(move |r| (r >> bit) & 1 == 1);
        let column = match toggle {
            Toggle::Float { on, off } => {
                Column::Float(holds.map(|h| if h { on } else { off }).collect())
            }
            Toggle::Int { on, off } => {
                Column::Int(holds.map(|h| if h { on } else { off }).collect())
            }
        };
        columns.push((name, column));
    }
    for &(name, value) in constants {
        columns.push((name, Column::Float(vec![value; rows])));
    }
    table(columns)
}

/// Expected flag for a [`truth_table`] of `conditions` inputs.
pub(crate) fn only_all_true(conditions: usize) -> Vec<bool> {
    let rows = 1usize << conditions;
    (0..rows).map(|r| r == rows - 1).collect()
}
