use serde::{Deserialize, Serialize};

/// Storage type of a telemetry column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Float,
    Int,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Float => write!(f, "float"),
            ColumnType::Int => write!(f, "int"),
        }
    }
}

/// Declared meaning of an input column, checked before a rule computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Analog output in units of %, stored as a float in `[0.0, 1.0]`.
    FractionalPercentage,
    /// Motor or isolation valve status, stored as an int in `{0, 1}`.
    BinaryStatus,
    /// Staged equipment (boiler stage 1..4). Int-typed, no upper bound.
    StageInteger,
}

impl SemanticType {
    /// Storage type this semantic type requires.
    pub fn storage(self) -> ColumnType {
        match self {
            SemanticType::FractionalPercentage => ColumnType::Float,
            SemanticType::BinaryStatus | SemanticType::StageInteger => ColumnType::Int,
        }
    }

    /// Inclusive upper bound on observed values, if any.
    pub fn upper_bound(self) -> Option<f64> {
        match self {
            SemanticType::FractionalPercentage => Some(1.0),
            SemanticType::BinaryStatus => Some(1.0),
            SemanticType::StageInteger => None,
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticType::FractionalPercentage => write!(f, "fractional_percentage"),
            SemanticType::BinaryStatus => write!(f, "binary_status"),
            SemanticType::StageInteger => write!(f, "stage_integer"),
        }
    }
}
