use std::fmt;

use serde::Serialize;

use crate::optimizer::EmptyValue;

/// Reducers that have a single-query SQL equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Count,
    Avg,
    Sum,
    Min,
    Max,
    CountUnique,
}

impl Reducer {
    pub const ALL: [Reducer; 6] = [
        Reducer::Count,
        Reducer::Avg,
        Reducer::Sum,
        Reducer::Min,
        Reducer::Max,
        Reducer::CountUnique,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Count => "count",
            Reducer::Avg => "avg",
            Reducer::Sum => "sum",
            Reducer::Min => "min",
            Reducer::Max => "max",
            Reducer::CountUnique => "count_unique",
        }
    }

    /// Reducer names are case-sensitive in pipelines.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    pub fn sql_function(&self) -> &'static str {
        match self {
            Reducer::Count | Reducer::CountUnique => "COUNT",
            Reducer::Avg => "AVG",
            Reducer::Sum => "SUM",
            Reducer::Min => "MIN",
            Reducer::Max => "MAX",
        }
    }

    /// What the SQL aggregate yields over a group with no rows.
    pub fn backend_empty_value(&self) -> EmptyValue {
        match self {
            Reducer::Count | Reducer::CountUnique => EmptyValue::Integer(0),
            Reducer::Avg | Reducer::Sum | Reducer::Min | Reducer::Max => EmptyValue::Null,
        }
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pipeline-language result of a reducer over zero rows, looked up by name.
///
/// Supplied by the surrounding runtime; implementations are shared read-only
/// across compiles.
pub trait ReducerDefaults: Send + Sync {
    fn default_value(&self, reducer: &str) -> EmptyValue;
}

/// Defaults of the stock reducers: counts and sums start at zero, the rest
/// have no value until they see a row.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardReducerDefaults;

impl ReducerDefaults for StandardReducerDefaults {
    fn default_value(&self, reducer: &str) -> EmptyValue {
        match reducer {
            "count" | "count_unique" | "sum" => EmptyValue::Integer(0),
            _ => EmptyValue::NoValue,
        }
    }
}
