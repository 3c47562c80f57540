use serde::Serialize;

use crate::{filter::quote_identifier, optimizer::Reducer};

/// Field name standing for "every row" in `count()`.
pub const COUNT_ALL_FIELD: &str = "*";

/// One pushed-down aggregate. The output name it is bound to is its key in
/// the decision's aggregation map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationSpec {
    /// `reducer(field)`; `field` is `*` for `count()`.
    Function { name: Reducer, field: String },
    /// An expression the backend evaluates as-is.
    Raw { expression: String },
}

impl AggregationSpec {
    pub fn count_all() -> Self {
        AggregationSpec::Function { name: Reducer::Count, field: COUNT_ALL_FIELD.to_string() }
    }

    pub fn function(name: Reducer, field: &str) -> Self {
        AggregationSpec::Function { name, field: field.to_string() }
    }

    pub fn count_distinct(field: &str) -> Self {
        AggregationSpec::Raw { expression: format!("COUNT(DISTINCT {})", quote_identifier(field)) }
    }

    pub fn is_count_all(&self) -> bool {
        matches!(self, AggregationSpec::Function { name: Reducer::Count, field } if field == COUNT_ALL_FIELD)
    }

    /// Reducer name, absent for raw expressions.
    pub fn reducer(&self) -> Option<Reducer> {
        match self {
            AggregationSpec::Function { name, .. } => Some(*name),
            AggregationSpec::Raw { .. } => None,
        }
    }

    /// Select-list SQL for this aggregate bound to `target`.
    pub fn to_sql(&self, target: &str) -> String {
        let expression = match self {
            AggregationSpec::Function { name, field } if field == COUNT_ALL_FIELD => {
                format!("{}({})", name.sql_function(), field)
            }
            AggregationSpec::Function { name, field } => {
                format!("{}({})", name.sql_function(), quote_identifier(field))
            }
            AggregationSpec::Raw { expression } => expression.clone(),
        };
        format!("{} AS {}", expression, quote_identifier(target))
    }
}
