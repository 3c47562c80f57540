use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::FilterError;

/// Operand produced by compiling a field or literal node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompiledValue {
    Column(String),
    String(String),
    Timestamp(DateTime<Utc>),
    Null,
    Boolean(bool),
    Number(f64),
    Array(Vec<CompiledValue>),
}

/// Backend query object the filter compiler writes into.
///
/// Mirrors a fluent `where` builder: group callbacks receive a fresh nested
/// scope of the same type, and whatever they add is parenthesized as a unit.
pub trait PredicateSink: Sized {
    fn where_compare(&mut self, left: CompiledValue, operator: &str, right: CompiledValue);

    fn where_group<F>(&mut self, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>;

    fn and_where_group<F>(&mut self, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>;

    fn or_where_group<F>(&mut self, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>;

    fn where_not_group<F>(&mut self, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>;
}
