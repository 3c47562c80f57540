use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::pipeline::Interval;

/// Value of a named operator option as handed over by the pipeline compiler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionValue {
    Integer(i64),
    Number(NotNan<f64>),
    Boolean(bool),
    String(String),
    Fields(Vec<String>),
    Interval(Interval),
    Moment(DateTime<Utc>),
    /// Computed at runtime; the text is the source expression, for diagnostics only.
    Dynamic(String),
}

impl OptionValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&[String]> {
        match self {
            OptionValue::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_interval(&self) -> Option<&Interval> {
        match self {
            OptionValue::Interval(interval) => Some(interval),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        !matches!(self, OptionValue::Dynamic(_))
    }
}

impl Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Integer(i) => write!(f, "{}", i),
            OptionValue::Number(n) => write!(f, "{}", n.into_inner()),
            OptionValue::Boolean(b) => write!(f, "{}", b),
            OptionValue::String(s) => write!(f, "\"{}\"", s),
            OptionValue::Fields(fields) => write!(f, "{}", fields.join(", ")),
            OptionValue::Interval(interval) => write!(f, ":{}:", interval),
            OptionValue::Moment(m) => write!(f, ":{}:", m.to_rfc3339()),
            OptionValue::Dynamic(source) => write!(f, "<{}>", source),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Boolean(value)
    }
}

impl From<Interval> for OptionValue {
    fn from(value: Interval) -> Self {
        OptionValue::Interval(value)
    }
}

impl From<DateTime<Utc>> for OptionValue {
    fn from(value: DateTime<Utc>) -> Self {
        OptionValue::Moment(value)
    }
}
