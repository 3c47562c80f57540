use std::fmt;

use chrono::{DateTime, Utc};
use ordered_float::NotNan;

/// Parsed filter expression as produced by the pipeline compiler.
///
/// The tree is only ever read; rewrites (glob translation) produce new values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum FilterExpr {
    Binary {
        operator: String,
        left: Box<FilterExpr>,
        right: Box<FilterExpr>,
    },
    Unary {
        operator: String,
        argument: Box<FilterExpr>,
    },
    Field(String),
    String(String),
    Moment(DateTime<Utc>),
    Null,
    Boolean(bool),
    Number(NotNan<f64>),
    Array(Vec<FilterExpr>),
}

impl FilterExpr {
    pub fn binary(operator: &str, left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Binary {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: &str, argument: FilterExpr) -> Self {
        FilterExpr::Unary {
            operator: operator.to_string(),
            argument: Box::new(argument),
        }
    }

    pub fn field(name: &str) -> Self {
        FilterExpr::Field(name.to_string())
    }

    pub fn string(value: &str) -> Self {
        FilterExpr::String(value.to_string())
    }

    /// `None` for NaN, which has no literal form.
    pub fn number(value: f64) -> Option<Self> {
        NotNan::new(value).ok().map(FilterExpr::Number)
    }

    pub fn node_name(&self) -> &'static str {
        match self {
            FilterExpr::Binary { .. } => "BinaryExpression",
            FilterExpr::Unary { .. } => "UnaryExpression",
            FilterExpr::Field(_) => "Field",
            FilterExpr::String(_) => "StringLiteral",
            FilterExpr::Moment(_) => "MomentLiteral",
            FilterExpr::Null => "NullLiteral",
            FilterExpr::Boolean(_) => "BooleanLiteral",
            FilterExpr::Number(_) => "NumberLiteral",
            FilterExpr::Array(_) => "ArrayLiteral",
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Binary { operator, left, right } => write!(f, "({} {} {})", left, operator, right),
            FilterExpr::Unary { operator, argument } => write!(f, "{} {}", operator, argument),
            FilterExpr::Field(name) => write!(f, "{}", name),
            FilterExpr::String(s) => write!(f, "\"{}\"", s),
            FilterExpr::Moment(m) => write!(f, ":{}:", m.to_rfc3339()),
            FilterExpr::Null => write!(f, "null"),
            FilterExpr::Boolean(b) => write!(f, "{}", b),
            FilterExpr::Number(n) => write!(f, "{}", n.into_inner()),
            FilterExpr::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Debug for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.node_name(), self)
    }
}
