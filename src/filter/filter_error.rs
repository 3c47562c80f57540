use std::fmt::{self, Display};

/// Hard failures of the filter compiler. There is no fallback for these:
/// dropping part of a filter would change which rows come back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    FeatureNotSupported { operator: String },
    /// A value node (field or literal) where a boolean predicate was expected.
    NotAPredicate { node: String },
    /// A predicate node where an operand value was expected.
    NotAValue { node: String },
}

impl Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::FeatureNotSupported { operator } => {
                write!(f, "FilterError: operator '{}' is not supported in SQL filters", operator)
            }
            FilterError::NotAPredicate { node } => {
                write!(f, "FilterError: expected a filter predicate, found {}", node)
            }
            FilterError::NotAValue { node } => {
                write!(f, "FilterError: expected a field or literal operand, found {}", node)
            }
        }
    }
}

impl std::error::Error for FilterError {}
