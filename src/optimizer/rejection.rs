use std::fmt::{self, Display};

use crate::optimizer::DecisionKind;

/// Why an operator could not be pushed down. Never an error for the caller:
/// the operator simply runs against the unoptimized rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    IncompatiblePrior { prior: DecisionKind, attempted: DecisionKind },
    UnsupportedOperator(String),
    MissingLimit,
    NonConstantLimit,
    InvalidLimit,
    FetchSizeBelowTailLimit { limit: u64, fetch_size: usize },
    DisallowedOptions(Vec<String>),
    ForgetDisabled,
    GroupByTime,
    MalformedOption(String),
    UnsupportedTarget,
    ReduceOnTime,
    NotAReducerCall,
    UnknownReducer(String),
    ReducerArity { reducer: String, arity: usize },
    NonLiteralReducerArgument { reducer: String },
    DuplicateTarget(String),
    CalendarInterval,
    MissingTimeBounds,
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::IncompatiblePrior { prior, attempted } => {
                write!(f, "cannot append {} optimization to prior {} optimization", attempted, prior)
            }
            RejectionReason::UnsupportedOperator(tag) => write!(f, "operator '{}' has no pushdown", tag),
            RejectionReason::MissingLimit => write!(f, "limit argument missing"),
            RejectionReason::NonConstantLimit => write!(f, "limit is not a constant"),
            RejectionReason::InvalidLimit => write!(f, "limit is not a non-negative integer"),
            RejectionReason::FetchSizeBelowTailLimit { limit, fetch_size } => {
                write!(f, "fetchSize {} cannot be less than tail limit {}", fetch_size, limit)
            }
            RejectionReason::DisallowedOptions(names) => {
                write!(f, "cannot optimize reduce with options {}", names.join(", "))
            }
            RejectionReason::ForgetDisabled => write!(f, "cannot optimize -forget false"),
            RejectionReason::GroupByTime => write!(f, "cannot optimize group by time"),
            RejectionReason::MalformedOption(name) => write!(f, "option '{}' has an unexpected value", name),
            RejectionReason::UnsupportedTarget => write!(f, "unexpected reduce left-hand side"),
            RejectionReason::ReduceOnTime => write!(f, "cannot optimize reduce on time"),
            RejectionReason::NotAReducerCall => write!(f, "cannot optimize non-reducer-call expression"),
            RejectionReason::UnknownReducer(name) => write!(f, "unoptimizable reducer '{}'", name),
            RejectionReason::ReducerArity { reducer, arity } => {
                write!(f, "cannot optimize {} with {} arguments", reducer, arity)
            }
            RejectionReason::NonLiteralReducerArgument { reducer } => {
                write!(f, "argument of {} is not a field name literal", reducer)
            }
            RejectionReason::DuplicateTarget(name) => write!(f, "reduce target '{}' assigned twice", name),
            RejectionReason::CalendarInterval => write!(f, "cannot optimize calendar -every"),
            RejectionReason::MissingTimeBounds => write!(f, "cannot reduce -every without -from and -to"),
        }
    }
}

impl std::error::Error for RejectionReason {}
