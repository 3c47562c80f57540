//! Pushes pipeline operators and filter predicates down into a SQL backend.
//!
//! [`PushdownOptimizer`] folds a leading run of `head`, `tail` or `reduce`
//! operators into one [`OptimizationDecision`]; [`FilterCompiler`] turns a
//! filter expression into nested `WHERE` groups on a [`PredicateSink`] such as
//! [`SqlWhere`].

pub mod config;
pub use config::{ConfigError, PushdownConfig};

pub mod pipeline;
pub use pipeline::{Interval, OperatorKind, OptionValue, PipelineOperator, ReduceExpr, ReduceValue, ReducerCall};

pub mod filter;
pub use filter::{CompiledValue, FilterCompiler, FilterError, FilterExpr, PredicateSink, SqlWhere};

pub mod optimizer;
pub use optimizer::{
    Absorption, AggregationSpec, DecisionKind, EmptyGroupReconciliation, EmptyValue, OptimizationDecision,
    PushdownOptimizer, PushdownPlan, Reducer, ReducerDefaults, RejectionReason, StandardReducerDefaults,
};
