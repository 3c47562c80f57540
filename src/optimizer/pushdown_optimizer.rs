use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    config::PushdownConfig,
    filter::FilterExpr,
    optimizer::{
        AggregatePlan, AggregationSpec, DecisionKind, OptimizationDecision, Reducer, ReducerDefaults,
        RejectionReason, StandardReducerDefaults,
    },
    pipeline::{OperatorKind, PipelineOperator, ReduceExpr, ReduceValue, LIMIT_OPTION},
};

/// Options a `reduce` may carry and still have a single-query equivalent.
pub const ALLOWED_REDUCE_OPTIONS: [&str; 4] = ["forget", "groupby", "every", "on"];

/// Read option overriding the configured page size.
pub const FETCH_SIZE_OPTION: &str = "fetchSize";

/// Outcome of offering one operator to a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Absorption {
    Absorbed(OptimizationDecision),
    /// The prior decision, unchanged, and why the operator was refused.
    Rejected { decision: OptimizationDecision, reason: RejectionReason },
}

impl Absorption {
    pub fn is_absorbed(&self) -> bool {
        matches!(self, Absorption::Absorbed(_))
    }

    pub fn decision(&self) -> &OptimizationDecision {
        match self {
            Absorption::Absorbed(decision) | Absorption::Rejected { decision, .. } => decision,
        }
    }

    pub fn reason(&self) -> Option<&RejectionReason> {
        match self {
            Absorption::Absorbed(_) => None,
            Absorption::Rejected { reason, .. } => Some(reason),
        }
    }

    pub fn into_decision(self) -> OptimizationDecision {
        match self {
            Absorption::Absorbed(decision) | Absorption::Rejected { decision, .. } => decision,
        }
    }
}

/// Where a full scan stopped absorbing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoppedAt {
    pub index: usize,
    pub reason: RejectionReason,
}

/// Result of [`PushdownOptimizer::optimize`]: the decision for the absorbed
/// prefix, and the operators from `absorbed` onward still to run unpushed.
#[derive(Debug, Clone, PartialEq)]
pub struct PushdownPlan {
    pub decision: OptimizationDecision,
    pub absorbed: usize,
    pub stopped: Option<StoppedAt>,
}

/// Decides which leading pipeline operators can run inside the backend.
#[derive(Clone)]
pub struct PushdownOptimizer {
    config: PushdownConfig,
    defaults: Arc<dyn ReducerDefaults>,
}

impl Default for PushdownOptimizer {
    fn default() -> Self {
        Self::new(PushdownConfig::default())
    }
}

impl PushdownOptimizer {
    pub fn new(config: PushdownConfig) -> Self {
        Self { config, defaults: Arc::new(StandardReducerDefaults) }
    }

    pub fn with_defaults(config: PushdownConfig, defaults: Arc<dyn ReducerDefaults>) -> Self {
        Self { config, defaults }
    }

    pub fn config(&self) -> &PushdownConfig {
        &self.config
    }

    /// Offers the operators after `read` one by one, stopping at the first one
    /// that cannot be pushed down. Absorption does not commute, so nothing past
    /// that point is tried.
    pub fn optimize(&self, read: &PipelineOperator, operators: &[PipelineOperator]) -> PushdownPlan {
        let mut decision = OptimizationDecision::new();
        for (index, operator) in operators.iter().enumerate() {
            match self.try_absorb(decision, operator, read) {
                Absorption::Absorbed(next) => decision = next,
                Absorption::Rejected { decision, reason } => {
                    return PushdownPlan { decision, absorbed: index, stopped: Some(StoppedAt { index, reason }) };
                }
            }
        }
        PushdownPlan { decision, absorbed: operators.len(), stopped: None }
    }

    /// Folds `operator` into `decision`, or hands `decision` back unchanged
    /// together with the reason it could not.
    pub fn try_absorb(
        &self,
        decision: OptimizationDecision,
        operator: &PipelineOperator,
        read: &PipelineOperator,
    ) -> Absorption {
        let attempt = match operator.kind() {
            OperatorKind::Head => self.absorb_head(&decision, operator),
            OperatorKind::Tail => self.absorb_tail(&decision, operator, read),
            OperatorKind::Reduce => self.absorb_reduce(&decision, operator, read),
            other => Err(RejectionReason::UnsupportedOperator(other.tag().to_string())),
        };

        match attempt {
            Ok(next) => Absorption::Absorbed(next),
            Err(reason) => {
                match &reason {
                    RejectionReason::DisallowedOptions(names) => {
                        warn!(operator = %operator.kind(), options = ?names, "optimization aborting -- {}", reason)
                    }
                    _ => debug!(operator = %operator.kind(), prior = %decision.kind(), "optimization aborting -- {}", reason),
                }
                Absorption::Rejected { decision, reason }
            }
        }
    }

    fn absorb_head(
        &self,
        decision: &OptimizationDecision,
        head: &PipelineOperator,
    ) -> Result<OptimizationDecision, RejectionReason> {
        decision.ensure_can_become(DecisionKind::Head)?;
        let limit = Self::constant_limit(head)?;
        decision.with_limit(DecisionKind::Head, limit)
    }

    fn absorb_tail(
        &self,
        decision: &OptimizationDecision,
        tail: &PipelineOperator,
        read: &PipelineOperator,
    ) -> Result<OptimizationDecision, RejectionReason> {
        decision.ensure_can_become(DecisionKind::Tail)?;
        let limit = decision.tightened_limit(Self::constant_limit(tail)?);

        // The last N rows can only be taken from inside one fetched page.
        let fetch_size = self.fetch_size(read)?;
        if (fetch_size as u64) < limit {
            return Err(RejectionReason::FetchSizeBelowTailLimit { limit, fetch_size });
        }

        decision.with_limit(DecisionKind::Tail, limit)
    }

    fn absorb_reduce(
        &self,
        decision: &OptimizationDecision,
        reduce: &PipelineOperator,
        read: &PipelineOperator,
    ) -> Result<OptimizationDecision, RejectionReason> {
        decision.ensure_can_become(DecisionKind::Aggregate)?;

        if !reduce.contains_only_options(&ALLOWED_REDUCE_OPTIONS) {
            return Err(RejectionReason::DisallowedOptions(reduce.options_outside(&ALLOWED_REDUCE_OPTIONS)));
        }

        if let Some(forget) = reduce.option("forget") {
            match forget.as_bool() {
                Some(false) => return Err(RejectionReason::ForgetDisabled),
                Some(true) => {}
                None => return Err(RejectionReason::MalformedOption("forget".into())),
            }
        }

        let group_by = match reduce.option("groupby") {
            None => vec![],
            Some(value) => value
                .as_fields()
                .ok_or_else(|| RejectionReason::MalformedOption("groupby".into()))?
                .to_vec(),
        };
        if group_by.iter().any(|field| field == &self.config.time_field) {
            return Err(RejectionReason::GroupByTime);
        }

        let mut plan = AggregatePlan { group_by, ..AggregatePlan::default() };
        for expr in reduce.exprs() {
            self.absorb_reduce_expr(expr, &mut plan)?;
        }

        if let Some(every) = reduce.option("every") {
            let interval = every
                .as_interval()
                .ok_or_else(|| RejectionReason::MalformedOption("every".into()))?;
            if interval.is_calendar() {
                return Err(RejectionReason::CalendarInterval);
            }
            if interval.millis <= 0 {
                return Err(RejectionReason::MalformedOption("every".into()));
            }
            if !(read.has_option("from") && read.has_option("to")) {
                return Err(RejectionReason::MissingTimeBounds);
            }
            plan.window_every = Some(*interval);
            plan.window_anchor = reduce.option("on").cloned();
        }

        let next = decision.with_aggregate(plan)?;
        debug!(decision = %next.to_json(), "optimization succeeded");
        Ok(next)
    }

    fn absorb_reduce_expr(&self, expr: &ReduceExpr, plan: &mut AggregatePlan) -> Result<(), RejectionReason> {
        let target = expr.target_name().ok_or(RejectionReason::UnsupportedTarget)?;
        if target == self.config.time_field {
            return Err(RejectionReason::ReduceOnTime);
        }

        let call = match &expr.value {
            ReduceValue::Call(call) => call,
            ReduceValue::Expr(_) => return Err(RejectionReason::NotAReducerCall),
        };
        let reducer = Reducer::from_name(&call.callee)
            .ok_or_else(|| RejectionReason::UnknownReducer(call.callee.clone()))?;

        let spec = match (reducer, call.arguments.as_slice()) {
            (Reducer::Count, []) => {
                debug!(output = %target, "found simple count() reducer");
                AggregationSpec::count_all()
            }
            (Reducer::CountUnique, [FilterExpr::String(field)]) => AggregationSpec::count_distinct(field),
            (_, [FilterExpr::String(field)]) => AggregationSpec::function(reducer, field),
            (_, [_]) => {
                return Err(RejectionReason::NonLiteralReducerArgument { reducer: reducer.name().to_string() });
            }
            (_, args) => {
                return Err(RejectionReason::ReducerArity { reducer: reducer.name().to_string(), arity: args.len() });
            }
        };

        if plan.aggregations.insert(target.to_string(), spec).is_some() {
            return Err(RejectionReason::DuplicateTarget(target.to_string()));
        }
        plan.empty_group.insert(target, self.defaults.default_value(reducer.name()), reducer.backend_empty_value());
        Ok(())
    }

    fn constant_limit(operator: &PipelineOperator) -> Result<u64, RejectionReason> {
        let value = operator.option(LIMIT_OPTION).ok_or(RejectionReason::MissingLimit)?;
        if !value.is_constant() {
            return Err(RejectionReason::NonConstantLimit);
        }
        value
            .as_integer()
            .and_then(|n| u64::try_from(n).ok())
            .ok_or(RejectionReason::InvalidLimit)
    }

    /// `fetchSize` of the read, or the configured default when unset or zero.
    fn fetch_size(&self, read: &PipelineOperator) -> Result<usize, RejectionReason> {
        let Some(value) = read.option(FETCH_SIZE_OPTION) else {
            return Ok(self.config.default_fetch_size);
        };
        match value.as_integer() {
            Some(n) if n > 0 => {
                usize::try_from(n).map_err(|_| RejectionReason::MalformedOption(FETCH_SIZE_OPTION.into()))
            }
            Some(_) => Ok(self.config.default_fetch_size),
            None => Err(RejectionReason::MalformedOption(FETCH_SIZE_OPTION.into())),
        }
    }
}
