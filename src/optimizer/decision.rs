use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    optimizer::{AggregationSpec, EmptyGroupReconciliation, EmptyValue, RejectionReason},
    pipeline::{Interval, OptionValue},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    #[default]
    None,
    Head,
    Tail,
    Aggregate,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionKind::None => write!(f, "none"),
            DecisionKind::Head => write!(f, "head"),
            DecisionKind::Tail => write!(f, "tail"),
            DecisionKind::Aggregate => write!(f, "aggregate"),
        }
    }
}

impl DecisionKind {
    /// `none` may become anything; `head` and `tail` may only tighten
    /// themselves; `aggregate` is final.
    pub fn can_become(&self, next: DecisionKind) -> bool {
        matches!(
            (self, next),
            (DecisionKind::None, _) | (DecisionKind::Head, DecisionKind::Head) | (DecisionKind::Tail, DecisionKind::Tail)
        )
    }
}

/// What the backend query should do in place of the absorbed operators.
///
/// Values are only produced by the optimizer; each absorption returns a new
/// decision and leaves the previous one untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptimizationDecision {
    kind: DecisionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    group_by: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    window_every: Option<Interval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    window_anchor: Option<OptionValue>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    aggregations: IndexMap<String, AggregationSpec>,
    #[serde(skip_serializing_if = "is_unset")]
    empty_group: EmptyGroupReconciliation,
}

fn is_unset(reconciliation: &EmptyGroupReconciliation) -> bool {
    reconciliation.expected.is_empty() && reconciliation.actual.is_empty()
}

/// Parts of an aggregate decision, collected before it is committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatePlan {
    pub group_by: Vec<String>,
    pub window_every: Option<Interval>,
    pub window_anchor: Option<OptionValue>,
    pub aggregations: IndexMap<String, AggregationSpec>,
    pub empty_group: EmptyGroupReconciliation,
}

impl OptimizationDecision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> DecisionKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.kind == DecisionKind::None
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn window_every(&self) -> Option<&Interval> {
        self.window_every.as_ref()
    }

    pub fn window_anchor(&self) -> Option<&OptionValue> {
        self.window_anchor.as_ref()
    }

    pub fn aggregations(&self) -> &IndexMap<String, AggregationSpec> {
        &self.aggregations
    }

    pub fn empty_group(&self) -> &EmptyGroupReconciliation {
        &self.empty_group
    }

    pub fn empty_group_expected(&self) -> &IndexMap<String, EmptyValue> {
        &self.empty_group.expected
    }

    pub fn empty_group_actual(&self) -> &IndexMap<String, EmptyValue> {
        &self.empty_group.actual
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub(crate) fn ensure_can_become(&self, attempted: DecisionKind) -> Result<(), RejectionReason> {
        if self.kind.can_become(attempted) {
            Ok(())
        } else {
            Err(RejectionReason::IncompatiblePrior { prior: self.kind, attempted })
        }
    }

    /// Head/tail decision with `limit` tightened against any prior limit.
    pub(crate) fn with_limit(&self, kind: DecisionKind, limit: u64) -> Result<Self, RejectionReason> {
        self.ensure_can_become(kind)?;
        Ok(Self {
            kind,
            limit: Some(self.tightened_limit(limit)),
            ..Self::default()
        })
    }

    pub(crate) fn tightened_limit(&self, limit: u64) -> u64 {
        self.limit.map_or(limit, |prior| prior.min(limit))
    }

    pub(crate) fn with_aggregate(&self, plan: AggregatePlan) -> Result<Self, RejectionReason> {
        self.ensure_can_become(DecisionKind::Aggregate)?;
        Ok(Self {
            kind: DecisionKind::Aggregate,
            limit: None,
            group_by: plan.group_by,
            window_every: plan.window_every,
            window_anchor: plan.window_anchor,
            aggregations: plan.aggregations,
            empty_group: plan.empty_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transitions() {
        use DecisionKind::*;
        assert!(None.can_become(Head));
        assert!(None.can_become(Aggregate));
        assert!(Head.can_become(Head));
        assert!(Tail.can_become(Tail));
        assert!(!Head.can_become(Tail));
        assert!(!Tail.can_become(Head));
        assert!(!Aggregate.can_become(Aggregate));
        assert!(!Head.can_become(Aggregate));
    }

    #[test]
    fn limits_only_tighten() {
        let first = OptimizationDecision::new().with_limit(DecisionKind::Head, 5).unwrap();
        let looser = first.with_limit(DecisionKind::Head, 9).unwrap();
        let tighter = looser.with_limit(DecisionKind::Head, 2).unwrap();
        assert_eq!(looser.limit(), Some(5));
        assert_eq!(tighter.limit(), Some(2));
        assert_eq!(first.limit(), Some(5));
    }

    #[test]
    fn kind_cannot_change_once_set() {
        let head = OptimizationDecision::new().with_limit(DecisionKind::Head, 5).unwrap();
        assert_eq!(
            head.with_limit(DecisionKind::Tail, 5),
            Err(RejectionReason::IncompatiblePrior { prior: DecisionKind::Head, attempted: DecisionKind::Tail })
        );
        assert!(head.with_aggregate(AggregatePlan::default()).is_err());
    }

    #[test]
    fn serializes_only_meaningful_fields() {
        let head = OptimizationDecision::new().with_limit(DecisionKind::Head, 5).unwrap();
        assert_eq!(head.to_json(), json!({ "kind": "head", "limit": 5 }));
        assert_eq!(OptimizationDecision::new().to_json(), json!({ "kind": "none" }));
    }
}
