use std::fmt;

use indexmap::IndexMap;

use crate::pipeline::{OptionValue, ReduceExpr};

/// Option holding the row count of `head`/`tail`.
pub const LIMIT_OPTION: &str = "arg";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Read,
    Head,
    Tail,
    Reduce,
    Other(String),
}

impl OperatorKind {
    pub fn tag(&self) -> &str {
        match self {
            OperatorKind::Read => "read",
            OperatorKind::Head => "head",
            OperatorKind::Tail => "tail",
            OperatorKind::Reduce => "reduce",
            OperatorKind::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "read" => OperatorKind::Read,
            "head" => OperatorKind::Head,
            "tail" => OperatorKind::Tail,
            "reduce" => OperatorKind::Reduce,
            other => OperatorKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One stage of the source pipeline. Options keep their declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOperator {
    kind: OperatorKind,
    options: IndexMap<String, OptionValue>,
    exprs: Vec<ReduceExpr>,
}

impl PipelineOperator {
    pub fn new(kind: OperatorKind) -> Self {
        Self { kind, options: IndexMap::new(), exprs: vec![] }
    }

    pub fn read() -> Self {
        Self::new(OperatorKind::Read)
    }

    pub fn head(limit: i64) -> Self {
        Self::new(OperatorKind::Head).with_option(LIMIT_OPTION, limit)
    }

    pub fn tail(limit: i64) -> Self {
        Self::new(OperatorKind::Tail).with_option(LIMIT_OPTION, limit)
    }

    pub fn reduce(exprs: Vec<ReduceExpr>) -> Self {
        Self { exprs, ..Self::new(OperatorKind::Reduce) }
    }

    pub fn with_option(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }

    pub fn kind(&self) -> &OperatorKind {
        &self.kind
    }

    pub fn exprs(&self) -> &[ReduceExpr] {
        &self.exprs
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn option_names(&self) -> Vec<&str> {
        self.options.keys().map(String::as_str).collect()
    }

    pub fn contains_only_options(&self, allowed: &[&str]) -> bool {
        self.options.keys().all(|name| allowed.contains(&name.as_str()))
    }

    /// Option names outside `allowed`, in declaration order.
    pub fn options_outside(&self, allowed: &[&str]) -> Vec<String> {
        self.options
            .keys()
            .filter(|name| !allowed.contains(&name.as_str()))
            .cloned()
            .collect()
    }
}
