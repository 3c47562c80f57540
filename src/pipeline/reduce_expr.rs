use crate::filter::FilterExpr;

/// One `target = reducer(args)` assignment inside a `reduce` operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ReduceExpr {
    pub target: FilterExpr,
    pub value: ReduceValue,
}

/// Right-hand side of a reduce assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum ReduceValue {
    Call(ReducerCall),
    /// Anything that is not a reducer call (plain function calls, arithmetic...).
    Expr(FilterExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReducerCall {
    pub callee: String,
    pub arguments: Vec<FilterExpr>,
}

impl ReduceExpr {
    pub fn call(target: &str, callee: &str, arguments: Vec<FilterExpr>) -> Self {
        Self {
            target: FilterExpr::field(target),
            value: ReduceValue::Call(ReducerCall { callee: callee.to_string(), arguments }),
        }
    }

    /// `reducer(field)` with the default target named after the reducer.
    pub fn of_field(callee: &str, field: &str) -> Self {
        Self::call(callee, callee, vec![FilterExpr::string(field)])
    }

    pub fn target_name(&self) -> Option<&str> {
        match &self.target {
            FilterExpr::Field(name) => Some(name),
            _ => None,
        }
    }
}
