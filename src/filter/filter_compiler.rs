use tracing::trace;

use crate::filter::{CompiledValue, FilterError, FilterExpr, PredicateSink};

/// How a filter binary operator maps onto the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOperator<'a> {
    And,
    Or,
    Compare(&'a str),
}

impl<'a> SqlOperator<'a> {
    /// Unknown operators (`<`, `>=`, `in`...) pass through as backend tokens.
    pub fn lookup(operator: &'a str) -> Self {
        match operator {
            "==" => SqlOperator::Compare("="),
            "!=" => SqlOperator::Compare("<>"),
            "=~" => SqlOperator::Compare("LIKE"),
            "!~" => SqlOperator::Compare("NOT LIKE"),
            "AND" => SqlOperator::And,
            "OR" => SqlOperator::Or,
            other => SqlOperator::Compare(other),
        }
    }

    pub fn is_pattern_match(&self) -> bool {
        matches!(self, SqlOperator::Compare("LIKE") | SqlOperator::Compare("NOT LIKE"))
    }
}

/// Translates glob wildcards to LIKE wildcards: `*` to `%`, `?` to `_`.
pub fn glob_to_like(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '*' => '%',
            '?' => '_',
            other => other,
        })
        .collect()
}

/// Compiles filter expressions into a [`PredicateSink`].
pub struct FilterCompiler;

impl FilterCompiler {
    pub fn compile<S: PredicateSink>(expr: &FilterExpr, sink: &mut S) -> Result<(), FilterError> {
        Self::visit_predicate(expr, sink)
    }

    fn visit_predicate<S: PredicateSink>(expr: &FilterExpr, sink: &mut S) -> Result<(), FilterError> {
        match expr {
            FilterExpr::Binary { operator, left, right } => Self::visit_binary(operator, left, right, sink),
            FilterExpr::Unary { operator, argument } => Self::visit_unary(operator, argument, sink),
            other => Err(FilterError::NotAPredicate { node: other.node_name().to_string() }),
        }
    }

    fn visit_binary<S: PredicateSink>(
        operator: &str,
        left: &FilterExpr,
        right: &FilterExpr,
        sink: &mut S,
    ) -> Result<(), FilterError> {
        match SqlOperator::lookup(operator) {
            SqlOperator::And => sink.where_group(|group| {
                Self::visit_predicate(left, group)?;
                group.and_where_group(|inner| Self::visit_predicate(right, inner))
            }),
            SqlOperator::Or => sink.where_group(|group| {
                Self::visit_predicate(left, group)?;
                group.or_where_group(|inner| Self::visit_predicate(right, inner))
            }),
            op @ SqlOperator::Compare(token) => {
                let left_value = Self::visit_value(left)?;
                let right_value = match right {
                    FilterExpr::String(pattern) if op.is_pattern_match() => {
                        let translated = glob_to_like(pattern);
                        trace!(pattern = %pattern, translated = %translated, "translated glob pattern");
                        CompiledValue::String(translated)
                    }
                    other => Self::visit_value(other)?,
                };
                sink.where_compare(left_value, token, right_value);
                Ok(())
            }
        }
    }

    fn visit_unary<S: PredicateSink>(operator: &str, argument: &FilterExpr, sink: &mut S) -> Result<(), FilterError> {
        match operator {
            "NOT" => sink.where_not_group(|group| Self::visit_predicate(argument, group)),
            other => Err(FilterError::FeatureNotSupported { operator: other.to_string() }),
        }
    }

    /// Compiles a field or literal operand.
    pub fn visit_value(expr: &FilterExpr) -> Result<CompiledValue, FilterError> {
        match expr {
            FilterExpr::Field(name) => Ok(CompiledValue::Column(name.clone())),
            FilterExpr::String(s) => Ok(CompiledValue::String(s.clone())),
            FilterExpr::Moment(m) => Ok(CompiledValue::Timestamp(*m)),
            FilterExpr::Null => Ok(CompiledValue::Null),
            FilterExpr::Boolean(b) => Ok(CompiledValue::Boolean(*b)),
            FilterExpr::Number(n) => Ok(CompiledValue::Number(n.into_inner())),
            FilterExpr::Array(items) => items
                .iter()
                .map(Self::visit_value)
                .collect::<Result<Vec<_>, _>>()
                .map(CompiledValue::Array),
            other @ (FilterExpr::Binary { .. } | FilterExpr::Unary { .. }) => {
                Err(FilterError::NotAValue { node: other.node_name().to_string() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    /// Records calls so the grouping shape can be asserted directly.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Recorder {
        fn nested<F>(&mut self, label: &str, build: F) -> Result<(), FilterError>
        where
            F: FnOnce(&mut Self) -> Result<(), FilterError>,
        {
            let mut inner = Recorder::default();
            build(&mut inner)?;
            self.calls.push(format!("{}[{}]", label, inner.calls.join(" ")));
            Ok(())
        }
    }

    impl PredicateSink for Recorder {
        fn where_compare(&mut self, left: CompiledValue, operator: &str, right: CompiledValue) {
            self.calls.push(format!("{:?} {} {:?}", left, operator, right));
        }
        fn where_group<F>(&mut self, build: F) -> Result<(), FilterError>
        where F: FnOnce(&mut Self) -> Result<(), FilterError> { self.nested("where", build) }
        fn and_where_group<F>(&mut self, build: F) -> Result<(), FilterError>
        where F: FnOnce(&mut Self) -> Result<(), FilterError> { self.nested("and", build) }
        fn or_where_group<F>(&mut self, build: F) -> Result<(), FilterError>
        where F: FnOnce(&mut Self) -> Result<(), FilterError> { self.nested("or", build) }
        fn where_not_group<F>(&mut self, build: F) -> Result<(), FilterError>
        where F: FnOnce(&mut Self) -> Result<(), FilterError> { self.nested("not", build) }
    }

    fn num(n: f64) -> FilterExpr {
        FilterExpr::number(n).unwrap()
    }

    #[test]
    fn operator_table() {
        assert_eq!(SqlOperator::lookup("=="), SqlOperator::Compare("="));
        assert_eq!(SqlOperator::lookup("!="), SqlOperator::Compare("<>"));
        assert_eq!(SqlOperator::lookup("=~"), SqlOperator::Compare("LIKE"));
        assert_eq!(SqlOperator::lookup("!~"), SqlOperator::Compare("NOT LIKE"));
        assert_eq!(SqlOperator::lookup("AND"), SqlOperator::And);
        assert_eq!(SqlOperator::lookup("OR"), SqlOperator::Or);
        assert_eq!(SqlOperator::lookup(">="), SqlOperator::Compare(">="));
    }

    #[test]
    fn glob_translation() {
        assert_eq!(glob_to_like("a*b?c"), "a%b_c");
        assert_eq!(glob_to_like("**"), "%%");
        assert_eq!(glob_to_like("plain"), "plain");
    }

    #[test]
    fn and_nests_right_side_inside_left_group() {
        let expr = FilterExpr::binary(
            "AND",
            FilterExpr::binary("==", FilterExpr::field("a"), num(1.0)),
            FilterExpr::binary("!=", FilterExpr::field("b"), num(2.0)),
        );
        let mut rec = Recorder::default();
        FilterCompiler::compile(&expr, &mut rec).unwrap();
        assert_eq!(
            rec.calls,
            vec![r#"where[Column("a") = Number(1.0) and[Column("b") <> Number(2.0)]]"#]
        );
    }

    #[test]
    fn not_wraps_argument_in_negated_group() {
        let expr = FilterExpr::unary("NOT", FilterExpr::binary("==", FilterExpr::field("a"), FilterExpr::Null));
        let mut rec = Recorder::default();
        FilterCompiler::compile(&expr, &mut rec).unwrap();
        assert_eq!(rec.calls, vec![r#"not[Column("a") = Null]"#]);
    }

    #[test]
    fn pattern_literal_is_translated_but_field_pattern_is_not() {
        let literal = FilterExpr::binary("!~", FilterExpr::field("host"), FilterExpr::string("web-??.*"));
        let mut rec = Recorder::default();
        FilterCompiler::compile(&literal, &mut rec).unwrap();
        assert_eq!(rec.calls, vec![r#"Column("host") NOT LIKE String("web-__.%")"#]);

        let dynamic = FilterExpr::binary("=~", FilterExpr::field("host"), FilterExpr::field("pattern*"));
        let mut rec = Recorder::default();
        FilterCompiler::compile(&dynamic, &mut rec).unwrap();
        assert_eq!(rec.calls, vec![r#"Column("host") LIKE Column("pattern*")"#]);
    }

    #[test]
    fn equality_does_not_touch_wildcards() {
        let expr = FilterExpr::binary("==", FilterExpr::field("name"), FilterExpr::string("a*"));
        let mut rec = Recorder::default();
        FilterCompiler::compile(&expr, &mut rec).unwrap();
        assert_eq!(rec.calls, vec![r#"Column("name") = String("a*")"#]);
    }

    #[test]
    fn source_tree_is_left_untouched() {
        let expr = FilterExpr::binary("=~", FilterExpr::field("msg"), FilterExpr::string("err*"));
        let before = expr.clone();
        FilterCompiler::compile(&expr, &mut Recorder::default()).unwrap();
        assert_eq!(expr, before);
    }

    #[test]
    fn literals_compile_structurally() {
        let moment = Utc.with_ymd_and_hms(2016, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(FilterCompiler::visit_value(&FilterExpr::Moment(moment)).unwrap(), CompiledValue::Timestamp(moment));
        assert_eq!(FilterCompiler::visit_value(&FilterExpr::Boolean(true)).unwrap(), CompiledValue::Boolean(true));
        assert_eq!(FilterCompiler::visit_value(&FilterExpr::Null).unwrap(), CompiledValue::Null);
        assert_eq!(
            FilterCompiler::visit_value(&FilterExpr::Array(vec![num(1.0), FilterExpr::string("x")])).unwrap(),
            CompiledValue::Array(vec![CompiledValue::Number(1.0), CompiledValue::String("x".into())])
        );
    }

    #[test]
    fn unsupported_unary_operator_fails_loudly() {
        let expr = FilterExpr::unary("-", FilterExpr::field("a"));
        let err = FilterCompiler::compile(&expr, &mut Recorder::default()).unwrap_err();
        assert_eq!(err, FilterError::FeatureNotSupported { operator: "-".into() });
    }

    #[test]
    fn failure_inside_a_group_propagates() {
        let expr = FilterExpr::binary(
            "OR",
            FilterExpr::binary("==", FilterExpr::field("a"), num(1.0)),
            FilterExpr::unary("~", FilterExpr::field("b")),
        );
        let err = FilterCompiler::compile(&expr, &mut Recorder::default()).unwrap_err();
        assert!(matches!(err, FilterError::FeatureNotSupported { ref operator } if operator == "~"));
    }

    #[test]
    fn bare_values_are_not_predicates() {
        let err = FilterCompiler::compile(&FilterExpr::field("a"), &mut Recorder::default()).unwrap_err();
        assert_eq!(err, FilterError::NotAPredicate { node: "Field".into() });

        let nested = FilterExpr::binary("==", FilterExpr::unary("NOT", FilterExpr::field("a")), num(1.0));
        let err = FilterCompiler::compile(&nested, &mut Recorder::default()).unwrap_err();
        assert_eq!(err, FilterError::NotAValue { node: "UnaryExpression".into() });
    }
}
