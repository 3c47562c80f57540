use serde::Serialize;

use crate::filter::{CompiledValue, FilterError, PredicateSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WhereClause {
    Compare {
        left: CompiledValue,
        operator: String,
        right: CompiledValue,
    },
    Group(SqlWhere),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhereEntry {
    pub connector: Connector,
    pub negated: bool,
    pub clause: WhereClause,
}

/// SQL text with `?` placeholders plus the values bound to them, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPredicate {
    pub sql: String,
    pub bindings: Vec<CompiledValue>,
}

/// A `WHERE` clause tree built the way fluent SQL builders do it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SqlWhere {
    entries: Vec<WhereEntry>,
}

impl SqlWhere {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[WhereEntry] {
        &self.entries
    }

    pub fn render(&self) -> RenderedPredicate {
        let mut rendered = RenderedPredicate { sql: String::new(), bindings: vec![] };
        self.write_into(&mut rendered);
        rendered
    }

    fn write_into(&self, out: &mut RenderedPredicate) {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.sql.push_str(match entry.connector {
                    Connector::And => " and ",
                    Connector::Or => " or ",
                });
            }
            if entry.negated {
                out.sql.push_str("not ");
            }
            match &entry.clause {
                WhereClause::Compare { left, operator, right } => {
                    Self::write_operand(left, out);
                    out.sql.push(' ');
                    out.sql.push_str(operator);
                    out.sql.push(' ');
                    Self::write_operand(right, out);
                }
                WhereClause::Group(group) => {
                    out.sql.push('(');
                    group.write_into(out);
                    out.sql.push(')');
                }
            }
        }
    }

    fn write_operand(value: &CompiledValue, out: &mut RenderedPredicate) {
        match value {
            CompiledValue::Column(name) => out.sql.push_str(&quote_identifier(name)),
            CompiledValue::Array(items) => {
                out.sql.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.sql.push_str(", ");
                    }
                    Self::write_operand(item, out);
                }
                out.sql.push(')');
            }
            other => {
                out.sql.push('?');
                out.bindings.push(other.clone());
            }
        }
    }

    fn push_group<F>(&mut self, connector: Connector, negated: bool, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>,
    {
        let mut group = SqlWhere::new();
        build(&mut group)?;
        // empty groups would render as "()"
        if !group.is_empty() {
            self.entries.push(WhereEntry { connector, negated, clause: WhereClause::Group(group) });
        }
        Ok(())
    }
}

/// Double-quotes an identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl PredicateSink for SqlWhere {
    fn where_compare(&mut self, left: CompiledValue, operator: &str, right: CompiledValue) {
        self.entries.push(WhereEntry {
            connector: Connector::And,
            negated: false,
            clause: WhereClause::Compare { left, operator: operator.to_string(), right },
        });
    }

    fn where_group<F>(&mut self, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>,
    {
        self.push_group(Connector::And, false, build)
    }

    fn and_where_group<F>(&mut self, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>,
    {
        self.push_group(Connector::And, false, build)
    }

    fn or_where_group<F>(&mut self, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>,
    {
        self.push_group(Connector::Or, false, build)
    }

    fn where_not_group<F>(&mut self, build: F) -> Result<(), FilterError>
    where
        F: FnOnce(&mut Self) -> Result<(), FilterError>,
    {
        self.push_group(Connector::And, true, build)
    }
}
