use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Value of one aggregate over an empty group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyValue {
    Integer(i64),
    /// SQL `NULL`.
    Null,
    /// The pipeline emits no value for the field at all.
    NoValue,
}

impl EmptyValue {
    /// How this value appears in a result row; `None` means the field is absent.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            EmptyValue::Integer(i) => Some(Value::Number(Number::from(*i))),
            EmptyValue::Null => Some(Value::Null),
            EmptyValue::NoValue => None,
        }
    }

    fn matches(&self, cell: Option<&Value>) -> bool {
        match (self, cell) {
            (EmptyValue::Integer(i), Some(Value::Number(n))) => n.as_i64() == Some(*i),
            (EmptyValue::Null, None | Some(Value::Null)) => true,
            (EmptyValue::NoValue, None) => true,
            _ => false,
        }
    }
}

/// Empty-group results of a pushed-down aggregate: what the pipeline defines
/// (`expected`) against what the backend returns (`actual`). Both maps share
/// the same keys, the aggregate output fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmptyGroupReconciliation {
    pub expected: IndexMap<String, EmptyValue>,
    pub actual: IndexMap<String, EmptyValue>,
}

impl EmptyGroupReconciliation {
    pub fn insert(&mut self, field: &str, expected: EmptyValue, actual: EmptyValue) {
        self.expected.insert(field.to_string(), expected);
        self.actual.insert(field.to_string(), actual);
    }

    /// Fields whose backend empty value differs from the pipeline's.
    pub fn mismatched_fields(&self) -> Vec<&str> {
        self.expected
            .iter()
            .filter(|(field, expected)| self.actual.get(field.as_str()) != Some(*expected))
            .map(|(field, _)| field.as_str())
            .collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.mismatched_fields().is_empty()
    }

    /// Rewrites a row known to come from an empty group so it carries the
    /// pipeline's values. Cells that do not hold the backend's empty value are
    /// left alone. Returns how many cells changed.
    pub fn patch_empty_row(&self, row: &mut Map<String, Value>) -> usize {
        let mut patched = 0;
        for field in self.mismatched_fields() {
            let (Some(expected), Some(actual)) = (self.expected.get(field), self.actual.get(field)) else {
                continue;
            };
            if !actual.matches(row.get(field)) {
                continue;
            }
            match expected.to_json() {
                Some(value) => {
                    row.insert(field.to_string(), value);
                }
                None => {
                    row.remove(field);
                }
            }
            patched += 1;
        }
        patched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> EmptyGroupReconciliation {
        let mut r = EmptyGroupReconciliation::default();
        r.insert("c", EmptyValue::Integer(0), EmptyValue::Integer(0));
        r.insert("s", EmptyValue::Integer(0), EmptyValue::Null);
        r.insert("a", EmptyValue::NoValue, EmptyValue::Null);
        r
    }

    #[test]
    fn reports_only_differing_fields() {
        let r = sample();
        assert_eq!(r.mismatched_fields(), vec!["s", "a"]);
        assert!(!r.is_consistent());
    }

    #[test]
    fn patches_backend_nulls() {
        let r = sample();
        let mut row = json!({ "c": 0, "s": null, "a": null, "level": "info" }).as_object().unwrap().clone();

        assert_eq!(r.patch_empty_row(&mut row), 2);
        assert_eq!(Value::Object(row), json!({ "c": 0, "s": 0, "level": "info" }));
    }

    #[test]
    fn leaves_real_values_alone() {
        let r = sample();
        let mut row = json!({ "c": 3, "s": 12, "a": 4.0 }).as_object().unwrap().clone();

        assert_eq!(r.patch_empty_row(&mut row), 0);
        assert_eq!(row.get("s"), Some(&json!(12)));
    }

    #[test]
    fn json_forms() {
        assert_eq!(EmptyValue::Integer(0).to_json(), Some(json!(0)));
        assert_eq!(EmptyValue::Null.to_json(), Some(Value::Null));
        assert_eq!(EmptyValue::NoValue.to_json(), None);
    }
}
