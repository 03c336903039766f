//! Record predicates applied to list responses before pagination.

use crate::pagination::value_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A closed set of record predicates
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordFilter {
    #[default]
    AlwaysTrue,
    /// Keep records whose `field` has the text form of `value`
    FieldEquals { field: String, value: Value },
}

impl RecordFilter {
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        RecordFilter::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Value) -> bool {
        match self {
            RecordFilter::AlwaysTrue => true,
            RecordFilter::FieldEquals { field, value } => record
                .get(field)
                .map(|actual| value_text(actual) == value_text(value))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFilter::AlwaysTrue => write!(f, "*"),
            RecordFilter::FieldEquals { field, value } => {
                write!(f, "{field} == {}", value_text(value))
            }
        }
    }
}
