use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One field declared by a category schema. Externally supplied and read-only
/// to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub alias: String,
    #[serde(rename = "type")]
    pub field_type: FieldTypeSpec,
    pub requiring: bool,
}

/// Runtime type descriptor: a name resolved against the rule registry plus a
/// free-form property map each rule interprets for itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTypeSpec {
    pub name: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl FieldTypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Map::new(),
        }
    }

    pub fn with_properties(name: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }
}

/// One additional field as submitted on a post. The value is untyped at this
/// boundary; coercion happens inside the matching rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedField {
    pub alias: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl SubmittedField {
    pub fn new(alias: impl Into<String>, value: Value) -> Self {
        Self {
            alias: alias.into(),
            value: Some(value),
        }
    }

    pub fn absent(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            value: None,
        }
    }

    /// The submitted value, if present and non-null. Absent and null values
    /// are indistinguishable to validation: both are skipped by the per-field
    /// rules and flagged only by the required-field check.
    pub fn submitted_value(&self) -> Option<&Value> {
        match &self.value {
            Some(value) if !value.is_null() => Some(value),
            _ => None,
        }
    }
}
