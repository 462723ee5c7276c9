use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};

use super::quarters::quarterly_labels;

/// Per-run validation inputs that are not part of the schema. Built fresh for
/// every validation pass so date-derived value sets are never stale.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn now() -> Self {
        Self {
            today: Utc::now().date_naive(),
        }
    }

    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }
}

/// Failure raised by a single field rule. Coercion problems are kept distinct
/// from range/membership problems so callers can tell a malformed value from
/// an out-of-policy one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldViolation {
    #[error("value is not a valid {expected}")]
    Coercion { expected: &'static str },
    #[error("value not in limits")]
    OutOfLimits,
    #[error("value not in valid values array")]
    NotInValues,
    #[error("not all checkboxes")]
    ChecksetMismatch,
    #[error("duplicated checkboxes")]
    DuplicatedCheckboxes,
    #[error("schema property missing or malformed: {0}")]
    Schema(&'static str),
}

/// One validation strategy, keyed in the registry by a schema type name.
pub trait FieldRule: Send + Sync {
    fn validate(
        &self,
        value: &Value,
        properties: &Map<String, Value>,
        ctx: &ValidationContext,
    ) -> Result<(), FieldViolation>;
}

/// Registry mapping type names to rules. New field types are added by
/// registering a strategy; names with no entry are accepted unconditionally
/// by the orchestrator.
pub struct FieldRuleRegistry {
    rules: HashMap<String, Box<dyn FieldRule>>,
}

impl FieldRuleRegistry {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// The five built-in strategies.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("number", Box::new(NumberRule));
        registry.register("text", Box::new(TextRule));
        registry.register("text_hint", Box::new(TextHintRule));
        registry.register("yearly_quarter_hint", Box::new(YearlyQuarterHintRule));
        registry.register("checkboxes", Box::new(CheckboxesRule));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, rule: Box<dyn FieldRule>) {
        self.rules.insert(name.into(), rule);
    }

    pub fn rule(&self, name: &str) -> Option<&dyn FieldRule> {
        self.rules.get(name).map(Box::as_ref)
    }
}

impl Default for FieldRuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn bound(properties: &Map<String, Value>, key: &'static str) -> Result<f64, FieldViolation> {
    properties
        .get(key)
        .and_then(Value::as_f64)
        .ok_or(FieldViolation::Schema(key))
}

fn declared_values(properties: &Map<String, Value>) -> Result<BTreeSet<&str>, FieldViolation> {
    let values = properties
        .get("values")
        .and_then(Value::as_array)
        .ok_or(FieldViolation::Schema("values"))?;
    values
        .iter()
        .map(|value| value.as_str().ok_or(FieldViolation::Schema("values")))
        .collect()
}

/// Coerces to the declared numeric kind, then checks the inclusive
/// `min..=max` window.
struct NumberRule;

impl NumberRule {
    fn resolve(value: &Value, kind: &str) -> Result<f64, FieldViolation> {
        match kind {
            "int" => match value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                    .map(|i| i as f64)
                    .ok_or(FieldViolation::Coercion { expected: "integer" }),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(|i| i as f64)
                    .map_err(|_| FieldViolation::Coercion { expected: "integer" }),
                _ => Err(FieldViolation::Coercion { expected: "integer" }),
            },
            "float" => match value {
                Value::Number(n) => n
                    .as_f64()
                    .ok_or(FieldViolation::Coercion { expected: "number" }),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| FieldViolation::Coercion { expected: "number" }),
                _ => Err(FieldViolation::Coercion { expected: "number" }),
            },
            _ => Err(FieldViolation::Schema("type")),
        }
    }
}

impl FieldRule for NumberRule {
    fn validate(
        &self,
        value: &Value,
        properties: &Map<String, Value>,
        _ctx: &ValidationContext,
    ) -> Result<(), FieldViolation> {
        let kind = properties
            .get("type")
            .and_then(Value::as_str)
            .ok_or(FieldViolation::Schema("type"))?;
        let resolved = Self::resolve(value, kind)?;
        let min = bound(properties, "min")?;
        let max = bound(properties, "max")?;

        if min <= resolved && resolved <= max {
            Ok(())
        } else {
            Err(FieldViolation::OutOfLimits)
        }
    }
}

/// Placeholder policy: free text is accepted as-is.
struct TextRule;

impl FieldRule for TextRule {
    fn validate(
        &self,
        _value: &Value,
        _properties: &Map<String, Value>,
        _ctx: &ValidationContext,
    ) -> Result<(), FieldViolation> {
        Ok(())
    }
}

/// Membership in the schema-declared value set.
struct TextHintRule;

impl FieldRule for TextHintRule {
    fn validate(
        &self,
        value: &Value,
        properties: &Map<String, Value>,
        _ctx: &ValidationContext,
    ) -> Result<(), FieldViolation> {
        let text = value
            .as_str()
            .ok_or(FieldViolation::Coercion { expected: "string" })?;
        let values = declared_values(properties)?;

        if values.contains(text) {
            Ok(())
        } else {
            Err(FieldViolation::NotInValues)
        }
    }
}

/// Membership in the date-derived quarterly catalog.
struct YearlyQuarterHintRule;

impl FieldRule for YearlyQuarterHintRule {
    fn validate(
        &self,
        value: &Value,
        _properties: &Map<String, Value>,
        ctx: &ValidationContext,
    ) -> Result<(), FieldViolation> {
        let text = value
            .as_str()
            .ok_or(FieldViolation::Coercion { expected: "string" })?;

        if quarterly_labels(ctx.today).iter().any(|label| label == text) {
            Ok(())
        } else {
            Err(FieldViolation::NotInValues)
        }
    }
}

/// The submitted checkbox titles must equal the declared set exactly: no
/// missing entries, no extras, no duplicates.
struct CheckboxesRule;

impl FieldRule for CheckboxesRule {
    fn validate(
        &self,
        value: &Value,
        properties: &Map<String, Value>,
        _ctx: &ValidationContext,
    ) -> Result<(), FieldViolation> {
        let entries = value.as_array().ok_or(FieldViolation::Coercion {
            expected: "checkbox list",
        })?;

        let mut titles = Vec::with_capacity(entries.len());
        for entry in entries {
            let title = entry
                .get("title")
                .and_then(Value::as_str)
                .ok_or(FieldViolation::Coercion {
                    expected: "checkbox list",
                })?;
            titles.push(title);
        }

        let declared = declared_values(properties)?;
        let submitted: BTreeSet<&str> = titles.iter().copied().collect();

        if submitted != declared {
            return Err(FieldViolation::ChecksetMismatch);
        }
        if submitted.len() != titles.len() {
            return Err(FieldViolation::DuplicatedCheckboxes);
        }
        Ok(())
    }
}
