//! Schema-driven validation of category-specific "additional fields".
//!
//! Three independent checks cover a submission: per-field rule validation,
//! required-field completeness, and duplicate-alias detection. Callers run
//! all three; none of them aborts the others.

pub mod quarters;
pub mod rules;
pub mod schema;

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

pub use rules::{FieldRule, FieldRuleRegistry, FieldViolation, ValidationContext};
use schema::{FieldDescriptor, SubmittedField};

/// One failing field, with the rule's human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub alias: String,
    pub error: String,
}

/// Runs the rule registry across every schema field that has a submitted,
/// non-null value.
pub struct AdditionalFieldsValidator {
    registry: FieldRuleRegistry,
}

impl Default for AdditionalFieldsValidator {
    fn default() -> Self {
        Self::new(FieldRuleRegistry::builtin())
    }
}

impl AdditionalFieldsValidator {
    pub fn new(registry: FieldRuleRegistry) -> Self {
        Self { registry }
    }

    /// Validate every submitted field against its schema declaration,
    /// collecting all failures. Fields with no submitted value, and submitted
    /// aliases with no schema entry, are silently skipped here. One field's
    /// failure never aborts validation of the rest.
    pub fn validate(
        &self,
        submitted: &[SubmittedField],
        schema: &[FieldDescriptor],
    ) -> Vec<ValidationError> {
        self.validate_at(submitted, schema, &ValidationContext::now())
    }

    /// As [`validate`](Self::validate), with the date-derived catalogs pinned
    /// to the supplied context.
    pub fn validate_at(
        &self,
        submitted: &[SubmittedField],
        schema: &[FieldDescriptor],
        ctx: &ValidationContext,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for descriptor in schema {
            let Some(field) = submitted
                .iter()
                .find(|field| field.alias == descriptor.alias && field.submitted_value().is_some())
            else {
                continue;
            };
            // Unknown type names have no registered rule and pass as-is.
            let Some(rule) = self.registry.rule(&descriptor.field_type.name) else {
                continue;
            };
            let Some(value) = field.submitted_value() else {
                continue;
            };

            if let Err(violation) = rule.validate(value, &descriptor.field_type.properties, ctx) {
                errors.push(ValidationError {
                    alias: field.alias.clone(),
                    error: violation.to_string(),
                });
            }
        }

        errors
    }
}

/// Aliases marked `requiring` in the schema that carry no submitted non-null
/// value. Set semantics; the result order is the aliases' sort order.
pub fn missing_required_aliases(
    submitted: &[SubmittedField],
    schema: &[FieldDescriptor],
) -> Vec<String> {
    let present: BTreeSet<&str> = submitted
        .iter()
        .filter(|field| field.submitted_value().is_some())
        .map(|field| field.alias.as_str())
        .collect();
    let required: BTreeSet<&str> = schema
        .iter()
        .filter(|descriptor| descriptor.requiring)
        .map(|descriptor| descriptor.alias.as_str())
        .collect();

    required
        .difference(&present)
        .map(|alias| alias.to_string())
        .collect()
}

/// True iff any alias appears more than once among the submitted fields,
/// null-valued occurrences included.
pub fn has_duplicate_aliases(submitted: &[SubmittedField]) -> bool {
    let distinct: HashSet<&str> = submitted.iter().map(|field| field.alias.as_str()).collect();
    distinct.len() != submitted.len()
}
