//! The field/form state store: the substrate every other component reads and
//! writes.

use crate::document::{Field, ValidationRule};
use crate::value::Value;
use ahash::AHashMap;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Optional leading "+", a non-zero first digit, up to 15 further digits.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").unwrap());

/// The outcome of validating one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    /// Field-scoped inline message. Never blocks navigation.
    Invalid(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// Validates a value against a field's validation rule.
///
/// Evaluated on value change, not on a separate submit pass. Fields without a
/// rule always pass.
pub fn validate(field: &Field, value: &Value) -> ValidationOutcome {
    let Some(spec) = &field.validation else {
        return ValidationOutcome::Valid;
    };

    let text = value.to_string();
    let passed = match spec.rule {
        ValidationRule::Required => !value.is_empty(),
        ValidationRule::Email => EMAIL_PATTERN.is_match(&text),
        ValidationRule::Phone => {
            let stripped: String = text
                .chars()
                .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
                .collect();
            PHONE_PATTERN.is_match(&stripped)
        }
    };

    if passed {
        ValidationOutcome::Valid
    } else {
        let message = spec.message.clone().unwrap_or_else(|| match spec.rule {
            ValidationRule::Required => "This field is required".to_string(),
            ValidationRule::Email => "Please enter a valid email".to_string(),
            ValidationRule::Phone => "Please enter a valid phone number".to_string(),
        });
        ValidationOutcome::Invalid(message)
    }
}

/// Holds current values per field path, per-field validation errors, and
/// collapsed/expanded flags for sections and unit panels.
///
/// Paths are flat and dot-separated: `sectionName.field` for sectioned
/// fields, `unit-<n>.field` for repeating-group fields, `stepId.field` for
/// submitted step data.
#[derive(Debug, Default)]
pub struct FormState {
    values: AHashMap<String, Value>,
    errors: AHashMap<String, String>,
    collapsed: AHashMap<String, bool>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a value and re-validates the owning field, filling or clearing
    /// the field's error slot.
    pub fn set_value(&mut self, field: &Field, path: &str, value: Value) -> ValidationOutcome {
        let outcome = validate(field, &value);
        match &outcome {
            ValidationOutcome::Valid => {
                self.errors.remove(path);
            }
            ValidationOutcome::Invalid(message) => {
                self.errors.insert(path.to_string(), message.clone());
            }
        }
        self.values.insert(path.to_string(), value);
        outcome
    }

    /// Commits a value without validation, for engine-driven writes (unit
    /// defaults, submitted step data, sample data).
    pub fn set_raw(&mut self, path: &str, value: Value) {
        self.values.insert(path.to_string(), value);
    }

    pub fn get_value(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    /// All values whose path starts with `prefix.`, with the prefix stripped.
    /// Used for section and unit scoping.
    pub fn values_under(&self, prefix: &str) -> AHashMap<String, Value> {
        let scoped = format!("{}.", prefix);
        self.values
            .iter()
            .filter_map(|(path, value)| {
                path.strip_prefix(&scoped)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect()
    }

    /// Drops every value and error under `prefix.`, which is how a removed repeating
    /// group instance disappears from the store.
    pub fn remove_under(&mut self, prefix: &str) {
        let scoped = format!("{}.", prefix);
        self.values.retain(|path, _| !path.starts_with(&scoped));
        self.errors.retain(|path, _| !path.starts_with(&scoped));
    }

    pub fn toggle_collapsed(&mut self, key: &str) {
        let flag = self.collapsed.entry(key.to_string()).or_insert(false);
        *flag = !*flag;
    }

    pub fn is_collapsed(&self, key: &str) -> bool {
        self.collapsed.get(key).copied().unwrap_or(false)
    }

    /// The full flat snapshot handed to the conditional evaluator and the
    /// presentation layer.
    pub fn snapshot(&self) -> &AHashMap<String, Value> {
        &self.values
    }

    pub fn errors(&self) -> &AHashMap<String, String> {
        &self.errors
    }
}
