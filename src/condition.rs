//! Per-field visibility decisions.

use crate::document::{Conditional, Field, ShowRule};
use crate::expr;
use crate::value::Value;
use ahash::AHashMap;
use tracing::warn;

/// Decides whether a field should be rendered given the current form values.
///
/// Pure and repeatable; evaluated on every render pass of the owning step.
/// Expression failures of any kind (lex, parse, unknown reference, type
/// mismatch) hide the field: the fail-closed policy means a broken rule can
/// never leak a field that was meant to be conditional.
pub fn should_render(field: &Field, snapshot: &AHashMap<String, Value>) -> bool {
    let Some(conditional) = &field.conditional else {
        return true;
    };
    evaluate_conditional(conditional, snapshot, &field.name)
}

fn evaluate_conditional(
    conditional: &Conditional,
    snapshot: &AHashMap<String, Value>,
    field_name: &str,
) -> bool {
    if let Some(show) = &conditional.show {
        return match show {
            ShowRule::Always(flag) => *flag,
            ShowRule::Expr(source) => match expr::eval_str(source, snapshot) {
                Ok(outcome) => outcome.is_truthy(),
                Err(e) => {
                    warn!(field = field_name, error = %e, "conditional failed, hiding field");
                    false
                }
            },
        };
    }

    // Legacy form: another field's path plus a required value. Values are
    // stored under flat dotted paths, so an exact lookup covers both the
    // plain and the section-nested reference.
    if let (Some(path), Some(required)) = (&conditional.field, &conditional.value) {
        return match snapshot.get(path.as_str()) {
            Some(value) if required == "any" => !value.is_empty(),
            Some(value) => value.text_eq(required),
            None => false,
        };
    }

    // A conditional with neither shape (e.g. only dependent `fields`) does
    // not constrain visibility.
    true
}
