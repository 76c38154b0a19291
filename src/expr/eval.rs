use super::Expr;
use crate::error::ExprError;
use crate::value::Value;
use ahash::AHashMap;

/// Walks an expression AST against a snapshot of current form values.
///
/// References resolve by exact path lookup; an unknown path is an error so
/// that the conditional layer can fail closed instead of comparing against a
/// silent default.
pub fn evaluate(expr: &Expr, snapshot: &AHashMap<String, Value>) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Reference(path) => snapshot
            .get(path)
            .cloned()
            .ok_or_else(|| ExprError::UnknownReference(path.clone())),

        Expr::Not(operand) => {
            let value = evaluate(operand, snapshot)?;
            Ok(Value::Bool(!value.is_truthy()))
        }
        Expr::And(l, r) => {
            let left = evaluate(l, snapshot)?;
            if !left.is_truthy() {
                return Ok(Value::Bool(false));
            }
            let right = evaluate(r, snapshot)?;
            Ok(Value::Bool(right.is_truthy()))
        }
        Expr::Or(l, r) => {
            let left = evaluate(l, snapshot)?;
            if left.is_truthy() {
                return Ok(Value::Bool(true));
            }
            let right = evaluate(r, snapshot)?;
            Ok(Value::Bool(right.is_truthy()))
        }

        Expr::Equal(l, r) => {
            let left = evaluate(l, snapshot)?;
            let right = evaluate(r, snapshot)?;
            Ok(Value::Bool(left == right))
        }
        Expr::NotEqual(l, r) => {
            let left = evaluate(l, snapshot)?;
            let right = evaluate(r, snapshot)?;
            Ok(Value::Bool(left != right))
        }

        Expr::GreaterThan(l, r) => compare(l, r, snapshot, ">", |a, b| a > b),
        Expr::GreaterThanOrEqual(l, r) => compare(l, r, snapshot, ">=", |a, b| a >= b),
        Expr::SmallerThan(l, r) => compare(l, r, snapshot, "<", |a, b| a < b),
        Expr::SmallerThanOrEqual(l, r) => compare(l, r, snapshot, "<=", |a, b| a <= b),
    }
}

fn compare(
    l: &Expr,
    r: &Expr,
    snapshot: &AHashMap<String, Value>,
    op_symbol: &str,
    op: fn(f64, f64) -> bool,
) -> Result<Value, ExprError> {
    let left = numeric(evaluate(l, snapshot)?, op_symbol)?;
    let right = numeric(evaluate(r, snapshot)?, op_symbol)?;
    Ok(Value::Bool(op(left, right)))
}

/// Ordering comparisons want numbers; number-shaped text (how number inputs
/// arrive from the presentation layer) is accepted too.
fn numeric(value: Value, op_symbol: &str) -> Result<f64, ExprError> {
    match &value {
        Value::Number(n) => Ok(*n),
        Value::Text(s) => s.trim().parse::<f64>().map_err(|_| ExprError::TypeMismatch {
            operation: op_symbol.to_string(),
            expected: "Number".to_string(),
            found: value.clone(),
        }),
        _ => Err(ExprError::TypeMismatch {
            operation: op_symbol.to_string(),
            expected: "Number".to_string(),
            found: value,
        }),
    }
}
