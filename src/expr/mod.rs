//! The restricted conditional expression language.
//!
//! `conditional.show` strings in workflow documents are small boolean
//! expressions over the current form values, e.g.
//! `locationType === 'POINT' && isAddressable`. Upstream these were handed to
//! a general-purpose evaluator; here they are parsed into an explicit AST
//! over a closed grammar (equality, comparison, boolean connectives,
//! field-path references, literals) and walked directly, so the execution
//! surface is exactly what the grammar admits.

mod eval;
mod lexer;
mod parser;

use crate::error::ExprError;
use crate::value::Value;
use ahash::AHashMap;

pub use eval::evaluate;
pub use parser::parse;

/// The Abstract Syntax Tree of a parsed conditional expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Logical
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),

    // Comparison
    Equal(Box<Expr>, Box<Expr>),
    NotEqual(Box<Expr>, Box<Expr>),
    GreaterThan(Box<Expr>, Box<Expr>),
    GreaterThanOrEqual(Box<Expr>, Box<Expr>),
    SmallerThan(Box<Expr>, Box<Expr>),
    SmallerThanOrEqual(Box<Expr>, Box<Expr>),

    // Leaf nodes
    Literal(Value),
    /// A dotted field path resolved against the value snapshot.
    Reference(String),
}

/// Parses and evaluates an expression in one call.
///
/// Convenience entry point for callers that do not cache ASTs; the
/// conditional evaluator re-parses on every render pass, which is cheap at
/// the sizes these expressions reach.
pub fn eval_str(source: &str, snapshot: &AHashMap<String, Value>) -> Result<Value, ExprError> {
    let ast = parse(source)?;
    evaluate(&ast, snapshot)
}
