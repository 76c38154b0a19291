use crate::value::Value;
use thiserror::Error;

/// Errors raised while loading and validating a workflow document.
///
/// Every structural problem in the JSON is fatal: the engine refuses to start
/// with a document it cannot fully type.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error("Workflow document contains no pages")]
    NoPages,

    #[error("Duplicate page id '{0}'")]
    DuplicatePageId(String),

    #[error("Duplicate step id '{step_id}' within page '{page_id}'")]
    DuplicateStepId { page_id: String, step_id: String },

    #[error("Page '{0}' contains no steps")]
    EmptyPage(String),

    #[error("Decision step '{step_id}' on page '{page_id}' has no options")]
    DecisionWithoutOptions { page_id: String, step_id: String },

    #[error(
        "Form step '{step_id}' on page '{page_id}' declares neither fields, sections, nor a unit template"
    )]
    EmptyForm { page_id: String, step_id: String },
}

/// Errors raised by the workflow navigator.
#[derive(Error, Debug, Clone)]
pub enum NavigationError {
    #[error("Page '{0}' not found in the workflow document")]
    PageNotFound(String),

    #[error("Step index {step_index} is out of range for page '{page_id}'")]
    StepOutOfRange { page_id: String, step_index: usize },

    #[error(
        "Step '{step_id}' names next reference '{next}', which resolves to no step on any page"
    )]
    UnresolvedNext { step_id: String, next: String },

    #[error("submitStep was called for '{submitted}', but the current step is '{current}'")]
    StepMismatch { submitted: String, current: String },

    #[error("Decision step '{0}' was submitted without a decision value")]
    MissingDecision(String),

    #[error("The workflow has already reached its end step")]
    WorkflowComplete,
}

/// Errors raised while fetching or interpreting a reference dataset.
///
/// These are recoverable: the engine degrades the affected field to an empty
/// option list instead of aborting.
#[derive(Error, Debug, Clone)]
pub enum DataSourceError {
    #[error("Failed to fetch resource '{resource}': {message}")]
    FetchError { resource: String, message: String },

    #[error("Failed to parse resource '{resource}': {message}")]
    ParseError { resource: String, message: String },

    #[error("Resource '{resource}' has no '{column}' column")]
    MissingColumn { resource: String, column: String },
}

/// Errors raised by the conditional expression language.
///
/// These never escape the conditional evaluator: a field whose expression
/// fails is simply not shown.
#[derive(Error, Debug, Clone)]
pub enum ExprError {
    #[error("Unexpected character '{0}' in expression")]
    UnexpectedChar(char),

    #[error("Unterminated string literal in expression")]
    UnterminatedString,

    #[error("Unexpected token '{found}' (expected {expected})")]
    UnexpectedToken { found: String, expected: String },

    #[error("Expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("Trailing input after expression: '{0}'")]
    TrailingInput(String),

    #[error("Reference '{0}' not found in the value snapshot")]
    UnknownReference(String),

    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },
}
