//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and functions from the annai
//! crate. Import this module to get access to the core functionality without
//! having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use annai::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/workflow.json")?;
//! let document = Arc::new(load_document(&json)?);
//! let mut navigator = Navigator::builder(document).build()?;
//!
//! let pass = navigator.render_pass()?;
//! println!("Current step: {}", pass.step.label());
//! # Ok(())
//! # }
//! ```

// Document loading and model
pub use crate::document::{
    Conditional, DataSource, Field, FieldKind, Page, Section, ShowRule, Step, UnitTemplate,
    WorkflowDocument, load_document,
};

// Navigation
pub use crate::navigator::{
    Navigator, Position, RenderPass, SampleDataProvider, Transition,
};

// Conditionals and values
pub use crate::condition::should_render;
pub use crate::value::Value;

// Form state
pub use crate::state::{FormState, ValidationOutcome, validate};

// Repeating groups
pub use crate::units::{Clock, FixedClock, SystemClock, UnitInstance, UnitManager};

// Reference data
pub use crate::datasource::{
    OptionResolver, OptionsCache, ResolvedOption, ResourceFetcher,
};

// Error types
pub use crate::error::{DataSourceError, DocumentError, ExprError, NavigationError};

// Standard library re-exports commonly used with this crate
pub use ahash::AHashMap;
pub use std::sync::Arc;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
