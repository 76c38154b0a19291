//! # Annai - Workflow Interpretation Engine
//!
//! **Annai** interprets declarative workflow documents: trees of pages, steps,
//! and fields with decision branching, per-field visibility conditionals,
//! repeating groups, and CSV-backed option lists. The presentation layer
//! (widgets, styling, transport) stays outside; the engine consumes a
//! workflow document and form-state snapshots and exposes navigation,
//! validation, and resolved-options data.
//!
//! ## Core Workflow
//!
//! 1.  **Load the document**: parse and validate the workflow JSON into a
//!     typed [`document::WorkflowDocument`] with [`document::load_document`].
//!     Structural problems surface as a single fatal
//!     [`error::DocumentError`].
//! 2.  **Navigate**: build a [`navigator::Navigator`] and drive it with user
//!     actions (`submit_step`, `back`, `set_value`, `add_unit`,
//!     `remove_unit`). Every transition leaves the position on a resolvable
//!     step or at the terminal state.
//! 3.  **Render**: call [`navigator::Navigator::render_pass`] to get the
//!     current step, post-conditional visible fields, values, and validation
//!     errors.
//! 4.  **Resolve options**: hand enumerated fields' data sources to a
//!     [`datasource::OptionResolver`] over your [`datasource::ResourceFetcher`]
//!     transport; dependent dropdowns key their results through a
//!     [`datasource::OptionsCache`] so stale resolutions are discarded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use annai::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let json = std::fs::read_to_string("incident-workflow-logic.json")?;
//!     let document = Arc::new(load_document(&json)?);
//!
//!     let mut navigator = Navigator::builder(Arc::clone(&document)).build()?;
//!
//!     // Render the current step.
//!     let pass = navigator.render_pass()?;
//!     println!("Step: {}", pass.step.label());
//!     for field in &pass.visible_fields {
//!         println!("  field: {}", field.name);
//!     }
//!
//!     // Submit it and move on.
//!     let step_id = pass.step.id().to_string();
//!     let transition = navigator.submit(&step_id, Default::default())?;
//!     println!("-> {:?}", transition);
//!
//!     Ok(())
//! }
//! ```

pub mod condition;
pub mod datasource;
pub mod document;
pub mod error;
pub mod expr;
pub mod navigator;
pub mod prelude;
pub mod state;
pub mod units;
pub mod value;
