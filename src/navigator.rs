//! The workflow navigator: resolves the current page/step from workflow
//! position, applies step-type semantics, computes the next position on
//! submission, and manages the back-navigation history stack.

use crate::condition::should_render;
use crate::document::{DataSource, Field, Step, UnitTemplate, WorkflowDocument};
use crate::error::NavigationError;
use crate::state::{FormState, ValidationOutcome};
use crate::units::{Clock, SystemClock, UnitInstance, UnitManager};
use crate::value::Value;
use ahash::AHashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The navigator's current location in the workflow.
///
/// Invariant: `step_index` is a valid index into the current page's steps, or
/// the navigator has reached a terminal end step. `history` holds the page
/// ids visited before the current page, in visitation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub page_id: String,
    pub step_index: usize,
    pub history: Vec<String>,
}

/// What a submission or back action did to the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved within the current page (forward or back).
    Advanced,
    /// Crossed onto a different page.
    PageChanged { from: String, to: String },
    /// Reached the workflow's terminal state.
    Completed,
    /// Position unchanged (unknown decision option, back at the start).
    Stayed,
}

/// Optional collaborator that supplies pre-filled values for a form step.
///
/// The explicit replacement for the upstream ambient "generate sample data"
/// hook: injected at construction and invoked only when present.
pub trait SampleDataProvider: Send + Sync {
    /// Values keyed by full field path, committed verbatim to the store.
    fn sample_values(&self, step: &Step) -> AHashMap<String, Value>;
}

/// Everything the presentation layer needs for one render of the current
/// step: the step definition, the post-conditional visible fields, current
/// values, and validation errors.
#[derive(Debug)]
pub struct RenderPass<'a> {
    pub step: &'a Step,
    pub visible_fields: Vec<&'a Field>,
    /// Visible template fields per repeating-group instance, in instance
    /// order. Empty for steps without repeating groups.
    pub unit_fields: Vec<(String, Vec<&'a Field>)>,
    pub units: &'a [UnitInstance],
    pub values: &'a AHashMap<String, Value>,
    pub errors: &'a AHashMap<String, String>,
}

pub struct NavigatorBuilder {
    document: Arc<WorkflowDocument>,
    clock: Box<dyn Clock>,
    sampler: Option<Box<dyn SampleDataProvider>>,
}

impl NavigatorBuilder {
    pub fn new(document: Arc<WorkflowDocument>) -> Self {
        Self {
            document,
            clock: Box::new(SystemClock),
            sampler: None,
        }
    }

    /// Replaces the wall clock used for unit datetime defaults.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sample_provider(mut self, sampler: Box<dyn SampleDataProvider>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Builds a navigator positioned at the first step of the first page.
    pub fn build(self) -> Result<Navigator, NavigationError> {
        let first_page = self
            .document
            .pages
            .first()
            .ok_or_else(|| NavigationError::PageNotFound("<first>".to_string()))?
            .id
            .clone();
        let mut navigator = Navigator {
            document: self.document,
            position: Position {
                page_id: first_page,
                step_index: 0,
                history: Vec::new(),
            },
            terminal: false,
            state: FormState::new(),
            units: None,
            clock: self.clock,
            sampler: self.sampler,
        };
        navigator.sync_units()?;
        Ok(navigator)
    }
}

/// The top-level orchestrator of the workflow interpretation engine.
///
/// Owns the form state store and the repeating-group manager for the current
/// step; shares the workflow document read-only. Every transition leaves the
/// position pointing at a resolvable step or explicitly at the terminal
/// state; unresolvable `next` references surface as
/// [`NavigationError::UnresolvedNext`] instead of silently stalling.
pub struct Navigator {
    document: Arc<WorkflowDocument>,
    position: Position,
    terminal: bool,
    state: FormState,
    units: Option<UnitManager>,
    clock: Box<dyn Clock>,
    sampler: Option<Box<dyn SampleDataProvider>>,
}

impl Navigator {
    pub fn builder(document: Arc<WorkflowDocument>) -> NavigatorBuilder {
        NavigatorBuilder::new(document)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn is_complete(&self) -> bool {
        self.terminal
    }

    pub fn document(&self) -> &WorkflowDocument {
        &self.document
    }

    pub fn form_state(&self) -> &FormState {
        &self.state
    }

    pub fn units(&self) -> &[UnitInstance] {
        self.units.as_ref().map(UnitManager::instances).unwrap_or(&[])
    }

    /// The step the navigator currently points at.
    pub fn current_step(&self) -> Result<&Step, NavigationError> {
        let page = self
            .document
            .page(&self.position.page_id)
            .ok_or_else(|| NavigationError::PageNotFound(self.position.page_id.clone()))?;
        page.steps
            .get(self.position.step_index)
            .ok_or_else(|| NavigationError::StepOutOfRange {
                page_id: self.position.page_id.clone(),
                step_index: self.position.step_index,
            })
    }

    /// Submits the current step with its collected data and computes the next
    /// position. `step_delta` is normally `+1`; `-1` mirrors a within-page
    /// back-step.
    ///
    /// The submitted data is committed to the form state store (under
    /// `<step_id>.<key>` paths) before any transition, so dependent
    /// re-evaluations never observe pre-submission values.
    pub fn submit_step(
        &mut self,
        step_id: &str,
        data: AHashMap<String, Value>,
        step_delta: i32,
    ) -> Result<Transition, NavigationError> {
        if self.terminal {
            return Err(NavigationError::WorkflowComplete);
        }

        let document = Arc::clone(&self.document);
        let page = document
            .page(&self.position.page_id)
            .ok_or_else(|| NavigationError::PageNotFound(self.position.page_id.clone()))?;
        let step = page
            .steps
            .get(self.position.step_index)
            .ok_or_else(|| NavigationError::StepOutOfRange {
                page_id: self.position.page_id.clone(),
                step_index: self.position.step_index,
            })?;
        if step.id() != step_id {
            return Err(NavigationError::StepMismatch {
                submitted: step_id.to_string(),
                current: step.id().to_string(),
            });
        }

        // Commit before transitioning: the ordering guarantee for dependent
        // visibility and option re-evaluation.
        let decision_choice = data.get("decision").map(Value::to_string);
        for (key, value) in data {
            self.state.set_raw(&format!("{}.{}", step_id, key), value);
        }

        let transition = match step {
            Step::PageReference { next, .. } => self.goto_page(next)?,
            Step::End { .. } => {
                self.terminal = true;
                debug!(step = step_id, "workflow completed");
                Transition::Completed
            }
            Step::Decision { id, options, .. } => {
                let choice = decision_choice
                    .ok_or_else(|| NavigationError::MissingDecision(id.clone()))?;
                let Some(option) = options.iter().find(|option| option.value == choice) else {
                    warn!(step = step_id, choice = %choice, "unknown decision option, staying put");
                    return Ok(Transition::Stayed);
                };
                if option.next == "end" {
                    self.terminal = true;
                    debug!(step = step_id, choice = %choice, "workflow completed via decision");
                    Transition::Completed
                } else if document.page(&option.next).is_some()
                    || option.next.starts_with("page-")
                {
                    self.goto_page(&option.next)?
                } else {
                    self.advance_within_page(1)?
                }
            }
            // form, message, action, start: linear advancement through `next`.
            _ => {
                let next = step.next().unwrap_or("end");
                if next == "end" {
                    self.terminal = true;
                    debug!(step = step_id, "workflow completed");
                    Transition::Completed
                } else if page.step_index(next).is_some() {
                    self.advance_within_page(step_delta)?
                } else if let Some(target) = document.page_containing_step(next) {
                    let target_id = target.id.clone();
                    self.goto_page(&target_id)?
                } else if document.page(next).is_some() {
                    self.goto_page(next)?
                } else {
                    return Err(NavigationError::UnresolvedNext {
                        step_id: step_id.to_string(),
                        next: next.to_string(),
                    });
                }
            }
        };

        Ok(transition)
    }

    /// Convenience wrapper for the normal forward submission.
    pub fn submit(
        &mut self,
        step_id: &str,
        data: AHashMap<String, Value>,
    ) -> Result<Transition, NavigationError> {
        self.submit_step(step_id, data, 1)
    }

    /// Single-step back-navigation: steps back within the page when
    /// possible, otherwise pops the page history. With no history left this
    /// is a no-op.
    pub fn back(&mut self) -> Result<Transition, NavigationError> {
        if self.position.step_index > 0 {
            self.position.step_index -= 1;
            self.terminal = false;
            debug!(
                page = %self.position.page_id,
                index = self.position.step_index,
                "stepped back within page"
            );
            self.sync_units()?;
            return Ok(Transition::Advanced);
        }
        let Some(previous) = self.position.history.pop() else {
            return Ok(Transition::Stayed);
        };
        let from = std::mem::replace(&mut self.position.page_id, previous.clone());
        self.position.step_index = 0;
        self.terminal = false;
        debug!(from = %from, to = %previous, "navigated back to previous page");
        self.sync_units()?;
        Ok(Transition::PageChanged { from, to: previous })
    }

    /// Commits a field edit, validating on change and keeping repeating-group
    /// designations in sync when the edit targets the template's designation
    /// field.
    pub fn set_value(&mut self, field: &Field, path: &str, value: Value) -> ValidationOutcome {
        if let Some((unit_id, field_name)) = path.split_once('.')
            && unit_id.starts_with("unit-")
            && self.designation_field() == Some(field_name.to_string())
            && let Some(units) = &mut self.units
        {
            units.rename_instance(unit_id, &value.to_string());
        }
        self.state.set_value(field, path, value)
    }

    /// Adds a repeating-group instance to the current form step. Returns the
    /// new instance id, or `None` when the step has no repeating group.
    pub fn add_unit(&mut self) -> Option<String> {
        let template = self.unit_template()?.clone();
        let units = self.units.as_mut()?;
        let id = units
            .add_instance(&template, self.clock.as_ref(), &mut self.state)
            .id
            .clone();
        Some(id)
    }

    /// Removes a repeating-group instance; no-op while only one remains.
    pub fn remove_unit(&mut self, id: &str) -> bool {
        match &mut self.units {
            Some(units) => units.remove_instance(id, &mut self.state),
            None => false,
        }
    }

    /// Invokes the sample data collaborator, when one was configured, and
    /// commits its values. Returns whether a provider ran.
    pub fn generate_sample_data(&mut self) -> Result<bool, NavigationError> {
        let Some(sampler) = &self.sampler else {
            return Ok(false);
        };
        let step = self.current_step()?.clone();
        let values = sampler.sample_values(&step);
        for (path, value) in values {
            self.state.set_raw(&path, value);
        }
        Ok(true)
    }

    /// Assembles the data the presentation layer needs to render the current
    /// step. Pure read: visibility is re-evaluated against the live snapshot
    /// on every call.
    pub fn render_pass(&self) -> Result<RenderPass<'_>, NavigationError> {
        let step = self.current_step()?;
        let snapshot = self.state.snapshot();

        let mut visible_fields = Vec::new();
        let mut unit_fields = Vec::new();
        if let Step::Form {
            fields,
            sections,
            unit_template,
            ..
        } = step
        {
            collect_visible(fields, snapshot, &mut visible_fields);
            for section in sections {
                collect_visible(&section.fields, snapshot, &mut visible_fields);
            }
            if let Some(template) = unit_template {
                for unit in self.units() {
                    let mut per_unit = Vec::new();
                    collect_visible_template(template, snapshot, &mut per_unit);
                    unit_fields.push((unit.id.clone(), per_unit));
                }
            }
        }

        Ok(RenderPass {
            step,
            visible_fields,
            unit_fields,
            units: self.units(),
            values: snapshot,
            errors: self.state.errors(),
        })
    }

    /// Current value of the field that filters a dependent data source, for
    /// keying option resolutions to the filter state they were issued under.
    pub fn filter_value(&self, source: &DataSource) -> Option<&Value> {
        source
            .filter_field
            .as_deref()
            .and_then(|path| self.state.get_value(path))
    }

    fn goto_page(&mut self, page_id: &str) -> Result<Transition, NavigationError> {
        if self.document.page(page_id).is_none() {
            return Err(NavigationError::PageNotFound(page_id.to_string()));
        }
        let from = std::mem::replace(&mut self.position.page_id, page_id.to_string());
        self.position.history.push(from.clone());
        self.position.step_index = 0;
        debug!(from = %from, to = %page_id, "navigated to page");
        self.sync_units()?;
        Ok(Transition::PageChanged {
            from,
            to: page_id.to_string(),
        })
    }

    fn advance_within_page(&mut self, step_delta: i32) -> Result<Transition, NavigationError> {
        let page = self
            .document
            .page(&self.position.page_id)
            .ok_or_else(|| NavigationError::PageNotFound(self.position.page_id.clone()))?;
        let last = page.steps.len().saturating_sub(1);
        let target = self.position.step_index as i64 + step_delta as i64;
        self.position.step_index = target.clamp(0, last as i64) as usize;
        debug!(
            page = %self.position.page_id,
            index = self.position.step_index,
            "advanced within page"
        );
        self.sync_units()?;
        Ok(Transition::Advanced)
    }

    /// Recreates the repeating-group manager whenever the position changes.
    ///
    /// Entering a unit-bearing form step always starts with one fresh default
    /// instance; instances from a previous visit are not restored, and their
    /// values are cleared from the store so the snapshot never carries
    /// leftovers from an exited step.
    fn sync_units(&mut self) -> Result<(), NavigationError> {
        if let Some(previous) = self.units.take() {
            for unit in previous.instances() {
                self.state.remove_under(&unit.id);
            }
        }
        if let Some(template) = self.unit_template().cloned() {
            let mut units = UnitManager::new();
            units.add_instance(&template, self.clock.as_ref(), &mut self.state);
            self.units = Some(units);
        }
        Ok(())
    }

    fn unit_template(&self) -> Option<&UnitTemplate> {
        match self.current_step().ok()? {
            Step::Form {
                allow_multiple_units: true,
                unit_template,
                ..
            } => unit_template.as_ref(),
            _ => None,
        }
    }

    fn designation_field(&self) -> Option<String> {
        self.unit_template()?.designation_field.clone()
    }
}

fn collect_visible<'a>(
    fields: &'a [Field],
    snapshot: &AHashMap<String, Value>,
    out: &mut Vec<&'a Field>,
) {
    for field in fields {
        if !should_render(field, snapshot) {
            continue;
        }
        out.push(field);
        // Section fields and a select's dependent fields render beneath
        // their parent, subject to their own conditionals.
        collect_visible(&field.fields, snapshot, out);
        if let Some(conditional) = &field.conditional
            && let Some(dependents) = &conditional.fields
        {
            collect_visible(dependents, snapshot, out);
        }
    }
}

fn collect_visible_template<'a>(
    template: &'a UnitTemplate,
    snapshot: &AHashMap<String, Value>,
    out: &mut Vec<&'a Field>,
) {
    collect_visible(&template.fields, snapshot, out);
    for section in &template.sections {
        collect_visible(&section.fields, snapshot, out);
    }
}
