//! Repeating group ("unit") management for form steps that collect a
//! variable number of similar entries, e.g. responding units on an incident.

use crate::document::{FieldKind, UnitTemplate};
use crate::state::FormState;
use crate::value::Value;
use tracing::debug;

/// Supplies the current wall-clock time for datetime field defaults.
///
/// A trait so that tests can pin the clock and assert exact default values.
pub trait Clock: Send + Sync {
    /// Local time formatted like an HTML `datetime-local` value,
    /// `YYYY-MM-DDTHH:MM`.
    fn now_local(&self) -> String;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> String {
        chrono::Local::now().format("%Y-%m-%dT%H:%M").to_string()
    }
}

/// A fixed clock for deterministic defaults in tests.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now_local(&self) -> String {
        self.0.clone()
    }
}

/// One repeating-group instance. Its field values live in the form state
/// store under the `unit-<n>.` prefix; the instance itself tracks identity
/// and the editable display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitInstance {
    pub id: String,
    pub designation: String,
}

/// Maintains the ordered collection of unit instances for one form step.
///
/// Instance ids come from a monotonically increasing counter, so they are
/// unique for the step's lifetime and stable for tests. The manager is
/// created fresh on every entry into a unit-bearing form step; instances do
/// not survive back-navigation out of the step.
#[derive(Debug, Default)]
pub struct UnitManager {
    instances: Vec<UnitInstance>,
    next_ordinal: u64,
}

impl UnitManager {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            next_ordinal: 1,
        }
    }

    pub fn instances(&self) -> &[UnitInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Adds a new instance, pre-populated from the template's field defaults.
    ///
    /// Defaults are deterministic: fixed samples for text, the numeric
    /// minimum (or 1) for numbers, the clock's current time for datetime
    /// fields, fixed coordinates for latitude/longitude.
    pub fn add_instance(
        &mut self,
        template: &UnitTemplate,
        clock: &dyn Clock,
        state: &mut FormState,
    ) -> &UnitInstance {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let id = format!("unit-{}", ordinal);
        let designation = format!("Unit {}", self.instances.len() + 1);

        for field in template.all_fields() {
            let path = format!("{}.{}", id, field.name);
            let default = if template.designation_field.as_deref() == Some(field.name.as_str()) {
                Value::Text(designation.clone())
            } else {
                default_for(field.kind, &field.label, field.min, clock)
            };
            state.set_raw(&path, default);
        }

        debug!(unit = %id, designation = %designation, "added repeating group instance");
        self.instances.push(UnitInstance { id, designation });
        self.instances.last().expect("instance just pushed")
    }

    /// Removes an instance and its values. No-op while only one instance
    /// remains: a unit-bearing step always shows at least one unit.
    pub fn remove_instance(&mut self, id: &str, state: &mut FormState) -> bool {
        if self.instances.len() <= 1 {
            return false;
        }
        let Some(index) = self.instances.iter().position(|unit| unit.id == id) else {
            return false;
        };
        self.instances.remove(index);
        state.remove_under(id);
        debug!(unit = %id, "removed repeating group instance");
        true
    }

    /// Updates an instance's display label, as driven by edits to the
    /// template's designation field.
    pub fn rename_instance(&mut self, id: &str, designation: &str) {
        if let Some(unit) = self.instances.iter_mut().find(|unit| unit.id == id) {
            unit.designation = designation.to_string();
        }
    }

    pub fn instance(&self, id: &str) -> Option<&UnitInstance> {
        self.instances.iter().find(|unit| unit.id == id)
    }
}

fn default_for(kind: FieldKind, label: &str, min: Option<f64>, clock: &dyn Clock) -> Value {
    match kind {
        FieldKind::Text => Value::Text(format!("Sample {}", label)),
        FieldKind::Number => Value::Number(min.unwrap_or(1.0)),
        FieldKind::Date | FieldKind::DatetimeLocal => Value::Text(clock.now_local()),
        FieldKind::Latitude => Value::Number(40.7128),
        FieldKind::Longitude => Value::Number(-74.0060),
        _ => Value::Text(String::new()),
    }
}
