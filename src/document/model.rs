use serde::Deserialize;

/// The complete, validated definition of a workflow, ready for navigation.
///
/// Loaded once at startup and treated as read-only for the process lifetime;
/// the navigator shares it behind an `Arc`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowDocument {
    pub pages: Vec<Page>,
}

impl WorkflowDocument {
    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == page_id)
    }

    /// Finds the page that contains a step with the given id, used when a
    /// `next` reference points outside the current page.
    pub fn page_containing_step(&self, step_id: &str) -> Option<&Page> {
        self.pages
            .iter()
            .find(|page| page.steps.iter().any(|step| step.id() == step_id))
    }
}

/// One page of the workflow: an ordered sequence of steps under a unique id.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub steps: Vec<Step>,
}

impl Page {
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id() == step_id)
    }

    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id() == step_id)
    }
}

/// A single unit of interaction within a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Step {
    Start {
        id: String,
        #[serde(default)]
        label: String,
        next: String,
    },
    Form {
        id: String,
        #[serde(default)]
        label: String,
        next: String,
        #[serde(default)]
        fields: Vec<Field>,
        #[serde(default)]
        sections: Vec<Section>,
        #[serde(default, alias = "allowMultipleUnits")]
        allow_multiple_units: bool,
        #[serde(default, alias = "unitTemplate")]
        unit_template: Option<UnitTemplate>,
    },
    Decision {
        id: String,
        #[serde(default)]
        label: String,
        options: Vec<DecisionOption>,
    },
    Message {
        id: String,
        #[serde(default)]
        label: String,
        #[serde(default)]
        message: String,
        next: String,
    },
    Action {
        id: String,
        #[serde(default)]
        label: String,
        #[serde(default)]
        action: String,
        next: String,
    },
    PageReference {
        id: String,
        #[serde(default)]
        label: String,
        next: String,
    },
    End {
        id: String,
        #[serde(default)]
        label: String,
    },
}

impl Step {
    pub fn id(&self) -> &str {
        match self {
            Step::Start { id, .. }
            | Step::Form { id, .. }
            | Step::Decision { id, .. }
            | Step::Message { id, .. }
            | Step::Action { id, .. }
            | Step::PageReference { id, .. }
            | Step::End { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Step::Start { label, .. }
            | Step::Form { label, .. }
            | Step::Decision { label, .. }
            | Step::Message { label, .. }
            | Step::Action { label, .. }
            | Step::PageReference { label, .. }
            | Step::End { label, .. } => label,
        }
    }

    /// The linear advancement target. Decision and end steps have none:
    /// decisions branch through their options, end steps are terminal.
    pub fn next(&self) -> Option<&str> {
        match self {
            Step::Start { next, .. }
            | Step::Form { next, .. }
            | Step::Message { next, .. }
            | Step::Action { next, .. }
            | Step::PageReference { next, .. } => Some(next),
            Step::Decision { .. } | Step::End { .. } => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Step::Start { .. } => "start",
            Step::Form { .. } => "form",
            Step::Decision { .. } => "decision",
            Step::Message { .. } => "message",
            Step::Action { .. } => "action",
            Step::PageReference { .. } => "page-reference",
            Step::End { .. } => "end",
        }
    }
}

/// One branch of a decision step.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
    pub next: String,
}

/// A named, collapsible group of fields inside a form step.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// The field/section template replicated for every repeating-group instance.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitTemplate {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Name of the field whose edits rename the owning instance.
    #[serde(default, alias = "designationField")]
    pub designation_field: Option<String>,
}

impl UnitTemplate {
    /// Flattens the template into its field list, whether the document used
    /// the direct-fields or the sectioned form.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.fields.iter()))
    }
}

/// The full set of field kinds the original form renderer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Number,
    Date,
    DatetimeLocal,
    Checkbox,
    CheckboxArray,
    MultiSelect,
    Radio,
    Textarea,
    Latitude,
    Longitude,
    SearchableCombo,
    Map,
    Array,
    Section,
    Select,
}

/// A single field definition.
///
/// The original documents are loose JSON, so most attributes are optional;
/// which ones are meaningful depends on `kind`.
#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub step: Option<f64>,
    #[serde(default)]
    pub rows: Option<u32>,
    /// Inline options for radio/select fields without a data source.
    #[serde(default)]
    pub options: Vec<StaticOption>,
    /// Child fields for `section` kind fields.
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub validation: Option<ValidationSpec>,
    #[serde(default)]
    pub conditional: Option<Conditional>,
    #[serde(default, alias = "dataSource")]
    pub data_source: Option<DataSource>,
    /// Minimum number of entries for `array` kind fields.
    #[serde(default, alias = "minItems")]
    pub min_items: Option<usize>,
    /// Per-entry template for `array` kind fields.
    #[serde(default)]
    pub item: Option<ArrayItem>,
}

/// The template for one entry of an `array` field: either a bare labelled
/// text entry or an object with sub-fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrayItem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// An inline `{value, label}` pair defined directly in the document.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

/// A validation rule attached to a field, checked on every value change.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationSpec {
    pub rule: ValidationRule,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationRule {
    Required,
    Email,
    Phone,
}

/// A visibility rule controlling whether a field is rendered.
///
/// Three shapes exist in the wild: `{ "show": <bool> }`, `{ "show": "<expr>" }`,
/// and the legacy `{ "field": "...", "value": "..." }` form. A `fields` list
/// may ride along on `select` fields, naming dependent fields rendered beneath
/// the select.
#[derive(Debug, Clone, Deserialize)]
pub struct Conditional {
    #[serde(default)]
    pub show: Option<ShowRule>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<Field>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShowRule {
    Always(bool),
    Expr(String),
}

/// A reference to an external delimited dataset plus the formulas that derive
/// display/value pairs from its rows.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSource {
    /// Name of the resource handed to the `ResourceFetcher`.
    #[serde(alias = "file")]
    pub resource: String,
    #[serde(default)]
    pub columns: ColumnSpec,
    /// Path of the field whose current value filters this source's rows
    /// (dependent dropdowns). Replaces the upstream hardcoded label match.
    #[serde(default, alias = "filterField")]
    pub filter_field: Option<String>,
}

/// Column formulas for a data source. Unset formulas fall back to the first
/// header column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnSpec {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
}
