use super::model::{Step, WorkflowDocument};
use crate::error::DocumentError;
use serde::Deserialize;
use std::collections::HashSet;

/// The top-level envelope of the workflow JSON resource.
#[derive(Deserialize)]
struct DocumentEnvelope {
    workflow: WorkflowDocument,
}

/// Parses and validates a workflow document from its JSON source.
///
/// All structural checks run here, once, so that navigation can assume a
/// well-formed document instead of null-checking on every transition.
pub fn load_document(json: &str) -> Result<WorkflowDocument, DocumentError> {
    let envelope: DocumentEnvelope =
        serde_json::from_str(json).map_err(|e| DocumentError::JsonParseError(e.to_string()))?;
    let document = envelope.workflow;
    validate(&document)?;
    Ok(document)
}

fn validate(document: &WorkflowDocument) -> Result<(), DocumentError> {
    if document.pages.is_empty() {
        return Err(DocumentError::NoPages);
    }

    let mut page_ids = HashSet::new();
    for page in &document.pages {
        if !page_ids.insert(page.id.as_str()) {
            return Err(DocumentError::DuplicatePageId(page.id.clone()));
        }
        if page.steps.is_empty() {
            return Err(DocumentError::EmptyPage(page.id.clone()));
        }

        let mut step_ids = HashSet::new();
        for step in &page.steps {
            if !step_ids.insert(step.id()) {
                return Err(DocumentError::DuplicateStepId {
                    page_id: page.id.clone(),
                    step_id: step.id().to_string(),
                });
            }
            match step {
                Step::Decision { id, options, .. } if options.is_empty() => {
                    return Err(DocumentError::DecisionWithoutOptions {
                        page_id: page.id.clone(),
                        step_id: id.clone(),
                    });
                }
                Step::Form {
                    id,
                    fields,
                    sections,
                    unit_template,
                    ..
                } if fields.is_empty() && sections.is_empty() && unit_template.is_none() => {
                    return Err(DocumentError::EmptyForm {
                        page_id: page.id.clone(),
                        step_id: id.clone(),
                    });
                }
                _ => {}
            }
        }
    }
    Ok(())
}
