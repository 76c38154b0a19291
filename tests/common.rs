//! Common test utilities for building workflow documents and datasets.
use annai::prelude::*;

/// Serves dataset fixtures from an in-memory map.
pub struct StaticFetcher {
    resources: AHashMap<String, String>,
}

impl StaticFetcher {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            resources: AHashMap::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with(mut self, resource: &str, text: &str) -> Self {
        self.resources.insert(resource.to_string(), text.to_string());
        self
    }
}

impl ResourceFetcher for StaticFetcher {
    fn fetch(&self, resource: &str) -> std::result::Result<String, DataSourceError> {
        self.resources
            .get(resource)
            .cloned()
            .ok_or_else(|| DataSourceError::FetchError {
                resource: resource.to_string(),
                message: "404".to_string(),
            })
    }
}

/// A small but representative incident workflow: three pages, decision
/// branching, a cross-page `next`, a page reference, and a repeating group.
#[allow(dead_code)]
pub fn incident_document() -> Arc<WorkflowDocument> {
    let json = serde_json::json!({
        "workflow": {
            "pages": [
                {
                    "id": "page-dispatch",
                    "name": "Dispatch",
                    "steps": [
                        { "type": "start", "id": "dispatch-start", "label": "Start", "next": "incident-form" },
                        {
                            "type": "form",
                            "id": "incident-form",
                            "label": "Incident Basics",
                            "next": "incident-decision",
                            "fields": [
                                {
                                    "name": "locationType",
                                    "type": "select",
                                    "label": "Select a Location Type",
                                    "options": [
                                        { "value": "POINT", "label": "Point" },
                                        { "value": "AREA", "label": "Area" }
                                    ]
                                },
                                {
                                    "name": "exactAddress",
                                    "type": "text",
                                    "label": "Exact Address",
                                    "conditional": { "show": "locationType === 'POINT'" }
                                },
                                {
                                    "name": "callerName",
                                    "type": "text",
                                    "label": "Caller Name",
                                    "required": true,
                                    "validation": { "rule": "required" }
                                },
                                {
                                    "name": "callerEmail",
                                    "type": "email",
                                    "label": "Caller Email",
                                    "validation": { "rule": "email" }
                                }
                            ]
                        },
                        {
                            "type": "decision",
                            "id": "incident-decision",
                            "label": "Incident Severity",
                            "options": [
                                { "value": "fire", "label": "Structure fire", "next": "page-units" },
                                { "value": "minor", "label": "Minor incident", "next": "dispatch-note" },
                                { "value": "cancel", "label": "Cancelled call", "next": "end" }
                            ]
                        },
                        { "type": "message", "id": "dispatch-note", "label": "Noted", "next": "units-summary" }
                    ]
                },
                {
                    "id": "page-units",
                    "name": "Responding Units",
                    "steps": [
                        {
                            "type": "form",
                            "id": "units-form",
                            "label": "Responding Units",
                            "next": "units-summary",
                            "allowMultipleUnits": true,
                            "unitTemplate": {
                                "designationField": "respondingUnitDesignation",
                                "fields": [
                                    { "name": "respondingUnitDesignation", "type": "text", "label": "Designation" },
                                    { "name": "respondingUnitStaffing", "type": "number", "label": "Staffing", "min": 2.0 },
                                    { "name": "dispatchTime", "type": "datetime-local", "label": "Dispatch Time" },
                                    { "name": "unitLatitude", "type": "latitude", "label": "Latitude" },
                                    { "name": "unitLongitude", "type": "longitude", "label": "Longitude" }
                                ]
                            }
                        },
                        { "type": "message", "id": "units-summary", "label": "Units recorded", "next": "review-ref" },
                        { "type": "page-reference", "id": "review-ref", "label": "To review", "next": "page-review" }
                    ]
                },
                {
                    "id": "page-review",
                    "name": "Review",
                    "steps": [
                        {
                            "type": "form",
                            "id": "review-form",
                            "label": "Review",
                            "next": "review-end",
                            "fields": [
                                { "name": "reviewNotes", "type": "textarea", "label": "Notes" }
                            ]
                        },
                        { "type": "end", "id": "review-end", "label": "Done" }
                    ]
                }
            ]
        }
    });
    Arc::new(load_document(&json.to_string()).expect("fixture document must validate"))
}

/// Finds a field definition by name within a form step.
#[allow(dead_code)]
pub fn field<'a>(step: &'a Step, name: &str) -> &'a Field {
    fn search<'a>(fields: &'a [Field], name: &str) -> Option<&'a Field> {
        for f in fields {
            if f.name == name {
                return Some(f);
            }
            if let Some(found) = search(&f.fields, name) {
                return Some(found);
            }
        }
        None
    }
    match step {
        Step::Form {
            fields, sections, ..
        } => search(fields, name)
            .or_else(|| sections.iter().find_map(|s| search(&s.fields, name)))
            .expect("field present in fixture"),
        _ => panic!("not a form step"),
    }
}

/// Location-type dataset with duplicate categories for DISTINCT tests.
#[allow(dead_code)]
pub fn location_type_csv() -> &'static str {
    "\
description_1,active,value
RESIDENTIAL,TRUE,LOC_RES_1
RESIDENTIAL,TRUE,LOC_RES_2
COMMERCIAL,TRUE,LOC_COM_1
INDUSTRIAL,FALSE,LOC_IND_1
"
}

/// Location-use dataset whose display strings carry a leading category
/// token, for dependent-dropdown filtering tests.
#[allow(dead_code)]
pub fn location_use_csv() -> &'static str {
    "\
use_code,description_1,description_2,active
USE_1,RESIDENTIAL,Single family,TRUE
USE_2,RESIDENTIAL,Multi family,TRUE
USE_3,COMMERCIAL,Retail,TRUE
USE_4,COMMERCIAL,Office,FALSE
"
}

/// Builds the submitted-data map for a decision step.
#[allow(dead_code)]
pub fn decision(choice: &str) -> AHashMap<String, Value> {
    let mut data = AHashMap::new();
    data.insert("decision".to_string(), Value::Text(choice.to_string()));
    data
}

/// Shorthand for an empty submission payload.
#[allow(dead_code)]
pub fn no_data() -> AHashMap<String, Value> {
    AHashMap::new()
}
