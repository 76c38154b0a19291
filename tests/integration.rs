//! End-to-end walk of a workflow: load, navigate, resolve options, collect
//! unit data, complete.
mod common;

use annai::prelude::*;

use common::StaticFetcher;

#[test]
fn full_incident_walkthrough() -> Result<()> {
    let document = common::incident_document();
    let mut navigator = Navigator::builder(Arc::clone(&document))
        .with_clock(Box::new(FixedClock("2026-03-14T09:26".to_string())))
        .build()?;

    // Start page.
    assert_eq!(navigator.current_step()?.id(), "dispatch-start");
    navigator.submit("dispatch-start", common::no_data())?;

    // Incident form: fill it the way a presentation layer would, field edits
    // first, then the step submission payload.
    let step = navigator.current_step()?.clone();
    let name_field = common::field(&step, "callerName").clone();
    let outcome = navigator.set_value(
        &name_field,
        "callerName",
        Value::Text("Ada Quinn".to_string()),
    );
    assert!(outcome.is_valid());

    let mut data = AHashMap::new();
    data.insert("callerName".to_string(), Value::Text("Ada Quinn".to_string()));
    data.insert("locationType".to_string(), Value::Text("POINT".to_string()));
    navigator.submit("incident-form", data)?;

    // Branch to the units page.
    let transition = navigator.submit("incident-decision", common::decision("fire"))?;
    assert_eq!(
        transition,
        Transition::PageChanged {
            from: "page-dispatch".to_string(),
            to: "page-units".to_string(),
        }
    );

    // Two responding units, the second renamed through its designation field.
    navigator.add_unit();
    assert_eq!(navigator.units().len(), 2);
    let designation: Field = serde_json::from_value(serde_json::json!({
        "name": "respondingUnitDesignation",
        "type": "text"
    }))?;
    navigator.set_value(
        &designation,
        "unit-2.respondingUnitDesignation",
        Value::Text("Ladder 2".to_string()),
    );
    assert_eq!(navigator.units()[1].designation, "Ladder 2");

    navigator.submit("units-form", common::no_data())?;
    navigator.submit("units-summary", common::no_data())?;
    navigator.submit("review-ref", common::no_data())?;

    // Review and finish.
    let mut review = AHashMap::new();
    review.insert(
        "reviewNotes".to_string(),
        Value::Text("Two units dispatched".to_string()),
    );
    navigator.submit("review-form", review)?;
    let transition = navigator.submit("review-end", common::no_data())?;
    assert_eq!(transition, Transition::Completed);
    assert!(navigator.is_complete());

    // Everything the walk collected is still in the store.
    let state = navigator.form_state();
    assert_eq!(
        state.get_value("incident-form.callerName"),
        Some(&Value::Text("Ada Quinn".to_string()))
    );
    assert_eq!(
        state.get_value("incident-decision.decision"),
        Some(&Value::Text("fire".to_string()))
    );
    assert_eq!(
        state.get_value("review-form.reviewNotes"),
        Some(&Value::Text("Two units dispatched".to_string()))
    );
    Ok(())
}

#[test]
fn dependent_dropdowns_resolve_against_submitted_values() -> Result<()> {
    // A one-page workflow whose second field's options depend on the first.
    let json = serde_json::json!({
        "workflow": { "pages": [
            { "id": "page-location", "name": "Location", "steps": [
                {
                    "type": "form",
                    "id": "location-form",
                    "label": "Location",
                    "next": "end",
                    "fields": [
                        {
                            "name": "locationTypeCategory",
                            "type": "searchable-combo",
                            "label": "Location Type",
                            "dataSource": {
                                "file": "location_type.csv",
                                "columns": {
                                    "value": "value",
                                    "display": "DISTINCT(description_1)"
                                }
                            }
                        },
                        {
                            "name": "locationUse",
                            "type": "searchable-combo",
                            "label": "Location Use",
                            "dataSource": {
                                "file": "location_use.csv",
                                "columns": {
                                    "value": "use_code",
                                    "display": "CONCATENATE(description_1, description_2)"
                                },
                                "filterField": "locationTypeCategory"
                            }
                        }
                    ]
                }
            ] }
        ] }
    });
    let document = Arc::new(load_document(&json.to_string())?);
    let mut navigator = Navigator::builder(document).build()?;

    let resolver = OptionResolver::new(
        StaticFetcher::new()
            .with("location_type.csv", common::location_type_csv())
            .with("location_use.csv", common::location_use_csv()),
    );
    let mut cache = OptionsCache::new();

    let pass = navigator.render_pass()?;
    let category_source = pass.visible_fields[0].data_source.clone().unwrap();
    let use_source = pass.visible_fields[1].data_source.clone().unwrap();

    // Category options come back deduplicated.
    let categories = resolver.resolve(&category_source, None)?;
    assert_eq!(categories.len(), 2);

    // The user picks a category; the dependent field resolves under it.
    let category_field: Field = serde_json::from_value(serde_json::json!({
        "name": "locationTypeCategory",
        "type": "searchable-combo"
    }))?;
    navigator.set_value(
        &category_field,
        "locationTypeCategory",
        Value::Text("RESIDENTIAL".to_string()),
    );

    let filter = navigator.filter_value(&use_source).cloned();
    let key = cache.begin("locationUse", filter.as_ref());
    let options = resolver.resolve(&use_source, filter.as_ref().map(|v| v.to_string()).as_deref());
    let options = options?;
    assert!(cache.commit(key, options, navigator.filter_value(&use_source)));
    assert_eq!(cache.options("locationUse").unwrap().len(), 2);

    // A stale completion issued under the old category is discarded once the
    // user switches to another one.
    let stale_key = cache.begin("locationUse", navigator.filter_value(&use_source));
    navigator.set_value(
        &category_field,
        "locationTypeCategory",
        Value::Text("COMMERCIAL".to_string()),
    );
    let stale = resolver.resolve(&use_source, Some("RESIDENTIAL"))?;
    assert!(!cache.commit(stale_key, stale, navigator.filter_value(&use_source)));
    // The previously committed list stays current until a fresh resolution.
    assert_eq!(cache.options("locationUse").unwrap().len(), 2);

    Ok(())
}
