//! End-to-end tests over the application services with in-memory storage.

use std::sync::Arc;

use dynaform::{
    CapturingEventPublisher, CreateFormCommand, DomainEvent, EntityId, FieldInput, FieldSpec,
    FieldType, FieldViolation, Form, FormService, FormUseCases, InMemoryFormRepository,
    InMemoryRecordRepository, IntegrityError, RecordEvent, RecordFilter, RecordService,
    RecordUseCases, SubmitRecordCommand, UpdateRecordCommand, UseCaseError, ValidationError,
};

struct Harness {
    forms: Arc<InMemoryFormRepository>,
    records: Arc<InMemoryRecordRepository>,
    events: Arc<CapturingEventPublisher>,
    form_service: FormService,
    record_service: RecordService,
}

fn harness() -> Harness {
    let forms = Arc::new(InMemoryFormRepository::new());
    let records = Arc::new(InMemoryRecordRepository::new());
    let events = Arc::new(CapturingEventPublisher::new());
    Harness {
        form_service: FormService::new(forms.clone(), records.clone(), events.clone()),
        record_service: RecordService::new(forms.clone(), records.clone(), events.clone()),
        forms,
        records,
        events,
    }
}

fn intake_command() -> CreateFormCommand {
    CreateFormCommand {
        name: "Intake".into(),
        description: "New hire intake".into(),
        fields: vec![
            FieldSpec::new("Email", FieldType::Email),
            FieldSpec::new("Role", FieldType::Select).with_options(["Eng", "Sales"]),
        ],
    }
}

fn entry(form: &Form, label: &str, value: &str) -> FieldInput {
    let field = form.fields().iter().find(|f| f.label == label).unwrap();
    FieldInput::new(field.id.clone(), value)
}

#[tokio::test]
async fn form_fields_come_back_in_display_order() {
    let h = harness();
    let created = h
        .form_service
        .create_form(CreateFormCommand {
            name: "Survey".into(),
            description: String::new(),
            fields: vec![
                FieldSpec::new("Last", FieldType::Text).with_order(9),
                FieldSpec::new("Tie A", FieldType::Text).with_order(3),
                FieldSpec::new("Tie B", FieldType::Text).with_order(3),
                FieldSpec::new("First", FieldType::Text).with_order(1),
            ],
        })
        .await
        .unwrap();

    let fetched = h.form_service.get_form(created.id()).await.unwrap();
    let labels: Vec<&str> = fetched.fields().iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, ["First", "Tie A", "Tie B", "Last"]);
}

#[tokio::test]
async fn select_without_options_persists_nothing() {
    let h = harness();
    let err = h
        .form_service
        .create_form(CreateFormCommand {
            name: "Broken".into(),
            description: String::new(),
            fields: vec![FieldSpec::new("Role", FieldType::Select)],
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UseCaseError::Validation(ValidationError::MissingOptions(FieldType::Select))
    ));
    assert!(h.forms.is_empty());
    assert!(h.events.drain().is_empty());
}

#[tokio::test]
async fn list_forms_newest_first() {
    let h = harness();
    let mut command = intake_command();
    command.name = "Older".into();
    h.form_service.create_form(command).await.unwrap();
    let mut command = intake_command();
    command.name = "Newer".into();
    h.form_service.create_form(command).await.unwrap();

    let names: Vec<String> = h
        .form_service
        .list_forms()
        .await
        .unwrap()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(names, ["Newer", "Older"]);
}

#[tokio::test]
async fn missing_required_field_persists_no_record() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();

    let err = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "a@b.com")],
        })
        .await
        .unwrap_err();

    let UseCaseError::Validation(ValidationError::Submission(violations)) = err else {
        panic!("expected a submission validation error");
    };
    assert!(violations
        .iter()
        .any(|v| matches!(v, FieldViolation::RequiredField { .. })));
    assert!(h.records.is_empty());
}

#[tokio::test]
async fn foreign_field_is_an_integrity_error() {
    let h = harness();
    let intake = h.form_service.create_form(intake_command()).await.unwrap();
    let other = h
        .form_service
        .create_form(CreateFormCommand {
            name: "Other".into(),
            description: String::new(),
            fields: vec![FieldSpec::new("Notes", FieldType::Textarea).optional()],
        })
        .await
        .unwrap();

    let err = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: intake.id().clone(),
            entries: vec![
                entry(&intake, "Email", "a@b.com"),
                entry(&intake, "Role", "Eng"),
                entry(&other, "Notes", "smuggled"),
            ],
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UseCaseError::Integrity(IntegrityError::FieldMismatch { .. })
    ));
    assert!(h.records.is_empty());
}

#[tokio::test]
async fn intake_scenario_end_to_end() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();

    // Bad email address.
    let err = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "bad"), entry(&form, "Role", "Eng")],
        })
        .await
        .unwrap_err();
    let UseCaseError::Validation(ValidationError::Submission(violations)) = err else {
        panic!("expected a submission validation error");
    };
    assert!(violations
        .iter()
        .any(|v| matches!(v, FieldViolation::TypeMismatch { expected, .. } if *expected == FieldType::Email)));

    // Value outside the choice set.
    let err = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "a@b.com"), entry(&form, "Role", "Exec")],
        })
        .await
        .unwrap_err();
    let UseCaseError::Validation(ValidationError::Submission(violations)) = err else {
        panic!("expected a submission validation error");
    };
    assert!(violations
        .iter()
        .any(|v| matches!(v, FieldViolation::InvalidOption { value, .. } if value == "Exec")));

    // Valid submission.
    let view = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "a@b.com"), entry(&form, "Role", "Eng")],
        })
        .await
        .unwrap();
    assert_eq!(view.value("Email"), Some("a@b.com"));

    // Substring filter on Role finds exactly that record.
    let role_id = form
        .fields()
        .iter()
        .find(|f| f.label == "Role")
        .unwrap()
        .id
        .clone();
    let matched = h
        .record_service
        .list_records(form.id(), &RecordFilter::new().with(role_id.clone(), "Eng"))
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, view.id);

    // And the filter is a real predicate, not a pass-through.
    let none = h
        .record_service
        .list_records(form.id(), &RecordFilter::new().with(role_id, "Sales"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn get_record_joins_values_in_display_order() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();
    let view = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Role", "Eng"), entry(&form, "Email", "a@b.com")],
        })
        .await
        .unwrap();

    let fetched = h.record_service.get_record(&view.id).await.unwrap();
    assert_eq!(fetched.id, view.id);
    assert_eq!(&fetched.form_id, form.id());
    let labels: Vec<&str> = fetched.values.iter().map(|v| v.label.as_str()).collect();
    assert_eq!(labels, ["Email", "Role"]);
    assert_eq!(fetched.value("Email"), Some("a@b.com"));
}

#[tokio::test]
async fn get_unknown_record_reports_not_found() {
    let h = harness();
    let err = h
        .record_service
        .get_record(&EntityId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::NotFound("record")));
}

#[tokio::test]
async fn filter_params_convention() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();
    h.record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "a@b.com"), entry(&form, "Role", "Eng")],
        })
        .await
        .unwrap();

    let email_id = &form.fields().iter().find(|f| f.label == "Email").unwrap().id;
    let params = [
        (format!("field_{email_id}"), "A@B".to_string()),
        ("form".to_string(), form.id().to_string()),
    ];
    let filter = RecordFilter::from_params(params.iter().map(|(k, v)| (k, v)));

    let matched = h.record_service.list_records(form.id(), &filter).await.unwrap();
    assert_eq!(matched.len(), 1);
}

#[tokio::test]
async fn update_is_idempotent_and_partial() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();
    let view = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "a@b.com"), entry(&form, "Role", "Eng")],
        })
        .await
        .unwrap();

    let update = UpdateRecordCommand {
        record_id: view.id.clone(),
        entries: vec![entry(&form, "Role", "Sales")],
    };
    let once = h.record_service.update_record(update.clone()).await.unwrap();
    let twice = h.record_service.update_record(update).await.unwrap();

    assert_eq!(once.value("Role"), Some("Sales"));
    assert_eq!(twice.value("Role"), Some("Sales"));
    // Unlisted field kept its prior value.
    assert_eq!(twice.value("Email"), Some("a@b.com"));
    assert_eq!(h.records.len(), 1);
}

#[tokio::test]
async fn update_does_not_revalidate_types() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();
    let view = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "a@b.com"), entry(&form, "Role", "Eng")],
        })
        .await
        .unwrap();

    // Permissive by design: updates skip type and required rules.
    let updated = h
        .record_service
        .update_record(UpdateRecordCommand {
            record_id: view.id.clone(),
            entries: vec![entry(&form, "Email", "not-an-email")],
        })
        .await
        .unwrap();
    assert_eq!(updated.value("Email"), Some("not-an-email"));
}

#[tokio::test]
async fn update_rejects_foreign_fields() {
    let h = harness();
    let intake = h.form_service.create_form(intake_command()).await.unwrap();
    let other = h
        .form_service
        .create_form(CreateFormCommand {
            name: "Other".into(),
            description: String::new(),
            fields: vec![FieldSpec::new("Notes", FieldType::Textarea).optional()],
        })
        .await
        .unwrap();
    let view = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: intake.id().clone(),
            entries: vec![entry(&intake, "Email", "a@b.com"), entry(&intake, "Role", "Eng")],
        })
        .await
        .unwrap();

    let err = h
        .record_service
        .update_record(UpdateRecordCommand {
            record_id: view.id,
            entries: vec![entry(&other, "Notes", "nope")],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::Integrity(_)));
}

#[tokio::test]
async fn deleting_a_form_cascades_to_records() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();
    for _ in 0..3 {
        h.record_service
            .submit_record(SubmitRecordCommand {
                form_id: form.id().clone(),
                entries: vec![entry(&form, "Email", "a@b.com"), entry(&form, "Role", "Eng")],
            })
            .await
            .unwrap();
    }
    assert_eq!(h.records.len(), 3);

    h.form_service.delete_form(form.id()).await.unwrap();

    assert!(h.forms.is_empty());
    assert!(h.records.is_empty());
    assert!(matches!(
        h.form_service.get_form(form.id()).await.unwrap_err(),
        UseCaseError::NotFound(_)
    ));

    // A second delete, and a delete of an id never seen, both miss.
    let err = h.form_service.delete_form(form.id()).await.unwrap_err();
    assert!(matches!(err, UseCaseError::NotFound("form")));
    let err = h
        .form_service
        .delete_form(&EntityId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::NotFound("form")));
}

#[tokio::test]
async fn second_delete_reports_not_found() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();
    let view = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "a@b.com"), entry(&form, "Role", "Eng")],
        })
        .await
        .unwrap();

    h.record_service.delete_record(&view.id).await.unwrap();
    let err = h.record_service.delete_record(&view.id).await.unwrap_err();
    assert!(matches!(err, UseCaseError::NotFound("record")));
}

#[tokio::test]
async fn lifecycle_events_are_published() {
    let h = harness();
    let form = h.form_service.create_form(intake_command()).await.unwrap();
    let view = h
        .record_service
        .submit_record(SubmitRecordCommand {
            form_id: form.id().clone(),
            entries: vec![entry(&form, "Email", "a@b.com"), entry(&form, "Role", "Eng")],
        })
        .await
        .unwrap();
    h.record_service.delete_record(&view.id).await.unwrap();

    let events = h.events.drain();
    assert_eq!(events.len(), 3);
    assert!(matches!(
        events[1],
        DomainEvent::Record(RecordEvent::Submitted { .. })
    ));
    assert!(matches!(
        events[2],
        DomainEvent::Record(RecordEvent::Deleted { .. })
    ));
}
