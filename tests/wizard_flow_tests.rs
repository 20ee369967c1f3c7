mod common;

use casedesk_core::{
    api::ApiError,
    wizard::{
        dispatch, keys, submit_current_step, FormPatch, FormValues, StepRequest,
        SubmissionOutcome, SubmitRejected,
    },
};
use common::{ApiCall, MockCaseApi};
use serde_json::json;

#[test]
fn goto_step_clamps_into_range() {
    let mut session = common::new_session();
    for (target, expected) in [(0, 0), (3, 3), (4, 4), (5, 4), (10, 4), (usize::MAX, 4)] {
        session.goto_step(target);
        assert_eq!(session.current_step(), expected, "goto_step({target})");
    }
}

#[test]
fn goto_beyond_end_from_middle_lands_on_last_step() {
    let mut session = common::new_session();
    session.goto_step(2);
    session.goto_step(10);
    assert_eq!(session.current_step(), 4);
}

#[test]
fn reset_restores_first_step_and_defaults() {
    let mut session = common::new_session();
    let defaults = session.form_data().clone();
    let pending = session.begin_submit(&common::patient_values()).unwrap();
    session.complete_submission(pending, Ok(FormPatch::new()));
    session.goto_step(3);
    assert_ne!(session.form_data(), &defaults);

    session.reset();

    assert_eq!(session.current_step(), 0);
    assert_eq!(session.form_data(), &defaults);
    assert!(!session.signal().is_loading);
}

#[test]
fn invalid_submit_keeps_step_and_data() {
    let mut session = common::new_session();
    let before = session.form_data().clone();
    let mut values = common::patient_values();
    values.insert(keys::PATIENT_BIRTH_DATE.into(), json!("2999-01-01"));
    values.insert(keys::PATIENT_GENDER.into(), json!("femal"));

    let err = session.begin_submit(&values).unwrap_err();
    let SubmitRejected::Invalid(errors) = err else {
        panic!("expected validation errors, got {err:?}");
    };
    assert_eq!(errors.for_field(keys::PATIENT_BIRTH_DATE).len(), 1);
    assert!(errors.for_field(keys::PATIENT_GENDER)[0].contains("female"));

    assert_eq!(session.current_step(), 0);
    assert_eq!(session.form_data(), &before);
    assert!(!session.signal().is_valid);
    assert!(session.signal().error.is_none());
    assert!(!session.footer().forward.enabled);
}

#[test]
fn revalidation_re_enables_controls() {
    let mut session = common::new_session();
    let _ = session.begin_submit(&FormValues::new());
    assert!(session.signal().controls_disabled());

    assert!(session.revalidate(&common::patient_values()));
    assert!(session.signal().is_valid);
    assert!(session.field_errors().is_empty());
    assert!(session.footer().forward.enabled);
}

#[test]
fn back_is_blocked_while_invalid_or_loading() {
    let mut session = common::new_session();
    session.goto_step(1);
    let _ = session.begin_submit(&FormValues::new());
    assert!(!session.go_back());
    assert_eq!(session.current_step(), 1);

    assert!(session.revalidate(&common::clinical_values()));
    let _pending = session.begin_submit(&common::clinical_values()).unwrap();
    assert!(session.footer().back.visible);
    assert!(!session.footer().back.enabled);
    assert!(!session.go_back());
}

#[tokio::test]
async fn valid_submissions_reach_terminal_step() {
    let mut session = common::new_session();
    let api = MockCaseApi::new("case-42");

    for (step, values) in common::valid_steps().iter().enumerate() {
        let outcome = submit_current_step(&mut session, &api, values).await.unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::Advanced {
                from: step,
                to: step + 1
            }
        );
    }

    assert_eq!(session.current_step(), 4);
    let data = session.form_data();
    assert_eq!(data.get_str(keys::PATIENT_GENDER), Some("female"));
    assert_eq!(data.get_str(keys::CLINICAL_NOTES), Some("Crowding on lower incisors"));
    assert_eq!(data.get_bool(keys::TERMS_ACCEPTED), Some(true));
    assert_eq!(data.get_str(keys::CASE_ID), Some("case-42"));

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    let ApiCall::CreateCase(draft) = &calls[0] else {
        panic!("expected case creation first");
    };
    assert_eq!(draft.patient.first_name, "Ada");
    assert_eq!(
        calls[1],
        ApiCall::Upload {
            case_id: "case-42".into(),
            files: common::attachment_files(),
        }
    );
}

#[tokio::test]
async fn local_steps_do_not_touch_the_api() {
    let mut session = common::new_session();
    let api = MockCaseApi::new("unused");
    for values in &common::valid_steps()[..3] {
        submit_current_step(&mut session, &api, values).await.unwrap();
    }
    assert!(api.calls().is_empty());
    assert_eq!(session.current_step(), 3);
}

#[tokio::test]
async fn failed_creation_keeps_step_and_surfaces_error() {
    let mut session = common::new_session();
    let api = MockCaseApi::new("case-7");
    for values in &common::valid_steps()[..3] {
        submit_current_step(&mut session, &api, values).await.unwrap();
    }
    api.fail_next(ApiError::HttpStatus {
        status: 503,
        message: Some("Lab system offline".into()),
    });

    let outcome = submit_current_step(&mut session, &api, &common::review_values())
        .await
        .unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Failed {
            message: "Lab system offline".into()
        }
    );
    assert_eq!(session.current_step(), 3);
    assert_eq!(session.signal().error.as_deref(), Some("Lab system offline"));
    assert!(!session.signal().is_loading);
    assert!(session.footer().forward.enabled);
    assert_eq!(session.form_data().get(keys::CASE_ID), Some(&json!(null)));

    let retry = submit_current_step(&mut session, &api, &common::review_values())
        .await
        .unwrap();
    assert_eq!(retry, SubmissionOutcome::Advanced { from: 3, to: 4 });
    assert!(session.signal().error.is_none());
}

#[tokio::test]
async fn retry_after_failed_upload_reuses_created_case() {
    let mut session = common::new_session();
    let api = MockCaseApi::new("case-42");
    for values in &common::valid_steps()[..3] {
        submit_current_step(&mut session, &api, values).await.unwrap();
    }
    api.fail_next_upload(ApiError::Timeout);

    let first = submit_current_step(&mut session, &api, &common::review_values())
        .await
        .unwrap();
    assert!(matches!(first, SubmissionOutcome::Failed { .. }));
    assert_eq!(session.current_step(), 3);
    assert_eq!(session.created_case(), Some("case-42"));

    let retry = submit_current_step(&mut session, &api, &common::review_values())
        .await
        .unwrap();
    assert_eq!(retry, SubmissionOutcome::Advanced { from: 3, to: 4 });
    assert_eq!(api.create_calls(), 1);
    assert_eq!(session.form_data().get_str(keys::CASE_ID), Some("case-42"));

    let uploads: Vec<ApiCall> = api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, ApiCall::Upload { .. }))
        .collect();
    assert_eq!(uploads.len(), 2);
    for upload in uploads {
        assert_eq!(
            upload,
            ApiCall::Upload {
                case_id: "case-42".into(),
                files: common::attachment_files(),
            }
        );
    }
}

#[tokio::test]
async fn failed_creation_retries_with_the_same_reference() {
    let mut session = common::new_session();
    let api = MockCaseApi::new("case-3");
    for values in &common::valid_steps()[..3] {
        submit_current_step(&mut session, &api, values).await.unwrap();
    }
    api.fail_next(ApiError::Timeout);
    submit_current_step(&mut session, &api, &common::review_values())
        .await
        .unwrap();
    submit_current_step(&mut session, &api, &common::review_values())
        .await
        .unwrap();

    let references: Vec<_> = api
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ApiCall::CreateCase(draft) => Some(draft.client_reference),
            _ => None,
        })
        .collect();
    assert_eq!(references.len(), 2);
    assert_eq!(references[0], references[1]);
}

#[tokio::test]
async fn reset_starts_a_new_case() {
    let mut session = common::new_session();
    let api = MockCaseApi::new("case-8");
    for values in &common::valid_steps()[..3] {
        submit_current_step(&mut session, &api, values).await.unwrap();
    }
    api.fail_next_upload(ApiError::Timeout);
    submit_current_step(&mut session, &api, &common::review_values())
        .await
        .unwrap();
    assert_eq!(session.created_case(), Some("case-8"));

    session.reset();
    assert_eq!(session.created_case(), None);
    for values in common::valid_steps() {
        submit_current_step(&mut session, &api, &values).await.unwrap();
    }
    assert_eq!(api.create_calls(), 2);
    assert_eq!(session.form_data().get_str(keys::CASE_ID), Some("case-8-2"));
}

#[tokio::test]
async fn route_change_discards_in_flight_creation() {
    let mut session = common::new_session();
    let api = MockCaseApi::new("case-late");
    for values in &common::valid_steps()[..3] {
        submit_current_step(&mut session, &api, values).await.unwrap();
    }
    let defaults = session.registry().default_form_data();

    let pending = session.begin_submit(&common::review_values()).unwrap();
    assert!(matches!(pending.request(), StepRequest::CreateCase(_)));
    assert!(session.signal().is_loading);

    assert!(session.enter_route("/cases/new?patient=99"));
    assert_eq!(session.current_step(), 0);
    assert_eq!(session.form_data(), &defaults);
    assert!(!session.signal().is_loading);

    let outcome = dispatch(&mut session, &api, pending).await;
    assert_eq!(outcome, SubmissionOutcome::Stale);
    assert_eq!(session.current_step(), 0);
    assert_eq!(session.form_data(), &defaults);
    assert!(session.signal().error.is_none());
}

#[test]
fn stale_failure_does_not_set_error() {
    let mut session = common::new_session();
    let pending = session.begin_submit(&common::patient_values()).unwrap();
    session.reset();
    let outcome = session.complete_submission(pending, Err("network down".into()));
    assert_eq!(outcome, SubmissionOutcome::Stale);
    assert!(session.signal().error.is_none());
}

#[test]
fn completing_twice_only_advances_once() {
    let mut session = common::new_session();
    let pending = session.begin_submit(&common::patient_values()).unwrap();
    let duplicate = pending.clone();
    assert_eq!(
        session.complete_submission(pending, Ok(FormPatch::new())),
        SubmissionOutcome::Advanced { from: 0, to: 1 }
    );
    assert_eq!(
        session.complete_submission(duplicate, Ok(FormPatch::new())),
        SubmissionOutcome::Stale
    );
    assert_eq!(session.current_step(), 1);
}

#[test]
fn resubmitting_a_step_overwrites_its_fields() {
    let mut session = common::new_session();
    let pending = session.begin_submit(&common::patient_values()).unwrap();
    session.complete_submission(pending, Ok(FormPatch::new()));
    assert!(session.go_back());

    let mut values = common::patient_values();
    values.insert(keys::PATIENT_FIRST_NAME.into(), json!("Grace"));
    let pending = session.begin_submit(&values).unwrap();
    session.complete_submission(pending, Ok(FormPatch::new()));

    assert_eq!(session.form_data().get_str(keys::PATIENT_FIRST_NAME), Some("Grace"));
    assert_eq!(session.form_data().get_str(keys::PATIENT_LAST_NAME), Some("Lovelace"));
}

#[test]
fn terminal_step_is_not_submittable() {
    let mut session = common::new_session();
    session.goto_step(4);
    assert_eq!(
        session.begin_submit(&FormValues::new()),
        Err(SubmitRejected::NotSubmittable)
    );
}
