use super::common::*;
use crate::assessment::controller::{SubmissionController, SubmissionState, SubmitRejection};
use crate::assessment::form::MeasurementField;
use crate::assessment::prediction::{PredictionError, Verdict};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[tokio::test]
async fn starts_idle() {
    let service = Arc::new(ScriptedPrediction::default());
    let controller = SubmissionController::new(service);
    assert_eq!(controller.state(), SubmissionState::Idle);
    assert!(!controller.is_pending());
}

#[tokio::test]
async fn positive_reply_settles_with_verdict() {
    let service = Arc::new(ScriptedPrediction::replying(vec![verdict("Diabetic")]));
    let controller = SubmissionController::new(service.clone());

    let state = controller
        .submit(complete_fields())
        .await
        .expect("submission accepted");

    let assessment = state.assessment().expect("settled");
    assert_eq!(assessment.verdict, Verdict::new("Diabetic"));
    assert_eq!(assessment.attempt, 1);
    assert_eq!(controller.state(), state);
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn request_carries_the_snapshot_verbatim() {
    let service = Arc::new(ScriptedPrediction::replying(vec![verdict("Non-Diabetic")]));
    let controller = SubmissionController::new(service.clone());

    let mut fields = complete_fields();
    fields.set(MeasurementField::Bmi, "33.60");
    controller.submit(fields.clone()).await.expect("accepted");

    assert_eq!(service.requests(), vec![fields]);
}

#[tokio::test]
async fn every_fault_collapses_to_failed() {
    let faults = vec![
        Err(PredictionError::MissingVerdict),
        Err(PredictionError::Status(StatusCode::BAD_GATEWAY)),
        Err(PredictionError::Malformed(
            serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json"),
        )),
    ];
    let service = Arc::new(ScriptedPrediction::replying(faults));
    let controller = SubmissionController::new(service.clone());

    for attempt in 1..=3 {
        let state = controller.submit(complete_fields()).await.expect("accepted");
        assert_eq!(state, SubmissionState::Failed { attempt });
    }
    assert_eq!(service.calls(), 3);
}

#[tokio::test]
async fn rejects_submissions_while_pending() {
    let service = Arc::new(ScriptedPrediction::replying(vec![
        verdict("Non-Diabetic"),
        verdict("Diabetic"),
    ]));
    let controller = SubmissionController::new(service.clone());

    let pending = controller.start(complete_fields()).expect("first starts");
    assert_eq!(controller.state(), SubmissionState::Pending { attempt: 1 });

    match controller.submit(complete_fields()).await {
        Err(SubmitRejection::AlreadyPending) => {}
        other => panic!("expected pending rejection, got {other:?}"),
    }
    assert_eq!(service.calls(), 0);
    assert_eq!(controller.state(), SubmissionState::Pending { attempt: 1 });

    let settled = pending.complete().await;
    assert_eq!(settled.verdict(), Some(&Verdict::new("Non-Diabetic")));
    assert_eq!(service.calls(), 1);

    let next = controller.submit(complete_fields()).await.expect("resubmits");
    assert_eq!(next.verdict(), Some(&Verdict::new("Diabetic")));
    assert_eq!(next.assessment().map(|a| a.attempt), Some(2));
}

#[tokio::test]
async fn in_flight_request_blocks_a_second_outbound_call() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(ScriptedPrediction::gated(
        vec![verdict("Diabetic")],
        gate.clone(),
    ));
    let controller = Arc::new(SubmissionController::new(service.clone()));

    let pending = controller.start(complete_fields()).expect("starts");
    let in_flight = tokio::spawn(pending.complete());
    service.wait_started().await;

    assert!(controller.is_pending());
    assert!(matches!(
        controller.start(complete_fields()),
        Err(SubmitRejection::AlreadyPending)
    ));
    assert_eq!(service.calls(), 1);

    gate.notify_one();
    let settled = in_flight.await.expect("task joins");
    assert_eq!(settled.verdict(), Some(&Verdict::new("Diabetic")));
    assert_eq!(service.calls(), 1);
    assert!(!controller.is_pending());
}

#[tokio::test]
async fn empty_fields_block_the_request() {
    let service = Arc::new(ScriptedPrediction::replying(vec![verdict("Diabetic")]));
    let controller = SubmissionController::new(service.clone());

    let mut fields = complete_fields();
    fields.set(MeasurementField::Insulin, "");

    match controller.submit(fields).await {
        Err(SubmitRejection::MissingFields(missing)) => {
            assert_eq!(missing, vec![MeasurementField::Insulin]);
        }
        other => panic!("expected missing field rejection, got {other:?}"),
    }
    assert_eq!(service.calls(), 0);
    assert_eq!(controller.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn failed_state_allows_resubmission() {
    let service = Arc::new(ScriptedPrediction::replying(vec![
        Err(PredictionError::MissingVerdict),
        verdict("Non-Diabetic"),
    ]));
    let controller = SubmissionController::new(service.clone());

    let first = controller.submit(complete_fields()).await.expect("accepted");
    assert_eq!(first, SubmissionState::Failed { attempt: 1 });

    let second = controller.submit(complete_fields()).await.expect("accepted");
    assert_eq!(second.verdict(), Some(&Verdict::new("Non-Diabetic")));
}

#[tokio::test]
async fn cancelled_submit_settles_as_failed() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(ScriptedPrediction::gated(
        vec![verdict("Diabetic")],
        gate.clone(),
    ));
    let controller = SubmissionController::new(service.clone());

    let cancelled = tokio::time::timeout(
        Duration::from_millis(50),
        controller.submit(complete_fields()),
    )
    .await;
    assert!(cancelled.is_err(), "request was still in flight");
    assert_eq!(service.calls(), 1);
    assert_eq!(controller.state(), SubmissionState::Failed { attempt: 1 });

    gate.notify_one();
    let retry = controller.submit(complete_fields()).await.expect("resubmits");
    assert_eq!(retry.verdict(), Some(&Verdict::new("Diabetic")));
    assert_eq!(retry.assessment().map(|a| a.attempt), Some(2));
}

#[tokio::test]
async fn discarded_pending_submission_never_calls_the_service() {
    let service = Arc::new(ScriptedPrediction::replying(vec![verdict("Non-Diabetic")]));
    let controller = SubmissionController::new(service.clone());

    let pending = controller.start(complete_fields()).expect("starts");
    drop(pending);

    assert_eq!(controller.state(), SubmissionState::Failed { attempt: 1 });
    assert_eq!(service.calls(), 0);
    assert!(controller.start(complete_fields()).is_ok());
}

#[test]
fn rejection_messages_name_the_missing_fields() {
    let rejection =
        SubmitRejection::MissingFields(vec![MeasurementField::BloodPressure, MeasurementField::Age]);
    assert_eq!(
        rejection.to_string(),
        "required fields are empty: bloodPressure, age"
    );
}
