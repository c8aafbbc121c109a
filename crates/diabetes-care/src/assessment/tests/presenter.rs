use super::common::*;
use crate::assessment::catalog::AdvisoryCatalog;
use crate::assessment::controller::{Assessment, SubmissionController, SubmissionState};
use crate::assessment::prediction::{Verdict, VerdictCategory};
use crate::assessment::presenter::{AdvisoryPanel, ResultPresenter, FAILURE_MESSAGE};
use chrono::Local;
use std::sync::Arc;

fn presenter() -> ResultPresenter {
    let catalog = AdvisoryCatalog::embedded().expect("embedded catalog parses");
    ResultPresenter::new(Arc::new(catalog))
}

fn settled(attempt: u64, label: &str) -> SubmissionState {
    SubmissionState::Settled(Assessment {
        attempt,
        verdict: Verdict::new(label),
        received_at: Local::now(),
    })
}

#[test]
fn nothing_to_present_before_a_verdict() {
    let mut presenter = presenter();
    presenter.observe(&SubmissionState::Idle);

    assert_eq!(presenter.current_verdict_category(), None);
    assert!(!presenter.toggle_advisory());
    assert!(presenter.advisory_entries().is_empty());
}

#[test]
fn positive_verdict_offers_advisory_toggle() {
    let mut presenter = presenter();
    presenter.observe(&settled(1, "Diabetic"));

    assert_eq!(
        presenter.current_verdict_category(),
        Some(VerdictCategory::Positive)
    );
    assert!(presenter.advisory_available());
    assert!(!presenter.advisory_visible());
    assert!(presenter.advisory_entries().is_empty());

    assert!(presenter.toggle_advisory());
    assert_eq!(presenter.advisory_entries().len(), 5);
    assert_eq!(presenter.advisory_entries()[0].title, "Cinnamon");
}

#[test]
fn toggling_twice_restores_visibility() {
    let mut presenter = presenter();
    presenter.observe(&settled(1, "Diabetic"));

    let before = presenter.advisory_visible();
    presenter.toggle_advisory();
    presenter.toggle_advisory();
    assert_eq!(presenter.advisory_visible(), before);

    presenter.toggle_advisory();
    let before = presenter.advisory_visible();
    presenter.toggle_advisory();
    presenter.toggle_advisory();
    assert_eq!(presenter.advisory_visible(), before);
}

#[test]
fn negative_and_unexpected_labels_never_expose_advisories() {
    for label in ["Non-Diabetic", "Error occurred", "DIABETIC"] {
        let mut presenter = presenter();
        presenter.observe(&settled(1, label));

        assert_eq!(
            presenter.current_verdict_category(),
            Some(VerdictCategory::Negative)
        );
        assert_eq!(presenter.advisory_panel(), AdvisoryPanel::Unavailable);
        assert!(!presenter.toggle_advisory());
        assert!(presenter.advisory_entries().is_empty());
    }
}

#[test]
fn new_verdict_resets_visibility() {
    let mut presenter = presenter();
    presenter.observe(&settled(1, "Diabetic"));
    presenter.toggle_advisory();

    presenter.observe(&settled(1, "Diabetic"));
    assert!(presenter.advisory_visible(), "same attempt keeps choice");

    presenter.observe(&SubmissionState::Pending { attempt: 2 });
    assert!(presenter.advisory_entries().is_empty());

    presenter.observe(&settled(2, "Diabetic"));
    assert!(!presenter.advisory_visible());
    assert_eq!(presenter.advisory_panel(), AdvisoryPanel::Collapsed);
}

#[test]
fn failure_message_only_for_failed_state() {
    assert_eq!(
        ResultPresenter::failure_message(&SubmissionState::Failed { attempt: 3 }),
        Some(FAILURE_MESSAGE)
    );
    assert_eq!(ResultPresenter::failure_message(&settled(1, "Diabetic")), None);
    assert_eq!(ResultPresenter::failure_message(&SubmissionState::Idle), None);
}

#[tokio::test]
async fn follows_controller_settlements() {
    let service = Arc::new(ScriptedPrediction::replying(vec![
        verdict("Diabetic"),
        verdict("Non-Diabetic"),
    ]));
    let controller = SubmissionController::new(service);
    let mut presenter = presenter();

    let state = controller.submit(complete_fields()).await.expect("accepted");
    presenter.observe(&state);
    assert!(presenter.toggle_advisory());

    let state = controller.submit(complete_fields()).await.expect("accepted");
    presenter.observe(&state);
    assert_eq!(
        presenter.current_verdict_category(),
        Some(VerdictCategory::Negative)
    );
    assert!(presenter.advisory_entries().is_empty());
}
