//! Composition of the form, submission controller, result presenter and
//! display preference into the single session the page renders.

pub mod views;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::assessment::{
    AdvisoryCatalog, AssessmentForm, MeasurementField, PendingSubmission, PredictionService,
    ResultPresenter, SubmissionController, SubmissionState, SubmitRejection, UnknownField,
    FIELD_DESCRIPTORS,
};
use crate::preferences::{DisplayMode, PreferenceError, PreferenceStorage, PreferenceStore};

pub use views::{AdvisoryView, FieldView, ResultView, SessionView};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The single-user assessment session.
///
/// Each component keeps its own state; the session only decides how they are
/// read together. Advisory content is derived from the presenter after it has
/// observed the latest submission state, so it can never outlive the verdict
/// it belongs to.
pub struct AssessmentSession<P, S> {
    form: Mutex<AssessmentForm>,
    controller: SubmissionController<P>,
    presenter: Mutex<ResultPresenter>,
    preferences: Mutex<PreferenceStore<S>>,
}

impl<P, S> AssessmentSession<P, S>
where
    P: PredictionService + 'static,
    S: PreferenceStorage,
{
    pub fn new(
        service: Arc<P>,
        catalog: Arc<AdvisoryCatalog>,
        preferences: PreferenceStore<S>,
    ) -> Self {
        Self {
            form: Mutex::new(AssessmentForm::new()),
            controller: SubmissionController::new(service),
            presenter: Mutex::new(ResultPresenter::new(catalog)),
            preferences: Mutex::new(preferences),
        }
    }

    pub fn set_field(&self, field: MeasurementField, value: impl Into<String>) {
        lock(&self.form).set_field(field, value);
    }

    pub fn set_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<MeasurementField, UnknownField> {
        lock(&self.form).set_field_by_name(name, value)
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.controller.state()
    }

    /// Snapshots the form and moves the lifecycle to `Pending`.
    pub fn start_submission(&self) -> Result<PendingSubmission<P>, SubmitRejection> {
        let snapshot = lock(&self.form).snapshot();
        self.controller.start(snapshot)
    }

    /// Snapshots the form, submits it and waits for the verdict.
    pub async fn submit(&self) -> Result<SubmissionState, SubmitRejection> {
        let pending = self.start_submission()?;
        Ok(pending.complete().await)
    }

    /// Returns whether the advisory is visible afterwards.
    pub fn toggle_advisory(&self) -> bool {
        self.observed_presenter().toggle_advisory()
    }

    pub fn display_mode(&self) -> DisplayMode {
        lock(&self.preferences).mode()
    }

    pub fn toggle_display_mode(&self) -> Result<DisplayMode, PreferenceError> {
        lock(&self.preferences).toggle()
    }

    pub fn view(&self) -> SessionView {
        let submission = self.controller.state();
        let form = lock(&self.form).clone();
        let fields = FIELD_DESCRIPTORS
            .iter()
            .map(|descriptor| FieldView::new(descriptor, form.value(descriptor.field)))
            .collect();

        let (result, advisory) = {
            let mut presenter = lock(&self.presenter);
            presenter.observe(&submission);

            let result = match (&submission, presenter.current_verdict_category()) {
                (SubmissionState::Settled(assessment), Some(category)) => {
                    Some(ResultView::Verdict {
                        verdict: assessment.verdict.clone(),
                        category,
                        received_at: assessment.received_at,
                    })
                }
                _ => ResultPresenter::failure_message(&submission)
                    .map(|message| ResultView::Unavailable { message }),
            };
            let advisory = AdvisoryView {
                panel: presenter.advisory_panel(),
                entries: presenter.advisory_entries().to_vec(),
            };
            (result, advisory)
        };

        SessionView {
            display_mode: self.display_mode(),
            fields,
            busy: submission.is_pending(),
            submission,
            result,
            advisory,
        }
    }

    fn observed_presenter(&self) -> MutexGuard<'_, ResultPresenter> {
        let state = self.controller.state();
        let mut presenter = lock(&self.presenter);
        presenter.observe(&state);
        presenter
    }
}
