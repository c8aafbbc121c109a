use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, warn};

use super::form::{FieldSet, MeasurementField};
use super::prediction::{PredictionError, PredictionService, Verdict};

/// A verdict received for one submission attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub attempt: u64,
    pub verdict: Verdict,
    pub received_at: DateTime<Local>,
}

/// Lifecycle of the most recent submission attempt.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending {
        attempt: u64,
    },
    Settled(Assessment),
    Failed {
        attempt: u64,
    },
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        match self {
            Self::Settled(assessment) => Some(assessment),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.assessment().map(|assessment| &assessment.verdict)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Pending { .. } => "Pending",
            Self::Settled(_) => "Settled",
            Self::Failed { .. } => "Failed",
        }
    }
}

/// Why a submission was not started. State is left untouched in both cases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("a prediction request is already in flight")]
    AlreadyPending,
    #[error("required fields are empty: {}", field_list(.0))]
    MissingFields(Vec<MeasurementField>),
}

fn field_list(fields: &[MeasurementField]) -> String {
    fields
        .iter()
        .map(|field| field.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Default)]
struct Lifecycle {
    state: SubmissionState,
    attempts: u64,
}

fn lock(lifecycle: &Mutex<Lifecycle>) -> MutexGuard<'_, Lifecycle> {
    lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the submission lifecycle and the prediction service collaborator.
///
/// At most one request is in flight: [`SubmissionController::start`] refuses
/// while the state is `Pending`, and only the returned [`PendingSubmission`]
/// can settle it.
pub struct SubmissionController<P> {
    service: Arc<P>,
    lifecycle: Arc<Mutex<Lifecycle>>,
}

impl<P> SubmissionController<P>
where
    P: PredictionService + 'static,
{
    pub fn new(service: Arc<P>) -> Self {
        Self {
            service,
            lifecycle: Arc::new(Mutex::new(Lifecycle::default())),
        }
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.lifecycle).state.clone()
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.lifecycle).state.is_pending()
    }

    /// Moves the lifecycle to `Pending` and hands back the request to run.
    pub fn start(&self, fields: FieldSet) -> Result<PendingSubmission<P>, SubmitRejection> {
        let mut lifecycle = lock(&self.lifecycle);
        if lifecycle.state.is_pending() {
            return Err(SubmitRejection::AlreadyPending);
        }

        let missing = fields.missing_fields();
        if !missing.is_empty() {
            return Err(SubmitRejection::MissingFields(missing));
        }

        lifecycle.attempts += 1;
        let attempt = lifecycle.attempts;
        lifecycle.state = SubmissionState::Pending { attempt };
        info!(attempt, "prediction submission started");

        Ok(PendingSubmission {
            attempt,
            fields,
            service: Arc::clone(&self.service),
            lifecycle: Arc::clone(&self.lifecycle),
            settled: false,
        })
    }

    /// Starts a submission and waits for it to settle.
    pub async fn submit(&self, fields: FieldSet) -> Result<SubmissionState, SubmitRejection> {
        let pending = self.start(fields)?;
        Ok(pending.complete().await)
    }
}

/// An outbound prediction request that has already moved the lifecycle to
/// `Pending`.
///
/// Dropping it before [`PendingSubmission::complete`] finishes, including
/// cancelling the `complete` future mid-request, settles the attempt as
/// `Failed`.
pub struct PendingSubmission<P> {
    attempt: u64,
    fields: FieldSet,
    service: Arc<P>,
    lifecycle: Arc<Mutex<Lifecycle>>,
    settled: bool,
}

impl<P> PendingSubmission<P>
where
    P: PredictionService + 'static,
{
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Issues the single outbound request and settles the lifecycle.
    pub async fn complete(mut self) -> SubmissionState {
        let fields = std::mem::take(&mut self.fields);
        let outcome = self.service.predict(fields).await;
        self.settled = true;
        settle(&self.lifecycle, self.attempt, outcome)
    }
}

impl<P> Drop for PendingSubmission<P> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut lifecycle = lock(&self.lifecycle);
        if lifecycle.state == (SubmissionState::Pending { attempt: self.attempt }) {
            warn!(attempt = self.attempt, "prediction request abandoned");
            lifecycle.state = SubmissionState::Failed {
                attempt: self.attempt,
            };
        }
    }
}

fn settle(
    lifecycle: &Mutex<Lifecycle>,
    attempt: u64,
    outcome: Result<Verdict, PredictionError>,
) -> SubmissionState {
    let next = match outcome {
        Ok(verdict) => {
            info!(attempt, verdict = %verdict, "prediction settled");
            SubmissionState::Settled(Assessment {
                attempt,
                verdict,
                received_at: Local::now(),
            })
        }
        Err(error) => {
            warn!(attempt, %error, "prediction unavailable");
            SubmissionState::Failed { attempt }
        }
    };

    let mut lifecycle = lock(lifecycle);
    lifecycle.state = next.clone();
    next
}
