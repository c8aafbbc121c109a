use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::assessment::form::{FieldSet, MeasurementField};
use crate::assessment::prediction::{PredictionError, PredictionService, Verdict};

pub(super) fn complete_fields() -> FieldSet {
    let mut fields = FieldSet::default();
    for (field, value) in MeasurementField::ALL
        .into_iter()
        .zip(["6", "148", "72", "35", "0", "33.6", "0.627", "50"])
    {
        fields.set(field, value);
    }
    fields
}

/// Prediction double that replays queued replies and records every request.
#[derive(Default)]
pub(super) struct ScriptedPrediction {
    replies: Mutex<VecDeque<Result<Verdict, PredictionError>>>,
    requests: Mutex<Vec<FieldSet>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    started: Arc<Notify>,
}

impl ScriptedPrediction {
    pub(super) fn replying(replies: Vec<Result<Verdict, PredictionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Requests block until `gate` is notified once per request.
    pub(super) fn gated(replies: Vec<Result<Verdict, PredictionError>>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::replying(replies)
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn requests(&self) -> Vec<FieldSet> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    pub(super) async fn wait_started(&self) {
        self.started.notified().await;
    }
}

impl PredictionService for ScriptedPrediction {
    fn predict(
        &self,
        fields: FieldSet,
    ) -> impl Future<Output = Result<Verdict, PredictionError>> + Send {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .expect("requests mutex poisoned")
                .push(fields);
            self.started.notify_one();

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            self.replies
                .lock()
                .expect("replies mutex poisoned")
                .pop_front()
                .unwrap_or(Err(PredictionError::MissingVerdict))
        }
    }
}

pub(super) fn verdict(label: &str) -> Result<Verdict, PredictionError> {
    Ok(Verdict::new(label))
}
