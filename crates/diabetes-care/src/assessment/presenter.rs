use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::catalog::{AdvisoryCatalog, AdvisoryEntry};
use super::controller::SubmissionState;
use super::prediction::VerdictCategory;

/// Message shown in the result area whenever a prediction could not be obtained.
pub const FAILURE_MESSAGE: &str = "Prediction unavailable. Please try again.";

/// State of the advisory panel for the verdict currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryPanel {
    /// Negative verdicts never offer advisory content.
    Unavailable,
    Collapsed,
    Expanded,
}

impl AdvisoryPanel {
    fn for_category(category: VerdictCategory) -> Self {
        if category.is_positive() {
            Self::Collapsed
        } else {
            Self::Unavailable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PresentedVerdict {
    attempt: u64,
    category: VerdictCategory,
    advisory: AdvisoryPanel,
}

/// Derives result styling and advisory visibility from the submission state.
#[derive(Debug, Clone)]
pub struct ResultPresenter {
    catalog: Arc<AdvisoryCatalog>,
    current: Option<PresentedVerdict>,
}

impl ResultPresenter {
    pub fn new(catalog: Arc<AdvisoryCatalog>) -> Self {
        Self {
            catalog,
            current: None,
        }
    }

    /// Brings the presenter in line with the latest submission state.
    ///
    /// A verdict from a new attempt always starts with the advisory collapsed;
    /// observing the same attempt again keeps the user's choice.
    pub fn observe(&mut self, state: &SubmissionState) {
        self.current = match state.assessment() {
            Some(assessment) => match self.current {
                Some(current) if current.attempt == assessment.attempt => Some(current),
                _ => {
                    let category = assessment.verdict.category();
                    Some(PresentedVerdict {
                        attempt: assessment.attempt,
                        category,
                        advisory: AdvisoryPanel::for_category(category),
                    })
                }
            },
            None => None,
        };
    }

    pub fn current_verdict_category(&self) -> Option<VerdictCategory> {
        self.current.map(|current| current.category)
    }

    pub fn advisory_panel(&self) -> AdvisoryPanel {
        self.current
            .map(|current| current.advisory)
            .unwrap_or(AdvisoryPanel::Unavailable)
    }

    pub fn advisory_available(&self) -> bool {
        self.advisory_panel() != AdvisoryPanel::Unavailable
    }

    pub fn advisory_visible(&self) -> bool {
        self.advisory_panel() == AdvisoryPanel::Expanded
    }

    /// Flips advisory visibility for a positive verdict; otherwise does nothing.
    /// Returns whether the advisory is visible afterwards.
    pub fn toggle_advisory(&mut self) -> bool {
        if let Some(current) = self.current.as_mut() {
            current.advisory = match current.advisory {
                AdvisoryPanel::Collapsed => AdvisoryPanel::Expanded,
                AdvisoryPanel::Expanded => AdvisoryPanel::Collapsed,
                AdvisoryPanel::Unavailable => AdvisoryPanel::Unavailable,
            };
            debug!(attempt = current.attempt, advisory = ?current.advisory, "advisory toggled");
        }
        self.advisory_visible()
    }

    pub fn advisory_entries(&self) -> &[AdvisoryEntry] {
        if self.advisory_visible() {
            self.catalog.entries()
        } else {
            &[]
        }
    }

    pub fn failure_message(state: &SubmissionState) -> Option<&'static str> {
        match state {
            SubmissionState::Failed { .. } => Some(FAILURE_MESSAGE),
            _ => None,
        }
    }
}
