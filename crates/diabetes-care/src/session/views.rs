use chrono::{DateTime, Local};
use serde::Serialize;

use crate::assessment::{
    AdvisoryEntry, AdvisoryPanel, FieldDescriptor, SubmissionState, Verdict, VerdictCategory,
};
use crate::preferences::DisplayMode;

/// Everything the page needs to render one frame of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub display_mode: DisplayMode,
    pub fields: Vec<FieldView>,
    pub submission: SubmissionState,
    /// Submit control is disabled and a busy indicator shown.
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultView>,
    pub advisory: AdvisoryView,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

impl FieldView {
    pub(crate) fn new(descriptor: &FieldDescriptor, value: &str) -> Self {
        Self {
            name: descriptor.name,
            label: descriptor.label,
            placeholder: descriptor.placeholder,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView {
    Verdict {
        verdict: Verdict,
        category: VerdictCategory,
        received_at: DateTime<Local>,
    },
    Unavailable {
        message: &'static str,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryView {
    pub panel: AdvisoryPanel,
    pub entries: Vec<AdvisoryEntry>,
}

impl AdvisoryView {
    /// The "view remedies" control is only offered for positive verdicts.
    pub fn offered(&self) -> bool {
        self.panel != AdvisoryPanel::Unavailable
    }

    pub fn visible(&self) -> bool {
        self.panel == AdvisoryPanel::Expanded
    }
}
