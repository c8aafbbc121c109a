//! Assessment workflow: form input, the submission lifecycle against the
//! remote classifier, and presentation of the resulting verdict.

pub mod catalog;
pub mod controller;
pub mod form;
pub mod prediction;
pub mod presenter;

#[cfg(test)]
mod tests;

pub use catalog::{AdvisoryCatalog, AdvisoryEntry, CatalogError};
pub use controller::{
    Assessment, PendingSubmission, SubmissionController, SubmissionState, SubmitRejection,
};
pub use form::{
    AssessmentForm, FieldDescriptor, FieldSet, MeasurementField, UnknownField, FIELD_DESCRIPTORS,
};
pub use prediction::{
    HttpPredictionClient, PredictionError, PredictionService, Verdict, VerdictCategory,
    POSITIVE_LABEL,
};
pub use presenter::{AdvisoryPanel, ResultPresenter, FAILURE_MESSAGE};
