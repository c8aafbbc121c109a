use std::fmt;
use std::future::Future;

use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::form::FieldSet;

/// Label the prediction service returns for an at-risk assessment.
pub const POSITIVE_LABEL: &str = "Diabetic";

/// Classification string returned by the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verdict(String);

impl Verdict {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact match against [`POSITIVE_LABEL`]; every other label is negative.
    pub fn category(&self) -> VerdictCategory {
        if self.0 == POSITIVE_LABEL {
            VerdictCategory::Positive
        } else {
            VerdictCategory::Negative
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictCategory {
    Positive,
    Negative,
}

impl VerdictCategory {
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }
}

/// Remote classifier consulted once per submission.
pub trait PredictionService: Send + Sync {
    fn predict(
        &self,
        fields: FieldSet,
    ) -> impl Future<Output = Result<Verdict, PredictionError>> + Send;
}

/// Reasons a prediction could not be obtained. Only used for logging; callers
/// collapse every variant into a single failed state.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction service answered with status {0}")]
    Status(StatusCode),
    #[error("prediction response was not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("prediction response did not contain a verdict")]
    MissingVerdict,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    prediction: Option<String>,
}

/// Parses a prediction response body.
///
/// Bodies that are valid JSON but carry no usable `prediction` string (the
/// service reports input errors as `{"error": ...}`) are treated as missing.
pub fn parse_prediction_body(body: &[u8]) -> Result<Verdict, PredictionError> {
    let response: PredictionResponse = serde_json::from_slice(body)?;
    match response.prediction {
        Some(label) if !label.is_empty() => Ok(Verdict::new(label)),
        _ => Err(PredictionError::MissingVerdict),
    }
}

/// HTTP client for `POST {base}/predict`.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    pub fn new(base_url: &Url) -> Result<Self, url::ParseError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Result<Self, url::ParseError> {
        let base = base_url.as_str().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/predict"))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl PredictionService for HttpPredictionClient {
    fn predict(
        &self,
        fields: FieldSet,
    ) -> impl Future<Output = Result<Verdict, PredictionError>> + Send {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        async move {
            debug!(%endpoint, "sending prediction request");
            let response = http.post(endpoint).json(&fields).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(PredictionError::Status(status));
            }

            let body = response.bytes().await?;
            parse_prediction_body(&body)
        }
    }
}
