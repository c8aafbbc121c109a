use crate::assessment::{CatalogError, SubmitRejection, UnknownField};
use crate::config::ConfigError;
use crate::preferences::PreferenceError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Catalog(CatalogError),
    Endpoint(url::ParseError),
    Preference(PreferenceError),
    Field(UnknownField),
    Rejected(SubmitRejection),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Catalog(err) => write!(f, "advisory catalog error: {}", err),
            AppError::Endpoint(err) => write!(f, "invalid prediction endpoint: {}", err),
            AppError::Preference(err) => write!(f, "preference error: {}", err),
            AppError::Field(err) => write!(f, "form error: {}", err),
            AppError::Rejected(err) => write!(f, "submission rejected: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Endpoint(err) => Some(err),
            AppError::Preference(err) => Some(err),
            AppError::Field(err) => Some(err),
            AppError::Rejected(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Field(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected(SubmitRejection::AlreadyPending) => StatusCode::CONFLICT,
            AppError::Rejected(SubmitRejection::MissingFields(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Catalog(_)
            | AppError::Endpoint(_)
            | AppError::Preference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<url::ParseError> for AppError {
    fn from(value: url::ParseError) -> Self {
        Self::Endpoint(value)
    }
}

impl From<PreferenceError> for AppError {
    fn from(value: PreferenceError) -> Self {
        Self::Preference(value)
    }
}

impl From<UnknownField> for AppError {
    fn from(value: UnknownField) -> Self {
        Self::Field(value)
    }
}

impl From<SubmitRejection> for AppError {
    fn from(value: SubmitRejection) -> Self {
        Self::Rejected(value)
    }
}
