use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post, put};
use axum::{Extension, Form, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use diabetes_care::assessment::{MeasurementField, PredictionService, UnknownField};
use diabetes_care::error::AppError;
use diabetes_care::preferences::{document_theme, PreferenceStorage};
use diabetes_care::session::{AssessmentSession, SessionView};

use crate::infra::AppState;
use crate::render;

type SharedSession<P, S> = Arc<AssessmentSession<P, S>>;

#[derive(Debug, Deserialize)]
pub(crate) struct FieldUpdate {
    pub(crate) value: String,
}

/// Page, form actions and JSON API for one assessment session.
pub(crate) fn session_router<P, S>(session: SharedSession<P, S>) -> Router
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    Router::new()
        .route("/", get(page_handler::<P, S>))
        .route("/assessment", post(submit_form_handler::<P, S>))
        .route("/advisory/toggle", post(toggle_advisory_handler::<P, S>))
        .route("/theme/toggle", post(toggle_theme_handler::<P, S>))
        .route("/api/v1/session", get(session_endpoint::<P, S>))
        .route("/api/v1/fields/:name", put(update_field_endpoint::<P, S>))
        .route("/api/v1/assessment", post(submit_endpoint::<P, S>))
        .route(
            "/api/v1/advisory/toggle",
            post(toggle_advisory_endpoint::<P, S>),
        )
        .route("/api/v1/theme/toggle", post(toggle_theme_endpoint::<P, S>))
        .with_state(session)
}

pub(crate) fn with_session_routes<P, S>(session: SharedSession<P, S>) -> Router
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    session_router(session)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn page_handler<P, S>(State(session): State<SharedSession<P, S>>) -> Html<String>
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    Html(render::page(&session.view(), document_theme()))
}

/// Applies the posted values, starts the submission and returns to the page,
/// which shows the busy indicator until the request settles.
pub(crate) async fn submit_form_handler<P, S>(
    State(session): State<SharedSession<P, S>>,
    Form(values): Form<HashMap<String, String>>,
) -> Result<Redirect, AppError>
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    if let Some(unknown) = values
        .keys()
        .find(|name| MeasurementField::from_name(name).is_none())
    {
        return Err(UnknownField(unknown.clone()).into());
    }
    for (name, value) in values {
        session.set_field_by_name(&name, value)?;
    }

    match session.start_submission() {
        Ok(pending) => {
            tokio::spawn(pending.complete());
        }
        Err(rejection) => info!(%rejection, "assessment not submitted"),
    }

    Ok(Redirect::to("/"))
}

pub(crate) async fn toggle_advisory_handler<P, S>(
    State(session): State<SharedSession<P, S>>,
) -> Redirect
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    session.toggle_advisory();
    Redirect::to("/")
}

pub(crate) async fn toggle_theme_handler<P, S>(
    State(session): State<SharedSession<P, S>>,
) -> Redirect
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    if let Err(error) = session.toggle_display_mode() {
        warn!(%error, "display mode unchanged");
    }
    Redirect::to("/")
}

pub(crate) async fn session_endpoint<P, S>(
    State(session): State<SharedSession<P, S>>,
) -> Json<SessionView>
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    Json(session.view())
}

pub(crate) async fn update_field_endpoint<P, S>(
    State(session): State<SharedSession<P, S>>,
    Path(name): Path<String>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<SessionView>, AppError>
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    session.set_field_by_name(&name, update.value)?;
    Ok(Json(session.view()))
}

/// Submits the current form and answers once the prediction has settled.
pub(crate) async fn submit_endpoint<P, S>(
    State(session): State<SharedSession<P, S>>,
) -> Result<Json<SessionView>, AppError>
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    session.submit().await?;
    Ok(Json(session.view()))
}

pub(crate) async fn toggle_advisory_endpoint<P, S>(
    State(session): State<SharedSession<P, S>>,
) -> Json<SessionView>
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    session.toggle_advisory();
    Json(session.view())
}

pub(crate) async fn toggle_theme_endpoint<P, S>(
    State(session): State<SharedSession<P, S>>,
) -> Result<Json<SessionView>, AppError>
where
    P: PredictionService + 'static,
    S: PreferenceStorage + 'static,
{
    session.toggle_display_mode()?;
    Ok(Json(session.view()))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
