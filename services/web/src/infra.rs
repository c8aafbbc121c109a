use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use diabetes_care::assessment::{AdvisoryCatalog, HttpPredictionClient};
use diabetes_care::config::AppConfig;
use diabetes_care::error::AppError;
use diabetes_care::preferences::{FileStorage, PreferenceStore, SystemThemeHint};
use diabetes_care::session::AssessmentSession;
use tracing::info;

pub(crate) type LiveSession = AssessmentSession<HttpPredictionClient, FileStorage>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the configured collaborators into the live session.
pub(crate) fn build_session(config: &AppConfig) -> Result<LiveSession, AppError> {
    let catalog = AdvisoryCatalog::load(config.advisory_csv.as_deref())?;
    info!(
        entries = catalog.len(),
        source = config
            .advisory_csv
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        "advisory catalog loaded"
    );

    let client = HttpPredictionClient::new(&config.prediction.base_url)?;
    info!(endpoint = %client.endpoint(), "prediction service configured");

    let storage = Arc::new(FileStorage::new(&config.preferences.storage_path));
    let preferences =
        PreferenceStore::load(storage, &SystemThemeHint(config.preferences.system_theme));

    Ok(AssessmentSession::new(
        Arc::new(client),
        Arc::new(catalog),
        preferences,
    ))
}
