use std::sync::Arc;

use tracing::{info, warn};

use super::storage::{PreferenceStorage, StorageError};
use super::theme::{apply_document_theme, DisplayMode};

/// Storage key holding the persisted display mode.
pub const THEME_KEY: &str = "diabetesAppTheme";

/// Host signal for a system-wide dark-mode preference.
pub trait AmbientThemeSource {
    /// `None` when the host does not expose a preference.
    fn prefers_dark(&self) -> Option<bool>;
}

/// Ambient preference fixed at startup, typically from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemThemeHint(pub Option<DisplayMode>);

impl AmbientThemeSource for SystemThemeHint {
    fn prefers_dark(&self) -> Option<bool> {
        self.0.map(DisplayMode::is_dark)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("could not persist display mode '{attempted}': {source}")]
pub struct PreferenceError {
    pub attempted: DisplayMode,
    #[source]
    pub source: StorageError,
}

/// Owns the display mode and keeps storage and the document attribute in step.
pub struct PreferenceStore<S> {
    storage: Arc<S>,
    mode: DisplayMode,
}

impl<S> PreferenceStore<S>
where
    S: PreferenceStorage,
{
    /// Resolves the starting mode: persisted choice, then the ambient signal,
    /// then light. The result is applied to the document attribute.
    pub fn load(storage: Arc<S>, ambient: &impl AmbientThemeSource) -> Self {
        let persisted = match storage.get(THEME_KEY) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, "ignoring unreadable display preference");
                None
            }
        };

        // an empty stored value counts as no choice at all
        let persisted = persisted.filter(|value| !value.is_empty());
        let mode = match persisted.as_deref() {
            Some(value) => DisplayMode::from_persisted(value),
            None => match ambient.prefers_dark() {
                Some(true) => DisplayMode::Dark,
                Some(false) | None => DisplayMode::Light,
            },
        };

        info!(%mode, persisted = persisted.is_some(), "display mode loaded");
        apply_document_theme(mode);
        Self { storage, mode }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Flips the mode after persisting it. On a storage failure the current
    /// mode is kept and the error returned.
    pub fn toggle(&mut self) -> Result<DisplayMode, PreferenceError> {
        let next = self.mode.toggled();
        self.storage
            .set(THEME_KEY, next.as_str())
            .map_err(|source| PreferenceError {
                attempted: next,
                source,
            })?;

        self.mode = next;
        apply_document_theme(next);
        info!(mode = %next, "display mode toggled");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::storage::MemoryStorage;
    use crate::preferences::theme::{document_theme, document_theme_guard};
    use std::io;
    use std::path::PathBuf;

    struct BrokenStorage;

    fn denied() -> StorageError {
        StorageError::Io {
            path: PathBuf::from("prefs.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
    }

    impl PreferenceStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(denied())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(denied())
        }
    }

    #[test]
    fn persisted_value_wins_over_ambient() {
        let _lock = document_theme_guard();
        let storage = Arc::new(MemoryStorage::with_value(THEME_KEY, "light"));
        let store = PreferenceStore::load(storage, &SystemThemeHint(Some(DisplayMode::Dark)));
        assert_eq!(store.mode(), DisplayMode::Light);
    }

    #[test]
    fn ambient_dark_applies_without_persisted_value() {
        let _lock = document_theme_guard();
        let storage = Arc::new(MemoryStorage::default());
        let store = PreferenceStore::load(storage, &SystemThemeHint(Some(DisplayMode::Dark)));
        assert_eq!(store.mode(), DisplayMode::Dark);
        assert_eq!(document_theme(), DisplayMode::Dark);
    }

    #[test]
    fn empty_persisted_value_defers_to_ambient() {
        let _lock = document_theme_guard();
        let storage = Arc::new(MemoryStorage::with_value(THEME_KEY, ""));
        let store = PreferenceStore::load(storage, &SystemThemeHint(Some(DisplayMode::Dark)));
        assert_eq!(store.mode(), DisplayMode::Dark);
        assert_eq!(document_theme(), DisplayMode::Dark);
    }

    #[test]
    fn defaults_to_light_without_any_signal() {
        let _lock = document_theme_guard();
        let storage = Arc::new(MemoryStorage::default());
        let store = PreferenceStore::load(storage, &SystemThemeHint(None));
        assert_eq!(store.mode(), DisplayMode::Light);
        assert_eq!(document_theme(), DisplayMode::Light);
    }

    #[test]
    fn toggle_persists_and_survives_reload() {
        let _lock = document_theme_guard();
        let storage = Arc::new(MemoryStorage::default());
        let ambient = SystemThemeHint(Some(DisplayMode::Dark));

        let mut store = PreferenceStore::load(storage.clone(), &ambient);
        assert_eq!(store.mode(), DisplayMode::Dark);

        assert_eq!(store.toggle().expect("persists"), DisplayMode::Light);
        assert_eq!(
            storage.get(THEME_KEY).expect("readable").as_deref(),
            Some("light")
        );
        assert_eq!(document_theme(), DisplayMode::Light);

        let reloaded = PreferenceStore::load(storage, &ambient);
        assert_eq!(reloaded.mode(), DisplayMode::Light);
    }

    #[test]
    fn unreadable_storage_falls_back_and_failed_writes_keep_mode() {
        let _lock = document_theme_guard();
        let mut store = PreferenceStore::load(
            Arc::new(BrokenStorage),
            &SystemThemeHint(Some(DisplayMode::Dark)),
        );
        assert_eq!(store.mode(), DisplayMode::Dark);

        let error = store.toggle().expect_err("write fails");
        assert_eq!(error.attempted, DisplayMode::Light);
        assert_eq!(store.mode(), DisplayMode::Dark);
        assert_eq!(document_theme(), DisplayMode::Dark);
    }
}
