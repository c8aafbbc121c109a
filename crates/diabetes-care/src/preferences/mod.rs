//! Persisted light/dark display preference.

mod storage;
mod store;
mod theme;

pub use storage::{FileStorage, MemoryStorage, PreferenceStorage, StorageError};
pub use store::{AmbientThemeSource, PreferenceError, PreferenceStore, SystemThemeHint, THEME_KEY};
pub use theme::{document_theme, DisplayMode};

#[cfg(test)]
pub(crate) use theme::document_theme_guard;
