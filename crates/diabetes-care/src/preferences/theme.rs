use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Light or dark presentation of the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Reads a persisted value. Anything other than `"dark"` means light.
    pub fn from_persisted(value: &str) -> Self {
        if value == "dark" {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Strict parse used for configuration input.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Process-wide display-mode attribute read by the styling layer.
static DOCUMENT_DARK: AtomicBool = AtomicBool::new(false);

/// Current value of the process-wide display-mode attribute.
pub fn document_theme() -> DisplayMode {
    if DOCUMENT_DARK.load(Ordering::Acquire) {
        DisplayMode::Dark
    } else {
        DisplayMode::Light
    }
}

pub(crate) fn apply_document_theme(mode: DisplayMode) {
    DOCUMENT_DARK.store(mode.is_dark(), Ordering::Release);
}

/// Serializes tests that observe the process-wide attribute.
#[cfg(test)]
pub(crate) fn document_theme_guard() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock, PoisonError};

    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}
