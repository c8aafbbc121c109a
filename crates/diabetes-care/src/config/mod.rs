use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use url::Url;

use crate::preferences::DisplayMode;

const DEFAULT_PREDICTION_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_PREFERENCES_PATH: &str = ".diabetescare/preferences.json";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub prediction: PredictionConfig,
    pub preferences: PreferencesConfig,
    pub advisory_csv: Option<PathBuf>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let raw_url =
            env::var("PREDICTION_API_URL").unwrap_or_else(|_| DEFAULT_PREDICTION_URL.to_string());
        let base_url = parse_base_url(&raw_url)?;

        let storage_path = env::var("APP_PREFERENCES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PREFERENCES_PATH));

        let system_theme = match env::var("APP_SYSTEM_THEME") {
            Ok(value) if !value.trim().is_empty() => Some(
                DisplayMode::parse(&value)
                    .ok_or(ConfigError::InvalidSystemTheme { value })?,
            ),
            _ => None,
        };

        let advisory_csv = env::var("APP_ADVISORY_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            prediction: PredictionConfig { base_url },
            preferences: PreferencesConfig {
                storage_path,
                system_theme,
            },
            advisory_csv,
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
        })
    }
}

/// Parses an absolute base URL, ignoring surrounding whitespace and trailing slashes.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidPredictionUrl {
        value: raw.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidPredictionUrl {
            value: raw.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }

    Ok(url)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Location of the remote classifier.
#[derive(Debug, Clone)]
pub struct PredictionConfig {
    pub base_url: Url,
}

/// Durable storage and ambient signal for the display preference.
#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    pub storage_path: PathBuf,
    pub system_theme: Option<DisplayMode>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidPredictionUrl {
        value: String,
        source: url::ParseError,
    },
    InvalidSystemTheme {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPredictionUrl { value, .. } => {
                write!(f, "PREDICTION_API_URL '{}' is not an absolute URL", value)
            }
            ConfigError::InvalidSystemTheme { value } => {
                write!(f, "APP_SYSTEM_THEME '{}' must be 'dark' or 'light'", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSystemTheme { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPredictionUrl { source, .. } => Some(source),
        }
    }
}
