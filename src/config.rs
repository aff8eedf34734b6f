//! Runtime configuration resolved from flags, environment and `.env`.
//!
//! Precedence is the usual one: command-line flags, then `TASKRANK_*`
//! environment variables (a `.env` file in the working directory is loaded
//! into the environment at startup), then built-in defaults.

use std::path::PathBuf;

use reqwest::Url;

/// Default base URL of the prioritization service.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000/api/tasks/";

/// Strategy used when none is selected.
pub const DEFAULT_STRATEGY: &str = "smart_balance";

/// Where interactions with the service come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceMode {
    /// Talk to the live service.
    Live,
    /// Talk to the live service and write a cassette to this path.
    Record(PathBuf),
    /// Serve responses from the cassette at this path.
    Replay(PathBuf),
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the prioritization service.
    pub service_url: Url,
    /// How the service port is wired.
    pub mode: ServiceMode,
}

impl Config {
    /// Validates raw settings into a config.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse, is not http(s), or both a
    /// record and a replay cassette are requested.
    pub fn new(
        service_url: &str,
        record: Option<PathBuf>,
        replay: Option<PathBuf>,
    ) -> Result<Self, String> {
        let service_url = Url::parse(service_url)
            .map_err(|e| format!("Invalid service URL {service_url:?}: {e}"))?;
        if !matches!(service_url.scheme(), "http" | "https") {
            return Err(format!("Service URL must be http or https, got {service_url}"));
        }
        let mode = match (record, replay) {
            (Some(_), Some(_)) => {
                return Err("Cannot record and replay a cassette at the same time".to_string())
            }
            (Some(path), None) => ServiceMode::Record(path),
            (None, Some(path)) => ServiceMode::Replay(path),
            (None, None) => ServiceMode::Live,
        };
        Ok(Self { service_url, mode })
    }
}

/// Loads `.env` from the working directory into the environment, if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(%err, "ignoring unreadable .env"),
    }
}
