// src/config.rs
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Applies to every call except enroll and scan. `None` waits forever.
    pub request_timeout: Option<Duration>,
    /// Applies to enroll and scan, which hold the backend camera open.
    pub capture_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.into(),
            request_timeout: None,
            capture_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: normalize_base(base_url.into()), ..Self::default() }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = Some(timeout);
        self
    }

    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup("ATTENDANCE_API_BASE") {
            Some(v) if v.trim().is_empty() => {
                return Err(ConfigError::Empty { var: "ATTENDANCE_API_BASE" })
            }
            Some(v) => normalize_base(v),
            None => DEFAULT_API_BASE.into(),
        };

        Ok(Self {
            base_url,
            request_timeout: millis(&lookup, "ATTENDANCE_REQUEST_TIMEOUT_MS")?,
            capture_timeout: millis(&lookup, "ATTENDANCE_CAPTURE_TIMEOUT_MS")?,
        })
    }
}

fn millis<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::InvalidTimeout { var, value: raw })
}

fn normalize_base(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
