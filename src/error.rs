// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} rejected: {message}")]
    Rejected { endpoint: &'static str, message: String },

    #[error("missing/invalid {0}")]
    InvalidInput(&'static str),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// True when the backend could not be reached or did not answer with
    /// the expected JSON.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Decode { .. })
    }

    pub fn user_hint(&self) -> String {
        match self {
            ClientError::Transport(_) | ClientError::Decode { .. } => {
                "request failed, check the backend is running".into()
            }
            ClientError::Rejected { message, .. } => message.clone(),
            ClientError::InvalidInput(what) => format!("please enter {what}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}
