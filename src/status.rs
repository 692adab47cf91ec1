// src/status.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a biometric match, as reported in scan results and
/// attendance rows. Values the backend sends that are not listed here are
/// kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanStatus {
    Valid,
    FaceMismatch,
    Invalid,
    NoFace,
    NotInActiveGroup,
    NotEnrolled,
    NoGroup,
    Unknown(String),
}

/// Display category for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Rejected,
    NoFace,
    GroupMismatch,
    Neutral,
}

impl ScanStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ScanStatus::Valid => "VALID",
            ScanStatus::FaceMismatch => "FACE_MISMATCH",
            ScanStatus::Invalid => "INVALID",
            ScanStatus::NoFace => "NO_FACE",
            ScanStatus::NotInActiveGroup => "NOT_IN_ACTIVE_GROUP",
            ScanStatus::NotEnrolled => "NOT_ENROLLED",
            ScanStatus::NoGroup => "NO_GROUP",
            ScanStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ScanStatus::Valid)
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            ScanStatus::Valid => StatusTone::Success,
            ScanStatus::FaceMismatch | ScanStatus::Invalid => StatusTone::Rejected,
            ScanStatus::NoFace => StatusTone::NoFace,
            ScanStatus::NotInActiveGroup => StatusTone::GroupMismatch,
            ScanStatus::NotEnrolled | ScanStatus::NoGroup | ScanStatus::Unknown(_) => {
                StatusTone::Neutral
            }
        }
    }
}

impl From<&str> for ScanStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "VALID" => ScanStatus::Valid,
            "FACE_MISMATCH" => ScanStatus::FaceMismatch,
            "INVALID" => ScanStatus::Invalid,
            "NO_FACE" => ScanStatus::NoFace,
            "NOT_IN_ACTIVE_GROUP" => ScanStatus::NotInActiveGroup,
            "NOT_ENROLLED" => ScanStatus::NotEnrolled,
            "NO_GROUP" => ScanStatus::NoGroup,
            other => ScanStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ScanStatus {
    fn from(raw: String) -> Self {
        match ScanStatus::from(raw.as_str()) {
            ScanStatus::Unknown(_) => ScanStatus::Unknown(raw),
            known => known,
        }
    }
}

impl From<ScanStatus> for String {
    fn from(status: ScanStatus) -> Self {
        match status {
            ScanStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
