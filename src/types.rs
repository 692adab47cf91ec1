// src/types.rs
use serde::{Deserialize, Serialize};

use crate::session::AdminSession;
use crate::status::ScanStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub subject: String,
    pub time: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: String,
    pub slot: String,
    pub roll_no: String,
    pub status: ScanStatus,
    pub timestamp: String,
}

// ---------- requests ---------- //

#[derive(Serialize)]
pub struct LoginReq<'a> { pub password: &'a str }

#[derive(Serialize)]
pub struct SetSlotReq<'a> { pub slot_id: &'a str }

#[derive(Serialize)]
pub struct EnrollReq<'a> { pub roll_no: &'a str }

#[derive(Serialize)]
pub struct ScanReq<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_slot_id: Option<&'a str>,
}

#[derive(Serialize)]
pub struct AttendanceQuery<'a> {
    pub subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<&'a str>,
}

// ---------- responses ---------- //

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse { pub slots: Vec<Slot> }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSlotResponse {
    pub ok: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<Slot>,
}

/// `active_slot` must be present; `null` means no slot is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSlotResponse {
    #[serde(deserialize_with = "Option::deserialize")]
    pub active_slot: Option<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    #[serde(default)]
    pub subject: String,
    pub rows: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollResponse {
    pub ok: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScanStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    /// A session only when the backend says `ok` and hands out a non-empty token.
    pub fn session(&self) -> Option<AdminSession> {
        match self.token.as_deref() {
            Some(token) if self.ok && !token.is_empty() => Some(AdminSession::new(token)),
            _ => None,
        }
    }
}

impl ScanOutcome {
    /// Attendance was marked: the backend says `ok` and the match is `VALID`.
    pub fn is_marked(&self) -> bool {
        self.ok && self.status.as_ref().is_some_and(ScanStatus::is_valid)
    }
}

/// Failure body the backend returns from any route, e.g. `{"ok": false, "message": "Unauthorized"}`.
#[derive(Debug, Deserialize)]
pub(crate) struct FailureBody {
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}
