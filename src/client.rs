// src/client.rs
use std::time::Duration;

use reqwest::{header::AUTHORIZATION, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::AdminSession;
use crate::types::*;

pub const LOGIN: &str = "/api/admin/login";
pub const SLOTS: &str = "/api/slots";
pub const SET_SLOT: &str = "/api/admin/set_slot";
pub const ACTIVE_SLOT: &str = "/api/admin/active_slot";
pub const ATTENDANCE: &str = "/api/admin/attendance";
pub const ENROLL: &str = "/api/enroll";
pub const SCAN: &str = "/api/scan";

/// Typed gateway to the attendance backend. Cheap to clone; clones share
/// one connection pool.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: ClientConfig,
}

#[derive(Clone, Copy)]
enum Budget {
    Request,
    Capture,
}

impl GatewayClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // ---------- public routes ---------- //

    /// Returns the backend's answer verbatim; `ok == false` means the
    /// password was wrong.
    pub async fn login(&self, password: &str) -> Result<LoginResponse> {
        if password.is_empty() {
            return Err(ClientError::InvalidInput("password"));
        }
        let req = self.http.post(self.url(LOGIN)).json(&LoginReq { password });
        self.send(LOGIN, req, Budget::Request, false).await
    }

    /// Logs in and turns a successful answer into a session.
    pub async fn authenticate(&self, password: &str) -> Result<AdminSession> {
        let res = self.login(password).await?;
        res.session().ok_or_else(|| {
            warn!("admin login rejected");
            ClientError::Rejected {
                endpoint: LOGIN,
                message: res.message.clone().unwrap_or_else(|| "Invalid password".into()),
            }
        })
    }

    pub async fn slots(&self) -> Result<Vec<Slot>> {
        let req = self.http.get(self.url(SLOTS));
        let res: SlotsResponse = self.send(SLOTS, req, Budget::Request, true).await?;
        Ok(res.slots)
    }

    /// Opens the backend camera and blocks until enrollment finishes.
    pub async fn enroll(&self, roll_no: &str) -> Result<EnrollResponse> {
        let roll_no = required(roll_no, "roll number")?;
        let req = self.http.post(self.url(ENROLL)).json(&EnrollReq { roll_no });
        self.send(ENROLL, req, Budget::Capture, false).await
    }

    /// Opens the backend camera for one match attempt. With an expected
    /// slot the backend checks group membership against that slot instead
    /// of the active one.
    pub async fn scan(&self, expected_slot_id: Option<&str>) -> Result<ScanOutcome> {
        let expected_slot_id = expected_slot_id.map(str::trim).filter(|id| !id.is_empty());
        let req = self.http.post(self.url(SCAN)).json(&ScanReq { expected_slot_id });
        self.send(SCAN, req, Budget::Capture, false).await
    }

    // ---------- admin routes ---------- //

    pub async fn set_active_slot(
        &self,
        slot_id: &str,
        session: &AdminSession,
    ) -> Result<SetSlotResponse> {
        let slot_id = required(slot_id, "slot id")?;
        let req = self
            .http
            .post(self.url(SET_SLOT))
            .header(AUTHORIZATION, session.bearer())
            .json(&SetSlotReq { slot_id });
        self.send(SET_SLOT, req, Budget::Request, false).await
    }

    /// `None` when no slot is currently active.
    pub async fn active_slot(&self, session: &AdminSession) -> Result<Option<Slot>> {
        let req = self.http.get(self.url(ACTIVE_SLOT)).header(AUTHORIZATION, session.bearer());
        let res: ActiveSlotResponse = self.send(ACTIVE_SLOT, req, Budget::Request, true).await?;
        Ok(res.active_slot)
    }

    /// Rows for `subject`, optionally restricted to one date. An empty date
    /// is the same as none.
    pub async fn attendance(
        &self,
        subject: &str,
        date: Option<&str>,
        session: &AdminSession,
    ) -> Result<Vec<AttendanceRecord>> {
        let subject = required(subject, "subject")?;
        let date = date.map(str::trim).filter(|d| !d.is_empty());
        let req = self
            .http
            .get(self.url(ATTENDANCE))
            .header(AUTHORIZATION, session.bearer())
            .query(&AttendanceQuery { subject, date });
        let res: AttendanceResponse = self.send(ATTENDANCE, req, Budget::Request, true).await?;
        Ok(res.rows)
    }

    // ---------- plumbing ---------- //

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn timeout(&self, budget: Budget) -> Option<Duration> {
        match budget {
            Budget::Request => self.config.request_timeout,
            Budget::Capture => self.config.capture_timeout,
        }
    }

    /// `reject_failures` is set for routes whose success body has no `ok`
    /// flag, so `{"ok": false, ...}` must become an error there.
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        req: RequestBuilder,
        budget: Budget,
        reject_failures: bool,
    ) -> Result<T> {
        let req = match self.timeout(budget) {
            Some(t) => req.timeout(t),
            None => req,
        };
        debug!(endpoint, "sending request");
        let res = req.send().await?;
        let status = res.status();
        let body = res.bytes().await?;
        debug!(endpoint, %status, bytes = body.len(), "response received");

        if reject_failures {
            if let Some(message) = failure_message(&body) {
                warn!(endpoint, %status, %message, "backend rejected request");
                return Err(ClientError::Rejected { endpoint, message });
            }
        }
        decode(endpoint, &body)
    }
}

fn required<'a>(value: &'a str, what: &'static str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::InvalidInput(what));
    }
    Ok(value)
}

fn failure_message(body: &[u8]) -> Option<String> {
    let failure: FailureBody = serde_json::from_slice(body).ok()?;
    if failure.ok {
        return None;
    }
    Some(failure.message.unwrap_or_else(|| "request rejected".into()))
}

pub(crate) fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| ClientError::Decode { endpoint, source })
}
