// src/harness.rs
//! End-to-end smoke sequence against a running backend:
//! login → slots → set active slot → active slot → scan → attendance.

use chrono::Local;
use tracing::{info, warn};

use crate::canon::canonical_json;
use crate::client::{self, GatewayClient};
use crate::error::ClientError;
use crate::status::ScanStatus;
use crate::types::ScanOutcome;

pub const DEFAULT_PASSWORD: &str = "adminpass";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Log a canned outcome instead of opening the backend camera.
    Mock,
    #[default]
    Live,
}

#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub password: String,
    pub scan: ScanMode,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self { password: DEFAULT_PASSWORD.into(), scan: ScanMode::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Login,
    Slots,
    SetActiveSlot,
    ActiveSlot,
    Scan,
    Attendance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Completed,
    LoginRejected,
    NoSlots,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct HarnessReport {
    pub steps: Vec<Step>,
    pub verdict: Verdict,
    pub log: Vec<String>,
}

impl HarnessReport {
    pub fn succeeded(&self) -> bool {
        self.verdict == Verdict::Completed
    }
}

pub fn mock_scan_outcome() -> ScanOutcome {
    ScanOutcome {
        ok: true,
        status: Some(ScanStatus::Valid),
        roll_no: Some("102303593".into()),
        distance: Some(0.31),
        message: None,
    }
}

struct Run {
    steps: Vec<Step>,
    log: Vec<String>,
}

impl Run {
    fn log(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        info!(target: "harness", "{msg}");
        self.log.push(format!("[{}] {msg}", Local::now().format("%H:%M:%S")));
    }

    fn done(&mut self, step: Step) {
        self.steps.push(step);
    }
}

/// Only the stock debug password is echoed into the log.
fn shown_password(password: &str) -> &str {
    if password == DEFAULT_PASSWORD {
        password
    } else {
        "<redacted>"
    }
}

pub async fn run_sequence(client: &GatewayClient, opts: &HarnessOptions) -> HarnessReport {
    let mut run = Run { steps: Vec::new(), log: Vec::new() };

    let verdict = match sequence(&mut run, client, opts).await {
        Ok(v) => v,
        Err(e) => {
            warn!("harness aborted: {e}");
            run.log(format!("Error: {e}"));
            Verdict::Failed(e.to_string())
        }
    };

    HarnessReport { steps: run.steps, verdict, log: run.log }
}

async fn sequence(
    run: &mut Run,
    client: &GatewayClient,
    opts: &HarnessOptions,
) -> Result<Verdict, ClientError> {
    run.log("Step 1: Admin Login...");
    let login = client.login(&opts.password).await?;
    run.log(format!(
        "Request: POST {} {{ password: \"{}\" }}",
        client::LOGIN,
        shown_password(&opts.password)
    ));
    run.log(format!("Response: {}", canonical_json(&login)));
    let Some(session) = login.session() else {
        run.log("Login failed");
        return Ok(Verdict::LoginRejected);
    };
    run.log("Login successful");
    run.done(Step::Login);

    run.log("Step 2: Get Slots...");
    let slots = client.slots().await?;
    run.log(format!("Request: GET {}", client::SLOTS));
    run.log(format!("Response: {}", canonical_json(&slots)));
    run.log(format!("Loaded {} slots", slots.len()));
    run.done(Step::Slots);

    let Some(first) = slots.first() else {
        run.log("No slots available");
        return Ok(Verdict::NoSlots);
    };

    run.log("Step 3: Set Active Slot...");
    let set = client.set_active_slot(&first.id, &session).await?;
    run.log(format!("Request: POST {} {{ slot_id: \"{}\" }}", client::SET_SLOT, first.id));
    run.log(format!("Response: {}", canonical_json(&set)));
    run.log(format!("Set active slot: {}", first.subject));
    run.done(Step::SetActiveSlot);

    run.log("Step 4: Get Active Slot...");
    let active = client.active_slot(&session).await?;
    run.log(format!("Request: GET {}", client::ACTIVE_SLOT));
    run.log(format!("Response: {}", canonical_json(&serde_json::json!({ "active_slot": active }))));
    run.log("Active slot retrieved");
    run.done(Step::ActiveSlot);

    match opts.scan {
        ScanMode::Mock => {
            run.log("Step 5: Mock Scan (simulated)...");
            run.log(format!("Mock response: {}", canonical_json(&mock_scan_outcome())));
            run.log("Mock scan successful");
        }
        ScanMode::Live => {
            run.log("Step 5: Real Scan...");
            run.log("This will open the camera on the backend. Waiting...");
            let outcome = client.scan(Some(&first.id)).await?;
            run.log(format!(
                "Request: POST {} {{ expected_slot_id: \"{}\" }}",
                client::SCAN,
                first.id
            ));
            run.log(format!("Response: {}", canonical_json(&outcome)));
            if outcome.ok {
                run.log("Scan successful");
            } else {
                let status = outcome.status.as_ref().map_or("none", ScanStatus::as_str);
                run.log(format!("Scan failed: {status}"));
            }
        }
    }
    run.done(Step::Scan);

    run.log("Step 6: Get Attendance...");
    let rows = client.attendance(&first.subject, None, &session).await?;
    run.log(format!("Request: GET {}?subject={}", client::ATTENDANCE, first.subject));
    run.log(format!("Response: {} records", rows.len()));
    run.log("Attendance retrieved");
    run.done(Step::Attendance);

    session.logout();
    run.log("All tests completed!");
    Ok(Verdict::Completed)
}
