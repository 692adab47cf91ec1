// tests/common/mod.rs
//
// In-process stand-in for the attendance backend. Routes and failure
// bodies follow the real service; state lives in memory.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use attendance_gateway::{ClientConfig, GatewayClient};
use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const ADMIN_PASSWORD: &str = "adminpass";

#[derive(Debug, Clone)]
pub struct Seen {
    pub path: &'static str,
    pub authorization: Option<String>,
    pub body: Option<Value>,
    pub query: HashMap<String, String>,
}

#[derive(Default)]
pub struct Backend {
    pub slots: Vec<Value>,
    /// Token handed out on login; random when unset.
    pub fixed_token: Option<String>,
    pub sessions: HashSet<String>,
    pub active: Option<Value>,
    /// subject -> rows
    pub attendance: HashMap<String, Vec<Value>>,
    pub scan_outcome: Option<Value>,
    pub scan_delay: Option<Duration>,
    /// path -> body served verbatim instead of the normal answer
    pub raw_bodies: HashMap<&'static str, &'static str>,
    pub seen: Vec<Seen>,
}

pub type Shared = Arc<Mutex<Backend>>;

pub struct TestBackend {
    pub base_url: String,
    pub state: Shared,
}

impl TestBackend {
    pub fn client(&self) -> GatewayClient {
        GatewayClient::new(ClientConfig::new(&self.base_url)).unwrap()
    }

    pub fn client_with(&self, f: impl FnOnce(ClientConfig) -> ClientConfig) -> GatewayClient {
        GatewayClient::new(f(ClientConfig::new(&self.base_url))).unwrap()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.lock().unwrap().seen.clone()
    }

    pub fn seen_at(&self, path: &str) -> Vec<Seen> {
        self.seen().into_iter().filter(|s| s.path == path).collect()
    }
}

pub fn math_slots() -> Vec<Value> {
    vec![
        json!({ "id": "s1", "subject": "Math", "time": "9:00", "groups": ["G1", "G2"] }),
        json!({ "id": "s2", "subject": "Physics", "time": "11:00", "groups": ["G3"] }),
        json!({ "id": "s3", "subject": "Math", "time": "14:00", "groups": ["G3"] }),
    ]
}

pub fn row(date: &str, roll_no: &str, status: &str) -> Value {
    json!({
        "date": date,
        "slot": "9:00",
        "roll_no": roll_no,
        "status": status,
        "timestamp": format!("{date}T09:01:12")
    })
}

pub async fn spawn(backend: Backend) -> TestBackend {
    let state: Shared = Arc::new(Mutex::new(backend));

    let app = Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/slots", get(slots))
        .route("/api/admin/set_slot", post(set_slot))
        .route("/api/admin/active_slot", get(active_slot))
        .route("/api/admin/attendance", get(attendance))
        .route("/api/enroll", post(enroll))
        .route("/api/scan", post(scan))
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend { base_url: format!("http://127.0.0.1:{port}"), state }
}

/// Base URL where nothing is listening.
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// ---------- handlers ---------- //

fn fail(code: StatusCode, message: &str) -> Response {
    (code, Json(json!({ "ok": false, "message": message }))).into_response()
}

fn record(
    st: &mut Backend,
    path: &'static str,
    headers: &HeaderMap,
    body: Option<Value>,
    query: HashMap<String, String>,
) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    st.seen.push(Seen { path, authorization, body, query });
}

fn authorized(st: &Backend, headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| st.sessions.contains(token))
}

fn raw(st: &Backend, path: &str) -> Option<Response> {
    st.raw_bodies.get(path).map(|body| (StatusCode::OK, *body).into_response())
}

fn find_slot(st: &Backend, id: &str) -> Option<Value> {
    st.slots.iter().find(|s| s["id"] == id).cloned()
}

async fn login(State(st): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut st = st.lock().unwrap();
    record(&mut st, "/api/admin/login", &headers, Some(body.clone()), HashMap::new());
    if body["password"] != ADMIN_PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "Invalid password");
    }
    let token = st
        .fixed_token
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    st.sessions.insert(token.clone());
    Json(json!({ "ok": true, "token": token })).into_response()
}

async fn slots(State(st): State<Shared>, headers: HeaderMap) -> Response {
    let mut st = st.lock().unwrap();
    record(&mut st, "/api/slots", &headers, None, HashMap::new());
    if let Some(res) = raw(&st, "/api/slots") {
        return res;
    }
    Json(json!({ "slots": st.slots })).into_response()
}

async fn set_slot(State(st): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut st = st.lock().unwrap();
    record(&mut st, "/api/admin/set_slot", &headers, Some(body.clone()), HashMap::new());
    if !authorized(&st, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let Some(slot) = body["slot_id"].as_str().and_then(|id| find_slot(&st, id)) else {
        return fail(StatusCode::NOT_FOUND, "Slot not found");
    };
    st.active = Some(slot.clone());
    Json(json!({ "ok": true, "message": "Active slot set", "active": slot })).into_response()
}

async fn active_slot(State(st): State<Shared>, headers: HeaderMap) -> Response {
    let mut st = st.lock().unwrap();
    record(&mut st, "/api/admin/active_slot", &headers, None, HashMap::new());
    if !authorized(&st, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if let Some(res) = raw(&st, "/api/admin/active_slot") {
        return res;
    }
    Json(json!({ "active_slot": st.active })).into_response()
}

async fn attendance(
    State(st): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut st = st.lock().unwrap();
    record(&mut st, "/api/admin/attendance", &headers, None, query.clone());
    if !authorized(&st, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if let Some(res) = raw(&st, "/api/admin/attendance") {
        return res;
    }
    let Some(subject) = query.get("subject").filter(|s| !s.is_empty()) else {
        return fail(StatusCode::BAD_REQUEST, "subject query param required");
    };
    let date = query.get("date");
    let rows: Vec<Value> = st
        .attendance
        .get(subject)
        .map(|rows| {
            rows.iter()
                .filter(|r| date.map_or(true, |d| r["date"] == d.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(json!({ "subject": subject, "rows": rows })).into_response()
}

async fn enroll(State(st): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut st = st.lock().unwrap();
    record(&mut st, "/api/enroll", &headers, Some(body.clone()), HashMap::new());
    let Some(roll_no) = body["roll_no"].as_str().filter(|r| !r.is_empty()) else {
        return fail(StatusCode::BAD_REQUEST, "roll_no required");
    };
    Json(json!({ "ok": true, "message": format!("Enrolled {roll_no}"), "roll_no": roll_no }))
        .into_response()
}

async fn scan(State(st): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let (delay, response) = {
        let mut st = st.lock().unwrap();
        record(&mut st, "/api/scan", &headers, Some(body.clone()), HashMap::new());
        let slot = match body["expected_slot_id"].as_str() {
            Some(id) => find_slot(&st, id),
            None => st.active.clone(),
        };
        let response = match slot {
            None => fail(StatusCode::BAD_REQUEST, "No active slot"),
            Some(_) => {
                let outcome = st
                    .scan_outcome
                    .clone()
                    .unwrap_or_else(|| json!({ "ok": false, "status": "NO_FACE" }));
                Json(outcome).into_response()
            }
        };
        (st.scan_delay, response)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    response
}
