// src/lib.rs
//! Typed client for the attendance backend: admin login, slot selection,
//! attendance lookup, and student enroll/scan.

pub mod canon;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod harness;
pub mod session;
pub mod status;
pub mod types;

pub use client::GatewayClient;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use session::AdminSession;
pub use status::{ScanStatus, StatusTone};
pub use types::{AttendanceRecord, ScanOutcome, Slot};
