// src/display.rs
//! Plain-text summaries of backend answers for terminal output.

use crate::status::{ScanStatus, StatusTone};
use crate::types::{AttendanceRecord, EnrollResponse, ScanOutcome, Slot};

/// Distinct subjects in the order they first appear.
pub fn unique_subjects(slots: &[Slot]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for slot in slots {
        if !out.iter().any(|s| s == &slot.subject) {
            out.push(slot.subject.clone());
        }
    }
    out
}

pub fn find_slot<'a>(slots: &'a [Slot], id: &str) -> Option<&'a Slot> {
    slots.iter().find(|s| s.id == id)
}

/// `Math · 9:00 · G1, G2`
pub fn slot_label(slot: &Slot) -> String {
    format!("{} · {} · {}", slot.subject, slot.time, slot.groups.join(", "))
}

pub fn tone_marker(tone: StatusTone) -> char {
    match tone {
        StatusTone::Success => '+',
        StatusTone::Rejected => 'x',
        StatusTone::NoFace | StatusTone::GroupMismatch => '!',
        StatusTone::Neutral => '?',
    }
}

pub fn scan_summary(outcome: &ScanOutcome) -> String {
    if outcome.is_marked() {
        let roll = outcome.roll_no.as_deref().unwrap_or("unknown roll number");
        return format!("Attendance marked for {roll}");
    }
    let reason = outcome
        .status
        .as_ref()
        .map(ScanStatus::to_string)
        .or_else(|| outcome.message.clone())
        .unwrap_or_else(|| "Unknown error".into());
    format!("Scan failed: {reason}")
}

pub fn enroll_summary(res: &EnrollResponse) -> String {
    let verdict = if res.ok { "Enrolled" } else { "Enrollment failed" };
    if res.message.is_empty() {
        verdict.to_string()
    } else {
        format!("{verdict}: {}", res.message)
    }
}

pub fn attendance_table(records: &[AttendanceRecord]) -> String {
    if records.is_empty() {
        return "No attendance records found".into();
    }

    let header = ["Date", "Slot", "Roll No", "Status", "Timestamp"];
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.date.clone(),
                r.slot.clone(),
                r.roll_no.clone(),
                format!("{} {}", tone_marker(r.status.tone()), r.status),
                r.timestamp.clone(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{c:<width$}", width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(&header.map(String::from)[..]));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(rows.iter().map(|r| line(&r[..])));
    out.join("\n")
}
