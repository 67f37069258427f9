//! Top-level triage report, emitted once per email (§3).

use serde::Serialize;

use crate::headers::HeaderReport;
use crate::payload::PayloadReport;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TriageReport {
    pub headers: HeaderReport,
    pub attachments: Vec<PayloadReport>,
    pub indicators: u32,
}
