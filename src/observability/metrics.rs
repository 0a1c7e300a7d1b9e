//! Anchor metrics.
//!
//! # Metrics
//! - `anchor_submissions_total` (counter): submissions by outcome
//!   (`sent`, `rejected`, `failed`, `not_connected`)
//! - `anchor_node_connected` (gauge): 1=connected, 0=disconnected,
//!   recorded at construction

use metrics::{counter, gauge};

/// Outcome label for a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Sent,
    Rejected,
    Failed,
    NotConnected,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Sent => "sent",
            SubmissionOutcome::Rejected => "rejected",
            SubmissionOutcome::Failed => "failed",
            SubmissionOutcome::NotConnected => "not_connected",
        }
    }
}

/// Record the outcome of one `submit_anchor` call.
pub fn record_submission(outcome: SubmissionOutcome) {
    counter!("anchor_submissions_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record node connectivity for an endpoint.
pub fn record_node_connected(endpoint: &str, connected: bool) {
    gauge!("anchor_node_connected", "endpoint" => endpoint.to_string())
        .set(if connected { 1.0 } else { 0.0 });
}
