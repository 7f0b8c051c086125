//! Metric names and recording helpers
//!
//! Recording is a no-op until a recorder is installed by the host process.

use metrics::{counter, histogram};
use std::time::Duration;

pub const VERIFICATIONS_TOTAL: &str = "whitelist_verifications_total";
pub const REGISTRATIONS_TOTAL: &str = "whitelist_registrations_total";
pub const DOCUMENT_WRITES_TOTAL: &str = "whitelist_document_writes_total";
pub const MERGE_DURATION_SECONDS: &str = "whitelist_merge_duration_seconds";

/// Count a verification by outcome: resolved, unresolved, invalid or error
pub fn record_verification(outcome: &'static str) {
    counter!(VERIFICATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Count a registration by outcome: new, duplicate or failed
pub fn record_registration(outcome: &'static str) {
    counter!(REGISTRATIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_document_write() {
    counter!(DOCUMENT_WRITES_TOTAL).increment(1);
}

/// Time spent inside one serialized merge cycle
pub fn record_merge_duration(elapsed: Duration) {
    histogram!(MERGE_DURATION_SECONDS).record(elapsed.as_secs_f64());
}
