//! Structured log events for verification and registration

use crate::{error::Error, identity::Identity};
use tracing::{error, info, warn};

/// Log a resolved identity
pub fn log_verification_succeeded(requested: &str, identity: &Identity) {
    info!(
        requested = %requested,
        canonical = %identity.name,
        external_id = %identity.id,
        "Identity verified"
    );
}

/// Log a verification failure
pub fn log_verification_failed(requested: &str, err: &Error) {
    if err.is_client_error() {
        info!(
            requested = %requested,
            code = err.error_code(),
            error = %err,
            "Identity rejected"
        );
    } else {
        warn!(
            requested = %requested,
            code = err.error_code(),
            error = %err,
            "Identity verification failed"
        );
    }
}

/// Log the outcome of a merge cycle
pub fn log_registration_completed(canonical: &str, is_new: bool, total_count: usize) {
    info!(
        canonical = %canonical,
        is_new = is_new,
        total_count = total_count,
        "Registration completed"
    );
}

/// Log a registration that failed after verification
pub fn log_registration_failed(canonical: &str, err: &Error) {
    error!(
        canonical = %canonical,
        code = err.error_code(),
        retryable = err.is_retryable(),
        error = %err,
        "Registration failed, document left unchanged"
    );
}

/// Log a successful document replace
pub fn log_document_persisted(entries: usize, bytes: usize) {
    info!(entries = entries, bytes = bytes, "Whitelist document persisted");
}
