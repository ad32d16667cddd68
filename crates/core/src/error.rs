//! Domain-level error taxonomy.

/// Errors raised by domain validation and invariant checks.
///
/// Transport and backend-rejection errors live in the gateway layer;
/// this type only covers failures the terminal catches before any
/// network call is made.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed a local validation rule. No state change, no
    /// network call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An invariant the terminal relies on was broken.
    #[error("Internal error: {0}")]
    Internal(String),
}
