//! Shared domain types for the pórtico access-control terminal.
//!
//! This crate is pure data: entity and action enums, access log entries,
//! scan outcomes, the clarification decision model, and the shared
//! validation/error taxonomy. No I/O, no async.

pub mod clarify;
pub mod error;
pub mod log;
pub mod scan;
pub mod toggle;
pub mod types;

pub use clarify::{ClarificationDecision, ClarificationReason};
pub use error::CoreError;
pub use log::AccessLogEntry;
pub use scan::{PersonDetails, ScanOutcome, ScanPayload};
pub use toggle::ToggleState;
pub use types::{normalize_identifier, AccessAction, EntityType, Timestamp};
