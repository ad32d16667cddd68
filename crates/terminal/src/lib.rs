//! Pórtico scan-orchestration terminal.
//!
//! This crate composes the scanning workflow of a turnstile terminal:
//!
//! - [`ScanGuard`] — single-slot guard against double submission.
//! - [`FeedbackPresenter`] — one feedback card per region with a
//!   cancellable dwell/fade lifecycle.
//! - [`ClarificationFlow`] — modal state machine for out-of-hours
//!   personnel.
//! - [`LogBoard`] — combined, time-sorted, filterable view of all
//!   entity-type logs with periodic refresh.
//! - [`ToggleSync`] — polling reconciliation of the shared
//!   "Control de Unidades" flag.
//! - [`ScanOrchestrator`] — ties the above to the gateway and emits
//!   [`ScanEvent`]s for subscribers.
//!
//! The binary entrypoint lives in `main.rs`.

pub mod board;
pub mod clarify;
pub mod config;
pub mod cue;
pub mod events;
pub mod feedback;
pub mod guard;
pub mod orchestrator;
pub mod toggle;

pub use board::LogBoard;
pub use clarify::{ClarificationFlow, FlowSnapshot};
pub use config::{ConfigError, TerminalConfig};
pub use cue::{ConsoleCue, Cue, CuePlayer};
pub use events::{ScanEvent, ScanEvents};
pub use feedback::{FeedbackCard, FeedbackKind, FeedbackPhase, FeedbackPresenter};
pub use guard::{ScanGuard, ScanPermit};
pub use orchestrator::{
    ClarifyError, ScanOrchestrator, ScanRejection, ScanResolution, ScanSubmission,
};
pub use toggle::ToggleSync;
