//! Clarification sub-flow for out-of-hours personnel.
//!
//! A short-lived modal state machine: `Closed → Open → Submitting →
//! Closed`, with a failed submission returning to `Open` carrying an
//! inline error and preserving the text the operator already entered.
//! The flow owns its [`PersonDetails`] transiently; they are discarded
//! when the flow closes, resolved or cancelled.

use std::sync::Mutex;

use portico_core::{
    ClarificationDecision, ClarificationReason, CoreError, PersonDetails,
};

/// Modal state machine for one terminal screen.
#[derive(Debug, Default)]
pub struct ClarificationFlow {
    state: Mutex<FlowState>,
}

#[derive(Debug, Default)]
enum FlowState {
    #[default]
    Closed,
    Open {
        person: PersonDetails,
        reason: ClarificationReason,
        details: String,
        error: Option<String>,
    },
    Submitting {
        person: PersonDetails,
        reason: ClarificationReason,
        details: String,
    },
}

/// Read-only view of the flow for rendering.
#[derive(Debug, Clone)]
pub struct FlowSnapshot {
    pub person: PersonDetails,
    pub reason: ClarificationReason,
    pub details: String,
    /// Inline error from a rejected or failed submission.
    pub error: Option<String>,
    pub submitting: bool,
}

impl ClarificationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the modal for a person the backend could not classify.
    ///
    /// The reason selector defaults to the most likely reason given
    /// residency status.
    pub fn open(&self, person: PersonDetails) {
        let reason = ClarificationReason::default_for(person.is_resident);
        tracing::info!(
            person_id = person.id,
            name = %person.name,
            default_reason = reason.as_str(),
            "Clarification flow opened",
        );
        *self.lock() = FlowState::Open {
            person,
            reason,
            details: String::new(),
            error: None,
        };
    }

    /// Whether the modal is open (including mid-submission).
    pub fn is_open(&self) -> bool {
        !matches!(*self.lock(), FlowState::Closed)
    }

    /// Change the selected reason. No-op unless the flow is open.
    pub fn set_reason(&self, next: ClarificationReason) {
        if let FlowState::Open { reason, error, .. } = &mut *self.lock() {
            *reason = next;
            *error = None;
        }
    }

    /// Replace the free-text detail field. No-op unless the flow is open.
    pub fn set_details(&self, text: impl Into<String>) {
        if let FlowState::Open { details, .. } = &mut *self.lock() {
            *details = text.into();
        }
    }

    /// Current state for rendering, or `None` when closed.
    pub fn snapshot(&self) -> Option<FlowSnapshot> {
        match &*self.lock() {
            FlowState::Closed => None,
            FlowState::Open {
                person,
                reason,
                details,
                error,
            } => Some(FlowSnapshot {
                person: person.clone(),
                reason: *reason,
                details: details.clone(),
                error: error.clone(),
                submitting: false,
            }),
            FlowState::Submitting {
                person,
                reason,
                details,
            } => Some(FlowSnapshot {
                person: person.clone(),
                reason: *reason,
                details: details.clone(),
                error: None,
                submitting: true,
            }),
        }
    }

    /// Validate the operator's input and move `Open → Submitting`.
    ///
    /// A decision that fails validation (`otros` with blank details)
    /// never reaches the network layer: the flow stays open with the
    /// error surfaced inline and the entered text intact.
    pub fn begin_submit(&self) -> Result<ClarificationDecision, CoreError> {
        let mut state = self.lock();
        match std::mem::take(&mut *state) {
            FlowState::Open {
                person,
                reason,
                details,
                ..
            } => {
                let decision = ClarificationDecision {
                    person_id: person.id,
                    reason,
                    details: if details.trim().is_empty() {
                        None
                    } else {
                        Some(details.clone())
                    },
                };

                if let Err(e) = decision.validate() {
                    *state = FlowState::Open {
                        person,
                        reason,
                        details,
                        error: Some(e.to_string()),
                    };
                    return Err(e);
                }

                *state = FlowState::Submitting {
                    person,
                    reason,
                    details,
                };
                Ok(decision)
            }
            other => {
                *state = other;
                Err(CoreError::Validation(
                    "No clarification is pending".to_string(),
                ))
            }
        }
    }

    /// Gateway failure: return to `Open`, surface the error inline,
    /// keep the already-entered detail text.
    pub fn fail_submit(&self, message: impl Into<String>) {
        let mut state = self.lock();
        if let FlowState::Submitting {
            person,
            reason,
            details,
        } = std::mem::take(&mut *state)
        {
            *state = FlowState::Open {
                person,
                reason,
                details,
                error: Some(message.into()),
            };
        }
    }

    /// Gateway success: close the flow and hand back the person for the
    /// merged feedback payload.
    pub fn complete(&self) -> Option<PersonDetails> {
        let mut state = self.lock();
        match std::mem::take(&mut *state) {
            FlowState::Submitting { person, .. } => {
                tracing::info!(person_id = person.id, "Clarification resolved");
                Some(person)
            }
            other => {
                *state = other;
                None
            }
        }
    }

    /// Operator cancelled: close without any compensating call. The
    /// physical entry stays exactly as the backend recorded it.
    pub fn cancel(&self) {
        let mut state = self.lock();
        if !matches!(*state, FlowState::Closed) {
            tracing::info!("Clarification cancelled by operator");
        }
        *state = FlowState::Closed;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FlowState> {
        self.state.lock().expect("clarification state poisoned")
    }
}
