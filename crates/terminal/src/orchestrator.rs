//! Scan orchestration.
//!
//! Receives a raw scanned identifier and coordinates the guard, the
//! gateway call, the clarification flow, feedback, the log board
//! refresh and the result cue. Within one scan the ordering is fixed:
//! feedback-clear happens before the network call, which happens
//! before feedback-show. The guard is released on every path because
//! the permit is dropped at the end of the submission scope.

use std::sync::Arc;

use chrono::Utc;

use portico_core::{
    normalize_identifier, AccessAction, CoreError, EntityType, PersonDetails, ScanOutcome,
    ScanPayload,
};
use portico_gateway::AccessGateway;

use crate::board::LogBoard;
use crate::clarify::ClarificationFlow;
use crate::cue::{Cue, CuePlayer};
use crate::events::{ScanEvent, ScanEvents};
use crate::feedback::{FeedbackCard, FeedbackPresenter};
use crate::guard::ScanGuard;
use crate::toggle::ToggleSync;

/// Operator-facing message for transport failures. The underlying
/// error goes to the log; a new physical scan is the retry mechanism.
const TRANSPORT_FAILURE_MESSAGE: &str = "No se pudo contactar al servidor";

/// What happened to one submission attempt.
#[derive(Debug)]
pub enum ScanSubmission {
    /// The scan reached the backend and resolved one way or another.
    Completed(ScanResolution),
    /// The scan was rejected before any network call.
    Rejected(ScanRejection),
}

/// Resolution of a scan that reached the backend.
#[derive(Debug)]
pub enum ScanResolution {
    /// Logged; feedback shown, board refreshed, event published.
    Logged(ScanPayload),
    /// The clarification flow is open; feedback is deferred until the
    /// operator resolves it.
    ClarificationPending,
    /// The backend or transport rejected the scan; error feedback
    /// shown with this message.
    Failed(String),
}

/// Local preconditions that stop a scan before the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRejection {
    /// Identifier empty after trimming.
    EmptyIdentifier,
    /// The shared control flag is off (or not yet synced); inputs are
    /// locked.
    ControlDisabled,
    /// Another scan is in flight. Deliberately silent so rapid
    /// re-scans do not flood the terminal with error cards.
    ScanInProgress,
}

/// Errors from resolving a pending clarification.
#[derive(Debug, thiserror::Error)]
pub enum ClarifyError {
    /// Rejected locally; the flow stays open with the error inline.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The gateway call failed; the flow stays open, the entered text
    /// is preserved.
    #[error("Clarification submission failed: {0}")]
    Gateway(String),
}

/// Composes the scanning workflow of one terminal screen.
pub struct ScanOrchestrator<G: AccessGateway> {
    gateway: Arc<G>,
    guard: Arc<ScanGuard>,
    presenter: FeedbackPresenter,
    board: LogBoard,
    flow: ClarificationFlow,
    toggle: Arc<ToggleSync>,
    cue: Arc<dyn CuePlayer>,
    events: ScanEvents,
}

impl<G: AccessGateway> ScanOrchestrator<G> {
    pub fn new(
        gateway: Arc<G>,
        guard: Arc<ScanGuard>,
        presenter: FeedbackPresenter,
        board: LogBoard,
        toggle: Arc<ToggleSync>,
        cue: Arc<dyn CuePlayer>,
    ) -> Self {
        Self {
            gateway,
            guard,
            presenter,
            board,
            flow: ClarificationFlow::new(),
            toggle,
            cue,
            events: ScanEvents::default(),
        }
    }

    /// Subscribe to scan completion notifications.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ScanEvent> {
        self.events.subscribe()
    }

    /// The clarification flow of this screen, for rendering and for
    /// operator reason/detail input.
    pub fn flow(&self) -> &ClarificationFlow {
        &self.flow
    }

    pub fn presenter(&self) -> &FeedbackPresenter {
        &self.presenter
    }

    pub fn board(&self) -> &LogBoard {
        &self.board
    }

    pub fn guard(&self) -> &ScanGuard {
        &self.guard
    }

    /// Submit one scanned identifier.
    ///
    /// Preconditions checked in order: non-empty identifier, control
    /// flag enabled, no scan already in flight. The guard is held for
    /// the duration of the gateway call and released on every exit
    /// path.
    pub async fn submit_scan(&self, raw: &str) -> ScanSubmission {
        let Some(identifier) = normalize_identifier(raw) else {
            tracing::debug!("Empty identifier ignored");
            return ScanSubmission::Rejected(ScanRejection::EmptyIdentifier);
        };

        if !self.toggle.is_enabled() {
            tracing::warn!("Scan rejected: control is disabled");
            return ScanSubmission::Rejected(ScanRejection::ControlDisabled);
        }

        let Some(_permit) = self.guard.try_acquire() else {
            // Silent by design; see the log board for the outcome of
            // the scan already in flight.
            tracing::debug!(identifier = %identifier, "Scan ignored: another scan in progress");
            return ScanSubmission::Rejected(ScanRejection::ScanInProgress);
        };

        // Stale feedback and its timers go before the call.
        self.presenter.clear();

        tracing::info!(identifier = %identifier, "Submitting scan");
        let resolution = match self.gateway.log_portico(&identifier).await {
            Ok(ScanOutcome::Success(payload)) => self.on_success(payload).await,
            Ok(ScanOutcome::ClarificationRequired(person)) => self.on_clarification(person),
            Ok(ScanOutcome::Failure(message)) => self.on_failure(message),
            Err(e) => {
                tracing::error!(error = %e, "Scan transport failure");
                self.on_failure(TRANSPORT_FAILURE_MESSAGE.to_string())
            }
        };

        ScanSubmission::Completed(resolution)
    }

    /// Resolve the pending clarification with the reason/details the
    /// operator entered into [`flow`](Self::flow).
    ///
    /// On success the flow closes and the merged payload (person
    /// details, action `entrada`, type `personal`) drives the success
    /// path. On gateway failure the flow stays open with the error
    /// inline.
    pub async fn resolve_clarification(&self) -> Result<ScanPayload, ClarifyError> {
        let decision = self.flow.begin_submit()?;

        tracing::info!(
            person_id = decision.person_id,
            reason = decision.reason.as_str(),
            "Submitting clarification",
        );

        match self.gateway.log_clarified(&decision).await {
            Ok(payload) => {
                let person = self.flow.complete();
                let merged = merge_clarified(payload, person);

                self.cue.play(Cue::Success);
                self.presenter.show(FeedbackCard::success(&merged));
                self.board.refresh(&*self.gateway).await;
                self.events.publish(ScanEvent::ClarificationResolved {
                    payload: merged.clone(),
                    at: Utc::now(),
                });

                Ok(merged)
            }
            Err(e) => {
                tracing::error!(error = %e, "Clarification submission failed");
                self.flow.fail_submit(e.to_string());
                Err(ClarifyError::Gateway(e.to_string()))
            }
        }
    }

    /// Cancel the pending clarification. No log entry is created and
    /// no compensating call is made.
    pub fn cancel_clarification(&self) {
        self.flow.cancel();
    }

    // ---- private helpers ----

    async fn on_success(&self, payload: ScanPayload) -> ScanResolution {
        self.cue.play(Cue::Success);
        self.presenter.show(FeedbackCard::success(&payload));
        self.board.refresh(&*self.gateway).await;
        self.events.publish(ScanEvent::Completed {
            payload: payload.clone(),
            at: Utc::now(),
        });
        ScanResolution::Logged(payload)
    }

    fn on_clarification(&self, person: PersonDetails) -> ScanResolution {
        // The physical scan succeeded; only the classification is
        // pending, so the cue is the success one.
        self.cue.play(Cue::Success);
        self.flow.open(person.clone());
        self.events
            .publish(ScanEvent::ClarificationOpened { person });
        ScanResolution::ClarificationPending
    }

    fn on_failure(&self, message: String) -> ScanResolution {
        self.cue.play(Cue::Error);
        self.presenter.show(FeedbackCard::error(message.clone()));
        ScanResolution::Failed(message)
    }
}

/// Merge the clarified-entry response with the person the flow held.
///
/// The backend payload wins where present; person details fill the
/// gaps, and the action/type default to `entrada`/`personal` — a
/// clarified access is always a personnel entry.
fn merge_clarified(mut payload: ScanPayload, person: Option<PersonDetails>) -> ScanPayload {
    payload.action.get_or_insert(AccessAction::Entrada);
    payload.target_type.get_or_insert(EntityType::Personal);

    if let Some(person) = person {
        if payload.name.is_none() {
            payload.name = Some(person.name);
        }
        payload.rut = payload.rut.or(person.rut);
        payload.unit = payload.unit.or(person.unit);
        payload.photo_url = payload.photo_url.or(person.photo_ref);
    }

    payload
}
