//! Scan event bus.
//!
//! Replaces the ad-hoc completion callback of the reference behaviour:
//! interested modules (the dashboard, renderers) subscribe instead of
//! being wired into the orchestrator. Backed by a
//! `tokio::sync::broadcast` channel; events published with no
//! subscribers are dropped silently.

use serde::Serialize;
use tokio::sync::broadcast;

use portico_core::{PersonDetails, ScanPayload, Timestamp};

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Notifications emitted by the scan orchestrator.
#[derive(Debug, Clone, Serialize)]
pub enum ScanEvent {
    /// A scan was logged successfully.
    Completed { payload: ScanPayload, at: Timestamp },

    /// The backend asked for operator clarification.
    ClarificationOpened { person: PersonDetails },

    /// A pending clarification was resolved and logged.
    ClarificationResolved { payload: ScanPayload, at: Timestamp },
}

/// Publish/subscribe hub for [`ScanEvent`]s.
pub struct ScanEvents {
    sender: broadcast::Sender<ScanEvent>,
}

impl ScanEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ScanEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.sender.subscribe()
    }
}

impl Default for ScanEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
