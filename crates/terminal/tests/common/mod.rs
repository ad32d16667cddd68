//! Scripted gateway shared by the terminal integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portico_core::{
    AccessLogEntry, ClarificationDecision, EntityType, ScanOutcome, ScanPayload, ToggleState,
};
use portico_gateway::{AccessGateway, GatewayError};
use portico_terminal::{
    ConsoleCue, FeedbackPresenter, LogBoard, ScanGuard, ScanOrchestrator, ToggleSync,
};

/// Gateway whose responses are queued up front by each test.
///
/// An exhausted queue answers with a 500, standing in for a transport
/// failure.
#[derive(Default)]
pub struct MockGateway {
    portico: Mutex<VecDeque<ScanOutcome>>,
    clarified: Mutex<VecDeque<Result<ScanPayload, String>>>,
    logs: Mutex<HashMap<EntityType, Vec<AccessLogEntry>>>,
    enabled: AtomicBool,
    /// Artificial latency on scan submission, so tests can overlap a
    /// second scan with one in flight.
    pub portico_delay: Mutex<Duration>,
    pub portico_calls: AtomicUsize,
    pub clarified_calls: AtomicUsize,
}

impl MockGateway {
    pub fn enabled() -> Self {
        let gateway = Self::default();
        gateway.enabled.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn queue_outcome(&self, outcome: ScanOutcome) {
        self.portico.lock().unwrap().push_back(outcome);
    }

    pub fn queue_clarified(&self, result: Result<ScanPayload, String>) {
        self.clarified.lock().unwrap().push_back(result);
    }

    pub fn insert_log(&self, entry: AccessLogEntry) {
        self.logs
            .lock()
            .unwrap()
            .entry(entry.target_type)
            .or_default()
            .push(entry);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.portico_delay.lock().unwrap() = delay;
    }
}

impl AccessGateway for MockGateway {
    async fn log_portico(&self, _identifier: &str) -> Result<ScanOutcome, GatewayError> {
        self.portico_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.portico_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.portico
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(GatewayError::Api {
                status: 500,
                body: "no scripted outcome".into(),
            })
    }

    async fn log_clarified(
        &self,
        _decision: &ClarificationDecision,
    ) -> Result<ScanPayload, GatewayError> {
        self.clarified_calls.fetch_add(1, Ordering::SeqCst);
        match self.clarified.lock().unwrap().pop_front() {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(body)) => Err(GatewayError::Api { status: 503, body }),
            None => Err(GatewayError::Api {
                status: 500,
                body: "no scripted clarified response".into(),
            }),
        }
    }

    async fn fetch_logs(&self, target: EntityType) -> Result<Vec<AccessLogEntry>, GatewayError> {
        Ok(self
            .logs
            .lock()
            .unwrap()
            .get(&target)
            .cloned()
            .unwrap_or_default())
    }

    async fn control_status(&self) -> Result<ToggleState, GatewayError> {
        Ok(ToggleState {
            enabled: self.enabled.load(Ordering::SeqCst),
        })
    }

    async fn set_control_status(&self, enabled: bool) -> Result<ToggleState, GatewayError> {
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(ToggleState { enabled })
    }
}

/// Build an orchestrator over the mock with the control flag synced.
pub async fn orchestrator(gateway: Arc<MockGateway>) -> Arc<ScanOrchestrator<MockGateway>> {
    let toggle = Arc::new(ToggleSync::new());
    toggle
        .refresh(&*gateway)
        .await
        .expect("mock control status never fails");

    Arc::new(ScanOrchestrator::new(
        gateway,
        Arc::new(ScanGuard::new()),
        FeedbackPresenter::new("portico"),
        LogBoard::new(),
        toggle,
        Arc::new(ConsoleCue),
    ))
}
