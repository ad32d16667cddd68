//! "Control de Unidades" flag reconciliation.
//!
//! The flag is a single shared boolean on the server; every terminal
//! holds a cached copy and converges by polling. A toggle performed on
//! one terminal reaches the others on their next poll tick, bounding
//! staleness to one polling interval. There is no push channel and no
//! cross-client locking; consistency is eventual by design.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use portico_gateway::{AccessGateway, GatewayError};

/// Default polling interval while waiting for the flag to come back on.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

const STATE_UNKNOWN: u8 = 0;
const STATE_DISABLED: u8 = 1;
const STATE_ENABLED: u8 = 2;

/// Cached copy of the server-side control flag.
///
/// The cache is only ever written with a server-confirmed value, so
/// the local input-lock state is always a pure function of the last
/// successful fetch. Before the first fetch the state is unknown and
/// scanning stays locked.
#[derive(Debug, Default)]
pub struct ToggleSync {
    state: AtomicU8,
}

impl ToggleSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last synced value, or `None` before the first successful fetch.
    pub fn state(&self) -> Option<bool> {
        match self.state.load(Ordering::Acquire) {
            STATE_ENABLED => Some(true),
            STATE_DISABLED => Some(false),
            _ => None,
        }
    }

    /// Whether scanning is currently unlocked. Unknown counts as
    /// disabled.
    pub fn is_enabled(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_ENABLED
    }

    /// Fetch the shared flag and reconcile the cache with it.
    pub async fn refresh<G: AccessGateway>(&self, gateway: &G) -> Result<bool, GatewayError> {
        let state = gateway.control_status().await?;
        self.store(state.enabled);
        Ok(state.enabled)
    }

    /// Write the shared flag, caching only the server-confirmed value —
    /// never the locally-assumed one.
    pub async fn set<G: AccessGateway>(
        &self,
        gateway: &G,
        next: bool,
    ) -> Result<bool, GatewayError> {
        let confirmed = gateway.set_control_status(next).await?;
        self.store(confirmed.enabled);
        Ok(confirmed.enabled)
    }

    /// Poll the shared flag until it reads enabled or `cancel` fires.
    ///
    /// Returns `true` once `enabled` is observed (at which point the
    /// caller unlocks its inputs) and `false` when cancelled first.
    /// Fetch failures keep the previous cached value and the loop keeps
    /// polling.
    pub async fn poll_until_enabled<G: AccessGateway>(
        &self,
        gateway: &G,
        interval: Duration,
        cancel: &CancellationToken,
    ) -> bool {
        let mut ticker = tokio::time::interval(interval);
        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            "Polling control flag until enabled",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Control flag poll cancelled");
                    return false;
                }
                _ = ticker.tick() => {
                    match self.refresh(gateway).await {
                        Ok(true) => {
                            tracing::info!("Control flag enabled, unlocking inputs");
                            return true;
                        }
                        Ok(false) => {
                            tracing::debug!("Control flag still disabled");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Control flag fetch failed, retrying");
                        }
                    }
                }
            }
        }
    }

    fn store(&self, enabled: bool) {
        let next = if enabled { STATE_ENABLED } else { STATE_DISABLED };
        let prev = self.state.swap(next, Ordering::AcqRel);
        if prev != next {
            tracing::info!(enabled, "Control flag synced");
        }
    }
}
