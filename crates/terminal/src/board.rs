//! Combined, time-sorted view of access logs for one screen.
//!
//! `refresh` fans out one fetch per entity type; a type that fails to
//! load degrades to an empty list instead of aborting the whole
//! refresh. Entries are concatenated and sorted descending by log
//! time. A live text filter re-derives the view without re-fetching.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use portico_core::{AccessLogEntry, EntityType};
use portico_gateway::AccessGateway;

use crate::feedback::FeedbackPresenter;
use crate::guard::ScanGuard;

/// In-memory log view for one screen. Cheap to clone; clones share
/// the same state.
#[derive(Clone, Default)]
pub struct LogBoard {
    inner: Arc<Mutex<BoardState>>,
}

#[derive(Default)]
struct BoardState {
    entries: Vec<AccessLogEntry>,
    filter: String,
}

impl LogBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all entity-type logs in parallel and rebuild the view.
    ///
    /// Partial-failure tolerant: a failed type contributes an empty
    /// list and a warning. An active filter is re-applied rather than
    /// reset.
    pub async fn refresh<G: AccessGateway>(&self, gateway: &G) {
        let fetches = EntityType::ALL
            .iter()
            .map(|&target| async move { (target, gateway.fetch_logs(target).await) });

        let mut combined = Vec::new();
        for (target, result) in join_all(fetches).await {
            match result {
                Ok(entries) => combined.extend(entries),
                Err(e) => {
                    tracing::warn!(
                        target_type = %target,
                        error = %e,
                        "Log fetch failed for one type, degrading to empty",
                    );
                }
            }
        }

        combined.sort_by_key(|entry| Reverse(entry.log_time));

        let mut state = self.lock();
        tracing::debug!(count = combined.len(), "Log board refreshed");
        state.entries = combined;
    }

    /// Set the live text filter. The view is re-derived on read; no
    /// fetch happens here.
    pub fn set_filter(&self, query: impl Into<String>) {
        self.lock().filter = query.into();
    }

    /// Drop the filter, restoring the full view.
    pub fn clear_filter(&self) {
        self.lock().filter.clear();
    }

    /// The filtered view, sorted descending by log time.
    pub fn entries(&self) -> Vec<AccessLogEntry> {
        let state = self.lock();
        state
            .entries
            .iter()
            .filter(|entry| entry.matches_filter(&state.filter))
            .cloned()
            .collect()
    }

    /// Number of entries before filtering.
    pub fn total(&self) -> usize {
        self.lock().entries.len()
    }

    /// Begin a recurring refresh loop.
    ///
    /// A tick is skipped (not queued) while a scan is in progress or a
    /// feedback card is on display, so the refresh never disrupts an
    /// in-progress interaction. Runs until `cancel` is triggered;
    /// callers stop the loop before discarding the screen that owns
    /// the board.
    pub fn start_auto_refresh<G>(
        &self,
        gateway: Arc<G>,
        interval: Duration,
        guard: Arc<ScanGuard>,
        presenter: FeedbackPresenter,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()>
    where
        G: AccessGateway + 'static,
    {
        let board = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            tracing::info!(
                interval_ms = interval.as_millis() as u64,
                "Log board auto-refresh started",
            );

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Log board auto-refresh stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        if guard.is_held() || presenter.is_visible() {
                            tracing::trace!("Auto-refresh skipped: interaction in progress");
                            continue;
                        }
                        board.refresh(&*gateway).await;
                    }
                }
            }
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.inner.lock().expect("log board state poisoned")
    }
}
