//! Feedback card lifecycle per screen region.
//!
//! A region shows at most one card at a time. Each card runs through an
//! explicit state machine (`Idle → Visible → Fading → Idle`) driven by a
//! single spawned task with two cancellable sleeps: dwell, then fade.
//! Showing a new card cancels the previous card's task, so no timer
//! chain outlives its card and cards never stack.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use portico_core::{AccessAction, EntityType, ScanPayload};

/// Default dwell before the fade-out begins.
pub const DEFAULT_DWELL: Duration = Duration::from_secs(5);

/// Default duration of the fade transition.
pub const DEFAULT_FADE: Duration = Duration::from_millis(500);

/// Visual flavour of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Lifecycle phase of the region's card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackPhase {
    /// No card on display.
    #[default]
    Idle,
    /// Card fully visible, dwell timer running.
    Visible,
    /// Fade transition in progress; the card is still on display.
    Fading,
}

/// Renderable content of one feedback card.
///
/// Which detail lines appear depends on the entity type of the payload;
/// the timing contract is uniform across all variants.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackCard {
    pub kind: FeedbackKind,
    /// "ENTRADA" / "SALIDA" banner, when the backend resolved one.
    pub action: Option<AccessAction>,
    pub title: String,
    /// Label/value detail lines in display order.
    pub lines: Vec<(String, String)>,
    pub photo_url: Option<String>,
}

impl FeedbackCard {
    /// Compose a success card from a scan payload.
    pub fn success(payload: &ScanPayload) -> Self {
        let mut lines = Vec::new();
        let mut push = |label: &str, value: &Option<String>| {
            if let Some(v) = value {
                lines.push((label.to_string(), v.clone()));
            }
        };

        match payload.target_type {
            Some(EntityType::Personal) => {
                push("RUT", &payload.rut);
                push("Unidad", &payload.unit);
            }
            Some(EntityType::Vehiculo) => {
                push("Patente", &payload.plate);
                push("Conductor", &payload.name);
            }
            Some(EntityType::Visita) => {
                push("RUT", &payload.rut);
                push("Empresa", &payload.company);
            }
            Some(EntityType::EmpresaEmpleado) => {
                push("Empresa", &payload.company);
            }
            Some(EntityType::PersonalComision) => {
                push("Unidad", &payload.unit);
            }
            None => {}
        }

        let title = payload
            .name
            .clone()
            .or_else(|| payload.plate.clone())
            .unwrap_or_else(|| "Acceso registrado".to_string());

        Self {
            kind: FeedbackKind::Success,
            action: payload.action,
            title,
            lines,
            photo_url: payload.photo_url.clone(),
        }
    }

    /// Compose an error card carrying the failure message verbatim.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            action: None,
            title: "Acceso rechazado".to_string(),
            lines: vec![("Detalle".to_string(), message.into())],
            photo_url: None,
        }
    }
}

/// Observable snapshot of a region, published on every phase change.
#[derive(Debug, Clone)]
pub struct FeedbackView {
    pub phase: FeedbackPhase,
    pub card: Option<FeedbackCard>,
}

/// Owns the single card slot of one screen region.
///
/// Cheap to clone; all clones share the same slot. Safe to call from
/// any task — the slot is behind a mutex and phase transitions are
/// tagged with a generation counter so a stale lifecycle task can
/// never touch a newer card.
#[derive(Clone)]
pub struct FeedbackPresenter {
    inner: Arc<Inner>,
}

struct Inner {
    region: String,
    dwell: Duration,
    fade: Duration,
    slot: Mutex<Slot>,
    view_tx: watch::Sender<FeedbackView>,
}

#[derive(Default)]
struct Slot {
    generation: u64,
    phase: FeedbackPhase,
    card: Option<FeedbackCard>,
    cancel: Option<CancellationToken>,
}

impl FeedbackPresenter {
    /// Create a presenter for one region with the default dwell/fade.
    pub fn new(region: impl Into<String>) -> Self {
        Self::with_timing(region, DEFAULT_DWELL, DEFAULT_FADE)
    }

    /// Create a presenter with explicit dwell and fade durations.
    pub fn with_timing(region: impl Into<String>, dwell: Duration, fade: Duration) -> Self {
        let (view_tx, _) = watch::channel(FeedbackView {
            phase: FeedbackPhase::Idle,
            card: None,
        });
        Self {
            inner: Arc::new(Inner {
                region: region.into(),
                dwell,
                fade,
                slot: Mutex::new(Slot::default()),
                view_tx,
            }),
        }
    }

    /// Region this presenter owns.
    pub fn region(&self) -> &str {
        &self.inner.region
    }

    /// Show a card, replacing whatever the region currently displays.
    ///
    /// Cancels the previous card's dwell/fade task before installing
    /// the new one, then spawns a fresh lifecycle task. Must be called
    /// from within a Tokio runtime.
    pub fn show(&self, card: FeedbackCard) {
        let token = CancellationToken::new();
        let generation = {
            let mut slot = self.inner.slot.lock().expect("feedback slot poisoned");
            if let Some(old) = slot.cancel.take() {
                old.cancel();
            }
            slot.generation += 1;
            slot.phase = FeedbackPhase::Visible;
            slot.card = Some(card);
            slot.cancel = Some(token.clone());
            self.inner.publish(&slot);
            slot.generation
        };

        tracing::debug!(region = %self.inner.region, generation, "Feedback card shown");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(inner.dwell) => {}
            }
            if !inner.begin_fade(generation) {
                return;
            }
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(inner.fade) => {}
            }
            inner.remove(generation);
        });
    }

    /// Remove the current card immediately, cancelling its timers.
    pub fn clear(&self) {
        let mut slot = self.inner.slot.lock().expect("feedback slot poisoned");
        if let Some(old) = slot.cancel.take() {
            old.cancel();
        }
        if slot.phase != FeedbackPhase::Idle {
            tracing::debug!(region = %self.inner.region, "Feedback card cleared");
        }
        slot.phase = FeedbackPhase::Idle;
        slot.card = None;
        self.inner.publish(&slot);
    }

    /// Whether a card is currently on display (visible or fading).
    pub fn is_visible(&self) -> bool {
        self.phase() != FeedbackPhase::Idle
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> FeedbackPhase {
        self.inner.slot.lock().expect("feedback slot poisoned").phase
    }

    /// Snapshot of the current card, if any.
    pub fn current(&self) -> Option<FeedbackCard> {
        self.inner
            .slot
            .lock()
            .expect("feedback slot poisoned")
            .card
            .clone()
    }

    /// Observe phase changes; a renderer drives the actual display
    /// from this channel.
    pub fn subscribe(&self) -> watch::Receiver<FeedbackView> {
        self.inner.view_tx.subscribe()
    }
}

impl Inner {
    fn publish(&self, slot: &Slot) {
        self.view_tx.send_replace(FeedbackView {
            phase: slot.phase,
            card: slot.card.clone(),
        });
    }

    /// Visible → Fading, only if the card is still the same generation.
    fn begin_fade(&self, generation: u64) -> bool {
        let mut slot = self.slot.lock().expect("feedback slot poisoned");
        if slot.generation != generation || slot.phase != FeedbackPhase::Visible {
            return false;
        }
        slot.phase = FeedbackPhase::Fading;
        self.publish(&slot);
        true
    }

    /// Fading → Idle, only for the matching generation.
    fn remove(&self, generation: u64) {
        let mut slot = self.slot.lock().expect("feedback slot poisoned");
        if slot.generation != generation {
            return;
        }
        slot.phase = FeedbackPhase::Idle;
        slot.card = None;
        slot.cancel = None;
        self.publish(&slot);
    }
}
