//! End-to-end scan workflow tests against a scripted gateway.
//!
//! Covers the full paths: scan → feedback → board refresh, the
//! double-scan guard, the clarification sub-flow, and timer isolation
//! between consecutive scans.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use chrono::Utc;

use portico_core::{
    AccessAction, AccessLogEntry, ClarificationReason, EntityType, PersonDetails, ScanOutcome,
    ScanPayload,
};
use portico_terminal::{
    FeedbackKind, FeedbackPhase, ScanEvent, ScanRejection, ScanResolution, ScanSubmission,
};

use common::{orchestrator, MockGateway};

fn juan_payload() -> ScanPayload {
    ScanPayload {
        action: Some(AccessAction::Entrada),
        target_type: Some(EntityType::Personal),
        name: Some("Juan Pérez".into()),
        rut: Some("12345678-9".into()),
        ..Default::default()
    }
}

fn juan_log_entry() -> AccessLogEntry {
    AccessLogEntry {
        target_id: "12345678-9".into(),
        target_type: EntityType::Personal,
        action: AccessAction::Entrada,
        log_time: Utc::now(),
        name: Some("Juan Pérez".into()),
        rut: Some("12345678-9".into()),
        unit: None,
        plate: None,
        company: None,
        photo_url: None,
    }
}

fn ana() -> PersonDetails {
    PersonDetails {
        id: 42,
        name: "Ana Soto".into(),
        rut: Some("9876543-2".into()),
        unit: Some("Abastecimiento".into()),
        grade: None,
        is_resident: true,
        photo_ref: None,
    }
}

// ---------------------------------------------------------------------------
// Scenario: successful personal scan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_scan_shows_entrada_feedback_and_updates_board() {
    let gateway = Arc::new(MockGateway::enabled());
    gateway.queue_outcome(ScanOutcome::Success(juan_payload()));
    gateway.insert_log(juan_log_entry());

    let orch = orchestrator(Arc::clone(&gateway)).await;
    let mut events = orch.subscribe();

    let result = orch.submit_scan("12345678").await;
    assert_matches!(result, ScanSubmission::Completed(ScanResolution::Logged(payload)) => {
        assert_eq!(payload.name.as_deref(), Some("Juan Pérez"));
    });

    // Feedback card: success, ENTRADA banner, visible right away.
    let card = orch.presenter().current().expect("card must be visible");
    assert_eq!(card.kind, FeedbackKind::Success);
    assert_eq!(card.action, Some(AccessAction::Entrada));
    assert_eq!(card.title, "Juan Pérez");
    assert_eq!(orch.presenter().phase(), FeedbackPhase::Visible);

    // Board refreshed with the new personal entry on top.
    let entries = orch.board().entries();
    assert_eq!(entries[0].target_type, EntityType::Personal);
    assert_eq!(entries[0].name.as_deref(), Some("Juan Pérez"));

    // Subscribers were notified.
    assert_matches!(events.recv().await.unwrap(), ScanEvent::Completed { payload, .. } => {
        assert_eq!(payload.name.as_deref(), Some("Juan Pérez"));
    });

    // Guard released.
    assert!(!orch.guard().is_held());
}

// ---------------------------------------------------------------------------
// Scenario: double scan while the guard is held
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn second_scan_while_guard_held_issues_no_network_call() {
    let gateway = Arc::new(MockGateway::enabled());
    gateway.queue_outcome(ScanOutcome::Success(juan_payload()));
    gateway.set_delay(Duration::from_millis(500));

    let orch = orchestrator(Arc::clone(&gateway)).await;

    let first = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.submit_scan("12345678").await })
    };

    // Let the first scan reach the gateway and park in its delay.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(orch.guard().is_held());

    // 100 ms after the first: rejected by the guard, silently.
    let second = orch.submit_scan("12345678").await;
    assert_matches!(
        second,
        ScanSubmission::Rejected(ScanRejection::ScanInProgress)
    );

    let first = first.await.unwrap();
    assert_matches!(first, ScanSubmission::Completed(ScanResolution::Logged(_)));

    // Exactly one gateway call total; the blocked scan never started.
    assert_eq!(gateway.portico_calls.load(Ordering::SeqCst), 1);
    assert!(!orch.guard().is_held());
}

// ---------------------------------------------------------------------------
// Scenario: consecutive scans get independent feedback timers
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn sequential_scans_produce_independent_feedback() {
    let gateway = Arc::new(MockGateway::enabled());
    gateway.queue_outcome(ScanOutcome::Success(juan_payload()));
    gateway.queue_outcome(ScanOutcome::Failure("Acceso denegado".into()));

    let orch = orchestrator(Arc::clone(&gateway)).await;

    orch.submit_scan("12345678").await;
    assert_eq!(orch.presenter().current().unwrap().kind, FeedbackKind::Success);

    // Second scan arrives mid-dwell of the first card; its feedback
    // replaces the card and restarts the lifecycle.
    tokio::time::sleep(Duration::from_secs(3)).await;
    orch.submit_scan("00000000").await;

    let card = orch.presenter().current().unwrap();
    assert_eq!(card.kind, FeedbackKind::Error);

    // The first card's dwell (5 s from its show) must not remove the
    // second card.
    tokio::time::sleep(Duration::from_secs(3)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(orch.presenter().phase(), FeedbackPhase::Visible);
    assert_eq!(orch.presenter().current().unwrap().kind, FeedbackKind::Error);
}

// ---------------------------------------------------------------------------
// Scenario: clarification flow, resident preselection, resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clarification_opens_preselected_and_resolves_to_entrada() {
    let gateway = Arc::new(MockGateway::enabled());
    gateway.queue_outcome(ScanOutcome::ClarificationRequired(ana()));
    gateway.queue_clarified(Ok(ScanPayload {
        action: Some(AccessAction::Entrada),
        target_type: Some(EntityType::Personal),
        name: Some("Ana Soto".into()),
        ..Default::default()
    }));

    let orch = orchestrator(Arc::clone(&gateway)).await;
    let mut events = orch.subscribe();

    let result = orch.submit_scan("99999999").await;
    assert_matches!(
        result,
        ScanSubmission::Completed(ScanResolution::ClarificationPending)
    );

    // Feedback deferred while the modal is open.
    assert!(!orch.presenter().is_visible());

    // Residencia preselected for a resident.
    let snap = orch.flow().snapshot().unwrap();
    assert_eq!(snap.reason, ClarificationReason::Residencia);
    assert_matches!(
        events.recv().await.unwrap(),
        ScanEvent::ClarificationOpened { person } => {
            assert_eq!(person.name, "Ana Soto");
        }
    );

    let payload = orch.resolve_clarification().await.unwrap();
    assert_eq!(payload.action, Some(AccessAction::Entrada));
    assert_eq!(payload.target_type, Some(EntityType::Personal));
    assert_eq!(payload.name.as_deref(), Some("Ana Soto"));
    // Person details fill the gaps the backend response left.
    assert_eq!(payload.unit.as_deref(), Some("Abastecimiento"));

    assert!(!orch.flow().is_open());
    let card = orch.presenter().current().unwrap();
    assert_eq!(card.kind, FeedbackKind::Success);
    assert_eq!(card.title, "Ana Soto");

    assert_matches!(
        events.recv().await.unwrap(),
        ScanEvent::ClarificationResolved { .. }
    );
}

// ---------------------------------------------------------------------------
// Scenario: otros without detail never reaches the network
// ---------------------------------------------------------------------------

#[tokio::test]
async fn otros_without_detail_is_rejected_before_the_gateway() {
    let gateway = Arc::new(MockGateway::enabled());
    gateway.queue_outcome(ScanOutcome::ClarificationRequired(ana()));

    let orch = orchestrator(Arc::clone(&gateway)).await;
    orch.submit_scan("99999999").await;

    orch.flow().set_reason(ClarificationReason::Otros);
    orch.flow().set_details("   ");

    let result = orch.resolve_clarification().await;
    assert!(result.is_err());
    assert_eq!(gateway.clarified_calls.load(Ordering::SeqCst), 0);

    // Flow still open with the error inline.
    let snap = orch.flow().snapshot().unwrap();
    assert!(snap.error.is_some());
}

// ---------------------------------------------------------------------------
// Scenario: cancellation leaves the backend record untouched
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancelling_clarification_makes_no_calls() {
    let gateway = Arc::new(MockGateway::enabled());
    gateway.queue_outcome(ScanOutcome::ClarificationRequired(ana()));

    let orch = orchestrator(Arc::clone(&gateway)).await;
    orch.submit_scan("99999999").await;
    assert!(orch.flow().is_open());

    orch.cancel_clarification();
    assert!(!orch.flow().is_open());
    assert_eq!(gateway.clarified_calls.load(Ordering::SeqCst), 0);
    assert!(!orch.presenter().is_visible());
}
