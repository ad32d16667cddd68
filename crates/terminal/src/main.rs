//! `portico-terminal` -- turnstile scanning terminal.
//!
//! Reads scanned identifiers line-by-line from stdin, submits them to
//! the access-log backend, and runs the surrounding workflow: result
//! feedback, the clarification sub-flow, the combined log board with
//! periodic refresh, and the shared "Control de Unidades" flag sync.
//!
//! While the clarification modal is open, input lines are interpreted
//! as clarification commands instead of scans:
//! `residencia` | `trabajo` | `otros <detalle>` | `cancelar`.
//!
//! # Environment variables
//!
//! See [`TerminalConfig::from_env`] for the full table; `BACKEND_URL`
//! is the only required variable.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portico_core::ClarificationReason;
use portico_gateway::{AccessApi, AccessGateway};
use portico_terminal::{
    ConsoleCue, FeedbackPresenter, LogBoard, ScanGuard, ScanOrchestrator, ScanRejection,
    ScanSubmission, TerminalConfig, ToggleSync,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portico_terminal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match TerminalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let gateway = match AccessApi::with_timeout(config.backend_url.clone(), config.request_timeout)
    {
        Ok(api) => Arc::new(api),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build backend client");
            std::process::exit(1);
        }
    };

    tracing::info!(
        backend = %config.backend_url,
        region = %config.region,
        "Pórtico terminal starting",
    );

    let guard = Arc::new(ScanGuard::new());
    let presenter =
        FeedbackPresenter::with_timing(&config.region, config.feedback_dwell, config.feedback_fade);
    let board = LogBoard::new();
    let toggle = Arc::new(ToggleSync::new());

    let cancel = CancellationToken::new();

    // First sync of the control flag; scanning stays locked until the
    // flag reads enabled.
    match toggle.refresh(&*gateway).await {
        Ok(true) => tracing::info!("Control enabled, terminal unlocked"),
        Ok(false) => tracing::warn!("Control disabled, terminal locked until re-enabled"),
        Err(e) => tracing::warn!(error = %e, "Initial control flag fetch failed"),
    }

    board.refresh(&*gateway).await;

    let refresh_task = board.start_auto_refresh(
        Arc::clone(&gateway),
        config.log_refresh,
        Arc::clone(&guard),
        presenter.clone(),
        cancel.child_token(),
    );
    let toggle_task = spawn_toggle_sync(
        Arc::clone(&toggle),
        Arc::clone(&gateway),
        config.toggle_poll,
        cancel.child_token(),
    );

    let orchestrator = ScanOrchestrator::new(
        Arc::clone(&gateway),
        Arc::clone(&guard),
        presenter,
        board,
        Arc::clone(&toggle),
        Arc::new(ConsoleCue),
    );

    run_input_loop(&orchestrator, &cancel).await;

    tracing::info!("Shutting down");
    cancel.cancel();
    let _ = refresh_task.await;
    let _ = toggle_task.await;
}

/// Keep the cached control flag converged with the server.
///
/// One fetch per interval in either direction: a terminal that was
/// disabled by another client locks within one tick, and an enable
/// propagates the same way.
fn spawn_toggle_sync<G: AccessGateway + 'static>(
    toggle: Arc<ToggleSync>,
    gateway: Arc<G>,
    interval: std::time::Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = toggle.refresh(&*gateway).await {
                        tracing::warn!(error = %e, "Control flag sync failed");
                    }
                }
            }
        }
    })
}

/// Read operator input until stdin closes or Ctrl-C.
///
/// Each iteration reads one line; the physical scanner acts as a
/// keyboard, so the "input field" is cleared by consuming the line and
/// focus returns to the read automatically.
async fn run_input_loop<G: AccessGateway>(
    orchestrator: &ScanOrchestrator<G>,
    cancel: &CancellationToken,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl-C received");
                break;
            }
            _ = cancel.cancelled() => break,
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => handle_line(orchestrator, &line).await,
                    Ok(None) => {
                        tracing::info!("Input closed");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read input");
                        break;
                    }
                }
            }
        }
    }
}

/// Dispatch one input line: a clarification command while the modal is
/// open, a scan identifier otherwise.
async fn handle_line<G: AccessGateway>(orchestrator: &ScanOrchestrator<G>, line: &str) {
    if orchestrator.flow().is_open() {
        handle_clarification_command(orchestrator, line).await;
        return;
    }

    match orchestrator.submit_scan(line).await {
        ScanSubmission::Completed(resolution) => {
            tracing::debug!(?resolution, "Scan handled");
            if orchestrator.flow().is_open() {
                print_clarification_prompt(orchestrator);
            }
        }
        ScanSubmission::Rejected(ScanRejection::ControlDisabled) => {
            println!("Control de Unidades deshabilitado; espere a que se reactive.");
        }
        ScanSubmission::Rejected(reason) => {
            tracing::debug!(?reason, "Scan rejected locally");
        }
    }
}

async fn handle_clarification_command<G: AccessGateway>(
    orchestrator: &ScanOrchestrator<G>,
    line: &str,
) {
    let flow = orchestrator.flow();
    let command = line.trim();

    if command.eq_ignore_ascii_case("cancelar") {
        orchestrator.cancel_clarification();
        println!("Aclaración cancelada.");
        return;
    }

    if command.eq_ignore_ascii_case("residencia") {
        flow.set_reason(ClarificationReason::Residencia);
    } else if command.eq_ignore_ascii_case("trabajo") {
        flow.set_reason(ClarificationReason::Trabajo);
    } else if let Some(detail) = command
        .strip_prefix("otros")
        .or_else(|| command.strip_prefix("Otros"))
    {
        flow.set_reason(ClarificationReason::Otros);
        flow.set_details(detail.trim());
    } else if !command.is_empty() {
        println!("Comando no reconocido: residencia | trabajo | otros <detalle> | cancelar");
        return;
    }

    match orchestrator.resolve_clarification().await {
        Ok(payload) => {
            let name = payload.name.as_deref().unwrap_or("(sin nombre)");
            println!("Aclaración registrada: {name} — ENTRADA");
        }
        Err(e) => {
            println!("No se pudo registrar: {e}");
            print_clarification_prompt(orchestrator);
        }
    }
}

fn print_clarification_prompt<G: AccessGateway>(orchestrator: &ScanOrchestrator<G>) {
    if let Some(snap) = orchestrator.flow().snapshot() {
        let residency = if snap.person.is_resident {
            "residente"
        } else {
            "no residente"
        };
        println!(
            "Aclaración requerida para {} ({residency}). Motivo sugerido: {}.",
            snap.person.name,
            snap.reason.as_str(),
        );
        println!("Ingrese: residencia | trabajo | otros <detalle> | cancelar");
    }
}
