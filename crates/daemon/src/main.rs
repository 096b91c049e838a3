// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `escalationd`: the escalation daemon binary.

use escalation_adapters::{ProcessNotifierSink, SysinfoProcessProbe};
use escalation_core::EscalationId;
use escalation_daemon::lifecycle::{self, Config, LifecycleError};
use escalation_daemon::listener::Listener;
use escalation_daemon::state::DaemonState;
use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const NOTIFY_TITLE: &str = "Escalation";
const NOTIFY_TITLE_EMERGENCY: &str = "Escalation (1hr)";

/// Emergency-priority fires get the "(1hr)" title variant so a glance at the
/// notification distinguishes a first nudge from the final one before the
/// session is considered unattended.
fn notify_title(priority: i8) -> &'static str {
    if priority == 2 {
        NOTIFY_TITLE_EMERGENCY
    } else {
        NOTIFY_TITLE
    }
}

fn setup_logging(log_path: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or_else(|| std::path::Path::new(".")),
        log_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("escalationd.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    guard
}

#[tokio::main]
async fn main() {
    if std::env::args().any(|a| a == "--version") {
        println!(env!("CARGO_PKG_VERSION"));
        return;
    }

    let config = Config::load();
    let _log_guard = setup_logging(&config.log_path);

    tracing::info!(socket = %config.socket_path.display(), "starting escalation daemon");

    let listener = match lifecycle::bind(&config).await {
        Ok(listener) => listener,
        Err(LifecycleError::AlreadyRunning(path)) => {
            eprintln!("escalationd is already running (socket in use: {})", path.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("failed to start escalationd: {e}");
            std::process::exit(1);
        }
    };

    let sink = Arc::new(ProcessNotifierSink::new(config.notifier_binary.clone()));
    let probe = Arc::new(SysinfoProcessProbe::new());
    let state = Arc::new(DaemonState::with_priority_overrides(
        sink.clone(),
        probe.clone(),
        config.priority_overrides.clone(),
    ));

    let accept_task = tokio::spawn(Listener::new(listener, state.clone()).run());
    let scheduler_task = tokio::spawn(run_scheduler(state.clone()));
    let sweeper_task = tokio::spawn(run_sweeper(state.clone(), config.pid_check_interval));

    install_signal_handlers(state.clone());

    println!("READY");
    std::io::stdout().flush().ok();

    let _ = tokio::join!(accept_task, scheduler_task, sweeper_task);

    lifecycle::cleanup(&config);
    tracing::info!("escalation daemon stopped");
}

async fn run_scheduler(state: Arc<DaemonState>) {
    let engine = state.engine.clone();
    let sink = state.sink.clone();
    let probe = state.probe.clone();
    let sessions = state.sessions.clone();
    let running = state.running.clone();

    engine
        .run(running, move |event| {
            let sink = sink.clone();
            let probe = probe.clone();
            let sessions = sessions.clone();
            async move {
                dispatch_fire(event.escalation_id, event.message, event.priority, &sink, &probe, &sessions)
                    .await;
            }
        })
        .await;
}

async fn dispatch_fire(
    escalation_id: EscalationId,
    message: String,
    priority: i8,
    sink: &Arc<dyn escalation_adapters::NotifierSink>,
    probe: &Arc<dyn escalation_adapters::ProcessProbe>,
    sessions: &Arc<escalation_engine::SessionRegistry<escalation_core::SystemClock, escalation_core::UuidIdGen>>,
) {
    use escalation_engine::SessionLookup;

    if let Some(pid) = sessions.pid_for(&escalation_id).await {
        if probe.busy(pid).await {
            tracing::info!(%escalation_id, pid, "suppressing notification, session is busy");
            return;
        }
    }

    let outcome = sink.notify(notify_title(priority), &message, priority).await;
    tracing::info!(%escalation_id, ?outcome, "dispatched escalation notification");
}

async fn run_sweeper(state: Arc<DaemonState>, interval: std::time::Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // first tick fires immediately; skip it
    while state.running.load(Ordering::Acquire) {
        ticker.tick().await;
        let dead = state.sessions.sweep(state.probe.as_ref()).await;
        if !dead.is_empty() {
            tracing::info!(count = dead.len(), "swept dead sessions");
        }
        if state.sessions.is_empty() {
            tracing::info!("no sessions remain after sweep, shutting down");
            state.running.store(false, Ordering::Release);
            state.engine.shutdown();
        }
    }
}

fn install_signal_handlers(state: Arc<DaemonState>) {
    tokio::spawn(async move {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        let mut sigint = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGINT handler");
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM"),
            _ = sigint.recv() => tracing::info!("received SIGINT"),
        }

        state.running.store(false, Ordering::Release);
        state.engine.shutdown();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_priority_gets_the_1hr_title_variant() {
        assert_eq!(notify_title(2), "Escalation (1hr)");
        assert_ne!(notify_title(0), notify_title(2));
        assert_eq!(notify_title(-2), notify_title(1));
    }
}
