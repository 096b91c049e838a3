// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Accept loop and per-connection RPC dispatch.

use crate::protocol::{PendingStatus, Request, Response, SessionStatus};
use crate::protocol_wire::{self, ProtocolError, DEFAULT_TIMEOUT};
use crate::state::DaemonState;
use escalation_core::{Clock, EscalationId, SessionId, SystemClock};
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::{UnixListener, UnixStream};

const ACCEPT_POLL: std::time::Duration = std::time::Duration::from_secs(1);
const DEFAULT_DELAYS: [u64; 2] = [60, 3600];

pub struct Listener {
    inner: UnixListener,
    state: Arc<DaemonState>,
}

impl Listener {
    pub fn new(inner: UnixListener, state: Arc<DaemonState>) -> Self {
        Self { inner, state }
    }

    /// Accepts connections until `state.running` is cleared, rechecking it
    /// at least once per [`ACCEPT_POLL`] so a signal handler's shutdown
    /// request is observed promptly even with no inbound traffic.
    pub async fn run(self) {
        while self.state.running.load(Ordering::Acquire) {
            match tokio::time::timeout(ACCEPT_POLL, self.inner.accept()).await {
                Ok(Ok((stream, _addr))) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, state).await {
                            tracing::debug!(error = %e, "connection ended with an error");
                        }
                    });
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "accept failed");
                }
                Err(_timeout) => {}
            }
        }
    }
}

async fn handle_connection(
    mut stream: UnixStream,
    state: Arc<DaemonState>,
) -> Result<(), ProtocolError> {
    let request = protocol_wire::read_request(&mut stream, DEFAULT_TIMEOUT).await?;
    let response = handle_request(request, &state).await;
    protocol_wire::write_response(&mut stream, &response, DEFAULT_TIMEOUT).await
}

async fn handle_request(request: Request, state: &Arc<DaemonState>) -> Response {
    match request {
        Request::Add {
            escalation_id,
            message,
            delays,
        } => {
            let delays = delays.unwrap_or_else(|| DEFAULT_DELAYS.to_vec());
            state
                .engine
                .add(EscalationId::new(escalation_id), message, &delays);
            Response::Ok
        }
        Request::Cancel { escalation_id } => {
            let found = state.engine.cancel(&EscalationId::new(escalation_id));
            Response::Cancelled { found }
        }
        Request::Status => build_status(state),
        Request::RegisterSession { session_id, pid } => {
            let session_id = state
                .sessions
                .register(session_id.map(SessionId::new), pid);
            Response::Registered {
                session_id: session_id.to_string(),
                session_count: state.sessions.len(),
            }
        }
        Request::UnregisterSession { session_id } => {
            let (removed, empty) = state.sessions.unregister(session_id.map(SessionId::new).as_ref());
            if empty {
                tracing::info!("last session unregistered, shutting down");
                state.running.store(false, Ordering::Release);
                state.engine.shutdown();
            }
            Response::Unregistered {
                session_id: removed.map(|s| s.to_string()),
                session_count: state.sessions.len(),
                shutting_down: empty,
            }
        }
        Request::Shutdown => {
            state.running.store(false, Ordering::Release);
            state.engine.shutdown();
            Response::Ok
        }
    }
}

fn build_status(state: &Arc<DaemonState>) -> Response {
    let now = Instant::now();
    let now_epoch_secs = SystemClock.epoch_ms() / 1000;
    let pending = state
        .engine
        .status()
        .into_iter()
        .map(|group| {
            let (next_fire_at, next_priority) = group
                .pending
                .first()
                .copied()
                .unwrap_or((now, 0));
            PendingStatus {
                escalation_id: group.escalation_id.to_string(),
                message: group.message,
                next_fire_in: next_fire_at.saturating_duration_since(now).as_secs(),
                next_priority,
                pending_count: group.pending.len(),
            }
        })
        .collect();

    let sessions = state
        .sessions
        .snapshot()
        .into_iter()
        .map(|s| {
            let age = s.registered_at.elapsed().as_secs();
            (
                s.session_id.to_string(),
                SessionStatus {
                    pid: s.pid,
                    registered_at: now_epoch_secs.saturating_sub(age),
                    age,
                },
            )
        })
        .collect::<BTreeMap<_, _>>();

    Response::Status {
        pending,
        session_count: state.sessions.len(),
        sessions,
        uptime_secs: state.uptime_secs(),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
