// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session registry: tracks which client sessions are currently registered
//! with the daemon, synthesizes session ids when the caller doesn't supply
//! one, and sweeps sessions whose PID has died.

use crate::session_lookup::SessionLookup;
use async_trait::async_trait;
use escalation_adapters::ProcessProbe;
use escalation_core::{Clock, EscalationId, IdGen, SessionId};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RegisteredSession {
    pub session_id: SessionId,
    pub pid: Option<u32>,
    pub registered_at: Instant,
}

pub struct SessionRegistry<C: Clock, G: IdGen> {
    clock: C,
    id_gen: G,
    sessions: Mutex<IndexMap<SessionId, RegisteredSession>>,
}

impl<C: Clock, G: IdGen> SessionRegistry<C, G> {
    pub fn new(clock: C, id_gen: G) -> Self {
        Self {
            clock,
            id_gen,
            sessions: Mutex::new(IndexMap::new()),
        }
    }

    /// Registers a session, synthesizing a session id from the configured
    /// [`IdGen`] when the caller doesn't supply one. Re-registering an
    /// existing id refreshes its pid and insertion position.
    pub fn register(&self, session_id: Option<SessionId>, pid: Option<u32>) -> SessionId {
        let session_id = session_id.unwrap_or_else(|| SessionId::new(self.id_gen.next()));
        let mut sessions = self.sessions.lock();
        sessions.insert(
            session_id.clone(),
            RegisteredSession {
                session_id: session_id.clone(),
                pid,
                registered_at: self.clock.now(),
            },
        );
        session_id
    }

    /// Unregisters a session. If `session_id` is `None`, removes the oldest
    /// registered session (insertion-order tie-break) instead. Returns the
    /// id that was removed, if any, and whether the registry is now empty.
    pub fn unregister(&self, session_id: Option<&SessionId>) -> (Option<SessionId>, bool) {
        let mut sessions = self.sessions.lock();
        let removed = match session_id {
            Some(id) => sessions.shift_remove(id).map(|s| s.session_id),
            None => sessions.shift_remove_index(0).map(|(_, s)| s.session_id),
        };
        (removed, sessions.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn snapshot(&self) -> Vec<RegisteredSession> {
        self.sessions.lock().values().cloned().collect()
    }

    pub fn pid_of(&self, session_id: &SessionId) -> Option<u32> {
        self.sessions.lock().get(session_id).and_then(|s| s.pid)
    }

    /// Removes every session whose pid is known and no longer alive.
    /// Sessions registered without a pid are never pruned by this sweep.
    /// Returns the ids that were removed.
    pub async fn sweep(&self, probe: &dyn ProcessProbe) -> Vec<SessionId> {
        let candidates: Vec<(SessionId, u32)> = self
            .sessions
            .lock()
            .values()
            .filter_map(|s| s.pid.map(|pid| (s.session_id.clone(), pid)))
            .collect();

        let mut dead = Vec::new();
        for (session_id, pid) in candidates {
            if !probe.alive(pid).await {
                dead.push(session_id);
            }
        }

        if !dead.is_empty() {
            let mut sessions = self.sessions.lock();
            for id in &dead {
                sessions.shift_remove(id);
            }
        }
        dead
    }
}

/// Splits the adapter-convention `"{session_id}:{tool_use_id}"` escalation
/// id back into its session id, falling back to the bare id when there's no
/// colon (see [`escalation_core::EscalationId::scoped`]).
fn session_id_of(escalation_id: &EscalationId) -> SessionId {
    match escalation_id.as_str().split_once(':') {
        Some((session, _tool_use_id)) => SessionId::new(session),
        None => SessionId::new(escalation_id.as_str()),
    }
}

#[async_trait]
impl<C: Clock + 'static, G: IdGen + 'static> SessionLookup for SessionRegistry<C, G> {
    async fn pid_for(&self, escalation_id: &EscalationId) -> Option<u32> {
        let session_id = session_id_of(escalation_id);
        self.pid_of(&session_id)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
