// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves an escalation id to the PID of the session it belongs to, so the
//! timer engine can ask the process probe whether that session is busy.
//!
//! The mapping from escalation id to session id is an adapter convention
//! (e.g. `"{session_id}:{tool_use_id}"` or a bare `session_id`) that the
//! engine deliberately does not hard-code; the daemon wires a concrete
//! lookup backed by the session registry.

use async_trait::async_trait;
use escalation_core::EscalationId;

#[async_trait]
pub trait SessionLookup: Send + Sync + 'static {
    /// Returns the PID registered for the session this escalation id
    /// belongs to, if any session can be resolved and it has a known PID.
    async fn pid_for(&self, escalation_id: &EscalationId) -> Option<u32>;
}

/// Lookup that never resolves a PID, used where busy-suppression is not
/// wired up (e.g. standalone engine tests).
#[derive(Clone, Default)]
pub struct NoSessionLookup;

#[async_trait]
impl SessionLookup for NoSessionLookup {
    async fn pid_for(&self, _escalation_id: &EscalationId) -> Option<u32> {
        None
    }
}
