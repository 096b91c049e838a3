// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque identifier types used across the daemon, engine, and CLI.

crate::define_id! {
    /// Identifier for an escalation group, supplied by the caller on `add`.
    pub struct EscalationId;
}

crate::define_id! {
    /// Identifier for a registered client session, either supplied by the
    /// caller or synthesized by the session registry.
    pub struct SessionId;
}

impl EscalationId {
    /// Builds the `session_id:tool_use_id` composite convention used by
    /// some hook adapters to scope an escalation to a single tool
    /// invocation, falling back to the bare session id otherwise.
    pub fn scoped(session_id: &str, tool_use_id: Option<&str>) -> Self {
        match tool_use_id {
            Some(tool_use_id) if !tool_use_id.is_empty() => {
                Self::new(format!("{session_id}:{tool_use_id}"))
            }
            _ => Self::new(session_id),
        }
    }
}
