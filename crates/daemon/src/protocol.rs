// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RPC request/response schema, carried over the wire format defined in
//! [`crate::protocol_wire`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    Add {
        escalation_id: String,
        message: String,
        #[serde(default)]
        delays: Option<Vec<u64>>,
    },
    Cancel {
        escalation_id: String,
    },
    Status,
    RegisterSession {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        pid: Option<u32>,
    },
    UnregisterSession {
        #[serde(default)]
        session_id: Option<String>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error {
        message: String,
    },
    Cancelled {
        found: bool,
    },
    Status {
        pending: Vec<PendingStatus>,
        session_count: usize,
        sessions: BTreeMap<String, SessionStatus>,
        uptime_secs: u64,
    },
    Registered {
        session_id: String,
        session_count: usize,
    },
    Unregistered {
        session_id: Option<String>,
        session_count: usize,
        shutting_down: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingStatus {
    pub escalation_id: String,
    pub message: String,
    pub next_fire_in: u64,
    pub next_priority: i8,
    pub pending_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub pid: Option<u32>,
    pub registered_at: u64,
    pub age: u64,
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }
}
