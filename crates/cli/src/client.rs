// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport for talking to a running `escalationd` over its Unix socket.

use escalation_daemon::protocol::{Request, Response};
use escalation_daemon::protocol_wire::{self, ProtocolError};
use std::path::Path;
use std::time::Duration;
use tokio::net::UnixStream;

use crate::env;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("could not connect to escalationd: {0}")]
    Connect(#[source] std::io::Error),

    #[error("request failed: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Connects to the daemon, sends a single request, and returns its
/// response. The daemon is not a long-lived conversation partner from the
/// CLI's point of view: one connection per command.
pub async fn call(socket_path: &Path, request: Request) -> Result<Response, ClientError> {
    let mut stream = connect(socket_path).await?;

    let bytes = protocol_wire::encode(&request)?;
    protocol_wire::write_message(&mut stream, &bytes).await?;

    let response_bytes = tokio::time::timeout(env::timeout_ipc(), protocol_wire::read_message(&mut stream))
        .await
        .map_err(|_| ClientError::Protocol(ProtocolError::Timeout))??;
    Ok(protocol_wire::decode(&response_bytes)?)
}

async fn connect(socket_path: &Path) -> Result<UnixStream, ClientError> {
    tokio::time::timeout(env::timeout_connect(), UnixStream::connect(socket_path))
        .await
        .map_err(|_| ClientError::Connect(std::io::Error::from(std::io::ErrorKind::TimedOut)))?
        .map_err(ClientError::Connect)
}

/// Whether a daemon is reachable at `socket_path`, without sending it a
/// request. Used to decide whether `start_if_needed` has to spawn anything.
pub async fn probe(socket_path: &Path) -> bool {
    connect(socket_path).await.is_ok()
}
