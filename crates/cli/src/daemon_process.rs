// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side "start the daemon if nobody else has" protocol.
//!
//! Several `escalctl` invocations can race to start `escalationd` at once
//! (e.g. two hook scripts firing back to back). An exclusive advisory lock
//! on a well-known lockfile under the state directory arbitrates: whoever
//! holds the lock checks again whether a daemon is now listening (the
//! previous lock holder may have just started one) before spawning.

use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::Path;
use std::process::Stdio;

use crate::{client, env};

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("failed to open lockfile {0}: {1}")]
    Lock(std::path::PathBuf, #[source] std::io::Error),

    #[error("failed to spawn {0}: {1}")]
    Spawn(std::path::PathBuf, #[source] std::io::Error),

    #[error("escalationd did not become ready within the poll window")]
    NotReady,
}

/// Ensures a daemon is listening on `socket_path`, starting one if not.
/// Returns once the socket is accepting connections (either because it
/// already was, or because the freshly spawned daemon became ready).
pub async fn start_if_needed(socket_path: &Path) -> Result<(), StartError> {
    if client::probe(socket_path).await {
        return Ok(());
    }

    let lock_path = env::lock_path();
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StartError::Lock(lock_path.clone(), e))?;
    }
    let lock_file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(&lock_path)
        .map_err(|e| StartError::Lock(lock_path.clone(), e))?;

    lock_file
        .lock_exclusive()
        .map_err(|e| StartError::Lock(lock_path.clone(), e))?;

    // Someone else may have won the race and started the daemon while we
    // were waiting for the lock.
    if client::probe(socket_path).await {
        let _ = lock_file.unlock();
        return Ok(());
    }

    let binary = env::daemon_binary();
    std::process::Command::new(&binary)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| StartError::Spawn(binary.clone(), e))?;

    let result = wait_until_ready(socket_path).await;
    let _ = fs2::FileExt::unlock(&lock_file);
    result
}

async fn wait_until_ready(socket_path: &Path) -> Result<(), StartError> {
    const ATTEMPTS: u32 = 20;
    let poll = env::connect_poll_interval();
    for _ in 0..ATTEMPTS {
        if client::probe(socket_path).await {
            return Ok(());
        }
        tokio::time::sleep(poll).await;
    }
    Err(StartError::NotReady)
}
