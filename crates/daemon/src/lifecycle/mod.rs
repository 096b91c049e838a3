// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: resolving config, acquiring the socket (including
//! stale-socket resolution), and orderly shutdown.

use std::collections::HashMap;
use std::os::unix::net::UnixStream as StdUnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::net::UnixListener;

use crate::env;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("another instance is already listening on {0}")]
    AlreadyRunning(PathBuf),

    #[error("path {0} exists and is not a socket")]
    NotASocket(PathBuf),
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub log_path: PathBuf,
    pub notifier_binary: PathBuf,
    pub pid_check_interval: Duration,
    pub priority_overrides: HashMap<u64, i8>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            state_dir: env::state_dir(),
            socket_path: env::socket_path(),
            log_path: env::log_path(),
            notifier_binary: env::notifier_binary(),
            pid_check_interval: env::pid_check_interval(),
            priority_overrides: env::priority_overrides(),
        }
    }
}

const STALE_SOCKET_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Resolves a pre-existing socket path, distinguishing a stale socket (safe
/// to remove) from a live daemon already listening (fatal).
///
/// Mirrors the original service's `_cleanup_socket`: `stat()` the path; if
/// it isn't a socket at all, refuse to touch it; otherwise attempt a
/// timeout-bounded connect. A successful connect means a live daemon holds
/// it. A refused or timed-out connect means the previous daemon died
/// without cleaning up, so the path is unlinked.
fn resolve_existing_socket(path: &Path) -> Result<(), LifecycleError> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    use std::os::unix::fs::FileTypeExt;
    if !meta.file_type().is_socket() {
        return Err(LifecycleError::NotASocket(path.to_path_buf()));
    }

    match connect_with_timeout(path, STALE_SOCKET_PROBE_TIMEOUT) {
        Ok(_) => Err(LifecycleError::AlreadyRunning(path.to_path_buf())),
        Err(_) => {
            tracing::info!(path = %path.display(), "removing stale socket");
            std::fs::remove_file(path)?;
            Ok(())
        }
    }
}

fn connect_with_timeout(path: &Path, timeout: Duration) -> std::io::Result<StdUnixStream> {
    // std::os::unix::net has no connect-with-timeout; a plain connect on a
    // local abstract/filesystem socket either succeeds or is refused
    // immediately, so the timeout only guards against an unresponsive peer
    // accepting but never replying, via a read deadline.
    let stream = StdUnixStream::connect(path)?;
    stream.set_read_timeout(Some(timeout))?;
    Ok(stream)
}

/// Binds the daemon's Unix socket, resolving any stale socket left behind
/// by a previous instance first. Fails fatally if another instance is
/// already live or the path is occupied by something other than a socket.
pub async fn bind(config: &Config) -> Result<UnixListener, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;
    resolve_existing_socket(&config.socket_path)?;

    let listener = UnixListener::bind(&config.socket_path)?;

    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o600);
    std::fs::set_permissions(&config.socket_path, perms)?;

    Ok(listener)
}

/// Removes daemon-owned filesystem state on orderly shutdown.
pub fn cleanup(config: &Config) {
    if config.socket_path.exists() {
        if let Err(e) = std::fs::remove_file(&config.socket_path) {
            tracing::warn!(error = %e, path = %config.socket_path.display(), "failed to remove socket on shutdown");
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
