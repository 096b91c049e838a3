// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-variable-driven configuration for the control CLI.

use std::time::Duration;

fn duration_ms(var: &str, default_ms: u64) -> Duration {
    let ms = std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(ms)
}

pub fn timeout_connect() -> Duration {
    duration_ms("ESCALCTL_TIMEOUT_CONNECT_MS", 2000)
}

pub fn timeout_ipc() -> Duration {
    duration_ms("ESCALCTL_TIMEOUT_IPC_MS", 5000)
}

pub fn connect_poll_interval() -> Duration {
    duration_ms("ESCALCTL_CONNECT_POLL_MS", 100)
}

/// Path to the `escalationd` binary to spawn when starting the daemon.
/// Resolved relative to the running `escalctl` binary first (so a
/// side-by-side install works without `PATH` changes), falling back to
/// bare `PATH` lookup.
pub fn daemon_binary() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("ESCALATIOND_BINARY") {
        return std::path::PathBuf::from(path);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join("escalationd");
            if candidate.exists() {
                return candidate;
            }
        }
    }
    std::path::PathBuf::from("escalationd")
}

/// Path to the lockfile guarding concurrent "start if needed" attempts.
pub fn lock_path() -> std::path::PathBuf {
    escalation_daemon::env::state_dir().join("escalation.lock")
}
