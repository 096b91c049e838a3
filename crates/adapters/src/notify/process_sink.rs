// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifier sink that spawns an external binary for each notification,
//! mirroring the `po_notify` CLI contract: positional title/message,
//! `--priority`, and (for priority 2) `--retry`/`--expire`.

use super::{NotifierSink, NotifyOutcome};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const TITLE_MAX_CHARS: usize = 250;
const MESSAGE_MAX_CHARS: usize = 1024;
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);
const EMERGENCY_PRIORITY: i8 = 2;
const EMERGENCY_RETRY_SECS: &str = "60";
const EMERGENCY_EXPIRE_SECS: &str = "3600";

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Spawns the configured notifier binary and waits (bounded by a timeout)
/// for it to exit.
#[derive(Clone)]
pub struct ProcessNotifierSink {
    binary: PathBuf,
}

impl ProcessNotifierSink {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl NotifierSink for ProcessNotifierSink {
    async fn notify(&self, title: &str, message: &str, priority: i8) -> NotifyOutcome {
        let title = truncate_chars(title, TITLE_MAX_CHARS);
        let message = truncate_chars(message, MESSAGE_MAX_CHARS);

        let mut cmd = Command::new(&self.binary);
        cmd.arg(&title)
            .arg(&message)
            .arg("--priority")
            .arg(priority.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if priority >= EMERGENCY_PRIORITY {
            cmd.arg("--retry")
                .arg(EMERGENCY_RETRY_SECS)
                .arg("--expire")
                .arg(EMERGENCY_EXPIRE_SECS);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(binary = %self.binary.display(), error = %e, "failed to spawn notifier");
                return NotifyOutcome::SpawnFailed(e.to_string());
            }
        };

        match tokio::time::timeout(NOTIFY_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) if status.success() => {
                tracing::info!(%title, "notification delivered");
                NotifyOutcome::Delivered
            }
            Ok(Ok(status)) => {
                let code = status.code().unwrap_or(-1);
                tracing::warn!(%title, code, "notifier exited non-zero");
                NotifyOutcome::NonZero(code)
            }
            Ok(Err(e)) => {
                tracing::warn!(%title, error = %e, "notifier wait failed");
                NotifyOutcome::SpawnFailed(e.to_string())
            }
            Err(_) => {
                tracing::warn!(%title, "notifier timed out");
                let _ = child.start_kill();
                NotifyOutcome::Timeout
            }
        }
    }
}
