// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification sink: spawns an external notifier binary for each
//! escalation fire.

mod process_sink;

pub use process_sink::ProcessNotifierSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifierSink, NotifyCall};

use async_trait::async_trait;

/// Result of dispatching a single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The notifier binary exited zero before the timeout elapsed.
    Delivered,
    /// The notifier binary did not exit within the configured timeout.
    Timeout,
    /// The notifier binary exited with a non-zero status.
    NonZero(i32),
    /// The notifier binary could not be spawned at all.
    SpawnFailed(String),
}

impl NotifyOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotifyOutcome::Delivered)
    }
}

/// Sink for dispatching a single escalation notification.
#[async_trait]
pub trait NotifierSink: Send + Sync + 'static {
    /// Sends a notification with the given title, message, and priority.
    ///
    /// `priority` follows the escalation daemon's priority scale (0 = normal,
    /// 2 = emergency); implementations are expected to forward it verbatim to
    /// the underlying transport.
    async fn notify(&self, title: &str, message: &str, priority: i8) -> NotifyOutcome;
}
