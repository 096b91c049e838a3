// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notifier sink for testing.

use super::{NotifierSink, NotifyOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded notification call.
#[derive(Debug, Clone)]
pub struct NotifyCall {
    pub title: String,
    pub message: String,
    pub priority: i8,
}

struct FakeState {
    calls: Vec<NotifyCall>,
    outcome: NotifyOutcome,
}

/// Fake notifier sink that records calls instead of spawning a process.
#[derive(Clone)]
pub struct FakeNotifierSink {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeNotifierSink {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                outcome: NotifyOutcome::Delivered,
            })),
        }
    }
}

impl FakeNotifierSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<NotifyCall> {
        self.inner.lock().calls.clone()
    }

    /// Makes every subsequent `notify()` call return the given outcome,
    /// for exercising timeout/failure handling in callers.
    pub fn set_outcome(&self, outcome: NotifyOutcome) {
        self.inner.lock().outcome = outcome;
    }
}

#[async_trait]
impl NotifierSink for FakeNotifierSink {
    async fn notify(&self, title: &str, message: &str, priority: i8) -> NotifyOutcome {
        let mut state = self.inner.lock();
        state.calls.push(NotifyCall {
            title: title.to_string(),
            message: message.to_string(),
            priority,
        });
        state.outcome.clone()
    }
}
