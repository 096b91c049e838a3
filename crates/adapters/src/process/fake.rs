// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process probe for testing: per-pid scripted alive/busy answers.

use super::ProcessProbe;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct FakeState {
    alive: HashMap<u32, bool>,
    busy: HashMap<u32, bool>,
    default_alive: bool,
}

/// Fake process probe. Unscripted PIDs answer `alive = false` and
/// `busy = false` by default, matching the fail-open-to-not-busy /
/// fail-to-dead-on-sweep policy exercised by the registry sweeper tests.
#[derive(Clone)]
pub struct FakeProcessProbe {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeProcessProbe {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState::default())),
        }
    }
}

impl FakeProcessProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_alive(&self, pid: u32, alive: bool) {
        self.inner.lock().alive.insert(pid, alive);
    }

    pub fn set_busy(&self, pid: u32, busy: bool) {
        self.inner.lock().busy.insert(pid, busy);
    }
}

#[async_trait]
impl ProcessProbe for FakeProcessProbe {
    async fn alive(&self, pid: u32) -> bool {
        let state = self.inner.lock();
        *state.alive.get(&pid).unwrap_or(&state.default_alive)
    }

    async fn busy(&self, pid: u32) -> bool {
        let state = self.inner.lock();
        *state.busy.get(&pid).unwrap_or(&false)
    }
}
