// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared daemon state, handed to every connection handler and background
//! task as an `Arc<DaemonState>`.

use escalation_adapters::{NotifierSink, ProcessProbe};
use escalation_core::{SystemClock, UuidIdGen};
use escalation_engine::{SessionRegistry, TimerEngine};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

pub struct DaemonState {
    pub engine: Arc<TimerEngine<SystemClock>>,
    pub sessions: Arc<SessionRegistry<SystemClock, UuidIdGen>>,
    pub sink: Arc<dyn NotifierSink>,
    pub probe: Arc<dyn ProcessProbe>,
    pub running: Arc<AtomicBool>,
    pub start_time: Instant,
}

impl DaemonState {
    pub fn new(sink: Arc<dyn NotifierSink>, probe: Arc<dyn ProcessProbe>) -> Self {
        Self::with_priority_overrides(sink, probe, HashMap::new())
    }

    pub fn with_priority_overrides(
        sink: Arc<dyn NotifierSink>,
        probe: Arc<dyn ProcessProbe>,
        priority_overrides: HashMap<u64, i8>,
    ) -> Self {
        Self {
            engine: Arc::new(TimerEngine::with_priority_overrides(
                SystemClock,
                priority_overrides,
            )),
            sessions: Arc::new(SessionRegistry::new(SystemClock, UuidIdGen)),
            sink,
            probe,
            running: Arc::new(AtomicBool::new(true)),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
