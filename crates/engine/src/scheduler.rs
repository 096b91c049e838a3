// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heap-based escalation timer scheduler.
//!
//! Cancellation is lazy: `cancel` drops an event's entry from the lookup
//! table but leaves its key in the heap. A popped key whose entry is gone
//! is silently skipped. Each event carries a monotonically increasing
//! sequence number so that two events with an identical fire time and
//! escalation id remain distinguishable — Rust's `BinaryHeap` has no
//! pointer-identity equivalent to compare against.

use escalation_core::{Clock, EscalationId};
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Notify;

/// Maps a delay in seconds to a notification priority. Delays not present
/// fall back to the lowest priority; the default table matches the
/// permission-escalation use case (1 minute -> normal, 1 hour -> emergency).
fn priority_for_delay(delay_secs: u64, overrides: &HashMap<u64, i8>) -> i8 {
    if let Some(p) = overrides.get(&delay_secs) {
        return *p;
    }
    match delay_secs {
        60 => 0,
        3600 => 2,
        _ => 0,
    }
}

/// A single armed timer.
#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    pub seq: u64,
    pub escalation_id: EscalationId,
    pub message: String,
    pub fire_at: Instant,
    pub priority: i8,
}

/// A fired event ready for dispatch.
pub type PendingFire = ScheduledEvent;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct HeapKey {
    fire_at: Instant,
    seq: u64,
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so a max-heap (BinaryHeap's native order) pops the
        // earliest fire_at first; ties broken by insertion order (seq).
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A pending escalation group, as reported by `status()`.
#[derive(Debug, Clone)]
pub struct EscalationStatus {
    pub escalation_id: EscalationId,
    pub message: String,
    pub pending: Vec<(Instant, i8)>,
}

struct EngineState {
    heap: BinaryHeap<HeapKey>,
    events: HashMap<u64, ScheduledEvent>,
    by_id: HashMap<EscalationId, Vec<u64>>,
    next_seq: u64,
}

impl EngineState {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            events: HashMap::new(),
            by_id: HashMap::new(),
            next_seq: 0,
        }
    }

    fn alloc_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn cancel_locked(&mut self, id: &EscalationId) -> bool {
        match self.by_id.remove(id) {
            Some(seqs) => {
                for seq in seqs {
                    self.events.remove(&seq);
                }
                true
            }
            None => false,
        }
    }

    /// Pops every event whose `fire_at` is at or before `now`, skipping
    /// lazily-cancelled entries.
    fn pop_due(&mut self, now: Instant) -> Vec<ScheduledEvent> {
        let mut due = Vec::new();
        while let Some(top) = self.heap.peek().copied() {
            if top.fire_at > now {
                break;
            }
            self.heap.pop();
            if let Some(event) = self.events.remove(&top.seq) {
                if let Some(seqs) = self.by_id.get_mut(&event.escalation_id) {
                    seqs.retain(|s| *s != top.seq);
                    if seqs.is_empty() {
                        self.by_id.remove(&event.escalation_id);
                    }
                }
                due.push(event);
            }
        }
        due
    }

    /// Removes stale (cancelled) keys from the top of the heap and returns
    /// the next still-live fire time, if any.
    fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(top) = self.heap.peek().copied() {
            if self.events.contains_key(&top.seq) {
                return Some(top.fire_at);
            }
            self.heap.pop();
        }
        None
    }
}

/// The timer engine: owns the heap and dispatches fired events.
pub struct TimerEngine<C: Clock> {
    clock: C,
    state: Mutex<EngineState>,
    notify: Notify,
    priority_overrides: HashMap<u64, i8>,
    fire_count: AtomicU64,
}

impl<C: Clock> TimerEngine<C> {
    pub fn new(clock: C) -> Self {
        Self::with_priority_overrides(clock, HashMap::new())
    }

    pub fn with_priority_overrides(clock: C, priority_overrides: HashMap<u64, i8>) -> Self {
        Self {
            clock,
            state: Mutex::new(EngineState::new()),
            notify: Notify::new(),
            priority_overrides,
            fire_count: AtomicU64::new(0),
        }
    }

    /// Arms one timer per delay for `escalation_id`, atomically replacing
    /// any existing group under the same id.
    pub fn add(&self, escalation_id: EscalationId, message: String, delays: &[u64]) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.cancel_locked(&escalation_id);

        let mut seqs = Vec::with_capacity(delays.len());
        for &delay in delays {
            let seq = state.alloc_seq();
            let event = ScheduledEvent {
                seq,
                escalation_id: escalation_id.clone(),
                message: message.clone(),
                fire_at: now + std::time::Duration::from_secs(delay),
                priority: priority_for_delay(delay, &self.priority_overrides),
            };
            state.heap.push(HeapKey {
                fire_at: event.fire_at,
                seq,
            });
            state.events.insert(seq, event);
            seqs.push(seq);
        }
        state.by_id.insert(escalation_id, seqs);
        drop(state);
        self.notify.notify_one();
    }

    /// Cancels every pending event for `escalation_id`. Returns whether a
    /// live group was found.
    pub fn cancel(&self, escalation_id: &EscalationId) -> bool {
        let cancelled = self.state.lock().cancel_locked(escalation_id);
        if cancelled {
            self.notify.notify_one();
        }
        cancelled
    }

    /// Snapshot of every escalation group with at least one live timer.
    pub fn status(&self) -> Vec<EscalationStatus> {
        let state = self.state.lock();
        state
            .by_id
            .iter()
            .map(|(id, seqs)| {
                let mut pending: Vec<(Instant, i8)> = seqs
                    .iter()
                    .filter_map(|seq| state.events.get(seq))
                    .map(|event| (event.fire_at, event.priority))
                    .collect();
                pending.sort_by_key(|(fire_at, _)| *fire_at);
                let message = seqs
                    .first()
                    .and_then(|seq| state.events.get(seq))
                    .map(|event| event.message.clone())
                    .unwrap_or_default();
                EscalationStatus {
                    escalation_id: id.clone(),
                    message,
                    pending,
                }
            })
            .collect()
    }

    /// Pops and returns every event due at or before the clock's current
    /// time. Exposed directly for deterministic, sleep-free tests.
    pub fn pop_due_now(&self) -> Vec<ScheduledEvent> {
        let now = self.clock.now();
        self.state.lock().pop_due(now)
    }

    /// The fire time of the soonest live (non-cancelled) event, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.lock().next_deadline()
    }

    /// Discards all pending timers without firing them.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        *state = EngineState::new();
        drop(state);
        self.notify.notify_one();
    }

    pub fn has_pending(&self) -> bool {
        !self.state.lock().by_id.is_empty()
    }

    pub(crate) fn record_fire(&self) {
        self.fire_count.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn fire_count(&self) -> u64 {
        self.fire_count.load(AtomicOrdering::Relaxed)
    }

    /// Runs the scheduler loop: waits until the next deadline (or a
    /// notification of a state change), pops due events, and invokes
    /// `dispatch` for each. Exits when `running` observes false.
    ///
    /// This loop is real-time: it is only meaningful driven by a
    /// [`escalation_core::SystemClock`]-backed engine, since it sleeps using
    /// wall-clock `Instant`s. Scheduling correctness itself is exercised
    /// without it, via `add`/`cancel`/`pop_due_now` against a fake clock.
    pub async fn run<F, Fut>(self: Arc<Self>, running: Arc<std::sync::atomic::AtomicBool>, mut dispatch: F)
    where
        F: FnMut(PendingFire) -> Fut + Send,
        Fut: std::future::Future<Output = ()> + Send,
    {
        while running.load(AtomicOrdering::Acquire) {
            let deadline = self.next_deadline();
            match deadline {
                Some(at) => {
                    let sleep = tokio::time::sleep_until(tokio::time::Instant::from_std(at));
                    tokio::pin!(sleep);
                    tokio::select! {
                        _ = &mut sleep => {}
                        _ = self.notify.notified() => {}
                    }
                }
                None => {
                    self.notify.notified().await;
                }
            }

            for event in self.pop_due_now() {
                self.record_fire();
                dispatch(event).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
