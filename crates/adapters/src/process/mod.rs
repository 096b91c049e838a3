// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process liveness and "busy" probing, used for PID-based session sweeping
//! and notification busy-suppression.

mod sysinfo_probe;

pub use sysinfo_probe::SysinfoProcessProbe;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProcessProbe;

use async_trait::async_trait;

/// Probes a PID for liveness and activity.
///
/// Both methods fail open: an indeterminate result (permission denied,
/// probe-level error) is reported as `true` for `alive` (don't prune a
/// session we can't actually confirm is dead) and `false` for `busy` (don't
/// suppress a real escalation because we couldn't tell whether the user is
/// active).
#[async_trait]
pub trait ProcessProbe: Send + Sync + 'static {
    /// Whether a process with this PID currently exists.
    async fn alive(&self, pid: u32) -> bool;

    /// Whether the process is actively working: either its CPU usage over a
    /// short sampling window exceeds a threshold, or it has any child
    /// processes.
    async fn busy(&self, pid: u32) -> bool;
}
