// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sysinfo`-backed process probe.

use super::ProcessProbe;
use async_trait::async_trait;
use std::time::Duration;
use sysinfo::{Pid, ProcessRefreshKind, System};

const BUSY_CPU_THRESHOLD: f32 = 10.0;
const CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Default)]
pub struct SysinfoProcessProbe;

impl SysinfoProcessProbe {
    pub fn new() -> Self {
        Self
    }

    fn has_children(sys: &System, pid: Pid) -> bool {
        sys.processes()
            .values()
            .any(|p| p.parent() == Some(pid))
    }
}

#[async_trait]
impl ProcessProbe for SysinfoProcessProbe {
    async fn alive(&self, pid: u32) -> bool {
        tokio::task::spawn_blocking(move || {
            let mut sys = System::new();
            sys.refresh_processes_specifics(
                sysinfo::ProcessesToUpdate::Some(&[Pid::from_u32(pid)]),
                true,
                ProcessRefreshKind::nothing(),
            );
            sys.process(Pid::from_u32(pid)).is_some()
        })
        .await
        .unwrap_or(true)
    }

    async fn busy(&self, pid: u32) -> bool {
        let target = Pid::from_u32(pid);
        let mut sys = System::new();
        let refresh = tokio::task::spawn_blocking(move || {
            sys.refresh_processes_specifics(
                sysinfo::ProcessesToUpdate::All,
                true,
                ProcessRefreshKind::nothing().with_cpu(),
            );
            sys
        })
        .await;
        let Ok(mut sys) = refresh else {
            return false;
        };

        if sys.process(target).is_none() {
            return false;
        }
        if Self::has_children(&sys, target) {
            return true;
        }

        tokio::time::sleep(CPU_SAMPLE_INTERVAL).await;

        let sampled = tokio::task::spawn_blocking(move || {
            sys.refresh_processes_specifics(
                sysinfo::ProcessesToUpdate::All,
                true,
                ProcessRefreshKind::nothing().with_cpu(),
            );
            sys.process(target).map(|p| p.cpu_usage())
        })
        .await;

        match sampled {
            Ok(Some(cpu)) => cpu > BUSY_CPU_THRESHOLD,
            _ => false,
        }
    }
}
