// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-variable-driven configuration, one function per variable.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PID_CHECK_MS: u64 = 60_000;

/// Base directory for daemon-owned state (socket, log, lockfile).
///
/// `ESCALATIOND_STATE_DIR` overrides it outright; otherwise it resolves
/// under `$XDG_STATE_HOME` or `~/.local/state`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ESCALATIOND_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = std::env::var_os("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("escalationd");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local/state/escalationd")
}

pub fn socket_path() -> PathBuf {
    std::env::var("ESCALATIOND_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join("escalation.sock"))
}

pub fn log_path() -> PathBuf {
    std::env::var("ESCALATIOND_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join("escalationd.log"))
}

pub fn notifier_binary() -> PathBuf {
    std::env::var("ESCALATIOND_NOTIFIER")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("notify"))
}

pub fn pid_check_interval() -> Duration {
    let ms = std::env::var("ESCALATIOND_PID_CHECK_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PID_CHECK_MS);
    Duration::from_millis(ms)
}

/// Overrides for the delay-to-priority map, so integration tests can use
/// short delays without losing coverage of the higher-priority paths.
///
/// `ESCALATIOND_PRIORITY_OVERRIDES` is a comma-separated list of
/// `delay_secs:priority` pairs, e.g. `"1:0,2:2"`. Malformed entries are
/// skipped rather than rejected outright.
pub fn priority_overrides() -> HashMap<u64, i8> {
    let Ok(raw) = std::env::var("ESCALATIOND_PRIORITY_OVERRIDES") else {
        return HashMap::new();
    };
    raw.split(',')
        .filter_map(|pair| {
            let (delay, priority) = pair.split_once(':')?;
            Some((delay.trim().parse().ok()?, priority.trim().parse().ok()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn state_dir_honors_explicit_override() {
        std::env::set_var("ESCALATIOND_STATE_DIR", "/tmp/escalationd-test-state");
        assert_eq!(state_dir(), PathBuf::from("/tmp/escalationd-test-state"));
        std::env::remove_var("ESCALATIOND_STATE_DIR");
    }

    #[test]
    #[serial]
    fn pid_check_interval_defaults_to_sixty_seconds() {
        std::env::remove_var("ESCALATIOND_PID_CHECK_MS");
        assert_eq!(pid_check_interval(), Duration::from_millis(60_000));
    }

    #[test]
    #[serial]
    fn pid_check_interval_honors_override() {
        std::env::set_var("ESCALATIOND_PID_CHECK_MS", "250");
        assert_eq!(pid_check_interval(), Duration::from_millis(250));
        std::env::remove_var("ESCALATIOND_PID_CHECK_MS");
    }

    #[test]
    #[serial]
    fn priority_overrides_parses_pairs_and_skips_garbage() {
        std::env::set_var("ESCALATIOND_PRIORITY_OVERRIDES", "1:0,2:2,garbage,3:");
        let overrides = priority_overrides();
        assert_eq!(overrides.get(&1), Some(&0));
        assert_eq!(overrides.get(&2), Some(&2));
        assert_eq!(overrides.len(), 2);
        std::env::remove_var("ESCALATIOND_PRIORITY_OVERRIDES");
    }

    #[test]
    #[serial]
    fn priority_overrides_defaults_to_empty() {
        std::env::remove_var("ESCALATIOND_PRIORITY_OVERRIDES");
        assert!(priority_overrides().is_empty());
    }
}
