use crate::prelude::*;
use std::process::{Command, Stdio};

#[test]
fn daemon_shuts_down_once_its_last_tracked_pid_dies() {
    let harness = Harness::new();
    harness.install_fake_notifier();

    // A short-lived child whose death the sweeper should notice quickly.
    let mut child = Command::new("sleep")
        .arg("0.2")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let pid = child.id();

    harness
        .escalctl()
        .env("ESCALATIOND_PID_CHECK_MS", "100")
        .args(&["register", "--session-id", "sess-dies", "--pid", &pid.to_string()])
        .passes();

    child.wait().unwrap();

    assert!(
        wait_for(2000, || {
            harness
                .escalctl()
                .args(&["status"])
                .command()
                .output()
                .map(|o| !o.status.success())
                .unwrap_or(false)
        }),
        "expected the daemon to exit once its only tracked session's pid died"
    );
}

#[test]
fn unregistering_the_only_session_stops_the_daemon() {
    let harness = Harness::new();
    harness.install_fake_notifier();

    harness
        .escalctl()
        .args(&["register", "--session-id", "sess-1"])
        .passes();

    harness
        .escalctl()
        .args(&["unregister", "--session-id", "sess-1"])
        .passes()
        .stdout_has("shutting down");

    assert!(wait_for(1000, || {
        harness
            .escalctl()
            .args(&["status"])
            .command()
            .output()
            .map(|o| !o.status.success())
            .unwrap_or(false)
    }));
}
