use crate::prelude::*;

#[test]
fn add_then_status_reports_the_pending_group() {
    let harness = Harness::new();
    harness.install_fake_notifier();

    harness
        .escalctl()
        .args(&["add", "quick-check", "are you there?", "--delays", "60,3600"])
        .passes();

    harness
        .escalctl()
        .args(&["status"])
        .passes()
        .stdout_has("quick-check")
        .stdout_has("are you there?");
}

#[test]
fn cancel_before_it_fires_suppresses_the_notification() {
    let harness = Harness::new();
    harness.install_fake_notifier();

    harness
        .escalctl()
        .args(&["add", "e1", "msg", "--delays", "1"])
        .passes();

    harness
        .escalctl()
        .args(&["cancel", "e1"])
        .passes()
        .stdout_has("cancelled");

    assert!(!wait_for(1500, || !harness.notify_log().is_empty()));
}

#[test]
fn cancelling_an_unknown_id_reports_not_found_without_failing() {
    let harness = Harness::new();
    harness.install_fake_notifier();

    harness
        .escalctl()
        .args(&["cancel", "never-added"])
        .passes()
        .stdout_has("no pending escalation found");
}
