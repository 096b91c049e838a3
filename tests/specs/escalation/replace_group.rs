use crate::prelude::*;

#[test]
fn re_adding_the_same_id_replaces_the_pending_group_instead_of_duplicating_it() {
    let harness = Harness::new();
    harness.install_fake_notifier();

    harness
        .escalctl()
        .args(&["add", "e1", "first message", "--delays", "60"])
        .passes();
    harness
        .escalctl()
        .args(&["add", "e1", "second message", "--delays", "3600"])
        .passes();

    let status = harness.escalctl().args(&["status", "--json"]).passes();
    let json: serde_json::Value = serde_json::from_str(&status.stdout()).unwrap();
    let pending = json["pending"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["message"], "second message");
}
