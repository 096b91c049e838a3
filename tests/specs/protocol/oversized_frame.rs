use crate::prelude::*;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;

fn socket_path(harness: &Harness) -> std::path::PathBuf {
    harness.state_path().join("escalation.sock")
}

#[test]
fn an_oversized_length_prefix_is_rejected_without_taking_the_daemon_down() {
    let harness = Harness::new();
    harness.install_fake_notifier();

    // Get a daemon running via a harmless command.
    harness.escalctl().args(&["status"]).passes();

    let socket = socket_path(&harness);
    assert!(wait_for(1000, || socket.exists()));

    // Claim a payload larger than the 1 MiB cap; the daemon must refuse
    // without reading the (nonexistent) body and without crashing.
    let oversized_len: u32 = 2 * 1024 * 1024;
    let mut stream = UnixStream::connect(&socket).unwrap();
    stream.write_all(&oversized_len.to_be_bytes()).unwrap();
    let mut buf = [0u8; 1];
    let _ = stream.read(&mut buf);

    // The daemon should still be alive and answering ordinary requests.
    harness
        .escalctl()
        .args(&["status"])
        .passes()
        .stdout_has("uptime");
}
