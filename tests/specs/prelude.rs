//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for black-box testing of `escalctl`/`escalationd`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Aggressive timeouts for fast tests.
//
// IMPORTANT:
//   Do NOT change these.
//   File a performance bug instead.
const ESCALCTL_TIMEOUT_CONNECT_MS: &str = "2000";
const ESCALCTL_TIMEOUT_IPC_MS: &str = "500";
const ESCALCTL_CONNECT_POLL_MS: &str = "5";

pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// Falls back to resolving relative to the test binary itself when
/// `CARGO_MANIFEST_DIR` is stale (e.g. compiled by a removed worktree into
/// a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn escalctl_binary() -> PathBuf {
    binary_path("escalctl")
}

pub fn escalationd_binary() -> PathBuf {
    binary_path("escalationd")
}

pub fn escalctl_cmd() -> Command {
    Command::new(escalctl_binary())
}

pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions.
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: vec![
                (
                    "ESCALATIOND_BINARY".into(),
                    escalationd_binary().to_string_lossy().into(),
                ),
                (
                    "ESCALCTL_TIMEOUT_CONNECT_MS".into(),
                    ESCALCTL_TIMEOUT_CONNECT_MS.into(),
                ),
                (
                    "ESCALCTL_TIMEOUT_IPC_MS".into(),
                    ESCALCTL_TIMEOUT_IPC_MS.into(),
                ),
                (
                    "ESCALCTL_CONNECT_POLL_MS".into(),
                    ESCALCTL_CONNECT_POLL_MS.into(),
                ),
            ],
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    pub fn command(self) -> Command {
        let mut cmd = escalctl_cmd();
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions.
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

/// Poll a condition until it returns true or the timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// An isolated daemon instance: its own state directory, socket, and a
/// scriptable fake notifier binary so tests can assert on what would have
/// been sent without actually popping up a desktop notification.
pub struct Harness {
    state_dir: tempfile::TempDir,
    notify_log: PathBuf,
}

impl Harness {
    pub fn new() -> Self {
        let state_dir = tempfile::tempdir().unwrap();
        let notify_log = state_dir.path().join("notify-calls.log");
        Self {
            state_dir,
            notify_log,
        }
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    fn notifier_script_path(&self) -> PathBuf {
        self.state_dir.path().join("fake-notify.sh")
    }

    /// Installs a notifier stand-in that appends its arguments to a log
    /// file instead of showing anything, so tests can assert on delivery.
    pub fn install_fake_notifier(&self) {
        let script = self.notifier_script_path();
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$@\" >> {}\nexit 0\n",
                self.notify_log.display()
            ),
        )
        .unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn notify_log(&self) -> String {
        std::fs::read_to_string(&self.notify_log).unwrap_or_default()
    }

    /// A `CliBuilder` pre-wired to this harness's isolated state directory
    /// and fake notifier.
    pub fn escalctl(&self) -> CliBuilder {
        cli()
            .env("ESCALATIOND_STATE_DIR", self.state_path())
            .env("ESCALATIOND_NOTIFIER", self.notifier_script_path())
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut cmd = self.escalctl().args(&["stop"]).command();
        cmd.stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}
