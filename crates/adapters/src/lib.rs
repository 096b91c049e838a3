// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! escalation-adapters: the notifier sink and the process liveness/business
//! probe, each behind a trait with a production implementation and a fake.

pub mod notify;
pub mod process;

pub use notify::{NotifierSink, NotifyOutcome, ProcessNotifierSink};
pub use process::{ProcessProbe, SysinfoProcessProbe};

#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifierSink;
#[cfg(any(test, feature = "test-support"))]
pub use process::FakeProcessProbe;
