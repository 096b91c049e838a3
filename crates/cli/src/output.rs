// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable rendering of daemon responses, with a `--json` escape
//! hatch for scripting.

use escalation_daemon::protocol::Response;

pub fn print_response(response: &Response, json: bool) {
    if json {
        match serde_json::to_string(response) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("failed to serialize response: {e}"),
        }
        return;
    }

    match response {
        Response::Ok => println!("ok"),
        Response::Error { message } => eprintln!("error: {message}"),
        Response::Cancelled { found } => {
            if *found {
                println!("cancelled");
            } else {
                println!("no pending escalation found");
            }
        }
        Response::Registered {
            session_id,
            session_count,
        } => println!("registered session {session_id} ({session_count} session(s) now registered)"),
        Response::Unregistered {
            session_id,
            session_count,
            shutting_down,
        } => {
            match session_id {
                Some(id) => println!("unregistered session {id} ({session_count} session(s) remain)"),
                None => println!("no matching session was registered"),
            }
            if *shutting_down {
                println!("(no sessions remain, daemon is shutting down)");
            }
        }
        Response::Status {
            pending,
            session_count,
            sessions,
            uptime_secs,
        } => print_status(pending, *session_count, sessions, *uptime_secs),
    }
}

fn print_status(
    pending: &[escalation_daemon::protocol::PendingStatus],
    session_count: usize,
    sessions: &std::collections::BTreeMap<String, escalation_daemon::protocol::SessionStatus>,
    uptime_secs: u64,
) {
    println!("uptime: {}", format_duration(uptime_secs));
    println!("sessions registered: {session_count}");

    println!();
    if pending.is_empty() {
        println!("no pending escalations");
    } else {
        println!("pending escalations:");
        for p in pending {
            println!(
                "  {:<24} next fire in {:<10} priority {:<3} ({} timer{} remaining)  {}",
                p.escalation_id,
                format_duration(p.next_fire_in),
                p.next_priority,
                p.pending_count,
                if p.pending_count == 1 { "" } else { "s" },
                p.message,
            );
        }
    }

    println!();
    if sessions.is_empty() {
        println!("no registered sessions");
    } else {
        println!("registered sessions:");
        for (session_id, s) in sessions {
            let pid = s
                .pid
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<24} pid {:<8} age {}",
                session_id,
                pid,
                format_duration(s.age)
            );
        }
    }
}

fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    }
}
