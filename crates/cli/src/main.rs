// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `escalctl`: the control CLI for `escalationd`.

mod client;
mod daemon_process;
mod env;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use escalation_daemon::protocol::{Request, Response};

#[derive(Parser)]
#[command(name = "escalctl", version, about = "Control the escalation daemon")]
struct Cli {
    /// Emit responses as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the daemon if one isn't already running.
    Start,
    /// Ask the daemon to shut down.
    Stop,
    /// Show pending escalations and registered sessions.
    Status,
    /// Arm (or replace) an escalation's timer group.
    Add {
        escalation_id: String,
        message: String,
        /// Delay, in seconds, before each successive notification.
        #[arg(long, value_delimiter = ',')]
        delays: Option<Vec<u64>>,
    },
    /// Cancel a pending escalation.
    Cancel { escalation_id: String },
    /// Register a session with the daemon, starting it first if needed.
    Register {
        #[arg(long)]
        session_id: Option<String>,
        #[arg(long)]
        pid: Option<u32>,
    },
    /// Unregister a session. Unregistering the last one stops the daemon.
    Unregister {
        #[arg(long)]
        session_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let socket_path = escalation_daemon::env::socket_path();

    let response = match cli.command {
        Command::Start => {
            daemon_process::start_if_needed(&socket_path)
                .await
                .context("starting escalationd")?;
            Response::Ok
        }
        Command::Stop => {
            if !client::probe(&socket_path).await {
                Response::Ok
            } else {
                send(&socket_path, Request::Shutdown).await?
            }
        }
        Command::Status => {
            ensure_started(&socket_path).await?;
            send(&socket_path, Request::Status).await?
        }
        Command::Add {
            escalation_id,
            message,
            delays,
        } => {
            ensure_started(&socket_path).await?;
            send(
                &socket_path,
                Request::Add {
                    escalation_id,
                    message,
                    delays,
                },
            )
            .await?
        }
        Command::Cancel { escalation_id } => {
            ensure_started(&socket_path).await?;
            send(&socket_path, Request::Cancel { escalation_id }).await?
        }
        Command::Register { session_id, pid } => {
            ensure_started(&socket_path).await?;
            send(&socket_path, Request::RegisterSession { session_id, pid }).await?
        }
        Command::Unregister { session_id } => {
            ensure_started(&socket_path).await?;
            send(&socket_path, Request::UnregisterSession { session_id }).await?
        }
    };

    let failed = matches!(response, Response::Error { .. });
    output::print_response(&response, cli.json);
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

async fn ensure_started(socket_path: &std::path::Path) -> Result<()> {
    daemon_process::start_if_needed(socket_path)
        .await
        .context("starting escalationd")
}

async fn send(socket_path: &std::path::Path, request: Request) -> Result<Response> {
    client::call(socket_path, request)
        .await
        .context("talking to escalationd")
}
