// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rsw - Restic Swarm CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod output;

use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, restic, status};

#[derive(Parser)]
#[command(
    name = "rsw",
    version,
    about = "Restic Swarm - restic backups for Docker Swarm services"
)]
struct Cli {
    /// Address of the daemon's status query server
    #[arg(short = 'a', long, global = true, default_value = "127.0.0.1:5555")]
    addr: SocketAddr,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Health check: exit nonzero if any service backup failed
    Check,
    /// Show per-service backup status
    Status(status::StatusArgs),
    /// Run restic with the agent's default command line
    Restic(restic::ResticArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Check => check::handle(cli.addr).await?,
        Commands::Status(args) => {
            status::handle(cli.addr, args).await?;
            0
        }
        Commands::Restic(args) => restic::handle(args).await?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
