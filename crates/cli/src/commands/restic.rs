// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rsw restic [args]` - run restic with the agent's default command line

use anyhow::{Context, Result};
use clap::Args;
use rsw_core::restic::PROGRAM;
use rsw_core::ResticCommand;
use tokio::process::Command;

#[derive(Args)]
pub struct ResticArgs {
    /// Arguments appended to the default restic command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Build the default restic command from the container environment, echo it,
/// run it, and exit with restic's exit code.
///
/// `SSH_HOST` and `REPO_PATH` are required. `SSH_PORT`,
/// `SSH_KNOWN_HOSTS_FILE`, `USER` and `RESTIC_REPO_PASSWORD_FILE` refine the
/// ssh and restic defaults when set.
pub async fn handle(args: ResticArgs) -> Result<i32> {
    let host = std::env::var("SSH_HOST").context("SSH_HOST not set")?;
    let repo = std::env::var("REPO_PATH").context("REPO_PATH not set")?;

    let port = match std::env::var("SSH_PORT") {
        Ok(value) => Some(value.parse::<u16>().context("invalid SSH_PORT")?),
        Err(_) => None,
    };

    let mut ssh_options = Vec::new();
    if let Ok(known_hosts) = std::env::var("SSH_KNOWN_HOSTS_FILE") {
        ssh_options.push("-o".to_string());
        ssh_options.push(format!("UserKnownHostsFile={}", known_hosts));
    }
    if let Ok(user) = std::env::var("USER") {
        ssh_options.push("-i".to_string());
        ssh_options.push(format!("/home/{}/.ssh/id", user));
    }

    let mut extra_args = Vec::new();
    if let Ok(password_file) = std::env::var("RESTIC_REPO_PASSWORD_FILE") {
        extra_args.push("--password-file".to_string());
        extra_args.push(password_file);
    }

    let command = ResticCommand::new(host)
        .with_port(port)
        .with_ssh_options(ssh_options)
        .with_extra_args(extra_args);

    let subcommand: Vec<&str> = args.args.iter().map(String::as_str).collect();
    let argv = command.build(&repo, &subcommand);

    println!("# {} {}", PROGRAM, argv.join(" "));

    let status = Command::new(PROGRAM)
        .args(&argv)
        .status()
        .await
        .context("failed to run restic")?;

    Ok(status.code().unwrap_or(1))
}
