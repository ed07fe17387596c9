// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restic Swarm Daemon (rswd)
//!
//! Background process that schedules service backups and serves status
//! queries over TCP.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod lifecycle;
mod protocol;
mod server;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use rsw_adapters::{DockerSwarmAdapter, ExecScope, ResticCli};
use rsw_core::{ResticCommand, RetentionPolicy, StatusStore, SystemClock};
use rsw_engine::{BackupRunner, RunnerConfig, Scheduler, Task};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, error, info};

type DaemonScheduler = Scheduler<DockerSwarmAdapter, SystemClock>;
type DaemonRunner = BackupRunner<DockerSwarmAdapter, ResticCli>;

/// Restic backup agent for Docker Swarm services
#[derive(Parser, Debug)]
#[command(name = "rswd", version)]
struct Args {
    /// SSH host holding the backup repositories
    #[arg(short = 's', long)]
    ssh_host: String,

    /// Local directory under which backup sources are mounted
    #[arg(short = 'b', long)]
    backup_base: PathBuf,

    /// Retention policy: "<hourly> <daily> <weekly> <monthly> <yearly> <within> <last> <prune> [tags]"
    #[arg(short = 'f', long, value_parser = RetentionPolicy::parse)]
    forget_policy: RetentionPolicy,

    /// SSH port on the backup host
    #[arg(short = 'p', long)]
    ssh_port: Option<u16>,

    /// Extra option passed to ssh (repeatable)
    #[arg(short = 'o', long = "ssh-option")]
    ssh_options: Vec<String>,

    /// Extra argument passed to every restic invocation (repeatable)
    #[arg(short = 'e', long = "restic-arg")]
    restic_args: Vec<String>,

    /// Address the status query server listens on
    #[arg(short = 'l', long, default_value = "127.0.0.1:5555")]
    listen: SocketAddr,

    /// How often services are rescanned for backup labels
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    rescan_interval: Duration,

    /// Hard cap on a single pre- or post-hook command
    #[arg(long, default_value = "10m", value_parser = humantime::parse_duration)]
    hook_timeout: Duration,

    /// Which running tasks hook commands execute in
    #[arg(long, value_enum, default_value = "one")]
    hook_scope: HookScope,

    /// Log at debug level
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HookScope {
    /// A single arbitrary running task
    One,
    /// Every running task
    All,
}

impl From<HookScope> for ExecScope {
    fn from(scope: HookScope) -> Self {
        match scope {
            HookScope::One => ExecScope::OneTask,
            HookScope::All => ExecScope::AllTasks,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_logging(args.verbose);

    let (listener, swarm) = match lifecycle::startup(args.listen).await {
        Ok(parts) => parts,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    info!("Daemon ready, listening on {}", args.listen);

    let command = ResticCommand::new(args.ssh_host)
        .with_port(args.ssh_port)
        .with_ssh_options(args.ssh_options)
        .with_extra_args(args.restic_args);
    let status = StatusStore::new();
    let runner = BackupRunner::new(
        swarm.clone(),
        ResticCli::new(command),
        status.clone(),
        RunnerConfig {
            backup_base: args.backup_base,
            policy: args.forget_policy,
            hook_scope: args.hook_scope.into(),
            hook_timeout: args.hook_timeout,
        },
    );

    let rescan_interval = chrono::Duration::from_std(args.rescan_interval)?;
    let mut scheduler = Scheduler::new(swarm, SystemClock, rescan_interval);

    // First scan runs immediately; failures are retried on the rescan chain.
    if let Err(e) = scheduler.scan().await {
        error!("Initial service scan failed: {}", e);
    }

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Main event loop
    loop {
        let sleep_for = scheduler
            .next_fire_at()
            .map_or(args.rescan_interval, |at| {
                (at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
            });

        tokio::select! {
            // Accept status query connections
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        debug!("client connected from {}", addr);
                        let status = status.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server::handle_connection(status, stream).await {
                                error!("Error handling connection: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                }
            }

            // Wake at the earliest queued fire instant
            _ = tokio::time::sleep(sleep_for) => {
                for job in scheduler.take_due() {
                    dispatch(job.task, &mut scheduler, &runner).await;
                }
            }

            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    info!("Daemon stopped");
    Ok(())
}

/// Run a due task.
///
/// Rescans run inline; backups are spawned so a long-running backup never
/// blocks the loop or later-queued jobs.
async fn dispatch(task: Task, scheduler: &mut DaemonScheduler, runner: &DaemonRunner) {
    match task {
        Task::Rescan => {
            if let Err(e) = scheduler.scan().await {
                error!("Service scan failed: {}", e);
            }
        }
        Task::Backup {
            service_id,
            service_name,
        } => {
            info!(service = %service_name, "backup due");
            let runner = runner.clone();
            tokio::spawn(async move {
                let _ = runner.run(&service_id).await;
            });
        }
    }
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
