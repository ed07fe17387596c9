// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: dependency preflight and socket binding.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use rsw_adapters::{DockerSwarmAdapter, SwarmError};
use rsw_core::restic::PROGRAM;
use thiserror::Error;
use tokio::net::TcpListener;

/// Socket the Docker Engine API is expected on.
pub const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("restic is not installed or not on PATH")]
    ResticMissing,

    #[error("Docker socket not found at {0}: is this an active swarm node?")]
    DockerSocketMissing(PathBuf),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("Docker connection failed: {0}")]
    Docker(#[from] SwarmError),
}

/// Start the daemon: dependency preflight, status listener, Docker client.
pub async fn startup(listen: SocketAddr) -> Result<(TcpListener, DockerSwarmAdapter), LifecycleError> {
    preflight()?;
    let listener = bind(listen).await?;
    let swarm = DockerSwarmAdapter::connect()?;
    Ok((listener, swarm))
}

/// Verify external dependencies before any work is scheduled.
///
/// The daemon cannot do anything without the restic binary and a local
/// Docker socket.
pub fn preflight() -> Result<(), LifecycleError> {
    if !restic_on_path() {
        return Err(LifecycleError::ResticMissing);
    }

    let socket = Path::new(DOCKER_SOCKET);
    if !socket.exists() {
        return Err(LifecycleError::DockerSocketMissing(socket.to_path_buf()));
    }

    Ok(())
}

/// Bind the status query listener.
pub async fn bind(listen: SocketAddr) -> Result<TcpListener, LifecycleError> {
    TcpListener::bind(listen)
        .await
        .map_err(|e| LifecycleError::BindFailed(listen, e))
}

fn restic_on_path() -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| dir.join(PROGRAM).is_file())
}
